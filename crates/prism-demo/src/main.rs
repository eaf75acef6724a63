use std::path::PathBuf;

use clap::Parser;
use prism_engine::logging::{init_logging, LoggingConfig};
use prism_engine::{System, SystemConfig};

#[derive(Parser)]
#[command(name = "prism-demo", about = "Renders a single shaded triangle")]
struct Cli {
    /// Borderless fullscreen instead of a centered window
    #[arg(long)]
    fullscreen: bool,

    /// Present as fast as possible instead of waiting for vblank
    #[arg(long)]
    no_vsync: bool,

    /// Near clip plane distance
    #[arg(long, default_value_t = 0.1)]
    screen_near: f32,

    /// Far clip plane distance
    #[arg(long, default_value_t = 1000.0)]
    screen_depth: f32,

    /// Directory containing color.vert.wgsl and color.frag.wgsl
    #[arg(long)]
    shader_dir: Option<PathBuf>,

    /// Log filter in env_logger syntax (overrides RUST_LOG)
    #[arg(long)]
    log: Option<String>,
}

impl Cli {
    fn into_config(self) -> SystemConfig {
        let defaults = SystemConfig::default();
        SystemConfig {
            fullscreen: self.fullscreen,
            vsync: !self.no_vsync,
            screen_near: self.screen_near,
            screen_depth: self.screen_depth,
            shader_dir: self.shader_dir.unwrap_or(defaults.shader_dir.clone()),
            ..defaults
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(LoggingConfig {
        env_filter: cli.log.clone(),
        ..LoggingConfig::default()
    });

    let config = cli.into_config();
    log::info!(
        "starting: {}, vsync {}, clip {}..{}",
        if config.fullscreen { "fullscreen" } else { "windowed" },
        if config.vsync { "on" } else { "off" },
        config.screen_near,
        config.screen_depth
    );

    System::run(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_system_config() {
        let config = Cli::parse_from(["prism-demo"]).into_config();
        let defaults = SystemConfig::default();
        assert_eq!(config.fullscreen, defaults.fullscreen);
        assert_eq!(config.vsync, defaults.vsync);
        assert_eq!(config.screen_near, defaults.screen_near);
        assert_eq!(config.screen_depth, defaults.screen_depth);
        assert_eq!(config.shader_dir, defaults.shader_dir);
    }

    #[test]
    fn flags_override_defaults() {
        let config = Cli::parse_from([
            "prism-demo",
            "--fullscreen",
            "--no-vsync",
            "--screen-depth",
            "50",
            "--shader-dir",
            "custom",
        ])
        .into_config();
        assert!(config.fullscreen);
        assert!(!config.vsync);
        assert_eq!(config.screen_depth, 50.0);
        assert_eq!(config.shader_dir, PathBuf::from("custom"));
    }
}
