use std::path::PathBuf;

use anyhow::{ensure, Result};

use crate::device::GpuInit;
use crate::paint::Color;
use crate::shader::BUNDLED_SHADER_DIR;

/// Startup configuration of the whole system.
#[derive(Debug, Clone)]
pub struct SystemConfig {
    /// Borderless fullscreen on the primary monitor instead of a centered window.
    pub fullscreen: bool,

    /// Present synchronized to the display refresh.
    pub vsync: bool,

    /// Near clip plane distance.
    pub screen_near: f32,

    /// Far clip plane distance.
    pub screen_depth: f32,

    /// Color the back buffer is cleared to each frame.
    pub clear_color: Color,

    pub title: String,

    /// Inner size of the window when not fullscreen, in physical pixels.
    pub windowed_size: (u32, u32),

    /// Directory holding `color.vert.wgsl` and `color.frag.wgsl`.
    pub shader_dir: PathBuf,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            fullscreen: false,
            vsync: true,
            screen_near: 0.1,
            screen_depth: 1000.0,
            clear_color: Color::BLACK,
            title: "Engine".to_string(),
            windowed_size: (800, 600),
            shader_dir: PathBuf::from(BUNDLED_SHADER_DIR),
        }
    }
}

impl SystemConfig {
    /// Rejects settings that would produce a degenerate projection or window.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.screen_near.is_finite() && self.screen_near > 0.0,
            "screen_near must be positive, got {}",
            self.screen_near
        );
        ensure!(
            self.screen_depth.is_finite() && self.screen_depth > self.screen_near,
            "screen_depth ({}) must be greater than screen_near ({})",
            self.screen_depth,
            self.screen_near
        );
        let (w, h) = self.windowed_size;
        ensure!(w > 0 && h > 0, "window size must be non-zero, got {w}x{h}");
        ensure!(self.clear_color.is_finite(), "clear color must be finite");
        Ok(())
    }

    /// GPU parameters derived from this configuration.
    pub fn gpu_init(&self) -> GpuInit {
        GpuInit {
            vsync: self.vsync,
            screen_near: self.screen_near,
            screen_depth: self.screen_depth,
            ..GpuInit::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = SystemConfig::default();
        config.validate().unwrap();
        assert!(!config.fullscreen);
        assert!(config.vsync);
        assert_eq!(config.windowed_size, (800, 600));
        assert_eq!(config.title, "Engine");
    }

    #[test]
    fn clip_planes_are_checked() {
        let mut config = SystemConfig::default();
        config.screen_near = 0.0;
        assert!(config.validate().is_err());

        config.screen_near = 10.0;
        config.screen_depth = 10.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("screen_depth"), "{err}");
    }

    #[test]
    fn zero_window_is_rejected() {
        let config = SystemConfig {
            windowed_size: (800, 0),
            ..SystemConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn gpu_init_carries_display_settings() {
        let config = SystemConfig {
            vsync: false,
            screen_near: 0.5,
            screen_depth: 200.0,
            ..SystemConfig::default()
        };
        let init = config.gpu_init();
        assert!(!init.vsync);
        assert_eq!(init.screen_near, 0.5);
        assert_eq!(init.screen_depth, 200.0);
        assert!(init.prefer_srgb);
    }
}
