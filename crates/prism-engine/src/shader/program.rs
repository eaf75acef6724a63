use std::fmt;

use naga::valid::{Capabilities, ValidationFlags, Validator};
use naga::{AddressSpace, Binding, Handle, Scalar, ShaderStage, Type, TypeInner, VectorSize};

use crate::scene::Vertex;

use super::source::{ShaderSources, StageSource};
use super::ShaderError;

pub const WORLD_MATRIX: &str = "worldMatrix";
pub const VIEW_MATRIX: &str = "viewMatrix";
pub const PROJECTION_MATRIX: &str = "projectionMatrix";

/// The transform uniforms every program driven by the frame sequencer must expose.
pub const TRANSFORM_UNIFORMS: [&str; 3] = [WORLD_MATRIX, VIEW_MATRIX, PROJECTION_MATRIX];

pub const VERTEX_ENTRY: &str = "vs_main";
pub const FRAGMENT_ENTRY: &str = "fs_main";

/// All uniforms live in this bind group.
pub const UNIFORM_GROUP: u32 = 0;

/// Byte size of a `mat4x4<f32>` uniform.
pub const MATRIX_UNIFORM_SIZE: u64 = 64;

/// Where a uniform is bound in the linked program.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct UniformLocation {
    pub group: u32,
    pub binding: u32,
}

impl fmt::Display for UniformLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@group({}) @binding({})", self.group, self.binding)
    }
}

/// A named matrix uniform and the stages that read it.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformSlot {
    pub name: String,
    pub location: UniformLocation,
    pub stages: wgpu::ShaderStages,
}

/// Resolved locations of the three transform uniforms.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TransformLocations {
    pub world: UniformLocation,
    pub view: UniformLocation,
    pub projection: UniformLocation,
}

/// Uniform table of a compiled and linked vertex + fragment pair.
///
/// Built from the WGSL sources alone, so it needs no device.
#[derive(Debug, Clone, Default)]
pub struct ProgramInterface {
    uniforms: Vec<UniformSlot>,
}

impl ProgramInterface {
    /// Compiles both stages, checks entry points and stage interfaces, and
    /// collects uniforms.
    ///
    /// Every `vs_main` input must read an attribute of [`Vertex::layout`], and
    /// every `fs_main` input must be written by `vs_main` with the same type.
    /// Only `mat4x4<f32>` uniforms in [`UNIFORM_GROUP`] are accepted.
    pub fn link(sources: &ShaderSources) -> Result<Self, ShaderError> {
        let vertex = compile(&sources.vertex)?;
        let fragment = compile(&sources.fragment)?;

        let vs = entry_point(&vertex, ShaderStage::Vertex, VERTEX_ENTRY)?;
        let fs = entry_point(&fragment, ShaderStage::Fragment, FRAGMENT_ENTRY)?;

        check_vertex_inputs(&stage_inputs(&vertex, vs), Vertex::layout().attributes)?;
        check_stage_interface(&stage_outputs(&vertex, vs), &stage_inputs(&fragment, fs))?;

        let mut uniforms = Vec::new();
        collect_uniforms(&vertex, wgpu::ShaderStages::VERTEX, &mut uniforms)?;
        collect_uniforms(&fragment, wgpu::ShaderStages::FRAGMENT, &mut uniforms)?;
        uniforms.sort_by_key(|slot| slot.location.binding);

        log::debug!(
            "linked program: {}",
            uniforms
                .iter()
                .map(|s| format!("{} {}", s.location, s.name))
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(Self { uniforms })
    }

    pub fn uniforms(&self) -> &[UniformSlot] {
        &self.uniforms
    }

    pub fn find_uniform(&self, name: &str) -> Result<UniformLocation, ShaderError> {
        self.uniforms
            .iter()
            .find(|slot| slot.name == name)
            .map(|slot| slot.location)
            .ok_or_else(|| ShaderError::UniformNotFound {
                name: name.to_string(),
            })
    }
}

/// Resolves world, view and projection in that order; the first miss wins.
pub fn resolve_transform_uniforms(
    interface: &ProgramInterface,
) -> Result<TransformLocations, ShaderError> {
    Ok(TransformLocations {
        world: interface.find_uniform(WORLD_MATRIX)?,
        view: interface.find_uniform(VIEW_MATRIX)?,
        projection: interface.find_uniform(PROJECTION_MATRIX)?,
    })
}

fn compile(stage: &StageSource) -> Result<naga::Module, ShaderError> {
    let module = naga::front::wgsl::parse_str(&stage.code).map_err(|e| ShaderError::Compile {
        path: stage.path.clone(),
        message: e.emit_to_string(&stage.code),
    })?;

    Validator::new(ValidationFlags::all(), Capabilities::empty())
        .validate(&module)
        .map_err(|e| ShaderError::Compile {
            path: stage.path.clone(),
            message: e.emit_to_string(&stage.code),
        })?;

    Ok(module)
}

fn entry_point<'m>(
    module: &'m naga::Module,
    stage: ShaderStage,
    name: &str,
) -> Result<&'m naga::EntryPoint, ShaderError> {
    module
        .entry_points
        .iter()
        .find(|ep| ep.stage == stage && ep.name == name)
        .ok_or_else(|| ShaderError::link(format!("missing {stage:?} entry point '{name}'")))
}

/// A `@location` value crossing a stage boundary.
#[derive(Debug)]
struct StageVar {
    name: String,
    location: u32,
    ty: TypeInner,
}

fn stage_inputs(module: &naga::Module, ep: &naga::EntryPoint) -> Vec<StageVar> {
    let mut vars = Vec::new();
    for arg in &ep.function.arguments {
        located_vars(module, arg.ty, arg.binding.as_ref(), arg.name.as_deref(), &mut vars);
    }
    vars
}

fn stage_outputs(module: &naga::Module, ep: &naga::EntryPoint) -> Vec<StageVar> {
    let mut vars = Vec::new();
    if let Some(result) = &ep.function.result {
        located_vars(module, result.ty, result.binding.as_ref(), None, &mut vars);
    }
    vars
}

/// Flattens IO structs; builtins are skipped.
fn located_vars(
    module: &naga::Module,
    ty: Handle<Type>,
    binding: Option<&Binding>,
    name: Option<&str>,
    vars: &mut Vec<StageVar>,
) {
    match binding {
        Some(Binding::Location { location, .. }) => vars.push(StageVar {
            name: name.unwrap_or("<result>").to_string(),
            location: *location,
            ty: module.types[ty].inner.clone(),
        }),
        Some(Binding::BuiltIn(_)) => {}
        None => {
            if let TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for member in members {
                    located_vars(
                        module,
                        member.ty,
                        member.binding.as_ref(),
                        member.name.as_deref(),
                        vars,
                    );
                }
            }
        }
    }
}

/// Component count of an `f32` scalar or vector.
fn f32_components(ty: &TypeInner) -> Option<u32> {
    match *ty {
        TypeInner::Scalar(Scalar::F32) => Some(1),
        TypeInner::Vector {
            size,
            scalar: Scalar::F32,
        } => Some(size as u32),
        _ => None,
    }
}

fn format_components(format: wgpu::VertexFormat) -> Option<u32> {
    match format {
        wgpu::VertexFormat::Float32 => Some(1),
        wgpu::VertexFormat::Float32x2 => Some(2),
        wgpu::VertexFormat::Float32x3 => Some(3),
        wgpu::VertexFormat::Float32x4 => Some(4),
        _ => None,
    }
}

fn check_vertex_inputs(
    inputs: &[StageVar],
    attributes: &[wgpu::VertexAttribute],
) -> Result<(), ShaderError> {
    for input in inputs {
        let Some(attr) = attributes
            .iter()
            .find(|a| a.shader_location == input.location)
        else {
            return Err(ShaderError::link(format!(
                "vertex input '{}' at @location({}) has no vertex attribute",
                input.name, input.location
            )));
        };

        let declared = f32_components(&input.ty);
        if declared.is_none() || declared != format_components(attr.format) {
            return Err(ShaderError::link(format!(
                "vertex input '{}' at @location({}) cannot read a {:?} attribute",
                input.name, input.location, attr.format
            )));
        }
    }
    Ok(())
}

fn check_stage_interface(outputs: &[StageVar], inputs: &[StageVar]) -> Result<(), ShaderError> {
    for input in inputs {
        match outputs.iter().find(|o| o.location == input.location) {
            None => {
                return Err(ShaderError::link(format!(
                    "fragment input '{}' at @location({}) is not written by the vertex stage",
                    input.name, input.location
                )));
            }
            Some(output) if output.ty != input.ty => {
                return Err(ShaderError::link(format!(
                    "@location({}) is '{}' in the vertex stage and '{}' in the fragment stage, with different types",
                    input.location, output.name, input.name
                )));
            }
            Some(_) => {}
        }
    }
    Ok(())
}

fn collect_uniforms(
    module: &naga::Module,
    stage: wgpu::ShaderStages,
    slots: &mut Vec<UniformSlot>,
) -> Result<(), ShaderError> {
    for (_, var) in module.global_variables.iter() {
        if var.space != AddressSpace::Uniform {
            continue;
        }
        let Some(name) = var.name.as_deref() else { continue };

        let Some(binding) = var.binding.as_ref() else {
            return Err(ShaderError::link(format!("uniform '{name}' has no binding")));
        };
        let location = UniformLocation {
            group: binding.group,
            binding: binding.binding,
        };

        if location.group != UNIFORM_GROUP {
            return Err(ShaderError::link(format!(
                "uniform '{name}' must be in @group({UNIFORM_GROUP}), found {location}"
            )));
        }

        let is_mat4 = matches!(
            module.types[var.ty].inner,
            TypeInner::Matrix {
                columns: VectorSize::Quad,
                rows: VectorSize::Quad,
                ..
            }
        );
        if !is_mat4 {
            return Err(ShaderError::link(format!(
                "uniform '{name}' must be mat4x4<f32>"
            )));
        }

        match slots.iter_mut().find(|s| s.name == name) {
            Some(slot) if slot.location == location => slot.stages |= stage,
            Some(slot) => {
                return Err(ShaderError::link(format!(
                    "uniform '{name}' declared at {} and {location}",
                    slot.location
                )));
            }
            None => {
                if let Some(other) = slots.iter().find(|s| s.location == location) {
                    return Err(ShaderError::link(format!(
                        "uniforms '{}' and '{name}' share {location}",
                        other.name
                    )));
                }
                slots.push(UniformSlot {
                    name: name.to_string(),
                    location,
                    stages: stage,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PASSTHROUGH_FRAGMENT: &str = r#"
@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return vec4<f32>(1.0, 1.0, 1.0, 1.0);
}
"#;

    fn sources(vertex: &str, fragment: &str) -> ShaderSources {
        ShaderSources {
            vertex: StageSource::new("test.vert.wgsl", vertex),
            fragment: StageSource::new("test.frag.wgsl", fragment),
        }
    }

    fn vertex_with(uniforms: &[(&str, u32)]) -> String {
        let mut src = String::new();
        for (name, binding) in uniforms {
            src.push_str(&format!(
                "@group(0) @binding({binding}) var<uniform> {name}: mat4x4<f32>;\n"
            ));
        }
        src.push_str(
            "@vertex\nfn vs_main(@location(0) p: vec3<f32>) -> @builtin(position) vec4<f32> {\n    return vec4<f32>(p, 1.0);\n}\n",
        );
        src
    }

    // ── builtin program ───────────────────────────────────────────────────

    #[test]
    fn builtin_color_program_exposes_transform_uniforms() {
        let iface = ProgramInterface::link(&ShaderSources::builtin_color()).unwrap();

        let locs = resolve_transform_uniforms(&iface).unwrap();
        assert_eq!(locs.world, UniformLocation { group: 0, binding: 0 });
        assert_eq!(locs.view, UniformLocation { group: 0, binding: 1 });
        assert_eq!(locs.projection, UniformLocation { group: 0, binding: 2 });

        assert_eq!(iface.uniforms().len(), 3);
        assert!(iface
            .uniforms()
            .iter()
            .all(|s| s.stages == wgpu::ShaderStages::VERTEX));
    }

    // ── resolution ────────────────────────────────────────────────────────

    #[test]
    fn each_missing_transform_uniform_is_named() {
        let all = [(WORLD_MATRIX, 0), (VIEW_MATRIX, 1), (PROJECTION_MATRIX, 2)];

        for skip in TRANSFORM_UNIFORMS {
            let present: Vec<(&str, u32)> =
                all.iter().copied().filter(|(n, _)| *n != skip).collect();
            let iface =
                ProgramInterface::link(&sources(&vertex_with(&present), PASSTHROUGH_FRAGMENT))
                    .unwrap();

            let err = resolve_transform_uniforms(&iface).unwrap_err();
            assert_eq!(err.missing_uniform(), Some(skip));
            assert_eq!(err.to_string(), format!("failed to find uniform '{skip}'"));
        }
    }

    #[test]
    fn extra_uniforms_do_not_break_resolution() {
        let vs = vertex_with(&[
            (WORLD_MATRIX, 0),
            (VIEW_MATRIX, 1),
            (PROJECTION_MATRIX, 2),
            ("normalMatrix", 3),
        ]);
        let iface = ProgramInterface::link(&sources(&vs, PASSTHROUGH_FRAGMENT)).unwrap();
        assert!(resolve_transform_uniforms(&iface).is_ok());
        assert_eq!(iface.find_uniform("normalMatrix").unwrap().binding, 3);
    }

    // ── compile / link failures ───────────────────────────────────────────

    #[test]
    fn syntax_error_is_a_compile_error() {
        let err = ProgramInterface::link(&sources("fn vs_main( {", PASSTHROUGH_FRAGMENT))
            .unwrap_err();
        match err {
            ShaderError::Compile { path, message } => {
                assert!(path.ends_with("test.vert.wgsl"));
                assert!(!message.is_empty());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_entry_point_is_a_link_error() {
        let vs = vertex_with(&[(WORLD_MATRIX, 0)]).replace("vs_main", "main");
        let err = ProgramInterface::link(&sources(&vs, PASSTHROUGH_FRAGMENT)).unwrap_err();
        assert!(matches!(err, ShaderError::Link(ref m) if m.contains("vs_main")), "{err}");
    }

    #[test]
    fn non_matrix_uniform_is_rejected() {
        let vs = format!(
            "@group(0) @binding(0) var<uniform> tint: vec4<f32>;\n{}",
            vertex_with(&[])
        );
        let err = ProgramInterface::link(&sources(&vs, PASSTHROUGH_FRAGMENT)).unwrap_err();
        assert!(matches!(err, ShaderError::Link(ref m) if m.contains("tint")), "{err}");
    }

    #[test]
    fn conflicting_stage_bindings_are_rejected() {
        let fs = format!(
            "@group(0) @binding(5) var<uniform> {WORLD_MATRIX}: mat4x4<f32>;\n{PASSTHROUGH_FRAGMENT}"
        );
        let vs = vertex_with(&[(WORLD_MATRIX, 0)]);
        let err = ProgramInterface::link(&sources(&vs, &fs)).unwrap_err();
        assert!(matches!(err, ShaderError::Link(_)), "{err}");
    }

    // ── stage interfaces ──────────────────────────────────────────────────

    #[test]
    fn vertex_input_of_the_wrong_type_is_rejected() {
        let vs = r#"
@vertex
fn vs_main(@location(0) p: vec4<u32>) -> @builtin(position) vec4<f32> {
    return vec4<f32>(p);
}
"#;
        let err = ProgramInterface::link(&sources(vs, PASSTHROUGH_FRAGMENT)).unwrap_err();
        assert!(
            matches!(err, ShaderError::Link(ref m) if m.contains("@location(0)") && m.contains("Float32x3")),
            "{err}"
        );
    }

    #[test]
    fn vertex_input_without_attribute_is_rejected() {
        let vs = r#"
@vertex
fn vs_main(@location(0) p: vec3<f32>, @location(7) q: vec2<f32>) -> @builtin(position) vec4<f32> {
    return vec4<f32>(p.xy + q, p.z, 1.0);
}
"#;
        let err = ProgramInterface::link(&sources(vs, PASSTHROUGH_FRAGMENT)).unwrap_err();
        assert!(
            matches!(err, ShaderError::Link(ref m) if m.contains("'q'") && m.contains("@location(7)")),
            "{err}"
        );
    }

    #[test]
    fn fragment_input_not_written_by_vertex_stage_is_rejected() {
        let fs = r#"
@fragment
fn fs_main(@location(3) tint: vec3<f32>) -> @location(0) vec4<f32> {
    return vec4<f32>(tint, 1.0);
}
"#;
        let vs = vertex_with(&[]);
        let err = ProgramInterface::link(&sources(&vs, fs)).unwrap_err();
        assert!(
            matches!(err, ShaderError::Link(ref m) if m.contains("'tint'") && m.contains("@location(3)")),
            "{err}"
        );
    }

    #[test]
    fn stage_types_must_agree_at_each_location() {
        let vs = r#"
struct Out {
    @builtin(position) position: vec4<f32>,
    @location(0) color: vec3<f32>,
};

@vertex
fn vs_main(@location(0) p: vec3<f32>) -> Out {
    var out: Out;
    out.position = vec4<f32>(p, 1.0);
    out.color = p;
    return out;
}
"#;
        let fs = r#"
@fragment
fn fs_main(@location(0) color: vec4<f32>) -> @location(0) vec4<f32> {
    return color;
}
"#;
        let err = ProgramInterface::link(&sources(vs, fs)).unwrap_err();
        assert!(matches!(err, ShaderError::Link(ref m) if m.contains("different types")), "{err}");
    }

    #[test]
    fn shared_uniform_merges_stage_visibility() {
        let fs = format!(
            "@group(0) @binding(0) var<uniform> {WORLD_MATRIX}: mat4x4<f32>;\n{PASSTHROUGH_FRAGMENT}"
        );
        let vs = vertex_with(&[(WORLD_MATRIX, 0)]);
        let iface = ProgramInterface::link(&sources(&vs, &fs)).unwrap();
        assert_eq!(
            iface.uniforms()[0].stages,
            wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT
        );
    }
}
