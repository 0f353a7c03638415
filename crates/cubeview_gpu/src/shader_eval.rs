//! Runs the WGSL entry points on the CPU by walking their naga IR.
//!
//! Covers the handful of constructs the shaders in `src/shaders/` use:
//! struct field access, vector construction, float arithmetic, a matrix
//! times a vector, stores into a local struct, and `textureSample`, whose
//! result is reported as the coordinate it samples at.

use std::collections::HashMap;

use naga::valid::{Capabilities, ValidationFlags, Validator};
use naga::{BinaryOperator, Expression, Handle, Literal, Module, Statement, TypeInner};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Value {
    Scalar(f32),
    Vector(Vec<f32>),
    /// Columns.
    Matrix(Vec<Vec<f32>>),
    Struct(Vec<Value>),
    /// `textureSample` at this coordinate.
    Sample(Vec<f32>),
}

/// Parse and validate a WGSL module, panicking with the diagnostic.
pub(crate) fn parse(source: &str) -> Module {
    let module = naga::front::wgsl::parse_str(source)
        .unwrap_or_else(|e| panic!("{}", e.emit_to_string(source)));
    Validator::new(ValidationFlags::all(), Capabilities::default())
        .validate(&module)
        .unwrap_or_else(|e| panic!("validation failed: {:?}", e));
    module
}

pub(crate) fn entry_point<'a>(module: &'a Module, name: &str) -> &'a naga::EntryPoint {
    module
        .entry_points
        .iter()
        .find(|ep| ep.name == name)
        .unwrap_or_else(|| panic!("no entry point {}", name))
}

fn zero(module: &Module, ty: Handle<naga::Type>) -> Value {
    match module.types[ty].inner {
        TypeInner::Scalar(_) => Value::Scalar(0.0),
        TypeInner::Vector { size, .. } => Value::Vector(vec![0.0; size as usize]),
        TypeInner::Matrix { columns, rows, .. } => {
            Value::Matrix(vec![vec![0.0; rows as usize]; columns as usize])
        }
        TypeInner::Struct { ref members, .. } => {
            Value::Struct(members.iter().map(|m| zero(module, m.ty)).collect())
        }
        ref other => panic!("no value for type {:?}", other),
    }
}

/// Struct of type `ty` with the named fields set and the rest zeroed.
fn struct_value(module: &Module, ty: Handle<naga::Type>, fields: &[(&str, Value)]) -> Value {
    let TypeInner::Struct { ref members, .. } = module.types[ty].inner else {
        panic!("{:?} is not a struct", module.types[ty].name);
    };
    for (name, _) in fields {
        assert!(
            members.iter().any(|m| m.name.as_deref() == Some(*name)),
            "struct {:?} has no field {}",
            module.types[ty].name,
            name
        );
    }
    Value::Struct(
        members
            .iter()
            .map(|m| {
                fields
                    .iter()
                    .find(|(name, _)| m.name.as_deref() == Some(*name))
                    .map(|(_, value)| value.clone())
                    .unwrap_or_else(|| zero(module, m.ty))
            })
            .collect(),
    )
}

fn binary(op: BinaryOperator, left: Value, right: Value) -> Value {
    let apply = |a: f32, b: f32| match op {
        BinaryOperator::Add => a + b,
        BinaryOperator::Subtract => a - b,
        BinaryOperator::Multiply => a * b,
        BinaryOperator::Divide => a / b,
        other => panic!("unsupported operator {:?}", other),
    };
    match (left, right) {
        (Value::Scalar(a), Value::Scalar(b)) => Value::Scalar(apply(a, b)),
        (Value::Vector(a), Value::Vector(b)) => {
            assert_eq!(a.len(), b.len());
            Value::Vector(a.iter().zip(&b).map(|(x, y)| apply(*x, *y)).collect())
        }
        (Value::Scalar(a), Value::Vector(b)) => {
            Value::Vector(b.iter().map(|y| apply(a, *y)).collect())
        }
        (Value::Vector(a), Value::Scalar(b)) => {
            Value::Vector(a.iter().map(|x| apply(*x, b)).collect())
        }
        (Value::Matrix(columns), Value::Vector(v)) if op == BinaryOperator::Multiply => {
            assert_eq!(columns.len(), v.len());
            let mut out = vec![0.0; columns[0].len()];
            for (column, x) in columns.iter().zip(&v) {
                for (o, c) in out.iter_mut().zip(column) {
                    *o += c * x;
                }
            }
            Value::Vector(out)
        }
        (left, right) => panic!("unsupported {:?} {:?} {:?}", left, op, right),
    }
}

/// One invocation of an entry point.
pub(crate) struct Invocation<'a> {
    module: &'a Module,
    function: &'a naga::Function,
    arguments: Vec<Value>,
    globals: HashMap<Handle<naga::GlobalVariable>, Value>,
    locals: HashMap<Handle<naga::LocalVariable>, Value>,
}

impl<'a> Invocation<'a> {
    pub(crate) fn new(module: &'a Module, entry: &str) -> Self {
        let function = &entry_point(module, entry).function;
        let arguments = function
            .arguments
            .iter()
            .map(|arg| zero(module, arg.ty))
            .collect();
        Self {
            module,
            function,
            arguments,
            globals: HashMap::new(),
            locals: HashMap::new(),
        }
    }

    /// Set fields of the struct passed as the first argument.
    pub(crate) fn input(mut self, fields: &[(&str, Value)]) -> Self {
        let ty = self.function.arguments[0].ty;
        self.arguments[0] = struct_value(self.module, ty, fields);
        self
    }

    /// Set fields of the uniform struct bound as global `name`.
    pub(crate) fn uniform(mut self, name: &str, fields: &[(&str, Value)]) -> Self {
        let (handle, global) = self
            .module
            .global_variables
            .iter()
            .find(|(_, g)| g.name.as_deref() == Some(name))
            .unwrap_or_else(|| panic!("no global {}", name));
        let value = struct_value(self.module, global.ty, fields);
        self.globals.insert(handle, value);
        self
    }

    pub(crate) fn run(mut self) -> Value {
        let function = self.function;
        for (handle, local) in function.local_variables.iter() {
            let value = match local.init {
                Some(init) => self.eval(init),
                None => zero(self.module, local.ty),
            };
            self.locals.insert(handle, value);
        }
        self.exec(&function.body)
            .expect("entry point returned no value")
    }

    /// Run an entry point that returns a struct, keyed by field name.
    pub(crate) fn run_struct(self) -> HashMap<String, Value> {
        let module = self.module;
        let ty = self
            .function
            .result
            .as_ref()
            .expect("entry point has no result")
            .ty;
        let TypeInner::Struct { ref members, .. } = module.types[ty].inner else {
            panic!("result is not a struct");
        };
        let Value::Struct(values) = self.run() else {
            panic!("result value is not a struct");
        };
        members
            .iter()
            .map(|m| m.name.clone().unwrap_or_default())
            .zip(values)
            .collect()
    }

    fn exec(&mut self, block: &'a naga::Block) -> Option<Value> {
        for statement in block.iter() {
            match *statement {
                Statement::Emit(_) => {}
                Statement::Block(ref inner) => {
                    if let Some(value) = self.exec(inner) {
                        return Some(value);
                    }
                }
                Statement::Store { pointer, value } => {
                    let value = self.eval(value);
                    self.store(pointer, value);
                }
                Statement::Return { value } => return value.map(|v| self.eval(v)),
                ref other => panic!("unsupported statement {:?}", other),
            }
        }
        None
    }

    fn store(&mut self, pointer: Handle<Expression>, value: Value) {
        let mut path = Vec::new();
        let mut current = pointer;
        let local = loop {
            match self.function.expressions[current] {
                Expression::LocalVariable(local) => break local,
                Expression::AccessIndex { base, index } => {
                    path.push(index as usize);
                    current = base;
                }
                ref other => panic!("unsupported store target {:?}", other),
            }
        };

        let mut slot = self.locals.get_mut(&local).expect("unknown local");
        for index in path.into_iter().rev() {
            slot = match slot {
                Value::Struct(members) => &mut members[index],
                other => panic!("cannot store into {:?}", other),
            };
        }
        *slot = value;
    }

    fn eval(&self, handle: Handle<Expression>) -> Value {
        match self.function.expressions[handle] {
            Expression::Literal(literal) => Value::Scalar(match literal {
                Literal::F32(v) => v,
                Literal::AbstractFloat(v) => v as f32,
                Literal::I32(v) => v as f32,
                Literal::U32(v) => v as f32,
                Literal::AbstractInt(v) => v as f32,
                other => panic!("unsupported literal {:?}", other),
            }),
            Expression::FunctionArgument(index) => self.arguments[index as usize].clone(),
            Expression::GlobalVariable(global) => {
                self.globals.get(&global).cloned().unwrap_or_else(|| {
                    let name = &self.module.global_variables[global].name;
                    panic!("global {:?} read without a value", name)
                })
            }
            Expression::LocalVariable(local) => self.locals[&local].clone(),
            Expression::Load { pointer } => self.eval(pointer),
            Expression::AccessIndex { base, index } => match self.eval(base) {
                Value::Struct(mut members) => members.swap_remove(index as usize),
                Value::Vector(v) => Value::Scalar(v[index as usize]),
                Value::Matrix(mut columns) => Value::Vector(columns.swap_remove(index as usize)),
                other => panic!("cannot index {:?}", other),
            },
            Expression::Compose { ref components, .. } => {
                let mut out = Vec::new();
                for &component in components {
                    match self.eval(component) {
                        Value::Scalar(s) => out.push(s),
                        Value::Vector(v) => out.extend(v),
                        other => panic!("cannot compose {:?}", other),
                    }
                }
                Value::Vector(out)
            }
            Expression::Splat { size, value } => match self.eval(value) {
                Value::Scalar(s) => Value::Vector(vec![s; size as usize]),
                other => panic!("cannot splat {:?}", other),
            },
            Expression::Binary { op, left, right } => {
                binary(op, self.eval(left), self.eval(right))
            }
            Expression::ImageSample { coordinate, .. } => match self.eval(coordinate) {
                Value::Vector(uv) => Value::Sample(uv),
                other => panic!("bad sample coordinate {:?}", other),
            },
            ref other => panic!("unsupported expression {:?}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings::{cropped_quad, mesh, quad};
    use crate::reference;
    use crate::uniform::{RotationUniform, VisibleRect};
    use crate::vertex::{MeshVertex, QuadVertex, CUBE_VERTICES, FULLSCREEN_QUAD};
    use glam::{Mat4, Vec2, Vec4};
    use naga::{
        AddressSpace, Binding, ImageClass, ImageDimension, ResourceBinding, ScalarKind,
        ShaderStage,
    };

    const QUAD_WGSL: &str = include_str!("shaders/quad.wgsl");
    const MESH_WGSL: &str = include_str!("shaders/mesh.wgsl");
    const CROPPED_QUAD_WGSL: &str = include_str!("shaders/cropped_quad.wgsl");

    #[derive(Debug, PartialEq)]
    enum Resource {
        Uniform(usize),
        Texture2d,
        Sampler,
    }

    fn vector(v: &[f32]) -> Value {
        Value::Vector(v.to_vec())
    }

    fn vec4(v: Vec4) -> Value {
        vector(&v.to_array())
    }

    fn sample(uv: Vec2) -> Value {
        Value::Sample(uv.to_array().to_vec())
    }

    fn quad_input(v: &QuadVertex) -> Vec<(&'static str, Value)> {
        vec![
            ("position", vector(&v.position)),
            ("color", vector(&v.color)),
            ("tex_coords", vector(&v.tex_coords)),
        ]
    }

    fn fragment_input(color: Vec4, tex_coords: Vec2) -> Vec<(&'static str, Value)> {
        vec![
            ("clip_position", vec4(Vec4::new(0.0, 0.0, 0.5, 1.0))),
            ("color", vec4(color)),
            ("tex_coords", vector(&tex_coords.to_array())),
        ]
    }

    fn visible_rect(r: &VisibleRect) -> Vec<(&'static str, Value)> {
        vec![
            ("min_x", Value::Scalar(r.min_x)),
            ("min_y", Value::Scalar(r.min_y)),
            ("max_x", Value::Scalar(r.max_x)),
            ("max_y", Value::Scalar(r.max_y)),
        ]
    }

    fn rotation(r: &RotationUniform) -> Vec<(&'static str, Value)> {
        let columns = r.matrix.iter().map(|c| c.to_vec()).collect();
        vec![("matrix", Value::Matrix(columns))]
    }

    fn resources(module: &Module) -> HashMap<String, (ResourceBinding, Resource)> {
        module
            .global_variables
            .iter()
            .filter_map(|(_, global)| {
                let binding = global.binding.clone()?;
                let inner = &module.types[global.ty].inner;
                let resource = match (global.space, inner) {
                    (AddressSpace::Uniform, inner) => {
                        Resource::Uniform(inner.size(module.to_ctx()) as usize)
                    }
                    (
                        AddressSpace::Handle,
                        TypeInner::Image {
                            dim: ImageDimension::D2,
                            arrayed: false,
                            class:
                                ImageClass::Sampled {
                                    kind: ScalarKind::Float,
                                    multi: false,
                                },
                        },
                    ) => Resource::Texture2d,
                    (AddressSpace::Handle, TypeInner::Sampler { comparison: false }) => {
                        Resource::Sampler
                    }
                    (space, inner) => panic!("unexpected global {:?} {:?}", space, inner),
                };
                Some((global.name.clone().unwrap_or_default(), (binding, resource)))
            })
            .collect()
    }

    fn bound(group: u32, binding: u32, resource: Resource) -> (ResourceBinding, Resource) {
        (ResourceBinding { group, binding }, resource)
    }

    /// `(location, bytes)` of every vertex input of `vs_main`.
    fn vertex_inputs(module: &Module) -> Vec<(u32, u64)> {
        let vs = entry_point(module, "vs_main");
        let mut inputs = Vec::new();
        for arg in &vs.function.arguments {
            let TypeInner::Struct { ref members, .. } = module.types[arg.ty].inner else {
                panic!("vertex input is not a struct");
            };
            for member in members {
                let Some(Binding::Location { location, .. }) = member.binding else {
                    panic!("vertex input {:?} has no location", member.name);
                };
                let TypeInner::Vector { size, scalar } = module.types[member.ty].inner else {
                    panic!("vertex input {:?} is not a vector", member.name);
                };
                assert_eq!(scalar, naga::Scalar::F32);
                inputs.push((location, size as u64 * 4));
            }
        }
        inputs.sort();
        inputs
    }

    fn layout_inputs(layout: wgpu::VertexBufferLayout<'_>) -> Vec<(u32, u64)> {
        let mut inputs: Vec<_> = layout
            .attributes
            .iter()
            .map(|a| (a.shader_location, a.format.size()))
            .collect();
        inputs.sort();
        inputs
    }

    #[test]
    fn test_entry_points_and_color_output() {
        for source in [QUAD_WGSL, MESH_WGSL, CROPPED_QUAD_WGSL] {
            let module = parse(source);
            let stages: Vec<_> = module
                .entry_points
                .iter()
                .map(|ep| (ep.name.as_str(), ep.stage))
                .collect();
            assert_eq!(
                stages,
                vec![("vs_main", ShaderStage::Vertex), ("fs_main", ShaderStage::Fragment)]
            );

            let result = entry_point(&module, "fs_main")
                .function
                .result
                .as_ref()
                .unwrap();
            assert!(matches!(
                result.binding,
                Some(Binding::Location { location: 0, .. })
            ));
            assert!(matches!(
                module.types[result.ty].inner,
                TypeInner::Vector {
                    size: naga::VectorSize::Quad,
                    scalar: naga::Scalar::F32,
                }
            ));
        }
    }

    #[test]
    fn test_resource_bindings_match_constants() {
        let found = resources(&parse(QUAD_WGSL));
        assert_eq!(found.len(), 3);
        assert_eq!(
            found["rotation"],
            bound(
                quad::GROUP,
                quad::ROTATION_BINDING,
                Resource::Uniform(std::mem::size_of::<RotationUniform>())
            )
        );
        assert_eq!(
            found["t_diffuse"],
            bound(quad::GROUP, quad::TEXTURE_BINDING, Resource::Texture2d)
        );
        assert_eq!(
            found["s_diffuse"],
            bound(quad::GROUP, quad::SAMPLER_BINDING, Resource::Sampler)
        );

        let found = resources(&parse(MESH_WGSL));
        assert_eq!(found.len(), 1);
        assert_eq!(
            found["rotation"],
            bound(
                mesh::GROUP,
                mesh::ROTATION_BINDING,
                Resource::Uniform(std::mem::size_of::<RotationUniform>())
            )
        );

        let found = resources(&parse(CROPPED_QUAD_WGSL));
        assert_eq!(found.len(), 3);
        assert_eq!(
            found["t_diffuse"],
            bound(cropped_quad::GROUP, cropped_quad::TEXTURE_BINDING, Resource::Texture2d)
        );
        assert_eq!(
            found["s_diffuse"],
            bound(cropped_quad::GROUP, cropped_quad::SAMPLER_BINDING, Resource::Sampler)
        );
        assert_eq!(
            found["visible"],
            bound(
                cropped_quad::GROUP,
                cropped_quad::VISIBLE_RECT_BINDING,
                Resource::Uniform(std::mem::size_of::<VisibleRect>())
            )
        );
    }

    #[test]
    fn test_vertex_inputs_match_buffer_layouts() {
        let quad_layout = layout_inputs(QuadVertex::desc());
        assert_eq!(vertex_inputs(&parse(QUAD_WGSL)), quad_layout);
        assert_eq!(vertex_inputs(&parse(CROPPED_QUAD_WGSL)), quad_layout);
        assert_eq!(
            vertex_inputs(&parse(MESH_WGSL)),
            layout_inputs(MeshVertex::desc())
        );
    }

    #[test]
    fn test_quad_vertex_stages_agree_with_each_other() {
        let quad = parse(QUAD_WGSL);
        let cropped = parse(CROPPED_QUAD_WGSL);

        let mut vertices = FULLSCREEN_QUAD.to_vec();
        vertices.push(QuadVertex {
            position: [0.25, -0.75],
            color: [0.1, 0.2, 0.3, 0.4],
            tex_coords: [0.3, 0.6],
        });

        for vertex in &vertices {
            let expected = reference::quad_vertex(vertex);
            for module in [&quad, &cropped] {
                let out = Invocation::new(module, "vs_main")
                    .input(&quad_input(vertex))
                    .run_struct();
                assert_eq!(
                    out["clip_position"],
                    vector(&[vertex.position[0], vertex.position[1], 0.0, 1.0])
                );
                assert_eq!(out["clip_position"], vec4(expected.clip_position));
                assert_eq!(out["color"], vec4(expected.color));
                assert_eq!(out["tex_coords"], vector(&vertex.tex_coords));
            }
        }
    }

    #[test]
    fn test_mesh_vertex_stage_multiplies_by_matrix() {
        let module = parse(MESH_WGSL);
        let uniform = RotationUniform::from_mat4(Mat4::from_cols_array(&[
            1.0, 2.0, 3.0, 4.0, //
            5.0, 6.0, 7.0, 8.0, //
            9.0, 10.0, 11.0, 12.0, //
            13.0, 14.0, 15.0, 16.0,
        ]));

        for vertex in &CUBE_VERTICES {
            let out = Invocation::new(&module, "vs_main")
                .input(&[
                    ("position", vector(&vertex.position)),
                    ("color", vector(&vertex.color)),
                ])
                .uniform("rotation", &rotation(&uniform))
                .run_struct();
            let expected = reference::mesh_vertex(vertex, &uniform);
            assert_eq!(out["clip_position"], vec4(expected.clip_position));
            assert_eq!(out["color"], vector(&vertex.color));
        }
    }

    #[test]
    fn test_mesh_fragment_returns_color() {
        let module = parse(MESH_WGSL);
        let color = Vec4::new(0.123, 0.456, 0.789, 0.5);
        let out = Invocation::new(&module, "fs_main")
            .input(&fragment_input(color, Vec2::ZERO)[..2])
            .run();
        assert_eq!(out, vec4(color));
    }

    #[test]
    fn test_quad_fragment_samples_tex_coords_only() {
        let module = parse(QUAD_WGSL);
        let uv = Vec2::new(0.6, 0.3);
        for color in [Vec4::ZERO, Vec4::ONE, Vec4::new(1.0, 0.0, 0.5, 0.25)] {
            let out = Invocation::new(&module, "fs_main")
                .input(&fragment_input(color, uv))
                .run();
            assert_eq!(out, sample(uv));
        }
    }

    #[test]
    fn test_cropped_fragment_remaps_into_visible_rect() {
        let module = parse(CROPPED_QUAD_WGSL);
        let run = |visible: &VisibleRect, color: Vec4, uv: Vec2| {
            Invocation::new(&module, "fs_main")
                .input(&fragment_input(color, uv))
                .uniform("visible", &visible_rect(visible))
                .run()
        };

        let visible = VisibleRect::new(0.2, 0.3, 0.8, 0.9);
        assert_eq!(
            run(&visible, Vec4::ONE, Vec2::ZERO),
            sample(Vec2::new(0.2, 0.3))
        );
        let Value::Sample(far) = run(&visible, Vec4::ONE, Vec2::ONE) else {
            panic!("fs_main does not return a texture sample");
        };
        assert!(Vec2::new(far[0], far[1]).abs_diff_eq(Vec2::new(0.8, 0.9), 1e-6));

        for i in 0..=4 {
            for j in 0..=4 {
                let uv = Vec2::new(i as f32 / 4.0, j as f32 / 4.0);
                let expected = reference::remap_tex_coords(uv, &visible);
                assert_eq!(run(&visible, Vec4::ZERO, uv), sample(expected));
                assert_eq!(run(&VisibleRect::FULL, Vec4::ONE, uv), sample(uv));
            }
        }
    }
}
