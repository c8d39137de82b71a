use std::collections::HashSet;

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use peakbars_geometry::{GeometryId, LineSegments, MeshData};
use peakbars_render::{Frame, Lighting, Primitive, Renderable};
use wgpu::util::DeviceExt;

use crate::cache::GeometryCache;
use crate::shaders;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
    ambient: [f32; 4],
    light_dir: [f32; 4],
    light_color: [f32; 4],
}

impl Uniforms {
    fn new(view_proj: Mat4, lighting: &Lighting) -> Self {
        let ambient = lighting.ambient.color.scaled(lighting.ambient.intensity);
        let directional = lighting.directional.color.scaled(lighting.directional.intensity);
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            ambient: ambient.to_array(),
            light_dir: lighting.directional.direction().extend(0.0).to_array(),
            light_color: directional.to_array(),
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Vertex {
    position: [f32; 3],
    normal: [f32; 3],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct LineVertex {
    position: [f32; 3],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct InstanceData {
    model_0: [f32; 4],
    model_1: [f32; 4],
    model_2: [f32; 4],
    model_3: [f32; 4],
    color: [f32; 4],
}

impl InstanceData {
    fn new(item: &dyn Renderable) -> Self {
        let cols = item.world_matrix().to_cols_array_2d();
        Self {
            model_0: cols[0],
            model_1: cols[1],
            model_2: cols[2],
            model_3: cols[3],
            color: item.color().to_array(),
        }
    }
}

fn mesh_vertices(mesh: &MeshData) -> Vec<Vertex> {
    let flat;
    let mesh = if mesh.is_indexed() {
        flat = mesh.to_non_indexed();
        &flat
    } else {
        mesh
    };
    mesh.positions
        .iter()
        .enumerate()
        .map(|(i, p)| Vertex {
            position: p.to_array(),
            normal: mesh.normals.get(i).map_or([0.0; 3], |n| n.to_array()),
        })
        .collect()
}

fn line_vertices(lines: &LineSegments) -> Vec<LineVertex> {
    lines
        .positions
        .iter()
        .map(|p| LineVertex {
            position: p.to_array(),
        })
        .collect()
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum DrawKind {
    Mesh,
    Lines,
}

/// GPU copy of one geometry.
struct GpuGeometry {
    kind: DrawKind,
    vertex_buffer: Option<wgpu::Buffer>,
    vertex_count: u32,
}

impl GpuGeometry {
    fn upload(device: &wgpu::Device, id: GeometryId, primitive: Primitive<'_>) -> Self {
        let label = format!("geometry_{}", id.short());
        let (kind, contents, vertex_count): (DrawKind, Vec<u8>, usize) = match primitive {
            Primitive::Triangles(mesh) => {
                let verts = mesh_vertices(mesh);
                (DrawKind::Mesh, bytemuck::cast_slice(&verts).to_vec(), verts.len())
            }
            Primitive::Lines(lines) => {
                let verts = line_vertices(lines);
                (DrawKind::Lines, bytemuck::cast_slice(&verts).to_vec(), verts.len())
            }
        };
        // wgpu rejects zero-sized buffers; empty geometry simply draws nothing.
        let vertex_buffer = (!contents.is_empty()).then(|| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&label),
                contents: &contents,
                usage: wgpu::BufferUsages::VERTEX,
            })
        });
        tracing::debug!(geometry = %id.short(), vertex_count, "geometry uploaded");
        Self {
            kind,
            vertex_buffer,
            vertex_count: vertex_count as u32,
        }
    }

    fn release(self, id: GeometryId) {
        if let Some(buffer) = self.vertex_buffer {
            buffer.destroy();
        }
        tracing::debug!(geometry = %id.short(), "geometry released");
    }
}

/// wgpu-based chart renderer.
pub struct WgpuRenderer {
    mesh_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    overlay_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    instance_buffer: wgpu::Buffer,
    max_instances: u32,
    geometry: GeometryCache<GpuGeometry>,
    depth_texture: wgpu::TextureView,
}

impl WgpuRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("uniform_buffer"),
            contents: bytemuck::bytes_of(&Uniforms::new(Mat4::IDENTITY, &Lighting::default())),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uniform_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("uniform_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let instance_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceData>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &wgpu::vertex_attr_array![
                2 => Float32x4,
                3 => Float32x4,
                4 => Float32x4,
                5 => Float32x4,
                6 => Float32x4,
            ],
        };
        let color_targets = [Some(wgpu::ColorTargetState {
            format: surface_format,
            blend: Some(wgpu::BlendState::REPLACE),
            write_mask: wgpu::ColorWrites::ALL,
        })];
        let depth_tested = wgpu::DepthStencilState {
            format: wgpu::TextureFormat::Depth32Float,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: Default::default(),
            bias: Default::default(),
        };

        let mesh_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("mesh_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::MESH_SHADER.into()),
        });

        let mesh_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("mesh_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &mesh_shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<Vertex>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![
                            0 => Float32x3,
                            1 => Float32x3,
                        ],
                    },
                    instance_layout.clone(),
                ],
            },
            fragment: Some(wgpu::FragmentState {
                module: &mesh_shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &color_targets,
            }),
            // Bars are thin slabs seen from both sides; no culling.
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(depth_tested.clone()),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        let line_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("line_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::LINE_SHADER.into()),
        });

        let line_pipeline_with = |label: &str, depth: wgpu::DepthStencilState| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &line_shader,
                    entry_point: Some("vs_line"),
                    compilation_options: Default::default(),
                    buffers: &[
                        wgpu::VertexBufferLayout {
                            array_stride: std::mem::size_of::<LineVertex>() as u64,
                            step_mode: wgpu::VertexStepMode::Vertex,
                            attributes: &wgpu::vertex_attr_array![0 => Float32x3],
                        },
                        instance_layout.clone(),
                    ],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &line_shader,
                    entry_point: Some("fs_line"),
                    compilation_options: Default::default(),
                    targets: &color_targets,
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::LineList,
                    ..Default::default()
                },
                depth_stencil: Some(depth),
                multisample: Default::default(),
                multiview: None,
                cache: None,
            })
        };

        let line_pipeline = line_pipeline_with("line_pipeline", depth_tested.clone());
        let overlay_pipeline = line_pipeline_with(
            "overlay_pipeline",
            wgpu::DepthStencilState {
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::Always,
                ..depth_tested
            },
        );

        // Instance buffer (pre-allocated)
        let max_instances = 1_024u32;
        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("instance_buffer"),
            size: (max_instances as u64) * std::mem::size_of::<InstanceData>() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let depth_texture = Self::create_depth_texture(device, width, height);

        Self {
            mesh_pipeline,
            line_pipeline,
            overlay_pipeline,
            uniform_buffer,
            uniform_bind_group,
            instance_buffer,
            max_instances,
            geometry: GeometryCache::new(),
            depth_texture,
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height);
    }

    /// Render one frame into `view`.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        frame: &Frame<'_>,
    ) {
        // Release geometry the frame no longer references before uploading.
        let live: HashSet<GeometryId> = frame.items.iter().map(|item| item.geometry_id()).collect();
        let stale = self.geometry.evict_stale(&live);
        if !stale.is_empty() {
            let evicted = stale.len();
            for (id, geometry) in stale {
                geometry.release(id);
            }
            tracing::debug!(evicted, resident = self.geometry.len(), "stale geometry evicted");
        }

        let items: Vec<&dyn Renderable> = frame
            .visible_items()
            .take(self.max_instances as usize)
            .collect();
        for item in &items {
            self.geometry
                .get_or_insert_with(item.geometry_id(), || {
                    GpuGeometry::upload(device, item.geometry_id(), item.primitive())
                });
        }

        queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&Uniforms::new(frame.camera.view_projection(), frame.lighting)),
        );
        let instances: Vec<InstanceData> = items.iter().map(|item| InstanceData::new(*item)).collect();
        if !instances.is_empty() {
            queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        {
            let bg = frame.background;
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: bg.r as f64,
                            g: bg.g as f64,
                            b: bg.b as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            pass.set_vertex_buffer(1, self.instance_buffer.slice(..));

            for (instance, item) in items.iter().enumerate() {
                let Some(gpu) = self.geometry.get(item.geometry_id()) else {
                    continue;
                };
                let Some(buffer) = &gpu.vertex_buffer else {
                    continue;
                };
                let pipeline = match (gpu.kind, item.depth_tested()) {
                    (DrawKind::Mesh, _) => &self.mesh_pipeline,
                    (DrawKind::Lines, true) => &self.line_pipeline,
                    (DrawKind::Lines, false) => &self.overlay_pipeline,
                };
                let instance = instance as u32;
                pass.set_pipeline(pipeline);
                pass.set_vertex_buffer(0, buffer.slice(..));
                pass.draw(0..gpu.vertex_count, instance..instance + 1);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
    }

    fn create_depth_texture(
        device: &wgpu::Device,
        width: u32,
        height: u32,
    ) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{UVec3, Vec3};
    use peakbars_common::Color;
    use peakbars_geometry::box_geometry;

    #[test]
    fn indexed_meshes_are_expanded() {
        let mesh = box_geometry(1.0, 1.0, 1.0, UVec3::ONE);
        let verts = mesh_vertices(&mesh);
        assert_eq!(verts.len(), 36);
        assert_eq!(verts[0].normal, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn missing_normals_are_zero() {
        let mesh = MeshData {
            positions: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            normals: Vec::new(),
            indices: None,
        };
        assert!(mesh_vertices(&mesh).iter().all(|v| v.normal == [0.0; 3]));
    }

    #[test]
    fn uniforms_pack_lighting() {
        let u = Uniforms::new(Mat4::IDENTITY, &Lighting::default());
        assert_eq!(u.ambient, [0.75, 0.75, 0.75, 1.0]);
        assert_eq!(u.light_color, [0.25, 0.25, 0.25, 1.0]);
        let dir = Vec3::from_slice(&u.light_dir[..3]);
        assert!((dir.length() - 1.0).abs() < 1e-6);
        assert_eq!(std::mem::size_of::<Uniforms>(), 112);
    }

    #[test]
    fn instance_carries_transform_and_color() {
        let mut grid = peakbars_render::LineNode::new(
            "grid",
            LineSegments::grid(2.0, 2),
            Color::from_hex(0x800000),
        );
        grid.transform.position = Vec3::new(0.0, 0.0, 0.25);
        let instance = InstanceData::new(&grid);
        assert_eq!(instance.model_3, [0.0, 0.0, 0.25, 1.0]);
        assert_eq!(instance.color, Color::from_hex(0x800000).to_array());
        assert_eq!(line_vertices(&grid.lines).len(), 12);
    }
}
