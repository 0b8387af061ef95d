use std::sync::Arc;
use wgpu::util::DeviceExt;
use winit::window::Window;
use crate::app::HudInfo;
use crate::camera::Camera;
use crate::mesh::{self, Mesh};
use crate::types::{CameraUniform, InstanceData, Vertex};

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 39.0 / 255.0,
    g: 40.0 / 255.0,
    b: 34.0 / 255.0,
    a: 1.0,
};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Geometry uploaded once and drawn instanced
struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl GpuMesh {
    fn upload(device: &wgpu::Device, mesh: &Mesh, label: &str) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Vertices", label)),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Indices", label)),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
        }
    }
}

/// Growable instance buffer rewritten every frame
struct InstanceBuffer {
    buffer: wgpu::Buffer,
    capacity: usize,
    len: u32,
    label: &'static str,
}

impl InstanceBuffer {
    fn new(device: &wgpu::Device, capacity: usize, label: &'static str) -> Self {
        Self {
            buffer: Self::allocate(device, capacity, label),
            capacity,
            len: 0,
            label,
        }
    }

    fn allocate(device: &wgpu::Device, capacity: usize, label: &str) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: (capacity.max(1) * std::mem::size_of::<InstanceData>()) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    fn write(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, instances: &[InstanceData]) {
        if instances.len() > self.capacity {
            self.capacity = instances.len().next_power_of_two();
            self.buffer = Self::allocate(device, self.capacity, self.label);
        }
        if !instances.is_empty() {
            queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(instances));
        }
        self.len = instances.len() as u32;
    }
}

/// One frame's worth of scene content
pub struct Frame<'a> {
    pub camera: &'a Camera,
    pub spheres: &'a [InstanceData],
    pub rings: &'a [InstanceData],
    pub wireframe: bool,
    pub hud: Option<&'a HudInfo>,
}

/// Rasterizes the solar system and the HUD overlay into the window surface
pub struct SceneRenderer {
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    fill_pipeline: wgpu::RenderPipeline,
    wireframe_pipeline: Option<wgpu::RenderPipeline>,
    sphere: GpuMesh,
    ring: GpuMesh,
    sphere_instances: InstanceBuffer,
    ring_instances: InstanceBuffer,
    egui_renderer: egui_wgpu::Renderer,
    egui_state: egui_winit::State,
    egui_ctx: egui::Context,
}

impl SceneRenderer {
    pub async fn new(window: Arc<Window>, tessellation: u32) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;
        let adapter = Self::request_adapter(&instance, &surface).await?;

        // wireframe needs line polygon mode, which not every adapter has
        let features = adapter.features() & wgpu::Features::POLYGON_MODE_LINE;
        let (device, queue) = Self::request_device(&adapter, features).await?;

        let config = Self::create_surface_config(&surface, &adapter, size)?;
        surface.configure(&device, &config);
        let depth_view = Self::create_depth_view(&device, &config);

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[Camera::default().to_uniform()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Camera Bind Group Layout"),
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

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let fill_pipeline =
            Self::create_scene_pipeline(&device, &camera_layout, config.format, wgpu::PolygonMode::Fill);
        let wireframe_pipeline = if features.contains(wgpu::Features::POLYGON_MODE_LINE) {
            Some(Self::create_scene_pipeline(
                &device,
                &camera_layout,
                config.format,
                wgpu::PolygonMode::Line,
            ))
        } else {
            log::warn!("Adapter lacks POLYGON_MODE_LINE; wireframe disabled");
            None
        };

        let tessellation = tessellation.clamp(3, mesh::MAX_TESSELLATION);
        let sphere = GpuMesh::upload(&device, &mesh::sphere(tessellation, tessellation / 2), "Sphere");
        let ring = GpuMesh::upload(
            &device,
            &mesh::torus(tessellation, tessellation / 2, 1.0, 0.3, 0.05),
            "Ring",
        );

        let sphere_instances = InstanceBuffer::new(&device, 16, "Sphere Instances");
        let ring_instances = InstanceBuffer::new(&device, 4, "Ring Instances");

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(
            &device,
            config.format,
            egui_wgpu::RendererOptions::default(),
        );

        log::info!(
            "Renderer initialized: {}x{}, {} sphere triangles, {} ring triangles",
            config.width,
            config.height,
            sphere.index_count / 3,
            ring.index_count / 3
        );

        Ok(Self {
            device,
            queue,
            surface,
            config,
            depth_view,
            camera_buffer,
            camera_bind_group,
            fill_pipeline,
            wireframe_pipeline,
            sphere,
            ring,
            sphere_instances,
            ring_instances,
            egui_renderer,
            egui_state,
            egui_ctx,
        })
    }

    async fn request_adapter(
        instance: &wgpu::Instance,
        surface: &wgpu::Surface<'_>,
    ) -> Result<wgpu::Adapter> {
        instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| format!("Failed to find appropriate adapter: {:?}", e).into())
    }

    async fn request_device(
        adapter: &wgpu::Adapter,
        features: wgpu::Features,
    ) -> Result<(wgpu::Device, wgpu::Queue)> {
        adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: features,
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
                experimental_features: Default::default(),
                trace: Default::default(),
            })
            .await
            .map_err(|e| e.into())
    }

    fn create_surface_config(
        surface: &wgpu::Surface,
        adapter: &wgpu::Adapter,
        size: winit::dpi::PhysicalSize<u32>,
    ) -> Result<wgpu::SurfaceConfiguration> {
        let surface_caps = surface.get_capabilities(adapter);
        let surface_format = preferred_format(&surface_caps.formats)
            .ok_or("Surface reports no supported formats")?;
        let present_mode = surface_caps
            .present_modes
            .first()
            .copied()
            .ok_or("Surface reports no present modes")?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .ok_or("Surface reports no alpha modes")?;

        Ok(wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        })
    }

    fn create_depth_view(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
    ) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: config.width,
                height: config.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    fn create_scene_pipeline(
        device: &wgpu::Device,
        camera_layout: &wgpu::BindGroupLayout,
        surface_format: wgpu::TextureFormat,
        polygon_mode: wgpu::PolygonMode,
    ) -> wgpu::RenderPipeline {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("scene.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[camera_layout],
            push_constant_ranges: &[],
        });

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(match polygon_mode {
                wgpu::PolygonMode::Fill => "Scene Pipeline",
                _ => "Wireframe Pipeline",
            }),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::layout(), InstanceData::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
    }

    pub fn supports_wireframe(&self) -> bool {
        self.wireframe_pipeline.is_some()
    }

    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_view = Self::create_depth_view(&self.device, &self.config);
    }

    /// Reconfigure after the surface was lost or became outdated
    pub fn reconfigure(&mut self) {
        self.resize(self.config.width, self.config.height);
    }

    pub fn handle_event(&mut self, window: &Window, event: &winit::event::WindowEvent) -> bool {
        self.egui_state.on_window_event(window, event).consumed
    }

    pub fn render(
        &mut self,
        window: &Window,
        frame: &Frame,
    ) -> std::result::Result<(), wgpu::SurfaceError> {
        let camera_uniform: CameraUniform = frame.camera.to_uniform();
        self.queue
            .write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&[camera_uniform]));
        self.sphere_instances
            .write(&self.device, &self.queue, frame.spheres);
        self.ring_instances.write(&self.device, &self.queue, frame.rings);

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Scene Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            let pipeline = match (&self.wireframe_pipeline, frame.wireframe) {
                (Some(wireframe), true) => wireframe,
                _ => &self.fill_pipeline,
            };
            render_pass.set_pipeline(pipeline);
            render_pass.set_bind_group(0, &self.camera_bind_group, &[]);

            // opaque spheres first so the translucent rings blend over them
            for (mesh, instances) in [
                (&self.sphere, &self.sphere_instances),
                (&self.ring, &self.ring_instances),
            ] {
                if instances.len == 0 {
                    continue;
                }
                render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                render_pass.set_vertex_buffer(1, instances.buffer.slice(..));
                render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..mesh.index_count, 0, 0..instances.len);
            }
        }

        if let Some(hud) = frame.hud {
            self.draw_hud(window, &mut encoder, &view, hud);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    fn draw_hud(
        &mut self,
        window: &Window,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        hud: &HudInfo,
    ) {
        let raw_input = self.egui_state.take_egui_input(window);
        let wireframe_available = self.supports_wireframe();

        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            egui::Window::new("Trackball")
                .title_bar(true)
                .resizable(false)
                .fixed_pos(egui::pos2(10.0, 10.0))
                .default_width(260.0)
                .show(ctx, |ui| {
                    ui.heading(
                        egui::RichText::new(format!("{:.0} FPS", hud.fps))
                            .size(24.0)
                            .color(egui::Color32::from_rgb(74, 158, 255)),
                    );

                    ui.add_space(5.0);
                    ui.separator();

                    ui.label(
                        egui::RichText::new("Camera")
                            .size(16.0)
                            .color(egui::Color32::from_rgb(100, 200, 100)),
                    );
                    ui.monospace(format!("Eye: ({:.2}, {:.2}, {:.2})", hud.eye.x, hud.eye.y, hud.eye.z));
                    ui.monospace(format!("At:  ({:.2}, {:.2}, {:.2})", hud.at.x, hud.at.y, hud.at.z));
                    ui.monospace(format!("Up:  ({:.2}, {:.2}, {:.2})", hud.up.x, hud.up.y, hud.up.z));
                    ui.monospace(format!("Distance: {:.2}", hud.distance));
                    ui.monospace(format!(
                        "Drag: {}",
                        hud.drag.map(|mode| mode.label()).unwrap_or("-")
                    ));

                    ui.add_space(5.0);
                    ui.separator();

                    ui.label(
                        egui::RichText::new("Scene")
                            .size(16.0)
                            .color(egui::Color32::from_rgb(200, 150, 100)),
                    );
                    ui.monospace(format!("Bodies: {}", hud.bodies));
                    ui.monospace(format!("Orbit: {}", on_off(hud.toggles.orbit)));
                    ui.monospace(format!("Rings: {}", on_off(hud.toggles.rings)));
                    ui.monospace(format!(
                        "Wireframe: {}",
                        if wireframe_available { on_off(hud.toggles.wireframe) } else { "n/a" }
                    ));
                    ui.monospace(format!("Texcoords: {}", on_off(hud.toggles.texcoords)));
                    ui.monospace(format!("Viewport: {}x{}", hud.viewport.x, hud.viewport.y));
                });
        });

        self.egui_state
            .handle_platform_output(window, full_output.platform_output);

        let tris = self
            .egui_ctx
            .tessellate(full_output.shapes, self.egui_ctx.pixels_per_point());
        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: window.scale_factor() as f32,
        };

        self.egui_renderer
            .update_buffers(&self.device, &self.queue, encoder, &tris, &screen_descriptor);

        {
            let mut render_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                        depth_slice: None,
                    })],
                    depth_stencil_attachment: None,
                    occlusion_query_set: None,
                    timestamp_writes: None,
                })
                .forget_lifetime();

            self.egui_renderer
                .render(&mut render_pass, &tris, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}

/// First sRGB format, else the first one offered
fn preferred_format(formats: &[wgpu::TextureFormat]) -> Option<wgpu::TextureFormat> {
    formats
        .iter()
        .copied()
        .find(|f| f.is_srgb())
        .or_else(|| formats.first().copied())
}

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::TextureFormat;

    #[test]
    fn test_preferred_format_picks_srgb() {
        let formats = [TextureFormat::Bgra8Unorm, TextureFormat::Bgra8UnormSrgb];
        assert_eq!(preferred_format(&formats), Some(TextureFormat::Bgra8UnormSrgb));
    }

    #[test]
    fn test_preferred_format_falls_back_to_first() {
        let formats = [TextureFormat::Rgba16Float, TextureFormat::Bgra8Unorm];
        assert_eq!(preferred_format(&formats), Some(TextureFormat::Rgba16Float));
    }

    #[test]
    fn test_preferred_format_empty_surface() {
        assert_eq!(preferred_format(&[]), None);
    }
}
