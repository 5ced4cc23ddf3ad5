//! SDF-based WebGPU render pipeline
//!
//! Renders the entire scene in fragment shader using signed distance fields.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use super::scene::SceneFrame;
use crate::consts::*;

/// Maximum number of target discs (largest constellation is 8)
const MAX_TARGETS: usize = 16;
/// Maximum number of link segments
const MAX_LINKS: usize = 16;

// ============================================================================
// GPU DATA STRUCTURES (must match shader)
// ============================================================================

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Globals {
    resolution: [f32; 2],  // offset 0
    view_center: [f32; 2], // offset 8
    plane_half: [f32; 2],  // offset 16
    time: f32,             // offset 24
    view_half_height: f32, // offset 28
    target_count: u32,     // offset 32
    link_count: u32,       // offset 36
    _pad: [u32; 2],        // pad to 48 bytes
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct BallData {
    pos: [f32; 2],
    radius: f32,
    emissive: f32,
    light: f32,
    _pad: f32,
    roll: [f32; 2], // offset 24 (8-byte aligned for WGSL vec2)
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct TargetData {
    pos: [f32; 2],
    radius: f32,
    opacity: f32,
    emissive: f32,
    light: f32,
    _pad: [f32; 2], // Uniform array stride must be a multiple of 16
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct LinkData {
    start: [f32; 2],
    tip: [f32; 2],
}

fn uniform_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

// ============================================================================
// SDF RENDER STATE
// ============================================================================

pub struct SdfRenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,

    // Uniform buffers
    globals_buffer: wgpu::Buffer,
    ball_buffer: wgpu::Buffer,
    targets_buffer: wgpu::Buffer,
    links_buffer: wgpu::Buffer,

    bind_group: wgpu::BindGroup,

    pub size: (u32, u32),
    start_time: f64,
}

impl SdfRenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> Result<Self, wgpu::RequestDeviceError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("sdf-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(adapter);
        log::info!("Surface formats: {:?}", surface_caps.formats);

        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        log::info!("Using surface format: {:?}", surface_format);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("sdf_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("sdf_shader.wgsl").into()),
        });

        // Create buffers
        let globals_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("globals"),
            contents: bytemuck::bytes_of(&Globals {
                resolution: [width as f32, height as f32],
                view_center: [0.0, 0.0],
                plane_half: [PLANE_HALF_WIDTH, PLANE_HALF_DEPTH],
                time: 0.0,
                view_half_height: 100.0,
                target_count: 0,
                link_count: 0,
                _pad: [0; 2],
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let ball_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("ball"),
            size: std::mem::size_of::<BallData>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let targets_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("targets"),
            size: (std::mem::size_of::<TargetData>() * MAX_TARGETS) as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let links_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("links"),
            size: (std::mem::size_of::<LinkData>() * MAX_LINKS) as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sdf_bind_group_layout"),
            entries: &[
                uniform_entry(0),
                uniform_entry(1),
                uniform_entry(2),
                uniform_entry(3),
            ],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sdf_bind_group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: globals_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: ball_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: targets_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: links_buffer.as_entire_binding(),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("sdf_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("sdf_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[], // No vertex buffers - fullscreen triangle
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            globals_buffer,
            ball_buffer,
            targets_buffer,
            links_buffer,
            bind_group,
            size: (width, height),
            start_time: 0.0,
        })
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    pub fn set_start_time(&mut self, time: f64) {
        self.start_time = time;
    }

    /// Upload the frame description and render
    pub fn render(&mut self, frame: &SceneFrame, time: f64) -> Result<(), wgpu::SurfaceError> {
        let elapsed = ((time - self.start_time) / 1000.0) as f32;
        let view = frame.view();

        let target_count = frame.targets.len().min(MAX_TARGETS);
        let link_count = frame.links.len().min(MAX_LINKS);

        let globals = Globals {
            resolution: [self.size.0 as f32, self.size.1 as f32],
            view_center: view.center.to_array(),
            plane_half: [PLANE_HALF_WIDTH, PLANE_HALF_DEPTH],
            time: elapsed,
            view_half_height: view.half_height,
            target_count: target_count as u32,
            link_count: link_count as u32,
            _pad: [0; 2],
        };
        self.queue
            .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));

        let ball = BallData {
            pos: [frame.ball.position.x, frame.ball.position.z],
            radius: frame.ball.radius,
            emissive: frame.ball.emissive_intensity,
            light: frame.ball.light_intensity,
            _pad: 0.0,
            roll: frame.ball.rotation.to_array(),
        };
        self.queue
            .write_buffer(&self.ball_buffer, 0, bytemuck::bytes_of(&ball));

        let mut targets_data = [TargetData::zeroed(); MAX_TARGETS];
        for (slot, target) in targets_data.iter_mut().zip(&frame.targets) {
            let [r, g, b] = target.visual.emissive;
            *slot = TargetData {
                pos: [target.position.x, target.position.z],
                radius: target.radius,
                opacity: target.visual.opacity,
                emissive: (r + g + b) / 3.0 * target.visual.emissive_intensity,
                light: target.visual.light_intensity,
                _pad: [0.0; 2],
            };
        }
        self.queue
            .write_buffer(&self.targets_buffer, 0, bytemuck::cast_slice(&targets_data));

        let mut links_data = [LinkData::zeroed(); MAX_LINKS];
        for (slot, link) in links_data.iter_mut().zip(&frame.links) {
            let tip = link.tip();
            *slot = LinkData {
                start: [link.start.x, link.start.z],
                tip: [tip.x, tip.z],
            };
        }
        self.queue
            .write_buffer(&self.links_buffer, 0, bytemuck::cast_slice(&links_data));

        // Render
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("sdf_encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("sdf_render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.bind_group, &[]);
            render_pass.draw(0..3, 0..1); // Fullscreen triangle
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}
