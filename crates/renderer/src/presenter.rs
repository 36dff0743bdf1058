//! Puts the CPU canvas on screen through wgpu, letterboxed into the window.

use glam::Vec2;
use std::sync::Arc;
use winit::window::Window;

use crate::canvas::Canvas;

/// Failures while creating or driving the presenter.
#[derive(Debug, thiserror::Error)]
pub enum PresentError {
    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error("failed to find a suitable GPU adapter")]
    NoAdapter,
    #[error("failed to acquire GPU device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error("surface reports no supported formats")]
    NoSurfaceFormat,
    #[error("canvas is {got_w}x{got_h} but the presenter expects {want_w}x{want_h}")]
    CanvasMismatch {
        got_w: u32,
        got_h: u32,
        want_w: u32,
        want_h: u32,
    },
    #[error("GPU ran out of memory")]
    OutOfMemory,
}

/// Placement of the scaled canvas inside the window, in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Letterbox {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    canvas_width: u32,
    canvas_height: u32,
}

impl Letterbox {
    /// Fit `canvas` into `window`. With `maintain_aspect` the canvas is scaled uniformly and
    /// centred with black bars; otherwise it is stretched over the whole window.
    pub fn fit(canvas: (u32, u32), window: (u32, u32), maintain_aspect: bool) -> Self {
        let (cw, ch) = (canvas.0.max(1), canvas.1.max(1));
        let (ww, wh) = window;
        if !maintain_aspect {
            return Self {
                x: 0,
                y: 0,
                width: ww,
                height: wh,
                canvas_width: cw,
                canvas_height: ch,
            };
        }
        // Integer cross-multiplication keeps exact sizes for common aspect ratios.
        let (width, height) = if ww as u64 * ch as u64 <= wh as u64 * cw as u64 {
            (ww, (ch as u64 * ww as u64 / cw as u64) as u32)
        } else {
            ((cw as u64 * wh as u64 / ch as u64) as u32, wh)
        };
        Self {
            x: (ww as i32 - width as i32) / 2,
            y: (wh as i32 - height as i32) / 2,
            width,
            height,
            canvas_width: cw,
            canvas_height: ch,
        }
    }

    /// Map a window position to canvas coordinates. Points in the bars map outside the canvas.
    pub fn to_canvas(&self, physical: Vec2) -> Vec2 {
        if self.width == 0 || self.height == 0 {
            return Vec2::ZERO;
        }
        Vec2::new(
            ((physical.x - self.x as f32) * self.canvas_width as f32 / self.width as f32).trunc(),
            ((physical.y - self.y as f32) * self.canvas_height as f32 / self.height as f32).trunc(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

const BLIT_SHADER: &str = r#"
struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@group(0) @binding(0) var canvas_tex: texture_2d<f32>;
@group(0) @binding(1) var canvas_sampler: sampler;

@vertex
fn vs_main(@builtin(vertex_index) vertex_index: u32) -> VertexOutput {
    var positions = array<vec2<f32>, 3>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(3.0, -1.0),
        vec2<f32>(-1.0, 3.0),
    );
    var uvs = array<vec2<f32>, 3>(
        vec2<f32>(0.0, 1.0),
        vec2<f32>(2.0, 1.0),
        vec2<f32>(0.0, -1.0),
    );
    var out: VertexOutput;
    out.clip_position = vec4<f32>(positions[vertex_index], 0.0, 1.0);
    out.uv = uvs[vertex_index];
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return textureSample(canvas_tex, canvas_sampler, in.uv);
}
"#;

/// Owns the GPU surface and uploads one canvas per frame.
pub struct Presenter {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    window: Arc<Window>,
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    canvas_texture: wgpu::Texture,
    canvas_size: (u32, u32),
    maintain_aspect: bool,
    letterbox: Letterbox,
}

impl Presenter {
    /// Create a presenter for `window` showing a canvas of `canvas_size`.
    pub async fn new(
        window: Arc<Window>,
        canvas_size: (u32, u32),
        maintain_aspect: bool,
    ) -> Result<Self, PresentError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(PresentError::NoAdapter)?;

        log::info!("Using GPU: {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Presenter Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(PresentError::NoSurfaceFormat)?;

        // Prefer Mailbox (low-latency vsync) if available; otherwise AutoVsync.
        let present_mode = surface_caps
            .present_modes
            .iter()
            .find(|m| matches!(m, wgpu::PresentMode::Mailbox))
            .copied()
            .unwrap_or(wgpu::PresentMode::AutoVsync);

        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 1,
        };
        surface.configure(&device, &config);

        let canvas_texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Canvas Texture"),
            size: wgpu::Extent3d {
                width: canvas_size.0,
                height: canvas_size.1,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let canvas_view = canvas_texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Canvas Sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Canvas Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Canvas Bind Group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&canvas_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Canvas Blit Shader"),
            source: wgpu::ShaderSource::Wgsl(BLIT_SHADER.into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Canvas Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Canvas Blit Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
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
            multiview: None,
            cache: None,
        });

        let letterbox = Letterbox::fit(canvas_size, (config.width, config.height), maintain_aspect);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            window,
            pipeline,
            bind_group,
            canvas_texture,
            canvas_size,
            maintain_aspect,
            letterbox,
        })
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    pub fn letterbox(&self) -> &Letterbox {
        &self.letterbox
    }

    /// Handle a window resize. Zero-sized windows (minimised) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.letterbox = Letterbox::fit(self.canvas_size, (width, height), self.maintain_aspect);
    }

    fn reconfigure(&mut self) {
        let size = self.window.inner_size();
        self.resize(size.width, size.height);
    }

    /// Upload `canvas` and draw it into the letterbox over a black clear.
    pub fn present(&mut self, canvas: &Canvas) -> Result<(), PresentError> {
        if (canvas.width(), canvas.height()) != self.canvas_size {
            return Err(PresentError::CanvasMismatch {
                got_w: canvas.width(),
                got_h: canvas.height(),
                want_w: self.canvas_size.0,
                want_h: self.canvas_size.1,
            });
        }

        let output = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("Surface lost or outdated, reconfiguring");
                self.reconfigure();
                return Ok(());
            }
            Err(wgpu::SurfaceError::OutOfMemory) => return Err(PresentError::OutOfMemory),
            Err(e) => {
                log::warn!("Skipping frame: {}", e);
                return Ok(());
            }
        };

        self.queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &self.canvas_texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            canvas.as_bytes(),
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4 * self.canvas_size.0),
                rows_per_image: Some(self.canvas_size.1),
            },
            wgpu::Extent3d {
                width: self.canvas_size.0,
                height: self.canvas_size.1,
                depth_or_array_layers: 1,
            },
        );

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Present Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Canvas Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            let lb = self.letterbox;
            if !lb.is_empty() {
                pass.set_viewport(
                    lb.x.max(0) as f32,
                    lb.y.max(0) as f32,
                    lb.width.min(self.config.width) as f32,
                    lb.height.min(self.config.height) as f32,
                    0.0,
                    1.0,
                );
                pass.set_pipeline(&self.pipeline);
                pass.set_bind_group(0, &self.bind_group, &[]);
                pass.draw(0..3, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        self.window.pre_present_notify();
        output.present();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_aspect_fills_window() {
        let lb = Letterbox::fit((1920, 1080), (1280, 720), true);
        assert_eq!((lb.x, lb.y, lb.width, lb.height), (0, 0, 1280, 720));
    }

    #[test]
    fn narrow_window_gets_bars_top_and_bottom() {
        let lb = Letterbox::fit((1920, 1080), (1000, 1000), true);
        assert_eq!(lb.width, 1000);
        assert_eq!(lb.height, 562);
        assert_eq!(lb.x, 0);
        assert_eq!(lb.y, 219);
    }

    #[test]
    fn wide_window_gets_side_bars() {
        let lb = Letterbox::fit((1920, 1080), (2560, 1080), true);
        assert_eq!((lb.x, lb.width, lb.height), (320, 1920, 1080));
    }

    #[test]
    fn stretch_ignores_aspect() {
        let lb = Letterbox::fit((1920, 1080), (800, 800), false);
        assert_eq!((lb.x, lb.y, lb.width, lb.height), (0, 0, 800, 800));
        assert_eq!(lb.to_canvas(Vec2::new(400.0, 400.0)), Vec2::new(960.0, 540.0));
    }

    #[test]
    fn window_point_maps_into_canvas() {
        let lb = Letterbox::fit((1920, 1080), (2560, 1080), true);
        assert_eq!(lb.to_canvas(Vec2::new(320.0, 0.0)), Vec2::ZERO);
        assert_eq!(lb.to_canvas(Vec2::new(1280.0, 540.0)), Vec2::new(960.0, 540.0));
        // Left bar lands off-canvas.
        assert!(lb.to_canvas(Vec2::new(10.0, 10.0)).x < 0.0);
    }

    #[test]
    fn minimised_window_is_empty() {
        let lb = Letterbox::fit((1920, 1080), (0, 0), true);
        assert!(lb.is_empty());
        assert_eq!(lb.to_canvas(Vec2::new(5.0, 5.0)), Vec2::ZERO);
    }
}
