use std::{iter, sync::Arc};

use color_eyre::Result;
use thiserror::Error;
use winit::window::Window;

use crate::{
    data::{Size, camera::GlobeCamera},
    settings::GlobeSettings,
};

use super::{
    data::TransformState,
    frame::{FramePlan, plan_frame},
    line_set::{LineSetKind, LineSets, LineVertices},
    pipeline::Pipeline,
    surface::{
        SurfaceChange, SurfaceManager, TargetError, ViewportRequest, WgpuTargetAllocator,
    },
    texture::Texture,
};

#[derive(Error, Debug)]
pub enum FrameError {
    #[error(transparent)]
    Surface(#[from] wgpu::SurfaceError),
    #[error(transparent)]
    Targets(#[from] TargetError),
}

/// Owns every GPU resource of the globe. Driven one frame at a time through
/// [`RenderEngine::tick`].
pub struct RenderEngine {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: Pipeline,
    line_sets: LineSets,
    targets: SurfaceManager<WgpuTargetAllocator>,
    camera: GlobeCamera,
}

impl RenderEngine {
    pub async fn new(
        window: Arc<Window>,
        settings: &GlobeSettings,
        line_sets: &[(LineSetKind, LineVertices)],
    ) -> Result<Self> {
        let size = window.inner_size();
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });
        let surface = instance.create_surface(window.clone())?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
                experimental_features: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);

        let format = {
            let mut format = surface_caps.formats[0];
            let format_srgb = format.add_srgb_suffix();
            if surface_caps.formats.contains(&format_srgb) {
                format = format_srgb;
            }
            format
        };

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width,
            height: size.height,
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![format],
            desired_maximum_frame_latency: 2,
        };

        let sample_count = Self::supported_sample_count(&adapter, format, settings.sample_count);
        let pipeline = Pipeline::create_line_pipeline(&device, format, sample_count);
        let line_sets = LineSets::upload(&device, line_sets);
        let targets =
            SurfaceManager::new(WgpuTargetAllocator::new(device.clone(), format, sample_count));

        let camera = settings.camera();

        log::info!(
            "Render engine ready: {format:?}, {}x multisampling, max surface {}",
            targets.allocator().sample_count(),
            targets.allocator().max_surface_dimension()
        );
        log::info!(
            "Camera at distance {}, simulated time {}x real time",
            camera.distance(),
            camera.time_speedup()
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            pipeline,
            line_sets,
            targets,
            camera,
        })
    }

    fn supported_sample_count(
        adapter: &wgpu::Adapter,
        format: wgpu::TextureFormat,
        requested: u32,
    ) -> u32 {
        let supported = [format, Texture::DEPTH_FORMAT].iter().all(|format| {
            adapter
                .get_texture_format_features(*format)
                .flags
                .sample_count_supported(requested)
        });

        if requested > 1 && !supported {
            log::warn!("{requested}x multisampling not supported, rendering without it");
            1
        } else {
            requested.max(1)
        }
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn surface_size(&self) -> Option<Size<u32>> {
        self.targets.size()
    }

    pub fn viewport_request(&self) -> ViewportRequest {
        let scale_factor = self.window.scale_factor();
        let logical = self.window.inner_size().to_logical::<f64>(scale_factor);
        ViewportRequest {
            logical_width: logical.width,
            logical_height: logical.height,
            device_pixel_ratio: scale_factor,
            max_surface_dimension: self.targets.allocator().max_surface_dimension(),
        }
    }

    fn configure_surface(&mut self, size: Size<u32>) {
        self.config.width = size.width;
        self.config.height = size.height;
        self.surface.configure(&self.device, &self.config);
    }

    /// Reapplies the current configuration after the surface got lost or outdated.
    pub fn reconfigure(&mut self) {
        if let Some(size) = self.targets.size() {
            self.configure_surface(size);
        }
    }

    /// Renders one frame `elapsed` seconds after startup.
    pub fn tick(&mut self, elapsed: f64) -> std::result::Result<(), FrameError> {
        let request = self.viewport_request();
        match self.targets.reconcile(request)? {
            SurfaceChange::Deferred => return Ok(()),
            SurfaceChange::Reallocated(size) => self.configure_surface(size),
            SurfaceChange::Unchanged => {}
        }

        let Some(size) = self.targets.size() else {
            return Ok(());
        };

        let plan = plan_frame(elapsed, size, &self.camera, self.line_sets.vertex_counts());
        self.upload_transforms(&plan.transforms);
        self.render(&plan)
    }

    fn upload_transforms(&self, transforms: &TransformState) {
        let uniforms = self.pipeline.get_uniforms();
        transforms.regions().iter().for_each(|(offset, matrix)| {
            uniforms.write(&self.queue, *offset, bytemuck::bytes_of(*matrix));
        });
    }

    fn render(&self, plan: &FramePlan) -> std::result::Result<(), FrameError> {
        let Some(state) = self.targets.state() else {
            return Ok(());
        };

        let output = self.surface.get_current_texture()?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor {
            format: Some(self.config.format),
            ..Default::default()
        });

        let (color_view, resolve_target, store) = match &state.targets.color {
            Some(multisampled) => (
                multisampled.get_view(),
                Some(&view),
                wgpu::StoreOp::Discard,
            ),
            None => (&view, None, wgpu::StoreOp::Store),
        };

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("globe.pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: color_view,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: state.targets.depth.get_view(),
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            pass.set_pipeline(self.pipeline.get_pipeline());
            pass.set_bind_group(0, Some(self.pipeline.get_uniform_bind_group()), &[]);

            plan.draws.iter().for_each(|draw| {
                if let Some(buffer) = self.line_sets.get(draw.kind) {
                    pass.set_vertex_buffer(0, buffer.raw().slice(..));
                    pass.draw(0..draw.vertex_count, 0..1);
                }
            });
        }

        self.queue.submit(iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}
