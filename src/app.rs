use std::{sync::Arc, time::Instant};

use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::ActiveEventLoop,
    window::{Window, WindowId},
};

use crate::{
    render::{
        line_set::{LineSetKind, LineVertices},
        render_engine::{FrameError, RenderEngine},
    },
    settings::GlobeSettings,
};

/// Hosts the render engine in a winit event loop and drives one tick per redraw.
pub struct Application {
    settings: GlobeSettings,
    // uploaded once the engine exists, then dropped
    line_sets: Vec<(LineSetKind, LineVertices)>,
    engine: Option<RenderEngine>,
    start_time: Instant,
}

impl Application {
    pub fn new(settings: GlobeSettings, line_sets: Vec<(LineSetKind, LineVertices)>) -> Self {
        Self {
            settings,
            line_sets,
            engine: None,
            start_time: Instant::now(),
        }
    }
}

impl ApplicationHandler for Application {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.engine.is_some() {
            return;
        }

        let (width, height) = (self.settings.window_width, self.settings.window_height);
        let window_attributes = Window::default_attributes()
            .with_title("Globe")
            .with_inner_size(LogicalSize::new(width as f64, height as f64));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                log::error!("{err}");
                event_loop.exit();
                return;
            }
        };

        match pollster::block_on(RenderEngine::new(window, &self.settings, &self.line_sets)) {
            Ok(engine) => {
                self.line_sets = Vec::new();
                self.start_time = Instant::now();
                engine.window().request_redraw();
                self.engine = Some(engine);
            }
            Err(err) => {
                log::error!("{err:?}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(engine) = &mut self.engine else {
            return;
        };

        match event {
            WindowEvent::Resized(_) => {
                // targets are reconciled on the next tick
                engine.window().request_redraw();
            }
            WindowEvent::RedrawRequested => {
                engine.window().request_redraw();

                let elapsed = self.start_time.elapsed().as_secs_f64();
                match engine.tick(elapsed) {
                    Ok(()) => {}
                    // Reconfigure the surface if it's lost or outdated
                    Err(FrameError::Surface(
                        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated,
                    )) => engine.reconfigure(),
                    // The system is out of memory, we should probably quit
                    Err(FrameError::Surface(
                        wgpu::SurfaceError::OutOfMemory | wgpu::SurfaceError::Other,
                    )) => {
                        log::error!("OutOfMemory");
                        event_loop.exit()
                    }
                    // This happens when the a frame takes too long to present
                    Err(FrameError::Surface(wgpu::SurfaceError::Timeout)) => {
                        log::warn!("Surface timeout")
                    }
                    // Nothing is drawn until the viewport fits again
                    Err(err @ FrameError::Targets(_)) => {
                        log::error!("{err}");
                    }
                }
            }
            WindowEvent::CloseRequested => event_loop.exit(),
            _ => {}
        }
    }
}
