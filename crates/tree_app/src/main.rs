//! Merry Christmas Tree - a rotating particle tree with falling snow, drawn as a screensaver.

mod caption;
mod config;
mod events;
mod launch;
mod scene;
mod state;
mod volume;

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use rand::Rng;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Fullscreen, Window, WindowId},
};

use config::AppConfig;
use launch::{LaunchMode, LaunchOptions};
use state::SceneState;

struct App {
    config: AppConfig,
    fullscreen: bool,
    state: Option<SceneState>,
}

impl App {
    fn new(config: AppConfig, options: &LaunchOptions) -> Self {
        let fullscreen = options.fullscreen || config.window.fullscreen;
        Self {
            config,
            fullscreen,
            state: None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let window_config = &self.config.window;
        let mut window_attrs = Window::default_attributes()
            .with_title(window_config.title.clone())
            .with_inner_size(LogicalSize::new(window_config.width, window_config.height));
        if self.fullscreen {
            window_attrs = window_attrs.with_fullscreen(Some(Fullscreen::Borderless(None)));
        }

        let window = match event_loop.create_window(window_attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let seed = self.config.seed.unwrap_or_else(|| rand::thread_rng().gen());
        log::info!("Scene seed: {}", seed);

        match pollster::block_on(SceneState::new(window.clone(), &self.config, seed)) {
            Ok(s) => {
                self.state = Some(s);
                window.request_redraw();
            }
            Err(e) => {
                log::error!("Failed to initialize scene: {:#}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(state) = &mut self.state {
            if state.handle_window_event(event) || !state.running {
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            if state.time.is_frame_due(Instant::now()) {
                state.presenter.window().request_redraw();
            }
            event_loop.set_control_flow(ControlFlow::WaitUntil(state.time.next_frame()));
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = launch::parse_args(std::env::args().skip(1));
    match options.mode {
        LaunchMode::Preview => {
            log::info!("Preview mode is not supported, exiting");
            return Ok(());
        }
        LaunchMode::Configure => {
            log::info!(
                "No settings dialog; edit {} in the working directory to configure the scene",
                config::CONFIG_FILE
            );
        }
        LaunchMode::Screensaver | LaunchMode::Run => {}
    }

    let config = AppConfig::load(options.config_path.as_deref());
    log::info!(
        "Starting Merry Christmas Tree ({}x{} canvas, {} fps)",
        config.canvas_width,
        config.canvas_height,
        config.target_fps
    );

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(config, &options);
    event_loop.run_app(&mut app)?;

    Ok(())
}
