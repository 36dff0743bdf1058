//! Everything that lives for the duration of the window: presenter, canvas, scene, overlays, audio.

use std::sync::Arc;

use anyhow::Result;
use audio::MusicPlayer;
use engine_core::Time;
use input::InputState;
use renderer::{Canvas, PresentError, Presenter};
use winit::window::Window;

use crate::caption::Caption;
use crate::config::{resolve_resource, AppConfig};
use crate::scene::Scene;
use crate::volume::{IconSet, VolumeControl};

/// Log a frame summary this often.
const STATS_INTERVAL_FRAMES: u64 = 600;

pub(crate) struct SceneState {
    pub presenter: Presenter,
    pub canvas: Canvas,
    pub scene: Scene,
    pub caption: Caption,
    pub volume: VolumeControl,
    pub music: MusicPlayer,
    pub input: InputState,
    pub time: Time,
    pub running: bool,
}

impl SceneState {
    pub async fn new(window: Arc<Window>, config: &AppConfig, seed: u64) -> Result<Self> {
        let canvas_size = (config.canvas_width, config.canvas_height);
        let presenter = Presenter::new(window, canvas_size, config.window.maintain_aspect).await?;

        let scene = Scene::new(config, seed);
        let caption = Caption::new(config.caption.clone(), config.canvas_width, config.canvas_height);

        let icons = IconSet::load(&resolve_resource(&config.audio.icon_dir), VolumeControl::ICON_SIZE);
        if icons.is_empty() {
            log::info!("No volume icons found, drawing the speaker glyph instead");
        }
        let volume = VolumeControl::top_right(config.canvas_width, config.audio.volume, icons);
        let music = MusicPlayer::start(&resolve_resource(&config.audio.music_path), volume.effective_volume());

        Ok(Self {
            presenter,
            canvas: Canvas::new(config.canvas_width, config.canvas_height),
            scene,
            caption,
            volume,
            music,
            input: InputState::new(),
            time: Time::new(config.target_fps),
            running: true,
        })
    }

    /// Milliseconds since start, as of the last frame.
    pub fn now_ms(&self) -> u64 {
        self.time.elapsed_millis()
    }

    /// Run one frame: update, draw the scene and overlays, then present.
    pub fn redraw(&mut self) {
        self.time.update();
        let now = self.time.elapsed_millis();

        let stats = self.scene.frame(&mut self.canvas, now, self.input.pointer().x);
        self.caption.draw(&mut self.canvas);
        self.volume.draw(&mut self.canvas);

        if let Some(volume) = self.volume.take_volume_change() {
            self.music.set_volume(volume);
        }

        match self.presenter.present(&self.canvas) {
            Ok(()) => {}
            Err(PresentError::OutOfMemory) => {
                log::error!("GPU out of memory, exiting");
                self.running = false;
            }
            Err(e) => log::warn!("Present failed: {}", e),
        }

        if self.time.frame_count() % STATS_INTERVAL_FRAMES == 0 {
            log::debug!(
                "Frame {} at {:.1} fps: {} discs ({} glowing), {} pixels, {} dropped, {} culled",
                self.time.frame_count(),
                self.time.fps(),
                stats.discs,
                stats.glows,
                stats.pixels,
                stats.dropped,
                stats.culled
            );
        }

        self.input.begin_frame();
    }
}
