//! Background music playback using Kira.

use anyhow::{Context, Result};
use kira::{
    manager::{backend::DefaultBackend, AudioManager, AudioManagerSettings},
    sound::static_sound::{StaticSoundData, StaticSoundHandle, StaticSoundSettings},
    tween::Tween,
};
use std::path::Path;

/// One looping music track with adjustable volume.
///
/// A player without an audio device or track is silent: every call still succeeds so the
/// scene keeps running when audio is unavailable.
pub struct MusicPlayer {
    manager: Option<AudioManager>,
    track: Option<StaticSoundHandle>,
    volume: f32,
}

impl MusicPlayer {
    /// A player that never makes a sound.
    pub fn silent(volume: f32) -> Self {
        Self {
            manager: None,
            track: None,
            volume: volume.clamp(0.0, 1.0),
        }
    }

    /// Load `path` and start looping it at `volume`. Failures are logged and yield a silent
    /// player.
    pub fn start(path: &Path, volume: f32) -> Self {
        match Self::try_start(path, volume) {
            Ok(player) => {
                log::info!("Playing music from {}", path.display());
                player
            }
            Err(e) => {
                log::warn!("Music disabled: {:#}", e);
                Self::silent(volume)
            }
        }
    }

    /// Like [`MusicPlayer::start`], but reports the failure.
    pub fn try_start(path: &Path, volume: f32) -> Result<Self> {
        let volume = volume.clamp(0.0, 1.0);
        let mut manager = AudioManager::<DefaultBackend>::new(AudioManagerSettings::default())
            .context("failed to open audio device")?;
        let settings = StaticSoundSettings::new()
            .volume(volume as f64)
            .loop_region(..);
        let sound = StaticSoundData::from_file(path)
            .with_context(|| format!("failed to load {}", path.display()))?
            .with_settings(settings);
        let track = manager.play(sound).context("failed to start playback")?;
        Ok(Self {
            manager: Some(manager),
            track: Some(track),
            volume,
        })
    }

    /// Set the output volume (0.0 to 1.0). Zero silences without stopping the loop.
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        if let Some(track) = &mut self.track {
            let _ = track.set_volume(self.volume as f64, Tween::default());
        }
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Whether a track is loaded on a live audio device.
    pub fn is_playing(&self) -> bool {
        self.manager.is_some() && self.track.is_some()
    }

    /// Stop the track; the player becomes silent.
    pub fn stop(&mut self) {
        if let Some(mut track) = self.track.take() {
            let _ = track.stop(Tween::default());
        }
    }
}

impl Drop for MusicPlayer {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silent_player_tracks_volume() {
        let mut player = MusicPlayer::silent(0.5);
        assert!(!player.is_playing());
        player.set_volume(0.8);
        assert_eq!(player.volume(), 0.8);
        player.set_volume(3.0);
        assert_eq!(player.volume(), 1.0);
        player.set_volume(-1.0);
        assert_eq!(player.volume(), 0.0);
    }

    #[test]
    fn missing_file_degrades_to_silence() {
        let player = MusicPlayer::start(Path::new("definitely/not/here.mp3"), 0.5);
        assert!(!player.is_playing());
        assert_eq!(player.volume(), 0.5);
    }

    #[test]
    fn try_start_reports_missing_file() {
        assert!(MusicPlayer::try_start(Path::new("definitely/not/here.mp3"), 0.5).is_err());
    }
}
