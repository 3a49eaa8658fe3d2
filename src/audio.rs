//! Audio routing
//!
//! Turns simulation events into music/effect playback on an `AudioOut`,
//! applying the volume mix from `Settings`.

use crate::platform::{AudioOut, TrackId};
use crate::settings::Settings;
use crate::sim::GameEvent;

/// Volume mix in front of an audio backend
pub struct AudioManager<A: AudioOut> {
    out: A,
    master_volume: f32,
    music_volume: f32,
    sfx_volume: f32,
}

impl<A: AudioOut> AudioManager<A> {
    pub fn new(out: A, settings: &Settings) -> Self {
        Self {
            out,
            master_volume: settings.master_volume.clamp(0.0, 1.0),
            music_volume: settings.music_volume.clamp(0.0, 1.0),
            sfx_volume: settings.sfx_volume.clamp(0.0, 1.0),
        }
    }

    fn effective(&self, channel: f32) -> f32 {
        self.master_volume * channel
    }

    /// React to one simulation event
    pub fn handle(&mut self, event: &GameEvent) {
        match event {
            GameEvent::Started => {
                let vol = self.effective(self.music_volume);
                self.out.play_looping(TrackId::Music, vol);
            }
            GameEvent::Fired { .. } => {
                let vol = self.effective(self.sfx_volume);
                if vol > 0.0 {
                    self.out.play_oneshot(TrackId::Shot, vol);
                }
            }
            _ => {}
        }
    }

    pub fn backend(&self) -> &A {
        &self.out
    }

    pub fn backend_mut(&mut self) -> &mut A {
        &mut self.out
    }
}
