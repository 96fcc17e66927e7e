//! Sound collaborator.
//!
//! The core never plays audio itself; it resolves an entity's sound id
//! through [`SoundPlayer`] and asks the host to start/stop playback keyed
//! by entity id. A sound id that no longer resolves (deleted custom
//! sound) is substituted with [`FALLBACK_SOUND_ID`] and the substitution
//! is written back onto the entity, so a fired alert is always audible.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::defaults::BUILTIN_SOUNDS;

/// Sound id substituted when an entity's sound cannot be resolved.
pub const FALLBACK_SOUND_ID: &str = "classic-bell";

/// A resolved, playable sound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoundRef {
    pub id: String,
    pub name: String,
}

pub trait SoundPlayer: Send + Sync {
    /// Look up a sound id. `None` means the id is unknown or was deleted.
    fn resolve(&self, sound_id: &str) -> Option<SoundRef>;

    /// Start playback for the given instance key (entity id).
    fn play(&self, sound: &SoundRef, instance_key: &str);

    /// Stop playback for the given instance key.
    fn stop(&self, instance_key: &str);
}

impl<T: SoundPlayer + ?Sized> SoundPlayer for std::sync::Arc<T> {
    fn resolve(&self, sound_id: &str) -> Option<SoundRef> {
        (**self).resolve(sound_id)
    }

    fn play(&self, sound: &SoundRef, instance_key: &str) {
        (**self).play(sound, instance_key)
    }

    fn stop(&self, instance_key: &str) {
        (**self).stop(instance_key)
    }
}

/// Registry of builtin sounds. Playback is delegated to the host; this
/// implementation only logs, which is what the CLI wants.
#[derive(Debug, Clone)]
pub struct SoundBank {
    sounds: Vec<SoundRef>,
}

impl SoundBank {
    pub fn builtin() -> Self {
        Self {
            sounds: BUILTIN_SOUNDS
                .iter()
                .map(|(id, name)| SoundRef {
                    id: (*id).to_string(),
                    name: (*name).to_string(),
                })
                .collect(),
        }
    }

    pub fn sounds(&self) -> &[SoundRef] {
        &self.sounds
    }
}

impl SoundPlayer for SoundBank {
    fn resolve(&self, sound_id: &str) -> Option<SoundRef> {
        self.sounds.iter().find(|s| s.id == sound_id).cloned()
    }

    fn play(&self, sound: &SoundRef, instance_key: &str) {
        tracing::info!(sound = %sound.id, %instance_key, "play");
    }

    fn stop(&self, instance_key: &str) {
        tracing::info!(%instance_key, "stop");
    }
}

/// What a recording player captured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoundCall {
    Play { sound_id: String, instance_key: String },
    Stop { instance_key: String },
}

/// Records play/stop calls on top of the builtin registry. Used in tests.
#[derive(Debug, Default)]
pub struct RecordingSounds {
    calls: Mutex<Vec<SoundCall>>,
}

impl RecordingSounds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&self) -> Vec<SoundCall> {
        match self.calls.lock() {
            Ok(mut guard) => std::mem::take(&mut *guard),
            Err(_) => Vec::new(),
        }
    }
}

impl SoundPlayer for RecordingSounds {
    fn resolve(&self, sound_id: &str) -> Option<SoundRef> {
        SoundBank::builtin().resolve(sound_id)
    }

    fn play(&self, sound: &SoundRef, instance_key: &str) {
        if let Ok(mut guard) = self.calls.lock() {
            guard.push(SoundCall::Play {
                sound_id: sound.id.clone(),
                instance_key: instance_key.to_string(),
            });
        }
    }

    fn stop(&self, instance_key: &str) {
        if let Ok(mut guard) = self.calls.lock() {
            guard.push(SoundCall::Stop {
                instance_key: instance_key.to_string(),
            });
        }
    }
}
