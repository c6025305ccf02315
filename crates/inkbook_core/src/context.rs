//! Explicit application context.
//!
//! # Responsibility
//! - Carry process-wide capabilities (sound cue backend, font availability)
//!   as one value threaded through constructors.
//! - Degrade sound playback to a no-op for the rest of the session after the
//!   first backend failure.
//!
//! # Invariants
//! - No module-level mutable state: the context is built once at startup and
//!   passed down.
//! - A failing sound backend is reported once, then silently skipped.

use log::{info, warn};

/// Playback backend for the short page-flip cue.
///
/// Implemented by the shell on top of whatever audio stack it links; the
/// core only ever asks for a fire-and-forget clip.
pub trait SoundCue {
    fn play_page_flip(&mut self) -> Result<(), String>;
}

/// Capabilities resolved at startup and threaded through the app.
pub struct AppContext {
    sound: Option<Box<dyn SoundCue>>,
    sound_disabled: bool,
    /// Whether the bundled handwriting fonts were loadable at startup.
    pub fonts_available: bool,
}

impl AppContext {
    pub fn new(sound: Option<Box<dyn SoundCue>>, fonts_available: bool) -> Self {
        if sound.is_none() {
            info!("event=context_init module=context status=ok sound=absent");
        }
        Self {
            sound,
            sound_disabled: false,
            fonts_available,
        }
    }

    /// Context with no sound backend and default fonts; used by tests and
    /// headless tooling.
    pub fn silent() -> Self {
        Self::new(None, false)
    }

    pub fn sound_enabled(&self) -> bool {
        self.sound.is_some() && !self.sound_disabled
    }

    /// Plays the page-flip cue, best effort.
    ///
    /// The first backend error disables playback for the rest of the session;
    /// nothing else is affected.
    pub fn play_page_flip(&mut self) {
        if self.sound_disabled {
            return;
        }
        let Some(sound) = self.sound.as_mut() else {
            return;
        };
        if let Err(err) = sound.play_page_flip() {
            warn!("event=sound_play module=context status=disabled error={err}");
            self.sound_disabled = true;
        }
    }
}
