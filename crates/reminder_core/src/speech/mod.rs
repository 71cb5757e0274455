use crate::config::Config;
use crate::error::AppError;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, warn};

mod command;
pub mod voice;

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "linux")]
pub use linux::DesktopEcho;

pub use command::{CommandSpeaker, Engine};

const DISABLE_SPEECH_ENV_VAR: &str = "REMINDER_DISABLE_SPEECH";

pub trait Speaker {
    fn speak(&self, text: &str) -> Result<(), AppError>;
}

pub struct MutedSpeaker;

impl Speaker for MutedSpeaker {
    fn speak(&self, text: &str) -> Result<(), AppError> {
        debug!(text, "speech muted");
        Ok(())
    }
}

pub struct UnsupportedSpeaker {
    reason: String,
    warned: AtomicBool,
}

impl UnsupportedSpeaker {
    pub fn new<R: Into<String>>(reason: R) -> Self {
        Self {
            reason: reason.into(),
            warned: AtomicBool::new(false),
        }
    }
}

impl Speaker for UnsupportedSpeaker {
    fn speak(&self, text: &str) -> Result<(), AppError> {
        if !self.warned.swap(true, Ordering::Relaxed) {
            warn!(reason = %self.reason, "speech synthesis not supported, announcements dropped");
        }
        debug!(text, "dropped utterance");
        Ok(())
    }
}

pub fn speaker_from_env(config: &Config) -> Box<dyn Speaker> {
    if std::env::var(DISABLE_SPEECH_ENV_VAR).is_ok() {
        return Box::new(MutedSpeaker);
    }

    match platform_speaker(config) {
        Ok(speaker) => speaker,
        Err(err) => Box::new(UnsupportedSpeaker::new(err.message())),
    }
}

#[cfg(target_os = "linux")]
pub fn platform_speaker(config: &Config) -> Result<Box<dyn Speaker>, AppError> {
    let speaker = CommandSpeaker::new(Engine::EspeakNg, config.voice.clone());
    if config.desktop_notifications {
        Ok(Box::new(DesktopEcho::new(speaker)))
    } else {
        Ok(Box::new(speaker))
    }
}

#[cfg(target_os = "macos")]
pub fn platform_speaker(config: &Config) -> Result<Box<dyn Speaker>, AppError> {
    Ok(Box::new(CommandSpeaker::new(Engine::Say, config.voice.clone())))
}

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
pub fn platform_speaker(_config: &Config) -> Result<Box<dyn Speaker>, AppError> {
    Err(AppError::unsupported(
        "speech synthesis is not supported on this platform",
    ))
}
