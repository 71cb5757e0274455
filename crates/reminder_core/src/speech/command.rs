use crate::config::VoiceConfig;
use crate::error::AppError;
use crate::speech::Speaker;
use crate::speech::voice::{
    Voice, VoiceChoice, parse_espeak_voices, parse_say_voices, select_voice,
};
use std::io::ErrorKind;
use std::process::{Child, Command, Stdio};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Engine {
    EspeakNg,
    Say,
}

impl Engine {
    pub fn program(&self) -> &'static str {
        match self {
            Self::EspeakNg => "espeak-ng",
            Self::Say => "say",
        }
    }

    fn list_voices_args(&self) -> &'static [&'static str] {
        match self {
            Self::EspeakNg => &["--voices"],
            Self::Say => &["-v", "?"],
        }
    }

    fn parse_voices(&self, listing: &str) -> Vec<Voice> {
        match self {
            Self::EspeakNg => parse_espeak_voices(listing),
            Self::Say => parse_say_voices(listing),
        }
    }

    pub fn speak_args(&self, choice: &VoiceChoice, words_per_minute: u32, text: &str) -> Vec<String> {
        let voice = match (self, choice) {
            (_, VoiceChoice::Voice(voice)) => Some(voice.id.clone()),
            // espeak-ng resolves bare language codes, not regional tags.
            (Self::EspeakNg, VoiceChoice::Language(lang)) => {
                lang.split(['-', '_']).next().map(str::to_ascii_lowercase)
            }
            (Self::Say, VoiceChoice::Language(_)) => None,
        };

        let rate_flag = match self {
            Self::EspeakNg => "-s",
            Self::Say => "-r",
        };

        let mut args = Vec::with_capacity(5);
        if let Some(voice) = voice.filter(|value| !value.is_empty()) {
            args.push("-v".to_string());
            args.push(voice);
        }
        args.push(rate_flag.to_string());
        args.push(words_per_minute.to_string());
        args.push(text.to_string());
        args
    }
}

#[derive(Debug, Default)]
struct VoiceCatalog {
    voices: Option<Vec<Voice>>,
    listing: bool,
    attempts: u32,
}

fn list_voices(program: &str, engine: Engine) -> Vec<Voice> {
    match Command::new(program)
        .args(engine.list_voices_args())
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
    {
        Ok(output) if output.status.success() => {
            engine.parse_voices(&String::from_utf8_lossy(&output.stdout))
        }
        Ok(output) => {
            debug!(status = %output.status, "voice listing failed");
            Vec::new()
        }
        Err(err) => {
            debug!(error = %err, "voice listing unavailable");
            Vec::new()
        }
    }
}

pub struct CommandSpeaker {
    engine: Engine,
    program: String,
    voice: VoiceConfig,
    catalog: Arc<Mutex<VoiceCatalog>>,
    in_flight: Mutex<Option<Child>>,
}

impl CommandSpeaker {
    pub fn new(engine: Engine, voice: VoiceConfig) -> Self {
        Self::with_program(engine, engine.program(), voice)
    }

    pub fn with_program<P: Into<String>>(engine: Engine, program: P, voice: VoiceConfig) -> Self {
        let speaker = Self {
            engine,
            program: program.into(),
            voice,
            catalog: Arc::new(Mutex::new(VoiceCatalog::default())),
            in_flight: Mutex::new(None),
        };
        let mut catalog = lock(&speaker.catalog);
        speaker.start_listing(&mut catalog);
        drop(catalog);
        speaker
    }

    fn voice_choice(&self) -> VoiceChoice {
        let mut catalog = lock(&self.catalog);
        if catalog.voices.is_none() && !catalog.listing {
            self.start_listing(&mut catalog);
        }

        let voices = catalog.voices.as_deref().unwrap_or(&[]);
        select_voice(voices, &self.voice.preferred_langs, &self.voice.fallback_lang)
    }

    fn start_listing(&self, catalog: &mut VoiceCatalog) {
        catalog.listing = true;
        catalog.attempts += 1;

        let shared = Arc::clone(&self.catalog);
        let program = self.program.clone();
        let engine = self.engine;
        let spawned = thread::Builder::new()
            .name("voice-listing".into())
            .spawn(move || {
                let listed = list_voices(&program, engine);
                let mut catalog = lock(&shared);
                catalog.listing = false;
                if listed.is_empty() {
                    debug!(program = %program, attempt = catalog.attempts, "no voices listed yet");
                } else {
                    debug!(program = %program, count = listed.len(), "voices listed");
                    catalog.voices = Some(listed);
                }
            });

        if let Err(err) = spawned {
            debug!(error = %err, "could not start voice listing");
            catalog.listing = false;
        }
    }

    fn cancel_in_flight(&self, slot: &mut Option<Child>) {
        if let Some(mut child) = slot.take()
            && let Ok(None) = child.try_wait()
        {
            if let Err(err) = child.kill() {
                warn!(error = %err, "failed to cancel previous utterance");
            }
            if let Err(err) = child.wait() {
                debug!(error = %err, "failed to reap cancelled utterance");
            }
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Speaker for CommandSpeaker {
    fn speak(&self, text: &str) -> Result<(), AppError> {
        let choice = self.voice_choice();
        let args = self
            .engine
            .speak_args(&choice, self.voice.words_per_minute(), text);

        let mut slot = lock(&self.in_flight);
        self.cancel_in_flight(&mut slot);

        let child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|err| match err.kind() {
                ErrorKind::NotFound => {
                    AppError::unsupported(format!("{} is not installed", self.program))
                }
                _ => AppError::io(err.to_string()),
            })?;

        debug!(program = %self.program, ?choice, "utterance started");
        *slot = Some(child);
        Ok(())
    }
}
