use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "smart-reminder";
const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_ENV_VAR: &str = "REMINDER_CONFIG_PATH";

pub const BASE_WORDS_PER_MINUTE: f32 = 175.0;

#[derive(Debug, Clone)]
pub struct Palette {
    pub accent: &'static str,
    pub muted: &'static str,
    pub reset: &'static str,
}

impl Palette {
    pub fn accentize(&self, text: &str) -> String {
        self.paint(self.accent, text)
    }

    pub fn mutedize(&self, text: &str) -> String {
        self.paint(self.muted, text)
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if color.is_empty() {
            text.to_string()
        } else {
            format!("{color}{text}{}", self.reset)
        }
    }
}

pub fn palette_for_theme(theme: Option<&str>) -> Palette {
    match theme.and_then(canonical_theme_name).as_deref() {
        Some("noir") => Palette {
            accent: "\x1b[38;5;208m",
            muted: "\x1b[38;5;250m",
            reset: "\x1b[0m",
        },
        Some("solarized") => Palette {
            accent: "\x1b[38;5;108m",
            muted: "\x1b[38;5;250m",
            reset: "\x1b[0m",
        },
        _ => Palette {
            accent: "",
            muted: "",
            reset: "",
        },
    }
}

pub fn canonical_theme_name(raw: &str) -> Option<String> {
    let Some(cleaned) = canonicalize_key(raw) else {
        return Some("default".into());
    };

    match cleaned.as_str() {
        "vanilla" | "light" => Some("default".to_string()),
        "dark" | "dark_mode" | "darkmode" => Some("noir".to_string()),
        _ => Some(cleaned),
    }
}

pub fn canonicalize_key(raw: &str) -> Option<String> {
    let mut cleaned = String::new();
    let mut previous_underscore = false;

    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            cleaned.push(ch.to_ascii_lowercase());
            previous_underscore = false;
        } else if !previous_underscore && !cleaned.is_empty() {
            cleaned.push('_');
            previous_underscore = true;
        }
    }

    let trimmed = cleaned.trim_matches('_');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    pub preferred_langs: Vec<String>,
    pub fallback_lang: String,
    pub rate: f32,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            preferred_langs: vec!["ur-PK".to_string(), "hi-IN".to_string()],
            fallback_lang: "hi-IN".to_string(),
            rate: 0.9,
        }
    }
}

impl VoiceConfig {
    pub fn words_per_minute(&self) -> u32 {
        (BASE_WORDS_PER_MINUTE * self.rate.max(0.1)).round() as u32
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub voice: VoiceConfig,
    #[serde(default)]
    pub desktop_notifications: bool,
}

#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: Config,
    pub error: Option<AppError>,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ConfigOverrides {
    pub theme: Option<String>,
    pub voice_rate: Option<f32>,
    pub fallback_lang: Option<String>,
    pub preferred_langs: Option<Vec<String>>,
    pub desktop_notifications: Option<bool>,
}

pub fn app_dir() -> Result<PathBuf, AppError> {
    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::invalid_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata).join(APP_DIR_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home).join(".config").join(APP_DIR_NAME))
    }
}

pub fn config_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    Ok(app_dir()?.join(CONFIG_FILE_NAME))
}

pub fn load_config_with_fallback() -> ConfigLoad {
    match config_path() {
        Ok(path) => load_config_with_fallback_from_path(&path),
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

fn load_config_with_fallback_from_path(path: &Path) -> ConfigLoad {
    if !path.exists() {
        return ConfigLoad {
            config: Config::default(),
            error: None,
        };
    }

    match load_config_from_path(path) {
        Ok(config) => ConfigLoad {
            config,
            error: None,
        },
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

fn load_config_from_path(path: &Path) -> Result<Config, AppError> {
    let content = std::fs::read_to_string(path)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
    let mut config: Config = serde_json::from_str(&content).map_err(|err| {
        AppError::invalid_data(format!("invalid JSON in {}: {}", path.display(), err))
    })?;
    config.theme = config.theme.and_then(|name| canonical_theme_name(&name));
    Ok(config)
}

pub fn merge_overrides(base: &Config, overrides: &ConfigOverrides) -> Config {
    let mut merged = base.clone();
    if let Some(theme) = overrides.theme.as_deref()
        && let Some(normalized) = canonical_theme_name(theme)
    {
        merged.theme = Some(normalized);
    }
    if let Some(rate) = overrides.voice_rate {
        merged.voice.rate = rate;
    }
    if let Some(lang) = overrides.fallback_lang.as_ref() {
        merged.voice.fallback_lang = lang.clone();
    }
    if let Some(langs) = overrides.preferred_langs.as_ref() {
        merged.voice.preferred_langs = langs.clone();
    }
    if let Some(enabled) = overrides.desktop_notifications {
        merged.desktop_notifications = enabled;
    }

    merged
}
