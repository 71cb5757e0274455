use clap::{Parser, Subcommand};
use reminder_core::config::{ConfigOverrides, canonicalize_key};
use reminder_core::error::AppError;
use reminder_core::model::Priority;

#[derive(Parser, Debug)]
#[command(name = "reminder", author, version, about = "Spoken reminders for today's schedule", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Override configuration values (format KEY=VALUE)
    #[arg(long = "config-override", value_name = "KEY=VALUE", global = true)]
    pub config_override: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a task for a time of day
    ///
    /// Example: reminder add "Standup" 14:00
    /// Example: reminder add "Gym" "06:30:00 PM" --priority high
    Add {
        name: String,
        time: String,
        #[arg(short, long, default_value = "medium", value_parser = parse_priority)]
        priority: Priority,
    },
    /// Mark a task done, or pending again if it already is
    ///
    /// Example: reminder done 1766239140000
    #[command(visible_alias = "toggle")]
    Done { id: i64 },
    /// Delete a task
    ///
    /// Example: reminder delete 1766239140000
    Delete { id: i64 },
    /// List tasks with their status
    ///
    /// Example: reminder list
    List,
    /// Start the reminder loop (default when no command is given)
    ///
    /// Commands typed on stdin are run while the loop is active.
    /// Example: reminder run --seed 7
    Run {
        /// Seed for the motivation coin flips
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn parse_priority(raw: &str) -> Result<Priority, String> {
    raw.parse()
        .map_err(|err: AppError| err.message().to_string())
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigOverrideTarget {
    Theme,
    VoiceRate(f32),
    FallbackLang,
    PreferredLangs(Vec<String>),
    DesktopNotifications(bool),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedConfigOverride {
    pub target: ConfigOverrideTarget,
    pub value: String,
}

pub fn parse_config_override(raw: &str) -> Result<ParsedConfigOverride, String> {
    let (key_raw, value_raw) = raw
        .trim()
        .split_once('=')
        .ok_or_else(|| "override must be in KEY=VALUE format".to_string())?;
    let value = value_raw.trim().to_string();

    let (field, subfield) = match key_raw.split_once('.') {
        Some((field, rest)) => (field, canonicalize_key(rest)),
        None => (key_raw, None),
    };
    let field =
        canonicalize_key(field).ok_or_else(|| "override key cannot be empty".to_string())?;

    let target = match (field.as_str(), subfield.as_deref()) {
        ("theme", None) => ConfigOverrideTarget::Theme,
        ("voice", Some("rate")) => {
            let rate: f32 = value
                .parse()
                .map_err(|_| format!("voice.rate must be a number (got '{value}')"))?;
            if !rate.is_finite() || rate <= 0.0 {
                return Err("voice.rate must be positive".to_string());
            }
            ConfigOverrideTarget::VoiceRate(rate)
        }
        ("voice", Some("fallback_lang" | "fallback")) => ConfigOverrideTarget::FallbackLang,
        ("voice", Some("preferred_langs" | "preferred")) => {
            let langs = value
                .split(',')
                .map(str::trim)
                .filter(|lang| !lang.is_empty())
                .map(str::to_string)
                .collect();
            ConfigOverrideTarget::PreferredLangs(langs)
        }
        ("voice", Some(other)) => return Err(format!("unknown voice field '{other}'")),
        ("voice", None) => return Err("voice override requires a field name".to_string()),
        ("desktop_notifications" | "notifications", None) => {
            let enabled = match value.to_ascii_lowercase().as_str() {
                "true" | "on" | "yes" | "1" => true,
                "false" | "off" | "no" | "0" => false,
                _ => return Err(format!("{field} must be true or false")),
            };
            ConfigOverrideTarget::DesktopNotifications(enabled)
        }
        (other, Some(_)) if other == "theme" || other.ends_with("notifications") => {
            return Err(format!("{other} override cannot have subfields"));
        }
        (other, _) => return Err(format!("unknown config field '{other}'")),
    };

    Ok(ParsedConfigOverride { target, value })
}

pub fn collect_overrides(raw: &[String]) -> Result<ConfigOverrides, AppError> {
    let mut overrides = ConfigOverrides::default();
    for entry in raw {
        let parsed = parse_config_override(entry).map_err(AppError::invalid_input)?;
        match parsed.target {
            ConfigOverrideTarget::Theme => overrides.theme = Some(parsed.value),
            ConfigOverrideTarget::VoiceRate(rate) => overrides.voice_rate = Some(rate),
            ConfigOverrideTarget::FallbackLang => overrides.fallback_lang = Some(parsed.value),
            ConfigOverrideTarget::PreferredLangs(langs) => overrides.preferred_langs = Some(langs),
            ConfigOverrideTarget::DesktopNotifications(enabled) => {
                overrides.desktop_notifications = Some(enabled)
            }
        }
    }
    Ok(overrides)
}

pub fn split_command_line(line: &str) -> Result<Vec<String>, AppError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escape = false;

    for ch in line.chars() {
        if escape {
            if ch != '"' && ch != '\\' {
                current.push('\\');
            }
            current.push(ch);
            escape = false;
            continue;
        }

        match ch {
            '\\' if in_quotes => escape = true,
            '"' => in_quotes = !in_quotes,
            ch if ch.is_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    args.push(std::mem::take(&mut current));
                }
            }
            ch => current.push(ch),
        }
    }

    if in_quotes {
        return Err(AppError::invalid_input("unterminated quote in command"));
    }
    if !current.is_empty() {
        args.push(current);
    }

    Ok(args)
}

pub fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

#[cfg(test)]
mod tests {
    use super::{
        Cli, Command, ConfigOverrideTarget, collect_overrides, parse_config_override,
        split_command_line,
    };
    use clap::Parser;
    use reminder_core::model::Priority;

    #[test]
    fn parse_config_override_canonicalizes_field_names() {
        let parsed = parse_config_override(" THEME = Midnight ").unwrap();
        assert_eq!(parsed.target, ConfigOverrideTarget::Theme);
        assert_eq!(parsed.value, "Midnight");
    }

    #[test]
    fn parse_config_override_reads_voice_fields() {
        let rate = parse_config_override("Voice.Rate=1.25").unwrap();
        assert_eq!(rate.target, ConfigOverrideTarget::VoiceRate(1.25));

        let langs = parse_config_override("voice.preferred-langs = en-GB, ,hi-IN").unwrap();
        assert_eq!(
            langs.target,
            ConfigOverrideTarget::PreferredLangs(vec!["en-GB".into(), "hi-IN".into()])
        );

        let fallback = parse_config_override("voice.fallback_lang=en-US").unwrap();
        assert_eq!(fallback.target, ConfigOverrideTarget::FallbackLang);
        assert_eq!(fallback.value, "en-US");
    }

    #[test]
    fn parse_config_override_rejects_bad_values() {
        assert!(
            parse_config_override("voice.rate=fast")
                .unwrap_err()
                .contains("must be a number")
        );
        assert!(
            parse_config_override("voice.rate=-1")
                .unwrap_err()
                .contains("positive")
        );
        assert!(
            parse_config_override("notifications=maybe")
                .unwrap_err()
                .contains("true or false")
        );
        assert!(
            parse_config_override("voice.pitch=3")
                .unwrap_err()
                .contains("unknown voice field")
        );
    }

    #[test]
    fn parse_config_override_rejects_unknown_fields() {
        let err = parse_config_override("unknown.field=value").unwrap_err();
        assert!(err.contains("unknown config field"));
        let err = parse_config_override("theme.accent=red").unwrap_err();
        assert!(err.contains("cannot have subfields"));
    }

    #[test]
    fn parse_config_override_rejects_missing_equals() {
        let err = parse_config_override("themenoir").unwrap_err();
        assert!(err.contains("KEY=VALUE"));
    }

    #[test]
    fn collect_overrides_merges_all_entries() {
        let overrides = collect_overrides(&[
            "theme=noir".to_string(),
            "notifications=on".to_string(),
            "voice.rate=1.1".to_string(),
        ])
        .unwrap();

        assert_eq!(overrides.theme.as_deref(), Some("noir"));
        assert_eq!(overrides.desktop_notifications, Some(true));
        assert_eq!(overrides.voice_rate, Some(1.1));
        assert_eq!(overrides.fallback_lang, None);
    }

    #[test]
    fn collect_overrides_reports_invalid_input() {
        let err = collect_overrides(&["bogus".to_string()]).unwrap_err();
        assert_eq!(err.code(), "invalid_input");
    }

    #[test]
    fn split_command_line_honours_quotes() {
        let args = split_command_line(r#"add "Team standup" 14:00 -p high"#).unwrap();
        assert_eq!(args, vec!["add", "Team standup", "14:00", "-p", "high"]);
        assert_eq!(
            split_command_line(r#"add "say \"hi\"" 10:00"#).unwrap(),
            vec!["add", r#"say "hi""#, "10:00"]
        );
        assert!(split_command_line(r#"add "oops"#).is_err());
    }

    #[test]
    fn add_defaults_priority_to_medium() {
        let cli = Cli::try_parse_from(["reminder", "add", "Standup", "14:00"]).unwrap();
        match cli.command {
            Some(Command::Add { priority, .. }) => assert_eq!(priority, Priority::Medium),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn toggle_is_an_alias_for_done() {
        let cli = Cli::try_parse_from(["reminder", "toggle", "42"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Done { id: 42 })));
    }

    #[test]
    fn bare_invocation_has_no_command() {
        let cli = Cli::try_parse_from(["reminder", "--verbose"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.verbose);
    }
}
