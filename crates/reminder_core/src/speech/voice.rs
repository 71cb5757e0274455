#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voice {
    pub id: String,
    pub lang: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceChoice {
    Voice(Voice),
    Language(String),
}

pub fn normalize_lang(raw: &str) -> String {
    raw.trim().replace('_', "-").to_ascii_lowercase()
}

fn primary_subtag(lang: &str) -> &str {
    lang.split('-').next().unwrap_or(lang)
}

pub fn select_voice(voices: &[Voice], preferred: &[String], fallback: &str) -> VoiceChoice {
    let preferred: Vec<String> = preferred.iter().map(|lang| normalize_lang(lang)).collect();

    for lang in &preferred {
        if let Some(voice) = voices.iter().find(|voice| voice.lang.contains(lang.as_str())) {
            return VoiceChoice::Voice(voice.clone());
        }
    }

    for lang in &preferred {
        let wanted = primary_subtag(lang);
        if let Some(voice) = voices
            .iter()
            .find(|voice| primary_subtag(&voice.lang) == wanted)
        {
            return VoiceChoice::Voice(voice.clone());
        }
    }

    VoiceChoice::Language(fallback.trim().to_string())
}

/// Parses `espeak-ng --voices`.
///
/// ```text
/// Pty Language       Age/Gender VoiceName          File                 Other Languages
///  5  hi              --/M      Hindi              inc/hi
/// ```
pub fn parse_espeak_voices(listing: &str) -> Vec<Voice> {
    listing
        .lines()
        .filter_map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 5 || fields[0] == "Pty" {
                return None;
            }
            Some(Voice {
                id: fields[4].to_string(),
                lang: normalize_lang(fields[1]),
            })
        })
        .collect()
}

/// Parses `say -v '?'`, where names may contain spaces.
///
/// ```text
/// Lekha               hi_IN    # Namaste, mera naam Lekha hai.
/// ```
pub fn parse_say_voices(listing: &str) -> Vec<Voice> {
    listing
        .lines()
        .filter_map(|line| {
            let head = line.split('#').next()?.trim();
            let (name, lang) = head.rsplit_once(char::is_whitespace)?;
            let name = name.trim();
            if name.is_empty() || lang.is_empty() {
                return None;
            }
            Some(Voice {
                id: name.to_string(),
                lang: normalize_lang(lang),
            })
        })
        .collect()
}
