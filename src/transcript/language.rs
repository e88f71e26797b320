use serde::{Deserialize, Serialize};

/// Languages the validator has lexicons and prompts for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Spanish.
    #[default]
    Es,

    /// English.
    En,
}

impl Language {
    /// Two-letter ISO 639-1 code.
    pub fn code(self) -> &'static str {
        match self {
            Self::Es => "es",
            Self::En => "en",
        }
    }

    /// Parse a language code such as `"es"`, `"EN"` or `"es-MX"`.
    pub fn from_code(code: &str) -> Option<Self> {
        let primary = code.trim().split(['-', '_']).next()?;
        if primary.eq_ignore_ascii_case("es") {
            Some(Self::Es)
        } else if primary.eq_ignore_ascii_case("en") {
            Some(Self::En)
        } else {
            None
        }
    }

    /// The other supported language.
    pub fn other(self) -> Self {
        match self {
            Self::Es => Self::En,
            Self::En => Self::Es,
        }
    }
}

/// Canned prompt asking the user to say that again.
pub fn repeat_request(language: Language) -> &'static str {
    match language {
        Language::Es => "Disculpa, no te he entendido bien. ¿Podrías repetirlo, por favor?",
        Language::En => "Sorry, I didn't quite catch that. Could you say it again, please?",
    }
}

/// Like [`repeat_request`], keyed by language code; unknown codes get the Spanish prompt.
pub fn repeat_request_message(code: &str) -> &'static str {
    repeat_request(Language::from_code(code).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_codes_loosely() {
        assert_eq!(Language::from_code("es"), Some(Language::Es));
        assert_eq!(Language::from_code(" EN "), Some(Language::En));
        assert_eq!(Language::from_code("es-MX"), Some(Language::Es));
        assert_eq!(Language::from_code("en_GB"), Some(Language::En));
        assert_eq!(Language::from_code("fr"), None);
        assert_eq!(Language::from_code(""), None);
    }

    #[test]
    fn repeat_message_defaults_to_spanish() {
        assert_eq!(repeat_request_message("en"), repeat_request(Language::En));
        assert_eq!(repeat_request_message("de"), repeat_request(Language::Es));
        assert!(repeat_request_message("es").contains("repetir"));
    }

    #[test]
    fn serializes_as_code() -> anyhow::Result<()> {
        assert_eq!(serde_json::to_string(&Language::En)?, r#""en""#);
        assert_eq!(Language::Es.other(), Language::En);
        Ok(())
    }
}
