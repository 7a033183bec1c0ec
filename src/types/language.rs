//! Interface languages

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ValidationError;

/// Language the learner chose for the interface.
///
/// Serialized as its lowercase ISO 639-1 code (`"en"`, `"hi"`, ...).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English
    #[default]
    En,
    /// Hindi
    Hi,
    /// Bengali
    Bn,
    /// Marathi
    Mr,
    /// Tamil
    Ta,
    /// Telugu
    Te,
}

impl Language {
    pub const ALL: [Language; 6] = [
        Language::En,
        Language::Hi,
        Language::Bn,
        Language::Mr,
        Language::Ta,
        Language::Te,
    ];

    /// Parse from an ISO 639-1 code (case-insensitive)
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "en" => Some(Self::En),
            "hi" => Some(Self::Hi),
            "bn" => Some(Self::Bn),
            "mr" => Some(Self::Mr),
            "ta" => Some(Self::Ta),
            "te" => Some(Self::Te),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Hi => "hi",
            Self::Bn => "bn",
            Self::Mr => "mr",
            Self::Ta => "ta",
            Self::Te => "te",
        }
    }

    /// Name of the language in that language, for the language picker
    pub fn native_name(&self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Hi => "हिन्दी",
            Self::Bn => "বাংলা",
            Self::Mr => "मराठी",
            Self::Ta => "தமிழ்",
            Self::Te => "తెలుగు",
        }
    }
}

impl FromStr for Language {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| ValidationError::UnknownLanguage(s.to_string()))
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_roundtrip_for_all() {
        for lang in Language::ALL {
            assert_eq!(Language::from_code(lang.code()), Some(lang));
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("HI".parse::<Language>().unwrap(), Language::Hi);
        assert!(matches!(
            "xx".parse::<Language>(),
            Err(ValidationError::UnknownLanguage(code)) if code == "xx"
        ));
    }

    #[test]
    fn test_serde_uses_codes() {
        assert_eq!(serde_json::to_string(&Language::Hi).unwrap(), "\"hi\"");
        let lang: Language = serde_json::from_str("\"ta\"").unwrap();
        assert_eq!(lang, Language::Ta);
    }
}
