//! Localized messages for errors the session core surfaces.
//!
//! Only the messages this crate itself produces live here; screen copy belongs
//! to the host's string tables. English and Hindi are shipped, every other
//! language falls back to English.

use crate::types::Language;

/// Stable identifier for a user-facing message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    InvalidCredentials,
    SignInUnavailable,
    SignInBusy,
    SignInCancelled,
    RegistrationRejected,
    RegistrationUnreachable,
    InvalidInput,
    NotAllowedNow,
    StorageFailure,
    Generic,
}

impl MessageKey {
    /// Dotted key, for hosts that keep their own tables
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKey::InvalidCredentials => "auth.invalid_credentials",
            MessageKey::SignInUnavailable => "auth.unavailable",
            MessageKey::SignInBusy => "auth.busy",
            MessageKey::SignInCancelled => "auth.cancelled",
            MessageKey::RegistrationRejected => "register.rejected",
            MessageKey::RegistrationUnreachable => "register.unreachable",
            MessageKey::InvalidInput => "form.invalid",
            MessageKey::NotAllowedNow => "session.not_allowed",
            MessageKey::StorageFailure => "storage.failure",
            MessageKey::Generic => "error.generic",
        }
    }
}

/// Message text for `key` in `language`
pub fn message(key: MessageKey, language: Language) -> &'static str {
    match language {
        Language::Hi => hindi(key),
        _ => english(key),
    }
}

fn english(key: MessageKey) -> &'static str {
    match key {
        MessageKey::InvalidCredentials => "That username or password is not right. Please check your password.",
        MessageKey::SignInUnavailable => "We could not reach the server. Please check your connection and try again.",
        MessageKey::SignInBusy => "Signing you in, please wait.",
        MessageKey::SignInCancelled => "Sign-in was cancelled.",
        MessageKey::RegistrationRejected => "We could not create your account. Try a different username.",
        MessageKey::RegistrationUnreachable => "We could not reach the server to create your account. Please check your connection.",
        MessageKey::InvalidInput => "Please check the highlighted fields.",
        MessageKey::NotAllowedNow => "That is not available right now.",
        MessageKey::StorageFailure => "We could not save your progress on this device.",
        MessageKey::Generic => "Something went wrong. Please try again.",
    }
}

fn hindi(key: MessageKey) -> &'static str {
    match key {
        MessageKey::InvalidCredentials => "उपयोगकर्ता नाम या पासवर्ड सही नहीं है। कृपया अपना पासवर्ड जाँचें।",
        MessageKey::SignInUnavailable => "सर्वर से संपर्क नहीं हो सका। कृपया अपना कनेक्शन जाँचें और फिर से प्रयास करें।",
        MessageKey::SignInBusy => "आपको साइन इन किया जा रहा है, कृपया प्रतीक्षा करें।",
        MessageKey::SignInCancelled => "साइन इन रद्द कर दिया गया।",
        MessageKey::RegistrationRejected => "आपका खाता नहीं बन सका। कोई दूसरा उपयोगकर्ता नाम आज़माएँ।",
        MessageKey::RegistrationUnreachable => "खाता बनाने के लिए सर्वर से संपर्क नहीं हो सका। कृपया अपना कनेक्शन जाँचें।",
        MessageKey::InvalidInput => "कृपया चिह्नित फ़ील्ड जाँचें।",
        MessageKey::NotAllowedNow => "यह अभी उपलब्ध नहीं है।",
        MessageKey::StorageFailure => "आपकी प्रगति इस डिवाइस पर सहेजी नहीं जा सकी।",
        MessageKey::Generic => "कुछ गलत हो गया। कृपया फिर से प्रयास करें।",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hindi_differs_from_english() {
        assert_ne!(
            message(MessageKey::InvalidCredentials, Language::Hi),
            message(MessageKey::InvalidCredentials, Language::En)
        );
    }

    #[test]
    fn test_untranslated_language_falls_back_to_english() {
        assert_eq!(
            message(MessageKey::SignInUnavailable, Language::Ta),
            message(MessageKey::SignInUnavailable, Language::En)
        );
    }

    #[test]
    fn test_keys_are_dotted() {
        assert_eq!(MessageKey::SignInUnavailable.as_str(), "auth.unavailable");
    }
}
