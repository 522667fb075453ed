#[cfg(feature = "network")]
pub mod gemini;
pub mod prompt;
pub mod worker;

use std::sync::Arc;

use thiserror::Error;

use crate::config::Config;
use crate::morse;

pub const OFFLINE_FALLBACK: &str =
    "You appear to be offline. Please connect to the internet to get AI hints.";
pub const GENERIC_FALLBACK: &str =
    "Sorry, I couldn't get a hint right now. Maybe check your API key?";
pub const UNKNOWN_CHAR_FALLBACK: &str = "Could not find Morse code for this character.";

#[derive(Debug, Error)]
pub enum HintError {
    #[error("no network connection")]
    Offline,
    #[error("no API key configured")]
    MissingApiKey,
    #[error("hints are disabled in this build")]
    Disabled,
    #[cfg(feature = "network")]
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("hint service answered with status {0}")]
    Status(u16),
    #[error("hint service returned no text")]
    EmptyResponse,
}

/// Black-box source of short mnemonic hints for a challenge.
pub trait HintProvider: Send + Sync {
    fn fetch_hint(&self, challenge: &str) -> Result<String, HintError>;
}

/// Provider used when the network feature is off or no key is configured.
#[derive(Clone, Copy, Debug, Default)]
pub struct DisabledProvider;

impl HintProvider for DisabledProvider {
    fn fetch_hint(&self, _challenge: &str) -> Result<String, HintError> {
        Err(HintError::Disabled)
    }
}

/// Pick the hint backend for this run. Missing keys and builds without the
/// network feature get a provider that always fails over to the fallback text.
pub fn provider_from_config(config: &Config) -> Arc<dyn HintProvider> {
    #[cfg(feature = "network")]
    {
        let Some(key) = config.resolve_api_key() else {
            tracing::info!("no hint API key configured; hints will use fallback text");
            return Arc::new(DisabledProvider);
        };
        let timeout = std::time::Duration::from_secs(config.hint_timeout_secs);
        match gemini::GeminiHintProvider::new(key, config.hint_model.clone(), timeout) {
            Ok(provider) => return Arc::new(provider),
            Err(e) => tracing::warn!("hint provider unavailable: {e}"),
        }
    }
    #[cfg(not(feature = "network"))]
    let _ = config;
    Arc::new(DisabledProvider)
}

/// Ask `provider` for a hint, turning every failure into a readable message.
pub fn get_hint(provider: &dyn HintProvider, challenge: &str, online: bool) -> String {
    let is_word = challenge.chars().count() > 1;
    if !is_word && challenge.chars().next().and_then(morse::encode_char).is_none() {
        return UNKNOWN_CHAR_FALLBACK.to_string();
    }
    match provider.fetch_hint(challenge) {
        Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
        Ok(_) => {
            tracing::warn!("hint provider returned blank text for {challenge:?}");
            GENERIC_FALLBACK.to_string()
        }
        Err(e) => {
            tracing::warn!("hint request for {challenge:?} failed: {e}");
            if !online || matches!(e, HintError::Offline) {
                OFFLINE_FALLBACK.to_string()
            } else {
                GENERIC_FALLBACK.to_string()
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HintRequest {
    /// Nothing cached yet: the caller should start a fetch for this challenge.
    Fetch { challenge: String, serial: u64 },
    /// A cached hint was shown or hidden without refetching.
    Toggled { visible: bool },
    /// A fetch is already in flight.
    Ignored,
}

/// Per-challenge hint cache. Cleared whenever the challenge changes.
#[derive(Clone, Debug, Default)]
pub struct HintSlot {
    text: Option<String>,
    visible: bool,
    loading: bool,
}

impl HintSlot {
    pub fn request(&mut self, challenge: &str, serial: u64) -> HintRequest {
        if self.loading {
            return HintRequest::Ignored;
        }
        if self.text.is_some() {
            self.visible = !self.visible;
            return HintRequest::Toggled {
                visible: self.visible,
            };
        }
        self.loading = true;
        HintRequest::Fetch {
            challenge: challenge.to_string(),
            serial,
        }
    }

    pub fn fulfil(&mut self, text: String) {
        self.text = Some(text);
        self.visible = true;
        self.loading = false;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn visible_text(&self) -> Option<&str> {
        if self.visible {
            self.text.as_deref()
        } else {
            None
        }
    }

    pub fn has_text(&self) -> bool {
        self.text.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FailingProvider;

    impl HintProvider for FailingProvider {
        fn fetch_hint(&self, _challenge: &str) -> Result<String, HintError> {
            Err(HintError::Status(429))
        }
    }

    struct CountingProvider {
        calls: AtomicUsize,
        reply: &'static str,
    }

    impl HintProvider for CountingProvider {
        fn fetch_hint(&self, _challenge: &str) -> Result<String, HintError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.reply.to_string())
        }
    }

    #[test]
    fn test_failure_yields_generic_fallback_when_online() {
        let hint = get_hint(&FailingProvider, "SOS", true);
        assert_eq!(hint, GENERIC_FALLBACK);
    }

    #[test]
    fn test_failure_yields_offline_fallback_when_offline() {
        let hint = get_hint(&FailingProvider, "E", false);
        assert_eq!(hint, OFFLINE_FALLBACK);
    }

    #[test]
    fn test_disabled_provider_never_panics() {
        let hint = get_hint(&DisabledProvider, "THE", true);
        assert!(!hint.is_empty());
    }

    #[test]
    fn test_unknown_single_char_skips_provider() {
        let provider = CountingProvider {
            calls: AtomicUsize::new(0),
            reply: "unused",
        };
        assert_eq!(get_hint(&provider, "?", true), UNKNOWN_CHAR_FALLBACK);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_blank_reply_is_replaced() {
        let provider = CountingProvider {
            calls: AtomicUsize::new(0),
            reply: "   ",
        };
        assert_eq!(get_hint(&provider, "A", true), GENERIC_FALLBACK);
    }

    #[test]
    fn test_success_is_trimmed() {
        let provider = CountingProvider {
            calls: AtomicUsize::new(0),
            reply: "  A-bove and below.\n",
        };
        assert_eq!(get_hint(&provider, "A", true), "A-bove and below.");
    }

    #[test]
    fn test_slot_fetches_once_then_toggles() {
        let mut slot = HintSlot::default();
        assert_eq!(
            slot.request("E", 3),
            HintRequest::Fetch {
                challenge: "E".to_string(),
                serial: 3
            }
        );
        assert!(slot.is_loading());
        assert_eq!(slot.request("E", 3), HintRequest::Ignored);

        slot.fulfil("Every egg".to_string());
        assert_eq!(slot.visible_text(), Some("Every egg"));
        assert_eq!(slot.request("E", 3), HintRequest::Toggled { visible: false });
        assert_eq!(slot.visible_text(), None);
        assert_eq!(slot.request("E", 3), HintRequest::Toggled { visible: true });
        assert_eq!(slot.visible_text(), Some("Every egg"));
    }

    #[test]
    fn test_slot_clear_forgets_everything() {
        let mut slot = HintSlot::default();
        slot.request("E", 0);
        slot.fulfil("x".to_string());
        slot.clear();
        assert!(!slot.has_text());
        assert!(!slot.is_loading());
    }
}
