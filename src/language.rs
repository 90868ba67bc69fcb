//! Active-language bookkeeping.
//!
//! Any code is accepted: records without text for it simply render empty
//! strings. Re-rendering and idle re-arming are sequenced by the coordinator.

use tracing::{debug, warn};

use crate::session::Session;

#[derive(Debug, Clone)]
pub struct LanguageController {
    supported: Vec<String>,
    default: String,
}

impl LanguageController {
    pub fn new(supported: Vec<String>, default: String) -> Self {
        Self { supported, default }
    }

    /// Selector languages, in button order.
    pub fn supported(&self) -> &[String] {
        &self.supported
    }

    pub fn is_supported(&self, code: &str) -> bool {
        self.supported.iter().any(|c| c == code)
    }

    pub fn default_language(&self) -> &str {
        &self.default
    }

    /// Store `code` as the session language. Returns whether it changed.
    pub fn set_language(&self, session: &mut Session, code: &str) -> bool {
        if !self.is_supported(code) {
            warn!("Language \"{code}\" is not configured; text will be empty");
        }
        if session.language == code {
            return false;
        }
        debug!("Language {} → {code}", session.language);
        session.language = code.to_string();
        true
    }

    /// Language bound to selector slot `n` (1-based, as on the keyboard).
    pub fn by_slot(&self, n: usize) -> Option<&str> {
        n.checked_sub(1)
            .and_then(|i| self.supported.get(i))
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> LanguageController {
        LanguageController::new(vec!["en".into(), "es".into()], "en".into())
    }

    #[test]
    fn accepts_unconfigured_codes() {
        let languages = controller();
        let mut session = Session::new("en");
        assert!(languages.set_language(&mut session, "xx"));
        assert_eq!(session.language, "xx");
        assert!(!languages.is_supported("xx"));
        assert!(!languages.set_language(&mut session, "xx"));
    }

    #[test]
    fn slots_are_one_based() {
        let languages = controller();
        assert_eq!(languages.by_slot(1), Some("en"));
        assert_eq!(languages.by_slot(2), Some("es"));
        assert_eq!(languages.by_slot(0), None);
        assert_eq!(languages.by_slot(3), None);
    }
}
