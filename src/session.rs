//! Process-wide kiosk session.

/// Language and selection shared by every controller. Only the coordinator
/// owns it; controllers borrow it for the duration of one handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub language: String,
    /// Id of the record shown in the detail view, if any.
    pub selection: Option<String>,
}

impl Session {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            selection: None,
        }
    }
}
