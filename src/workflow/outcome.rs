/// A translated archive ready to be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedArchive {
    pub bytes: Vec<u8>,
    pub filename: String,
    /// Advisory text from the server, e.g. languages that failed.
    pub warnings: Option<String>,
}

/// The single result of one submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultOutcome {
    Success(TranslatedArchive),
    Failure { message: String },
}

impl ResultOutcome {
    pub fn failure(message: impl Into<String>) -> Self {
        ResultOutcome::Failure {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ResultOutcome::Success(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeState {
    Pending,
    Success,
    Error,
}

impl BadgeState {
    pub fn css_class(&self) -> &'static str {
        match self {
            BadgeState::Pending => "dim-label",
            BadgeState::Success => "success",
            BadgeState::Error => "error",
        }
    }
}

/// Per-language status chip shown next to the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageBadge {
    pub code: String,
    pub state: BadgeState,
}

/// Derive badges for the requested languages. Before an outcome exists every
/// language is pending.
pub fn badges_for(languages: &[String], outcome: Option<&ResultOutcome>) -> Vec<LanguageBadge> {
    let state = match outcome {
        None => BadgeState::Pending,
        Some(ResultOutcome::Success(_)) => BadgeState::Success,
        Some(ResultOutcome::Failure { .. }) => BadgeState::Error,
    };
    languages
        .iter()
        .map(|code| LanguageBadge {
            code: code.clone(),
            state,
        })
        .collect()
}
