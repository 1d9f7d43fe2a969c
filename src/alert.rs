//! Alerts describe how an error should be presented to the user.

use std::fmt::Display;

/// What the user should see when an operation fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Alert {
    /// Render next to the offending field or form.
    Inline {
        /// The message explaining what needs to change.
        message: String,
    },
    /// Render as a dismissible banner.
    Banner {
        /// A short summary of what went wrong.
        message: String,
        /// Details for the user, or for the bug report.
        details: String,
    },
    /// Clear the view state and go back to the log in view. No message is
    /// shown and no retry is offered.
    RedirectToLogIn,
    /// The response belonged to an ended session, show nothing.
    Discard,
}

impl Alert {
    /// Whether the alert has any text to show.
    pub fn is_visible(&self) -> bool {
        matches!(self, Alert::Inline { .. } | Alert::Banner { .. })
    }
}

impl Display for Alert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Alert::Inline { message } => write!(f, "{message}"),
            Alert::Banner { message, details } if details.is_empty() => write!(f, "{message}"),
            Alert::Banner { message, details } => write!(f, "{message}: {details}"),
            Alert::RedirectToLogIn => write!(f, "Your session has ended, please log in again."),
            Alert::Discard => Ok(()),
        }
    }
}
