use std::fmt;

use askama::Template;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Success => fmt.write_str("success"),
            Self::Error => fmt.write_str("error"),
        }
    }
}

/// Transient status message shown above the phonebook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Success,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Error,
        }
    }
}

#[derive(Template)]
#[template(path = "notification.html")]
struct NotificationView<'a> {
    message: &'a str,
    severity: Severity,
}

/// Renders the given notification or nothing at all.
pub fn render(notification: Option<&Notification>) -> askama::Result<String> {
    match notification {
        Some(notification) => NotificationView {
            message: &notification.message,
            severity: notification.severity,
        }
        .render(),
        None => Ok(String::new()),
    }
}
