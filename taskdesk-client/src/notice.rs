use crate::api::Error;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A transient message shown to the user after an action
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Notice {
        Notice {
            level: NoticeLevel::Success,
            text: text.into(),
        }
    }

    /// Notice for a failed action, `action` being what the user tried to do
    pub fn failure(action: &str, err: &Error) -> Notice {
        let text = match err {
            Error::PermissionDenied => format!("You don't have permission to {action}."),
            Error::Network(_) | Error::MalformedResponse(_) => {
                format!("Failed to {action}: {}", err.user_message())
            }
            _ => err.user_message(),
        };
        Notice {
            level: NoticeLevel::Error,
            text,
        }
    }
}
