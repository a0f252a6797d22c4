use http::StatusCode;
use serde_json::json;

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("Network failure: {0}")]
    Network(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Maximum nesting depth exceeded: {0}")]
    MaxDepthExceeded(String),

    #[error("Permission denied")]
    PermissionDenied,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Server failure ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl Error {
    /// Status code the REST collaborator answers with for this error, if it comes from it
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            Error::Network(_) | Error::MalformedResponse(_) => None,
            Error::Validation(_) | Error::MaxDepthExceeded(_) => Some(StatusCode::BAD_REQUEST),
            Error::PermissionDenied => Some(StatusCode::FORBIDDEN),
            Error::NotFound(_) => Some(StatusCode::NOT_FOUND),
            Error::Conflict(_) => Some(StatusCode::CONFLICT),
            Error::Server { status, .. } => {
                Some(StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR))
            }
        }
    }

    /// Response body the REST collaborator sends along with this error
    pub fn contents(&self) -> Vec<u8> {
        let body = match self {
            Error::MaxDepthExceeded(msg) => json!({
                "success": false,
                "message": msg,
                "type": "max-depth",
            }),
            Error::PermissionDenied => json!({
                "success": false,
                "message": "permission denied",
            }),
            Error::Network(msg)
            | Error::Validation(msg)
            | Error::NotFound(msg)
            | Error::Conflict(msg)
            | Error::MalformedResponse(msg)
            | Error::Server { message: msg, .. } => json!({
                "success": false,
                "message": msg,
            }),
        };
        body.to_string().into_bytes()
    }

    /// Classifies a non-success response, pulling a best-effort message out of its body
    pub fn from_response(status: StatusCode, body: &[u8]) -> Error {
        let data = serde_json::from_slice::<serde_json::Value>(body).ok();
        let field = |name: &str| {
            data.as_ref()
                .and_then(|d| d.get(name))
                .and_then(|m| m.as_str())
                .map(String::from)
        };
        let message = field("message")
            .or_else(|| field("error"))
            .or_else(|| {
                let text = String::from_utf8_lossy(body).trim().to_string();
                (data.is_none() && !text.is_empty()).then_some(text)
            })
            .unwrap_or_default();
        let is_depth = field("type").map_or(false, |t| t == "max-depth")
            || message.to_lowercase().contains("depth");

        match status {
            StatusCode::FORBIDDEN | StatusCode::UNAUTHORIZED => Error::PermissionDenied,
            StatusCode::NOT_FOUND => Error::NotFound(message),
            StatusCode::CONFLICT => Error::Conflict(message),
            s if s.is_client_error() && is_depth => Error::MaxDepthExceeded(message),
            s if s.is_client_error() => Error::Validation(message),
            s => Error::Server {
                status: s.as_u16(),
                message,
            },
        }
    }

    /// Text shown to the user in a transient notice
    pub fn user_message(&self) -> String {
        let or = |msg: &String, fallback: &str| {
            if msg.trim().is_empty() {
                String::from(fallback)
            } else {
                msg.clone()
            }
        };
        match self {
            Error::Network(_) => String::from("Cannot connect to server"),
            Error::Validation(msg) => or(msg, "The request was rejected by the server"),
            Error::MaxDepthExceeded(msg) => or(msg, "Maximum nesting depth reached"),
            Error::PermissionDenied => String::from("You do not have permission to do this"),
            Error::NotFound(msg) => or(msg, "The requested item does not exist"),
            Error::Conflict(msg) => or(msg, "This item was changed by someone else"),
            Error::Server { message, .. } => or(message, "Something went wrong, please try again"),
            Error::MalformedResponse(_) => String::from("Unexpected response from server"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_is_read_from_body() {
        let e = Error::from_response(StatusCode::BAD_REQUEST, br#"{"message":"title is required"}"#);
        assert_eq!(e, Error::Validation(String::from("title is required")));
        let e = Error::from_response(StatusCode::BAD_GATEWAY, br#"{"error":"upstream down"}"#);
        assert_eq!(
            e,
            Error::Server {
                status: 502,
                message: String::from("upstream down")
            }
        );
        let e = Error::from_response(StatusCode::INTERNAL_SERVER_ERROR, b"boom");
        assert_eq!(e.user_message(), "boom");
    }

    #[test]
    fn statuses_are_classified() {
        assert_eq!(
            Error::from_response(StatusCode::FORBIDDEN, b""),
            Error::PermissionDenied
        );
        assert!(matches!(
            Error::from_response(StatusCode::NOT_FOUND, b"{}"),
            Error::NotFound(_)
        ));
        assert!(matches!(
            Error::from_response(StatusCode::CONFLICT, b"{}"),
            Error::Conflict(_)
        ));
        assert!(matches!(
            Error::from_response(
                StatusCode::BAD_REQUEST,
                br#"{"message":"Maximum subtask depth of 3 reached"}"#
            ),
            Error::MaxDepthExceeded(_)
        ));
    }

    #[test]
    fn contents_parse_back() {
        for e in [
            Error::Validation(String::from("bad color")),
            Error::MaxDepthExceeded(String::from("too deep")),
            Error::PermissionDenied,
            Error::NotFound(String::from("no such task")),
            Error::Conflict(String::from("name taken")),
            Error::Server {
                status: 503,
                message: String::from("maintenance"),
            },
        ] {
            let status = e.status_code().expect("server-side error has a status");
            assert_eq!(Error::from_response(status, &e.contents()), e);
        }
    }

    #[test]
    fn user_message_falls_back() {
        assert_eq!(
            Error::Validation(String::new()).user_message(),
            "The request was rejected by the server"
        );
        assert_eq!(
            Error::Network(String::from("dns")).user_message(),
            "Cannot connect to server"
        );
    }

    #[test]
    fn any_error_response_has_a_message() {
        bolero::check!()
            .with_type::<(u16, Vec<u8>)>()
            .for_each(|(status, body)| {
                let status = StatusCode::from_u16(400 + status % 200).unwrap();
                let e = Error::from_response(status, body);
                assert!(e.status_code().is_some(), "{e:?} lost its status");
                assert!(!e.user_message().trim().is_empty());
            });
    }
}
