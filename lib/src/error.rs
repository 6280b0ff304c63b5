use std::error;
use std::fmt;

use reqwest::StatusCode;

/// All possible failures of a single send.
///
/// Cancellation and deadline errors are kept apart from `Transport` so that
/// callers can build their own retry policy on top.
#[derive(Debug)]
pub enum Error {
    Serialization(serde_json::Error),
    InvalidEndpoint(url::ParseError),
    Transport(reqwest::Error),
    Cancelled,
    DeadlineExceeded,
    RemoteRejected { status: StatusCode, body: String },
}

impl Error {
    /// Status code returned by the API, if the request got that far.
    pub fn status(&self) -> Option<StatusCode> {
        match *self {
            Error::RemoteRejected { status, .. } => Some(status),
            _ => None,
        }
    }

    pub fn is_cancellation(&self) -> bool {
        matches!(*self, Error::Cancelled | Error::DeadlineExceeded)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Serialization(ref e) => write!(f, "Serialization: {}", e),
            Error::InvalidEndpoint(ref e) => write!(f, "InvalidEndpoint: {}", e),
            Error::Transport(ref e) => write!(f, "Transport: {}", e),
            Error::Cancelled => f.write_str("Cancelled"),
            Error::DeadlineExceeded => f.write_str("DeadlineExceeded"),
            Error::RemoteRejected { status, ref body } if body.is_empty() => {
                write!(f, "RemoteRejected: status code {}", status.as_u16())
            }
            Error::RemoteRejected { status, ref body } => {
                write!(f, "RemoteRejected: status code {}: {}", status.as_u16(), body)
            }
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::Serialization(ref e) => Some(e),
            Error::InvalidEndpoint(ref e) => Some(e),
            Error::Transport(ref e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::error::Error> for Error {
    fn from(err: serde_json::error::Error) -> Self {
        Self::Serialization(err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidEndpoint(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_only_for_rejections() {
        let err = Error::RemoteRejected {
            status: StatusCode::TOO_MANY_REQUESTS,
            body: String::new(),
        };
        assert_eq!(err.status(), Some(StatusCode::TOO_MANY_REQUESTS));
        assert!(!err.is_cancellation());

        assert_eq!(Error::Cancelled.status(), None);
        assert!(Error::Cancelled.is_cancellation());
        assert!(Error::DeadlineExceeded.is_cancellation());
    }

    #[test]
    fn test_display() {
        let err = Error::RemoteRejected {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: String::new(),
        };
        assert_eq!(err.to_string(), "RemoteRejected: status code 500");

        let err = Error::RemoteRejected {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            body: "{\"error\":\"bad from\"}".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "RemoteRejected: status code 422: {\"error\":\"bad from\"}"
        );

        assert_eq!(Error::DeadlineExceeded.to_string(), "DeadlineExceeded");
    }

    #[test]
    fn test_parse_error_converts() {
        let err: Error = url::Url::parse("not a url").unwrap_err().into();
        assert!(matches!(err, Error::InvalidEndpoint(_)));
        assert!(error::Error::source(&err).is_some());
    }
}
