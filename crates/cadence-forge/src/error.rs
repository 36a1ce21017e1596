use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForgeError {
    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),

    #[error("request to {target} failed")]
    Http {
        target: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{target} responded with status {status}: {message}")]
    Status {
        target: String,
        status: u16,
        message: String,
    },

    #[error("unexpected response body from {target}")]
    Decode {
        target: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{url}'")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: Option<url::ParseError>,
    },
}

impl ForgeError {
    /// Status code of a non-2xx response, if that is what failed.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The call that failed, as `METHOD url`.
    #[must_use]
    pub fn target(&self) -> Option<&str> {
        match self {
            Self::Http { target, .. } | Self::Status { target, .. } | Self::Decode { target, .. } => {
                Some(target)
            }
            Self::Client(_) | Self::InvalidBaseUrl { .. } => None,
        }
    }
}
