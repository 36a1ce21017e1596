use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagInfo {
    pub name: String,
    pub target_sha: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    pub sha: String,
    pub message: String,
}

/// Credentials offered to the remote during a push.
#[derive(Clone, Default, PartialEq, Eq)]
pub enum PushAuth {
    /// Whatever the environment provides (SSH agent, credential helper).
    #[default]
    Ambient,
    /// HTTPS token, sent as the password of `x-access-token`.
    Token(String),
}

impl fmt::Debug for PushAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ambient => f.write_str("Ambient"),
            Self::Token(_) => f.write_str("Token(<redacted>)"),
        }
    }
}
