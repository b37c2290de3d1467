use std::fmt;

/// Optional GitHub username/token pair supplied by the operator.
///
/// Only a pair where both halves are non-empty is usable for authenticated
/// clones. The token never appears in `Debug` output.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    username: Option<String>,
    token: Option<String>,
}

impl Credentials {
    pub fn new(username: Option<String>, token: Option<String>) -> Self {
        Self {
            username: username.filter(|u| !u.trim().is_empty()),
            token: token.filter(|t| !t.trim().is_empty()),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Both halves, if both were supplied.
    pub fn pair(&self) -> Option<(&str, &str)> {
        match (&self.username, &self.token) {
            (Some(user), Some(token)) => Some((user.as_str(), token.as_str())),
            _ => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.pair().is_some()
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("token", &self.token.as_ref().map(|_| "***"))
            .finish()
    }
}
