use serde::{Deserialize, Serialize};

use crate::domain::value_objects::clone_url::CloneUrl;

/// One entry of the hosting API's repository listing.
///
/// Unknown fields in the response are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryDescriptor {
    /// Repository name, when the API supplies it
    #[serde(default)]
    pub name: Option<String>,

    pub clone_url: CloneUrl,
}

impl RepositoryDescriptor {
    pub fn new(clone_url: CloneUrl) -> Self {
        Self {
            name: None,
            clone_url,
        }
    }

    /// Label used in logs and reports.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .unwrap_or_else(|| self.clone_url.repository_name())
    }
}
