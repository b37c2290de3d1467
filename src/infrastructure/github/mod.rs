pub mod client;

pub use client::{GitHubClient, RepositoryListingError, RepositorySource};

#[cfg(test)]
pub use client::MockRepositorySource;
