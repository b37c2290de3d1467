pub mod clone_url;
pub mod credentials;
