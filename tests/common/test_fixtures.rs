//! Test fixtures

use std::path::{Path, PathBuf};

use forkctl::domain::entities::repository::RepositoryDescriptor;
use forkctl::domain::value_objects::clone_url::CloneUrl;

pub const ORGANIZATION: &str = "networkgcorefullcode";

pub fn descriptor(name: &str) -> RepositoryDescriptor {
    let url = format!("https://github.com/{ORGANIZATION}/{name}.git");
    RepositoryDescriptor::new(CloneUrl::new(&url).unwrap())
}

pub fn descriptors(names: &[&str]) -> Vec<RepositoryDescriptor> {
    names.iter().map(|n| descriptor(n)).collect()
}

/// JSON body shaped like the GitHub repository listing.
pub fn listing_json(names: &[&str]) -> String {
    let entries: Vec<serde_json::Value> = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            serde_json::json!({
                "id": i + 1,
                "name": name,
                "full_name": format!("{ORGANIZATION}/{name}"),
                "fork": true,
                "clone_url": format!("https://github.com/{ORGANIZATION}/{name}.git"),
            })
        })
        .collect();
    serde_json::Value::Array(entries).to_string()
}

/// Creates `<root>/<name>` and optionally drops a binary at `relative`.
pub fn component_repo(root: &Path, name: &str, binary_at: Option<&str>) -> PathBuf {
    let repo = root.join(name);
    std::fs::create_dir_all(&repo).unwrap();
    if let Some(relative) = binary_at {
        let binary = repo.join(relative);
        if let Some(parent) = binary.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(binary, "#!/bin/sh\n").unwrap();
    }
    repo
}
