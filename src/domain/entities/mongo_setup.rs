use std::path::{Path, PathBuf};

/// Replica set settings written to `mongod.conf`.
pub const MONGOD_CONFIG_BLOCK: &str = r#"
replication:
  replSetName: "rs0"

net:
  bindIp: 0.0.0.0
"#;

/// Creates the databases and collections the web UI expects.
pub const SEED_DATABASES_SCRIPT: &str = "\
print('MongoDB initialization script running...');
db = db.getSiblingDB('webuiDB');
db.createCollection('users');
db.createCollection('sessions');
print('Created webuiDB database with collections');
db = db.getSiblingDB('authdb');
db.createCollection('authKeys');
print('Created authdb database with authKeys collection');
print('MongoDB initialization completed!');
";

/// Single-node replica set document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplicaSetConfig {
    pub name: String,
    pub host: String,
}

impl Default for ReplicaSetConfig {
    fn default() -> Self {
        Self {
            name: "rs0".to_string(),
            host: "localhost:27017".to_string(),
        }
    }
}

impl ReplicaSetConfig {
    /// `rs.initiate(...)` expression for `mongosh --eval`.
    pub fn initiate_expression(&self) -> String {
        format!(
            r#"rs.initiate({{_id:"{}",members:[{{_id:0,host:"{}"}}]}})"#,
            self.name, self.host
        )
    }
}

/// Everything the installer touches, with the stock Ubuntu 22.04 / MongoDB 7.0 values
#[derive(Debug, Clone)]
pub struct MongoSetup {
    pub key_url: String,
    pub keyring_path: PathBuf,
    pub source_list_path: PathBuf,
    pub package: String,
    pub service: String,
    pub config_path: PathBuf,
    pub staging_dir: PathBuf,
    pub shell: String,
    pub replica_set: ReplicaSetConfig,
}

impl Default for MongoSetup {
    fn default() -> Self {
        Self {
            key_url: "https://pgp.mongodb.com/server-7.0.asc".to_string(),
            keyring_path: PathBuf::from("/usr/share/keyrings/mongodb-server-7.0.gpg"),
            source_list_path: PathBuf::from("/etc/apt/sources.list.d/mongodb-org-7.0.list"),
            package: "mongodb-org".to_string(),
            service: "mongod".to_string(),
            config_path: PathBuf::from("/etc/mongod.conf"),
            staging_dir: std::env::temp_dir(),
            shell: "mongosh".to_string(),
            replica_set: ReplicaSetConfig::default(),
        }
    }
}

impl MongoSetup {
    pub fn with_config_path(mut self, config_path: impl Into<PathBuf>) -> Self {
        self.config_path = config_path.into();
        self
    }

    pub fn with_staging_dir(mut self, staging_dir: impl Into<PathBuf>) -> Self {
        self.staging_dir = staging_dir.into();
        self
    }

    /// apt source line, signed by the imported keyring.
    pub fn apt_source_line(&self) -> String {
        format!(
            "deb [arch=amd64,arm64 signed-by={}] https://repo.mongodb.org/apt/ubuntu jammy/mongodb-org/7.0 multiverse\n",
            self.keyring_path.display()
        )
    }

    /// `<config>.backup` next to the original.
    pub fn backup_path(&self) -> PathBuf {
        sibling_with_suffix(&self.config_path, ".backup")
    }

    /// Name prefix of the staged configuration inside `staging_dir`.
    pub fn staging_prefix(&self) -> String {
        let file_name = self
            .config_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "mongod.conf".to_string());
        format!("{file_name}.")
    }

    pub fn config_block(&self) -> &'static str {
        MONGOD_CONFIG_BLOCK
    }
}

fn sibling_with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut os = path.as_os_str().to_owned();
    os.push(suffix);
    PathBuf::from(os)
}
