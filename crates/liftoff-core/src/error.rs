use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to load config from {path}")]
    ConfigLoad {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config at {path}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("unknown topology '{0}' — expected 'container' or 'app-service'")]
    UnknownTopology(String),

    #[error("invalid run token '{0}' — use 4-16 lowercase letters or digits")]
    InvalidRunToken(String),

    // ── Secrets ──
    #[error("secret file not found at {path} — create it with KEY=VALUE lines")]
    ConfigMissing { path: PathBuf },

    #[error("failed to read secret file {}", path.display())]
    SecretRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(
        "secret '{key}' in {} contains '$' outside single quotes; wrap the value in single quotes to keep it literal",
        path.display()
    )]
    SecretExpansion { key: String, path: PathBuf },

    #[error("failed to parse secret file {}", path.display())]
    SecretParse {
        path: PathBuf,
        source: dotenvy::Error,
    },

    #[error("required secret '{key}' is missing or empty in {}", path.display())]
    RequiredSecretMissing { key: String, path: PathBuf },
}
