use std::path::PathBuf;

use tontext_cloud::S3Config;

/// Static admin credentials for HTTP Basic authentication.
#[derive(Clone)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Which blob store backs the deployment.
#[derive(Debug, Clone)]
pub enum StorageConfig {
    /// S3-compatible object storage; downloads redirect to a proxy URL.
    S3(S3Config),
    /// Local directory holding `releases/` and `models/`; downloads stream.
    Local { root: PathBuf },
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for the docker-compose deployment.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `300`, uploads can be large).
    pub request_timeout_secs: u64,
    /// SQLite database file, or `:memory:`.
    pub database_path: String,
    pub admin: AdminCredentials,
    pub storage: StorageConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                 |
    /// |------------------------|-------------------------|
    /// | `HOST`                 | `0.0.0.0`               |
    /// | `PORT`                 | `8000`                  |
    /// | `CORS_ORIGINS`         | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS` | `300`                   |
    /// | `DATABASE_PATH`        | `data/tontext.db`       |
    /// | `ADMIN_USERNAME`       | `admin`                 |
    /// | `ADMIN_PASSWORD`       | `changeme`              |
    /// | `STORAGE_BACKEND`      | `s3` (or `local`)       |
    /// | `MINIO_ENDPOINT`       | `minio:9000`            |
    /// | `MINIO_ROOT_USER`      | `minioadmin`            |
    /// | `MINIO_ROOT_PASSWORD`  | `minioadmin`            |
    /// | `MINIO_BUCKET`         | `tontext`               |
    /// | `MINIO_REGION`         | `us-east-1`             |
    /// | `STORAGE_BASE_URL`     | `/storage`              |
    /// | `STORAGE_DIR`          | `data/storage`          |
    ///
    /// Panics on unparseable values so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let port: u16 = var("PORT", "8000")
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = var("CORS_ORIGINS", "http://localhost:5173")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = var("REQUEST_TIMEOUT_SECS", "300")
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let admin = AdminCredentials {
            username: var("ADMIN_USERNAME", "admin"),
            password: var("ADMIN_PASSWORD", "changeme"),
        };

        let storage = match var("STORAGE_BACKEND", "s3").to_ascii_lowercase().as_str() {
            "s3" | "minio" => StorageConfig::S3(S3Config {
                endpoint: var("MINIO_ENDPOINT", "minio:9000"),
                access_key: var("MINIO_ROOT_USER", "minioadmin"),
                secret_key: var("MINIO_ROOT_PASSWORD", "minioadmin"),
                bucket: var("MINIO_BUCKET", "tontext"),
                region: var("MINIO_REGION", "us-east-1"),
                public_base_url: var("STORAGE_BASE_URL", "/storage"),
            }),
            "local" => StorageConfig::Local {
                root: PathBuf::from(var("STORAGE_DIR", "data/storage")),
            },
            other => panic!("STORAGE_BACKEND must be 's3' or 'local', got '{other}'"),
        };

        Self {
            host: var("HOST", "0.0.0.0"),
            port,
            cors_origins,
            request_timeout_secs,
            database_path: var("DATABASE_PATH", "data/tontext.db"),
            admin,
            storage,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> ServerConfig {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_select_minio() {
        let config = config_from(&[]);
        assert_eq!(config.port, 8000);
        assert_eq!(config.database_path, "data/tontext.db");
        assert_eq!(config.admin.username, "admin");
        assert_eq!(config.admin.password, "changeme");
        assert_matches!(
            config.storage,
            StorageConfig::S3(s3) if s3.bucket == "tontext" && s3.public_base_url == "/storage"
        );
    }

    #[test]
    fn local_backend_uses_storage_dir() {
        let config = config_from(&[("STORAGE_BACKEND", "local"), ("STORAGE_DIR", "/srv/apk")]);
        assert_matches!(
            config.storage,
            StorageConfig::Local { root } if root == PathBuf::from("/srv/apk")
        );
    }

    #[test]
    fn cors_origins_are_split_and_trimmed() {
        let config = config_from(&[("CORS_ORIGINS", "https://a.example, https://b.example,")]);
        assert_eq!(
            config.cors_origins,
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
    }

    #[test]
    #[should_panic(expected = "PORT must be a valid u16")]
    fn invalid_port_panics() {
        config_from(&[("PORT", "not-a-port")]);
    }

    #[test]
    fn debug_output_redacts_password() {
        let config = config_from(&[("ADMIN_PASSWORD", "hunter2")]);
        assert!(!format!("{config:?}").contains("hunter2"));
    }
}
