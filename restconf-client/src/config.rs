use crate::runlog::unix_timestamp;
use core::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_RESTCONF_URL: &str = "http://localhost:8080/restconf";
pub const DEFAULT_USERNAME: &str = "admin";
pub const DEFAULT_PASSWORD: &str = "admin";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection and output settings for a single loader run.
///
/// Built once, then handed to [`crate::loader::ConfigLoader`] which owns it for the rest
/// of the run.
#[derive(Clone)]
pub struct LoaderConfig {
    base_url: String,
    username: String,
    password: String,
    timeout: Duration,
    verify_tls: bool,
    log_file: PathBuf,
    backup_dir: PathBuf,
}

impl LoaderConfig {
    pub fn new(base_url: &str, username: &str, password: &str) -> LoaderConfig {
        LoaderConfig {
            base_url: base_url.trim_end_matches('/').to_string(),
            username: username.to_string(),
            password: password.to_string(),
            timeout: DEFAULT_TIMEOUT,
            verify_tls: true,
            log_file: default_log_file(),
            backup_dir: default_backup_dir(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_verify_tls(mut self, verify: bool) -> Self {
        self.verify_tls = verify;
        self
    }

    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = path.into();
        self
    }

    pub fn with_backup_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.backup_dir = path.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn verify_tls(&self) -> bool {
        self.verify_tls
    }

    pub fn log_file(&self) -> &Path {
        &self.log_file
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        LoaderConfig::new(DEFAULT_RESTCONF_URL, DEFAULT_USERNAME, DEFAULT_PASSWORD)
    }
}

impl fmt::Debug for LoaderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoaderConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .field("verify_tls", &self.verify_tls)
            .field("log_file", &self.log_file)
            .field("backup_dir", &self.backup_dir)
            .finish()
    }
}

pub fn default_log_file() -> PathBuf {
    std::env::temp_dir().join(format!("restconf-loader-{}.log", unix_timestamp()))
}

pub fn default_backup_dir() -> PathBuf {
    std::env::temp_dir().join("restconf-backups")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_trailing_slash_is_stripped() {
        let config = LoaderConfig::new("https://router:8443/restconf///", "admin", "secret");
        assert_eq!(config.base_url(), "https://router:8443/restconf");
    }

    #[test]
    fn test_defaults() {
        let config = LoaderConfig::default();
        assert_eq!(config.base_url(), DEFAULT_RESTCONF_URL);
        assert_eq!(config.username(), "admin");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.verify_tls());
        assert!(config.backup_dir().ends_with("restconf-backups"));
        let log_name = config.log_file().file_name().unwrap().to_string_lossy();
        assert!(log_name.starts_with("restconf-loader-"));
        assert!(log_name.ends_with(".log"));
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = LoaderConfig::new(DEFAULT_RESTCONF_URL, "admin", "hunter2");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("[REDACTED]"));
    }
}
