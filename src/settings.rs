use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, TillError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub data_dir: String,
    #[serde(default)]
    pub cafe_name: String,
    /// Status value that counts an expense as settled.
    #[serde(default = "default_paid_status")]
    pub paid_status: String,
    /// Status given to new expenses when none is supplied.
    #[serde(default = "default_unpaid_status")]
    pub unpaid_status: String,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

fn default_paid_status() -> String {
    "paid".to_string()
}

fn default_unpaid_status() -> String {
    "unpaid".to_string()
}

fn default_cache_ttl_secs() -> u64 {
    300
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir().to_string_lossy().to_string(),
            cafe_name: String::new(),
            paid_status: default_paid_status(),
            unpaid_status: default_unpaid_status(),
            cache_ttl_secs: default_cache_ttl_secs(),
        }
    }
}

impl Settings {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn db_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join("till.db")
    }
}

fn home() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

fn default_data_dir() -> PathBuf {
    home().join("Documents").join("till")
}

/// `~/.config/till/settings.json`.
pub fn settings_path() -> PathBuf {
    home().join(".config").join("till").join("settings.json")
}

/// Read settings from `path`. `Ok(None)` means the file does not exist yet;
/// keys missing from the file take their defaults.
pub fn load_settings_from(path: &Path) -> Result<Option<Settings>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    serde_json::from_str(&content)
        .map(Some)
        .map_err(|e| TillError::Settings(format!("{}: {e}", path.display())))
}

/// Write pretty JSON to `path`, creating its directory first.
pub fn save_settings_to(path: &Path, settings: &Settings) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| TillError::Settings(e.to_string()))?;
    std::fs::write(path, format!("{json}\n"))?;
    debug!(target: "till::settings", path = %path.display(), "settings saved");
    Ok(())
}

/// Settings for this user. An absent or unreadable file gives the defaults.
pub fn load_settings() -> Settings {
    let path = settings_path();
    match load_settings_from(&path) {
        Ok(found) => found.unwrap_or_default(),
        Err(e) => {
            warn!(target: "till::settings", error = %e, "using default settings");
            Settings::default()
        }
    }
}

/// Path for a user-typed directory. A leading `~` is the home directory;
/// other paths are canonicalized when they already exist.
pub fn resolve_dir(raw: &str) -> PathBuf {
    if let Some(rest) = raw.strip_prefix('~') {
        return home().join(rest.trim_start_matches(['/', '\\']));
    }
    std::fs::canonicalize(raw).unwrap_or_else(|_| PathBuf::from(raw))
}

// ---------------------------------------------------------------------------
// PostgreSQL connection settings (environment)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SslMode {
    Disable,
    Allow,
    Prefer,
    Require,
    VerifyCa,
    VerifyFull,
}

impl FromStr for SslMode {
    type Err = TillError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "disable" => Ok(SslMode::Disable),
            "allow" => Ok(SslMode::Allow),
            "prefer" => Ok(SslMode::Prefer),
            "require" => Ok(SslMode::Require),
            "verify-ca" | "verify_ca" => Ok(SslMode::VerifyCa),
            "verify-full" | "verify_full" => Ok(SslMode::VerifyFull),
            other => Err(TillError::Config(format!("unknown SSLMODE '{other}'"))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PgConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub ssl_mode: SslMode,
}

impl PgConfig {
    pub const DEFAULT_PORT: u16 = 5432;

    /// Read `PGHOST`, `PGPORT`, `PGDATABASE`, `PGUSER`, `PGPASSWORD` and
    /// `SSLMODE`. Returns `Ok(None)` when `PGHOST` is unset, which selects the
    /// local SQLite store.
    pub fn from_env() -> Result<Option<Self>> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Option<Self>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let Some(host) = non_empty("PGHOST") else {
            return Ok(None);
        };
        let port = match non_empty("PGPORT") {
            Some(p) => p
                .trim()
                .parse::<u16>()
                .map_err(|_| TillError::Config(format!("invalid PGPORT '{p}'")))?,
            None => Self::DEFAULT_PORT,
        };
        let ssl_mode = match non_empty("SSLMODE") {
            Some(mode) => mode.parse()?,
            None => SslMode::Require,
        };

        Ok(Some(PgConfig {
            host,
            port,
            database: non_empty("PGDATABASE"),
            user: non_empty("PGUSER"),
            password: lookup("PGPASSWORD"),
            ssl_mode,
        }))
    }

    /// Connection description safe to print (no password).
    pub fn describe(&self) -> String {
        format!(
            "postgres://{}@{}:{}/{}",
            self.user.as_deref().unwrap_or(""),
            self.host,
            self.port,
            self.database.as_deref().unwrap_or("")
        )
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_load_merges_with_defaults() {
        let json = r#"{"data_dir": "/tmp/test", "cafe_name": "Corner Cafe"}"#;
        let s: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(s.cafe_name, "Corner Cafe");
        assert_eq!(s.paid_status, "paid");
        assert_eq!(s.unpaid_status, "unpaid");
        assert_eq!(s.cache_ttl(), Duration::from_secs(300));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = Settings {
            data_dir: "/tmp/till".to_string(),
            cafe_name: "Bean There".to_string(),
            paid_status: "settled".to_string(),
            unpaid_status: "open".to_string(),
            cache_ttl_secs: 60,
        };
        save_settings_to(&path, &settings).unwrap();
        let loaded = load_settings_from(&path).unwrap().unwrap();
        assert_eq!(loaded.cafe_name, "Bean There");
        assert_eq!(loaded.paid_status, "settled");
        assert_eq!(loaded.unpaid_status, "open");
        assert_eq!(loaded.cache_ttl_secs, 60);
        assert_eq!(loaded.db_path(), PathBuf::from("/tmp/till/till.db"));
    }

    #[test]
    fn test_load_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_settings_from(&dir.path().join("settings.json")).unwrap().is_none());
    }

    #[test]
    fn test_load_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_settings_from(&path), Err(TillError::Settings(_))));
    }

    #[test]
    fn test_resolve_dir_expands_home() {
        let home = dirs::home_dir().unwrap();
        assert_eq!(resolve_dir("~/books"), home.join("books"));
        assert_eq!(resolve_dir("~"), home);
        assert_eq!(resolve_dir("/no/such/dir"), PathBuf::from("/no/such/dir"));
    }

    #[test]
    fn test_pg_config_absent_without_host() {
        let cfg = PgConfig::from_lookup(lookup_from(&[("PGDATABASE", "cafe")])).unwrap();
        assert!(cfg.is_none());
    }

    #[test]
    fn test_pg_config_defaults() {
        let cfg = PgConfig::from_lookup(lookup_from(&[("PGHOST", "db.example.com")]))
            .unwrap()
            .unwrap();
        assert_eq!(cfg.port, 5432);
        assert_eq!(cfg.ssl_mode, SslMode::Require);
        assert!(cfg.database.is_none());
    }

    #[test]
    fn test_pg_config_full() {
        let cfg = PgConfig::from_lookup(lookup_from(&[
            ("PGHOST", "localhost"),
            ("PGPORT", "6543"),
            ("PGDATABASE", "cafe"),
            ("PGUSER", "owner"),
            ("PGPASSWORD", "secret"),
            ("SSLMODE", "disable"),
        ]))
        .unwrap()
        .unwrap();
        assert_eq!(cfg.port, 6543);
        assert_eq!(cfg.ssl_mode, SslMode::Disable);
        assert_eq!(cfg.describe(), "postgres://owner@localhost:6543/cafe");
        assert!(!cfg.describe().contains("secret"));
    }

    #[test]
    fn test_pg_config_rejects_bad_port_and_mode() {
        let bad_port = PgConfig::from_lookup(lookup_from(&[("PGHOST", "h"), ("PGPORT", "abc")]));
        assert!(matches!(bad_port, Err(TillError::Config(_))));
        let bad_mode = PgConfig::from_lookup(lookup_from(&[("PGHOST", "h"), ("SSLMODE", "maybe")]));
        assert!(matches!(bad_mode, Err(TillError::Config(_))));
    }

    #[test]
    fn test_ssl_mode_parsing() {
        assert_eq!("VERIFY-FULL".parse::<SslMode>().unwrap(), SslMode::VerifyFull);
        assert_eq!("prefer".parse::<SslMode>().unwrap(), SslMode::Prefer);
    }
}
