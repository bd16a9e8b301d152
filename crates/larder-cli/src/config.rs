//! Configuration file management for larder.
//!
//! Provides a TOML-based config file at `~/.config/larder/config.toml` and a
//! resolution chain: CLI flag > env var > config file > default.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use larder_core::planner::PlannerConfig;
use larder_db::config::DbConfig;

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
pub struct ConfigFile {
    pub database: DatabaseSection,
    /// Planner tunables; any omitted key keeps its default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planner: Option<PlannerConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DatabaseSection {
    pub url: String,
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the larder config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/larder` or `~/.config/larder`.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("larder");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("larder")
}

/// Return the path to the larder config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file. Returns an error if it does not exist.
pub fn load_config() -> Result<ConfigFile> {
    let path = config_path();
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents).context("failed to parse config file")?;
    Ok(config)
}

/// Serialize and write the config file, creating parent dirs as needed.
/// Sets file permissions to 0600 on Unix, since the URL may carry a
/// password.
pub fn save_config(config: &ConfigFile) -> Result<()> {
    let path = config_path();
    let dir = config_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create config directory {}", dir.display()))?;

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(&path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(&path, perms)
            .with_context(|| format!("failed to set permissions on {}", path.display()))?;
    }

    Ok(())
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Fully resolved configuration, ready for use.
#[derive(Debug)]
pub struct LarderConfig {
    pub db_config: DbConfig,
    pub planner: PlannerConfig,
}

impl LarderConfig {
    /// Resolve configuration using the chain: CLI flag > env var > config file > default.
    ///
    /// - DB URL: `cli_db_url` > `LARDER_DATABASE_URL` env >
    ///   `config_file.database.url` > `DbConfig::DEFAULT_URL`
    /// - Planner: `config_file.planner` > `PlannerConfig::default()`
    ///
    /// A config file that exists but does not parse is an error; a missing
    /// one is not.
    pub fn resolve(cli_db_url: Option<&str>) -> Result<Self> {
        let file_config = if config_path().exists() {
            Some(load_config()?)
        } else {
            None
        };

        let (db_url, source) = if let Some(url) = cli_db_url {
            (url.to_string(), "flag")
        } else if let Ok(url) = std::env::var(DbConfig::ENV_VAR) {
            (url, "env")
        } else if let Some(ref cfg) = file_config {
            (cfg.database.url.clone(), "config file")
        } else {
            (DbConfig::DEFAULT_URL.to_string(), "default")
        };
        debug!(source, "database url resolved");

        let planner = file_config
            .and_then(|cfg| cfg.planner)
            .unwrap_or_default();

        Ok(Self {
            db_config: DbConfig::new(db_url),
            planner,
        })
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{lock_env, with_config_home};

    #[test]
    fn save_and_load_config_roundtrip() {
        let _lock = lock_env();
        let tmp = tempfile::TempDir::new().unwrap();

        with_config_home(tmp.path(), || {
            let original = ConfigFile {
                database: DatabaseSection {
                    url: "postgresql://testhost:5432/testdb".to_string(),
                },
                planner: Some(PlannerConfig {
                    pool_size: 3,
                    ..PlannerConfig::default()
                }),
            };
            save_config(&original).unwrap();

            let loaded = load_config().unwrap();
            assert_eq!(loaded.database.url, original.database.url);
            assert_eq!(loaded.planner.map(|p| p.pool_size), Some(3));
        });
    }

    #[cfg(unix)]
    #[test]
    fn save_config_sets_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let _lock = lock_env();
        let tmp = tempfile::TempDir::new().unwrap();

        with_config_home(tmp.path(), || {
            save_config(&ConfigFile {
                database: DatabaseSection {
                    url: DbConfig::DEFAULT_URL.to_string(),
                },
                planner: None,
            })
            .unwrap();

            let meta = std::fs::metadata(config_path()).unwrap();
            assert_eq!(meta.permissions().mode() & 0o777, 0o600);
        });
    }

    #[test]
    fn resolve_with_cli_flag_overrides_all() {
        let _lock = lock_env();
        let tmp = tempfile::TempDir::new().unwrap();

        with_config_home(tmp.path(), || {
            unsafe { std::env::set_var(DbConfig::ENV_VAR, "postgresql://env:5432/envdb") };
            let config = LarderConfig::resolve(Some("postgresql://cli:5432/clidb")).unwrap();
            unsafe { std::env::remove_var(DbConfig::ENV_VAR) };

            assert_eq!(config.db_config.database_url, "postgresql://cli:5432/clidb");
        });
    }

    #[test]
    fn resolve_with_env_var_overrides_config_file() {
        let _lock = lock_env();
        let tmp = tempfile::TempDir::new().unwrap();

        with_config_home(tmp.path(), || {
            save_config(&ConfigFile {
                database: DatabaseSection {
                    url: "postgresql://file:5432/filedb".to_string(),
                },
                planner: None,
            })
            .unwrap();

            unsafe { std::env::set_var(DbConfig::ENV_VAR, "postgresql://env:5432/envdb") };
            let config = LarderConfig::resolve(None).unwrap();
            unsafe { std::env::remove_var(DbConfig::ENV_VAR) };

            assert_eq!(config.db_config.database_url, "postgresql://env:5432/envdb");
        });
    }

    #[test]
    fn resolve_reads_config_file_and_planner_section() {
        let _lock = lock_env();
        let tmp = tempfile::TempDir::new().unwrap();

        with_config_home(tmp.path(), || {
            unsafe { std::env::remove_var(DbConfig::ENV_VAR) };
            std::fs::create_dir_all(config_dir()).unwrap();
            std::fs::write(
                config_path(),
                "[database]\nurl = \"postgresql://file:5432/filedb\"\n\n\
                 [planner]\nrecent_window = 2\nhigh_energy_kcal = 2800\n",
            )
            .unwrap();

            let config = LarderConfig::resolve(None).unwrap();
            assert_eq!(config.db_config.database_url, "postgresql://file:5432/filedb");
            assert_eq!(config.planner.recent_window, 2);
            assert_eq!(config.planner.high_energy_kcal, 2800);
            assert_eq!(config.planner.pool_size, 5);
        });
    }

    #[test]
    fn resolve_defaults_when_nothing_set() {
        let _lock = lock_env();
        let tmp = tempfile::TempDir::new().unwrap();

        with_config_home(tmp.path(), || {
            unsafe { std::env::remove_var(DbConfig::ENV_VAR) };
            let config = LarderConfig::resolve(None).unwrap();
            assert_eq!(config.db_config.database_url, DbConfig::DEFAULT_URL);
            assert_eq!(config.planner, PlannerConfig::default());
        });
    }

    #[test]
    fn resolve_rejects_unparseable_config_file() {
        let _lock = lock_env();
        let tmp = tempfile::TempDir::new().unwrap();

        with_config_home(tmp.path(), || {
            std::fs::create_dir_all(config_dir()).unwrap();
            std::fs::write(config_path(), "database = 3\n").unwrap();

            let err = LarderConfig::resolve(None).unwrap_err();
            assert!(err.to_string().contains("failed to parse config file"));
        });
    }

    #[test]
    fn config_path_ends_with_expected_filename() {
        let path = config_path();
        assert!(
            path.ends_with("larder/config.toml"),
            "unexpected config path: {}",
            path.display()
        );
    }
}
