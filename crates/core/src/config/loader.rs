use crate::config::types::{ConfigFile, LoggingConfig, Profile, ResolvedConfig};
use shellexpand::full;
use std::path::{Path, PathBuf};
use std::{env, fs};

use dirs::home_dir;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found at {0}")]
    NotFound(String),

    #[error("failed to read config file {0}: {1}")]
    ReadError(String, #[source] std::io::Error),

    #[error("failed to parse TOML in {0}: {1}")]
    ParseError(String, #[source] toml::de::Error),

    #[error("profile '{0}' not found")]
    ProfileNotFound(String),

    #[error("no profiles defined in config")]
    NoProfiles,

    #[error("version {0} is unsupported (expected 1)")]
    BadVersion(u32),

    #[error("home directory not available to expand '~'")]
    NoHome,
}

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load(
        config_path: Option<&Path>,
        profile_override: Option<&str>,
    ) -> Result<ResolvedConfig, ConfigError> {
        let path = match config_path {
            Some(p) => p.to_path_buf(),
            None => default_config_path(),
        };

        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }

        let s = fs::read_to_string(&path)
            .map_err(|e| ConfigError::ReadError(path.display().to_string(), e))?;

        let cf: ConfigFile = toml::from_str(&s)
            .map_err(|e| ConfigError::ParseError(path.display().to_string(), e))?;

        if cf.version != 1 {
            return Err(ConfigError::BadVersion(cf.version));
        }
        if cf.profiles.is_empty() {
            return Err(ConfigError::NoProfiles);
        }

        let active = profile_override
            .map(ToOwned::to_owned)
            .or(cf.profile.clone())
            .unwrap_or_else(|| "default".to_string());

        let prof = cf
            .profiles
            .get(&active)
            .ok_or_else(|| ConfigError::ProfileNotFound(active.clone()))?;

        let resolved = Self::resolve_profile(&active, prof, &cf.logging)?;
        Ok(resolved)
    }

    fn resolve_profile(
        active: &str,
        prof: &Profile,
        log_cfg: &LoggingConfig,
    ) -> Result<ResolvedConfig, ConfigError> {
        let project_root = expand_path(&prof.project_root)?;
        let sub = |s: &str| s.replace("{{project_root}}", &project_root.to_string_lossy());

        let schema_file = expand_path(&sub(&prof.schema_file))?;
        let documents_dir = expand_path(&sub(&prof.documents_dir))?;

        // Resolve log file path if present
        let logging = if let Some(ref file) = log_cfg.file {
            let expanded_file = expand_path(&sub(&file.to_string_lossy()))?;
            LoggingConfig {
                level: log_cfg.level.clone(),
                file_level: log_cfg.file_level.clone(),
                file: Some(expanded_file),
            }
        } else {
            log_cfg.clone()
        };

        Ok(ResolvedConfig {
            active_profile: active.to_string(),
            project_root,
            schema_file,
            documents_dir,
            logging,
        })
    }
}

pub fn default_config_path() -> PathBuf {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        return Path::new(&xdg).join("fieldindex").join("config.toml");
    }
    let home = home_dir().unwrap_or_else(|| PathBuf::from("~"));
    home.join(".config").join("fieldindex").join("config.toml")
}

fn expand_path(input: &str) -> Result<PathBuf, ConfigError> {
    let expanded = full(input).map_err(|_| ConfigError::NoHome)?;
    Ok(PathBuf::from(expanded.to_string()))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    fn write_config(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("config.toml");
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn resolves_profile_with_substitution() {
        let dir = tempdir().unwrap();
        let path = write_config(
            dir.path(),
            r#"
version = 1
profile = "dig"

[profiles.dig]
project_root = "/data/dig"
schema_file = "{{project_root}}/schema.yaml"
documents_dir = "{{project_root}}/documents"

[logging]
level = "debug"
"#,
        );

        let rc = ConfigLoader::load(Some(&path), None).unwrap();
        assert_eq!(rc.active_profile, "dig");
        assert_eq!(rc.project_root, PathBuf::from("/data/dig"));
        assert_eq!(rc.schema_file, PathBuf::from("/data/dig/schema.yaml"));
        assert_eq!(rc.documents_dir, PathBuf::from("/data/dig/documents"));
        assert_eq!(rc.logging.level, "debug");
    }

    #[test]
    fn profile_override_wins() {
        let dir = tempdir().unwrap();
        let path = write_config(
            dir.path(),
            r#"
version = 1
profile = "a"

[profiles.a]
project_root = "/a"
schema_file = "/a/schema.yaml"
documents_dir = "/a/docs"

[profiles.b]
project_root = "/b"
schema_file = "/b/schema.yaml"
documents_dir = "/b/docs"
"#,
        );

        let rc = ConfigLoader::load(Some(&path), Some("b")).unwrap();
        assert_eq!(rc.active_profile, "b");
        assert_eq!(rc.project_root, PathBuf::from("/b"));
    }

    #[test]
    fn unknown_profile_is_an_error() {
        let dir = tempdir().unwrap();
        let path = write_config(
            dir.path(),
            r#"
version = 1

[profiles.default]
project_root = "/x"
schema_file = "/x/schema.yaml"
documents_dir = "/x/docs"
"#,
        );

        let err = ConfigLoader::load(Some(&path), Some("nope")).unwrap_err();
        assert!(matches!(err, ConfigError::ProfileNotFound(_)));
    }

    #[test]
    fn bad_version_is_an_error() {
        let dir = tempdir().unwrap();
        let path = write_config(
            dir.path(),
            r#"
version = 2

[profiles.default]
project_root = "/x"
schema_file = "/x/schema.yaml"
documents_dir = "/x/docs"
"#,
        );

        let err = ConfigLoader::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::BadVersion(2)));
    }
}
