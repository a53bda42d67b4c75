use crate::source::http::DEFAULT_BASE_URL;
use crate::source::Skin;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Contents of `dealboard.toml`. Every field is optional.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DealboardConfig {
    pub base_url: Option<String>,
    pub skin: Option<Skin>,
    pub prefs: Option<String>,
    pub offline: Option<bool>,
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub skin: Option<Skin>,
    pub prefs: Option<PathBuf>,
    pub offline: bool,
}

/// Effective settings after applying CLI flag > config file > default.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub base_url: String,
    pub skin: Skin,
    pub prefs_path: PathBuf,
    pub offline: bool,
}

impl Settings {
    pub fn resolve(overrides: Overrides, config: Option<&DealboardConfig>, base: &Path) -> Self {
        let config = config.cloned().unwrap_or_default();
        Self {
            base_url: overrides
                .base_url
                .or(config.base_url)
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            skin: overrides.skin.or(config.skin).unwrap_or_default(),
            prefs_path: overrides
                .prefs
                .or_else(|| config.prefs.map(PathBuf::from))
                .unwrap_or_else(|| default_prefs_path_in(base)),
            offline: overrides.offline || config.offline.unwrap_or(false),
        }
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("dealboard.toml")
}

pub fn default_prefs_path_in(base: &Path) -> PathBuf {
    base.join(".dealboard").join("prefs.db")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<DealboardConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: DealboardConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &DealboardConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

pub fn ensure_prefs_dir(prefs_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = prefs_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

pub fn ensure_gitignore(project_root: &Path) -> anyhow::Result<()> {
    let gitignore_path = project_root.join(".gitignore");
    let entry = ".dealboard/";

    let mut content = if gitignore_path.exists() {
        std::fs::read_to_string(&gitignore_path)?
    } else {
        String::new()
    };
    if content.lines().any(|line| line.trim() == entry) {
        return Ok(());
    }

    if !content.is_empty() && !content.ends_with('\n') {
        content.push('\n');
    }
    content.push_str(entry);
    content.push('\n');
    std::fs::write(&gitignore_path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(Some(&dir.path().join("dealboard.toml"))).unwrap().is_none());
    }

    #[test]
    fn test_write_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dealboard.toml");
        let config = DealboardConfig {
            base_url: Some("http://api.internal:8080".to_string()),
            skin: Some(Skin::Biotech),
            prefs: None,
            offline: Some(true),
        };

        write_config(&path, &config, false).unwrap();
        assert_eq!(load_config(Some(&path)).unwrap(), Some(config.clone()));
        assert!(write_config(&path, &config, false).is_err());
        write_config(&path, &config, true).unwrap();
    }

    #[test]
    fn test_skin_is_kebab_case_in_toml() {
        let config: DealboardConfig = toml::from_str("skin = \"digital-natives\"").unwrap();
        assert_eq!(config.skin, Some(Skin::DigitalNatives));
    }

    #[test]
    fn test_settings_precedence() {
        let base = Path::new("/work");
        let config = DealboardConfig {
            base_url: Some("http://from-config".to_string()),
            skin: Some(Skin::Biotech),
            prefs: Some("custom.db".to_string()),
            offline: None,
        };

        let defaults = Settings::resolve(Overrides::default(), None, base);
        assert_eq!(defaults.base_url, DEFAULT_BASE_URL);
        assert_eq!(defaults.skin, Skin::DigitalNatives);
        assert_eq!(defaults.prefs_path, Path::new("/work/.dealboard/prefs.db"));
        assert!(!defaults.offline);

        let from_config = Settings::resolve(Overrides::default(), Some(&config), base);
        assert_eq!(from_config.base_url, "http://from-config");
        assert_eq!(from_config.skin, Skin::Biotech);
        assert_eq!(from_config.prefs_path, Path::new("custom.db"));

        let overrides = Overrides {
            base_url: Some("http://from-flag".to_string()),
            skin: Some(Skin::DigitalNatives),
            prefs: None,
            offline: true,
        };
        let from_flags = Settings::resolve(overrides, Some(&config), base);
        assert_eq!(from_flags.base_url, "http://from-flag");
        assert_eq!(from_flags.skin, Skin::DigitalNatives);
        assert_eq!(from_flags.prefs_path, Path::new("custom.db"));
        assert!(from_flags.offline);
    }

    #[test]
    fn test_gitignore_entry_added_once() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".gitignore"), "target/").unwrap();

        ensure_gitignore(dir.path()).unwrap();
        ensure_gitignore(dir.path()).unwrap();

        let content = std::fs::read_to_string(dir.path().join(".gitignore")).unwrap();
        assert_eq!(content, "target/\n.dealboard/\n");
    }

    #[test]
    fn test_ensure_prefs_dir() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = default_prefs_path_in(dir.path());
        ensure_prefs_dir(&prefs).unwrap();
        assert!(prefs.parent().unwrap().is_dir());
    }
}
