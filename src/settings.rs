//! Persisted settings
//!
//! Two TOML files hold the settings:
//! - installation-wide: `$GRADLE_ASSIST_CONFIG`, the `--settings` path, or
//!   `<config dir>/gradle-assist/settings.toml`
//! - per project: `<project>/.gradle-assist.toml`
//!
//! Keys missing from the project file take the installation value.

use crate::error::SettingsError;
use crate::format::DeclarationFormat;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// Environment variable overriding the installation settings path
pub const CONFIG_ENV: &str = "GRADLE_ASSIST_CONFIG";

/// File name of project settings
pub const PROJECT_SETTINGS_FILE: &str = ".gradle-assist.toml";

const APP_DIR: &str = "gradle-assist";
const SETTINGS_FILE: &str = "settings.toml";

/// Effective settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Settings {
    /// Do not report outdated Gradle wrappers
    pub ignore_outdated_version: bool,
    /// Convert Groovy quotes without asking
    pub always_convert_groovy: bool,
    /// Preferred dependency declaration format
    pub dependency_format: DeclarationFormat,
}

/// Project settings; absent keys fall back to the installation settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ProjectSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_outdated_version: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub always_convert_groovy: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependency_format: Option<DeclarationFormat>,
}

/// A settings key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsKey {
    IgnoreOutdatedVersion,
    AlwaysConvertGroovy,
    DependencyFormat,
}

impl SettingsKey {
    pub fn all() -> &'static [SettingsKey] {
        &[
            SettingsKey::IgnoreOutdatedVersion,
            SettingsKey::AlwaysConvertGroovy,
            SettingsKey::DependencyFormat,
        ]
    }

    /// Name of the key in settings files
    pub fn name(&self) -> &'static str {
        match self {
            SettingsKey::IgnoreOutdatedVersion => "ignore-outdated-version",
            SettingsKey::AlwaysConvertGroovy => "always-convert-groovy",
            SettingsKey::DependencyFormat => "dependency-format",
        }
    }
}

impl fmt::Display for SettingsKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SettingsKey {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace('_', "-").to_ascii_lowercase();
        SettingsKey::all()
            .iter()
            .copied()
            .find(|key| key.name() == normalized)
            .ok_or_else(|| SettingsError::UnknownKey { key: s.to_string() })
    }
}

impl Settings {
    /// Value of `key` as text
    pub fn get(&self, key: SettingsKey) -> String {
        match key {
            SettingsKey::IgnoreOutdatedVersion => self.ignore_outdated_version.to_string(),
            SettingsKey::AlwaysConvertGroovy => self.always_convert_groovy.to_string(),
            SettingsKey::DependencyFormat => self.dependency_format.to_string(),
        }
    }

    /// Set `key` from text
    pub fn set(&mut self, key: SettingsKey, value: &str) -> Result<(), SettingsError> {
        match key {
            SettingsKey::IgnoreOutdatedVersion => self.ignore_outdated_version = parse_bool(key, value)?,
            SettingsKey::AlwaysConvertGroovy => self.always_convert_groovy = parse_bool(key, value)?,
            SettingsKey::DependencyFormat => self.dependency_format = parse_format(value)?,
        }
        Ok(())
    }

    fn validate(self) -> Result<Self, SettingsError> {
        ensure_selectable(self.dependency_format)?;
        Ok(self)
    }
}

impl ProjectSettings {
    /// Effective settings given the installation settings
    pub fn resolve(&self, installation: &Settings) -> Settings {
        Settings {
            ignore_outdated_version: self
                .ignore_outdated_version
                .unwrap_or(installation.ignore_outdated_version),
            always_convert_groovy: self
                .always_convert_groovy
                .unwrap_or(installation.always_convert_groovy),
            dependency_format: self
                .dependency_format
                .unwrap_or(installation.dependency_format),
        }
    }

    /// Set `key` from text
    pub fn set(&mut self, key: SettingsKey, value: &str) -> Result<(), SettingsError> {
        match key {
            SettingsKey::IgnoreOutdatedVersion => {
                self.ignore_outdated_version = Some(parse_bool(key, value)?)
            }
            SettingsKey::AlwaysConvertGroovy => {
                self.always_convert_groovy = Some(parse_bool(key, value)?)
            }
            SettingsKey::DependencyFormat => self.dependency_format = Some(parse_format(value)?),
        }
        Ok(())
    }

    fn validate(self) -> Result<Self, SettingsError> {
        if let Some(format) = self.dependency_format {
            ensure_selectable(format)?;
        }
        Ok(self)
    }
}

fn parse_bool(key: SettingsKey, value: &str) -> Result<bool, SettingsError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(SettingsError::invalid_value(key.name(), value)),
    }
}

fn parse_format(value: &str) -> Result<DeclarationFormat, SettingsError> {
    let format = value.parse::<DeclarationFormat>()?;
    ensure_selectable(format)?;
    Ok(format)
}

fn ensure_selectable(format: DeclarationFormat) -> Result<(), SettingsError> {
    if format.is_generatable() {
        Ok(())
    } else {
        Err(SettingsError::ReadOnlyFormat { format })
    }
}

/// Path of the installation settings
///
/// `$GRADLE_ASSIST_CONFIG` wins over `explicit`, which wins over the
/// platform configuration directory.
pub fn installation_path(explicit: Option<&Path>) -> Result<PathBuf, SettingsError> {
    if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR).join(SETTINGS_FILE))
        .ok_or(SettingsError::NoConfigDir)
}

/// Path of the project settings of `project_dir`
pub fn project_path(project_dir: &Path) -> PathBuf {
    project_dir.join(PROJECT_SETTINGS_FILE)
}

/// Settings files of one run
#[derive(Debug, Clone)]
pub struct SettingsStore {
    installation_path: PathBuf,
}

impl SettingsStore {
    pub fn new(installation_path: impl Into<PathBuf>) -> Self {
        Self {
            installation_path: installation_path.into(),
        }
    }

    pub fn installation_path(&self) -> &Path {
        &self.installation_path
    }

    /// Installation settings, defaults when the file does not exist
    pub fn installation(&self) -> Result<Settings, SettingsError> {
        match read_toml::<Settings>(&self.installation_path)? {
            Some(settings) => settings.validate(),
            None => Ok(Settings::default()),
        }
    }

    /// Project settings as stored, empty when the file does not exist
    pub fn project(&self, project_dir: &Path) -> Result<ProjectSettings, SettingsError> {
        match read_toml::<ProjectSettings>(&project_path(project_dir))? {
            Some(settings) => settings.validate(),
            None => Ok(ProjectSettings::default()),
        }
    }

    /// Effective settings for `project_dir`, or the installation settings
    pub fn effective(&self, project_dir: Option<&Path>) -> Result<Settings, SettingsError> {
        let installation = self.installation()?;
        match project_dir {
            Some(dir) => Ok(self.project(dir)?.resolve(&installation)),
            None => Ok(installation),
        }
    }

    /// Store `key = value` in the project file when `project_dir` is given,
    /// otherwise in the installation file; returns the written path
    pub fn set(
        &self,
        key: SettingsKey,
        value: &str,
        project_dir: Option<&Path>,
    ) -> Result<PathBuf, SettingsError> {
        match project_dir {
            Some(dir) => {
                let mut settings = self.project(dir)?;
                settings.set(key, value)?;
                let path = project_path(dir);
                write_toml(&path, &settings)?;
                Ok(path)
            }
            None => {
                let mut settings = self.installation()?;
                settings.set(key, value)?;
                write_toml(&self.installation_path, &settings)?;
                Ok(self.installation_path.clone())
            }
        }
    }
}

fn read_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>, SettingsError> {
    if !path.exists() {
        debug!(path = %path.display(), "settings file not found, using defaults");
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|e| SettingsError::read_error(path, e))?;
    toml::from_str(&content)
        .map(Some)
        .map_err(|e| SettingsError::parse_error(path, e.to_string()))
}

fn write_toml<T: Serialize>(path: &Path, value: &T) -> Result<(), SettingsError> {
    let content = toml::to_string(value).map_err(|e| SettingsError::SerializeError {
        message: e.to_string(),
    })?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| SettingsError::write_error(parent, e))?;
    }
    fs::write(path, content).map_err(|e| SettingsError::write_error(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> SettingsStore {
        SettingsStore::new(dir.path().join("config").join("settings.toml"))
    }

    #[test]
    fn test_defaults_when_missing() {
        let dir = TempDir::new().unwrap();
        let settings = store(&dir).installation().unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.dependency_format, DeclarationFormat::Notation);
        assert!(!settings.ignore_outdated_version);
    }

    #[test]
    fn test_set_and_read_installation() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let path = store
            .set(SettingsKey::DependencyFormat, "named", None)
            .unwrap();
        assert_eq!(path, store.installation_path());

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("dependency-format = \"named\""));
        assert_eq!(
            store.installation().unwrap().dependency_format,
            DeclarationFormat::Named
        );
    }

    #[test]
    fn test_project_defaults_to_installation() {
        let dir = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();
        let store = store(&dir);
        store
            .set(SettingsKey::IgnoreOutdatedVersion, "true", None)
            .unwrap();
        store
            .set(SettingsKey::DependencyFormat, "positional", Some(project.path()))
            .unwrap();

        let effective = store.effective(Some(project.path())).unwrap();
        assert!(effective.ignore_outdated_version);
        assert_eq!(effective.dependency_format, DeclarationFormat::Positional);

        let installation = store.effective(None).unwrap();
        assert_eq!(installation.dependency_format, DeclarationFormat::Notation);
    }

    #[test]
    fn test_project_overrides_installation() {
        let dir = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();
        let store = store(&dir);
        store
            .set(SettingsKey::IgnoreOutdatedVersion, "true", None)
            .unwrap();
        store
            .set(SettingsKey::IgnoreOutdatedVersion, "false", Some(project.path()))
            .unwrap();

        assert!(!store.effective(Some(project.path())).unwrap().ignore_outdated_version);
    }

    #[test]
    fn test_semi_named_rejected() {
        let dir = TempDir::new().unwrap();
        let result = store(&dir).set(SettingsKey::DependencyFormat, "semi-named", None);
        assert!(matches!(result, Err(SettingsError::ReadOnlyFormat { .. })));

        fs::write(dir.path().join("bad.toml"), "dependency-format = \"semi-named\"\n").unwrap();
        let result = SettingsStore::new(dir.path().join("bad.toml")).installation();
        assert!(matches!(result, Err(SettingsError::ReadOnlyFormat { .. })));
    }

    #[test]
    fn test_invalid_values() {
        let mut settings = Settings::default();
        assert!(matches!(
            settings.set(SettingsKey::IgnoreOutdatedVersion, "maybe"),
            Err(SettingsError::InvalidValue { .. })
        ));
        assert!(matches!(
            settings.set(SettingsKey::DependencyFormat, "gav"),
            Err(SettingsError::UnknownFormat { .. })
        ));
        assert!(matches!(
            "colour".parse::<SettingsKey>(),
            Err(SettingsError::UnknownKey { .. })
        ));
    }

    #[test]
    fn test_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "ignore-outdated-version = \"not a bool\"\n").unwrap();
        assert!(matches!(
            SettingsStore::new(&path).installation(),
            Err(SettingsError::ParseError { .. })
        ));
    }

    #[test]
    fn test_key_names() {
        assert_eq!(
            "ignore_outdated_version".parse::<SettingsKey>().unwrap(),
            SettingsKey::IgnoreOutdatedVersion
        );
        assert_eq!(SettingsKey::DependencyFormat.to_string(), "dependency-format");
        let settings = Settings::default();
        assert_eq!(settings.get(SettingsKey::DependencyFormat), "notation");
        assert_eq!(settings.get(SettingsKey::AlwaysConvertGroovy), "false");
    }
}
