//! Command orchestrator for the gradle-assist workflows
//!
//! This module provides:
//! - check: wrapper → settings → latest version → classify → upgrade → sync
//! - inspect: script → inspections → fixes
//! - convert: input → conversion → optional paste into a script
//! - config: reading and writing settings
//!
//! Each workflow returns a report that the output formatters render.

use crate::cli::{CheckArgs, ConfigCommand, ConvertArgs, InspectArgs};
use crate::convert::{convert_text, paste_into, Conversion, ConvertOptions};
use crate::domain::GradleVersion;
use crate::error::{AppError, NotYetAvailable, ScriptError, SettingsError};
use crate::format::DeclarationFormat;
use crate::gradle_sync::{GradleRunner, SyncResult, SystemGradleRunner};
use crate::inspection::{fix_all, inspect_script, inspect_wrapper, Diagnostic, InspectionConfig};
use crate::progress::Progress;
use crate::registry::{GradleServicesFeed, HttpClient, VersionFeed};
use crate::rewrite::{read_script, write_script, ScriptWriter, WriteResult};
use crate::settings::{project_path, Settings, SettingsKey, SettingsStore};
use crate::update::{classify_against, LatestVersion, OutdatednessReport};
use crate::wrapper::WrapperProperties;
use chrono::{DateTime, Utc};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Orchestrator running one command
pub struct Orchestrator {
    /// Installation and project settings
    store: SettingsStore,
    /// Whether to show a spinner while the feed is fetched
    show_progress: bool,
}

/// Result of `check`
#[derive(Debug)]
pub struct CheckReport {
    pub wrapper_path: PathBuf,
    pub installed: GradleVersion,
    /// Outdated versions are ignored for the project
    pub ignored: bool,
    pub classification: Option<OutdatednessReport>,
    /// When the latest version was fetched
    pub refreshed_at: Option<DateTime<Utc>>,
    pub diagnostic: Option<Diagnostic>,
    pub upgrade: Option<WriteResult>,
    pub sync: Option<SyncResult>,
    pub dry_run: bool,
}

/// Result of `inspect`
#[derive(Debug)]
pub struct InspectReport {
    pub path: PathBuf,
    pub source: String,
    pub diagnostics: Vec<Diagnostic>,
    pub fix: Option<FixReport>,
    pub dry_run: bool,
}

/// Fixes applied by `inspect --fix`
#[derive(Debug)]
pub struct FixReport {
    pub applied: usize,
    pub skipped: usize,
    /// Problems still reported on the fixed script
    pub remaining: Vec<Diagnostic>,
    pub text: String,
    pub written: bool,
}

/// Result of `convert`
#[derive(Debug)]
pub struct ConvertReport {
    pub conversion: Conversion,
    /// Script the text was pasted into
    pub target: Option<PathBuf>,
    pub written: bool,
}

/// Result of `config`
#[derive(Debug)]
pub enum ConfigReport {
    Values {
        source: PathBuf,
        values: Vec<(SettingsKey, String)>,
    },
    Set {
        key: SettingsKey,
        value: String,
        path: PathBuf,
    },
    Path {
        path: PathBuf,
    },
}

impl CheckReport {
    fn new(wrapper: &WrapperProperties, dry_run: bool) -> Self {
        Self {
            wrapper_path: wrapper.path.clone(),
            installed: wrapper.version,
            ignored: false,
            classification: None,
            refreshed_at: None,
            diagnostic: None,
            upgrade: None,
            sync: None,
            dry_run,
        }
    }

    /// Whether the wrapper was rewritten on disk
    pub fn upgraded(&self) -> bool {
        self.upgrade.as_ref().is_some_and(|w| w.file_modified)
    }

    /// Whether a problem is left after the run
    pub fn has_problems(&self) -> bool {
        let unresolved = self.diagnostic.is_some() && !self.upgraded();
        let sync_failed = self.sync.as_ref().is_some_and(|s| !s.success);
        unresolved || sync_failed
    }
}

impl InspectReport {
    pub fn has_problems(&self) -> bool {
        match &self.fix {
            Some(fix) => !fix.remaining.is_empty(),
            None => !self.diagnostics.is_empty(),
        }
    }
}

impl Orchestrator {
    /// Create a new orchestrator reading settings from `store`
    pub fn new(store: SettingsStore) -> Self {
        Self {
            store,
            show_progress: false,
        }
    }

    /// Show a spinner during network requests
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn store(&self) -> &SettingsStore {
        &self.store
    }

    /// Run `check` against the services.gradle.org feed (or `--feed-url`)
    pub async fn check(&self, args: &CheckArgs) -> Result<CheckReport, AppError> {
        let runner = SystemGradleRunner::new();
        if args.latest.is_some() {
            return self.check_with(args, None, &runner).await;
        }

        let client = HttpClient::new()?;
        let feed = match &args.feed_url {
            Some(url) => GradleServicesFeed::with_url(client, url.clone()),
            None => GradleServicesFeed::new(client),
        };
        self.check_with(args, Some(&feed), &runner).await
    }

    /// Run `check` with the given feed and Gradle runner
    pub async fn check_with(
        &self,
        args: &CheckArgs,
        feed: Option<&dyn VersionFeed>,
        runner: &dyn GradleRunner,
    ) -> Result<CheckReport, AppError> {
        let wrapper = WrapperProperties::load(&args.project)?;
        let mut report = CheckReport::new(&wrapper, args.dry_run);

        let settings = self.store.effective(Some(&args.project))?;
        if settings.ignore_outdated_version && !args.force {
            debug!(project = %args.project.display(), "outdated Gradle versions are ignored");
            report.ignored = true;
            return Ok(report);
        }

        let latest = self.latest_version(args.latest, feed).await?;
        let snapshot = latest.get()?;
        let classification = classify_against(&wrapper.version, &latest)?;
        report.refreshed_at = args.latest.is_none().then_some(snapshot.refreshed_at);
        report.diagnostic = inspect_wrapper(&wrapper, &snapshot.version);

        if args.upgrade && classification.is_outdated() {
            let edits = wrapper.upgrade_edit(&snapshot.version).into_iter().collect();
            let written = ScriptWriter::new(args.dry_run).apply(&wrapper.path, edits)?;
            if args.sync && written.file_modified {
                report.sync = Some(runner.sync(&args.project));
            }
            report.upgrade = Some(written);
        }

        report.classification = Some(classification);
        Ok(report)
    }

    async fn latest_version(
        &self,
        pinned: Option<GradleVersion>,
        feed: Option<&dyn VersionFeed>,
    ) -> Result<LatestVersion, AppError> {
        if let Some(version) = pinned {
            return Ok(LatestVersion::with_version(version));
        }
        let feed = feed.ok_or(NotYetAvailable)?;

        let latest = LatestVersion::new();
        let mut progress = Progress::new(self.show_progress);
        progress.fetching(feed.feed_name());
        latest.refresh(feed).await?;
        progress.finish();
        Ok(latest)
    }

    /// Run `inspect`
    pub fn inspect(&self, args: &InspectArgs) -> Result<InspectReport, AppError> {
        let source = read_script(&args.script)?;
        let settings = self.store.effective(Some(parent_dir(&args.script)))?;
        let config = InspectionConfig {
            preferred_format: preferred_format(args.format, &settings)?,
        };

        let diagnostics = inspect_script(&source, &config);
        debug!(script = %args.script.display(), problems = diagnostics.len(), "script inspected");

        let fix = if args.fix {
            let outcome = fix_all(&source, &diagnostics)?;
            let remaining = inspect_script(&outcome.text, &config);
            let written = outcome.text != source && !args.dry_run;
            if written {
                write_script(&args.script, &outcome.text)?;
            }
            Some(FixReport {
                applied: outcome.applied,
                skipped: outcome.skipped,
                remaining,
                text: outcome.text,
                written,
            })
        } else {
            None
        };

        Ok(InspectReport {
            path: args.script.clone(),
            source,
            diagnostics,
            fix,
            dry_run: args.dry_run,
        })
    }

    /// Run `convert` on `input`
    pub fn convert(&self, args: &ConvertArgs, input: &str) -> Result<ConvertReport, AppError> {
        let settings = self
            .store
            .effective(args.into.as_deref().map(parent_dir))?;
        let options = ConvertOptions {
            format: preferred_format(args.format, &settings)?,
            convert_quotes: args.quotes || settings.always_convert_groovy,
        };

        let (Some(target), Some(offset)) = (&args.into, args.offset) else {
            return Ok(ConvertReport {
                conversion: convert_text(input, &options)?,
                target: None,
                written: false,
            });
        };

        let script = read_script(target)?;
        let conversion = paste_into(&script, offset, input, &options).map_err(|e| match e {
            AppError::Script(ScriptError::InvalidOffset { offset, len, .. }) => {
                ScriptError::InvalidOffset {
                    path: target.clone(),
                    offset,
                    len,
                }
                .into()
            }
            other => other,
        })?;
        if args.write {
            write_script(target, &conversion.text)?;
        }
        debug!(changes = conversion.changes(), "pasted text converted");

        Ok(ConvertReport {
            conversion,
            target: Some(target.clone()),
            written: args.write,
        })
    }

    /// Run a `config` subcommand
    pub fn config(&self, command: &ConfigCommand) -> Result<ConfigReport, AppError> {
        match command {
            ConfigCommand::Get { key, project } => {
                let settings = self.store.effective(project.as_deref())?;
                let keys = match key {
                    Some(key) => vec![*key],
                    None => SettingsKey::all().to_vec(),
                };
                Ok(ConfigReport::Values {
                    source: self.settings_path(project.as_deref()),
                    values: keys.into_iter().map(|k| (k, settings.get(k))).collect(),
                })
            }
            ConfigCommand::Set {
                key,
                value,
                project,
            } => {
                let path = self.store.set(*key, value, project.as_deref())?;
                let value = self.store.effective(project.as_deref())?.get(*key);
                Ok(ConfigReport::Set {
                    key: *key,
                    value,
                    path,
                })
            }
            ConfigCommand::Path { project } => Ok(ConfigReport::Path {
                path: self.settings_path(project.as_deref()),
            }),
        }
    }

    fn settings_path(&self, project: Option<&Path>) -> PathBuf {
        match project {
            Some(dir) => project_path(dir),
            None => self.store.installation_path().to_path_buf(),
        }
    }
}

/// Read the text to convert from the input file or standard input
pub fn read_input(args: &ConvertArgs) -> Result<String, AppError> {
    match args.input_file() {
        Some(path) => Ok(read_script(path)?),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .map_err(|e| ScriptError::read_error("<stdin>", e))?;
            Ok(text)
        }
    }
}

/// The format to generate: `requested`, or the one from `settings`
fn preferred_format(
    requested: Option<DeclarationFormat>,
    settings: &Settings,
) -> Result<DeclarationFormat, SettingsError> {
    let format = requested.unwrap_or(settings.dependency_format);
    if !format.is_generatable() {
        return Err(SettingsError::ReadOnlyFormat { format });
    }
    Ok(format)
}

fn parent_dir(path: &Path) -> &Path {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{CliArgs, Command};
    use crate::domain::Outdatedness;
    use crate::error::RegistryError;
    use crate::registry::ReleaseDescriptor;
    use crate::update::Severity;
    use async_trait::async_trait;
    use clap::Parser;
    use std::cell::Cell;
    use std::fs;
    use tempfile::TempDir;

    const SCRIPT: &str = "dependencies {\n    compile(\"a:b:1\")\n}\n";

    struct StaticFeed(Vec<ReleaseDescriptor>);

    #[async_trait]
    impl VersionFeed for StaticFeed {
        fn feed_name(&self) -> &str {
            "static"
        }

        async fn fetch_releases(&self) -> Result<Vec<ReleaseDescriptor>, RegistryError> {
            Ok(self.0.clone())
        }
    }

    struct FailingFeed;

    #[async_trait]
    impl VersionFeed for FailingFeed {
        fn feed_name(&self) -> &str {
            "failing"
        }

        async fn fetch_releases(&self) -> Result<Vec<ReleaseDescriptor>, RegistryError> {
            Err(RegistryError::timeout("failing"))
        }
    }

    #[derive(Default)]
    struct CountingRunner {
        calls: Cell<usize>,
    }

    impl GradleRunner for CountingRunner {
        fn sync(&self, _project_dir: &Path) -> SyncResult {
            self.calls.set(self.calls.get() + 1);
            SyncResult::success("gradlew help".into(), String::new(), String::new())
        }
    }

    fn project(version: &str) -> TempDir {
        let dir = TempDir::new().unwrap();
        let path = WrapperProperties::locate(dir.path());
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(
            &path,
            format!(
                "distributionUrl=https\\://services.gradle.org/distributions/gradle-{}-bin.zip\n",
                version
            ),
        )
        .unwrap();
        dir
    }

    fn orchestrator(dir: &TempDir) -> Orchestrator {
        Orchestrator::new(SettingsStore::new(dir.path().join("settings.toml")))
    }

    fn check_args(dir: &TempDir, extra: &[&str]) -> CheckArgs {
        let project = dir.path().to_string_lossy().to_string();
        let mut args = vec!["gradle-assist", "check", project.as_str()];
        args.extend_from_slice(extra);
        match CliArgs::parse_from(args).command {
            Command::Check(check) => check,
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_check_with_pinned_latest() {
        let dir = project("7.6.1");
        let args = check_args(&dir, &["--latest", "8.10.2"]);
        let runner = CountingRunner::default();
        let report = orchestrator(&dir)
            .check_with(&args, None, &runner)
            .await
            .unwrap();

        let classification = report.classification.as_ref().unwrap();
        assert_eq!(classification.outdatedness, Outdatedness::MajorDiff);
        assert_eq!(classification.severity, Some(Severity::Major));
        assert!(report.refreshed_at.is_none());
        assert!(report.diagnostic.is_some());
        assert!(report.has_problems());
        assert!(report.upgrade.is_none());
    }

    #[tokio::test]
    async fn test_check_with_feed() {
        let dir = project("8.10.2");
        let args = check_args(&dir, &[]);
        let feed = StaticFeed(vec![
            ReleaseDescriptor::stable("8.10.2"),
            ReleaseDescriptor::stable("8.9"),
        ]);
        let report = orchestrator(&dir)
            .check_with(&args, Some(&feed), &CountingRunner::default())
            .await
            .unwrap();

        assert_eq!(
            report.classification.as_ref().unwrap().outdatedness,
            Outdatedness::Equal
        );
        assert!(report.refreshed_at.is_some());
        assert!(!report.has_problems());
    }

    #[tokio::test]
    async fn test_check_feed_failure() {
        let dir = project("8.5");
        let args = check_args(&dir, &[]);
        let result = orchestrator(&dir)
            .check_with(&args, Some(&FailingFeed), &CountingRunner::default())
            .await;
        assert!(matches!(result, Err(AppError::Registry(RegistryError::Timeout { .. }))));
    }

    #[tokio::test]
    async fn test_check_without_feed() {
        let dir = project("8.5");
        let args = check_args(&dir, &[]);
        let result = orchestrator(&dir)
            .check_with(&args, None, &CountingRunner::default())
            .await;
        assert!(matches!(result, Err(AppError::NotYetAvailable(_))));
    }

    #[tokio::test]
    async fn test_check_upgrade_and_sync() {
        let dir = project("8.5");
        let args = check_args(&dir, &["--latest", "8.10.2", "--upgrade", "--sync"]);
        let runner = CountingRunner::default();
        let report = orchestrator(&dir)
            .check_with(&args, None, &runner)
            .await
            .unwrap();

        assert!(report.upgraded());
        assert!(!report.has_problems());
        assert_eq!(runner.calls.get(), 1);

        let content = fs::read_to_string(WrapperProperties::locate(dir.path())).unwrap();
        assert!(content.contains("gradle-8.10.2-bin.zip"));
    }

    #[tokio::test]
    async fn test_check_upgrade_dry_run() {
        let dir = project("8.5");
        let args = check_args(&dir, &["--latest", "8.10.2", "--upgrade", "--sync", "-n"]);
        let runner = CountingRunner::default();
        let report = orchestrator(&dir)
            .check_with(&args, None, &runner)
            .await
            .unwrap();

        let upgrade = report.upgrade.as_ref().unwrap();
        assert!(upgrade.has_changes());
        assert!(!upgrade.file_modified);
        assert!(upgrade.content.contains("gradle-8.10.2-bin.zip"));
        assert_eq!(runner.calls.get(), 0);

        let content = fs::read_to_string(WrapperProperties::locate(dir.path())).unwrap();
        assert!(content.contains("gradle-8.5-bin.zip"));
    }

    #[tokio::test]
    async fn test_check_ignored() {
        let dir = project("7.0");
        let orchestrator = orchestrator(&dir);
        orchestrator
            .store()
            .set(SettingsKey::IgnoreOutdatedVersion, "true", Some(dir.path()))
            .unwrap();

        let args = check_args(&dir, &["--latest", "8.10.2"]);
        let report = orchestrator
            .check_with(&args, None, &CountingRunner::default())
            .await
            .unwrap();
        assert!(report.ignored);
        assert!(!report.has_problems());

        let args = check_args(&dir, &["--latest", "8.10.2", "--force"]);
        let report = orchestrator
            .check_with(&args, None, &CountingRunner::default())
            .await
            .unwrap();
        assert!(!report.ignored);
        assert!(report.has_problems());
    }

    #[tokio::test]
    async fn test_check_missing_wrapper() {
        let dir = TempDir::new().unwrap();
        let args = check_args(&dir, &["--latest", "8.10.2"]);
        let result = orchestrator(&dir)
            .check_with(&args, None, &CountingRunner::default())
            .await;
        assert!(matches!(result, Err(AppError::Script(ScriptError::NotFound { .. }))));
    }

    fn inspect_args(path: &Path, extra: &[&str]) -> InspectArgs {
        let script = path.to_string_lossy().to_string();
        let mut args = vec!["gradle-assist", "inspect", script.as_str()];
        args.extend_from_slice(extra);
        match CliArgs::parse_from(args).command {
            Command::Inspect(inspect) => inspect,
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_inspect_and_fix() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("build.gradle.kts");
        fs::write(&path, SCRIPT).unwrap();
        let orchestrator = orchestrator(&dir);

        let report = orchestrator.inspect(&inspect_args(&path, &[])).unwrap();
        assert_eq!(report.diagnostics.len(), 1);
        assert!(report.has_problems());

        let report = orchestrator.inspect(&inspect_args(&path, &["--fix", "-n"])).unwrap();
        let fix = report.fix.as_ref().unwrap();
        assert_eq!(fix.applied, 1);
        assert!(!fix.written);
        assert!(fix.text.contains("implementation(\"a:b:1\")"));
        assert_eq!(fs::read_to_string(&path).unwrap(), SCRIPT);

        let report = orchestrator.inspect(&inspect_args(&path, &["--fix"])).unwrap();
        assert!(report.fix.as_ref().unwrap().written);
        assert!(!report.has_problems());
        assert!(fs::read_to_string(&path).unwrap().contains("implementation(\"a:b:1\")"));
    }

    #[test]
    fn test_inspect_uses_project_format() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("build.gradle.kts");
        fs::write(&path, "dependencies {\n    implementation(\"a:b:1\")\n}\n").unwrap();
        let orchestrator = orchestrator(&dir);

        assert!(!orchestrator.inspect(&inspect_args(&path, &[])).unwrap().has_problems());

        orchestrator
            .store()
            .set(SettingsKey::DependencyFormat, "named", Some(dir.path()))
            .unwrap();
        assert!(orchestrator.inspect(&inspect_args(&path, &[])).unwrap().has_problems());
    }

    #[test]
    fn test_inspect_rejects_semi_named() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("build.gradle.kts");
        fs::write(&path, SCRIPT).unwrap();
        let result = orchestrator(&dir).inspect(&inspect_args(&path, &["--format", "semi-named"]));
        assert!(matches!(
            result,
            Err(AppError::Settings(SettingsError::ReadOnlyFormat { .. }))
        ));
    }

    fn convert_args(extra: &[&str]) -> ConvertArgs {
        let mut args = vec!["gradle-assist", "convert"];
        args.extend_from_slice(extra);
        match CliArgs::parse_from(args).command {
            Command::Convert(convert) => convert,
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_convert_text() {
        let dir = TempDir::new().unwrap();
        let report = orchestrator(&dir)
            .convert(&convert_args(&["-"]), "implementation 'a:b:1'\n")
            .unwrap();
        assert_eq!(report.conversion.text, "implementation(\"a:b:1\")\n");
        assert!(report.target.is_none());
    }

    #[test]
    fn test_convert_into_script() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("build.gradle.kts");
        let script = "dependencies {\n}\n";
        fs::write(&path, script).unwrap();
        let target = path.to_string_lossy().to_string();

        let args = convert_args(&["-", "--into", &target, "--offset", "15", "--write"]);
        let report = orchestrator(&dir)
            .convert(&args, "    compile 'a:b:1'\n")
            .unwrap();
        assert!(report.written);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "dependencies {\n    compile(\"a:b:1\")\n}\n"
        );
    }

    #[test]
    fn test_convert_invalid_offset() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("build.gradle.kts");
        fs::write(&path, "x\n").unwrap();
        let target = path.to_string_lossy().to_string();

        let args = convert_args(&["-", "--into", &target, "--offset", "99"]);
        match orchestrator(&dir).convert(&args, "a") {
            Err(AppError::Script(ScriptError::InvalidOffset { path: p, offset, len })) => {
                assert_eq!(p, path);
                assert_eq!(offset, 99);
                assert_eq!(len, 2);
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_config_commands() {
        let dir = TempDir::new().unwrap();
        let orchestrator = orchestrator(&dir);

        let report = orchestrator
            .config(&ConfigCommand::Set {
                key: SettingsKey::AlwaysConvertGroovy,
                value: "yes".into(),
                project: None,
            })
            .unwrap();
        match report {
            ConfigReport::Set { value, path, .. } => {
                assert_eq!(value, "true");
                assert_eq!(path, dir.path().join("settings.toml"));
            }
            other => panic!("unexpected report {:?}", other),
        }

        let report = orchestrator
            .config(&ConfigCommand::Get {
                key: None,
                project: None,
            })
            .unwrap();
        match report {
            ConfigReport::Values { values, .. } => {
                assert_eq!(values.len(), 3);
                assert!(values.contains(&(SettingsKey::AlwaysConvertGroovy, "true".to_string())));
            }
            other => panic!("unexpected report {:?}", other),
        }

        let report = orchestrator
            .config(&ConfigCommand::Path {
                project: Some(dir.path().to_path_buf()),
            })
            .unwrap();
        match report {
            ConfigReport::Path { path } => assert_eq!(path, project_path(dir.path())),
            other => panic!("unexpected report {:?}", other),
        }
    }
}
