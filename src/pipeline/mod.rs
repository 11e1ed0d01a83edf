//! Bundle run pipeline
//!
//! Extract → load manifest → install dependencies → launch entry, strictly in that order.
//! The first failure ends the run. The extraction directory is removed when the run ends
//! unless the configuration asks to keep it.
//!
//! ## Usage
//!
//! ```ignore
//! let pipeline = Pipeline::new(config).with_confirmer(Arc::new(Decision(true)));
//! let summary = pipeline.run(Path::new("app.par"))?;
//!
//! // Or in the background, with exactly one callback:
//! let handle = pipeline::spawn(pipeline, bundle, |outcome| { /* ... */ })?;
//! ```

mod outcome;

pub use outcome::{Outcome, RunSummary};

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::archive::{self, ExtractionDir};
use crate::config::LauncherConfig;
use crate::confirm::{Confirmer, ConsoleConfirmer};
use crate::deps::DependencyInstaller;
use crate::error::Result;
use crate::launcher;
use crate::manifest;
use crate::process::{CommandRunner, SystemRunner};
use crate::progress::ExtractProgress;
use crate::temp;

/// A configured bundle runner
#[derive(Clone)]
pub struct Pipeline {
    config: LauncherConfig,
    runner: Arc<dyn CommandRunner>,
    confirmer: Arc<dyn Confirmer>,
    show_progress: bool,
}

impl Pipeline {
    /// Pipeline that spawns real processes and prompts on the console
    pub fn new(config: LauncherConfig) -> Self {
        Self {
            config,
            runner: Arc::new(SystemRunner),
            confirmer: Arc::new(ConsoleConfirmer),
            show_progress: false,
        }
    }

    #[cfg(test)]
    #[must_use]
    pub fn with_runner(mut self, runner: Arc<dyn CommandRunner>) -> Self {
        self.runner = runner;
        self
    }

    #[must_use]
    pub fn with_confirmer(mut self, confirmer: Arc<dyn Confirmer>) -> Self {
        self.confirmer = confirmer;
        self
    }

    #[must_use]
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Run one bundle to completion
    pub fn run(&self, bundle: &Path) -> Result<RunSummary> {
        let base = temp::extraction_base(self.config.extraction_dir.as_deref());
        let progress = if self.show_progress {
            ExtractProgress::new(0)
        } else {
            ExtractProgress::hidden()
        };

        let extraction = archive::extract(bundle, &base, &progress)?;
        let extraction_dir = extraction.path().to_path_buf();
        tracing::info!(
            bundle = %bundle.display(),
            dir = %extraction_dir.display(),
            "bundle extracted"
        );

        let result = self.run_extracted(bundle, &extraction_dir);
        let kept = self.release(extraction);

        result.map(|mut summary| {
            summary.kept = kept;
            summary
        })
    }

    fn run_extracted(&self, bundle: &Path, dir: &Path) -> Result<RunSummary> {
        let manifest = manifest::load(dir)?;

        let installer =
            DependencyInstaller::new(&self.config, self.runner.as_ref(), self.confirmer.as_ref());
        let (context, report) = installer.install(dir, &manifest)?;
        tracing::debug!(
            interpreter = %context.interpreter.display(),
            isolated = context.interpreter_within(dir),
            "dependencies ready"
        );

        let exit = launcher::launch(self.runner.as_ref(), &context, &manifest)?;
        tracing::info!(entry = %exit.script.display(), "entry script finished");

        Ok(RunSummary {
            bundle: bundle.to_path_buf(),
            extraction_dir: dir.to_path_buf(),
            kept: false,
            manifest,
            report,
            context,
            entry_script: exit.script,
            exit_code: exit.code,
        })
    }

    /// Keep or remove the extraction directory; returns whether it was kept
    fn release(&self, extraction: ExtractionDir) -> bool {
        if self.config.keep_extracted {
            let dir = extraction.keep();
            tracing::info!(dir = %dir.display(), "keeping extraction directory");
            return true;
        }

        if let Err(e) = extraction.close() {
            tracing::warn!(error = %e, "failed to remove extraction directory");
        }
        false
    }
}

/// Run `bundle` on a background thread and call `on_outcome` exactly once with the result.
///
/// Fails only when the thread cannot be started, in which case `on_outcome` is never called.
pub fn spawn<F>(pipeline: Pipeline, bundle: PathBuf, on_outcome: F) -> Result<JoinHandle<()>>
where
    F: FnOnce(Outcome) + Send + 'static,
{
    let handle = thread::Builder::new()
        .name("parrun-pipeline".to_string())
        .spawn(move || {
            let outcome = Outcome::from(pipeline.run(&bundle));
            on_outcome(outcome);
        })?;
    Ok(handle)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc;

    use super::*;
    use crate::confirm::{Decision, PrivilegeRequest};
    use crate::deps::{InterpreterInstall, SystemInstall, python};
    use crate::error::ErrorKind;
    use crate::process::testing::FakeRunner;
    use crate::process::{Invocation, ProcessExit};
    use crate::test_fixtures::{create_temp_dir, write_bundle};
    use tempfile::TempDir;

    struct Fixture {
        temp: TempDir,
        base: PathBuf,
    }

    impl Fixture {
        fn new() -> Self {
            let temp = create_temp_dir();
            let base = temp.path().join("extract");
            Self { temp, base }
        }

        fn bundle(&self, entries: &[(&str, &[u8])]) -> PathBuf {
            let path = self.temp.path().join("app.par");
            write_bundle(&path, entries);
            path
        }

        fn config(&self) -> LauncherConfig {
            LauncherConfig {
                extraction_dir: Some(self.base.clone()),
                ..LauncherConfig::default()
            }
        }

        fn pipeline(&self, runner: &Arc<FakeRunner>) -> Pipeline {
            Pipeline::new(self.config())
                .with_runner(runner.clone())
                .with_confirmer(Arc::new(Decision(false)))
        }

        fn leftover_dirs(&self) -> usize {
            std::fs::read_dir(&self.base)
                .map(|entries| entries.filter_map(|e| e.ok()).count())
                .unwrap_or(0)
        }
    }

    struct CountingConfirmer {
        answer: bool,
        asked: AtomicUsize,
    }

    impl Confirmer for CountingConfirmer {
        fn confirm(&self, _request: &PrivilegeRequest) -> Result<bool> {
            self.asked.fetch_add(1, Ordering::SeqCst);
            Ok(self.answer)
        }
    }

    fn is_direct_pip(invocation: &Invocation) -> bool {
        invocation.args.first().map(String::as_str) == Some("-m")
            && invocation.args.get(1).map(String::as_str) == Some("pip")
    }

    #[test]
    fn test_minimal_bundle_runs_default_entry() {
        let fixture = Fixture::new();
        let bundle = fixture.bundle(&[("main.py", b"print('hi')\n")]);
        let runner = Arc::new(FakeRunner::with(|invocation| {
            // The extraction directory exists while the entry runs
            let cwd = invocation.cwd.clone().unwrap_or_default();
            assert!(cwd.join("main.py").is_file());
            Ok(ProcessExit::SUCCESS)
        }));

        let summary = fixture.pipeline(&runner).run(&bundle).unwrap();

        assert_eq!(summary.exit_code, 0);
        assert_eq!(summary.context.interpreter, LauncherConfig::default().interpreter);
        assert_eq!(summary.context.working_dir, summary.extraction_dir);
        assert!(summary.entry_script.ends_with("main.py"));
        assert_eq!(summary.report.system, SystemInstall::Skipped);
        assert_eq!(summary.report.interpreter, InterpreterInstall::Skipped);
        assert_eq!(runner.calls().len(), 1);
        assert!(!summary.kept);
        assert!(!summary.extraction_dir.exists());
    }

    #[test]
    fn test_missing_entry_runs_nothing() {
        let fixture = Fixture::new();
        let bundle = fixture.bundle(&[("par.json", br#"{"entry_point": "run.py"}"#)]);
        let runner = Arc::new(FakeRunner::succeeding());

        let err = fixture.pipeline(&runner).run(&bundle).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::EntryNotFound);
        assert!(err.to_string().contains("run.py"));
        assert!(runner.calls().is_empty());
        assert_eq!(fixture.leftover_dirs(), 0);
    }

    #[test]
    fn test_nonexistent_bundle_creates_nothing() {
        let fixture = Fixture::new();
        let runner = Arc::new(FakeRunner::succeeding());

        let err = fixture
            .pipeline(&runner)
            .run(&fixture.temp.path().join("missing.par"))
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ArchiveNotFound);
        assert!(!fixture.base.exists());
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_corrupt_bundle() {
        let fixture = Fixture::new();
        let bundle = fixture.temp.path().join("broken.par");
        std::fs::write(&bundle, b"definitely not a zip").unwrap();
        let runner = Arc::new(FakeRunner::succeeding());

        let err = fixture.pipeline(&runner).run(&bundle).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArchiveCorrupt);
        assert_eq!(fixture.leftover_dirs(), 0);
    }

    #[test]
    fn test_invalid_manifest_stops_before_install() {
        let fixture = Fixture::new();
        let bundle = fixture.bundle(&[
            ("par.json", b"{not json"),
            ("requirements.txt", b"requests\n"),
            ("main.py", b""),
        ]);
        let runner = Arc::new(FakeRunner::succeeding());

        let err = fixture.pipeline(&runner).run(&bundle).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ManifestInvalid);
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_direct_install_keeps_interpreter() {
        let fixture = Fixture::new();
        let bundle = fixture.bundle(&[("requirements.txt", b"requests\n"), ("main.py", b"")]);
        let runner = Arc::new(FakeRunner::succeeding());

        let summary = fixture.pipeline(&runner).run(&bundle).unwrap();

        assert_eq!(summary.report.interpreter, InterpreterInstall::Direct);
        assert_eq!(summary.context.interpreter, LauncherConfig::default().interpreter);
        assert_eq!(runner.calls().len(), 2);
    }

    #[test]
    fn test_fallback_runs_entry_with_venv_interpreter() {
        let fixture = Fixture::new();
        let bundle = fixture.bundle(&[("requirements.txt", b"numpy\n"), ("main.py", b"")]);
        let runner = Arc::new(FakeRunner::with(|invocation| {
            if is_direct_pip(invocation) {
                Ok(ProcessExit::code(1))
            } else {
                Ok(ProcessExit::SUCCESS)
            }
        }));

        let summary = fixture.pipeline(&runner).run(&bundle).unwrap();

        let venv = summary.extraction_dir.join(python::VENV_DIR);
        assert_eq!(summary.context.interpreter, python::venv_interpreter(&venv));
        assert!(summary.context.interpreter_within(&summary.extraction_dir));

        let calls = runner.calls();
        let entry = calls.last().unwrap();
        assert_eq!(entry.program, python::venv_interpreter(&venv));
    }

    #[test]
    fn test_sudo_declined_runs_no_commands() {
        let fixture = Fixture::new();
        let bundle = fixture.bundle(&[
            ("par.json", br#"{"sudo": true}"#),
            ("apt.txt", b"ffmpeg\n"),
            ("requirements.txt", b"numpy\n"),
            ("main.py", b""),
        ]);
        let runner = Arc::new(FakeRunner::succeeding());
        let confirmer = Arc::new(CountingConfirmer {
            answer: false,
            asked: AtomicUsize::new(0),
        });

        let err = fixture
            .pipeline(&runner)
            .with_confirmer(confirmer.clone())
            .run(&bundle)
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::UserAborted);
        assert_eq!(confirmer.asked.load(Ordering::SeqCst), 1);
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_system_failure_still_succeeds() {
        let fixture = Fixture::new();
        let bundle = fixture.bundle(&[("apt.txt", b"ffmpeg\n"), ("main.py", b"")]);
        let runner = Arc::new(FakeRunner::with(|invocation| {
            if invocation.program == Path::new("sudo") {
                Ok(ProcessExit::code(100))
            } else {
                Ok(ProcessExit::SUCCESS)
            }
        }));

        let summary = fixture.pipeline(&runner).run(&bundle).unwrap();

        assert!(matches!(summary.report.system, SystemInstall::Failed { .. }));
        assert_eq!(summary.exit_code, 0);
    }

    #[test]
    fn test_non_zero_entry_exit_fails() {
        let fixture = Fixture::new();
        let bundle = fixture.bundle(&[("main.py", b"raise SystemExit(4)\n")]);
        let runner = Arc::new(FakeRunner::with(|_| Ok(ProcessExit::code(4))));

        let err = fixture.pipeline(&runner).run(&bundle).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EntryFailed);
        assert_eq!(fixture.leftover_dirs(), 0);
    }

    #[test]
    fn test_keep_extracted() {
        let fixture = Fixture::new();
        let bundle = fixture.bundle(&[("main.py", b"")]);
        let runner = Arc::new(FakeRunner::succeeding());
        let config = LauncherConfig {
            keep_extracted: true,
            ..fixture.config()
        };

        let summary = Pipeline::new(config)
            .with_runner(runner)
            .run(&bundle)
            .unwrap();

        assert!(summary.kept);
        assert!(summary.extraction_dir.join("main.py").is_file());
        assert_eq!(fixture.leftover_dirs(), 1);
    }

    #[test]
    fn test_repeated_runs_use_fresh_directories() {
        let fixture = Fixture::new();
        let bundle = fixture.bundle(&[("main.py", b"")]);
        let runner = Arc::new(FakeRunner::succeeding());
        let config = LauncherConfig {
            keep_extracted: true,
            ..fixture.config()
        };
        let pipeline = Pipeline::new(config).with_runner(runner);

        let first = pipeline.run(&bundle).unwrap();
        let second = pipeline.run(&bundle).unwrap();

        assert_ne!(first.extraction_dir, second.extraction_dir);
        assert_eq!(fixture.leftover_dirs(), 2);
    }

    #[test]
    fn test_spawn_delivers_one_outcome() {
        let fixture = Fixture::new();
        let bundle = fixture.bundle(&[("main.py", b"")]);
        let runner = Arc::new(FakeRunner::succeeding());
        let (tx, rx) = mpsc::channel();

        let handle = spawn(fixture.pipeline(&runner), bundle, move |outcome| {
            tx.send(outcome).unwrap();
        })
        .unwrap();
        handle.join().unwrap();

        let outcome = rx.recv().unwrap();
        assert!(outcome.is_success());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_spawn_delivers_failure() {
        let fixture = Fixture::new();
        let runner = Arc::new(FakeRunner::succeeding());
        let (tx, rx) = mpsc::channel();

        let handle = spawn(
            fixture.pipeline(&runner),
            fixture.temp.path().join("missing.par"),
            move |outcome| tx.send(outcome).unwrap(),
        )
        .unwrap();
        handle.join().unwrap();

        let outcome = rx.recv().unwrap();
        assert_eq!(outcome.kind(), Some(ErrorKind::ArchiveNotFound));
        assert!(rx.try_recv().is_err());
    }
}
