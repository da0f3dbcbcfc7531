//! Sequential translation worker and its event stream
//!
//! One worker processes one file at a time, one span at a time — the
//! provider is rate-limited and every span carries its own shield map, so
//! there is nothing to parallelize. A front end spawns [`Worker::run`] as a
//! task and drains [`WorkerEvent`]s from the channel; the channel is the
//! only shared structure. Cancellation is a cooperative atomic flag checked
//! between files here and between lines inside the transformer; since a
//! destination file is written only after a full scan, no partial file ever
//! reaches disk.

use crate::dispatch::{Dispatcher, Route, TransformerKind};
use crate::error::{TransformError, TransformResult};
use crate::mt::MachineTranslator;
use crate::output;
use crate::transform::{FileReport, Transformer};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc::UnboundedSender;
use walkdir::WalkDir;

/// Progress and log stream consumed by the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerEvent {
    Log(String),
    /// Whole-run progress, 0..=100
    Progress(u8),
    FileDone {
        path: PathBuf,
        lines_translated: usize,
    },
    Finished(RunSummary),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub files_scanned: usize,
    pub files_written: usize,
    pub lines_translated: usize,
    pub cancelled: bool,
}

/// Run inputs supplied by the presentation collaborator
#[derive(Debug, Clone)]
pub struct WorkerOptions {
    /// Game root; data files live under `<base>/data`
    pub base_dir: PathBuf,
    pub source_locale: String,
    pub target_locale: String,
    /// Plugin name used for the output tree under `<base>/Plugins`
    pub plugin_name: String,
}

impl WorkerOptions {
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    pub fn plugin_dir(&self) -> PathBuf {
        self.base_dir.join("Plugins").join(&self.plugin_name)
    }
}

pub struct Worker {
    dispatcher: Dispatcher,
    provider: Arc<dyn MachineTranslator>,
    events: UnboundedSender<WorkerEvent>,
    cancel: Arc<AtomicBool>,
}

impl Worker {
    pub fn new(
        dispatcher: Dispatcher,
        provider: Arc<dyn MachineTranslator>,
        events: UnboundedSender<WorkerEvent>,
        cancel: Arc<AtomicBool>,
    ) -> Self {
        Self {
            dispatcher,
            provider,
            events,
            cancel,
        }
    }

    fn log(&self, message: impl Into<String>) {
        // receiver may have hung up; the worker keeps going regardless
        let _ = self.events.send(WorkerEvent::Log(message.into()));
    }

    fn send(&self, event: WorkerEvent) {
        let _ = self.events.send(event);
    }

    /// Collect the files this run will process, in a stable order
    ///
    /// Root files come from the configured list; included folders are
    /// scanned flat except `_ui`, which is walked recursively. Faction
    /// folder files must additionally match a safe filename fragment.
    fn collect_files(&self, data_dir: &Path) -> TransformResult<Vec<PathBuf>> {
        if !data_dir.is_dir() {
            return Err(TransformError::Setup(format!(
                "data directory not found: {}",
                data_dir.display()
            )));
        }

        let config = self.dispatcher.config();
        let mut files = Vec::new();

        for name in &config.included_root_files {
            let path = data_dir.join(name);
            if path.is_file() {
                files.push(path);
            }
        }

        for folder in &config.included_folders {
            let dir = data_dir.join(folder);
            if !dir.is_dir() {
                continue;
            }
            let recursive = folder == "_ui";
            let max_depth = if recursive { usize::MAX } else { 1 };
            let mut folder_files: Vec<PathBuf> = WalkDir::new(&dir)
                .max_depth(max_depth)
                .into_iter()
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.file_type().is_file())
                .map(|entry| entry.into_path())
                .filter(|path| {
                    path.extension().is_some_and(|ext| ext == "txt")
                        && path.file_name().and_then(|n| n.to_str()).is_some_and(
                            |name| recursive || config.file_safe(name),
                        )
                })
                .collect();
            folder_files.sort();
            files.append(&mut folder_files);
        }

        Ok(files)
    }

    /// Write the plugin metadata file once per run
    fn write_plugin_scaffold(&self, options: &WorkerOptions) -> TransformResult<()> {
        let plugin_dir = options.plugin_dir();
        std::fs::create_dir_all(plugin_dir.join("data"))?;
        let content = format!(
            "name \"{}\"\ndescription \"Machine-translated game text ({}).\"\nversion \"0.1.0\"\ntags\n\t\"translation\"\n\t\"{}\"\n",
            options.plugin_name, options.target_locale, options.target_locale
        );
        std::fs::write(plugin_dir.join("plugin.txt"), content)?;
        Ok(())
    }

    async fn process_file(
        &self,
        source: &Path,
        destination: &Path,
        kind: TransformerKind,
        options: &WorkerOptions,
    ) -> TransformResult<Option<FileReport>> {
        let content = output::read_source(source)?;
        let transformer = Transformer::new(
            kind,
            self.dispatcher.config(),
            self.provider.as_ref(),
            &options.source_locale,
            &options.target_locale,
        );
        let Some((translated, report)) = transformer
            .transform_content(&content, &self.cancel)
            .await
        else {
            return Ok(None);
        };

        for warning in &report.warnings {
            self.log(format!("{}: {}", source.display(), warning));
        }

        if report.lines_translated > 0 {
            output::write_translated(destination, &translated)?;
        }

        Ok(Some(report))
    }

    /// Run the whole translation pass
    ///
    /// Never fails for a recoverable per-file condition; only setup errors
    /// (missing data directory, unwritable plugin root) abort.
    pub async fn run(&self, options: &WorkerOptions) -> TransformResult<RunSummary> {
        let data_dir = options.data_dir();
        let files = self.collect_files(&data_dir)?;
        self.write_plugin_scaffold(options)?;
        self.log(format!("Found {} files to process", files.len()));

        let plugin_data = options.plugin_dir().join("data");
        let mut summary = RunSummary {
            files_scanned: files.len(),
            ..Default::default()
        };

        for (i, source) in files.iter().enumerate() {
            if self.cancel.load(Ordering::Relaxed) {
                summary.cancelled = true;
                break;
            }

            let filename = source
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default();
            let kind = match self.dispatcher.route(filename) {
                Route::Excluded => {
                    self.log(format!("Skipping excluded file {}", source.display()));
                    continue;
                }
                Route::Transform(kind) => kind,
            };

            let relative = source.strip_prefix(&data_dir).unwrap_or(source);
            let destination = plugin_data.join(relative);

            match self.process_file(source, &destination, kind, options).await {
                Ok(Some(report)) => {
                    if report.lines_translated > 0 {
                        summary.files_written += 1;
                        summary.lines_translated += report.lines_translated;
                    }
                    self.send(WorkerEvent::FileDone {
                        path: source.clone(),
                        lines_translated: report.lines_translated,
                    });
                }
                Ok(None) => {
                    summary.cancelled = true;
                    break;
                }
                Err(e) => {
                    // decode and write failures lose one file, not the run
                    self.log(format!("{}: {}", source.display(), e));
                }
            }

            let percent = ((i + 1) * 100 / files.len().max(1)) as u8;
            self.send(WorkerEvent::Progress(percent));
        }

        self.send(WorkerEvent::Finished(summary.clone()));
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TranslatorConfig;
    use crate::mt::{MockMode, MockTranslator};
    use tempfile::tempdir;
    use tokio::sync::mpsc;

    fn write_file(path: &Path, content: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    fn worker(mode: MockMode) -> (Worker, mpsc::UnboundedReceiver<WorkerEvent>, Arc<AtomicBool>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = Arc::new(AtomicBool::new(false));
        let worker = Worker::new(
            Dispatcher::new(TranslatorConfig::default()),
            Arc::new(MockTranslator::new(mode)),
            tx,
            cancel.clone(),
        );
        (worker, rx, cancel)
    }

    fn options(base: &Path) -> WorkerOptions {
        WorkerOptions {
            base_dir: base.to_path_buf(),
            source_locale: "en".to_string(),
            target_locale: "es".to_string(),
            plugin_name: "translation-es".to_string(),
        }
    }

    #[tokio::test]
    async fn test_run_translates_and_mirrors_tree() {
        let dir = tempdir().unwrap();
        let data = dir.path().join("data");
        write_file(
            &data.join("human").join("first contact mission.txt"),
            "mission \"First Contact\"\n\t`The alien ship drifts closer.`\n",
        );

        let (worker, _rx, _) = worker(MockMode::Suffix);
        let summary = worker.run(&options(dir.path())).await.unwrap();
        assert_eq!(summary.files_written, 1);
        assert_eq!(summary.lines_translated, 1);

        let out = dir
            .path()
            .join("Plugins")
            .join("translation-es")
            .join("data")
            .join("human")
            .join("first contact mission.txt");
        let translated = output::read_source(&out).unwrap();
        assert!(translated.contains("drifts closer._es"));
        assert!(translated.contains("mission \"First Contact\""));
    }

    #[tokio::test]
    async fn test_no_qualifying_lines_no_output_file() {
        let dir = tempdir().unwrap();
        let data = dir.path().join("data");
        write_file(
            &data.join("human").join("sales.txt"),
            "shipyard \"Lovelace Basics\"\n\t\"Sparrow\"\n\t\"Shuttle\"\n",
        );

        let (worker, _rx, _) = worker(MockMode::Suffix);
        let summary = worker.run(&options(dir.path())).await.unwrap();
        assert_eq!(summary.files_written, 0);

        let out = dir
            .path()
            .join("Plugins")
            .join("translation-es")
            .join("data")
            .join("human")
            .join("sales.txt");
        assert!(!out.exists());
    }

    #[tokio::test]
    async fn test_unsafe_faction_files_not_collected() {
        let dir = tempdir().unwrap();
        let data = dir.path().join("data");
        write_file(
            &data.join("hai").join("hai culture notes.txt"),
            "\t`Prose that would translate.`\n",
        );
        write_file(
            &data.join("hai").join("hai derelicts.txt"),
            "\t`Prose that would translate.`\n",
        );

        let (worker, _rx, _) = worker(MockMode::Suffix);
        let summary = worker.run(&options(dir.path())).await.unwrap();
        assert_eq!(summary.files_scanned, 0);
    }

    #[tokio::test]
    async fn test_root_files_and_ui_recursion() {
        let dir = tempdir().unwrap();
        let data = dir.path().join("data");
        write_file(
            &data.join("map planets.txt"),
            "planet \"Earth\"\n\tdescription `Humanity's ancient home.`\n",
        );
        write_file(
            &data.join("_ui").join("menus").join("interface panels.txt"),
            "interface \"main menu\"\n\tlabel \"New Pilot\"\n",
        );

        let (worker, _rx, _) = worker(MockMode::Suffix);
        let summary = worker.run(&options(dir.path())).await.unwrap();
        assert_eq!(summary.files_scanned, 2);
        assert_eq!(summary.files_written, 2);
    }

    #[tokio::test]
    async fn test_plugin_scaffold_written() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("data")).unwrap();
        let (worker, _rx, _) = worker(MockMode::Suffix);
        worker.run(&options(dir.path())).await.unwrap();

        let plugin = dir
            .path()
            .join("Plugins")
            .join("translation-es")
            .join("plugin.txt");
        let content = std::fs::read_to_string(plugin).unwrap();
        assert!(content.starts_with("name \"translation-es\""));
        assert!(content.contains("\"translation\""));
    }

    #[tokio::test]
    async fn test_failing_provider_completes_with_zero() {
        let dir = tempdir().unwrap();
        let data = dir.path().join("data");
        write_file(
            &data.join("dialog phrases.txt"),
            "phrase \"greetings\"\n\tword\n\t\t\"welcome aboard\"\n",
        );

        let (worker, _rx, _) = worker(MockMode::Error("API unavailable".to_string()));
        let summary = worker.run(&options(dir.path())).await.unwrap();
        assert_eq!(summary.lines_translated, 0);
        assert_eq!(summary.files_written, 0);
        assert!(!summary.cancelled);
    }

    #[tokio::test]
    async fn test_missing_data_dir_is_setup_error() {
        let dir = tempdir().unwrap();
        let (worker, _rx, _) = worker(MockMode::Suffix);
        let err = worker.run(&options(dir.path())).await.unwrap_err();
        assert!(matches!(err, TransformError::Setup(_)));
    }

    #[tokio::test]
    async fn test_cancel_before_first_file() {
        let dir = tempdir().unwrap();
        let data = dir.path().join("data");
        write_file(
            &data.join("human").join("jobs.txt"),
            "mission \"Cargo Run\"\n\t`Deliver the goods.`\n",
        );

        let (worker, _rx, cancel) = worker(MockMode::Suffix);
        cancel.store(true, Ordering::Relaxed);
        let summary = worker.run(&options(dir.path())).await.unwrap();
        assert!(summary.cancelled);
        assert_eq!(summary.files_written, 0);
    }

    #[tokio::test]
    async fn test_events_stream_progress_and_finish() {
        let dir = tempdir().unwrap();
        let data = dir.path().join("data");
        write_file(
            &data.join("human").join("jobs.txt"),
            "mission \"Cargo Run\"\n\t`Deliver the goods.`\n",
        );

        let (worker, mut rx, _) = worker(MockMode::Suffix);
        worker.run(&options(dir.path())).await.unwrap();

        let mut saw_progress = false;
        let mut saw_finished = false;
        let mut saw_file_done = false;
        while let Ok(event) = rx.try_recv() {
            match event {
                WorkerEvent::Progress(p) => {
                    assert!(p <= 100);
                    saw_progress = true;
                }
                WorkerEvent::Finished(summary) => {
                    assert_eq!(summary.files_written, 1);
                    saw_finished = true;
                }
                WorkerEvent::FileDone {
                    lines_translated, ..
                } => {
                    assert_eq!(lines_translated, 1);
                    saw_file_done = true;
                }
                WorkerEvent::Log(_) => {}
            }
        }
        assert!(saw_progress);
        assert!(saw_finished);
        assert!(saw_file_done);
    }
}
