use crate::constants::{GUI_DEFAULT_QUALITY, SKIP_REASON_CANCELLED, SKIP_REASON_EXISTS};
use crate::error::{CompressionError, Result};
use crate::events::{BatchEvent, Callbacks, EventSink};
use crate::logger::Logger;
use crate::processing::compress_image;
use crate::resolver::{check_destination, ensure_directory, output_subdir, Resolution};
use crate::scanner::collect_under;
use crate::task::{CancelToken, ImageTask, TaskOutcome};
use crate::utils::{calculate_compression_ratio, files_per_second, panic_message};
use crate::validation::{validate_input_dir, validate_quality};
use crossbeam_channel::{unbounded, Receiver, Sender};
use rayon::prelude::*;
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Every candidate on the calling thread, in scan order.
    Sequential,
    /// A rayon pool; `None` sizes it to the number of CPUs.
    Parallel { threads: Option<usize> },
}

impl Default for ExecutionMode {
    fn default() -> Self {
        ExecutionMode::Parallel { threads: None }
    }
}

#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub quality: u8,
    pub keep_originals: bool,
    pub execution: ExecutionMode,
}

impl BatchConfig {
    pub fn new(
        input_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        quality: u8,
        keep_originals: bool,
    ) -> Result<Self> {
        Ok(Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            quality: validate_quality(quality)?,
            keep_originals,
            execution: ExecutionMode::default(),
        })
    }

    /// Defaults for an interactive front end: GUI quality, originals removed,
    /// parallel execution.
    pub fn interactive(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            quality: GUI_DEFAULT_QUALITY,
            keep_originals: false,
            execution: ExecutionMode::default(),
        }
    }

    pub fn with_execution(mut self, execution: ExecutionMode) -> Self {
        self.execution = execution;
        self
    }

    /// Worker count for `candidates` files, never zero and never more than needed.
    pub fn worker_count(&self, candidates: usize) -> usize {
        match self.execution {
            ExecutionMode::Sequential => 1,
            ExecutionMode::Parallel { threads } => threads
                .unwrap_or_else(num_cpus::get)
                .min(candidates)
                .max(1),
        }
    }
}

/// What one batch produced. `processed` holds source paths in completion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchResult {
    pub processed: Vec<PathBuf>,
    pub skipped: usize,
    pub failed: usize,
    pub original_bytes: u64,
    pub compressed_bytes: u64,
    pub elapsed: Duration,
}

impl BatchResult {
    fn record(&mut self, outcome: &TaskOutcome) {
        match outcome {
            TaskOutcome::Processed { source, stats, .. } => {
                self.processed.push(source.clone());
                self.original_bytes += stats.original_size;
                self.compressed_bytes += stats.compressed_size;
            }
            TaskOutcome::Skipped { .. } => self.skipped += 1,
            TaskOutcome::Failed { .. } => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.processed.len() + self.skipped + self.failed
    }

    pub fn is_empty(&self) -> bool {
        self.processed.is_empty()
    }

    pub fn compression_ratio(&self) -> f64 {
        calculate_compression_ratio(self.original_bytes, self.compressed_bytes)
    }

    pub fn files_per_second(&self) -> f64 {
        files_per_second(self.processed.len(), self.elapsed)
    }

    pub fn into_paths(self) -> Vec<PathBuf> {
        self.processed
    }
}

/// Runs one batch: scan, resolve, compress, optionally delete originals.
///
/// Workers report through an internal channel. The thread calling [`run`]
/// drains it, so the sink is only ever touched from that one thread.
///
/// [`run`]: BatchOrchestrator::run
#[derive(Debug, Clone)]
pub struct BatchOrchestrator {
    config: BatchConfig,
    logger: Logger,
    cancel: CancelToken,
}

impl BatchOrchestrator {
    pub fn new(config: BatchConfig, logger: Logger) -> Self {
        Self {
            config,
            logger,
            cancel: CancelToken::new(),
        }
    }

    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn run<S: EventSink + ?Sized>(&self, sink: &mut S) -> Result<BatchResult> {
        let start_time = Instant::now();

        if ensure_directory(&self.config.output_dir)? {
            sink.emit(BatchEvent::progress(format!(
                "Creating output directory: {}",
                self.config.output_dir.display()
            )));
        }
        let output_root = self.config.output_dir.canonicalize()?;
        let input_root = validate_input_dir(&self.config.input_dir)?;

        // An output tree nested in the input must not feed back into the batch.
        let nested_output = (output_root != input_root && output_root.starts_with(&input_root))
            .then_some(output_root.as_path());
        let scan = collect_under(&input_root, nested_output)?;
        for err in &scan.unreadable {
            let dir = err.path().unwrap_or(input_root.as_path());
            sink.emit(BatchEvent::skip(
                dir,
                format!("Skipping unreadable directory {}: {}", dir.display(), err),
            ));
        }
        let candidates = scan.files;

        let total = candidates.len();
        self.logger
            .info(format!("Found {} image files in {}", total, input_root.display()));
        sink.emit(BatchEvent::Started { total });

        let mut result = BatchResult::default();
        if total > 0 {
            let tasks: Vec<ImageTask> = candidates
                .into_iter()
                .map(|source| {
                    ImageTask::new(
                        source,
                        input_root.clone(),
                        output_root.clone(),
                        self.config.quality,
                        self.config.keep_originals,
                    )
                })
                .collect();

            match self.config.execution {
                ExecutionMode::Sequential => self.run_sequential(&tasks, &mut result, sink),
                ExecutionMode::Parallel { .. } => {
                    self.run_parallel(&tasks, &mut result, sink)?
                }
            }
        }

        result.elapsed = start_time.elapsed();
        sink.emit(BatchEvent::Finished {
            processed: result.processed.len(),
            skipped: result.skipped,
            failed: result.failed,
        });
        self.logger.verbose(format!(
            "Batch finished in {:.2?}: {} processed, {} skipped, {} failed",
            result.elapsed,
            result.processed.len(),
            result.skipped,
            result.failed
        ));

        Ok(result)
    }

    fn run_sequential<S: EventSink + ?Sized>(
        &self,
        tasks: &[ImageTask],
        result: &mut BatchResult,
        sink: &mut S,
    ) {
        self.logger.verbose("Processing candidates sequentially");
        let (tx, rx) = unbounded();

        for task in tasks {
            let outcome = self.run_candidate(task, &tx);
            let _ = tx.send(BatchEvent::Outcome(outcome));
            drain(&rx, result, sink);
        }
    }

    fn run_parallel<S: EventSink + ?Sized>(
        &self,
        tasks: &[ImageTask],
        result: &mut BatchResult,
        sink: &mut S,
    ) -> Result<()> {
        let threads = self.config.worker_count(tasks.len());
        self.logger
            .info(format!("Using {} parallel threads for processing", threads));

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|index| format!("img-compressor-{}", index))
            .build()
            .map_err(|e| CompressionError::ThreadPool(e.to_string()))?;

        let (tx, rx) = unbounded();
        let pool = &pool;

        thread::scope(|scope| {
            let workers = scope.spawn(move || {
                pool.install(|| {
                    tasks.par_iter().for_each_with(tx, |tx, task| {
                        let outcome = self.run_candidate(task, tx);
                        let _ = tx.send(BatchEvent::Outcome(outcome));
                    })
                })
            });

            // Ends once every worker's sender clone is dropped.
            for event in rx.iter() {
                forward(event, result, sink);
            }

            workers
                .join()
                .map_err(|payload| CompressionError::WorkerPanicked(panic_message(payload.as_ref())))
        })
    }

    /// Per-candidate boundary: always yields exactly one outcome.
    fn run_candidate(&self, task: &ImageTask, tx: &Sender<BatchEvent>) -> TaskOutcome {
        let source = task.source_path();

        if self.cancel.is_cancelled() {
            return TaskOutcome::Skipped {
                source: source.to_path_buf(),
                reason: SKIP_REASON_CANCELLED.to_string(),
            };
        }

        match panic::catch_unwind(AssertUnwindSafe(|| process_candidate(task, tx, &self.logger))) {
            Ok(outcome) => outcome,
            Err(payload) => {
                let error = format!("unexpected error: {}", panic_message(payload.as_ref()));
                let _ = tx.send(BatchEvent::error(
                    source,
                    format!("Error processing {}: {}", source.display(), error),
                ));
                TaskOutcome::Failed {
                    source: source.to_path_buf(),
                    error,
                }
            }
        }
    }
}

fn forward<S: EventSink + ?Sized>(event: BatchEvent, result: &mut BatchResult, sink: &mut S) {
    if let BatchEvent::Outcome(outcome) = &event {
        result.record(outcome);
    }
    sink.emit(event);
}

fn drain<S: EventSink + ?Sized>(rx: &Receiver<BatchEvent>, result: &mut BatchResult, sink: &mut S) {
    for event in rx.try_iter() {
        forward(event, result, sink);
    }
}

fn process_candidate(task: &ImageTask, tx: &Sender<BatchEvent>, logger: &Logger) -> TaskOutcome {
    let source = task.source_path();

    let resolution = output_subdir(source, task.input_root(), task.output_root()).and_then(|subdir| {
        if ensure_directory(&subdir)? {
            let _ = tx.send(BatchEvent::progress(format!(
                "Creating output directory: {}",
                subdir.display()
            )));
        }
        check_destination(&subdir, source)
    });

    let dest = match resolution {
        Ok(Resolution::Ready(dest)) => dest,
        Ok(Resolution::Exists(dest)) => return skip_existing(source, &dest, tx),
        Err(e) => return fail(source, e, tx),
    };

    logger.verbose(format!("Compressing {}", source.display()));
    match compress_image(source, &dest, task.quality()) {
        Ok(stats) => {
            let _ = tx.send(BatchEvent::progress(format!(
                "Compressed {} -> {}",
                source.display(),
                dest.display()
            )));
            let original_removed = !task.keep_original() && remove_original(source, tx);
            TaskOutcome::Processed {
                source: source.to_path_buf(),
                dest,
                stats,
                original_removed,
            }
        }
        // Another candidate stemmed to the same name and won the rename.
        Err(CompressionError::DestinationExists(dest)) => skip_existing(source, &dest, tx),
        Err(e) => fail(source, e, tx),
    }
}

fn remove_original(source: &Path, tx: &Sender<BatchEvent>) -> bool {
    match fs::remove_file(source) {
        Ok(()) => {
            let _ = tx.send(BatchEvent::progress(format!(
                "Removed original file: {}",
                source.display()
            )));
            true
        }
        Err(e) => {
            let err = CompressionError::OriginalDeletion {
                path: source.to_path_buf(),
                source: e,
            };
            let _ = tx.send(BatchEvent::error(source, err.to_string()));
            false
        }
    }
}

fn skip_existing(source: &Path, dest: &Path, tx: &Sender<BatchEvent>) -> TaskOutcome {
    let name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| source.display().to_string());
    let _ = tx.send(BatchEvent::skip(
        source,
        format!(
            "Skipping {}, destination file already exists: {}",
            name,
            dest.display()
        ),
    ));
    TaskOutcome::Skipped {
        source: source.to_path_buf(),
        reason: SKIP_REASON_EXISTS.to_string(),
    }
}

fn fail(source: &Path, error: CompressionError, tx: &Sender<BatchEvent>) -> TaskOutcome {
    let _ = tx.send(BatchEvent::error(
        source,
        format!("Error processing {}: {}", source.display(), error),
    ));
    TaskOutcome::Failed {
        source: source.to_path_buf(),
        error: error.to_string(),
    }
}

/// A batch running on a background thread.
///
/// The presentation layer drains [`events`](BatchHandle::events) on its own
/// loop and calls [`join`](BatchHandle::join) once `Finished` arrives or the
/// channel closes.
pub struct BatchHandle {
    events: Receiver<BatchEvent>,
    cancel: CancelToken,
    handle: JoinHandle<Result<BatchResult>>,
}

impl BatchHandle {
    pub fn events(&self) -> &Receiver<BatchEvent> {
        &self.events
    }

    /// Candidates not yet started are skipped; running ones finish.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn join(self) -> Result<BatchResult> {
        self.handle
            .join()
            .map_err(|payload| CompressionError::WorkerPanicked(panic_message(payload.as_ref())))?
    }
}

pub fn spawn_batch(orchestrator: BatchOrchestrator) -> Result<BatchHandle> {
    let (tx, rx) = unbounded();
    let cancel = orchestrator.cancel_token();

    let handle = thread::Builder::new()
        .name("img-compressor-batch".to_string())
        .spawn(move || {
            let mut tx = tx;
            orchestrator.run(&mut tx)
        })?;

    Ok(BatchHandle {
        events: rx,
        cancel,
        handle,
    })
}

/// Compresses every image under `input_dir` into `output_dir` and returns the
/// source paths that were compressed.
///
/// Messages go to the three callbacks, all invoked on the calling thread.
/// Only an unreadable input directory (or an invalid quality) is an error.
pub fn process<L, W, E>(
    input_dir: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    quality: u8,
    keep_originals: bool,
    on_log: L,
    on_warn: W,
    on_error: E,
) -> Result<Vec<PathBuf>>
where
    L: FnMut(&str),
    W: FnMut(&str),
    E: FnMut(&str),
{
    let config = BatchConfig::new(
        input_dir.as_ref(),
        output_dir.as_ref(),
        quality,
        keep_originals,
    )?;
    let mut sink = Callbacks::new(on_log, on_warn, on_error);
    let result = BatchOrchestrator::new(config, Logger::silent()).run(&mut sink)?;
    Ok(result.into_paths())
}
