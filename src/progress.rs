use crate::constants::{
    ERROR_PREFIX, PROGRESS_BAR_CHARS, PROGRESS_BAR_TEMPLATE, SUCCESS_PREFIX, WARNING_PREFIX,
};
use crate::events::{BatchEvent, EventSink};
use crate::logger::Logger;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Terminal presentation of a batch: a progress bar that advances once per
/// candidate, with log lines printed above it.
pub struct ConsoleReporter {
    bar: ProgressBar,
    logger: Logger,
}

impl ConsoleReporter {
    pub fn new(logger: Logger) -> Self {
        let bar = ProgressBar::hidden();
        if !logger.is_quiet() {
            bar.set_draw_target(ProgressDrawTarget::stderr());
        }
        bar.set_style(
            ProgressStyle::default_bar()
                .template(PROGRESS_BAR_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars(PROGRESS_BAR_CHARS),
        );
        Self { bar, logger }
    }

    pub fn progress_bar(&self) -> &ProgressBar {
        &self.bar
    }

    /// Prints above the bar, or through the logger when the bar is not drawn
    /// (quiet mode, or stderr is not a terminal).
    fn print(&self, prefix: &str, message: String, fallback: fn(&Logger, String)) {
        if self.bar.is_hidden() {
            fallback(&self.logger, message);
        } else {
            self.bar.println(format!("{} {}", prefix, message));
        }
    }
}

impl EventSink for ConsoleReporter {
    fn emit(&mut self, event: BatchEvent) {
        match event {
            BatchEvent::Started { total } => {
                self.bar.set_length(total as u64);
                self.bar.set_position(0);
            }
            BatchEvent::Progress { message } => {
                if self.logger.is_verbose() {
                    self.print(SUCCESS_PREFIX, message, |l, m| l.verbose(m));
                }
            }
            BatchEvent::Skip { message, .. } => {
                self.print(WARNING_PREFIX, message, |l, m| l.warn(m));
            }
            BatchEvent::Error { message, .. } => {
                self.print(ERROR_PREFIX, message, |l, m| l.error(m));
            }
            BatchEvent::Outcome(outcome) => {
                let name = outcome
                    .source()
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                self.bar.set_message(name);
                self.bar.inc(1);
            }
            BatchEvent::Finished { .. } => {
                self.bar
                    .finish_with_message(format!("{} Batch compression complete", SUCCESS_PREFIX));
            }
        }
    }
}
