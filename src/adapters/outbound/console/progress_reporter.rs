use crate::ports::outbound::ProgressReporter;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use std::sync::Mutex;
use tracing::debug;

/// StderrProgressReporter adapter for reporting run events to stderr
///
/// This adapter implements the ProgressReporter port. Project tasks run
/// concurrently, so the progress bar sits behind a mutex and lines are
/// printed through `ProgressBar::suspend` to keep the bar from tearing.
pub struct StderrProgressReporter {
    progress_bar: Mutex<Option<ProgressBar>>,
    colored: bool,
}

impl StderrProgressReporter {
    pub fn new() -> Self {
        Self {
            progress_bar: Mutex::new(None),
            colored: true,
        }
    }

    /// Plain output for terminals or log collectors that do not render ANSI colors
    pub fn without_colors() -> Self {
        Self {
            colored: false,
            ..Self::new()
        }
    }

    fn bar_for(&self, total: usize) -> Option<ProgressBar> {
        let mut slot = self.progress_bar.lock().ok()?;
        if let Some(pb) = slot.as_ref() {
            if pb.length() != Some(total as u64) {
                pb.set_length(total as u64);
            }
            return Some(pb.clone());
        }

        let pb = ProgressBar::new(total as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("   {spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) - {msg}")
        {
            pb.set_style(style.progress_chars("=>-"));
        }
        *slot = Some(pb.clone());
        Some(pb)
    }

    /// Prints a line without corrupting an active progress bar
    fn print(&self, line: &str) {
        let active = self
            .progress_bar
            .lock()
            .ok()
            .and_then(|slot| slot.as_ref().cloned());
        match active {
            Some(pb) => pb.suspend(|| eprintln!("{}", line)),
            None => eprintln!("{}", line),
        }
    }

    fn finish_progress(&self) {
        if let Ok(mut slot) = self.progress_bar.lock() {
            if let Some(pb) = slot.take() {
                pb.finish_and_clear();
            }
        }
    }
}

impl Default for StderrProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for StderrProgressReporter {
    fn report(&self, message: &str) {
        debug!(target: "progress", "{}", message);
        self.print(message);
    }

    fn report_progress(&self, current: usize, total: usize, message: Option<&str>) {
        let Some(pb) = self.bar_for(total) else {
            return;
        };
        pb.set_position(current as u64);
        if let Some(msg) = message {
            pb.set_message(msg.to_string());
        }
        if total > 0 && current >= total {
            self.finish_progress();
        }
    }

    fn report_error(&self, message: &str) {
        debug!(target: "progress", error = true, "{}", message);
        if self.colored {
            self.print(&message.yellow().to_string());
        } else {
            self.print(message);
        }
    }

    fn report_completion(&self, message: &str) {
        debug!(target: "progress", "{}", message);
        self.finish_progress();
        eprintln!();
        if self.colored {
            eprintln!("{}", message.green().bold());
        } else {
            eprintln!("{}", message);
        }
    }
}
