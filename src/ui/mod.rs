//! Progress reporting for long-running commands
//!
//! Provides a simple API for displaying application state:
//! - Current phase (Fetching catalog, Downloading, Ingesting)
//! - Progress (current/total with a label)
//! - Log lines printed above the bar

use indicatif::{ProgressBar, ProgressStyle};

/// Application phases shown on the progress bar
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    FetchingCatalog,
    Downloading,
    Ingesting,
    Complete,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::FetchingCatalog => write!(f, "Fetching sector list"),
            Phase::Downloading => write!(f, "Downloading sectors"),
            Phase::Ingesting => write!(f, "Populating database"),
            Phase::Complete => write!(f, "Complete"),
        }
    }
}

/// Trait for UI implementations - allows both a terminal bar and silent/test modes
pub trait Ui {
    fn set_phase(&mut self, phase: Phase);
    fn set_progress(&mut self, current: u64, total: u64, label: impl Into<String>);
    fn log(&mut self, message: impl Into<String>);
}

/// Terminal progress bar
pub struct ConsoleUi {
    bar: ProgressBar,
}

impl ConsoleUi {
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        if let Ok(style) =
            ProgressStyle::default_bar().template("{prefix:22} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            bar.set_style(style.progress_chars("=>-"));
        }
        Self { bar }
    }

    pub fn finish(self, summary: &str) {
        self.bar.finish_and_clear();
        println!("{}", summary);
    }
}

impl Default for ConsoleUi {
    fn default() -> Self {
        Self::new()
    }
}

impl Ui for ConsoleUi {
    fn set_phase(&mut self, phase: Phase) {
        self.bar.set_prefix(phase.to_string());
    }

    fn set_progress(&mut self, current: u64, total: u64, label: impl Into<String>) {
        self.bar.set_length(total);
        self.bar.set_position(current);
        self.bar.set_message(label.into());
    }

    fn log(&mut self, message: impl Into<String>) {
        self.bar.println(message.into());
    }
}

/// Silent UI implementation for testing and non-interactive use
#[derive(Default)]
pub struct SilentUi {
    pub phases: Vec<Phase>,
    pub messages: Vec<String>,
}

impl SilentUi {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Ui for SilentUi {
    fn set_phase(&mut self, phase: Phase) {
        self.phases.push(phase);
    }
    fn set_progress(&mut self, _current: u64, _total: u64, _label: impl Into<String>) {}
    fn log(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }
}
