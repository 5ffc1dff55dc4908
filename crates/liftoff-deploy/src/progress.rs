//! Operator-facing progress lines.
//!
//! Every line starts with a fixed-width status indicator:
//!
//! ```text
//! [..] Provisioning resource group
//! [--] resource group 'pdf-viewer-rg' already exists
//! [ok] created container registry 'pdfvieweracr260101120000'
//! [!!] Deploy phase failed: ...
//! ```

use crate::phase::Phase;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Work started.
    Running,
    /// Work finished.
    Done,
    /// Nothing to do; the desired state already holds.
    Skipped,
    Failed,
}

impl Status {
    pub fn indicator(self) -> &'static str {
        match self {
            Self::Running => "[..]",
            Self::Done => "[ok]",
            Self::Skipped => "[--]",
            Self::Failed => "[!!]",
        }
    }

    pub fn line(self, message: &str) -> String {
        format!("{} {message}", self.indicator())
    }
}

/// Sink for pipeline progress.
pub trait Progress {
    fn update(&mut self, status: Status, message: &str);

    /// Multi-line block printed once at the end of a successful run.
    fn summary(&mut self, text: &str);

    fn phase(&mut self, phase: Phase) {
        self.update(Status::Running, phase.title());
    }
}

/// Prints progress to stdout.
#[derive(Debug, Default)]
pub struct ConsoleProgress;

impl Progress for ConsoleProgress {
    fn update(&mut self, status: Status, message: &str) {
        println!("{}", status.line(message));
    }

    fn summary(&mut self, text: &str) {
        println!();
        println!("{text}");
    }
}

/// Collects progress lines in memory.
impl Progress for Vec<String> {
    fn update(&mut self, status: Status, message: &str) {
        self.push(status.line(message));
    }

    fn summary(&mut self, text: &str) {
        self.extend(text.lines().map(str::to_owned));
    }
}
