/// Step state definitions for tracking crawl progress
///
/// Every unit, session and activity moves through these states during a
/// run; the final state of each step feeds the run report.
use std::fmt;

/// The state of one crawl step (unit, session or activity)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepState {
    /// Step has not been attempted yet
    NotStarted,

    /// Page HTML was fetched
    Fetched,

    /// Structured content was extracted from the page
    Extracted,

    /// Content was written to storage
    Persisted,

    /// Step was skipped because its URL is already in storage
    AlreadyPresent,

    /// Step failed (fetch exhausted or storage error)
    Failed,
}

impl StepState {
    /// Returns true if the step ran to completion
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Persisted)
    }

    /// Returns true if the step was skipped as already crawled
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::AlreadyPresent)
    }

    /// Returns true if the step failed
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed)
    }
}

impl fmt::Display for StepState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NotStarted => "not_started",
            Self::Fetched => "fetched",
            Self::Extracted => "extracted",
            Self::Persisted => "persisted",
            Self::AlreadyPresent => "already_present",
            Self::Failed => "failed",
        };
        write!(f, "{name}")
    }
}
