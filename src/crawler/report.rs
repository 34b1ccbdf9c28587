//! Run reporting and stored statistics
//!
//! This module provides the per-run counters printed at the end of a
//! crawl, and the stored-table statistics behind the stats command.

use crate::crawler::StepState;
use crate::storage::{ContentStore, StorageResult, TableCounts};

/// Counters for one resource kind (units, sessions or activities)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepCounts {
    pub processed: u64,
    pub skipped: u64,
    pub failed: u64,
}

impl StepCounts {
    /// Records a step's final state
    pub fn record(&mut self, state: StepState) {
        if state.is_success() {
            self.processed += 1;
        } else if state.is_skipped() {
            self.skipped += 1;
        } else if state.is_failure() {
            self.failed += 1;
        }
    }

    fn total(&self) -> u64 {
        self.processed + self.skipped + self.failed
    }
}

/// Per-run crawl summary
#[derive(Debug, Clone, Default)]
pub struct CrawlReport {
    pub units: StepCounts,
    pub sessions: StepCounts,
    pub activities: StepCounts,

    pub vocabulary_items: u64,
    pub bold_words: u64,
    pub downloads: u64,
    pub audio_files: u64,
    pub audio_skipped: u64,
}

impl CrawlReport {
    /// True when every attempted step was skipped as already present
    pub fn all_already_present(&self) -> bool {
        let steps = [self.units, self.sessions, self.activities];
        steps.iter().all(|s| s.processed == 0 && s.failed == 0)
            && steps.iter().any(|s| s.skipped > 0)
    }

    /// Prints the run summary to stdout
    pub fn print(&self) {
        println!("=== Crawl Summary ===\n");

        for (name, counts) in [
            ("Units", &self.units),
            ("Sessions", &self.sessions),
            ("Activities", &self.activities),
        ] {
            println!(
                "{}: {} processed, {} skipped, {} failed ({} total)",
                name,
                counts.processed,
                counts.skipped,
                counts.failed,
                counts.total()
            );
        }

        println!();
        println!("Vocabulary items: {}", self.vocabulary_items);
        println!("Bold keywords: {}", self.bold_words);
        println!("Download records: {}", self.downloads);
        println!(
            "Audio files: {} downloaded, {} already on disk",
            self.audio_files, self.audio_skipped
        );
    }
}

/// Loads stored row counts from the content store
pub fn load_statistics(store: &dyn ContentStore) -> StorageResult<TableCounts> {
    store.table_counts()
}

/// Prints stored statistics to stdout in a formatted manner
pub fn print_statistics(counts: &TableCounts) {
    println!("=== Stored Content ===\n");
    println!("  Levels: {}", counts.levels);
    println!("  Units: {}", counts.units);
    println!("  Sessions: {}", counts.sessions);
    println!("  Activities: {}", counts.activities);
    println!("  Vocabulary items: {}", counts.vocabulary);
    println!("  Bold keywords: {}", counts.bold_words);
    println!("  Download records: {}", counts.downloads);
}
