//! Crawl orchestration components

pub mod coordinator;
pub mod report;
pub mod step;
pub mod urls;

pub use coordinator::Coordinator;
pub use report::{load_statistics, print_statistics, CrawlReport, StepCounts};
pub use step::StepState;
pub use urls::UrlBuilder;
