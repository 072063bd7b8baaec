pub mod batch_accumulator;
pub mod batch_executor;
pub mod executor;
pub mod metadata_client;
pub mod progress_tracker;

#[cfg(test)]
pub mod test_support;

pub use batch_accumulator::{BatchAccumulator, PendingQueue};
pub use batch_executor::{BatchExecutor, RunOutcome};
pub use executor::ImportExecutor;
pub use metadata_client::{HttpMetadataService, MetadataService};
pub use progress_tracker::ProgressTracker;
