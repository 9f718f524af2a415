pub mod aggregate;
pub mod limits;
pub mod orchestrator;
pub mod progress;

pub use aggregate::{AggregateResult, BatchOutcome, CategoryCounts, ExtractionResult};
pub use limits::Limits;
pub use orchestrator::{BatchOptions, BatchOrchestrator};
pub use progress::BatchProgress;
