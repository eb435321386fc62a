//! Automated evaluation engine
//!
//! Orchestrates AI scoring runs: the dedup tracker prevents overlapping runs,
//! the registry dispatches to a per-module strategy, and the pipeline loads
//! criteria/attachments, invokes the strategy per contestant, and persists
//! results into the AI channel of the score store.

pub mod evaluators;
pub mod pipeline;
pub mod registry;
pub mod tracker;
pub mod vision;

pub use registry::{EvaluatorRegistry, ItemEvaluation, ModuleEvaluator};
pub use tracker::{EvaluationSlot, EvaluationTracker};
pub use vision::VisionClient;
