//! Pipeline kinds, the state machine, and the startup registry.

mod kind;
mod registry;
mod training;

pub use kind::{PipelineKind, UnknownPipelineKind};
pub use registry::PipelineRegistry;
pub use training::{Pipeline, TrainingPipeline};
