pub mod infer;
pub mod io;
pub mod manifest;
pub mod runner;
pub mod spec;

pub use io::writer::{default_registry, register_all, BufferedWriter, GenerationState};
pub use manifest::Manifest;
pub use runner::{run_pipeline, RunSummary};
pub use spec::PipelineSpec;
