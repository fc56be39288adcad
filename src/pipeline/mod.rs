//! Pipeline — the single entry point callers use.
//!
//! Submodules:
//! - `prompt`: Two-message conversation builder
//! - `orchestrator`: Cache lookup, provider call, and text extraction

pub mod orchestrator;
pub mod prompt;

pub use orchestrator::{run_inference, Inference};
pub use prompt::build_prompt;
