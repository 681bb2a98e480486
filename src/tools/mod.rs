/// External tool integration
///
/// Aligners and the accuracy scorer are opaque external programs. This module
/// launches them, times them and turns their output into typed results.
pub mod aligners;
pub mod fastsp;
pub mod runner;
pub mod traits;

pub use aligners::{AlignerKind, InvocationTemplate, TemplateTool};
pub use fastsp::{parse_scorer_output, FastSp};
pub use runner::{run_timed, Invocation};
pub use traits::MsaTool;
