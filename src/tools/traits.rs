/// Trait definitions for benchmarked aligners
///
/// Every aligner, whatever its command line looks like, is driven through
/// [`MsaTool`] so the orchestrator never needs tool-specific code.
use crate::benchmark::types::RunResult;
use crate::Result;
use std::path::Path;

/// Common interface for multiple sequence alignment tools
pub trait MsaTool: Send + Sync {
    /// Name used as the tool's key in the report
    fn name(&self) -> &str;

    /// Align `unaligned`, then score the estimate against `reference`
    fn run(&self, reference: &Path, unaligned: &Path) -> Result<RunResult>;

    /// Check if the tool's executable can be found
    fn is_available(&self) -> bool {
        true
    }
}
