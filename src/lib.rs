// ABOUTME: Library module for the slidepack build-plan generator.
// ABOUTME: Resolves the build mode, discovers slide pages and assembles bundler steps.

// Reexport modules
pub mod assembly;
pub mod config;
pub mod copy;
pub mod entries;
pub mod errors;
pub mod layout;
pub mod project;
pub mod steps;
pub mod utils;

// Reexport common types and functions
pub use assembly::{BuildPlan, assemble, assemble_steps, check_step_order};
pub use config::{BuildMode, Flags, Overrides};
pub use copy::{CopyPattern, CopySource, ResolvedCopy};
pub use entries::{PageDescriptor, PageSet, discover_pages};
pub use errors::{BuildError, Result};
pub use layout::{FontConfig, Layout};
pub use project::Project;
pub use steps::BuildStep;

#[cfg(test)]
mod tests;
