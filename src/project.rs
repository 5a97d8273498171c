// ABOUTME: Project-level pipeline for the slidepack build
// ABOUTME: Runs environment resolution, entry discovery and plugin assembly in order

use crate::assembly::{self, BuildPlan};
use crate::config::{BuildMode, Flags, Overrides};
use crate::copy::ResolvedCopy;
use crate::entries::{self, PageSet};
use crate::errors::Result;
use crate::layout::Layout;
use log::{info, warn};
use std::path::{Path, PathBuf};

/// A presentation project rooted at one directory
pub struct Project {
    pub root: PathBuf,
    pub layout: Layout,
}

impl Project {
    /// Open the project at `root`, reading `config` or `root/slidepack.toml`
    pub fn open(root: &Path, config: Option<&Path>) -> Result<Self> {
        let layout = match config {
            Some(path) => Layout::load(path)?,
            None => Layout::discover(root)?,
        };
        Ok(Self {
            root: root.to_path_buf(),
            layout: layout.rooted(root),
        })
    }

    pub fn resolve_flags(&self, mode: BuildMode, overrides: &Overrides) -> Flags {
        let flags = Flags::resolve(mode, overrides, &self.layout);
        match flags.summary() {
            Some(summary) => info!("{}", summary),
            None if !flags.mode.is_recognized() => warn!(
                "Unrecognized build mode {}; using conservative defaults (minified, no hosted resources)",
                flags.mode
            ),
            None => info!("Mode: {}", flags.mode),
        }
        flags
    }

    pub fn pages(&self) -> Result<PageSet> {
        entries::discover_pages(&self.layout.context)
    }

    pub fn plan(&self, flags: &Flags) -> Result<BuildPlan> {
        let pages = self.pages()?;
        assembly::assemble(flags, &pages, &self.layout)
    }

    /// Expand every copy operation the build would perform
    pub fn copies(&self) -> Result<Vec<ResolvedCopy>> {
        let mut copies = Vec::new();
        for pattern in &self.layout.copy_patterns() {
            copies.extend(pattern.resolve(&self.layout.context)?);
        }
        Ok(copies)
    }
}
