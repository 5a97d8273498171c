// ABOUTME: Copy operations for auxiliary runtime assets and slide content
// ABOUTME: Describes copy patterns and expands them into concrete file pairs for dry runs

use crate::errors::{BuildError, Result};
use crate::utils::{has_glob_meta, validate_directory_exists};
use glob::Pattern;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Where a copy operation reads from, relative to the source context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CopySource {
    /// A single file
    File(String),
    /// Files matching a wildcard in the last path component
    Glob(String),
    /// Every file below a directory, copied verbatim
    Dir(String),
}

/// One copy operation. Glob destinations may use `[name]` and `[ext]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyPattern {
    #[serde(flatten)]
    pub from: CopySource,
    pub to: String,
}

/// A copy operation expanded against the filesystem
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedCopy {
    pub source: PathBuf,
    /// Relative to the output directory
    pub destination: PathBuf,
}

impl CopyPattern {
    pub fn file(from: &str, to: &str) -> Self {
        Self {
            from: CopySource::File(from.to_string()),
            to: to.to_string(),
        }
    }

    pub fn glob(from: &str, to: &str) -> Self {
        Self {
            from: CopySource::Glob(from.to_string()),
            to: to.to_string(),
        }
    }

    pub fn dir(from: &str, to: &str) -> Self {
        Self {
            from: CopySource::Dir(from.to_string()),
            to: to.to_string(),
        }
    }

    /// The output file this pattern is known to produce, when it is a single file
    pub fn produces(&self) -> Option<&str> {
        match self.from {
            CopySource::File(_) => Some(self.to.as_str()),
            CopySource::Glob(_) | CopySource::Dir(_) => None,
        }
    }

    /// Expand the pattern against `context`, sorted by destination.
    pub fn resolve(&self, context: &Path) -> Result<Vec<ResolvedCopy>> {
        let mut copies = match &self.from {
            CopySource::File(from) => {
                let source = context.join(from);
                if !source.is_file() {
                    return Err(BuildError::PathNotFound(source));
                }
                vec![ResolvedCopy {
                    source,
                    destination: PathBuf::from(&self.to),
                }]
            }
            CopySource::Glob(from) => self.resolve_glob(context, from)?,
            CopySource::Dir(from) => self.resolve_dir(context, from)?,
        };

        copies.sort_by(|a, b| a.destination.cmp(&b.destination));
        debug!("Resolved {} into {} file(s)", self, copies.len());
        Ok(copies)
    }

    fn resolve_glob(&self, context: &Path, from: &str) -> Result<Vec<ResolvedCopy>> {
        let relative = Path::new(from);
        let parent = relative.parent().unwrap_or_else(|| Path::new(""));
        if has_glob_meta(&parent.to_string_lossy()) {
            return Err(BuildError::GlobPattern {
                pattern: from.to_string(),
                message: "wildcards are only supported in the final path component".to_string(),
            });
        }

        let file_pattern = relative
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let matcher = Pattern::new(&file_pattern).map_err(|e| BuildError::GlobPattern {
            pattern: from.to_string(),
            message: e.to_string(),
        })?;

        let base = context.join(parent);
        if !base.is_dir() {
            // An absent directory matches nothing, the same as an empty one
            return Ok(Vec::new());
        }

        let mut copies = Vec::new();
        for entry in fs::read_dir(&base).map_err(|source| BuildError::DirectoryRead {
            path: base.clone(),
            source,
        })? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            if matcher.matches(&file_name) {
                let destination = expand_placeholders(&self.to, &path);
                copies.push(ResolvedCopy {
                    source: path,
                    destination,
                });
            }
        }
        Ok(copies)
    }

    fn resolve_dir(&self, context: &Path, from: &str) -> Result<Vec<ResolvedCopy>> {
        let root = context.join(from);
        validate_directory_exists(&root)?;
        let root = fs::canonicalize(&root)?;

        let pattern = format!("{}/**/*", Pattern::escape(&root.to_string_lossy()));
        let walker = glob::glob(&pattern).map_err(|e| BuildError::GlobPattern {
            pattern: pattern.clone(),
            message: e.to_string(),
        })?;

        let mut copies = Vec::new();
        for entry in walker {
            let path = entry.map_err(|e| BuildError::DirectoryRead {
                path: e.path().to_path_buf(),
                source: e.into_error(),
            })?;
            if !path.is_file() {
                continue;
            }
            let relative = path.strip_prefix(&root).unwrap_or(&path).to_path_buf();
            copies.push(ResolvedCopy {
                source: path,
                destination: Path::new(&self.to).join(relative),
            });
        }
        Ok(copies)
    }
}

fn expand_placeholders(template: &str, source: &Path) -> PathBuf {
    let name = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = source
        .extension()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    PathBuf::from(template.replace("[name]", &name).replace("[ext]", &ext))
}

impl fmt::Display for CopyPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.from {
            CopySource::File(from) => write!(f, "{} -> {}", from, self.to),
            CopySource::Glob(from) => write!(f, "{} (glob) -> {}", from, self.to),
            CopySource::Dir(from) => write!(f, "{}/** -> {}", from, self.to),
        }
    }
}
