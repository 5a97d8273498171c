// ABOUTME: Entry discovery for the slidepack build
// ABOUTME: Scans the source directory for HTML page templates, one page per file

use crate::errors::{BuildError, Result};
use crate::utils::validate_directory_exists;
use log::{debug, info};
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// File extensions that identify a page template (ASCII case-insensitive)
pub const TEMPLATE_EXTENSIONS: &[&str] = &["html", "htm"];

/// One page template and the HTML file it renders to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageDescriptor {
    pub source: PathBuf,
    /// File stem of the template
    pub name: String,
    /// Output file, relative to the output directory
    pub filename: String,
}

impl PageDescriptor {
    /// Build a descriptor when `path` names a template file
    pub fn from_path(path: &Path) -> Result<Option<Self>> {
        if !is_template(path) {
            return Ok(None);
        }
        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| {
                BuildError::Validation(format!("Template name is not valid UTF-8: {:?}", path))
            })?
            .to_string();

        Ok(Some(Self {
            source: path.to_path_buf(),
            filename: format!("{}.html", name),
            name,
        }))
    }
}

/// `.html` alone has no stem, so it names no page and is not a template
fn is_template(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            TEMPLATE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

/// Discovered pages, ordered by template file name.
///
/// The set is a snapshot of one directory scan and can be iterated any
/// number of times.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PageSet {
    pages: Vec<PageDescriptor>,
}

impl PageSet {
    /// Sort the descriptors and reject two templates rendering to the same file
    pub fn from_descriptors(mut pages: Vec<PageDescriptor>) -> Result<Self> {
        pages.sort_by(|a, b| a.source.file_name().cmp(&b.source.file_name()));

        let mut seen: HashMap<&str, &Path> = HashMap::new();
        for page in &pages {
            if let Some(first) = seen.insert(page.name.as_str(), page.source.as_path()) {
                return Err(BuildError::DuplicatePage {
                    name: page.name.clone(),
                    first: first.to_path_buf(),
                    second: page.source.clone(),
                });
            }
        }

        Ok(Self { pages })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PageDescriptor> {
        self.pages.iter()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.pages.iter().map(|p| p.name.as_str()).collect()
    }
}

impl<'a> IntoIterator for &'a PageSet {
    type Item = &'a PageDescriptor;
    type IntoIter = std::slice::Iter<'a, PageDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.pages.iter()
    }
}

/// Scan `dir` (not its subdirectories) for page templates
pub fn discover_pages(dir: &Path) -> Result<PageSet> {
    validate_directory_exists(dir)?;

    let entries = fs::read_dir(dir).map_err(|source| BuildError::DirectoryRead {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut pages = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| BuildError::DirectoryRead {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if !path.is_file() {
            debug!("Skipping non-file entry: {:?}", path);
            continue;
        }
        match PageDescriptor::from_path(&path)? {
            Some(page) => {
                debug!("Found page template: {:?}", path);
                pages.push(page);
            }
            None => debug!("Skipping non-template file: {:?}", path),
        }
    }

    let pages = PageSet::from_descriptors(pages)?;
    info!("Discovered {} page template(s) in {:?}", pages.len(), dir);
    Ok(pages)
}
