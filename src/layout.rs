// ABOUTME: Project layout for the slidepack build
// ABOUTME: Loads slidepack.toml and supplies defaults for paths, fonts and runtime assets

use crate::copy::CopyPattern;
use crate::errors::{BuildError, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

pub const CONFIG_FILE_NAME: &str = "slidepack.toml";

/// Paths and build inputs of a presentation project.
///
/// Every field is optional in `slidepack.toml`; missing fields take the
/// defaults below. Relative paths are resolved against the project root by
/// [`Layout::rooted`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Layout {
    /// Source directory holding the page templates
    pub context: PathBuf,
    pub entry_name: String,
    /// Entry script, relative to `context`
    pub entry: PathBuf,
    pub output: PathBuf,
    pub script_bundle: String,
    pub style_bundle: String,
    /// Copied verbatim into the output, relative to `context`
    pub content_dir: String,
    pub dev_server_port: u16,
    pub highlight_languages: Vec<String>,
    pub fontawesome_cdn: String,
    pub fonts: FontConfig,
    pub runtime_assets: Vec<CopyPattern>,
    /// Identifier -> module made available on the global scope
    pub provided_globals: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FontConfig {
    pub families: Vec<String>,
    pub formats: Vec<String>,
    pub dir: String,
    pub stylesheet: String,
    /// Hosted stylesheet endpoint used for web exports
    pub remote_base: String,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            families: vec!["Source Sans Pro".to_string(), "Passion One".to_string()],
            formats: ["eot", "woff", "woff2", "ttf"]
                .iter()
                .map(|f| f.to_string())
                .collect(),
            dir: "lib/fonts/".to_string(),
            stylesheet: "lib/css/fonts-all.css".to_string(),
            remote_base: "https://fonts.googleapis.com/css".to_string(),
        }
    }
}

impl FontConfig {
    /// URL of the hosted stylesheet serving every configured family
    pub fn remote_stylesheet_url(&self) -> Result<Url> {
        let mut url = Url::parse(&self.remote_base)?;
        url.query_pairs_mut()
            .append_pair("family", &self.families.join("|"));
        Ok(url)
    }
}

impl Default for Layout {
    fn default() -> Self {
        let mut provided_globals = BTreeMap::new();
        provided_globals.insert("$".to_string(), "jquery".to_string());
        provided_globals.insert("jQuery".to_string(), "jquery".to_string());
        provided_globals.insert("Reveal".to_string(), "reveal.js".to_string());

        Self {
            context: PathBuf::from("src"),
            entry_name: "app".to_string(),
            entry: PathBuf::from("scripts/main.js"),
            output: PathBuf::from("build"),
            script_bundle: "lib/js/presentation.bundle.js".to_string(),
            style_bundle: "lib/css/presentation.bundle.css".to_string(),
            content_dir: "content".to_string(),
            dev_server_port: 9000,
            highlight_languages: ["xml", "javascript", "python", "bash"]
                .iter()
                .map(|l| l.to_string())
                .collect(),
            fontawesome_cdn: "https://use.fontawesome.com/releases/v5.0.6/css/all.css"
                .to_string(),
            fonts: FontConfig::default(),
            runtime_assets: vec![
                // speaker notes window
                CopyPattern::file(
                    "../node_modules/reveal.js/plugin/notes/notes.html",
                    "lib/js/reveal.js-dependencies/notes.html",
                ),
                // pdf export styles
                CopyPattern::glob(
                    "../node_modules/reveal.js/css/print/*.css",
                    "lib/css/[name].css",
                ),
                // menu styles patched for inline svg
                CopyPattern::file("styles/menu-inline-svg.css", "lib/css/menu.css"),
            ],
            provided_globals,
        }
    }
}

impl Layout {
    /// Load a layout from a TOML file and validate it
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(BuildError::PathNotFound(path.to_path_buf()));
        }
        let text = fs::read_to_string(path)?;
        let layout: Layout = toml::from_str(&text)?;
        layout.validate()?;
        info!("Loaded layout from {:?}", path);
        Ok(layout)
    }

    /// Load `slidepack.toml` from `root` when present, defaults otherwise
    pub fn discover(root: &Path) -> Result<Self> {
        let candidate = root.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    /// Resolve `context` and `output` against the project root
    pub fn rooted(mut self, root: &Path) -> Self {
        self.context = root.join(&self.context);
        self.output = root.join(&self.output);
        self
    }

    /// Runtime assets followed by the content directory, copied verbatim
    pub fn copy_patterns(&self) -> Vec<CopyPattern> {
        let content = self.content_dir.trim_end_matches('/');
        let mut patterns = self.runtime_assets.clone();
        patterns.push(CopyPattern::dir(content, &format!("{}/", content)));
        patterns
    }

    pub fn validate(&self) -> Result<()> {
        if self.highlight_languages.is_empty() {
            return Err(BuildError::Validation(
                "highlight_languages must name at least one language".to_string(),
            ));
        }
        if let Some(bad) = self
            .highlight_languages
            .iter()
            .find(|lang| !is_language_name(lang))
        {
            return Err(BuildError::Validation(format!(
                "Invalid highlight language name: {:?}",
                bad
            )));
        }
        if self.script_bundle.is_empty() || self.style_bundle.is_empty() {
            return Err(BuildError::Validation(
                "Bundle filenames must not be empty".to_string(),
            ));
        }
        if self.dev_server_port == 0 {
            return Err(BuildError::Validation(
                "dev_server_port must be non-zero".to_string(),
            ));
        }
        if self.fonts.families.is_empty() {
            return Err(BuildError::Validation(
                "fonts.families must name at least one family".to_string(),
            ));
        }
        Url::parse(&self.fontawesome_cdn)?;
        self.fonts.remote_stylesheet_url()?;
        Ok(())
    }
}

fn is_language_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-'))
}
