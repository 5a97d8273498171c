// ABOUTME: Build-step descriptors handed to the external bundler
// ABOUTME: Each variant is one unit of work with the files it produces and references

use crate::copy::CopyPattern;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum BuildStep {
    /// Collect every compiled stylesheet into one file
    ExtractStyles { filename: String },

    /// Render one page template with the bundle's script and style tags
    RenderPage {
        template: PathBuf,
        filename: String,
        scripts: Vec<String>,
        styles: Vec<String>,
    },

    /// Make modules available as globals to the application code
    ProvideGlobals { bindings: BTreeMap<String, String> },

    CopyFiles { patterns: Vec<CopyPattern> },

    /// Link pages to a hosted font stylesheet
    LinkRemoteFonts {
        families: Vec<String>,
        stylesheet_url: String,
        local: bool,
    },

    /// Fetch font files and generate a local stylesheet for them
    DownloadFonts {
        families: Vec<String>,
        formats: Vec<String>,
        font_dir: String,
        stylesheet: String,
        local: bool,
    },

    /// Add already-built assets to every rendered page
    IncludeAssets { assets: Vec<String>, append: bool },

    DefineConstants { constants: BTreeMap<String, Value> },

    /// Limit the highlighter's grammar directory to the allow-listed languages
    RestrictHighlightLanguages {
        directory: String,
        allow: String,
        languages: Vec<String>,
    },

    Minify {
        comments: bool,
        beautify: bool,
        ie8: bool,
    },

    BundleAnalysis,
}

impl BuildStep {
    pub fn kind(&self) -> &'static str {
        match self {
            BuildStep::ExtractStyles { .. } => "extract-styles",
            BuildStep::RenderPage { .. } => "render-page",
            BuildStep::ProvideGlobals { .. } => "provide-globals",
            BuildStep::CopyFiles { .. } => "copy-files",
            BuildStep::LinkRemoteFonts { .. } => "link-remote-fonts",
            BuildStep::DownloadFonts { .. } => "download-fonts",
            BuildStep::IncludeAssets { .. } => "include-assets",
            BuildStep::DefineConstants { .. } => "define-constants",
            BuildStep::RestrictHighlightLanguages { .. } => "restrict-highlight-languages",
            BuildStep::Minify { .. } => "minify",
            BuildStep::BundleAnalysis => "bundle-analysis",
        }
    }

    /// Output files this step writes, relative to the output directory
    pub fn produces(&self) -> Vec<&str> {
        match self {
            BuildStep::ExtractStyles { filename } => vec![filename.as_str()],
            BuildStep::RenderPage { filename, .. } => vec![filename.as_str()],
            BuildStep::CopyFiles { patterns } => {
                patterns.iter().filter_map(|p| p.produces()).collect()
            }
            BuildStep::DownloadFonts { stylesheet, .. } => vec![stylesheet.as_str()],
            _ => Vec::new(),
        }
    }

    /// Output files this step expects to exist or links to
    pub fn references(&self) -> Vec<&str> {
        match self {
            BuildStep::RenderPage {
                scripts, styles, ..
            } => scripts
                .iter()
                .chain(styles.iter())
                .map(String::as_str)
                .collect(),
            BuildStep::IncludeAssets { assets, .. } => assets.iter().map(String::as_str).collect(),
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for BuildStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind())?;
        match self {
            BuildStep::ExtractStyles { filename } => write!(f, " -> {}", filename),
            BuildStep::RenderPage {
                template, filename, ..
            } => write!(f, " {} -> {}", template.display(), filename),
            BuildStep::ProvideGlobals { bindings } => {
                let names: Vec<&str> = bindings.keys().map(String::as_str).collect();
                write!(f, " {}", names.join(", "))
            }
            BuildStep::CopyFiles { patterns } => write!(f, " ({} pattern(s))", patterns.len()),
            BuildStep::LinkRemoteFonts { stylesheet_url, .. } => write!(f, " {}", stylesheet_url),
            BuildStep::DownloadFonts {
                families,
                stylesheet,
                ..
            } => write!(f, " {} -> {}", families.join(", "), stylesheet),
            BuildStep::IncludeAssets { assets, append } => write!(
                f,
                " {} ({})",
                assets.join(", "),
                if *append { "append" } else { "prepend" }
            ),
            BuildStep::DefineConstants { constants } => {
                let names: Vec<&str> = constants.keys().map(String::as_str).collect();
                write!(f, " {}", names.join(", "))
            }
            BuildStep::RestrictHighlightLanguages { languages, .. } => {
                write!(f, " {}", languages.join(", "))
            }
            BuildStep::Minify { .. } | BuildStep::BundleAnalysis => Ok(()),
        }
    }
}
