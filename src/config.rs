// ABOUTME: Environment resolution for the slidepack build
// ABOUTME: Maps the build-mode variable and override toggles to an immutable flags record

use crate::layout::Layout;
use crate::utils::parse_bool_flag;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::env;
use std::fmt;

/// Primary variable selecting the build mode
pub const MODE_VAR: &str = "SLIDEPACK_ENV";
/// Read when `MODE_VAR` is unset, matching what the bundler toolchain reads
pub const FALLBACK_MODE_VAR: &str = "NODE_ENV";

pub const FONTS_DOWNLOAD_VAR: &str = "SLIDEPACK_FONTS_DOWNLOAD";
pub const FONTAWESOME_DOWNLOAD_VAR: &str = "SLIDEPACK_FONTAWESOME_DOWNLOAD";
pub const BUNDLE_ANALYSIS_VAR: &str = "SLIDEPACK_BUNDLE_ANALYSIS";

/// The build mode selected by the environment. Exactly one is active per build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildMode {
    DevServer,
    Production,
    ProductionWeb,
    ProductionServerRendering,
    /// Any other value, including an unset variable (stored as "")
    Unrecognized(String),
}

impl BuildMode {
    pub fn parse(value: &str) -> Self {
        match value {
            "dev-server" => BuildMode::DevServer,
            "production" => BuildMode::Production,
            "production-web" => BuildMode::ProductionWeb,
            "production-server-rendering" => BuildMode::ProductionServerRendering,
            other => BuildMode::Unrecognized(other.to_string()),
        }
    }

    /// Read the mode from `SLIDEPACK_ENV`, then `NODE_ENV`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = lookup(MODE_VAR)
            .or_else(|| lookup(FALLBACK_MODE_VAR))
            .unwrap_or_default();
        Self::parse(value.trim())
    }

    pub fn as_str(&self) -> &str {
        match self {
            BuildMode::DevServer => "dev-server",
            BuildMode::Production => "production",
            BuildMode::ProductionWeb => "production-web",
            BuildMode::ProductionServerRendering => "production-server-rendering",
            BuildMode::Unrecognized(value) => value,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, BuildMode::Unrecognized(_))
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildMode::Unrecognized(value) if value.is_empty() => f.write_str("<unset>"),
            mode => f.write_str(mode.as_str()),
        }
    }
}

impl Serialize for BuildMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Optional toggles layered over the mode-derived defaults
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Overrides {
    pub fonts_download: Option<bool>,
    pub fontawesome_download: Option<bool>,
    pub bundle_analysis: Option<bool>,
}

impl Overrides {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            fonts_download: lookup(FONTS_DOWNLOAD_VAR).map(|v| parse_bool_flag(&v)),
            fontawesome_download: lookup(FONTAWESOME_DOWNLOAD_VAR).map(|v| parse_bool_flag(&v)),
            bundle_analysis: lookup(BUNDLE_ANALYSIS_VAR).map(|v| parse_bool_flag(&v)),
        }
    }

    /// Combine two override sets; values set in `other` win
    pub fn merge(self, other: Overrides) -> Overrides {
        Overrides {
            fonts_download: other.fonts_download.or(self.fonts_download),
            fontawesome_download: other.fontawesome_download.or(self.fontawesome_download),
            bundle_analysis: other.bundle_analysis.or(self.bundle_analysis),
        }
    }
}

/// Immutable flags record computed once per build
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flags {
    pub mode: BuildMode,
    pub dev: bool,
    pub production: bool,
    pub for_web: bool,
    pub server_rendering: bool,
    pub minify: bool,
    pub fonts_download: bool,
    /// Reported by `slidepack env` only; no build step reads it
    pub fontawesome_download: bool,
    pub bundle_analysis: bool,
    pub highlight_languages: Vec<String>,
    pub fontawesome_cdn: String,
}

impl Flags {
    /// Resolve the flags for `mode`.
    ///
    /// An unrecognized mode enables none of the mode switches: nothing is
    /// linked to hosted resources, nothing is pre-rendered, and the bundle is
    /// still minified.
    pub fn resolve(mode: BuildMode, overrides: &Overrides, layout: &Layout) -> Self {
        let dev = mode == BuildMode::DevServer;
        let production = mode == BuildMode::Production;
        let for_web = mode == BuildMode::ProductionWeb;
        let server_rendering = mode == BuildMode::ProductionServerRendering;

        Self {
            mode,
            dev,
            production,
            for_web,
            server_rendering,
            minify: !for_web,
            fonts_download: overrides.fonts_download.unwrap_or(false),
            fontawesome_download: overrides.fontawesome_download.unwrap_or(true),
            bundle_analysis: overrides.bundle_analysis.unwrap_or(false),
            highlight_languages: layout.highlight_languages.clone(),
            fontawesome_cdn: layout.fontawesome_cdn.clone(),
        }
    }

    /// Human-readable banner for production modes
    pub fn summary(&self) -> Option<String> {
        let banner = match self.mode {
            BuildMode::Production => "Production build.",
            BuildMode::ProductionWeb => {
                "Production build for the web. Linking Font Awesome and MathJax to web resources."
            }
            BuildMode::ProductionServerRendering => {
                "Production build with server rendering. Font Awesome and MathJax are pre-rendered on the server."
            }
            BuildMode::DevServer | BuildMode::Unrecognized(_) => return None,
        };
        Some(format!("{} Minification: {}.", banner, self.minify))
    }

    /// Named constants injected into the application bundle
    pub fn global_constants(&self) -> BTreeMap<String, Value> {
        // The application indexes languages as an object, not an array
        let languages: Map<String, Value> = self
            .highlight_languages
            .iter()
            .enumerate()
            .map(|(i, lang)| (i.to_string(), Value::String(lang.clone())))
            .collect();

        let mut constants = BTreeMap::new();
        constants.insert("HIGHLIGHT_LANGUAGES".to_string(), Value::Object(languages));
        constants.insert("PRODUCTION".to_string(), Value::Bool(self.production));
        constants.insert("FOR_WEB".to_string(), Value::Bool(self.for_web));
        constants.insert("SERVER_RENDERING".to_string(), Value::Bool(self.server_rendering));
        constants.insert(
            "FONTAWESOME_CDN".to_string(),
            Value::String(self.fontawesome_cdn.clone()),
        );
        constants.insert("FONTS_DOWNLOAD".to_string(), Value::Bool(self.fonts_download));
        constants
    }
}
