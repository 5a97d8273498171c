// ABOUTME: Plugin assembly for the slidepack build
// ABOUTME: Turns the flags record and discovered pages into the ordered bundler plan

use crate::config::{BuildMode, Flags};
use crate::entries::PageSet;
use crate::errors::{BuildError, Result};
use crate::layout::Layout;
use crate::steps::BuildStep;
use log::debug;
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;

/// Grammar directory of the syntax highlighter inside its package
pub const HIGHLIGHT_GRAMMAR_DIR: &str = "highlight.js/lib/languages";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryPoint {
    pub name: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputSpec {
    pub path: PathBuf,
    pub filename: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DevServer {
    pub content_base: PathBuf,
    pub port: u16,
}

/// Loader chain applied to `.css` and `.scss` modules before extraction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyleRule {
    pub test: String,
    pub loaders: Vec<String>,
    pub fallback: String,
}

impl Default for StyleRule {
    fn default() -> Self {
        Self {
            test: r"\.(s*)css$".to_string(),
            loaders: vec!["css-loader".to_string(), "sass-loader".to_string()],
            fallback: "style-loader".to_string(),
        }
    }
}

/// Everything the bundler runtime needs for one build
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildPlan {
    pub mode: BuildMode,
    pub context: PathBuf,
    pub entry: EntryPoint,
    pub output: OutputSpec,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dev_server: Option<DevServer>,
    pub style_rule: StyleRule,
    pub steps: Vec<BuildStep>,
}

impl BuildPlan {
    pub fn kinds(&self) -> Vec<&'static str> {
        self.steps.iter().map(BuildStep::kind).collect()
    }

    /// Index of the first step of `kind`
    pub fn position(&self, kind: &str) -> Option<usize> {
        self.steps.iter().position(|step| step.kind() == kind)
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.position(kind).is_some()
    }

    pub fn check_ordering(&self) -> Result<()> {
        check_step_order(&self.steps)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Numbered, human-readable listing of the plan
    pub fn describe(&self) -> String {
        let mut text = format!(
            "mode: {}\ncontext: {}\nentry: {} ({})\noutput: {}/{}\n",
            self.mode,
            self.context.display(),
            self.entry.name,
            self.entry.path.display(),
            self.output.path.display(),
            self.output.filename,
        );
        if let Some(server) = &self.dev_server {
            text.push_str(&format!(
                "dev server: {} on port {}\n",
                server.content_base.display(),
                server.port
            ));
        }
        text.push_str("steps:\n");
        for (i, step) in self.steps.iter().enumerate() {
            text.push_str(&format!("{:>3}. {}\n", i + 1, step));
        }
        text
    }
}

/// Assemble the build plan. Pure: identical inputs give identical plans.
pub fn assemble(flags: &Flags, pages: &PageSet, layout: &Layout) -> Result<BuildPlan> {
    let plan = BuildPlan {
        mode: flags.mode.clone(),
        context: layout.context.clone(),
        entry: EntryPoint {
            name: layout.entry_name.clone(),
            path: layout.entry.clone(),
        },
        output: OutputSpec {
            path: layout.output.clone(),
            filename: layout.script_bundle.clone(),
        },
        dev_server: flags.dev.then(|| DevServer {
            content_base: layout.output.clone(),
            port: layout.dev_server_port,
        }),
        style_rule: StyleRule::default(),
        steps: assemble_steps(flags, pages, layout)?,
    };

    plan.check_ordering()?;
    Ok(plan)
}

/// Ordered build steps for `pages` under `flags`
pub fn assemble_steps(flags: &Flags, pages: &PageSet, layout: &Layout) -> Result<Vec<BuildStep>> {
    let mut steps = vec![BuildStep::ExtractStyles {
        filename: layout.style_bundle.clone(),
    }];

    for page in pages {
        steps.push(BuildStep::RenderPage {
            template: page.source.clone(),
            filename: page.filename.clone(),
            scripts: vec![layout.script_bundle.clone()],
            styles: vec![layout.style_bundle.clone()],
        });
    }

    steps.push(BuildStep::ProvideGlobals {
        bindings: layout.provided_globals.clone(),
    });

    steps.push(BuildStep::CopyFiles {
        patterns: layout.copy_patterns(),
    });

    steps.push(font_step(flags, layout)?);

    steps.push(BuildStep::DefineConstants {
        constants: flags.global_constants(),
    });

    steps.push(BuildStep::RestrictHighlightLanguages {
        directory: HIGHLIGHT_GRAMMAR_DIR.to_string(),
        allow: format!("^./({})$", flags.highlight_languages.join("|")),
        languages: flags.highlight_languages.clone(),
    });

    // dev-server bundles are never minified
    if flags.minify && !flags.dev {
        steps.push(BuildStep::Minify {
            comments: false,
            beautify: false,
            ie8: false,
        });
    }

    if flags.bundle_analysis && !flags.dev {
        steps.push(BuildStep::BundleAnalysis);
    }

    debug!("Assembled {} build step(s)", steps.len());
    Ok(steps)
}

/// Pick the one font step for this build.
///
/// Web exports link the hosted stylesheet; otherwise fonts are downloaded
/// when requested, or the stylesheet from a previous build is appended to
/// the rendered pages.
fn font_step(flags: &Flags, layout: &Layout) -> Result<BuildStep> {
    let fonts = &layout.fonts;
    let step = if flags.for_web {
        BuildStep::LinkRemoteFonts {
            families: fonts.families.clone(),
            stylesheet_url: fonts.remote_stylesheet_url()?.to_string(),
            local: false,
        }
    } else if flags.fonts_download {
        BuildStep::DownloadFonts {
            families: fonts.families.clone(),
            formats: fonts.formats.clone(),
            font_dir: fonts.dir.clone(),
            stylesheet: fonts.stylesheet.clone(),
            local: true,
        }
    } else {
        BuildStep::IncludeAssets {
            assets: vec![fonts.stylesheet.clone()],
            append: true,
        }
    };
    Ok(step)
}

/// Verify that every file produced inside the plan is produced before it
/// is referenced, and that asset inclusion follows every rendered page.
pub fn check_step_order(steps: &[BuildStep]) -> Result<()> {
    let mut producers: HashMap<&str, usize> = HashMap::new();
    for (i, step) in steps.iter().enumerate() {
        for file in step.produces() {
            producers.entry(file).or_insert(i);
        }
    }

    for (i, step) in steps.iter().enumerate() {
        for file in step.references() {
            if let Some(&producer) = producers.get(file) {
                if producer >= i {
                    return Err(BuildError::StepOrder {
                        file: file.to_string(),
                        referrer: step.kind(),
                        referrer_index: i,
                        producer: steps[producer].kind(),
                        producer_index: producer,
                    });
                }
            }
        }
    }

    let last_render = steps
        .iter()
        .rposition(|step| matches!(step, BuildStep::RenderPage { .. }));
    if let Some(last_render) = last_render {
        for (i, step) in steps.iter().enumerate() {
            if matches!(step, BuildStep::IncludeAssets { .. }) && i < last_render {
                return Err(BuildError::StepOrder {
                    file: step.references().join(", "),
                    referrer: step.kind(),
                    referrer_index: i,
                    producer: steps[last_render].kind(),
                    producer_index: last_render,
                });
            }
        }
    }

    Ok(())
}
