use super::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn create_source_dir(files: &[&str]) -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    for file in files {
        fs::write(dir.path().join(file), "<section></section>").expect("Failed to write file");
    }
    dir
}

fn flags_for(mode: &str, overrides: Overrides) -> Flags {
    Flags::resolve(BuildMode::parse(mode), &overrides, &Layout::default())
}

fn pages_in(dir: &Path) -> PageSet {
    discover_pages(dir).expect("Failed to discover pages")
}

#[test]
fn test_minify_for_every_mode_except_web() {
    for mode in ["dev-server", "production", "production-server-rendering", "", "staging"] {
        assert!(flags_for(mode, Overrides::default()).minify, "mode {:?}", mode);
    }
    assert!(!flags_for("production-web", Overrides::default()).minify);
}

#[test]
fn test_modes_are_mutually_exclusive() {
    for mode in ["dev-server", "production", "production-web", "production-server-rendering"] {
        let flags = flags_for(mode, Overrides::default());
        let active = [flags.dev, flags.production, flags.for_web, flags.server_rendering]
            .iter()
            .filter(|on| **on)
            .count();
        assert_eq!(active, 1, "mode {:?}", mode);
    }
}

#[test]
fn test_unrecognized_mode_defaults() {
    let flags = flags_for("staging", Overrides::default());
    assert_eq!(flags.mode, BuildMode::Unrecognized("staging".to_string()));
    assert!(!flags.dev);
    assert!(!flags.production);
    assert!(!flags.for_web);
    assert!(!flags.server_rendering);
    assert!(flags.minify);
    assert!(!flags.fonts_download);
    assert!(!flags.bundle_analysis);
}

#[test]
fn test_discovery_counts_only_templates_in_order() {
    let dir = create_source_dir(&[
        "zeta.html",
        "alpha.html",
        "main.js",
        "style.scss",
        "mid.htm",
        "README.md",
    ]);
    let pages = pages_in(dir.path());
    assert_eq!(pages.len(), 3);
    assert_eq!(pages.names(), vec!["alpha", "mid", "zeta"]);
}

#[test]
fn test_discovery_is_restartable() {
    let dir = create_source_dir(&["b.html", "a.html"]);
    let pages = pages_in(dir.path());
    let first: Vec<_> = pages.iter().map(|p| p.name.clone()).collect();
    let second: Vec<_> = (&pages).into_iter().map(|p| p.name.clone()).collect();
    assert_eq!(first, second);
}

#[test]
fn test_discovery_missing_directory_fails() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let missing = dir.path().join("nope");
    match discover_pages(&missing) {
        Err(BuildError::PathNotFound(path)) => assert_eq!(path, missing),
        other => panic!("expected PathNotFound, got {:?}", other),
    }
}

#[test]
fn test_discovery_on_file_fails() {
    let dir = create_source_dir(&["index.html"]);
    let file = dir.path().join("index.html");
    assert!(matches!(
        discover_pages(&file),
        Err(BuildError::NotADirectory(_))
    ));
}

#[test]
fn test_discovery_rejects_colliding_names() {
    let dir = create_source_dir(&["index.html", "index.htm"]);
    match discover_pages(dir.path()) {
        Err(BuildError::DuplicatePage { name, .. }) => assert_eq!(name, "index"),
        other => panic!("expected DuplicatePage, got {:?}", other),
    }
}

#[test]
fn test_empty_directory_yields_no_pages() {
    let dir = create_source_dir(&[]);
    assert!(pages_in(dir.path()).is_empty());
}

#[test]
fn test_web_export_links_remote_fonts() {
    let dir = create_source_dir(&["index.html"]);
    let overrides = Overrides {
        fonts_download: Some(true),
        ..Overrides::default()
    };
    let flags = flags_for("production-web", overrides);
    let plan = assemble(&flags, &pages_in(dir.path()), &Layout::default()).unwrap();

    assert!(plan.contains("link-remote-fonts"));
    assert!(!plan.contains("download-fonts"));
    assert!(!plan.contains("include-assets"));

    let step = &plan.steps[plan.position("link-remote-fonts").unwrap()];
    assert_eq!(serde_json::to_value(step).unwrap()["local"], false);
}

#[test]
fn test_font_download_override_outside_web() {
    let dir = create_source_dir(&["index.html"]);
    let overrides = Overrides {
        fonts_download: Some(true),
        ..Overrides::default()
    };
    let flags = flags_for("production", overrides);
    let plan = assemble(&flags, &pages_in(dir.path()), &Layout::default()).unwrap();

    assert!(plan.contains("download-fonts"));
    assert!(!plan.contains("link-remote-fonts"));
    assert!(!plan.contains("include-assets"));

    let step = &plan.steps[plan.position("download-fonts").unwrap()];
    assert_eq!(serde_json::to_value(step).unwrap()["local"], true);
}

#[test]
fn test_local_font_stylesheet_appended_after_pages() {
    let dir = create_source_dir(&["index.html", "notes.html"]);
    let flags = flags_for("production", Overrides::default());
    let plan = assemble(&flags, &pages_in(dir.path()), &Layout::default()).unwrap();

    assert!(!plan.contains("link-remote-fonts"));
    assert!(!plan.contains("download-fonts"));

    let include = plan.position("include-assets").unwrap();
    let last_render = plan
        .steps
        .iter()
        .rposition(|s| s.kind() == "render-page")
        .unwrap();
    assert!(include > last_render);
}

#[test]
fn test_style_extraction_precedes_references() {
    let dir = create_source_dir(&["a.html", "b.html", "c.html"]);
    let layout = Layout::default();
    let flags = flags_for("production", Overrides::default());
    let plan = assemble(&flags, &pages_in(dir.path()), &layout).unwrap();

    let extract = plan.position("extract-styles").unwrap();
    let first_reference = plan
        .steps
        .iter()
        .position(|s| s.references().contains(&layout.style_bundle.as_str()))
        .unwrap();
    assert!(extract < first_reference);
}

#[test]
fn test_misordered_steps_are_rejected() {
    let steps = vec![
        BuildStep::RenderPage {
            template: "index.html".into(),
            filename: "index.html".to_string(),
            scripts: vec![],
            styles: vec!["lib/css/presentation.bundle.css".to_string()],
        },
        BuildStep::ExtractStyles {
            filename: "lib/css/presentation.bundle.css".to_string(),
        },
    ];
    assert!(matches!(
        check_step_order(&steps),
        Err(BuildError::StepOrder { referrer_index: 0, producer_index: 1, .. })
    ));
}

#[test]
fn test_include_assets_before_render_is_rejected() {
    let steps = vec![
        BuildStep::IncludeAssets {
            assets: vec!["lib/css/fonts-all.css".to_string()],
            append: true,
        },
        BuildStep::RenderPage {
            template: "index.html".into(),
            filename: "index.html".to_string(),
            scripts: vec![],
            styles: vec![],
        },
    ];
    assert!(check_step_order(&steps).is_err());
}

#[test]
fn test_minify_and_analysis_inclusion() {
    let dir = create_source_dir(&["index.html"]);
    let pages = pages_in(dir.path());
    let layout = Layout::default();
    let analysis = Overrides {
        bundle_analysis: Some(true),
        ..Overrides::default()
    };

    let web = assemble(&flags_for("production-web", analysis), &pages, &layout).unwrap();
    assert!(!web.contains("minify"));
    assert!(web.contains("bundle-analysis"));

    let dev = assemble(&flags_for("dev-server", analysis), &pages, &layout).unwrap();
    assert!(!dev.contains("minify"));
    assert!(!dev.contains("bundle-analysis"));

    let prod = assemble(&flags_for("production", Overrides::default()), &pages, &layout).unwrap();
    assert!(prod.contains("minify"));
    assert!(!prod.contains("bundle-analysis"));
}

#[test]
fn test_assembly_is_idempotent() {
    let dir = create_source_dir(&["index.html", "notes.html"]);
    let pages = pages_in(dir.path());
    let layout = Layout::default();
    let flags = flags_for("production-server-rendering", Overrides::default());

    let first = assemble(&flags, &pages, &layout).unwrap();
    let second = assemble(&flags, &pages, &layout).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
}

#[test]
fn test_dev_server_scenario() {
    let dir = create_source_dir(&["index.html", "notes.html"]);
    let pages = pages_in(dir.path());
    assert_eq!(pages.names(), vec!["index", "notes"]);

    let layout = Layout::default();
    let flags = flags_for("dev-server", Overrides::default());
    let plan = assemble(&flags, &pages, &layout).unwrap();

    assert_eq!(
        plan.kinds(),
        vec![
            "extract-styles",
            "render-page",
            "render-page",
            "provide-globals",
            "copy-files",
            "include-assets",
            "define-constants",
            "restrict-highlight-languages",
        ]
    );
    let server = plan.dev_server.as_ref().expect("dev server settings");
    assert_eq!(server.port, 9000);
}

#[test]
fn test_highlight_allow_list_pattern() {
    let dir = create_source_dir(&[]);
    let flags = flags_for("production", Overrides::default());
    let plan = assemble(&flags, &pages_in(dir.path()), &Layout::default()).unwrap();
    let step = &plan.steps[plan.position("restrict-highlight-languages").unwrap()];
    match step {
        BuildStep::RestrictHighlightLanguages { directory, allow, .. } => {
            assert_eq!(directory, "highlight.js/lib/languages");
            assert_eq!(allow, "^./(xml|javascript|python|bash)$");
        }
        other => panic!("unexpected step {:?}", other),
    }
}

#[test]
fn test_highlight_allow_list_matches_every_language() {
    let dir = create_source_dir(&[]);
    let layout = Layout {
        highlight_languages: vec![
            "rust".to_string(),
            "cpp".to_string(),
            "objective-c".to_string(),
            "x86_64".to_string(),
        ],
        ..Layout::default()
    };
    layout.validate().expect("Layout should be valid");
    let flags = Flags::resolve(BuildMode::Production, &Overrides::default(), &layout);
    let plan = assemble(&flags, &pages_in(dir.path()), &layout).unwrap();

    let allow = match &plan.steps[plan.position("restrict-highlight-languages").unwrap()] {
        BuildStep::RestrictHighlightLanguages { allow, .. } => allow.clone(),
        other => panic!("unexpected step {:?}", other),
    };
    let pattern = regex::Regex::new(&allow).expect("Allow-list should compile");
    for lang in &layout.highlight_languages {
        assert!(pattern.is_match(&format!("./{}", lang)), "{} should be allowed", lang);
    }
    assert!(!pattern.is_match("./python"));
    assert!(!pattern.is_match("./rust/extra"));
}

#[test]
fn test_constants_follow_mode() {
    let dir = create_source_dir(&[]);
    let flags = flags_for("production-web", Overrides::default());
    let plan = assemble(&flags, &pages_in(dir.path()), &Layout::default()).unwrap();
    let step = &plan.steps[plan.position("define-constants").unwrap()];
    match step {
        BuildStep::DefineConstants { constants } => {
            assert_eq!(constants["FOR_WEB"], serde_json::Value::Bool(true));
            assert_eq!(constants["PRODUCTION"], serde_json::Value::Bool(false));
            assert_eq!(constants["SERVER_RENDERING"], serde_json::Value::Bool(false));
        }
        other => panic!("unexpected step {:?}", other),
    }
}
