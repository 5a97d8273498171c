// ABOUTME: Main entry point for the slidepack program.
// ABOUTME: Provides CLI interface and prints build plans assembled by the library.

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::PathBuf;

use slidepack::{BuildMode, Overrides, Project};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble the build plan for the bundler
    Plan(PlanArgs),

    /// List the page templates that will be rendered
    Entries(ProjectArgs),

    /// Print the flags and global constants for a build mode
    Env(EnvArgs),

    /// List the files the build will copy
    Copies(ProjectArgs),
}

#[derive(Args)]
struct ProjectArgs {
    /// Project root directory
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Layout file (defaults to <root>/slidepack.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args)]
struct ModeArgs {
    /// Build mode (defaults to SLIDEPACK_ENV, then NODE_ENV)
    #[arg(long)]
    mode: Option<String>,

    /// Download fonts and generate a local stylesheet (`--fonts-download=false` turns it off)
    #[arg(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true")]
    fonts_download: Option<bool>,

    /// Add a bundle-size analysis step, ignored in dev-server mode (`=false` turns it off)
    #[arg(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true")]
    bundle_analysis: Option<bool>,
}

#[derive(Args)]
struct PlanArgs {
    #[command(flatten)]
    project: ProjectArgs,

    #[command(flatten)]
    mode: ModeArgs,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Write the plan to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct EnvArgs {
    #[command(flatten)]
    project: ProjectArgs,

    #[command(flatten)]
    mode: ModeArgs,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Text,
}

impl ModeArgs {
    fn build_mode(&self) -> BuildMode {
        match &self.mode {
            Some(mode) => BuildMode::parse(mode),
            None => BuildMode::from_env(),
        }
    }

    fn overrides(&self) -> Overrides {
        let cli = Overrides {
            fonts_download: self.fonts_download,
            fontawesome_download: None,
            bundle_analysis: self.bundle_analysis,
        };
        Overrides::from_env().merge(cli)
    }
}

fn open_project(args: &ProjectArgs) -> anyhow::Result<Project> {
    Project::open(&args.root, args.config.as_deref())
        .with_context(|| format!("Failed to open project at {:?}", args.root))
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Plan(args) => {
            let project = open_project(&args.project)?;
            let flags = project.resolve_flags(args.mode.build_mode(), &args.mode.overrides());
            let plan = project.plan(&flags)?;

            let rendered = match args.format {
                Format::Json => plan.to_json()?,
                Format::Text => plan.describe(),
            };

            match args.output {
                Some(path) => {
                    slidepack::utils::ensure_parent_directory_exists(&path)?;
                    fs::write(&path, rendered)
                        .with_context(|| format!("Failed to write plan to {:?}", path))?;
                    log::info!("Plan written to {:?}", path);
                }
                None => println!("{}", rendered.trim_end()),
            }
        }
        Commands::Entries(args) => {
            let project = open_project(&args)?;
            for page in &project.pages()? {
                println!("{}\t{}", page.name, page.source.display());
            }
        }
        Commands::Env(args) => {
            let project = open_project(&args.project)?;
            let flags = project.resolve_flags(args.mode.build_mode(), &args.mode.overrides());
            let report = serde_json::json!({
                "flags": flags,
                "constants": flags.global_constants(),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Copies(args) => {
            let project = open_project(&args)?;
            for copy in project.copies()? {
                println!("{}\t{}", copy.source.display(), copy.destination.display());
            }
        }
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
