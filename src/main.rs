use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use build_exporter::args::BuildArgs;
use build_exporter::backend::CommandBackend;
use build_exporter::cli::{run_build_session, SessionOptions};
use build_exporter::config::{self, Config};
use build_exporter::domain::Platform;
use build_exporter::fastlane::{self, ScaffoldOptions};
use build_exporter::resolver;
use build_exporter::session::EnvironmentSnapshot;
use build_exporter::settings::{FileProjectStore, ProjectConfigStore};
use build_exporter::{logging, ui, BuildExporterError};

#[derive(Parser)]
#[command(
    name = "build-exporter",
    version,
    about = "Stamp release versions and export Android/iOS builds"
)]
struct Cli {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Project root (defaults to the current directory)")]
    project: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Log session progress to stderr")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Stamp the version and export the active platform
    Build(BuildArgs),

    /// Create the fastlane directory layout for a platform
    InitFastlane {
        #[arg(value_enum)]
        platform: Platform,
    },

    /// Print the persisted version fields and build environment
    Show,
}

struct Workspace {
    config: Config,
    cwd: PathBuf,
    project_root: PathBuf,
}

impl Workspace {
    fn settings_path(&self) -> PathBuf {
        self.project_root.join(&self.config.project.settings_file)
    }

    fn open_store(&self) -> build_exporter::Result<FileProjectStore> {
        FileProjectStore::open(self.settings_path())
    }
}

fn main() {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    let code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            ui::display_error(&format!("{:#}", e));
            e.downcast_ref::<BuildExporterError>()
                .map(BuildExporterError::exit_code)
                .unwrap_or(1)
        }
    };
    std::process::exit(code);
}

fn run(cli: Cli) -> Result<i32> {
    let config = config::load_config(cli.config.as_deref())?;
    let cwd = std::env::current_dir().context("Cannot determine current directory")?;
    let project_root = match cli.project {
        Some(dir) => cwd.join(dir),
        None => cwd.clone(),
    };
    let ctx = Workspace {
        config,
        cwd,
        project_root,
    };

    match cli.command {
        Command::Build(args) => build(&ctx, args),
        Command::InitFastlane { platform } => init_fastlane(&ctx, platform),
        Command::Show => show(&ctx),
    }
}

fn build(ctx: &Workspace, args: BuildArgs) -> Result<i32> {
    let mut store = ctx.open_store()?;
    let mut backend = CommandBackend::new(&ctx.config.backend, &ctx.project_root);
    let options = SessionOptions::from_config(&ctx.config, ctx.cwd.clone(), ctx.project_root.clone());

    let current = resolver::validate_persisted(&store)
        .ok()
        .map(|state| {
            ui::formatter::format_stamp(&state.version.to_string(), &state.baseline().to_string())
        });

    if !args.dry_run && ui::is_interactive(args.batch_mode) {
        let preview_args = BuildArgs {
            dry_run: true,
            ..args.clone()
        };
        let plan = run_build_session(&preview_args, &mut store, &mut backend, &options)?;
        ui::display_stamp(current.as_deref(), &plan);
        if !ui::confirm_action("Proceed with the build?")? {
            println!("Build cancelled by user.");
            return Ok(0);
        }
    }

    ui::display_status(&format!(
        "Building {} from {}",
        store.active_platform(),
        ctx.settings_path().display()
    ));
    let outcome = run_build_session(&args, &mut store, &mut backend, &options)?;
    if outcome.dry_run {
        ui::display_stamp(current.as_deref(), &outcome);
    }
    ui::display_outcome(&outcome);

    Ok(if outcome.has_backend_errors() { 1 } else { 0 })
}

fn init_fastlane(ctx: &Workspace, platform: Platform) -> Result<i32> {
    let mut store = ctx.open_store()?;
    let mut backend = CommandBackend::new(&ctx.config.backend, &ctx.project_root);
    let options = ScaffoldOptions::from_config(&ctx.config, ctx.project_root.clone());

    ui::display_status(&format!("Initializing fastlane for {}", platform));
    let outcome = fastlane::init_fastlane(platform, &mut store, &mut backend, &options)?;

    ui::display_report(&outcome.report);
    ui::display_success(&format!(
        "Initialized fastlane for {} in {}",
        platform,
        outcome.directory.display()
    ));
    if !outcome.gitignore_updated {
        ui::display_status(".gitignore already has the fastlane rules");
    }
    ui::display_fastlane_next_steps(platform, &outcome.directory);

    Ok(if outcome.report.succeeded() { 0 } else { 1 })
}

fn show(ctx: &Workspace) -> Result<i32> {
    let store = ctx.open_store()?;
    ui::display_project_settings(
        &ctx.settings_path(),
        &store.bundle_version(),
        store.android_version_code(),
        &store.ios_build_number(),
        &EnvironmentSnapshot::capture(&store),
    );
    Ok(0)
}
