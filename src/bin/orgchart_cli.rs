//! Org chart command line interface
//!
//! Inspects an org snapshot (people, surveys, responses) the way the chart
//! control would see it.
//!
//! # Usage
//!
//! ```bash
//! # Full forest, or one viewer's team
//! orgchart_cli --snapshot org.json tree
//! orgchart_cli --snapshot org.json tree --viewer "{0F8FAD5B-D9CB-469F-A165-70867728950E}"
//!
//! # Access decision for one card
//! orgchart_cli --snapshot org.json access --viewer 2 --target 3 --survey s1
//!
//! # Notification badges for a viewer
//! orgchart_cli --snapshot org.json -o json pending --viewer 2
//!
//! # Data-quality report
//! orgchart_cli --snapshot org.json validate
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use orgchart::{
    EngineConfig, HierarchyFilter, OrgChartEngine, OrgSnapshot, Person, SnapshotFingerprint,
    SurveyStage, TeamDepth,
};

#[derive(Parser)]
#[command(name = "orgchart_cli")]
#[command(version = "0.1.0")]
#[command(about = "Inspect org chart hierarchies and survey access decisions")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Snapshot JSON with `people`, `surveys` and `responses`
    #[arg(long, short, global = true, env = "ORGCHART_SNAPSHOT")]
    snapshot: Option<PathBuf>,

    /// Engine config YAML (defaults to ORGCHART_* environment variables)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'o', global = true, default_value = "text", value_enum)]
    format: OutputFormat,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the forest, or the viewer's team when --viewer is given
    Tree {
        /// External identity token or person id of the viewer
        #[arg(long)]
        viewer: Option<String>,

        /// Show the whole chart even when a viewer is given
        #[arg(long)]
        all: bool,

        /// Override the configured team depth: direct or full
        #[arg(long)]
        depth: Option<TeamDepth>,
    },

    /// Decide the viewer's access to a target person's survey response
    Access {
        #[arg(long)]
        viewer: String,

        /// Person id of the card being rendered
        #[arg(long)]
        target: String,

        /// Survey id (defaults to the first survey)
        #[arg(long)]
        survey: Option<String>,
    },

    /// Pending task counts per survey for a viewer
    Pending {
        #[arg(long)]
        viewer: String,
    },

    /// Report duplicate ids, dangling managers and manager cycles
    Validate,
}

// =============================================================================
// MAIN
// =============================================================================

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,orgchart=debug".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let format = cli.format;

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if format == OutputFormat::Json {
                println!("{}", serde_json::json!({ "error": format!("{:#}", e) }));
            } else {
                eprintln!("error: {:#}", e);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::from_env().context("reading ORGCHART_* environment")?,
    };
    let snapshot = load_snapshot(cli.snapshot.as_ref())?;
    let fingerprint = SnapshotFingerprint::compute(&snapshot, None);
    tracing::info!(
        people = snapshot.people.len(),
        surveys = snapshot.surveys.len(),
        responses = snapshot.responses.len(),
        fingerprint = fingerprint.short(),
        "snapshot loaded"
    );

    match cli.command {
        Commands::Tree { viewer, all, depth } => {
            let config = match depth {
                Some(depth) => config.with_team_depth(depth),
                None => config,
            };
            let engine = OrgChartEngine::new(config)?;
            cmd_tree(&engine, &snapshot, viewer, all, cli.format)
        }
        Commands::Access {
            viewer,
            target,
            survey,
        } => {
            let engine = OrgChartEngine::new(config)?;
            cmd_access(&engine, &snapshot, &viewer, &target, survey.as_deref(), cli.format)
        }
        Commands::Pending { viewer } => {
            let engine = OrgChartEngine::new(config)?;
            cmd_pending(&engine, &snapshot, &viewer, cli.format)
        }
        Commands::Validate => {
            let engine = OrgChartEngine::new(config)?;
            cmd_validate(&engine, &snapshot, cli.format)
        }
    }
}

fn load_snapshot(path: Option<&PathBuf>) -> anyhow::Result<OrgSnapshot> {
    let path = path.ok_or_else(|| anyhow!("no snapshot given (use --snapshot or ORGCHART_SNAPSHOT)"))?;
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading snapshot {}", path.display()))?;
    OrgSnapshot::from_json(&raw).with_context(|| format!("parsing snapshot {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

fn cmd_tree(
    engine: &OrgChartEngine,
    snapshot: &OrgSnapshot,
    viewer: Option<String>,
    all: bool,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let filter = HierarchyFilter {
        current_user_id: viewer,
        show_only_team: all.then_some(false),
    };
    let view = engine.view(&snapshot.people, &filter);

    match format {
        OutputFormat::Json => print_json(&view),
        OutputFormat::Text => {
            if view.visible.is_empty() {
                println!("(no people visible)");
            }
            for root in &view.visible {
                print_subtree(root);
            }
            let stats = view.hierarchy.stats;
            println!(
                "\n{} people, {} roots ({} orphaned, {} re-rooted), {} duplicate ids skipped, depth {}",
                stats.people,
                stats.roots,
                stats.orphans,
                stats.rerooted,
                stats.duplicates,
                stats.max_depth
            );
            Ok(())
        }
    }
}

fn print_subtree(person: &Person) {
    let position = person
        .position
        .as_deref()
        .map(|p| format!(" ({})", p))
        .unwrap_or_default();
    println!(
        "{}{} [{}]{}",
        "  ".repeat(person.level as usize),
        person.name,
        person.id,
        position
    );
    for child in &person.children {
        print_subtree(child);
    }
}

fn cmd_access(
    engine: &OrgChartEngine,
    snapshot: &OrgSnapshot,
    viewer: &str,
    target: &str,
    survey_id: Option<&str>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let survey = match survey_id {
        Some(id) => snapshot
            .surveys
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| anyhow!("survey '{}' not found", id))?,
        None => orgchart::survey::first_survey(&snapshot.surveys)
            .ok_or_else(|| anyhow!("snapshot has no surveys"))?,
    };
    let person = snapshot
        .people
        .iter()
        .find(|p| p.id == target)
        .ok_or_else(|| anyhow!("person '{}' not found", target))?;

    let ctx = engine.user_context(&snapshot.people, viewer);
    let result = engine.decide_for(snapshot, &ctx, survey, person);

    match format {
        OutputFormat::Json => print_json(&result),
        OutputFormat::Text => {
            let stage = SurveyStage::effective(SurveyStage::detect(&survey.name));
            println!("survey:  {} ({})", survey.name, stage);
            println!("target:  {} [{}]", person.name, person.id);
            println!("access:  {}", result.access_level);
            println!("reason:  {}", result.reason);
            if let Some(disabled) = &result.disabled_reason {
                println!("blocked: {}", disabled);
            }
            Ok(())
        }
    }
}

fn cmd_pending(
    engine: &OrgChartEngine,
    snapshot: &OrgSnapshot,
    viewer: &str,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let ctx = engine.user_context(&snapshot.people, viewer);
    let pending = engine.pending_by_survey(&ctx, snapshot);

    match format {
        OutputFormat::Json => print_json(&pending),
        OutputFormat::Text => {
            for survey in &snapshot.surveys {
                let count = pending.get(&survey.id).copied().unwrap_or(0);
                println!("{:>4}  {}", count, survey.name);
            }
            Ok(())
        }
    }
}

fn cmd_validate(
    engine: &OrgChartEngine,
    snapshot: &OrgSnapshot,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let report = engine.validate(&snapshot.people);

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Text => {
            for issue in &report.errors {
                println!("error   {}: {}", issue.code(), issue);
            }
            for issue in &report.warnings {
                println!("warning {}: {}", issue.code(), issue);
            }
            println!(
                "{} errors, {} warnings",
                report.errors.len(),
                report.warnings.len()
            );
        }
    }

    if report.is_valid() {
        Ok(())
    } else {
        Err(anyhow!("snapshot has {} blocking issue(s)", report.errors.len()))
    }
}
