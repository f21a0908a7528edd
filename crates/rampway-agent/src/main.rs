//! rampway: analyte to pathway enrichment explorer.
//! Entry point for the command-line binary.

mod config;

use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use comfy_table::{ContentArrangement, Table};
use rampway_common::{AnalyteKind, DiseaseSpec, ExportFormat};
use rampway_ingestion::{FailureReason, PathwayPipeline, PathwayReport, QueryOutcome, QueryProgress, QueryRun};
use rampway_kg::{build_network, filter_profile, DiseaseCatalog, OmicsNetwork, OmicsRole};
use rampway_report::{export_all, format_score, Report};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::{Config, Overrides, DEFAULT_CONFIG_FILE};

#[derive(Parser)]
#[command(name = "rampway", version, about = "Analyte to pathway enrichment explorer")]
struct Cli {
    /// Configuration file
    #[arg(long, global = true, env = "RAMPWAY_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Print machine-readable JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Protein,
    Metabolite,
}

impl From<KindArg> for AnalyteKind {
    fn from(k: KindArg) -> Self {
        match k {
            KindArg::Protein => AnalyteKind::Protein,
            KindArg::Metabolite => AnalyteKind::Metabolite,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve an analyte, fetch its pathways, score and export them
    Analyze {
        /// UniProt / HMDB accession or a common name
        input: String,

        #[arg(long, short, value_enum, default_value = "protein")]
        kind: KindArg,

        /// Use built-in demonstration pathways instead of the RaMP service
        #[arg(long)]
        offline: bool,

        /// Export formats, comma separated (csv, txt, pdf)
        #[arg(long, value_delimiter = ',')]
        export: Vec<String>,

        /// Skip writing report files
        #[arg(long, conflicts_with = "export")]
        no_export: bool,

        /// Output directory for reports
        #[arg(long)]
        out: Option<PathBuf>,

        /// Pathway endpoint, repeatable; replaces the configured list
        #[arg(long)]
        endpoint: Vec<String>,

        /// Per-endpoint timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,
    },
    /// Browse the disease multi-omics profiles
    Disease {
        /// Disease to show; lists the catalog when omitted
        name: Option<String>,

        /// Keep only entries containing this text (case-insensitive)
        #[arg(long, default_value = "")]
        search: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("rampway=info,warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = Config::load(&cli.config)?;

    match cli.command {
        Commands::Analyze { input, kind, offline, export, no_export, out, endpoint, timeout } => {
            let formats = export
                .iter()
                .map(|f| ExportFormat::from_str(f))
                .collect::<Result<Vec<_>, _>>()?;
            config.apply(Overrides {
                offline,
                endpoints: endpoint,
                timeout_secs: timeout,
                formats,
                output_dir: out.map(|p| p.to_string_lossy().into_owned()),
            });
            let ok = run_analyze(&config, &input, kind.into(), !no_export, cli.json).await?;
            if !ok {
                std::process::exit(1);
            }
        }
        Commands::Disease { name, search } => run_disease(&config, name.as_deref(), &search, cli.json)?,
    }

    Ok(())
}

// ── analyze ──────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct AnalyzeOutput<'a> {
    #[serde(flatten)]
    run: &'a QueryRun,
    exported: Vec<PathBuf>,
}

/// A query with no pathways is an empty result, not a failure of the tool.
fn succeeded(outcome: &QueryOutcome) -> bool {
    match outcome {
        QueryOutcome::Ready(_) => true,
        QueryOutcome::Failed { reason, .. } => *reason == FailureReason::EmptyResult,
    }
}

/// Returns whether the process should exit successfully.
async fn run_analyze(
    config: &Config,
    input: &str,
    kind: AnalyteKind,
    export: bool,
    json: bool,
) -> anyhow::Result<bool> {
    let pipeline = if config.offline {
        PathwayPipeline::offline(&config.pipeline)?
    } else {
        PathwayPipeline::from_config(&config.pipeline)?
    };
    info!(source = pipeline.source_name(), "Pipeline ready");

    let (tx, rx) = broadcast::channel::<QueryProgress>(16);
    let printer = tokio::spawn(print_progress(rx, !json));
    let run = pipeline.run(input, kind, Some(&tx)).await;
    drop(tx);
    printer.await.context("progress printer panicked")?;

    let exported = match (&run.outcome, export) {
        (QueryOutcome::Ready(report), true) => write_reports(config, report)?,
        _ => Vec::new(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&AnalyzeOutput { run: &run, exported })?);
        return Ok(succeeded(&run.outcome));
    }

    match &run.outcome {
        QueryOutcome::Ready(report) => {
            print_report(report);
            println!("{}", run.outcome.message());
            for path in &exported {
                println!("Saved {}", path.display());
            }
            Ok(true)
        }
        QueryOutcome::Failed { reason: FailureReason::EmptyResult, .. } => {
            println!("{}", run.outcome.message());
            Ok(true)
        }
        QueryOutcome::Failed { .. } => {
            eprintln!("Error: {}", run.outcome.message());
            Ok(false)
        }
    }
}

async fn print_progress(mut rx: broadcast::Receiver<QueryProgress>, visible: bool) {
    loop {
        match rx.recv().await {
            Ok(ev) if visible => eprintln!("  [{:?}] {}", ev.state, ev.message),
            Ok(_) => {}
            Err(broadcast::error::RecvError::Lagged(n)) => warn!(skipped = n, "Progress events dropped"),
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

fn write_reports(config: &Config, report: &PathwayReport) -> anyhow::Result<Vec<PathBuf>> {
    let export = &config.pipeline.export;
    let doc = Report::new(&report.identifier, &report.enriched);
    let paths = export_all(&doc, Path::new(&export.output_dir), &export.formats)
        .with_context(|| format!("Failed to export reports to {}", export.output_dir))?;
    Ok(paths)
}

fn print_report(report: &PathwayReport) {
    let id = &report.identifier;
    println!("{} → {} ({:?})", id.raw_input(), id.query_key(), id.source());

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Pathway", "Source", "Analytes", "Score"]);
    for row in &report.enriched {
        table.add_row(vec![
            row.pathway.name.clone(),
            row.pathway.source_database.clone(),
            row.pathway.associated_analytes.len().to_string(),
            format_score(row.score),
        ]);
    }
    println!("{table}");
    println!(
        "Graph: {} nodes, {} edges",
        report.graph.node_count(),
        report.graph.edge_count()
    );
}

// ── disease ──────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct DiseaseOutput<'a> {
    profile: &'a DiseaseSpec,
    network: &'a OmicsNetwork,
    /// Unit-circle position per network node, same order as `network.nodes`.
    layout: Vec<(f64, f64)>,
}

impl<'a> DiseaseOutput<'a> {
    fn new(profile: &'a DiseaseSpec, network: &'a OmicsNetwork) -> Self {
        Self { profile, network, layout: network.circular_layout() }
    }
}

fn run_disease(config: &Config, name: Option<&str>, search: &str, json: bool) -> anyhow::Result<()> {
    let catalog = DiseaseCatalog::builtin().with_extra(config.pipeline.diseases.clone());

    let Some(name) = name else {
        let profiles = catalog
            .names()
            .into_iter()
            .map(|n| catalog.get(n))
            .collect::<Result<Vec<_>, _>>()?;
        if json {
            println!("{}", serde_json::to_string_pretty(&profiles)?);
            return Ok(());
        }
        let mut table = Table::new();
        table.set_header(vec!["Disease", "Proteins", "Metabolites", "Pathways"]);
        for p in profiles {
            table.add_row(vec![
                p.name.clone(),
                p.proteins.len().to_string(),
                p.metabolites.len().to_string(),
                p.pathways.len().to_string(),
            ]);
        }
        println!("{table}");
        return Ok(());
    };

    let profile = filter_profile(catalog.get(name)?, search);
    let network = build_network(&profile);

    if json {
        println!("{}", serde_json::to_string_pretty(&DiseaseOutput::new(&profile, &network))?);
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Type", "Entity"]);
    for node in &network.nodes {
        let role = match node.role {
            OmicsRole::Protein => "Protein",
            OmicsRole::Metabolite => "Metabolite",
            OmicsRole::Pathway => "Pathway",
        };
        table.add_row(vec![role.to_string(), node.label.clone()]);
    }
    println!("{}", profile.name);
    println!("{table}");
    println!(
        "Network: {} proteins, {} metabolites, {} pathways, {} edges",
        network.count(OmicsRole::Protein),
        network.count(OmicsRole::Metabolite),
        network.count(OmicsRole::Pathway),
        network.edges.len()
    );
    Ok(())
}
