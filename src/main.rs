// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use thesis_viewer::search::{SearchQuery, highlight};
use thesis_viewer::utils::logging::{
    format_error, format_info, format_score, format_segments, format_step, format_success,
    format_warning,
};
use thesis_viewer::{
    Config, FragmentDumpExtractor, IngestionPipeline, IngestionReport, JsonExporter,
    ProgressTracker, ScoreGrade, Searcher, SourceDocument, ThesisStore,
};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "thesis_viewer")]
#[command(version = "0.1.0")]
#[command(about = "Turns a thesis PDF into a navigable, searchable section tree", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    /// Ingest this PDF before running the command instead of using the demo thesis
    #[arg(long, global = true, value_name = "PDF", requires = "fragments")]
    document: Option<PathBuf>,

    /// Fragment dump produced by the text extractor for the ingested PDF
    #[arg(long, global = true, value_name = "JSON")]
    fragments: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the section tree
    Outline,

    /// Show one section; the first section when no id is given
    Show { id: Option<String> },

    /// Full-text search over every section
    Search {
        query: String,

        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Research validation results for a section
    Validation { id: String },

    /// Version history for a section
    Versions { id: String },

    /// Ingest a PDF using its fragment dump and print the resulting outline
    Ingest {
        file: PathBuf,

        /// Also export the ingested tree to this directory
        #[arg(long, value_name = "DIR")]
        export: Option<PathBuf>,

        #[arg(short, long)]
        pretty: bool,
    },

    /// Export the active thesis as JSON
    Export {
        #[arg(short, long, default_value = "./exports")]
        output: PathBuf,

        #[arg(short, long)]
        pretty: bool,

        #[arg(long)]
        section: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    thesis_viewer::utils::logging::init_logger(cli.color, cli.verbose);
    colored::control::set_override(cli.color);

    info!("Loading configuration from: {}", cli.config.display());

    let config = if cli.config.exists() {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using default configuration",
            cli.config.display()
        );
        Config::default_config()
    };

    let store = ThesisStore::seeded().context("Failed to load the demo thesis")?;

    if let Some((document, fragments)) = startup_ingestion(&cli)? {
        ingest_document(&config, &store, document, fragments, cli.color).await?;
    }

    match cli.command {
        Commands::Outline => cmd_outline(&store),
        Commands::Show { id } => cmd_show(&store, id.as_deref())?,
        Commands::Search { query, limit } => cmd_search(&config, &store, &query, limit),
        Commands::Validation { id } => cmd_validation(&store, &id),
        Commands::Versions { id } => cmd_versions(&store, &id),
        Commands::Ingest {
            file,
            export,
            pretty,
        } => {
            let fragments = cli
                .fragments
                .as_deref()
                .context("ingest needs --fragments <JSON>")?;
            cmd_ingest(&config, &store, &file, fragments, export, pretty, cli.color).await?;
        }
        Commands::Export {
            output,
            pretty,
            section,
        } => cmd_export(&store, output, pretty, section.as_deref())?,
    }

    Ok(())
}

/// The `--document/--fragments` pair to ingest before running the command.
///
/// `ingest` names its PDF positionally, so there `--fragments` stands alone.
fn startup_ingestion(cli: &Cli) -> Result<Option<(&Path, &Path)>> {
    if matches!(cli.command, Commands::Ingest { .. }) {
        return Ok(None);
    }

    match (cli.document.as_deref(), cli.fragments.as_deref()) {
        (Some(document), Some(fragments)) => Ok(Some((document, fragments))),
        (None, Some(fragments)) => anyhow::bail!(
            "--fragments {} needs --document <PDF> outside of `ingest`",
            fragments.display()
        ),
        _ => Ok(None),
    }
}

async fn ingest_document(
    config: &Config,
    store: &ThesisStore,
    document: &Path,
    fragments: &Path,
    color: bool,
) -> Result<IngestionReport> {
    println!("{}", format_step(1, 3, "Loading fragment dump"));
    let extractor = FragmentDumpExtractor::from_json_file(fragments)
        .with_context(|| format!("Failed to load fragments from {}", fragments.display()))?;

    println!("{}", format_step(2, 3, "Reading source document"));
    let source = SourceDocument::from_path(document).await?;

    println!("{}", format_step(3, 3, "Building section tree"));
    let progress = Arc::new(ProgressTracker::with_color(0, color));
    let pipeline = IngestionPipeline::new(config.clone(), extractor)
        .context("Failed to set up ingestion")?
        .with_progress(progress);

    let cancel = async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    let report = match pipeline.ingest_until(source, cancel).await {
        Ok(report) => report,
        Err(e) if e.is_input_rejection() => {
            eprintln!("{}", format_error(&e.to_string()));
            return Err(e.into());
        }
        Err(e) => return Err(anyhow::Error::new(e).context("Ingestion failed")),
    };

    store.replace(report.tree.clone());

    if report.tree.is_empty() {
        println!(
            "{}",
            format_warning(&format!("No text found in {}", report.source_name))
        );
    } else {
        println!(
            "{}",
            format_success(&format!(
                "Ingested {}: {} sections from {} pages in {} ms",
                report.source_name,
                report.stats.sections_built,
                report.stats.pages_extracted,
                report.stats.duration_ms
            ))
        );
    }
    println!(
        "{}",
        format_info(&format!(
            "{:.1} pages/s, {:.1}% of {} fragments carried text",
            report.stats.pages_per_second(),
            report.stats.usable_fragment_rate(),
            report.stats.fragments_read
        ))
    );

    Ok(report)
}

async fn cmd_ingest(
    config: &Config,
    store: &ThesisStore,
    file: &Path,
    fragments: &Path,
    export: Option<PathBuf>,
    pretty: bool,
    color: bool,
) -> Result<()> {
    let start_time = Instant::now();
    let report = ingest_document(config, store, file, fragments, color).await?;

    info!(
        "Run {} for {} (sha256 {}) finished in {:.2}s",
        report.run_id,
        report.source_name,
        report.source_sha256,
        start_time.elapsed().as_secs_f64()
    );

    cmd_outline(store);

    if let Some(output) = export {
        cmd_export(store, output, pretty, None)?;
    }

    Ok(())
}

fn cmd_outline(store: &ThesisStore) {
    let tree = store.current();

    if tree.is_empty() {
        println!("{}", format_info("The document has no sections"));
        return;
    }

    for entry in tree.outline() {
        let indent = "  ".repeat(entry.depth);
        let title = if entry.depth == 0 {
            entry.section.title.bold()
        } else {
            entry.section.title.normal()
        };
        println!("{}{} {}", indent, title, format!("[{}]", entry.section.id).dimmed());
    }
}

fn cmd_show(store: &ThesisStore, id: Option<&str>) -> Result<()> {
    if let Some(id) = id
        && store.section(id).is_none()
    {
        println!(
            "{}",
            format_warning(&format!("No section {}, showing the first section", id))
        );
    }

    let section = store
        .active_section(id)
        .context("The document has no sections")?;

    println!("\n{}", section.title.bold().underline());
    let mut meta = format!(
        "Version {} | Last updated {}",
        section.version,
        section.last_updated.format("%Y-%m-%d")
    );
    if let Some(score) = section.credibility_score {
        meta.push_str(&format!(" | Credibility {:.0}%", score * 100.0));
    }
    println!("{}\n", meta.dimmed());
    println!("{}", section.content);

    if !section.citations.is_empty() {
        println!("\n{}", "Citations".bold());
        for citation in &section.citations {
            let status = if citation.verified {
                "verified".green()
            } else {
                "unverified".yellow()
            };
            println!(
                "  \"{}\" - {}, {} ({})",
                citation.text, citation.source, citation.date, status
            );
            if let Some(url) = &citation.url {
                println!("    {}", url.dimmed());
            }
        }
    }

    if !section.is_leaf() {
        println!("\n{}", "Subsections".bold());
        for child in &section.subsections {
            println!("  - {} {}", child.title, format!("[{}]", child.id).dimmed());
        }
    }

    Ok(())
}

fn cmd_search(config: &Config, store: &ThesisStore, query: &str, limit: Option<usize>) {
    let searcher = Searcher::new(config.search.clone());
    let outcome = store.search(&searcher, query);

    if outcome.is_cleared() {
        println!("{}", format_info("Empty query, nothing to search for"));
        return;
    }

    if outcome.results.is_empty() {
        println!("\nNo results found for query: \"{}\"\n", outcome.normalized_query);
        return;
    }

    println!("\nSearch Results for: \"{}\"\n", outcome.normalized_query);
    println!("Found {} result(s)\n", outcome.results.len());
    println!("{}", "=".repeat(80));

    let tokens = SearchQuery::parse(query);
    let shown = limit.unwrap_or(outcome.results.len());

    for (idx, result) in outcome.results.iter().take(shown).enumerate() {
        println!(
            "\n{}. {} (Score: {})",
            idx + 1,
            result.section_title.bold(),
            result.relevance_score
        );
        println!("   Section: {}", result.section_id);
        println!(
            "   {}",
            format_segments(&highlight(&result.match_text, tokens.tokens()))
        );
    }

    println!("\n{}", "=".repeat(80));
}

fn cmd_validation(store: &ThesisStore, id: &str) {
    let Some(result) = store.validation_for(id) else {
        println!(
            "{}",
            format_info(&format!("No validation data for section {}", id))
        );
        return;
    };

    println!("\n{}\n", format!("Research Validation: {}", id).bold());
    for (label, score) in result.scores() {
        println!("  {}", format_score(label, score));
    }

    let overall = ScoreGrade::from_score(result.credibility_score);
    println!("\n  Overall: {}", overall.as_str());

    if !result.has_issues() {
        println!("\n{}", format_success("No issues found"));
        return;
    }

    for fallacy in &result.logical_fallacies {
        println!("{}", format_warning(&format!("Logical fallacy: {}", fallacy)));
    }
    for inconsistency in &result.inconsistencies {
        println!("{}", format_warning(&format!("Inconsistency: {}", inconsistency)));
    }
}

fn cmd_versions(store: &ThesisStore, id: &str) {
    let changes = store.versions_for(id);

    if changes.is_empty() {
        println!(
            "{}",
            format_info(&format!("No version history for section {}", id))
        );
        return;
    }

    println!("\n{}\n", format!("Version History: {}", id).bold());
    for change in changes {
        println!(
            "{} {} by {} at {}",
            format!("[{}]", change.change_type.as_str()).cyan(),
            change.id,
            change.author,
            change.timestamp.format("%Y-%m-%d %H:%M")
        );
        if !change.previous_content.is_empty() {
            println!("  {} {}", "-".red(), change.previous_content.red());
        }
        if !change.new_content.is_empty() {
            println!("  {} {}", "+".green(), change.new_content.green());
        }
    }
}

fn cmd_export(
    store: &ThesisStore,
    output: PathBuf,
    pretty: bool,
    section: Option<&str>,
) -> Result<()> {
    info!("Initializing JSON export");

    let exporter = JsonExporter::new(output, pretty)?;
    let tree = store.current();

    if let Some(id) = section {
        let path = exporter.export_section(&tree, id)?;
        println!(
            "{}",
            format_success(&format!("Exported section {} to {}", id, path.display()))
        );
    } else {
        let manifest = exporter.export_tree(&tree)?;
        println!(
            "{}",
            format_success(&format!(
                "Exported {} sections to {}",
                manifest.total_sections,
                exporter.output_dir().display()
            ))
        );
    }

    Ok(())
}
