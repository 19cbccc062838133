//! journeyscope - CLI tool for user journey loop and duplicate analysis
//!
//! Reads journeys (`[{ "path": [...], "count": N }]` or the API envelope
//! `{ "journeys": [...] }`) from a file, stdin or the configured query API,
//! and prints them grouped into single steps, loops and duplicate runs.
//!
//! Uses XDG Base Directory specification for file locations:
//! - Config: $XDG_CONFIG_HOME/journeyscope/config.toml (~/.config/journeyscope/config.toml)
//! - Logs: $XDG_STATE_HOME/journeyscope/ (~/.local/state/journeyscope/)

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::builder::RangedU64ValueParser;
use clap::{Args as ClapArgs, Parser, Subcommand};
use journeyscope_core::analytics::JourneyStats;
use journeyscope_core::api::{JourneyQuery, SyncQueryClient};
use journeyscope_core::format::{format_count, format_share, render_journey, step_label};
use journeyscope_core::journey::{aggregate, segment_journeys};
use journeyscope_core::{logging, Config, Journey, JourneyPayload, SegmentedJourney};
use std::io::Read;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "journeyscope")]
#[command(about = "Find loops and duplicate events in user journeys")]
#[command(version)]
struct Args {
    /// Write debug logs to the state directory
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(ClapArgs, Clone)]
struct InputArgs {
    /// Journeys JSON file ("-" or omitted reads stdin)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Event names to remove from paths (adds to config `journey.excluded_events`)
    #[arg(short = 'x', long = "exclude")]
    exclude: Vec<String>,
}

#[derive(ClapArgs, Clone)]
struct OutputArgs {
    /// Output format: text (default) or json
    #[arg(short, long, default_value = "text")]
    format: String,

    /// Only show the N most common journeys
    #[arg(short, long, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    top: Option<usize>,
}

#[derive(Subcommand)]
enum Command {
    /// Group journeys into single steps, loops and duplicates
    Segment {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Filter and merge journeys, printing them as JSON
    Aggregate {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Show loop and duplicate statistics
    Stats {
        #[command(flatten)]
        input: InputArgs,

        /// Output format: text (default) or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Fetch journeys from the query API and segment them
    Fetch {
        /// Website ID (default: config `api.website_id`)
        #[arg(short, long)]
        website: Option<String>,

        /// First day included (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,

        /// Last day included (YYYY-MM-DD)
        #[arg(long)]
        end: Option<NaiveDate>,

        /// Only journeys starting at this URL path
        #[arg(long)]
        url_path: Option<String>,

        /// Path depth (default: config `journey.steps`)
        #[arg(long)]
        steps: Option<u32>,

        /// Number of journeys (default: config `journey.limit`)
        #[arg(long)]
        limit: Option<u32>,

        /// Event names to remove from paths
        #[arg(short = 'x', long = "exclude")]
        exclude: Vec<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Show the effective configuration
    Config,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::load().context("failed to load configuration")?;

    let _log_guard = if args.verbose {
        Some(logging::init(&config.logging).context("failed to initialize logging")?)
    } else {
        None
    };

    match args.command {
        Command::Segment { input, output } => cmd_segment(&config, &input, &output),
        Command::Aggregate { input } => cmd_aggregate(&config, &input),
        Command::Stats { input, format } => cmd_stats(&config, &input, &format),
        Command::Fetch {
            website,
            start,
            end,
            url_path,
            steps,
            limit,
            exclude,
            output,
        } => {
            let website_id = website
                .or_else(|| config.api.website_id.clone())
                .context("no website given; pass --website or set api.website_id")?;
            let query = JourneyQuery {
                website_id,
                start_date: start,
                end_date: end,
                url_path,
                steps: steps.unwrap_or(config.journey.steps),
                limit: limit.unwrap_or(config.journey.limit),
            };
            cmd_fetch(&config, &query, &exclude, &output)
        }
        Command::Config => cmd_config(&config),
    }
}

/// Read journeys from a file or stdin.
fn read_journeys(input: &Option<PathBuf>) -> Result<Vec<Journey>> {
    let mut content = String::new();
    match input {
        Some(path) if path.as_os_str() != "-" => {
            content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
        }
        _ => {
            std::io::stdin()
                .read_to_string(&mut content)
                .context("failed to read journeys from stdin")?;
        }
    }

    let payload: JourneyPayload =
        serde_json::from_str(&content).context("failed to parse journeys JSON")?;
    let journeys = payload.into_journeys();
    tracing::info!(journeys = journeys.len(), "Loaded journeys");
    Ok(journeys)
}

fn aggregated(config: &Config, journeys: &[Journey], exclude: &[String]) -> Vec<Journey> {
    let options = config.journey.aggregate_options(exclude.iter().cloned());
    aggregate(journeys, &options)
}

fn check_format(format: &str) -> Result<()> {
    match format {
        "text" | "json" => Ok(()),
        other => bail!("unknown format '{}', expected 'text' or 'json'", other),
    }
}

fn print_segmented(segmented: &[SegmentedJourney], output: &OutputArgs) -> Result<()> {
    let shown = match output.top {
        Some(n) => &segmented[..n.min(segmented.len())],
        None => segmented,
    };

    if output.format == "json" {
        println!("{}", serde_json::to_string_pretty(shown)?);
        return Ok(());
    }

    if shown.is_empty() {
        println!("No journeys left after filtering.");
        return Ok(());
    }

    for (idx, journey) in shown.iter().enumerate() {
        println!("Journey {}: {}", idx + 1, render_journey(journey));
    }
    println!("---");
    println!(
        "Showing {} of {} journey(s)",
        shown.len(),
        segmented.len()
    );
    Ok(())
}

fn cmd_segment(config: &Config, input: &InputArgs, output: &OutputArgs) -> Result<()> {
    check_format(&output.format)?;
    let journeys = read_journeys(&input.input)?;
    let merged = aggregated(config, &journeys, &input.exclude);
    print_segmented(&segment_journeys(&merged), output)
}

fn cmd_aggregate(config: &Config, input: &InputArgs) -> Result<()> {
    let journeys = read_journeys(&input.input)?;
    let merged = aggregated(config, &journeys, &input.exclude);
    println!("{}", serde_json::to_string_pretty(&merged)?);
    Ok(())
}

fn cmd_stats(config: &Config, input: &InputArgs, format: &str) -> Result<()> {
    check_format(format)?;
    let journeys = read_journeys(&input.input)?;
    let merged = aggregated(config, &journeys, &input.exclude);
    let stats = JourneyStats::from_segmented(&segment_journeys(&merged));

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("Journey Statistics");
    println!("==================");
    println!();
    println!("Journeys:                 {}", format_count(stats.journey_count as u64));
    println!("Sessions:                 {}", format_count(stats.session_count));
    println!("Steps:                    {}", format_count(stats.step_count as u64));
    println!("Loop segments:            {}", stats.loop_segments);
    println!("Duplicate segments:       {}", stats.duplicate_segments);
    println!(
        "Sessions with loops:      {} ({})",
        format_count(stats.sessions_with_loops),
        format_share(stats.loop_share())
    );
    println!(
        "Sessions with duplicates: {} ({})",
        format_count(stats.sessions_with_duplicates),
        format_share(stats.duplicate_share())
    );

    if !stats.top_loops.is_empty() {
        println!();
        println!("Top loops:");
        for top in &stats.top_loops {
            let pattern = top
                .pattern
                .iter()
                .map(|step| step_label(step))
                .collect::<Vec<_>>()
                .join(" → ");
            println!(
                "  {} sessions ({} journeys): {}",
                format_count(top.sessions),
                top.journeys,
                pattern
            );
        }
    }

    Ok(())
}

fn cmd_fetch(
    config: &Config,
    query: &JourneyQuery,
    exclude: &[String],
    output: &OutputArgs,
) -> Result<()> {
    check_format(&output.format)?;
    query.validate()?;

    let client = SyncQueryClient::new(config.api.clone()).context("failed to create API client")?;
    tracing::info!(url = %client.journeys_url(query), "Fetching journeys");

    let journeys = client
        .fetch_journeys(query)
        .context("failed to fetch journeys")?;
    let merged = aggregated(config, &journeys, exclude);
    print_segmented(&segment_journeys(&merged), output)
}

fn cmd_config(config: &Config) -> Result<()> {
    println!("journeyscope Configuration");
    println!("==========================");
    println!();
    println!("Config file:     {}", Config::config_path().display());
    println!(
        "Log files:       {}/{}.YYYY-MM-DD",
        Config::state_dir().display(),
        logging::LOG_FILE_PREFIX
    );
    println!();
    println!(
        "API:             {}",
        if config.api.is_ready() {
            "ready"
        } else {
            "not configured (set api.base_url)"
        }
    );
    println!(
        "API URL:         {}",
        config.api.base_url.as_deref().unwrap_or("<not set>")
    );
    println!(
        "Website ID:      {}",
        config.api.website_id.as_deref().unwrap_or("<not set>")
    );
    println!(
        "API Key:         {}",
        if config.api.api_key.is_some() {
            "<set>"
        } else {
            "<not set>"
        }
    );
    println!("Timeout:         {}s", config.api.timeout_secs);
    println!("Max Retries:     {}", config.api.max_retries);
    println!();
    println!(
        "Excluded events: {}",
        if config.journey.excluded_events.is_empty() {
            "<none>".to_string()
        } else {
            config.journey.excluded_events.join(", ")
        }
    );
    println!(
        "Dropped keys:    {}",
        config.journey.dropped_detail_keys.join(", ")
    );
    println!("Steps:           {}", config.journey.steps);
    println!("Limit:           {}", config.journey.limit);
    println!("Log level:       {}", config.logging.level);

    Ok(())
}
