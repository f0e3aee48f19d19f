//! querydeck - report chart and comparison decisions from the command line

mod cli;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use querydeck_core::comparison::compute_comparison_range_at;
use querydeck_core::models::{
    ChartType, ChartTypePreferences, DurationSelection, Frequency, MergedConfig, QueryType,
};
use querydeck_core::parsers::SettingsParser;
use querydeck_core::{restore_saved_chart_type, ComparisonRequest, DateRangePreset, LoadReport, ReportView};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "querydeck",
    version,
    about = "Report chart type and comparison period resolver",
    long_about = "Decides how an analytics report is presented.\n\
                  \n\
                  Resolves the chart type a query shape renders with, computes comparison\n\
                  periods, expands date presets, and manages stored chart-type preferences.\n\
                  \n\
                  Examples:\n\
                    querydeck resolve event --breakdown country,browser\n\
                    querydeck resolve attribution --models first_touch,last_touch --json\n\
                    querydeck compare --from 2024-05-01 --to 2024-05-07 --preset previous_7_days\n\
                    querydeck compare --from 2024-05-01 --to 2024-05-07 --start 2024-03-01\n\
                    querydeck range last_month\n\
                    querydeck prefs set kpi pivot_chart --breakdown channel,source\n\
                  \n\
                  Environment Variables:\n\
                    QUERYDECK_CONFIG                 # Settings file (overrides project settings)\n\
                    QUERYDECK_CACHE_DIR              # Directory for stored chart-type preferences\n\
                    QUERYDECK_NO_COLOR               # Disable ANSI colors\n\
                    RUST_LOG                         # Log filter (default: warn)"
)]
struct Cli {
    #[command(subcommand)]
    mode: Mode,

    /// Settings file (default: <project>/.querydeck/settings.json)
    #[arg(long, env = "QUERYDECK_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Project directory holding .querydeck/settings.json (default: current directory)
    #[arg(long, global = true)]
    project: Option<PathBuf>,

    /// Directory for stored chart-type preferences
    #[arg(long, env = "QUERYDECK_CACHE_DIR", global = true)]
    cache_dir: Option<PathBuf>,

    /// Disable ANSI colors
    #[arg(long, env = "QUERYDECK_NO_COLOR", global = true)]
    no_color: bool,
}

/// Query shape flags shared by `resolve` and `prefs set`
#[derive(Args)]
struct ShapeArgs {
    /// Query type: event, funnel, attribution, campaign, kpi, profile, web
    query_type: String,
    /// Breakdown properties (event, funnel, profile, kpi)
    #[arg(long, value_delimiter = ',')]
    breakdown: Vec<String>,
    /// Campaign group-by dimensions
    #[arg(long, value_delimiter = ',')]
    group_by: Vec<String>,
    /// Attribution models
    #[arg(long, value_delimiter = ',')]
    models: Vec<String>,
}

#[derive(Subcommand)]
enum Mode {
    /// Resolve the chart type for a query shape
    Resolve {
        #[command(flatten)]
        shape: ShapeArgs,
        /// Number of events in the query (comparison support)
        #[arg(long, default_value = "1")]
        events: usize,
        /// Presentation code saved with the report (e.g. pb, pl)
        #[arg(long)]
        saved_chart: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Compute a comparison period for a primary period
    Compare {
        /// Primary period start (YYYY-MM-DD or RFC 3339)
        #[arg(long)]
        from: String,
        /// Primary period end (YYYY-MM-DD or RFC 3339)
        #[arg(long)]
        to: String,
        /// Comparison preset (previous_day, previous_7_days, ...)
        #[arg(long, conflicts_with_all = ["start", "end"])]
        preset: Option<String>,
        /// Custom comparison start date
        #[arg(long, conflicts_with = "end")]
        start: Option<String>,
        /// Custom comparison end date
        #[arg(long)]
        end: Option<String>,
        /// Primary period frequency (hour, date, week, month, quarter)
        #[arg(long)]
        frequency: Option<String>,
        /// Query type the period belongs to (campaigns have no hourly buckets)
        #[arg(long)]
        query_type: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the period of a date preset (today, last_week, last_7_days, ...)
    Range {
        preset: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Inspect or edit stored chart-type preferences
    Prefs {
        #[command(subcommand)]
        action: PrefsAction,
    },
}

#[derive(Subcommand)]
enum PrefsAction {
    /// Print stored preferences
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Store a chart type for a query shape
    Set {
        #[command(flatten)]
        shape: ShapeArgs,
        /// Chart type (bar_chart, line_chart, table, ...)
        chart: String,
        /// Number of events in the query (horizontal bars need exactly one)
        #[arg(long, default_value = "1")]
        events: usize,
    },
    /// Delete stored preferences
    Reset,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(!cli.no_color)
        .try_init();

    let config = load_config(cli.config.as_deref(), cli.project.as_deref())?;
    let cache_dir = cli
        .cache_dir
        .clone()
        .or_else(|| config.merged.cache_dir.clone())
        .or_else(|| dirs::cache_dir().map(|d| d.join("querydeck")))
        .context("Could not determine cache directory")?;
    tracing::debug!(?cache_dir, "Resolved cache directory");
    let no_color = cli.no_color;

    match cli.mode {
        Mode::Resolve {
            shape,
            events,
            saved_chart,
            json,
        } => run_resolve(&config, &cache_dir, shape, events, saved_chart, json),
        Mode::Compare {
            from,
            to,
            preset,
            start,
            end,
            frequency,
            query_type,
            json,
        } => run_compare(
            &config,
            CompareArgs {
                from,
                to,
                preset,
                start,
                end,
                frequency,
                query_type,
            },
            json,
            no_color,
        ),
        Mode::Range { preset, json } => run_range(&config, &preset, json),
        Mode::Prefs { action } => run_prefs(&config, &cache_dir, action, no_color),
    }
}

fn load_config(config: Option<&Path>, project: Option<&Path>) -> Result<MergedConfig> {
    let parser = SettingsParser::new();
    let global_path = SettingsParser::global_settings_path();
    let mut report = LoadReport::new();

    let merged = match (config, project) {
        (Some(path), _) => parser.load_with_override(global_path.as_deref(), path, &mut report),
        (None, project) => {
            let project_dir = match project {
                Some(dir) => dir.to_path_buf(),
                None => std::env::current_dir().context("Failed to read current directory")?,
            };
            let project_path = SettingsParser::project_settings_path(&project_dir);
            parser.load_merged(global_path.as_deref(), Some(&project_path), &mut report)
        }
    };
    tracing::debug!(
        global = report.global_settings_loaded,
        project = report.project_settings_loaded,
        "Loaded settings layers"
    );

    for error in report.errors.iter() {
        eprintln!("{}: {}: {}", error.severity.label(), error.source, error.message);
        if let Some(suggestion) = &error.suggestion {
            eprintln!("  hint: {}", suggestion);
        }
    }
    if report.has_fatal_errors() {
        bail!("Fatal errors while loading settings");
    }

    Ok(merged)
}

fn run_resolve(
    config: &MergedConfig,
    cache_dir: &Path,
    shape: ShapeArgs,
    events: usize,
    saved_chart: Option<String>,
    json: bool,
) -> Result<()> {
    let shape = cli::build_shape(&shape.query_type, shape.breakdown, shape.group_by, shape.models)?;
    let prefs = ChartTypePreferences::load(cache_dir, &config.chart_type_defaults());
    let prefs = restore_saved_chart_type(&shape, saved_chart.as_deref(), &prefs);

    let view = ReportView::build(&shape, &prefs, events);
    println!("{}", cli::format_report_view(&view, json));
    Ok(())
}

struct CompareArgs {
    from: String,
    to: String,
    preset: Option<String>,
    start: Option<String>,
    end: Option<String>,
    frequency: Option<String>,
    query_type: Option<String>,
}

fn run_compare(config: &MergedConfig, args: CompareArgs, json: bool, no_color: bool) -> Result<()> {
    let from = cli::parse_date(&args.from)?;
    let to = cli::parse_date(&args.to)?;
    let query_type = args
        .query_type
        .as_deref()
        .map(str::parse::<QueryType>)
        .transpose()?;
    let options = Frequency::valid_options(from, to, query_type);
    let frequency = match args.frequency {
        Some(f) => {
            let frequency = f.parse::<Frequency>()?;
            if !options.contains(&frequency) {
                bail!(
                    "Frequency '{}' is not available for this period (use one of: {})",
                    frequency,
                    join(&options)
                );
            }
            frequency
        }
        None => Frequency::default_for_period(from, to, query_type),
    };
    let primary = DurationSelection::new(from, to, frequency)?;

    let request = match (args.preset, args.start, args.end) {
        (Some(preset), _, _) => ComparisonRequest::preset(preset),
        (None, Some(start), _) => ComparisonRequest::custom_start(cli::parse_date(&start)?),
        (None, None, Some(end)) => ComparisonRequest::custom_end(cli::parse_date(&end)?),
        (None, None, None) => ComparisonRequest::preset(config.default_comparison().as_str()),
    };

    let clamp_at = config
        .clamp_comparison_to_now()
        .then(chrono::Utc::now);
    let comparison = compute_comparison_range_at(&request, &primary, clamp_at)?;

    println!(
        "{}",
        cli::format_comparison(&primary, &comparison, json, no_color)
    );
    Ok(())
}

fn run_range(config: &MergedConfig, preset: &str, json: bool) -> Result<()> {
    let preset: DateRangePreset = preset.parse()?;
    let range = preset.range_at(chrono::Utc::now(), config.week_start())?;
    println!("{}", cli::format_range(preset, &range, json));
    Ok(())
}

fn run_prefs(
    config: &MergedConfig,
    cache_dir: &Path,
    action: PrefsAction,
    no_color: bool,
) -> Result<()> {
    let defaults = config.chart_type_defaults();

    match action {
        PrefsAction::Show { json } => {
            let prefs = ChartTypePreferences::load(cache_dir, &defaults);
            println!("{}", cli::format_preferences(&prefs, json, no_color));
        }
        PrefsAction::Set {
            shape,
            chart,
            events,
        } => {
            let shape =
                cli::build_shape(&shape.query_type, shape.breakdown, shape.group_by, shape.models)?;
            let chart: ChartType = chart.parse()?;

            let mut prefs = ChartTypePreferences::load(cache_dir, &defaults);
            let change = prefs.record_selection(&shape, events, chart)?;
            prefs.save(cache_dir)?;
            println!("{}", cli::format_change(&change));
        }
        PrefsAction::Reset => {
            ChartTypePreferences::clear(cache_dir)?;
            println!("Chart type preferences reset to defaults.");
        }
    }

    Ok(())
}

fn join<T: std::fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
