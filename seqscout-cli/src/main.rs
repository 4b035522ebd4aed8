use clap::{Parser, Subcommand};
use colored::Colorize;
use seqscout::{
    config::{ConfigOverrides, MatchMode, SearchConfig},
    results::FindOutput,
    search::FindRequest,
    SearchError,
};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, reload, EnvFilter, Registry};

type Result<T> = std::result::Result<T, SearchError>;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Parser)]
struct CliFindConfig {
    /// Value to search for (can be specified multiple times)
    #[arg(short = 'i', long = "item", allow_hyphen_values = true)]
    items: Vec<String>,

    /// Also search for absent elements
    #[arg(long)]
    null_item: bool,

    /// Sequence to search in, as a delimited list (can be specified multiple times)
    #[arg(short = 's', long = "sequence", allow_hyphen_values = true)]
    sequences: Vec<String>,

    /// Delimiter between the elements of a --sequence value
    #[arg(long, default_value = ",")]
    split: String,

    /// Token standing for an absent element, in input and output
    #[arg(long, default_value = "<null>")]
    null_token: String,

    /// JSON request file ("-" reads stdin); CLI items and sequences are appended to it
    #[arg(long)]
    input: Option<PathBuf>,

    /// Match mode (exact|prefix|suffix|infix|prefix+infix|prefix+suffix|prefix+infix+suffix|infix+suffix|regex) [default: exact]
    #[arg(short = 'm', long)]
    mode: Option<String>,

    /// Compare case-insensitively
    #[arg(short = 'c', long)]
    case_insensitive: bool,

    /// Compare case-sensitively, even if a config file says otherwise
    #[arg(long, conflicts_with = "case_insensitive")]
    case_sensitive: bool,

    /// Word separator that prefix/infix/suffix matches must align to
    #[arg(short = 'w', long, allow_hyphen_values = true)]
    word_separator: Option<String>,

    /// Stop after N results; -N stops once N distinct items have matched (0 for unlimited)
    #[arg(short = 'n', long, allow_negative_numbers = true)]
    max_results: Option<i64>,

    /// Stop after N comparisons (0 for unlimited)
    #[arg(long)]
    max_comparisons: Option<u64>,

    /// Drop results equal to an earlier one
    #[arg(short = 'u', long)]
    unique: bool,

    /// Return results in random order
    #[arg(long)]
    shuffle: bool,

    /// Seed for a reproducible shuffle
    #[arg(long)]
    seed: Option<u64>,

    /// Configuration file (YAML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error) [default: warn]
    #[arg(long)]
    log_level: Option<String>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Print search statistics after the results
    #[arg(long)]
    stats: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Search sequences for items
    Find(Box<CliFindConfig>),

    /// List the available match modes
    Modes,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {}", "error:".red(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Find(config) => {
            if config.no_color {
                colored::control::set_override(false);
            }

            // Installed before the config files are read so their loading is logged
            let log_filter = init_logging(config.log_level.as_deref().unwrap_or("warn"));

            let mut request = match &config.input {
                Some(path) => read_request(path)?,
                None => FindRequest::default(),
            };

            let cli_overrides = ConfigOverrides {
                case_insensitive: if config.case_insensitive {
                    Some(true)
                } else if config.case_sensitive {
                    Some(false)
                } else {
                    None
                },
                mode: config
                    .mode
                    .as_deref()
                    .map(str::parse::<MatchMode>)
                    .transpose()?,
                word_separator: config.word_separator.clone(),
                max_results: config.max_results,
                max_comparisons: config.max_comparisons,
                unique: config.unique.then_some(true),
                shuffle: config.shuffle.then_some(true),
                seed: config.seed,
                log_level: config.log_level.clone(),
            };

            // Config files < request file < command line
            let request_overrides = std::mem::take(&mut request.config);
            let search_config = SearchConfig::load_from(config.config.as_deref())?
                .merge_overrides(request_overrides)
                .merge_overrides(cli_overrides);
            search_config.validate()?;
            if let Some(handle) = &log_filter {
                // A failed reload leaves the provisional filter in place
                let _ = handle.reload(log_filter_for(&search_config.log_level));
            }

            if config.null_item {
                request.items.push(None);
            }
            request.items.extend(config.items.iter().cloned().map(Some));
            request.sequences.extend(
                config
                    .sequences
                    .iter()
                    .map(|s| parse_sequence(s, &config.split, &config.null_token)),
            );

            debug!(
                "Running request with {} items and {} sequences",
                request.items.len() + usize::from(request.item.is_some()),
                request.sequences.len() + usize::from(request.sequence.is_some())
            );

            let output = request.normalize_with(search_config).run()?;
            print_results(&output, &config)
        }
        Commands::Modes => {
            for mode in MatchMode::ALL {
                println!("{}", mode);
            }
            Ok(())
        }
    }
}

fn log_filter_for(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Installs the stderr subscriber and returns a handle for changing its level
fn init_logging(level: &str) -> Option<reload::Handle<EnvFilter, Registry>> {
    let (filter, handle) = reload::Layer::new(log_filter_for(level));
    // A subscriber may already be installed when embedded in tests
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .ok()
        .map(|()| handle)
}

fn read_request(path: &Path) -> Result<FindRequest> {
    if path == Path::new("-") {
        let mut content = String::new();
        std::io::stdin().read_to_string(&mut content)?;
        FindRequest::from_json(&content)
    } else {
        FindRequest::from_json_file(path)
    }
}

fn parse_sequence(raw: &str, split: &str, null_token: &str) -> Vec<Option<String>> {
    raw.split(split)
        .map(|element| (element != null_token).then(|| element.to_string()))
        .collect()
}

fn print_results(output: &FindOutput, config: &CliFindConfig) -> Result<()> {
    if config.json {
        let json = if config.stats {
            serde_json::to_string_pretty(output)?
        } else {
            serde_json::to_string_pretty(&output.values)?
        };
        println!("{}", json);
        return Ok(());
    }

    for value in &output.values {
        match value {
            Some(text) => println!("{}", text),
            None => println!("{}", config.null_token.dimmed()),
        }
    }

    if config.stats {
        let stats = &output.stats;
        println!(
            "\nFound {} results in {} comparisons ({} skipped, {} duplicates dropped, stopped: {})",
            output.len().to_string().green(),
            stats.comparisons,
            stats.skipped,
            stats.duplicates_suppressed,
            stats.termination.to_string().blue()
        );
    }
    Ok(())
}
