use anyhow::{bail, Context, Result};
use arxiv_fetch::config::{default_config_path, find_config_file, load_config, Config};
use arxiv_fetch::models::{Category, QueryFilters};
use arxiv_fetch::store::{save_entries, SaveOutcome, DEFAULT_RECORD_FILE};
use arxiv_fetch::ui::{self, BatchProgress, Status};
use arxiv_fetch::{ArxivClient, Catalog, DownloadOptions, DownloadSource, Downloader};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// arxiv-fetch - Query the arXiv catalog and download papers
#[derive(Parser, Debug)]
#[command(name = "arxiv-fetch")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Query the arXiv catalog and download papers", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (-v for debug, -vv for trace)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log output format
    #[arg(long, value_enum, global = true)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum LogFormat {
    Text,
    Json,
}

/// Output format for query results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Table format (human-readable)
    Table,
    /// JSON format (machine-readable)
    Json,
    /// One canonical id per line
    Ids,
}

/// Search filters shared by `query` and `harvest`
#[derive(Args, Debug, Clone, Default)]
struct FilterArgs {
    /// Category code, e.g. cs.AI (repeatable, OR-ed together)
    #[arg(long = "category", short = 'c')]
    categories: Vec<String>,

    /// Words that must appear in the title
    #[arg(long)]
    title: Option<String>,

    /// Author names
    #[arg(long)]
    author: Option<String>,

    /// Words that must appear in the abstract
    #[arg(long = "abstract")]
    abstract_text: Option<String>,

    /// Journal reference
    #[arg(long)]
    journal_ref: Option<String>,

    /// Raw search expression, used instead of the filters above
    #[arg(long)]
    raw: Option<String>,

    /// Restrict to these ids (repeatable)
    #[arg(long = "ids", value_delimiter = ',')]
    ids: Vec<String>,
}

impl FilterArgs {
    fn to_filters(&self) -> QueryFilters {
        let mut filters = QueryFilters::new();
        for category in &self.categories {
            filters = filters.category(category.as_str());
        }
        for id in &self.ids {
            filters = filters.id(id.as_str());
        }
        if let Some(title) = &self.title {
            filters = filters.title(title.as_str());
        }
        if let Some(author) = &self.author {
            filters = filters.authors(author.as_str());
        }
        if let Some(text) = &self.abstract_text {
            filters = filters.abstract_text(text.as_str());
        }
        if let Some(journal_ref) = &self.journal_ref {
            filters = filters.journal_ref(journal_ref.as_str());
        }
        if let Some(raw) = &self.raw {
            filters = filters.raw_query(raw.as_str());
        }
        filters
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Query the catalog
    #[command(alias = "q")]
    Query {
        #[command(flatten)]
        filters: FilterArgs,

        /// Maximum number of results
        #[arg(long, short = 'm', default_value_t = arxiv_fetch::models::DEFAULT_MAX_RESULTS)]
        max_results: usize,

        /// Offset of the first result
        #[arg(long)]
        start: Option<usize>,

        /// Normalize records (collapse whitespace, parse dates)
        #[arg(long)]
        normalize: bool,

        /// Output format
        #[arg(long, short = 'f', value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Download PDFs by id or abstract URL
    #[command(alias = "dl")]
    Download {
        /// Ids or abstract URLs
        #[arg(required = true)]
        inputs: Vec<String>,

        /// Target directory (defaults to downloads.default_path)
        #[arg(long, short = 'd')]
        dir: Option<PathBuf>,

        /// File name without extension (single download only)
        #[arg(long)]
        filename: Option<String>,

        /// Name files after the paper title
        #[arg(long)]
        title: bool,

        /// Append the id to title-derived names
        #[arg(long)]
        append_id: bool,

        /// Keep existing files instead of replacing them
        #[arg(long)]
        no_overwrite: bool,
    },

    /// Page through a query and store each record as JSON
    Harvest {
        #[command(flatten)]
        filters: FilterArgs,

        /// Total number of records to fetch
        #[arg(long, default_value_t = 1000)]
        total: usize,

        /// Records per request
        #[arg(long, default_value_t = 100)]
        per_page: usize,

        /// Target directory (defaults to downloads.default_path)
        #[arg(long, short = 'd')]
        dir: Option<PathBuf>,

        /// Name of the record file inside each entry directory
        #[arg(long, default_value = DEFAULT_RECORD_FILE)]
        file_name: String,

        /// Replace existing record files
        #[arg(long)]
        overwrite: bool,

        /// Store normalized records instead of raw ones
        #[arg(long)]
        normalize: bool,
    },

    /// List known category codes
    Categories {
        /// Only show codes or descriptions containing this text
        filter: Option<String>,
    },

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Write a default configuration file
    Init {
        /// Destination (defaults to the per-user config path)
        #[arg(long)]
        path: Option<PathBuf>,

        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration
    Show,
}

fn init_logging(cli: &Cli, config: &Config) {
    let level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => config.logging.level.as_str(),
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| format!("arxiv_fetch={}", level)),
    );

    let json = match cli.log_format {
        Some(format) => format == LogFormat::Json,
        None => config.logging.format.as_deref() == Some("json"),
    };

    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt_layer.json()).init();
    } else {
        registry.with(fmt_layer).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().or_else(find_config_file);
    let config = load_config(config_path.as_deref()).with_context(|| match &config_path {
        Some(path) => format!("failed to load configuration from {}", path.display()),
        None => "failed to load configuration".to_string(),
    })?;

    init_logging(&cli, &config);
    if let Some(path) = &config_path {
        tracing::debug!("Using config file: {}", path.display());
    }

    match &cli.command {
        Commands::Query {
            filters,
            max_results,
            start,
            normalize,
            format,
        } => {
            let client = ArxivClient::from_config(&config.http)?;
            let mut query = filters.to_filters().max_results(*max_results);
            if let Some(start) = start {
                query = query.start(*start);
            }
            run_query(&client, &query, *normalize, *format).await?;
        }

        Commands::Download {
            inputs,
            dir,
            filename,
            title,
            append_id,
            no_overwrite,
        } => {
            let downloader = Downloader::from_config(&config.http)?;
            let target_dir = dir.clone().unwrap_or_else(|| config.downloads.default_path.clone());

            let mut options = DownloadOptions::from_config(&config.downloads);
            options.use_title_for_filename |= *title;
            options.append_id |= *append_id;
            if *no_overwrite {
                options.overwrite = false;
            }

            let sources: Vec<DownloadSource> =
                inputs.iter().map(|s| DownloadSource::parse_input(s)).collect();

            if sources.len() == 1 {
                if let Some(name) = filename {
                    options = options.target_filename(name.as_str());
                }
                let path = downloader
                    .download_one(&sources[0], &target_dir, &options)
                    .await?;
                if !cli.quiet {
                    let size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
                    ui::print_status(
                        Status::Success,
                        &format!("{} ({})", path.display(), ui::format_file_size(size)),
                    );
                }
            } else {
                if filename.is_some() {
                    ui::print_status(
                        Status::Warning,
                        "--filename applies to single downloads only, ignoring",
                    );
                }

                let progress = BatchProgress::new(
                    sources.len() as u64,
                    !cli.quiet && ui::is_terminal(),
                );
                let failures = downloader
                    .download_many(&sources, &target_dir, &options, |source, err| {
                        let err = err.map(|e| e.to_string());
                        progress.item_done(&source.to_string(), err.as_deref());
                    })
                    .await?;
                progress.finish(failures.len());

                if !failures.is_empty() {
                    bail!("{} of {} downloads failed", failures.len(), sources.len());
                }
                if !cli.quiet {
                    ui::print_status(
                        Status::Success,
                        &format!("Downloaded {} papers to {}", sources.len(), target_dir.display()),
                    );
                }
            }
        }

        Commands::Harvest {
            filters,
            total,
            per_page,
            dir,
            file_name,
            overwrite,
            normalize,
        } => {
            let client = ArxivClient::from_config(&config.http)?;
            let target_dir = dir.clone().unwrap_or_else(|| config.downloads.default_path.clone());
            let entries = client
                .harvest(&filters.to_filters(), *total, *per_page)
                .await?;

            let outcomes = if *normalize {
                let normalized = entries
                    .into_iter()
                    .map(|e| e.normalize())
                    .collect::<Result<Vec<_>, _>>()?;
                save_entries(&normalized, &target_dir, file_name, *overwrite)?
            } else {
                save_entries(&entries, &target_dir, file_name, *overwrite)?
            };

            let written = outcomes
                .iter()
                .filter(|o| matches!(o, SaveOutcome::Written(_)))
                .count();
            if !cli.quiet {
                ui::print_status(
                    Status::Success,
                    &format!(
                        "Stored {} records in {} ({} already present)",
                        written,
                        target_dir.display(),
                        outcomes.len() - written
                    ),
                );
            }
        }

        Commands::Categories { filter } => {
            print_categories(filter.as_deref());
        }

        Commands::Config { action } => match action {
            ConfigAction::Init { path, force } => {
                let path = match path.clone().or_else(default_config_path) {
                    Some(path) => path,
                    None => bail!("no configuration directory available, pass --path"),
                };
                if path.exists() && !force {
                    bail!("{} already exists (use --force to replace it)", path.display());
                }
                Config::default()
                    .save(&path)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                ui::print_status(Status::Success, &format!("Wrote {}", path.display()));
            }
            ConfigAction::Show => {
                println!("{}", toml::to_string_pretty(&config)?);
            }
        },
    }

    Ok(())
}

async fn run_query(
    client: &ArxivClient,
    filters: &QueryFilters,
    normalize: bool,
    format: OutputFormat,
) -> Result<()> {
    if normalize {
        let entries = client.query_normalized(filters).await?;
        match format {
            OutputFormat::Table => println!("{}", ui::entries_table(&entries)),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
            OutputFormat::Ids => {
                for id in entries.iter().filter_map(|e| e.identifier()) {
                    println!("{}", id);
                }
            }
        }
    } else {
        let entries = client.query(filters).await?;
        match format {
            OutputFormat::Table => println!("{}", ui::raw_entries_table(&entries)),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
            OutputFormat::Ids => {
                for id in entries.iter().filter_map(|e| e.identifier()) {
                    println!("{}", id);
                }
            }
        }
    }
    Ok(())
}

fn print_categories(filter: Option<&str>) {
    use comfy_table::{presets, Attribute, Cell, Table};

    let needle = filter.map(|f| f.to_lowercase());
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.set_header(vec!["Code", "Description"]);

    for category in Category::all() {
        let matches = needle.as_deref().map_or(true, |n| {
            category.code().to_lowercase().contains(n)
                || category.description().to_lowercase().contains(n)
        });
        if matches {
            table.add_row(vec![
                Cell::new(category.code()).add_attribute(Attribute::Bold),
                Cell::new(category.description()),
            ]);
        }
    }
    println!("{table}");
}
