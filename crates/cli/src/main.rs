//! Command-line front end for the patent map.
//!
//! Usage:
//!     patentmap list
//!     patentmap search --region TURKEY --status active
//!     patentmap show TR2023/990011
//!     patentmap compare TR2023/990011 CN2024/445566 --detailed
//!     patentmap health

mod terminal;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use patentmap_backend_http::{
    FallbackDataset, HttpPatentService, PatentData, PatentService, ServiceConfig,
};
use patentmap_model::{GeographicRegion, PatentStatus, SearchCriteria};
use patentmap_view::{Command, PatentMapApp, ViewConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;
use terminal::{OutputFormat, TerminalMap, TerminalPresenter};

#[derive(Parser)]
#[command(name = "patentmap")]
#[command(about = "Browse, search and compare patents")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Patent data service URL
    #[arg(long, env = "PATENTMAP_API_URL", default_value = "http://localhost:3000/api")]
    api_url: String,

    /// Request timeout in seconds (unbounded when omitted)
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Seed for marker placement jitter
    #[arg(long)]
    seed: Option<u64>,

    /// Output format; json prints one JSON document per line
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// List every patent
    List,

    /// Search patents
    Search {
        /// Patent number substring
        #[arg(long)]
        patent_no: Option<String>,

        /// Keyword substring
        #[arg(short, long)]
        keywords: Option<String>,

        /// Applicant substring
        #[arg(short, long)]
        applicant: Option<String>,

        /// Geographic region (TURKEY, USA, EU, ASIA, OTHER)
        #[arg(short, long)]
        region: Option<String>,

        /// Patent status (active, inactive)
        #[arg(short, long)]
        status: Option<String>,
    },

    /// Show the details of one patent
    Show {
        patent_no: String,
    },

    /// Compare two patents
    Compare {
        first: String,
        second: String,

        /// Also print the per-field breakdown
        #[arg(short, long)]
        detailed: bool,
    },

    /// List patents available for comparison
    Candidates,

    /// Check data service health
    Health,
}

type CliApp = PatentMapApp<HttpPatentService, TerminalMap, TerminalPresenter, StdRng>;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries only output lines
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("patentmap=debug".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let service = HttpPatentService::new(ServiceConfig {
        base_url: cli.api_url,
        timeout_secs: cli.timeout_secs,
    })?;

    let commands = match cli.command {
        Commands::Health => return run_health(&service).await,
        Commands::List => vec![Command::LoadAll],
        Commands::Search {
            patent_no,
            keywords,
            applicant,
            region,
            status,
        } => vec![Command::Search(build_criteria(
            patent_no, keywords, applicant, region, status,
        )?)],
        Commands::Show { patent_no } => vec![Command::SelectDetail(patent_no)],
        Commands::Compare {
            first,
            second,
            detailed,
        } => {
            let mut commands = vec![Command::Compare { first, second }];
            if detailed {
                commands.push(Command::ExpandSimilarity);
            }
            commands
        }
        Commands::Candidates => vec![Command::LoadCompareCandidates],
    };

    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let data = PatentData::new(service, FallbackDataset::embedded()?);
    let mut app: CliApp = PatentMapApp::new(
        data,
        TerminalMap::default(),
        TerminalPresenter::new(cli.format),
        rng,
        ViewConfig::default(),
    );

    for command in commands {
        run(&mut app, command).await;
    }
    Ok(())
}

/// Dispatch a command; the user has already been alerted on failure.
async fn run(app: &mut CliApp, command: Command) {
    if let Err(e) = app.dispatch(command).await {
        tracing::debug!(error = %e, "Command failed");
        std::process::exit(1);
    }
}

fn build_criteria(
    patent_no: Option<String>,
    keywords: Option<String>,
    applicant: Option<String>,
    region: Option<String>,
    status: Option<String>,
) -> Result<SearchCriteria> {
    let mut criteria = SearchCriteria::new();

    if let Some(patent_no) = patent_no {
        criteria = criteria.with_patent_no(patent_no);
    }
    if let Some(keywords) = keywords {
        criteria = criteria.with_keywords(keywords);
    }
    if let Some(applicant) = applicant {
        criteria = criteria.with_applicant(applicant);
    }
    if let Some(region) = region {
        let Some(region) = GeographicRegion::parse(&region) else {
            bail!("Unknown region: {} (expected TURKEY, USA, EU, ASIA or OTHER)", region);
        };
        criteria = criteria.with_region(region);
    }
    if let Some(status) = status {
        let Some(status) = PatentStatus::parse(&status) else {
            bail!("Unknown patent status: {} (expected active or inactive)", status);
        };
        criteria = criteria.with_status(status);
    }

    Ok(criteria)
}

async fn run_health(service: &HttpPatentService) -> Result<()> {
    print!("Checking {} service at {}... ", service.name(), service.base_url());

    match service.health_check().await {
        Ok(()) => {
            println!("OK");
            Ok(())
        }
        Err(e) => {
            println!("FAILED: {}", e);
            std::process::exit(1);
        }
    }
}
