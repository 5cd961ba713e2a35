use clap::{Parser, Subcommand};
use legco_scraper::config::{Config, PUSHGATEWAY_ENV};
use legco_scraper::error::Result;
use legco_scraper::infra::http_client::ReqwestHttp;
use legco_scraper::pipeline::{Pipeline, Session, SessionResult};
use legco_scraper::storage::{layout, read_members, FsStorage};
use legco_scraper::types::{BiographyPage, Member};
use legco_scraper::{logging, metrics};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "legco_scraper")]
#[command(about = "Legislative Council member and voting record scraper")]
#[command(version = "0.1.0")]
struct Cli {
    /// TOML configuration file; built-in defaults are used when it does not exist
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Output directory, overriding the configuration
    #[arg(long)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape member biographies
    Members,
    /// Scrape roll-call votes
    Voting {
        /// Member JSON array used to resolve vote ids (defaults to <data_dir>/member-json/all.json)
        #[arg(long)]
        members: Option<PathBuf>,
    },
    /// Scrape members, then votes resolved against the freshly scraped members
    Run,
}

fn report_pages(results: &[Result<BiographyPage>]) -> (Vec<Member>, usize) {
    let mut members = Vec::new();
    let mut failures = 0;
    for result in results {
        match result {
            Ok(page) => {
                println!("👥 {}: {} members saved", page.year, page.members.len());
                members.extend(page.members.iter().cloned());
            }
            Err(e) => {
                error!("Biography page failed: {}", e);
                println!("❌ Biography page failed: {}", e);
                failures += 1;
            }
        }
    }
    (members, failures)
}

fn report_sessions(sessions: &[Session], results: &[Result<SessionResult>]) -> usize {
    let mut failures = 0;
    for (session, result) in sessions.iter().zip(results) {
        match result {
            Ok(r) => {
                println!(
                    "🗳️  {}: {} meetings, {} motions, {} unresolved votes",
                    r.year,
                    r.meetings,
                    r.motions.len(),
                    r.unresolved_votes
                );
            }
            Err(e) => {
                error!("Session {} failed: {}", session.year, e);
                println!("❌ Session {} failed: {}", session.year, e);
                failures += 1;
            }
        }
    }
    failures
}

fn default_directory(config: &Config, explicit: Option<PathBuf>) -> Result<Vec<Member>> {
    let path = explicit.unwrap_or_else(|| config.data_dir.join(layout::all_members()));
    if !Path::new(&path).exists() {
        warn!("No member file at {}, all votes will be unresolved", path.display());
        return Ok(Vec::new());
    }
    info!("Resolving votes against {}", path.display());
    read_members(&path)
}

async fn run_voting(pipeline: &Pipeline, config: &Config, members: &[Member]) -> Result<usize> {
    let sessions = config
        .sessions
        .iter()
        .map(|s| Session::from_config(s, members))
        .collect::<Result<Vec<_>>>()?;
    let results = pipeline.run_sessions(&sessions).await;
    Ok(report_sessions(&sessions, &results))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();

    let mut config = Config::load(&cli.config)?.with_env_overrides();
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }

    let pushgateway = std::env::var(PUSHGATEWAY_ENV).ok().filter(|v| !v.trim().is_empty());
    let metrics_handle = pushgateway.as_ref().and_then(|_| metrics::init_metrics());

    let pipeline = Pipeline::new(
        Arc::new(ReqwestHttp::new()),
        Arc::new(FsStorage::new(&config.data_dir)),
    );
    info!("Writing output under {}", config.data_dir.display());

    let failures = match cli.command {
        Commands::Members => {
            println!("🔄 Scraping member biographies...");
            let results = pipeline.run_biography_pages(&config.biography_pages).await;
            report_pages(&results).1
        }
        Commands::Voting { members } => {
            println!("🔄 Scraping voting records...");
            let members = default_directory(&config, members)?;
            run_voting(&pipeline, &config, &members).await?
        }
        Commands::Run => {
            println!("\n📥 Step 1: Scraping member biographies...");
            let results = pipeline.run_biography_pages(&config.biography_pages).await;
            let (members, page_failures) = report_pages(&results);

            println!("\n🗳️  Step 2: Scraping voting records...");
            page_failures + run_voting(&pipeline, &config, &members).await?
        }
    };

    if let (Some(handle), Some(url)) = (metrics_handle.as_ref(), pushgateway.as_deref()) {
        metrics::push_to_gateway(handle, url).await;
    }

    if failures > 0 {
        anyhow::bail!("{} batch(es) failed", failures);
    }
    println!("✅ Done");
    Ok(())
}
