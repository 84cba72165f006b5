use anyhow::Result;
use clap::{Parser, Subcommand};
use skill_bridge::{compute_gaps, Aggregator, EngineConfig, SearchQuery};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "skillbridge")]
#[command(about = "Job-market aggregation and skill-gap analysis")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP API server
    Serve {
        #[arg(long, default_value_t = 8200)]
        port: u16,
    },
    /// Run one market analysis from the command line
    Analyze {
        /// Target role, e.g. "Python Developer"
        role: String,
        #[arg(long, default_value = "India")]
        location: String,
        #[arg(long, default_value_t = 30)]
        limit: usize,
        /// Skills you already have; gap scoring is skipped when empty
        #[arg(long = "known-skill")]
        known_skills: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("skill_bridge=info,rocket::server=off")),
        )
        .init();

    let cli = Cli::parse();
    let config = EngineConfig::load()?;

    match cli.command {
        Command::Serve { port } => skill_bridge::start_web_server(config, port).await,
        Command::Analyze {
            role,
            location,
            limit,
            known_skills,
        } => {
            let query = SearchQuery::new(&role, &location, limit);
            let analysis = Aggregator::new(config.clone()).aggregate(query).await;

            info!(
                "Aggregated {} postings from {} sources",
                analysis.aggregation.total_jobs_found, analysis.aggregation.sources_used
            );

            if known_skills.is_empty() {
                println!("{}", serde_json::to_string_pretty(&analysis)?);
                return Ok(());
            }

            let market_skills: Vec<String> = analysis
                .market_insights
                .top_skills
                .iter()
                .take(config.gap_candidates)
                .cloned()
                .collect();
            let gaps = compute_gaps(&market_skills, &known_skills, &config.thresholds);
            let plan = skill_bridge::generate_roadmap(&config, &gaps).await;

            let report = serde_json::json!({
                "aggregation": analysis.aggregation,
                "market_skills": market_skills,
                "gaps": gaps,
                "roadmap": plan,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
    }
}
