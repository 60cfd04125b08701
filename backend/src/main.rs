use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::prelude::__tracing_subscriber_SubscriberExt;

use analysis::matches::MatchQuery;
use analysis::plots::{PlotKind, PlotRequest};
use backend::storage::FileStorage;
use backend::{Session, Tables};
use common::FilterConfig;

#[derive(Parser)]
#[command(name = "killmap", about = "Kill and death maps of a pool of matches", version)]
struct Cli {
    /// Also log debug output of the analysis
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct PoolArgs {
    /// Folder containing kills.csv, game_round.csv and damage.csv
    #[arg(short, long)]
    data: PathBuf,

    /// Match ids to add to the pool
    #[arg(short, long = "match")]
    matches: Vec<String>,

    /// File with whitespace separated match ids to add to the pool
    #[arg(long)]
    pool: Option<PathBuf>,

    /// Filter settings as JSON, the dashboard defaults otherwise
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List calibrated maps and their fitted scales
    Maps,

    /// Summarize and search the matches of the data folder
    Matches {
        #[arg(short, long)]
        data: PathBuf,

        #[arg(long)]
        map: Option<String>,

        /// First day, YYYY-MM-DD
        #[arg(long)]
        start: Option<chrono::NaiveDate>,

        /// Last day, YYYY-MM-DD
        #[arg(long)]
        end: Option<chrono::NaiveDate>,

        /// At most two teams
        #[arg(long = "team")]
        teams: Vec<String>,

        #[arg(long = "player")]
        players: Vec<String>,

        /// Write the ids of the found matches to this file
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Filter the pool and project it onto a radar image
    Filter {
        #[command(flatten)]
        pool: PoolArgs,

        #[arg(long)]
        map: String,

        /// Heatmap cell size in image pixels
        #[arg(long, default_value = "15")]
        cell_size: f64,

        /// Write the report here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Plot kill features of the filtered pool
    Plot {
        #[command(flatten)]
        pool: PoolArgs,

        #[arg(short)]
        x: Option<String>,

        #[arg(short)]
        y: Option<String>,

        #[arg(long)]
        color: Option<String>,

        /// Draw box plots grouped by the color column
        #[arg(long = "box")]
        box_plot: bool,
    },
}

fn load_session(data: &Path) -> anyhow::Result<Session> {
    let storage = FileStorage::new(data);
    let tables = Tables::load(&storage)
        .with_context(|| format!("Loading tables from {}", data.display()))?;

    Ok(Session::new(tables))
}

fn load_config(path: Option<&Path>) -> anyhow::Result<FilterConfig> {
    let Some(path) = path else {
        return Ok(FilterConfig::dashboard_defaults());
    };

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Reading filter config {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Parsing filter config {}", path.display()))
}

fn fill_pool(session: &mut Session, args: &PoolArgs) -> anyhow::Result<()> {
    session.add(args.matches.iter().map(String::as_str));

    if let Some(path) = args.pool.as_deref() {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Reading match pool {}", path.display()))?;
        let added = session.import_pool(&text);
        tracing::info!(added, "Imported match pool");
    }

    if session.pool().is_empty() {
        anyhow::bail!("No known match selected, use --match or --pool");
    }

    Ok(())
}

fn write_json<T>(value: &T, output: Option<&Path>) -> anyhow::Result<()>
where
    T: serde::Serialize,
{
    match output {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Creating {}", path.display()))?;
            serde_json::to_writer(std::io::BufWriter::new(file), value)?;
        }
        None => {
            serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
            println!();
        }
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let verbose = cli.verbose;
    let registry = tracing_subscriber::Registry::default()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::filter::filter_fn(move |meta| {
            let ours = meta.target().contains("backend") || meta.target().contains("analysis");
            ours && (verbose || *meta.level() <= tracing::Level::INFO)
        }));
    tracing::subscriber::set_global_default(registry)?;

    let scales = analysis::maps::validate_all()?;

    match cli.command {
        Commands::Maps => {
            for (name, scale) in scales {
                let z_division = analysis::maps::lookup(name)?.z_division;
                println!(
                    "{name:<10} scale {:.5} shift ({:.1}, {:.1}) levels {}",
                    scale.scale,
                    scale.x_shift,
                    scale.y_shift,
                    if z_division.is_some() { 2 } else { 1 }
                );
            }
        }
        Commands::Matches {
            data,
            map,
            start,
            end,
            teams,
            players,
            export,
        } => {
            let session = load_session(&data)?;
            let query = MatchQuery {
                map,
                start_date: start,
                end_date: end,
                teams,
                players,
            };

            let found = analysis::matches::find(session.summaries(), &query);
            tracing::info!(found = found.len(), "Searched matches");

            if let Some(path) = export {
                let ids: Vec<&str> = found.iter().map(|s| s.match_id.as_str()).collect();
                std::fs::write(&path, ids.join(" "))
                    .with_context(|| format!("Writing match pool {}", path.display()))?;
            }

            write_json(&found, None)?;
        }
        Commands::Filter {
            pool,
            map,
            cell_size,
            output,
        } => {
            let config = load_config(pool.config.as_deref())?;
            let mut session = load_session(&pool.data)?.with_heatmap(analysis::heatmap::Config {
                cell_size,
                ..Default::default()
            });
            fill_pool(&mut session, &pool)?;

            let report = session.run(&config, &map)?;
            write_json(&report, output.as_deref())?;
        }
        Commands::Plot {
            pool,
            x,
            y,
            color,
            box_plot,
        } => {
            let config = load_config(pool.config.as_deref())?;
            let mut session = load_session(&pool.data)?;
            fill_pool(&mut session, &pool)?;

            let request = PlotRequest {
                x,
                y,
                color,
                kind: if box_plot { PlotKind::Box } else { PlotKind::Scatter },
            };
            let plot = session.plot(&config, &request)?;
            write_json(&plot, None)?;
        }
    }

    Ok(())
}
