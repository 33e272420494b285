use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use timetable_solver::config::Config;
use timetable_solver::report::render_text;
use timetable_solver::server::{self, AllocateResponse};
use timetable_solver::{
    AllocateOptions, ScheduleInput, SchedulerError, SchedulerResult, Strategy, allocate_input,
    build_summary,
};

#[derive(Parser)]
#[command(name = "timetable-solver", version, about = "Weekly course timetable allocation")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP allocation service
    Serve {
        /// Listen address (overrides TIMETABLE_BIND_ADDR)
        #[arg(long)]
        addr: Option<String>,

        /// Default strategy: greedy or ilp (overrides TIMETABLE_STRATEGY)
        #[arg(long)]
        strategy: Option<Strategy>,
    },

    /// Allocate a JSON input file and print the timetable and report
    Solve {
        /// JSON file with `courses`, `rooms` and optional `instructors`
        input: PathBuf,

        #[arg(long)]
        strategy: Option<Strategy>,

        /// Only allocate courses of this class year
        #[arg(long)]
        year: Option<u32>,

        /// Print the full result and summary as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = Config::from_env()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.log_level.as_str())).init();

    match cli.command {
        Commands::Serve { addr, strategy } => {
            let bind_addr = addr.unwrap_or(config.bind_addr);
            server::run_server(&bind_addr, strategy.unwrap_or(config.strategy)).await?;
        }
        Commands::Solve {
            input,
            strategy,
            year,
            json,
        } => {
            let options = AllocateOptions {
                strategy: strategy.unwrap_or(config.strategy),
                year_filter: year,
            };
            solve_file(&input, options, json)?;
        }
    }

    Ok(())
}

fn solve_file(path: &Path, options: AllocateOptions, json: bool) -> SchedulerResult<()> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| SchedulerError::io_error(format!("read {}", path.display()), e.to_string()))?;
    let input: ScheduleInput = serde_json::from_str(&raw)?;

    let result = allocate_input(&input, options)?;
    let summary = build_summary(&result);

    if json {
        let response = AllocateResponse { result, summary };
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    let title = format!("Timetable ({})", options.strategy);
    for line in render_text(&title, &result, &summary) {
        println!("{}", line);
    }
    Ok(())
}
