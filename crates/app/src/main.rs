mod command;
mod config;
mod repl;

use services::{AppServices, Clock};
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Args, prepare_sqlite_file, print_usage};
use crate::repl::Repl;

const DEFAULT_LOG_FILTER: &str = "app=info,services=info,storage=warn";

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::from_env()?;
    if args.help {
        print_usage();
        return Ok(());
    }

    prepare_sqlite_file(&args.db_url)?;
    info!(db_url = %args.db_url, quiz_secs = args.quiz.duration.as_secs(), "starting");

    let app = AppServices::new_sqlite(&args.db_url, Clock::system(), args.quiz).await?;
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    Repl::new(app).run(stdin, &mut stdout).await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("error: {err}");
        if err.downcast_ref::<config::ArgsError>().is_some() {
            print_usage();
        }
        std::process::exit(2);
    }
}
