use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use clinic_roster_cli::{Reply, Session};
use clinic_roster_core::config::{DEFAULT_DATA_PATH, DEFAULT_LOG_FILTER};
use clinic_roster_core::{ClinicRoster, RosterConfig, StorageBackend, SystemClock};

#[derive(Parser)]
#[command(name = "clinic-roster")]
#[command(about = "Nurse and patient roster with checkup scheduling")]
struct Cli {
    /// Roster data file
    #[arg(long, env = "CLINIC_ROSTER_DATA", default_value = DEFAULT_DATA_PATH)]
    data: PathBuf,

    /// Storage backend (json or sqlite)
    #[arg(long, env = "CLINIC_ROSTER_BACKEND", default_value = "json")]
    backend: StorageBackend,

    /// Tracing directive added to RUST_LOG
    #[arg(long, env = "CLINIC_ROSTER_LOG", default_value = DEFAULT_LOG_FILTER)]
    log: String,

    /// Start empty instead of from the sample roster when nothing is stored
    #[arg(long)]
    no_sample_data: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = RosterConfig::new(cli.data, cli.backend, cli.log, !cli.no_sample_data)?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(config.log_filter().parse()?))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    tracing::info!(
        data = %config.data_path().display(),
        backend = %config.backend(),
        "starting clinic roster"
    );

    let clinic = ClinicRoster::open(&config, Box::new(SystemClock))
        .with_context(|| format!("failed to open roster at {}", config.data_path().display()))?;
    let mut session = Session::new(clinic);

    println!("Welcome to the clinic roster. Type 'help' for commands.");
    println!("{}", session.render_list());

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        match session.handle_line(&line) {
            Reply::Show(text) if text.is_empty() => {}
            Reply::Show(text) => println!("{}", text),
            Reply::Exit(text) => {
                println!("{}", text);
                break;
            }
        }
    }

    Ok(())
}
