use bankist::application::bank::Bank;
use bankist::application::command::{Command, Outcome};
use bankist::config::{DEFAULT_LOAN_DELAY_MS, DEFAULT_SESSION_TIMEOUT_SECS, Settings};
use bankist::infrastructure::in_memory::InMemoryAccountStore;
use bankist::infrastructure::seed::{demo_accounts, read_seeds, seed_store};
use bankist::interfaces::csv::action_reader::ActionReader;
use bankist::interfaces::csv::summary_writer::SummaryWriter;
use bankist::interfaces::display::render_dashboard;
use bankist::logging;
use chrono::Utc;
use clap::Parser;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Action script CSV file
    script: PathBuf,

    /// JSON file with the starting accounts. Defaults to the two demo accounts.
    #[arg(long)]
    accounts: Option<PathBuf>,

    /// Milliseconds between a loan being approved and credited
    #[arg(long, env = "BANKIST_LOAN_DELAY_MS", default_value_t = DEFAULT_LOAN_DELAY_MS)]
    loan_delay_ms: u64,

    /// Seconds of inactivity before the session is logged out
    #[arg(long, env = "BANKIST_SESSION_TIMEOUT_SECS", default_value_t = DEFAULT_SESSION_TIMEOUT_SECS)]
    session_timeout_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();

    let settings = Settings::default()
        .with_loan_delay(Duration::from_millis(cli.loan_delay_ms))
        .with_session_timeout(Duration::from_secs(cli.session_timeout_secs));

    let seeds = match cli.accounts {
        Some(path) => read_seeds(File::open(path).into_diagnostic()?).into_diagnostic()?,
        None => demo_accounts().into_diagnostic()?,
    };
    let store = InMemoryAccountStore::new();
    seed_store(&store, seeds).await.into_diagnostic()?;
    let bank = Bank::new(Arc::new(store), settings);

    // Replay the script
    let file = File::open(cli.script).into_diagnostic()?;
    let reader = ActionReader::new(file);
    for command in reader.commands() {
        match command {
            Ok(command) => {
                let show = matches!(command, Command::Show);
                match bank.execute(command).await {
                    Ok(Outcome::Dashboard(dashboard)) if show => {
                        print!("{}", render_dashboard(&dashboard, Utc::now()));
                    }
                    Ok(_) => {}
                    Err(e) => eprintln!("Error processing action: {}", e),
                }
            }
            Err(e) => {
                eprintln!("Error reading action: {}", e);
            }
        }
    }

    // Let approved loans land before reporting
    bank.settle().await;
    let accounts = bank.accounts().await.into_diagnostic()?;

    let stdout = io::stdout();
    let mut writer = SummaryWriter::new(stdout.lock());
    writer.write_accounts(&accounts).into_diagnostic()?;

    Ok(())
}
