// Asta entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, stdout belongs to the prompt)
// 2. Load config
// 3. `build-pool` subcommand: regenerate the candidate document and exit
// 4. Open the local store (in memory when the file is unusable)
// 5. Load the candidate pool (terminal on failure)
// 6. Restore or create the plan
// 7. Read commands from stdin until quit or end of input

use std::path::PathBuf;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info};

use asta_app::app::{self, Session};
use asta_app::input::{self, HELP};
use asta_app::protocol::{CommandOutcome, UserCommand};
use asta_app::view;
use asta_core::config::{self, Config};
use asta_core::persist::Persistence;
use asta_core::pool::{self, builder};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;
    info!("Asta starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: league={}, budget={}, {} slots",
        config.league.name,
        config.league.total_budget,
        config.league.default_bids.len()
    );

    // 3. Offline pool builder
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.first().map(String::as_str) == Some("build-pool") {
        return build_pool(&config, &args[1..]);
    }

    // 4. Open the local store (in memory if the file is unusable)
    let store = app::open_store(&config.storage.db_path)?;
    if store.in_memory_fallback {
        eprintln!(
            "Could not open {}; changes will not be saved this session",
            config.storage.db_path
        );
    }
    let persistence = Persistence::new(store.db, config.storage.key.clone());

    // 5. Load the candidate pool
    let pool_path = PathBuf::from(&config.data_paths.pool);
    let pool = match pool::load_pool(&pool_path).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("Failed to load candidate pool: {}", e);
            eprintln!("Could not load the candidate list: {e}");
            return Err(e).context("failed to load candidate pool");
        }
    };

    // 6. Restore or create the plan
    let session = Session::start(config, pool, persistence);

    // 7. Command loop
    run_prompt(session).await?;

    info!("Asta shut down cleanly");
    Ok(())
}

async fn run_prompt(mut session: Session) -> anyhow::Result<()> {
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    stdout.write_all(view::render(&session).as_bytes()).await?;
    loop {
        stdout.write_all(b"\n> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match input::parse_command(&line) {
            Ok(command) => command,
            Err(e) => {
                stdout.write_all(format!("{e}\n").as_bytes()).await?;
                continue;
            }
        };
        let wants_help = command == UserCommand::Help;

        let outcome = session.handle_command(command).await;
        if matches!(outcome, CommandOutcome::Quit) {
            break;
        }

        let mut text = String::new();
        if let Some(notice) = view::render_outcome(&outcome) {
            text.push_str(&notice);
            text.push('\n');
        }
        if wants_help {
            text.push_str(HELP);
            text.push('\n');
        } else if !matches!(outcome, CommandOutcome::Rejected(_)) {
            text.push_str(&view::render(&session));
        }
        stdout.write_all(text.as_bytes()).await?;
    }

    stdout.flush().await?;
    Ok(())
}

/// `asta build-pool [csv-dir] [out]`, defaulting to the configured paths.
fn build_pool(config: &Config, args: &[String]) -> anyhow::Result<()> {
    let csv_dir = PathBuf::from(args.first().unwrap_or(&config.data_paths.csv_dir));
    let out = PathBuf::from(args.get(1).unwrap_or(&config.data_paths.pool));

    let pool = builder::build_pool(&csv_dir)
        .with_context(|| format!("failed to build pool from {}", csv_dir.display()))?;
    builder::write_pool(&pool, &out)
        .with_context(|| format!("failed to write {}", out.display()))?;

    info!("Wrote {} candidates to {}", pool.len(), out.display());
    println!(
        "Wrote {} strikers, {} centrals, {} defenders, {} goalkeeper teams to {}",
        pool.strikers.len(),
        pool.centrals.len(),
        pool.defenders.len(),
        pool.goalkeepers.len(),
        out.display()
    );
    Ok(())
}

/// Initialize tracing to log to a file (not the terminal, which is used by the prompt).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("asta.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("asta=info,asta_app=info,asta_core=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
