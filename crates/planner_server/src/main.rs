//! `planner` binary entry point.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use log::info;
use planner_core::db::open_db;
use planner_core::{core_version, init_logging};
use planner_server::config::{Cli, Command, ServeArgs};
use planner_server::{maintenance, router, AppState};
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.effective_log_level(), cli.log_target()).map_err(|err| anyhow!(err))?;

    match cli.command {
        Command::Serve(args) => serve(&cli.db, &args).await,
        Command::Seed(args) => {
            let mut conn = open_database(&cli.db)?;
            let summary = maintenance::seed(&mut conn, &args.file, args.replace)?;
            println!(
                "seeded {} phase(s), {} subject(s), {} task(s); replaced {}",
                summary.phases, summary.subjects, summary.tasks, summary.replaced
            );
            Ok(())
        }
        Command::Phases => {
            let conn = open_database(&cli.db)?;
            print!("{}", maintenance::phases(&conn)?);
            Ok(())
        }
        Command::DeletePhase { id } => {
            let conn = open_database(&cli.db)?;
            maintenance::delete_phase(&conn, id)?;
            println!("deleted phase {id}");
            Ok(())
        }
    }
}

fn open_database(path: &Path) -> Result<rusqlite::Connection> {
    open_db(path).with_context(|| format!("opening database `{}`", path.display()))
}

async fn serve(db: &Path, args: &ServeArgs) -> Result<()> {
    let addr = args
        .socket_addr()
        .with_context(|| format!("invalid listen address {}:{}", args.host, args.port))?;
    let state = AppState::new(open_database(db)?);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(
        "event=server_start module=server status=ok addr={addr} db={} core_version={}",
        db.display(),
        core_version()
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("event=server_stop module=server status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::error!("event=server_stop module=server status=error error={err}");
    }
}
