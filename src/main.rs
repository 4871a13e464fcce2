//! cfs CLI - Operator tool for CFS plan, container and package transaction workflows

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cfs_workflow::cli::commands;
use cfs_workflow::cli::{Cli, Commands};
use cfs_workflow::domain::DestuffResultRequest;
use cfs_workflow::errors::to_exit_code;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing; RUST_LOG wins over the flags
    let default_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let result = run(cli).await;

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error [{}]: {}", e.code(), e);
            if e.is_fatal() {
                eprintln!("This change is not allowed from the current state and will not succeed on retry");
            }
            std::process::exit(to_exit_code(&e));
        }
    }
}

async fn run(cli: Cli) -> cfs_workflow::Result<()> {
    let cwd = cli.cwd.as_deref();
    let json = cli.json;

    match cli.command {
        Some(Commands::Init { force }) => commands::init::run(cwd, force).await,
        Some(Commands::Load { file }) => commands::load::run(cwd, &file, json).await,
        Some(Commands::Plans { status }) => commands::list::run(cwd, status.as_deref(), json).await,
        Some(Commands::Show { plan_id }) => commands::show::run(cwd, &plan_id, json).await,
        Some(Commands::Resume { plan_id }) => commands::plan::resume(cwd, &plan_id, json).await,
        Some(Commands::Suspend { plan_id }) => commands::plan::suspend(cwd, &plan_id, json).await,
        Some(Commands::Finish { plan_id }) => commands::plan::finish(cwd, &plan_id, json).await,
        Some(Commands::Unseal {
            plan_id,
            container_id,
            at,
        }) => commands::container::unseal(cwd, &plan_id, &container_id, at.as_deref(), json).await,
        Some(Commands::Reseal {
            plan_id,
            container_id,
            seal,
            on_hold,
            note,
        }) => {
            commands::container::reseal(cwd, &plan_id, &container_id, &seal, on_hold, note, json)
                .await
        }
        Some(Commands::Complete {
            plan_id,
            container_id,
            cargo_loaded,
            notes,
            at,
        }) => {
            commands::container::complete(
                cwd,
                &plan_id,
                &container_id,
                cargo_loaded.as_deref(),
                notes,
                at.as_deref(),
                json,
            )
            .await
        }
        Some(Commands::Destuff {
            plan_id,
            container_id,
            hbl_id,
            on_hold,
            unmatched,
            document,
            image,
            note,
        }) => {
            let request = DestuffResultRequest {
                document,
                image,
                note,
                on_hold,
                unmatched,
            };
            commands::destuff::run(cwd, &plan_id, &container_id, &hbl_id, request, json).await
        }
        Some(Commands::SealCheck {
            plan_id,
            container_id,
        }) => commands::seal::run(cwd, &plan_id, &container_id, json).await,
        Some(Commands::TxnOpen {
            id,
            code,
            packing_list,
            flow,
            party_name,
        }) => {
            commands::transaction::open(
                cwd,
                &id,
                &code,
                &packing_list,
                flow.as_deref(),
                party_name,
                json,
            )
            .await
        }
        Some(Commands::TxnClose { id }) => commands::transaction::close(cwd, &id, json).await,
        Some(Commands::Step {
            position_status,
            flow,
        }) => commands::step::run(cwd, &position_status, flow.as_deref(), json).await,
        Some(Commands::WatchImport { job_id }) => commands::watch::run(cwd, &job_id, json).await,
        None => {
            // Default to showing help - clap handles this
            println!("Use --help for usage information");
            Ok(())
        }
    }
}
