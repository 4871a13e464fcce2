//! CLI module for cfs
//!
//! Provides the command-line interface using clap.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// cfs - Operator tool for CFS plans, containers and package transactions
#[derive(Parser, Debug)]
#[command(name = "cfs")]
#[command(version)]
#[command(about = "Drive CFS plan, container and package transaction workflows")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress info-level output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Override the working directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a .cfs store in the current directory
    Init {
        /// Overwrite an existing config.json
        #[arg(long)]
        force: bool,
    },

    /// Load or update a plan from a JSON document with raw container records
    Load {
        /// Path to the plan document
        file: PathBuf,
    },

    /// List plans
    Plans {
        /// Filter by plan status (PENDING, IN_PROGRESS, DONE)
        #[arg(long)]
        status: Option<String>,
    },

    /// Show a plan with its containers and HBLs
    Show {
        /// Plan ID
        plan_id: String,
    },

    /// Move a pending plan into IN_PROGRESS
    Resume {
        /// Plan ID
        plan_id: String,
    },

    /// Put an in-progress plan back to PENDING
    Suspend {
        /// Plan ID
        plan_id: String,
    },

    /// Mark an in-progress plan DONE
    Finish {
        /// Plan ID
        plan_id: String,
    },

    /// Break a container's seal and start work on it
    Unseal {
        plan_id: String,
        container_id: String,

        /// When the seal was broken (RFC 3339); defaults to now
        #[arg(long)]
        at: Option<String>,
    },

    /// Apply a new seal to a container
    Reseal {
        plan_id: String,
        container_id: String,

        /// New seal number
        #[arg(long)]
        seal: String,

        /// Park the container on hold
        #[arg(long)]
        on_hold: bool,

        #[arg(long)]
        note: Option<String>,
    },

    /// Mark a container done
    Complete {
        plan_id: String,
        container_id: String,

        /// Cargo loaded status (empty, partial, full)
        #[arg(long)]
        cargo_loaded: Option<String>,

        #[arg(long)]
        notes: Option<String>,

        /// When work finished (RFC 3339); defaults to now
        #[arg(long)]
        at: Option<String>,
    },

    /// Record the destuff result of one HBL
    Destuff {
        plan_id: String,
        container_id: String,
        hbl_id: String,

        /// Defer the decision on this HBL
        #[arg(long)]
        on_hold: bool,

        /// Cargo did not match the document
        #[arg(long)]
        unmatched: bool,

        #[arg(long)]
        document: Option<String>,

        #[arg(long)]
        image: Option<String>,

        #[arg(long)]
        note: Option<String>,
    },

    /// Check whether a container may be sealed
    SealCheck {
        plan_id: String,
        container_id: String,
    },

    /// Open a package transaction on a packing list
    TxnOpen {
        /// Transaction ID
        id: String,

        /// Transaction code
        #[arg(long)]
        code: String,

        /// Packing list the transaction belongs to
        #[arg(long)]
        packing_list: String,

        /// Business process flow; defaults to the configured default_flow
        #[arg(long)]
        flow: Option<String>,

        #[arg(long)]
        party_name: Option<String>,
    },

    /// Close a package transaction
    TxnClose {
        /// Transaction ID
        id: String,
    },

    /// Resolve the active flow step for a package position status
    Step {
        /// Current position status of the package
        position_status: String,

        /// Business process flow; defaults to the configured default_flow
        #[arg(long)]
        flow: Option<String>,
    },

    /// Poll an import job until it completes or fails
    WatchImport {
        /// Import job ID
        job_id: String,
    },
}
