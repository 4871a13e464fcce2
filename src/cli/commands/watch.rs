//! Watch-import command - Poll an import job until it settles

use std::path::Path;

use super::{print_json, Session};
use crate::errors::{CfsError, Result};
use crate::schemas::ImportStatus;
use crate::watch::{poll_import_status, AttemptCounter, WatchOptions, WatchOutcome};

pub async fn run(cwd: Option<&Path>, job_id: &str, json: bool) -> Result<()> {
    let session = Session::open(cwd)?;
    let options = WatchOptions::from(&session.config);
    let attempts = AttemptCounter::new();
    let token = attempts.begin();

    let outcome = poll_import_status(session.store().as_ref(), job_id, &attempts, token, options, |job| {
        if !json {
            println!("{}: {}", job.id, job.status);
        }
    })
    .await?;

    match outcome {
        WatchOutcome::Finished(job) => {
            if json {
                print_json(&job)?;
            }
            if job.status == ImportStatus::Failed {
                return Err(CfsError::Wrapped {
                    context: format!("import {} failed", job.id),
                    message: job.message.unwrap_or_else(|| "no message".to_string()),
                });
            }
            Ok(())
        }
        WatchOutcome::TimedOut { last, ticks } => Err(CfsError::Wrapped {
            context: format!("import {} still {}", last.id, last.status),
            message: format!("gave up after {} polls", ticks),
        }),
        WatchOutcome::Superseded => Ok(()),
    }
}
