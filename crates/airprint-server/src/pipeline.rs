// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Execution pipeline: spool each accepted job to disk and hand it to the
// host print system.
//
// Every job runs in its own Tokio task.  There is no concurrency limit and
// no cancellation; once submitted a job runs to `Completed` or `Aborted`.
// Failures are logged and recorded on the job, never retried.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use sha2::{Digest, Sha256};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn, Span};

use airprint_bridge::traits::PrintDispatch;
use airprint_core::error::{AirPrintError, Result};
use airprint_core::types::{JobStatus, PrintJob};

use crate::jobs::JobRegistry;

/// Runs submitted jobs against a [`PrintDispatch`] backend.
#[derive(Clone)]
pub struct ExecutionPipeline {
    jobs: JobRegistry,
    dispatcher: Arc<dyn PrintDispatch>,
    spool_dir: PathBuf,
}

impl ExecutionPipeline {
    pub fn new(jobs: JobRegistry, dispatcher: Arc<dyn PrintDispatch>, spool_dir: impl Into<PathBuf>) -> Self {
        Self {
            jobs,
            dispatcher,
            spool_dir: spool_dir.into(),
        }
    }

    pub fn spool_dir(&self) -> &Path {
        &self.spool_dir
    }

    /// Run `job` in the background.
    ///
    /// The handle resolves to the job's final status; callers are free to
    /// drop it.
    pub fn submit(&self, job: PrintJob) -> JoinHandle<JobStatus> {
        let pipeline = self.clone();
        tokio::spawn(async move { pipeline.execute(job).await })
    }

    /// Process one job to completion and return its final status.
    #[instrument(skip_all, fields(job_id = %job.id, format = %job.format))]
    pub async fn execute(&self, job: PrintJob) -> JobStatus {
        self.jobs.set_status(job.id, JobStatus::Processing);

        let path = self.spool_path(&job);
        let outcome = self.spool_and_dispatch(&job, &path).await;

        // The write may have failed part-way, so removal is attempted
        // regardless of the outcome.
        match tokio::fs::remove_file(&path).await {
            Ok(()) => debug!(path = %path.display(), "spool file removed"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %path.display(), error = %e, "failed to remove spool file"),
        }

        let status = match outcome {
            Ok(()) => {
                info!(printer = %display_printer(&job.printer_name), "job completed");
                JobStatus::Completed
            }
            Err(e) => {
                error!(error = %e, "job aborted");
                JobStatus::Aborted
            }
        };
        self.jobs.set_status(job.id, status);
        status
    }

    async fn spool_and_dispatch(&self, job: &PrintJob, path: &Path) -> Result<()> {
        tokio::fs::write(path, &job.data).await?;
        debug!(path = %path.display(), bytes = job.data.len(), "payload spooled");

        let dispatcher = Arc::clone(&self.dispatcher);
        let file = path.to_path_buf();
        let printer = job.printer_name.clone();
        let data = job.data.clone();
        let span = Span::current();
        tokio::task::spawn_blocking(move || {
            let _entered = span.enter();
            info!(
                sha256 = %payload_digest(&data),
                printer = %display_printer(&printer),
                "dispatching payload"
            );
            dispatcher.dispatch(&file, &printer)
        })
        .await
        .map_err(|e| AirPrintError::Dispatch(format!("dispatch task: {e}")))?
    }

    /// `airprint_<jobid>_<uuid>.<ext>` inside the spool directory.
    fn spool_path(&self, job: &PrintJob) -> PathBuf {
        self.spool_dir.join(format!(
            "airprint_{}_{}.{}",
            job.id,
            uuid::Uuid::new_v4().simple(),
            job.format.extension()
        ))
    }
}

/// Hex SHA-256 of a job payload, as logged before dispatch.
pub(crate) fn payload_digest(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

fn display_printer(name: &str) -> &str {
    if name.is_empty() { "<system default>" } else { name }
}
