// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory job registry.
//
// Job identifiers are allocated under the same lock that inserts the record,
// so concurrent Print-Job requests always observe distinct, strictly
// increasing ids starting at 1.  Allocation stops at `JobId::MAX`, the largest
// value the signed `job-id` attribute can carry.  The registry lives as long as the server
// value that owns it; nothing is persisted.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bytes::Bytes;
use tracing::{debug, instrument};

use airprint_core::error::{AirPrintError, Result};
use airprint_core::types::{DocumentFormat, JobId, JobStatus, PrintJob};

#[derive(Debug)]
struct Inner {
    /// `None` once `JobId::MAX` has been handed out.
    next_id: Option<u32>,
    jobs: HashMap<JobId, PrintJob>,
}

/// Shared registry of every job received by one server instance.
///
/// Cloning yields another handle onto the same registry.
#[derive(Debug, Clone)]
pub struct JobRegistry {
    inner: Arc<Mutex<Inner>>,
}

impl Default for JobRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub(crate) fn starting_at(first_id: u32) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                next_id: Some(first_id),
                jobs: HashMap::new(),
            })),
        }
    }

    // Every write is a single insert or field store; a poisoned map is
    // still consistent.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Allocate the next id and record a `Pending` job.
    ///
    /// Returns a snapshot of the stored record, or
    /// [`AirPrintError::JobIdsExhausted`] once every id up to `JobId::MAX`
    /// has been used.
    #[instrument(skip_all, fields(format = %format))]
    pub fn create_job(
        &self,
        name: impl Into<String>,
        format: DocumentFormat,
        data: Bytes,
        printer_name: impl Into<String>,
    ) -> Result<PrintJob> {
        let mut inner = self.lock();
        let id = match inner.next_id {
            Some(next) if next <= JobId::MAX.0 => JobId(next),
            _ => return Err(AirPrintError::JobIdsExhausted),
        };
        inner.next_id = id.0.checked_add(1).filter(|next| *next <= JobId::MAX.0);

        let job = PrintJob::new(id, name, format, data, printer_name);
        inner.jobs.insert(id, job.clone());
        debug!(job_id = %id, format = %job.format, bytes = job.data.len(), "job registered");
        Ok(job)
    }

    /// Snapshot of a single job.
    pub fn get(&self, id: JobId) -> Option<PrintJob> {
        self.lock().jobs.get(&id).cloned()
    }

    /// Snapshots of all jobs, ordered by id.
    pub fn jobs(&self) -> Vec<PrintJob> {
        let mut jobs: Vec<PrintJob> = self.lock().jobs.values().cloned().collect();
        jobs.sort_by_key(|job| job.id);
        jobs
    }

    pub fn len(&self) -> usize {
        self.lock().jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().jobs.is_empty()
    }

    /// Only the execution pipeline moves jobs between states.
    pub(crate) fn set_status(&self, id: JobId, status: JobStatus) {
        if let Some(job) = self.lock().jobs.get_mut(&id) {
            debug!(job_id = %id, from = ?job.status, to = ?status, "job status changed");
            job.status = status;
        }
    }
}
