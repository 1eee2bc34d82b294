// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the AirPrint bridge.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// IPP job identifier.
///
/// Allocated sequentially by the job registry, starting at 1 and never past
/// [`JobId::MAX`].  Identifiers are never reused within one server instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct JobId(pub u32);

impl JobId {
    /// Largest id representable in the signed IPP `job-id` attribute.
    pub const MAX: JobId = JobId(i32::MAX as u32);

    /// Wire form of the id as carried in the IPP `job-id` integer attribute.
    pub fn as_ipp_integer(self) -> i32 {
        i32::try_from(self.0).unwrap_or(i32::MAX)
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle states of a print job.
///
/// Jobs start `Pending`, move to `Processing` when the pipeline picks them
/// up, and end in either `Completed` or `Aborted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Aborted,
}

impl JobStatus {
    /// IPP `job-state` enum value (RFC 8011 §5.3.7).
    pub fn ipp_job_state(&self) -> i32 {
        match self {
            Self::Pending => 3,
            Self::Processing => 5,
            Self::Aborted => 8,
            Self::Completed => 9,
        }
    }

    /// Whether the job has reached a final state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Aborted)
    }
}

/// Document formats the bridge recognises in incoming jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentFormat {
    Pdf,
    PlainText,
    Jpeg,
    Png,
    /// Anything else; handed to the spooler as opaque bytes.
    OctetStream,
}

impl DocumentFormat {
    /// MIME type string as used in IPP `document-format`.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::PlainText => "text/plain",
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::OctetStream => "application/octet-stream",
        }
    }

    /// File extension used when the payload is spooled to disk.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::PlainText => "txt",
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::OctetStream => "dat",
        }
    }

    /// Map a MIME type string to a format, falling back to `OctetStream`.
    pub fn from_mime(mime: &str) -> Self {
        match mime {
            "application/pdf" => Self::Pdf,
            "text/plain" => Self::PlainText,
            "image/jpeg" => Self::Jpeg,
            "image/png" => Self::Png,
            _ => Self::OctetStream,
        }
    }
}

impl std::fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mime_type())
    }
}

/// A print job received over IPP.
#[derive(Debug, Clone)]
pub struct PrintJob {
    pub id: JobId,
    /// Display name (`job-name`), "Untitled" when the client sent none.
    pub name: String,
    pub format: DocumentFormat,
    /// Raw document payload.  Cheap to clone.
    pub data: Bytes,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    /// Target queue on the host; empty means the system default.
    pub printer_name: String,
}

impl PrintJob {
    pub fn new(
        id: JobId,
        name: impl Into<String>,
        format: DocumentFormat,
        data: Bytes,
        printer_name: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            format,
            data,
            status: JobStatus::Pending,
            created_at: Utc::now(),
            printer_name: printer_name.into(),
        }
    }
}

/// A print queue known to the host print system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrinterInfo {
    pub name: String,
    pub description: String,
    pub is_default: bool,
    pub status: String,
}

/// Status of the AirPrint server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServerStatus {
    Stopped,
    Starting,
    Running,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_extension_mapping() {
        assert_eq!(DocumentFormat::Pdf.extension(), "pdf");
        assert_eq!(DocumentFormat::PlainText.extension(), "txt");
        assert_eq!(DocumentFormat::Jpeg.extension(), "jpg");
        assert_eq!(DocumentFormat::Png.extension(), "png");
        assert_eq!(DocumentFormat::OctetStream.extension(), "dat");
    }

    #[test]
    fn unknown_mime_falls_back_to_octet_stream() {
        assert_eq!(
            DocumentFormat::from_mime("application/postscript"),
            DocumentFormat::OctetStream
        );
        assert_eq!(DocumentFormat::from_mime("image/png"), DocumentFormat::Png);
    }

    #[test]
    fn job_state_values_follow_rfc_8011() {
        assert_eq!(JobStatus::Pending.ipp_job_state(), 3);
        assert_eq!(JobStatus::Processing.ipp_job_state(), 5);
        assert_eq!(JobStatus::Aborted.ipp_job_state(), 8);
        assert_eq!(JobStatus::Completed.ipp_job_state(), 9);
        assert!(JobStatus::Aborted.is_terminal());
        assert!(!JobStatus::Processing.is_terminal());
    }

    #[test]
    fn new_job_starts_pending() {
        let job = PrintJob::new(
            JobId(7),
            "Untitled",
            DocumentFormat::Pdf,
            Bytes::from_static(b"%PDF"),
            "",
        );
        assert_eq!(job.status, JobStatus::Pending);
        assert_eq!(job.id.as_ipp_integer(), 7);
        assert!(job.printer_name.is_empty());
    }
}
