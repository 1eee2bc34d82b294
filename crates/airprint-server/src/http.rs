// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// HTTP routes: the IPP endpoint and a plain status page.
//
// | Method | Path                    | Response                          |
// |--------|-------------------------|-----------------------------------|
// | GET    | `/`                     | HTML list of host printers        |
// | GET    | `/ipp/`, `/ipp/print`   | plain-text readiness string       |
// | POST   | `/ipp/`, `/ipp/print`   | IPP exchange (`application/ipp`)  |
//
// Protocol errors travel inside a 200 response as an IPP status code; only
// an unreadable or truncated body is rejected at the HTTP level.

use std::sync::Arc;

use axum::Router;
use axum::extract::rejection::BytesRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use bytes::Bytes;
use tracing::{debug, error, info, warn};

use airprint_bridge::traits::PrinterRegistry;
use airprint_core::types::PrinterInfo;

use crate::ipp::{self, HEADER_LEN, IppRequest};
use crate::jobs::JobRegistry;
use crate::pipeline::ExecutionPipeline;

/// Body of `GET` on the IPP paths.
pub const READY_MESSAGE: &str = "AirPrint Service Ready - Use POST for IPP operations";

/// `Server` header on IPP responses.
pub const SERVER_HEADER: &str = "AirPrint/1.0";

pub const IPP_CONTENT_TYPE: &str = "application/ipp";

/// Job name recorded for every Print-Job.
const DEFAULT_JOB_NAME: &str = "Untitled";

/// State shared by all request handlers.
#[derive(Clone)]
pub(crate) struct ServiceState {
    pub(crate) jobs: JobRegistry,
    pub(crate) pipeline: ExecutionPipeline,
    pub(crate) printers: Arc<dyn PrinterRegistry>,
    /// Value of `printer-uri-supported`.
    pub(crate) printer_uri: Arc<str>,
    /// Value of `printer-name`.
    pub(crate) printer_name: Arc<str>,
}

pub(crate) fn router(state: ServiceState, max_request_bytes: usize) -> Router {
    Router::new()
        .route("/", get(status_page))
        .route("/ipp/", get(ready).post(ipp_exchange))
        .route("/ipp/print", get(ready).post(ipp_exchange))
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_request_bytes))
}

async fn ready() -> &'static str {
    READY_MESSAGE
}

async fn ipp_exchange(
    State(state): State<ServiceState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let header_str = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-")
            .to_owned()
    };
    debug!(
        method = %method,
        path = uri.path(),
        content_type = %header_str(header::CONTENT_TYPE),
        content_length = %header_str(header::CONTENT_LENGTH),
        user_agent = %header_str(header::USER_AGENT),
        "IPP request"
    );

    let body = match body {
        Ok(body) => body,
        Err(e) => {
            warn!(error = %e, "failed to read IPP request body");
            return (StatusCode::BAD_REQUEST, "unreadable request body").into_response();
        }
    };

    let request = match ipp::decode_request(&body) {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, bytes = body.len(), "rejecting IPP request");
            return (
                StatusCode::BAD_REQUEST,
                format!("IPP request shorter than {HEADER_LEN} bytes"),
            )
                .into_response();
        }
    };

    debug!(
        version = format_args!("{:#06x}", request.header.version),
        operation = format_args!("{:#06x}", request.operation()),
        request_id = request.request_id(),
        "decoded IPP header"
    );

    let response = dispatch_operation(&state, request).await;
    ipp_response(response)
}

/// Route a decoded request by operation-id.
async fn dispatch_operation(state: &ServiceState, request: IppRequest) -> Vec<u8> {
    let request_id = request.request_id();
    match request.operation() {
        ipp::OP_GET_PRINTER_ATTRIBUTES => {
            ipp::encode_get_printer_attributes(request_id, &state.printer_uri, &state.printer_name)
        }
        ipp::OP_PRINT_JOB => handle_print_job(state, request).await,
        ipp::OP_VALIDATE_JOB => ipp::encode_validate_job_ok(request_id),
        other => {
            warn!(operation = format_args!("{other:#06x}"), "unsupported IPP operation");
            ipp::encode_error(request_id, ipp::STATUS_OPERATION_NOT_SUPPORTED)
        }
    }
}

/// Record the job, start it in the background, and answer straight away.
async fn handle_print_job(state: &ServiceState, request: IppRequest) -> Vec<u8> {
    let request_id = request.request_id();
    let target = default_printer(Arc::clone(&state.printers)).await;

    let job = match state.jobs.create_job(
        DEFAULT_JOB_NAME,
        request.document_format,
        request.document,
        target.unwrap_or_default(),
    ) {
        Ok(job) => job,
        Err(e) => {
            error!(error = %e, "print job refused");
            return ipp::encode_error(request_id, ipp::STATUS_NOT_ACCEPTING_JOBS);
        }
    };
    info!(
        job_id = %job.id,
        format = %job.format,
        bytes = job.data.len(),
        printer = %job.printer_name,
        "print job accepted"
    );

    let response = ipp::encode_print_job_accepted(request_id, job.id);
    // Completion is observed through the registry, not the handle.
    drop(state.pipeline.submit(job));
    response
}

/// The host's default queue, or `None` if it has none or cannot be asked.
async fn default_printer(printers: Arc<dyn PrinterRegistry>) -> Option<String> {
    match tokio::task::spawn_blocking(move || printers.default_printer()).await {
        Ok(Ok(name)) => Some(name),
        Ok(Err(e)) => {
            debug!(error = %e, "no default printer; using system default");
            None
        }
        Err(e) => {
            warn!(error = %e, "default printer lookup panicked");
            None
        }
    }
}

fn ipp_response(body: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, IPP_CONTENT_TYPE),
            (header::SERVER, SERVER_HEADER),
        ],
        body,
    )
        .into_response()
}

// ---------------------------------------------------------------------------
// Status page
// ---------------------------------------------------------------------------

async fn status_page(State(state): State<ServiceState>) -> Html<String> {
    let printers = Arc::clone(&state.printers);
    let listing = tokio::task::spawn_blocking(move || printers.list_printers()).await;

    let body = match listing {
        Ok(Ok(printers)) => render_printer_list(&printers),
        Ok(Err(e)) => format!("<p>Unable to list printers: {}</p>", escape_html(&e.to_string())),
        Err(e) => format!("<p>Unable to list printers: {}</p>", escape_html(&e.to_string())),
    };

    Html(format!(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>AirPrint Service</title></head>\n\
         <body>\n<h1>AirPrint Service</h1>\n<p>Advertised as <strong>{name}</strong> at <code>{uri}</code></p>\n\
         <p>Jobs received: {jobs}</p>\n<h2>Printers</h2>\n{body}</body></html>\n",
        name = escape_html(&state.printer_name),
        uri = escape_html(&state.printer_uri),
        jobs = state.jobs.len(),
    ))
}

fn render_printer_list(printers: &[PrinterInfo]) -> String {
    if printers.is_empty() {
        return "<p>No printers found.</p>\n".into();
    }
    let mut out = String::from("<ul>\n");
    for printer in printers {
        out.push_str("<li>");
        out.push_str(&escape_html(&printer.name));
        if printer.is_default {
            out.push_str(" (default)");
        }
        out.push_str(" - ");
        out.push_str(&escape_html(&printer.status));
        out.push_str("</li>\n");
    }
    out.push_str("</ul>\n");
    out
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
