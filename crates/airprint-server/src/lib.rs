// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// AirPrint Server: IPP over HTTP, DNS-SD advertisement, and the job
// pipeline that hands received documents to the host print system.  Domain
// types live in `airprint-core`; host integration in `airprint-bridge`.

pub mod discovery;
mod http;
pub mod ipp;
pub mod jobs;
pub mod net;
pub mod pipeline;
pub mod server;

pub use discovery::{DiscoveryBackend, DiscoveryRegistrar, MdnsBackend, ServiceAdvertisement};
pub use http::{IPP_CONTENT_TYPE, READY_MESSAGE, SERVER_HEADER};
pub use jobs::JobRegistry;
pub use pipeline::ExecutionPipeline;
pub use server::AirPrintServer;
