//! # convgen
//!
//! LLM-backed generator for versioned C struct headers and converters.
//!
//! Given a pair of before/after C headers and a root struct name, the
//! pipeline asks a text-generation backend for exactly four source files
//! (a versioned header, converter declarations, a converter implementation
//! and a shared converters file) and mechanically validates that the
//! model's output satisfies the strict four-block contract before handing
//! anything back.
//!
//! ## Core Concepts
//!
//! - **[`LlmClient`]** — the single backend capability:
//!   `generate(system, user) -> text`. Three variants (cloud, offline
//!   HTTP, local in-process runtime) are selected by [`backend::select`]
//!   from a [`BackendSettings`] snapshot.
//! - **[`contract`]** — recovers four named, typed, ordered file blocks
//!   from unstructured model text, or fails in one of three precise ways.
//! - **[`Pipeline`]** — orchestrates one request end to end with no
//!   retries and no cross-request state.
//! - **[`GenError`]** — the closed failure taxonomy, with an HTTP-style
//!   status mapping for embedding servers.
//!
//! ## Quick Start
//!
//! ```no_run
//! use convgen::{BackendSettings, GenerateRequest, Pipeline};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pipeline = Pipeline::new(BackendSettings::from_env());
//!     let request = GenerateRequest::new(
//!         "ExamplePort",
//!         std::fs::read_to_string("old_header.h")?,
//!         std::fs::read_to_string("new_header.h")?,
//!     );
//!     let response = pipeline.run(&request).await?;
//!     for file in &response.files {
//!         println!("{} ({} bytes)", file.name, file.content.len());
//!     }
//!     Ok(())
//! }
//! ```

pub mod archive;
pub mod backend;
pub mod config;
pub mod contract;
pub mod error;
pub mod pipeline;
pub mod prompt;
pub mod types;

pub use backend::{BackendKind, CloudClient, LlmClient, LocalClient, MockClient, OfflineClient};
pub use config::BackendSettings;
pub use error::{GenError, Result};
pub use pipeline::{Pipeline, MAX_HEADER_LEN};
pub use types::{GeneratedFile, GenerateRequest, GenerateResponse};
