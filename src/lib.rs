//! # servicegen
//!
//! **servicegen** generates typed Python stub packages for remote service SDKs
//! from declarative service manifests.
//!
//! ## Overview
//!
//! A manifest describes one service: its client with methods, an optional
//! service resource, paginators, waiters, helper functions and the named
//! composite types ("type descriptors") those components use. From it the
//! generator computes the deduplicated, dependency-ordered set of type
//! definitions, works out the exact import block of every generated module and
//! renders the package through askama templates.
//!
//! ## Architecture
//!
//! - **[`import`]** - Import records, their ordering and per-module import sets
//! - **[`descriptor`]** - Type expressions, type descriptors and the per-service registry
//! - **[`structures`]** - Client, resource, paginator, waiter and function records
//! - **[`package`]** - Graph walking, flattening and the [`package::ServicePackage`] aggregate
//! - **[`manifest`]** - YAML/JSON manifest loading
//! - **[`writer`]** - File plan, template rendering, formatting and diff writing
//! - **[`generate`]** - Per-service generation and parallel multi-service runs
//! - **[`config`]** - `servicegen.toml` generator configuration
//! - **[`logging`]** - `tracing` subscriber setup
//! - **[`cli`]** - The `servicegen` command-line interface
//!
//! ### Generation Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant CLI as CLI<br/>(servicegen)
//!     participant Manifest as manifest::load_manifest
//!     participant Package as package::ServicePackage
//!     participant Flattener as package::Flattener
//!     participant Writer as writer
//!     participant FS as File System
//!
//!     CLI->>Manifest: load_manifest("s3.yaml")
//!     Manifest-->>CLI: ServiceManifest
//!     CLI->>Package: into_package(policy)
//!     Package->>Flattener: flatten(roots)
//!     Flattener-->>Package: type defs + presentation table
//!     CLI->>Writer: write_service_package(package)
//!     Writer->>Writer: plan, render, format every file
//!     Writer->>FS: write changed files only
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! servicegen generate --manifest s3.yaml --output build --setup
//! servicegen inspect --manifest s3.yaml
//! ```
//!
//! ## Errors
//!
//! Graph problems are reported as [`GenerateError`]; everything that touches
//! files or external tools returns `anyhow::Result` with context naming the
//! file and the service.

pub mod cli;
pub mod config;
pub mod descriptor;
mod error;
pub mod generate;
pub mod import;
pub mod logging;
pub mod manifest;
pub mod package;
pub mod structures;
pub mod writer;

pub use error::GenerateError;
pub use generate::{generate_service, generate_services, GenerateOptions, ServiceOutcome};
