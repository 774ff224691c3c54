//! # CLI Module
//!
//! Command-line interface for the `servicegen` binary.
//!
//! ## Commands
//!
//! ### `generate`
//!
//! Generate stub packages from one or more service manifests:
//!
//! ```bash
//! servicegen generate --manifest s3.yaml --manifest sqs.json --output build
//! ```
//!
//! Options:
//! - `--manifest <FILE>` - Service manifest, YAML or JSON (required, repeatable)
//! - `--output <DIR>` - Output directory (required)
//! - `--setup` - Also generate `setup.py` and `README.md`
//! - `--dry-run` - List the files that would change without writing them
//! - `--config <FILE>` - Generator configuration, see [`crate::config`]
//! - `--threads <N>` - Worker threads for multi-service runs
//!
//! Services are generated independently. A failing service is reported and
//! makes the process exit with a non-zero status, the others are still written.
//!
//! ### `inspect`
//!
//! Print the flattened type definitions of a manifest, with forward
//! references marked, and the import block of every module:
//!
//! ```bash
//! servicegen inspect --manifest s3.yaml
//! ```
//!
//! ## Usage from Code
//!
//! ```rust,ignore
//! use servicegen::cli::{run_command, Cli};
//! use clap::Parser;
//!
//! let cli = Cli::parse();
//! let success = run_command(&cli.command, &mut std::io::stdout())?;
//! ```

mod commands;


pub use commands::{run_cli, run_command, Cli, Commands};
