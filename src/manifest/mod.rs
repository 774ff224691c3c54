//! # Manifest Module
//!
//! Serialized description of one service: its identity, package metadata,
//! the composite type descriptors ("shapes") and the root components.
//!
//! Manifests are YAML (`.yaml`/`.yml`) or JSON (anything else). They are the
//! hand-off point from whatever ingests the upstream API definitions; turning
//! those definitions into a manifest is not this crate's job.
//!
//! ```yaml
//! service:
//!   name: s3
//!   class_name: S3
//!   module_name: stubs_s3
//! pypi_name: stubs-s3
//! version: 1.0.0
//! shapes:
//!   - name: OwnerTypeDef
//!     fields:
//!       - { name: ID, type: { builtin: str }, required: false }
//! client:
//!   name: S3Client
//!   alias_name: Client
//!   methods:
//!     - name: get_owner
//!       return_type: { ref: OwnerTypeDef }
//! ```

mod load;


pub use load::{load_manifest, parse_manifest, ManifestFormat, ServiceManifest};
