//! # just_files - Named File Storage Service
//!
//! Stores opaque byte streams under client-chosen names and serves them back
//! over HTTP, built on Clean Architecture principles.
//!
//! ## Architecture Layers
//!
//! - **Domain**: Core business types (`FileName`, `FileRecord`, domain errors)
//! - **Application**: Use cases and the `BlobStore` port
//! - **Infrastructure**: Filesystem and Postgres adapters for `BlobStore`
//! - **API**: HTTP handlers and middleware
//!
//! ## Guarantees
//!
//! - Uploads never overwrite; check-and-create is atomic per name
//! - Partial, oversize or cancelled uploads leave no trace
//! - A download that has started keeps streaming after a concurrent delete
//!
//! ## Example Usage
//!
//! ```no_run
//! use just_files::{api::create_router, ApplicationBuilder, Config};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let state = ApplicationBuilder::new(Config::from_env())
//!     .with_store()
//!     .await?
//!     .build()?;
//! let app = create_router(state);
//! # let _ = app;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

// Re-export key types explicitly to avoid ambiguity
pub use api::errors as api_errors;
pub use application::builder::ApplicationBuilder;
pub use application::{dto, errors, ports, use_cases};
pub use config::Config;
pub use domain::errors as domain_errors;
pub use domain::{entities, value_objects};
