//! # Sample Catalogue: Durable Registries for Numerical Experiments
//!
//! Every run of a numerical experiment gets a monotonically increasing
//! sample id, a row in a per-kind `registry.csv` recording its parameters,
//! and an empty directory to write results into. An HTML mirror of each
//! registry is regenerated after every write.
//!
//! ## Design Principles (Toyota Way Aligned)
//!
//! - **Poka-Yoke**: a kind's field set is fixed by its first sample; any
//!   other shape is rejected instead of silently mixed in
//! - **Jidoka**: every failure stops the line; nothing is retried or repaired
//! - **Genchi Genbutsu**: plain CSV on disk is the source of truth
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use sample_catalogue::catalogue;
//! use sample_catalogue::params::{GradientDescentParams, TargetName};
//! use std::path::Path;
//!
//! let params = GradientDescentParams::new(TargetName::SicPovm, 10);
//! let sample_dir = catalogue(Path::new("results"), &params)?;
//! println!("write results to {}", sample_dir.display());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod catalogue;
pub mod config;
pub mod error;
pub mod logging;
pub mod params;
pub mod registry;

pub use catalogue::{catalogue, Catalogue};
pub use config::CatalogueConfig;
pub use error::{Error, Result};
pub use params::{extract, ParamValue, ParameterMap, ParameterSet};
pub use registry::{csv_to_html, expand_registry, SampleId};
