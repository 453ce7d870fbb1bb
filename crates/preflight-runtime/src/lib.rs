//! # preflight-runtime
//!
//! Network side of setup validation.
//!
//! `preflight-core` decides what a probe outcome means; this crate performs
//! the probes. Every configured endpoint gets exactly one GET, awaited in
//! profile order, with no retries.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use preflight_runtime::{HttpProbe, ProbeConfig, SetupRunner};
//!
//! let probe = HttpProbe::new(&ProbeConfig::default())?;
//! let runner = SetupRunner::new(Arc::new(probe));
//! let report = runner.run(&profile, Path::new("./my-app")).await;
//! ```

pub mod probe;
pub mod runner;

pub use probe::{EndpointProbe, HttpProbe, ProbeConfig, ProbeError, DEFAULT_TIMEOUT};
pub use runner::SetupRunner;
