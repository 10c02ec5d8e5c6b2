//! # virtnet Common
//!
//! Shared utilities for the virtnet components.
//!
//! ## Logging
//!
//! ```rust,no_run
//! use virtnet_common::{init_logging, LogFormat};
//!
//! init_logging("info", LogFormat::Text).unwrap();
//! ```

pub mod logging;

pub use logging::{init_logging, LogFormat};
