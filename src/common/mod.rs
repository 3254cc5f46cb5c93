//! # Common Components
//!
//! Shared utilities used by the library and the server binary.
//!
//! ## Modules
//!
//! - [`config`]: Configuration parsing utilities

pub mod config;
