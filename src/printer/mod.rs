//! # Printer Module
//!
//! This module provides the connection to a printer and the operations on it.
//!
//! ## Modules
//!
//! - [`config`]: Printer hardware specifications
//! - [`session`]: Connection lifecycle, key handshake, command dispatch
//! - [`device`]: One method per protocol command
//! - [`job`]: Whole print jobs on top of a session

pub mod config;
pub mod device;
pub mod job;
pub mod session;

pub use config::PrinterConfig;
pub use job::Printer;
pub use session::{Session, State};
