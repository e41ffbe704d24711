pub mod args;
pub mod backend;
pub mod boundary;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod fastlane;
pub mod logging;
pub mod resolver;
pub mod session;
pub mod settings;
pub mod ui;

pub use error::{BuildExporterError, Result};
