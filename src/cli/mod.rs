//! Command workflows, kept apart from clap parsing in `main.rs`

pub mod orchestration;

pub use orchestration::{run_build_session, SessionOptions, SessionOutcome, SessionState};
