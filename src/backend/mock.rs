use crate::backend::{BuildBackend, BuildRequest};
use crate::domain::BuildReport;
use crate::error::{BuildExporterError, Result};
use std::collections::VecDeque;
use std::time::Duration;

/// What the recording backend does on a given call
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptedOutcome {
    /// Report this many errors
    Report { error_count: u32 },
    /// Return `Err` as if the backend could not start
    Fail(String),
    /// Panic mid-build
    Panic(String),
}

/// Backend double that records requests instead of building.
///
/// Outcomes are consumed in call order; once the script runs out every
/// call reports success.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub requests: Vec<BuildRequest>,
    script: VecDeque<ScriptedOutcome>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the outcome of the next unscripted call
    pub fn then(mut self, outcome: ScriptedOutcome) -> Self {
        self.script.push_back(outcome);
        self
    }

    pub fn calls(&self) -> usize {
        self.requests.len()
    }
}

impl BuildBackend for RecordingBackend {
    fn build(&mut self, request: &BuildRequest) -> Result<BuildReport> {
        self.requests.push(request.clone());

        let error_count = match self.script.pop_front() {
            None => 0,
            Some(ScriptedOutcome::Report { error_count }) => error_count,
            Some(ScriptedOutcome::Fail(message)) => {
                return Err(BuildExporterError::backend(message))
            }
            Some(ScriptedOutcome::Panic(message)) => panic!("{}", message),
        };

        Ok(BuildReport {
            name: format!("{} pass {}", request.platform, self.requests.len()),
            output_path: request.output_path.clone(),
            elapsed: Duration::from_secs(0),
            error_count,
        })
    }
}
