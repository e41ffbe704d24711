use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Summary handed back by the build backend for one pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub name: String,
    pub output_path: PathBuf,
    pub elapsed: Duration,
    pub error_count: u32,
}

impl BuildReport {
    pub fn succeeded(&self) -> bool {
        self.error_count == 0
    }
}

impl fmt::Display for BuildReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.elapsed.as_secs();
        write!(
            f,
            "{}, Path {}, Time {}:{:02}, Number of errors {}",
            self.name,
            self.output_path.display(),
            secs / 60,
            secs % 60,
            self.error_count
        )
    }
}
