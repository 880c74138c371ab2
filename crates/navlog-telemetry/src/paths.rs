//! Path resolution for logs, charts and survey inputs

use std::path::{Path, PathBuf};

/// Resolves the standard directories of a navlog workspace
#[derive(Debug, Clone)]
pub struct Paths {
    pub root: PathBuf,
}

impl Paths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Paths rooted at the current working directory
    pub fn current() -> std::io::Result<Self> {
        Ok(Self::new(std::env::current_dir()?))
    }

    /// Directory holding `run_*.csv` session logs
    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }

    /// Directory receiving summary CSVs and charts
    pub fn charts_dir(&self) -> PathBuf {
        self.root.join("charts")
    }

    /// Directory holding `mars.csv` and `sus.csv`
    pub fn surveys_dir(&self) -> PathBuf {
        self.root.join("surveys")
    }

    /// Optional analysis config file
    pub fn config_file(&self) -> PathBuf {
        self.root.join("navlog.json")
    }

    /// Route fixture used by the simulated session
    pub fn route_file(&self) -> PathBuf {
        self.root.join("data").join("route.json")
    }
}

/// Session logs in `dir`, sorted by file name (oldest first).
///
/// A missing directory yields an empty list.
pub fn list_session_logs(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };

    let mut files: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_session_log(path))
        .collect();
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

fn is_session_log(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name.starts_with("run_") && name.ends_with(".csv")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_dirs() {
        let paths = Paths::new("/work");
        assert!(paths.logs_dir().ends_with("logs"));
        assert!(paths.charts_dir().ends_with("charts"));
        assert!(paths.surveys_dir().ends_with("surveys"));
        assert!(paths.config_file().ends_with("navlog.json"));
        assert!(paths.route_file().ends_with("data/route.json"));
    }

    #[test]
    fn test_list_session_logs_sorted_and_filtered() {
        let temp = tempfile::TempDir::new().unwrap();
        for name in [
            "run_20250102_080000.csv",
            "run_20250101_120000.csv",
            "notes.csv",
            "run_20250101_120000.txt",
        ] {
            std::fs::write(temp.path().join(name), "ts,type\n").unwrap();
        }

        let logs = list_session_logs(temp.path()).unwrap();
        let names: Vec<_> = logs
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec!["run_20250101_120000.csv", "run_20250102_080000.csv"]
        );
    }

    #[test]
    fn test_list_session_logs_missing_dir() {
        let temp = tempfile::TempDir::new().unwrap();
        let logs = list_session_logs(&temp.path().join("absent")).unwrap();
        assert!(logs.is_empty());
    }
}
