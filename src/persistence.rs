//! File sink for search improvements.
//!
//! When an output directory is configured, every reported improvement is
//! written as one plain text file named by its normalized score. Nothing
//! else is persisted; a run's files are its whole record.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::instance::AssemblyCount;

/// Writes one improvement as `<valid>x<almost>.txt` under `dir`.
///
/// The name uses symmetry-normalized counts, so files sort by how many
/// structurally distinct solutions remain. Returns the path written.
pub fn save_improvement(
    dir: &Path,
    rendered: &str,
    count: AssemblyCount,
    symmetry: u64,
) -> std::io::Result<PathBuf> {
    let path = dir.join(format!(
        "{}x{}.txt",
        count.valid / symmetry,
        count.almost / symmetry
    ));

    fs::create_dir_all(dir)?;
    let mut file = File::create(&path)?;
    writeln!(file, "{rendered}")?;
    writeln!(file)?;
    writeln!(
        file,
        "valid: {} distinct ({} raw)",
        count.valid / symmetry,
        count.valid
    )?;
    writeln!(
        file,
        "almost: {} distinct ({} raw)",
        count.almost / symmetry,
        count.almost
    )?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn improvement_files_are_named_by_normalized_score() {
        let dir = std::env::temp_dir().join(format!("interlock-sink-{}", std::process::id()));
        let count = AssemblyCount { valid: 4, almost: 24 };

        let path = save_improvement(&dir, "[1 2] [-2 3] [-3 4]", count, 2).unwrap();
        assert_eq!(path.file_name().unwrap(), "2x12.txt");

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("[1 2] [-2 3] [-3 4]\n"));
        assert!(contents.contains("valid: 2 distinct (4 raw)"));
        assert!(contents.contains("almost: 12 distinct (24 raw)"));

        let _ = fs::remove_dir_all(&dir);
    }
}
