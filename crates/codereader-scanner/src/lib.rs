//! Directory-tree walking: extension/exclude filters, symlink-cycle detection, and
//! batching. See spec.md §4.2.

mod error;

pub use error::{ScannerError, ScannerResult};

use codereader_config::JobConfig;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A file that survived scanning and is eligible for extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFile {
    pub absolute_path: PathBuf,
    pub relative_path: String,
    pub size_bytes: u64,
}

/// A file (or path) that was excluded from the scan, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// The result of walking one repository tree.
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    pub files: Vec<ScannedFile>,
    pub skipped_files: Vec<SkippedFile>,
    pub total_scanned: u64,
}

/// Walk `root` applying `config`'s extension/exclude-dir/size filters.
///
/// # Errors
/// Returns `ScannerError::InvalidPath` if `root` does not exist or is not a directory.
pub fn scan(root: &Path, config: &JobConfig) -> ScannerResult<ScanResult> {
    if !root.is_dir() {
        return Err(ScannerError::InvalidPath(root.display().to_string()));
    }

    let extensions: Vec<String> = config.extensions.iter().map(|e| e.to_lowercase()).collect();
    let exclude_dirs: HashSet<&str> = config.exclude_dirs.iter().map(String::as_str).collect();

    let mut result = ScanResult::default();
    let mut visited_realpaths: HashSet<PathBuf> = HashSet::new();

    let walker = WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            if entry.file_type().is_dir() {
                entry
                    .file_name()
                    .to_str()
                    .is_none_or(|name| !exclude_dirs.contains(name))
            } else {
                true
            }
        });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                if let Some(path) = err.path() {
                    result.skipped_files.push(SkippedFile {
                        path: path.to_path_buf(),
                        reason: err.to_string(),
                    });
                }
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        result.total_scanned += 1;

        if !matches_extension(path, &extensions) {
            continue;
        }

        match std::fs::canonicalize(path) {
            Ok(real) => {
                if !visited_realpaths.insert(real) {
                    result.skipped_files.push(SkippedFile {
                        path: path.to_path_buf(),
                        reason: "circular".to_string(),
                    });
                    continue;
                }
            }
            Err(err) => {
                result.skipped_files.push(SkippedFile {
                    path: path.to_path_buf(),
                    reason: err.to_string(),
                });
                continue;
            }
        }

        let metadata = match entry.metadata() {
            Ok(metadata) => metadata,
            Err(err) => {
                result.skipped_files.push(SkippedFile {
                    path: path.to_path_buf(),
                    reason: err.to_string(),
                });
                continue;
            }
        };

        let size_bytes = metadata.len();
        if size_bytes == 0 {
            result.skipped_files.push(SkippedFile {
                path: path.to_path_buf(),
                reason: "empty file".to_string(),
            });
            continue;
        }
        if size_bytes > config.max_file_size {
            result.skipped_files.push(SkippedFile {
                path: path.to_path_buf(),
                reason: format!("exceeds maxFileSize ({size_bytes} > {})", config.max_file_size),
            });
            continue;
        }

        let relative_path = path
            .strip_prefix(root)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/");

        result.files.push(ScannedFile {
            absolute_path: path.to_path_buf(),
            relative_path,
            size_bytes,
        });
    }

    Ok(result)
}

fn matches_extension(path: &Path, extensions: &[String]) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    let lower = name.to_lowercase();
    extensions.iter().any(|ext| lower.ends_with(ext.as_str()))
}

/// Split `files` into contiguous slices of at most `batch_size`, preserving order.
#[must_use]
pub fn partition_into_batches(
    files: &[ScannedFile],
    batch_size: u32,
) -> Vec<Vec<ScannedFile>> {
    if batch_size == 0 {
        return vec![files.to_vec()];
    }
    files
        .chunks(batch_size as usize)
        .map(<[ScannedFile]>::to_vec)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn config() -> JobConfig {
        JobConfig::default()
    }

    #[test]
    fn scan_rejects_nonexistent_path() {
        let result = scan(Path::new("/nonexistent/path/for/codereader/tests"), &config());
        assert!(matches!(result, Err(ScannerError::InvalidPath(_))));
    }

    #[test]
    fn scan_applies_extension_and_size_filters() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("a.ts"), "hello").expect("write a.ts");
        fs::write(dir.path().join("b.py"), "").expect("write b.py");
        fs::write(dir.path().join("bin.exe"), vec![0u8; 512]).expect("write bin.exe");

        let result = scan(dir.path(), &config()).expect("scan succeeds");
        assert_eq!(result.files.len(), 1);
        assert_eq!(result.files[0].relative_path, "a.ts");
        assert!(
            result
                .skipped_files
                .iter()
                .any(|s| s.reason == "empty file")
        );
    }

    #[test]
    fn scan_excludes_configured_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::create_dir(dir.path().join("node_modules")).expect("mkdir");
        fs::write(dir.path().join("node_modules/dep.js"), "x").expect("write");
        fs::write(dir.path().join("main.js"), "x").expect("write");

        let result = scan(dir.path(), &config()).expect("scan succeeds");
        assert_eq!(result.files.len(), 1);
        assert_eq!(result.files[0].relative_path, "main.js");
    }

    #[test]
    fn file_exactly_at_max_file_size_is_included() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut config = config();
        config.max_file_size = 10;
        fs::write(dir.path().join("exact.rs"), vec![b'a'; 10]).expect("write");
        fs::write(dir.path().join("over.rs"), vec![b'a'; 11]).expect("write");

        let result = scan(dir.path(), &config).expect("scan succeeds");
        assert_eq!(result.files.len(), 1);
        assert_eq!(result.files[0].relative_path, "exact.rs");
        assert!(result.skipped_files.iter().any(|s| s.path.ends_with("over.rs")));
    }

    #[test]
    fn partition_into_batches_splits_preserving_order() {
        let files = vec![
            ScannedFile {
                absolute_path: PathBuf::from("a"),
                relative_path: "a".to_string(),
                size_bytes: 1,
            },
            ScannedFile {
                absolute_path: PathBuf::from("b"),
                relative_path: "b".to_string(),
                size_bytes: 1,
            },
            ScannedFile {
                absolute_path: PathBuf::from("c"),
                relative_path: "c".to_string(),
                size_bytes: 1,
            },
        ];
        let batches = partition_into_batches(&files, 2);
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].len(), 2);
        assert_eq!(batches[1].len(), 1);
        assert_eq!(batches[1][0].relative_path, "c");
    }
}
