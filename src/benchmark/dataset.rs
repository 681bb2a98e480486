//! Dataset discovery and unaligned input preparation

use super::types::AVERAGE_KEY;
use crate::bio::fasta::write_unaligned;
use crate::core::config::PathsConfig;
use crate::BenchError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// One benchmark dataset: a reference alignment and its unaligned form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    pub name: String,
    pub reference_path: PathBuf,
    pub unaligned_path: PathBuf,
}

/// A source file that could not be turned into a dataset
#[derive(Debug, Clone)]
pub struct PreparationFailure {
    /// Dataset name the file would have had
    pub name: String,
    pub source: PathBuf,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct PreparedDatasets {
    /// Usable datasets in sorted source-file order
    pub datasets: Vec<Dataset>,
    /// Unaligned files written during this preparation
    pub derived: usize,
    /// Unaligned files already present and left untouched
    pub reused: usize,
    pub failures: Vec<PreparationFailure>,
}

/// Derives unaligned inputs from a directory of reference alignments.
///
/// The target directory acts as a cache: an unaligned file that already
/// exists is never regenerated.
pub struct DatasetPreparer {
    source_dir: PathBuf,
    target_dir: PathBuf,
}

impl DatasetPreparer {
    pub fn new<S: Into<PathBuf>, T: Into<PathBuf>>(source_dir: S, target_dir: T) -> Self {
        Self {
            source_dir: source_dir.into(),
            target_dir: target_dir.into(),
        }
    }

    pub fn from_config(paths: &PathsConfig) -> Self {
        Self::new(paths.source_dir.clone(), paths.unaligned_dir.clone())
    }

    pub fn prepare(&self) -> Result<PreparedDatasets, BenchError> {
        let sources = self.list_sources()?;

        fs::create_dir_all(&self.target_dir).map_err(|e| {
            BenchError::DatasetPreparation(format!(
                "cannot create unaligned directory {}: {}",
                self.target_dir.display(),
                e
            ))
        })?;

        let mut prepared = PreparedDatasets::default();
        for source in sources {
            match self.prepare_one(&source) {
                Ok((dataset, derived)) => {
                    if derived {
                        prepared.derived += 1;
                    } else {
                        prepared.reused += 1;
                    }
                    prepared.datasets.push(dataset);
                }
                Err(e) => {
                    warn!(source = %source.display(), error = %e, "Skipping dataset");
                    let name = source
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| source.display().to_string());
                    prepared.failures.push(PreparationFailure {
                        name,
                        source,
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            datasets = prepared.datasets.len(),
            derived = prepared.derived,
            reused = prepared.reused,
            failed = prepared.failures.len(),
            "Datasets prepared"
        );
        Ok(prepared)
    }

    /// Regular files in the source directory, sorted by name
    fn list_sources(&self) -> Result<Vec<PathBuf>, BenchError> {
        let unreadable = |e: std::io::Error| {
            BenchError::DatasetPreparation(format!(
                "cannot read source directory {}: {}",
                self.source_dir.display(),
                e
            ))
        };

        let mut sources = Vec::new();
        for entry in fs::read_dir(&self.source_dir).map_err(unreadable)? {
            let path = entry.map_err(unreadable)?.path();
            if path.is_file() {
                sources.push(path);
            }
        }
        sources.sort();
        Ok(sources)
    }

    /// Returns the dataset and whether its unaligned file was written now
    fn prepare_one(&self, source: &Path) -> Result<(Dataset, bool), BenchError> {
        let name = source
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                BenchError::DatasetPreparation(format!(
                    "file name of {} is not valid UTF-8",
                    source.display()
                ))
            })?
            .to_string();

        if name == AVERAGE_KEY {
            return Err(BenchError::DatasetPreparation(format!(
                "dataset name '{}' is reserved for tool averages",
                AVERAGE_KEY
            )));
        }

        let target = self.target_dir.join(&name);
        let derived = if target.is_file() {
            debug!(dataset = %name, "Unaligned file present, reusing");
            false
        } else {
            write_unaligned(source, &target)?;
            debug!(dataset = %name, target = %target.display(), "Derived unaligned file");
            true
        };

        Ok((
            Dataset {
                name,
                reference_path: source.to_path_buf(),
                unaligned_path: target,
            },
            derived,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn setup() -> (TempDir, PathBuf, PathBuf) {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("source");
        let target = dir.path().join("unaligned");
        fs::create_dir_all(&source).unwrap();
        (dir, source, target)
    }

    #[test]
    fn test_prepare_derives_in_sorted_order() {
        let (_dir, source, target) = setup();
        fs::write(source.join("b.fasta"), ">b\nG-G\n").unwrap();
        fs::write(source.join("a.fasta"), ">a\nA--A\n").unwrap();

        let prepared = DatasetPreparer::new(&source, &target).prepare().unwrap();

        let names: Vec<_> = prepared.datasets.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["a.fasta", "b.fasta"]);
        assert_eq!(prepared.derived, 2);
        assert_eq!(prepared.reused, 0);

        let a = &prepared.datasets[0];
        assert_eq!(a.reference_path, source.join("a.fasta"));
        assert_eq!(a.unaligned_path, target.join("a.fasta"));
        assert_eq!(fs::read_to_string(&a.unaligned_path).unwrap(), ">a\nAA\n");
    }

    #[test]
    fn test_existing_unaligned_file_reused() {
        let (_dir, source, target) = setup();
        fs::create_dir_all(&target).unwrap();
        fs::write(source.join("d1"), ">x\nA-C\n").unwrap();
        // Deliberately different from what derivation would produce
        fs::write(target.join("d1"), "cached\n").unwrap();

        let prepared = DatasetPreparer::new(&source, &target).prepare().unwrap();

        assert_eq!(prepared.reused, 1);
        assert_eq!(prepared.derived, 0);
        assert_eq!(fs::read_to_string(target.join("d1")).unwrap(), "cached\n");
    }

    #[test]
    fn test_second_run_is_byte_identical() {
        let (_dir, source, target) = setup();
        fs::write(source.join("d1"), ">x\nA-C\n>y\n--GT\n").unwrap();
        let preparer = DatasetPreparer::new(&source, &target);

        let first = preparer.prepare().unwrap();
        let before = fs::read(target.join("d1")).unwrap();
        let second = preparer.prepare().unwrap();
        let after = fs::read(target.join("d1")).unwrap();

        assert_eq!(first.derived, 1);
        assert_eq!(second.derived, 0);
        assert_eq!(second.reused, 1);
        assert_eq!(before, after);
        assert_eq!(first.datasets, second.datasets);
    }

    #[test]
    fn test_malformed_file_does_not_abort_others() {
        let (_dir, source, target) = setup();
        fs::write(source.join("bad"), "not a fasta file\n").unwrap();
        fs::write(source.join("good"), ">g\nA-A\n").unwrap();

        let prepared = DatasetPreparer::new(&source, &target).prepare().unwrap();

        assert_eq!(prepared.datasets.len(), 1);
        assert_eq!(prepared.datasets[0].name, "good");
        assert_eq!(prepared.failures.len(), 1);
        assert_eq!(prepared.failures[0].source, source.join("bad"));
        assert_eq!(prepared.failures[0].name, "bad");
        assert!(!target.join("bad").exists());
    }

    #[test]
    fn test_reserved_name_rejected() {
        let (_dir, source, target) = setup();
        fs::write(source.join("average"), ">a\nAC\n").unwrap();

        let prepared = DatasetPreparer::new(&source, &target).prepare().unwrap();

        assert!(prepared.datasets.is_empty());
        assert!(prepared.failures[0].reason.contains("reserved"));
    }

    #[test]
    fn test_subdirectories_ignored() {
        let (_dir, source, target) = setup();
        fs::create_dir_all(source.join("nested")).unwrap();
        fs::write(source.join("d1"), ">a\nAC\n").unwrap();

        let prepared = DatasetPreparer::new(&source, &target).prepare().unwrap();

        assert_eq!(prepared.datasets.len(), 1);
        assert!(prepared.failures.is_empty());
    }

    #[test]
    fn test_missing_source_dir_is_fatal() {
        let (dir, _source, target) = setup();
        let result = DatasetPreparer::new(dir.path().join("missing"), &target).prepare();

        match result {
            Err(BenchError::DatasetPreparation(msg)) => {
                assert!(msg.contains("cannot read source directory"))
            }
            other => panic!("Expected DatasetPreparation error, got {:?}", other),
        }
    }
}
