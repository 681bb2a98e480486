#![allow(dead_code)]
//! Common test utilities for msa-bench integration tests
//!
//! External aligners and the scorer are replaced by small shell scripts so
//! the whole pipeline can run without any real bioinformatics software.

use msa_bench::core::config::Config;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Scorer stand-in: SP-score 1.0 for the reference named "d1",
/// 0.5 otherwise. Arguments arrive as `-r <reference> -e <estimate>`.
pub const FAKE_SCORER: &str = r#"#!/bin/sh
case "$2" in
  */d1) sp=1.0 ;;
  *) sp=0.5 ;;
esac
printf 'SP-Score %s\nModeler 0.9\nSPFN 0.1\nSPFP 0.2\nCompression naive\nTC 0.7\n' "$sp"
"#;

/// Scorer stand-in whose report is too short to parse
pub const TRUNCATED_SCORER: &str = "#!/bin/sh\nprintf 'SP-Score 0.9\\nModeler 0.9\\n'\n";

/// Aligner stand-in printing its last argument's contents to stdout
pub const STDOUT_ALIGNER: &str = "#!/bin/sh\nfor last; do :; done\ncat \"$last\"\n";

/// Aligner stand-in for `-in <input> -out <output>` style tools
pub const FILE_ALIGNER: &str = "#!/bin/sh\ncp \"$2\" \"$4\"\n";

/// Aligner stand-in that exits successfully without writing anything
pub const SILENT_ALIGNER: &str = "#!/bin/sh\nexit 0\n";

/// Test environment mirroring the default directory layout in a temp dir
pub struct TestEnvironment {
    pub temp_dir: TempDir,
    pub config: Config,
}

impl TestEnvironment {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path();

        let mut config = Config::default();
        config.paths.source_dir = root.join("source");
        config.paths.unaligned_dir = root.join("unaligned");
        config.paths.software_dir = root.join("software");
        config.paths.results_dir = root.join("results");
        fs::create_dir_all(&config.paths.source_dir).expect("Failed to create source dir");

        let scorer = root.join("bin").join("fastsp");
        write_script(&scorer, FAKE_SCORER);
        config.scorer.program = scorer;
        config.scorer.args = Some(Vec::new());

        TestEnvironment { temp_dir, config }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Add a reference alignment to the source directory
    pub fn add_reference(&self, name: &str, content: &str) -> PathBuf {
        let path = self.config.paths.source_dir.join(name);
        fs::write(&path, content).expect("Failed to write reference");
        path
    }

    /// Install a fake executable at `relative` under the software directory
    pub fn install_tool(&self, relative: &str, script: &str) -> PathBuf {
        let path = self.config.paths.software_dir.join(relative);
        write_script(&path, script);
        path
    }

    pub fn use_scorer(&mut self, script: &str) {
        let path = self.root().join("bin").join("alt_scorer");
        write_script(&path, script);
        self.config.scorer.program = path;
    }

    pub fn report_path(&self) -> PathBuf {
        self.config.paths.report_file()
    }

    /// Persist the configuration as TOML for binary-level tests
    pub fn write_config(&self) -> PathBuf {
        let path = self.root().join("msa-bench.toml");
        msa_bench::core::config::save_config(&path, &self.config).expect("Failed to save config");
        path
    }
}

pub fn write_script(path: &Path, body: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create script dir");
    }
    fs::write(path, body).expect("Failed to write script");
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
        .expect("Failed to make script executable");
}

/// Two small protein reference alignments
pub fn sample_references(env: &TestEnvironment) {
    env.add_reference("d1", ">s1\nMK-V\n>s2\nM-KV\n");
    env.add_reference("d2", ">s1\nAC--GT\n>s2\nACG-GT\n");
}
