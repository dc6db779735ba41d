//! Shared test helpers for integration tests
//!
//! This module provides common utilities used across all test files.

#![allow(dead_code)]

use assert_cmd::cargo;
use assert_cmd::Command;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to get a uniform-request command isolated from user config
pub fn uniform_request() -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("uniform-request"));
    cmd.env_remove("UNIFORM_REQUEST_MASTER_DIR")
        .env_remove("UNIFORM_REQUEST_EXPORT_DIR")
        .env_remove("RUST_LOG");
    cmd
}

/// Write the standard fixture master tables into `dir`
///
/// Both uniforms under "Summer" offer a size "M", so size resolution must
/// follow the selected uniform.
pub fn write_master_files(dir: &Path) {
    fs::create_dir_all(dir).unwrap();
    fs::write(
        dir.join("applicant_name.csv"),
        "ap_id,ap_name\n1,Tanaka\n2,Sato\n",
    )
    .unwrap();
    fs::write(
        dir.join("locations.csv"),
        "location_id,location_name\n10,HQ\n20,Osaka\n",
    )
    .unwrap();
    fs::write(
        dir.join("pattern.csv"),
        "pattern_id,pattern_name\n1,Summer\n2,Winter\n",
    )
    .unwrap();
    fs::write(
        dir.join("uniforms.csv"),
        "uniform_id,uniform_name,pattern_id\n100,Shirt-M,1\n101,Polo,1\n200,Jacket,2\n",
    )
    .unwrap();
    fs::write(
        dir.join("size.csv"),
        "size_id,size_name,uniform_id\n1000,M,100\n1001,L,100\n1010,M,101\n2000,L,200\n",
    )
    .unwrap();
}

/// Temp directory with master files under `files/` (the default location)
pub fn setup_workspace() -> TempDir {
    let tmp = TempDir::new().unwrap();
    write_master_files(&tmp.path().join("files"));
    tmp
}

/// Write a replay script into the workspace and return its file name
pub fn write_script(tmp: &TempDir, name: &str, yaml: &str) -> String {
    fs::write(tmp.path().join(name), yaml).unwrap();
    name.to_string()
}

/// Exported CSV files in `dir`, sorted by name
pub fn exported_files(dir: &Path) -> Vec<std::path::PathBuf> {
    let mut files: Vec<_> = fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("uniform_request_") && n.ends_with(".csv"))
        })
        .collect();
    files.sort();
    files
}
