//! Artifact and binary discovery

use crate::error::{CoverageError, CoverageResult};
use std::io;
use std::path::{Path, PathBuf};

/// Find raw profiling fragments by extension in `dir`, sorted
///
/// Only direct children are considered; the toolchain writes fragments flat
/// into the working directory.
pub fn find_fragments(dir: &Path, extension: &str) -> io::Result<Vec<PathBuf>> {
    let mut fragments = Vec::new();
    for entry in std::fs::read_dir(dir)?.flatten() {
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == extension) {
            fragments.push(path);
        }
    }
    fragments.sort();
    Ok(fragments)
}

/// Find compiled test binaries matching `pattern`, filtered to executables,
/// sorted
pub fn find_test_binaries(pattern: &str) -> CoverageResult<Vec<PathBuf>> {
    let paths = glob::glob(pattern).map_err(|e| {
        CoverageError::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid binary glob {pattern}: {e}"),
        ))
    })?;

    let mut binaries: Vec<PathBuf> = paths.flatten().filter(|p| is_executable(p)).collect();
    binaries.sort();
    Ok(binaries)
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(windows)]
fn is_executable(path: &Path) -> bool {
    path.is_file() && path.extension().is_some_and(|ext| ext == "exe")
}

#[cfg(not(any(unix, windows)))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
