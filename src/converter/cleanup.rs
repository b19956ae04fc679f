//! Removal of destination files a run did not produce.

use std::collections::BTreeSet;
use std::path::{
    Path,
    PathBuf,
};

use crate::error::{
    Result,
    SyncError,
};
use crate::scan;

/// Deletes every regular file directly in `dir` whose name is not in
/// `keep`. Subdirectories are left alone. Returns the removed paths.
pub(super) fn remove_obsolete_files(dir: &Path, keep: &BTreeSet<String>) -> Result<Vec<PathBuf>> {
    let mut removed = Vec::new();
    for path in scan::files_in(dir) {
        let Some(name) = path.file_name().map(|name| name.to_string_lossy().into_owned()) else {
            continue;
        };
        if keep.contains(&name) {
            continue;
        }

        tracing::debug!(path = %path.display(), "Deleting obsolete file");
        std::fs::remove_file(&path).map_err(|e| SyncError::io(&path, e))?;
        removed.push(path);
    }
    Ok(removed)
}
