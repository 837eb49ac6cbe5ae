// Lap collection export and import. The engine treats the file content as an
// opaque ordered sequence of laps; the blob format belongs to this module.

use std::io;
use std::path::{Path, PathBuf};

use lap_core::model::Lap;

use crate::constants::{LAP_FILE_EXT, LAP_FILE_PREFIX};
use crate::utils::now_epoch_ms;

pub async fn save_laps(data_dir: &Path, laps: &[Lap]) -> io::Result<PathBuf> {
    tokio::fs::create_dir_all(data_dir).await?;
    let path = data_dir.join(format!(
        "{}{}.{}",
        LAP_FILE_PREFIX,
        now_epoch_ms(),
        LAP_FILE_EXT
    ));
    let blob = serde_json::to_vec(laps)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
    tokio::fs::write(&path, blob).await?;
    Ok(path)
}

pub async fn load_laps(path: &Path) -> io::Result<Vec<Lap>> {
    let blob = tokio::fs::read(path).await?;
    serde_json::from_slice(&blob).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
}

/// Saved lap files under the data dir, newest name last. Missing dir is an
/// empty listing, not an error.
pub async fn list_lap_files(data_dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let Ok(mut entries) = tokio::fs::read_dir(data_dir).await else {
        return files;
    };
    while let Ok(Some(entry)) = entries.next_entry().await {
        let path = entry.path();
        let is_lap_file = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(|name| name.starts_with(LAP_FILE_PREFIX))
            .unwrap_or(false)
            && path.extension().and_then(|ext| ext.to_str()) == Some(LAP_FILE_EXT);
        if is_lap_file {
            files.push(path);
        }
    }
    files.sort();
    files
}
