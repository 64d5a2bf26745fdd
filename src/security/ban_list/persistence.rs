//! Ban file persistence.
//!
//! The file holds the exported record list as JSON and is replaced
//! atomically (temp file + rename).

use super::{BanList, BanRecord};
use crate::error::BanError;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

const FILE_VERSION: u32 = 1;

/// On-disk layout of the ban file.
#[derive(Debug, Serialize, Deserialize)]
struct BanFile {
    version: u32,
    bans: Vec<BanRecord>,
}

/// Write records to `path`, replacing any previous file.
pub fn save_records(records: Vec<BanRecord>, path: &Path) -> Result<(), BanError> {
    let state = BanFile {
        version: FILE_VERSION,
        bans: records,
    };

    let temp_path = path.with_extension("json.tmp");
    let file = File::create(&temp_path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &state)?;
    writer.flush()?;

    fs::rename(&temp_path, path)?;

    debug!(path = %path.display(), count = state.bans.len(), "Ban list saved");
    Ok(())
}

/// Read the records stored in `path`.
pub fn load_records(path: &Path) -> Result<Vec<BanRecord>, BanError> {
    let file = File::open(path)?;
    let state: BanFile = serde_json::from_reader(BufReader::new(file))?;
    if state.version != FILE_VERSION {
        return Err(BanError::UnsupportedVersion(state.version));
    }
    Ok(state.bans)
}

/// Where an unreadable ban file is moved: `<path>.bad`.
pub fn quarantine_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".bad");
    PathBuf::from(name)
}

impl BanList {
    /// Load the ban list from disk. A missing file gives an empty list;
    /// any other read or decode failure is returned.
    ///
    /// Records that fail to decode are skipped with a warning.
    pub fn load<P: AsRef<Path>>(path: P, default_duration: u32) -> Result<Self, BanError> {
        let path = path.as_ref();
        let mut list = Self::new(default_duration);

        let records = match load_records(path) {
            Ok(records) => records,
            Err(BanError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                info!(path = %path.display(), "Ban file not found, starting empty");
                return Ok(list);
            }
            Err(e) => return Err(e),
        };

        for (index, record) in records.iter().enumerate() {
            if let Err(e) = list.import_record(record) {
                warn!(
                    path = %path.display(),
                    index,
                    code = e.error_code(),
                    error = %e,
                    "Skipping bad ban record"
                );
            }
        }

        info!(path = %path.display(), bans = list.len(), "Ban list loaded");
        Ok(list)
    }

    /// Like [`load`](Self::load), but a file that can be read and not
    /// decoded is moved to [`quarantine_path`] and an empty list returned,
    /// so a later save cannot overwrite it. I/O errors are still returned.
    pub fn load_or_quarantine<P: AsRef<Path>>(
        path: P,
        default_duration: u32,
    ) -> Result<Self, BanError> {
        let path = path.as_ref();
        match Self::load(path, default_duration) {
            Err(e @ (BanError::Json(_) | BanError::UnsupportedVersion(_))) => {
                let bad = quarantine_path(path);
                fs::rename(path, &bad)?;
                error!(
                    path = %path.display(),
                    moved_to = %bad.display(),
                    code = e.error_code(),
                    error = %e,
                    "Unreadable ban file moved aside, starting empty"
                );
                Ok(Self::new(default_duration))
            }
            other => other,
        }
    }

    /// Save the ban list to disk.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), BanError> {
        save_records(self.export_all(), path.as_ref())
    }
}
