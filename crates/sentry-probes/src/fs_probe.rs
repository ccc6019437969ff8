//! Watches a directory tree for added, deleted, or modified files.
//!
//! Every added, deleted, or modified path gets its own Medium-severity
//! delta every cycle; on top of that, if the *aggregate* rate of change
//! across the cycle crosses a configured percentage of the tracked
//! baseline, one additional High-severity "threshold exceeded" delta is
//! emitted — a single file edit in a directory of thousands should still be
//! recorded, but wiping half of `/etc` should also page someone.

use chrono::Utc;
use sentry_core::{probe::Probe, Alert, Error, Result, Severity};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub size: u64,
    pub mtime: i64,
    pub mode: u32,
    pub hash: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FsObservation {
    pub files: HashMap<PathBuf, FileRecord>,
}

/// A single tracked-path change, or the aggregate/baseline events that
/// accompany a cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum FsDelta {
    Added(PathBuf),
    Deleted(PathBuf),
    Modified(PathBuf),
    /// Emitted in addition to the per-path deltas above when the aggregate
    /// change rate for the cycle meets or exceeds the configured threshold.
    ThresholdExceeded {
        added: usize,
        deleted: usize,
        modified: usize,
        percent_changed: f32,
    },
    /// Emitted instead of per-path deltas on the first sample after a root
    /// appears: there is no prior snapshot to diff against yet.
    BaselineCreated { file_count: usize },
}

fn hash_file(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(format!("{:x}", hasher.finalize()))
}

#[cfg(unix)]
fn file_mode(metadata: &fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode()
}

#[cfg(not(unix))]
fn file_mode(_metadata: &fs::Metadata) -> u32 {
    0
}

fn file_mtime(metadata: &fs::Metadata) -> i64 {
    metadata
        .modified()
        .ok()
        .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Walk `root` and hash every regular file under it.
pub fn snapshot(root: &Path) -> Result<FsObservation> {
    let mut files = HashMap::new();
    for entry in walkdir::WalkDir::new(root).into_iter() {
        let entry = entry.map_err(|err| Error::ProbeSample {
            probe: "fs_probe".into(),
            message: err.to_string(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let metadata = entry.metadata().map_err(|err| Error::ProbeSample {
            probe: "fs_probe".into(),
            message: err.to_string(),
        })?;
        let hash = hash_file(entry.path())?;
        files.insert(
            entry.path().to_path_buf(),
            FileRecord {
                size: metadata.len(),
                mtime: file_mtime(&metadata),
                mode: file_mode(&metadata),
                hash,
            },
        );
    }
    Ok(FsObservation { files })
}

pub struct FsProbe {
    root: PathBuf,
    change_threshold_percent: f32,
    baseline_count: Option<usize>,
}

impl FsProbe {
    pub fn new(root: PathBuf, change_threshold_percent: f32) -> Self {
        Self {
            root,
            change_threshold_percent,
            baseline_count: None,
        }
    }
}

impl Probe for FsProbe {
    type Observation = FsObservation;
    type Delta = FsDelta;

    fn name(&self) -> &'static str {
        "fs_probe"
    }

    fn sample(&mut self) -> Result<Self::Observation> {
        let observation = snapshot(&self.root)?;
        if self.baseline_count.is_none() {
            self.baseline_count = Some(observation.files.len());
        }
        Ok(observation)
    }

    fn diff(&self, previous: Option<&Self::Observation>, current: &Self::Observation) -> Vec<Self::Delta> {
        let Some(previous) = previous else {
            return vec![FsDelta::BaselineCreated {
                file_count: current.files.len(),
            }];
        };

        let added: Vec<PathBuf> = current
            .files
            .keys()
            .filter(|path| !previous.files.contains_key(*path))
            .cloned()
            .collect();
        let deleted: Vec<PathBuf> = previous
            .files
            .keys()
            .filter(|path| !current.files.contains_key(*path))
            .cloned()
            .collect();
        let modified: Vec<PathBuf> = current
            .files
            .iter()
            .filter(|(path, record)| previous.files.get(*path).is_some_and(|prev| prev != *record))
            .map(|(path, _)| path.clone())
            .collect();

        let baseline = self.baseline_count.unwrap_or(previous.files.len()).max(1);
        let percent_changed =
            (added.len() + deleted.len() + modified.len()) as f32 / baseline as f32 * 100.0;

        let mut deltas: Vec<FsDelta> = Vec::new();
        let (added_count, deleted_count, modified_count) = (added.len(), deleted.len(), modified.len());
        deltas.extend(added.into_iter().map(FsDelta::Added));
        deltas.extend(deleted.into_iter().map(FsDelta::Deleted));
        deltas.extend(modified.into_iter().map(FsDelta::Modified));

        if percent_changed >= self.change_threshold_percent {
            deltas.push(FsDelta::ThresholdExceeded {
                added: added_count,
                deleted: deleted_count,
                modified: modified_count,
                percent_changed,
            });
        }

        deltas
    }

    fn classify(&self, delta: &Self::Delta) -> Alert {
        match delta {
            FsDelta::Added(path) => Alert::new(
                Severity::Medium,
                self.name(),
                format!("Archivo añadido en {}", self.root.display()),
                format!("Añadido: {}", path.display()),
                Utc::now(),
            ),
            FsDelta::Deleted(path) => Alert::new(
                Severity::Medium,
                self.name(),
                format!("Archivo eliminado en {}", self.root.display()),
                format!("Eliminado: {}", path.display()),
                Utc::now(),
            ),
            FsDelta::Modified(path) => Alert::new(
                Severity::Medium,
                self.name(),
                format!("Archivo modificado en {}", self.root.display()),
                format!("Modificado: {}", path.display()),
                Utc::now(),
            ),
            FsDelta::ThresholdExceeded { added, deleted, modified, percent_changed } => Alert::new(
                Severity::High,
                self.name(),
                format!("Cambios masivos en {}", self.root.display()),
                format!(
                    "{}: {} añadidos, {} eliminados, {} modificados ({:.1}% del total)",
                    self.root.display(),
                    added,
                    deleted,
                    modified,
                    percent_changed
                ),
                Utc::now(),
            ),
            FsDelta::BaselineCreated { file_count } => Alert::new(
                Severity::Low,
                self.name(),
                format!("Línea base creada en {}", self.root.display()),
                format!("Línea base creada con {file_count} archivos"),
                Utc::now(),
            ),
        }
    }
}
