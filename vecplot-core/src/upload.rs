/// Upload slots and the temporary storage an upload passes through.
///
/// Uploaded bytes are written to a named temporary file, the mesh is loaded
/// from that file, and the file is removed again. Removal happens on every
/// exit path. A failed removal never fails the upload; it is surfaced as a
/// [`ReleaseWarning`] for the front end to show.
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use tempfile::{Builder, TempPath};
use thiserror::Error;

use crate::geometry::Mesh;
use crate::obj::{load_obj_file, ObjError};

/// Errors that prevent an upload from producing a mesh
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("could not stage upload '{name}': {source}")]
    Staging {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not load mesh from '{name}': {source}")]
    Load {
        name: String,
        #[source]
        source: ObjError,
    },
}

/// Non-fatal failure to remove a staged upload
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseWarning {
    pub name: String,
    pub path: PathBuf,
    pub message: String,
}

impl fmt::Display for ReleaseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Error deleting temporary file {} for '{}': {}",
            self.path.display(),
            self.name,
            self.message
        )
    }
}

/// An upload written to temporary storage, removed on release or drop
#[derive(Debug)]
pub struct StagedUpload {
    name: String,
    path: Option<TempPath>,
}

impl StagedUpload {
    /// Write the uploaded bytes to a fresh `.obj` temporary file.
    /// The file handle is closed before returning; only the path is kept.
    pub fn stage(name: &str, bytes: &[u8]) -> Result<Self, UploadError> {
        let staging_error = |source| UploadError::Staging {
            name: name.to_string(),
            source,
        };

        let mut file = Builder::new()
            .prefix("vecplot-")
            .suffix(".obj")
            .tempfile()
            .map_err(staging_error)?;
        file.write_all(bytes).map_err(staging_error)?;
        file.flush().map_err(staging_error)?;

        let path = file.into_temp_path();
        debug!("Staged upload '{}' at {}", name, path.display());
        Ok(Self {
            name: name.to_string(),
            path: Some(path),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Location of the staged file, `None` once released
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn load(&self) -> Result<Mesh, UploadError> {
        let load_error = |source| UploadError::Load {
            name: self.name.clone(),
            source,
        };

        match self.path() {
            Some(path) => load_obj_file(path).map_err(load_error),
            None => Err(load_error(ObjError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "staged upload was already released",
            )))),
        }
    }

    /// Remove the staged file. Returns a warning instead of failing.
    pub fn release(mut self) -> Option<ReleaseWarning> {
        self.release_inner()
    }

    fn release_inner(&mut self) -> Option<ReleaseWarning> {
        let path = self.path.take()?;
        let location = path.to_path_buf();
        match path.close() {
            Ok(()) => {
                debug!("Released staged upload {}", location.display());
                None
            }
            Err(err) => {
                let warning = ReleaseWarning {
                    name: self.name.clone(),
                    path: location,
                    message: err.to_string(),
                };
                warn!("{}", warning);
                Some(warning)
            }
        }
    }
}

impl Drop for StagedUpload {
    fn drop(&mut self) {
        self.release_inner();
    }
}

/// A mesh that made it through staging, with any release warning
#[derive(Debug)]
pub struct LoadedUpload {
    pub name: String,
    pub mesh: Mesh,
    pub warning: Option<ReleaseWarning>,
}

/// Stage uploaded bytes, load the mesh, and release the staging file.
///
/// The staging file is released whether or not loading succeeds. When
/// loading fails the load error wins and the release warning is only logged.
pub fn stage_and_load(name: &str, bytes: &[u8]) -> Result<LoadedUpload, UploadError> {
    let staged = StagedUpload::stage(name, bytes)?;
    let loaded = staged.load();
    finish(staged, loaded)
}

/// Release the staging file and pair its warning with the load result
fn finish(staged: StagedUpload, loaded: Result<Mesh, UploadError>) -> Result<LoadedUpload, UploadError> {
    let name = staged.name().to_string();
    let warning = staged.release();

    let mesh = loaded?;
    Ok(LoadedUpload {
        name,
        mesh,
        warning,
    })
}

/// The two upload slots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadSlot {
    Mesh1,
    Mesh2,
}

impl UploadSlot {
    pub fn label(self) -> &'static str {
        match self {
            UploadSlot::Mesh1 => "mesh 1",
            UploadSlot::Mesh2 => "mesh 2",
        }
    }
}

/// Meshes currently loaded into the two slots
#[derive(Debug, Default)]
pub struct Uploads {
    mesh1: Option<Mesh>,
    mesh2: Option<Mesh>,
    warnings: Vec<ReleaseWarning>,
}

impl Uploads {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot_mut(&mut self, slot: UploadSlot) -> &mut Option<Mesh> {
        match slot {
            UploadSlot::Mesh1 => &mut self.mesh1,
            UploadSlot::Mesh2 => &mut self.mesh2,
        }
    }

    /// Run an upload through staging into a slot. A failed upload empties
    /// the slot so a stale mesh is never plotted under a new file's name.
    pub fn accept(&mut self, slot: UploadSlot, name: &str, bytes: &[u8]) -> Result<(), UploadError> {
        self.store(slot, stage_and_load(name, bytes))
    }

    fn store(&mut self, slot: UploadSlot, result: Result<LoadedUpload, UploadError>) -> Result<(), UploadError> {
        match result {
            Ok(loaded) => {
                self.warnings.extend(loaded.warning);
                *self.slot_mut(slot) = Some(loaded.mesh);
                Ok(())
            }
            Err(err) => {
                *self.slot_mut(slot) = None;
                Err(err)
            }
        }
    }

    /// Place an already-loaded mesh into a slot
    pub fn set(&mut self, slot: UploadSlot, mesh: Mesh) {
        *self.slot_mut(slot) = Some(mesh);
    }

    pub fn clear(&mut self, slot: UploadSlot) {
        *self.slot_mut(slot) = None;
    }

    pub fn mesh(&self, slot: UploadSlot) -> Option<&Mesh> {
        match slot {
            UploadSlot::Mesh1 => self.mesh1.as_ref(),
            UploadSlot::Mesh2 => self.mesh2.as_ref(),
        }
    }

    /// Both meshes, only when both slots are filled
    pub fn both(&self) -> Option<(&Mesh, &Mesh)> {
        Some((self.mesh1.as_ref()?, self.mesh2.as_ref()?))
    }

    pub fn warnings(&self) -> &[ReleaseWarning] {
        &self.warnings
    }

    /// Hand accumulated warnings to the caller, clearing them
    pub fn take_warnings(&mut self) -> Vec<ReleaseWarning> {
        std::mem::take(&mut self.warnings)
    }
}
