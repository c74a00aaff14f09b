//! Persisting eigen-decompositions between runs.
//!
//! The decomposition is the expensive part of spectral clustering, and it only
//! depends on the similarity matrix and the Laplacian. A cache lets repeated
//! runs (e.g. trying different choosers or inner clusterers) skip it.
//!
//! Caches do no locking; concurrent runs sharing one location must be
//! serialised by the caller.

use crate::eigen::EigenDecomposition;
use crate::Result;
use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info};

/// Storage for a single eigen-decomposition.
pub trait EigenCache {
    /// The stored decomposition, or `None` if nothing is stored yet.
    fn load(&self) -> Result<Option<EigenDecomposition>>;

    /// Replace the stored decomposition.
    fn store(&self, decomposition: &EigenDecomposition) -> Result<()>;
}

/// A bincode file at a fixed path.
///
/// A missing file is a miss. Any other read failure, a file that does not
/// decode, or a failed write is an error.
#[derive(Debug, Clone)]
pub struct FileEigenCache {
    path: PathBuf,
}

impl FileEigenCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EigenCache for FileEigenCache {
    fn load(&self) -> Result<Option<EigenDecomposition>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no cached decomposition");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        let decomposition: EigenDecomposition = bincode::deserialize_from(BufReader::new(file))?;
        info!(path = %self.path.display(), pairs = decomposition.len(), "loaded cached decomposition");
        Ok(Some(decomposition))
    }

    fn store(&self, decomposition: &EigenDecomposition) -> Result<()> {
        let mut out = BufWriter::new(File::create(&self.path)?);
        bincode::serialize_into(&mut out, decomposition)?;
        out.flush()?;
        info!(path = %self.path.display(), pairs = decomposition.len(), "stored decomposition");
        Ok(())
    }
}

/// In-process cache, mostly for tests and for reusing a decomposition within
/// one program.
#[derive(Debug, Default)]
pub struct MemoryEigenCache {
    slot: Mutex<Option<EigenDecomposition>>,
}

impl MemoryEigenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// A cache pre-filled with `decomposition`.
    pub fn with(decomposition: EigenDecomposition) -> Self {
        Self {
            slot: Mutex::new(Some(decomposition)),
        }
    }
}

impl EigenCache for MemoryEigenCache {
    fn load(&self) -> Result<Option<EigenDecomposition>> {
        Ok(self.slot.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn store(&self, decomposition: &EigenDecomposition) -> Result<()> {
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = Some(decomposition.clone());
        Ok(())
    }
}

impl<T: EigenCache + ?Sized> EigenCache for &T {
    fn load(&self) -> Result<Option<EigenDecomposition>> {
        (**self).load()
    }

    fn store(&self, decomposition: &EigenDecomposition) -> Result<()> {
        (**self).store(decomposition)
    }
}
