// src/output.rs
//! Delivering the generated file: stdout, an atomically replaced file, or a
//! comparison against the file on disk.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::errors::OutputError;

/// Text of a generated file and where it belongs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub text: String,
    /// `None` means stdout
    pub destination: Option<PathBuf>,
}

impl Artifact {
    /// Write the artifact to its destination.
    pub fn write(&self) -> Result<(), OutputError> {
        match &self.destination {
            None => self.write_to(&mut io::stdout().lock()),
            Some(path) => write_atomic(path, &self.text),
        }
    }

    /// Write the text to `out`, flushing it.
    pub fn write_to(&self, out: &mut impl Write) -> Result<(), OutputError> {
        out.write_all(self.text.as_bytes())
            .and_then(|()| out.flush())
            .map_err(|source| OutputError::Stdout { source })
    }

    /// Succeed only if the destination already holds exactly this text.
    /// An artifact bound for stdout has nothing to compare against.
    #[tracing::instrument(skip_all, fields(destination = ?self.destination))]
    pub fn check(&self) -> Result<(), OutputError> {
        let Some(path) = &self.destination else {
            return Ok(());
        };
        let existing = match fs::read(path) {
            Ok(existing) => existing,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(OutputError::Missing {
                    path: path.display().to_string(),
                });
            }
            Err(source) => {
                return Err(OutputError::Write {
                    path: path.display().to_string(),
                    source,
                });
            }
        };
        if existing != self.text.as_bytes() {
            tracing::debug!("generated file differs");
            return Err(OutputError::Stale {
                path: path.display().to_string(),
            });
        }
        Ok(())
    }
}

/// Write `text` to a temporary file beside `path`, then rename it over
/// `path`.
#[tracing::instrument(skip(text), fields(bytes = text.len()))]
fn write_atomic(path: &Path, text: &str) -> Result<(), OutputError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = tempfile::Builder::new()
        .prefix(".middlewarer")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|source| OutputError::CreateTemp {
            dir: dir.display().to_string(),
            source,
        })?;
    file.write_all(text.as_bytes())
        .and_then(|()| file.flush())
        .map_err(|source| OutputError::Write {
            path: file.path().display().to_string(),
            source,
        })?;
    file.persist(path).map_err(|e| OutputError::Persist {
        path: path.display().to_string(),
        source: e.error,
    })?;
    tracing::debug!(path = %path.display(), "wrote generated file");
    Ok(())
}
