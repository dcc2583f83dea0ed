//! Output sinks for serialized units.
//!
//! This module provides the [`Emitter`] trait implemented by every sink
//! kind. It is the final stage in the tsexplode pipeline.
//!
//! # Pipeline Position
//!
//! ```text
//! Source Units
//!     ↓ parse + elaborate
//! Type Graph
//!     ↓ discover + select
//! Entries
//!     ↓ flatten + render
//! Serialized Units
//!     ↓ emit (this module)
//! Output Files
//! ```
//!
//! # Available Sinks
//!
//! - [`FileEmitter`] writes one file per unit into an output directory.
//! - [`MemoryEmitter`] keeps units in memory, in emission order.
//!
//! # Error Handling
//!
//! Emit operations return [`Error`], which converts into
//! [`ExplodeError::Export`](crate::ExplodeError::Export) at the crate
//! boundary.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use log::debug;
use thiserror::Error;

/// A sink that stores serialized output units by name.
pub trait Emitter {
    /// Returns `true` if a unit named `name` is already present in the sink.
    fn exists(&self, name: &str) -> bool;

    /// Stores `contents` under `name`, replacing any previous unit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the sink cannot be written.
    fn emit(&mut self, name: &str, contents: &str) -> Result<(), Error>;
}

/// Errors that can occur while emitting output units.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to write `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Writes each unit to `<out_dir>/<name>.<extension>`.
///
/// The output directory is created on the first write.
#[derive(Debug)]
pub struct FileEmitter {
    out_dir: PathBuf,
    extension: String,
}

impl FileEmitter {
    pub fn new(out_dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            out_dir: out_dir.into(),
            extension: extension.into(),
        }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Returns the file path a unit named `name` is written to.
    pub fn path_for(&self, name: &str) -> PathBuf {
        if self.extension.is_empty() {
            self.out_dir.join(name)
        } else {
            self.out_dir.join(format!("{name}.{}", self.extension))
        }
    }
}

impl Emitter for FileEmitter {
    fn exists(&self, name: &str) -> bool {
        self.path_for(name).exists()
    }

    fn emit(&mut self, name: &str, contents: &str) -> Result<(), Error> {
        fs::create_dir_all(&self.out_dir).map_err(|source| Error::Io {
            path: self.out_dir.clone(),
            source,
        })?;

        let path = self.path_for(name);
        fs::write(&path, contents).map_err(|source| Error::Io {
            path: path.clone(),
            source,
        })?;

        debug!(path = path.display().to_string(), bytes = contents.len(); "Unit written");
        Ok(())
    }
}

/// Keeps units in memory, in the order they were first emitted.
#[derive(Debug, Default)]
pub struct MemoryEmitter {
    units: IndexMap<String, String>,
}

impl MemoryEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the contents of the unit named `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.units.get(name).map(String::as_str)
    }

    pub fn units(&self) -> &IndexMap<String, String> {
        &self.units
    }

    pub fn into_units(self) -> IndexMap<String, String> {
        self.units
    }
}

impl Emitter for MemoryEmitter {
    fn exists(&self, name: &str) -> bool {
        self.units.contains_key(name)
    }

    fn emit(&mut self, name: &str, contents: &str) -> Result<(), Error> {
        self.units.insert(name.to_string(), contents.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_emitter_creates_directory() {
        let temp = tempfile::tempdir().expect("Failed to create temp directory");
        let out_dir = temp.path().join("nested").join("out");
        let mut emitter = FileEmitter::new(&out_dir, "ts");

        assert!(!emitter.exists("Contact-doc"));
        emitter
            .emit("Contact-doc", "export interface Contact {\n}\n")
            .expect("emit should succeed");

        let path = out_dir.join("Contact-doc.ts");
        assert_eq!(emitter.path_for("Contact-doc"), path);
        assert!(emitter.exists("Contact-doc"));
        assert_eq!(
            fs::read_to_string(path).expect("file should exist"),
            "export interface Contact {\n}\n"
        );
    }

    #[test]
    fn test_file_emitter_without_extension() {
        let emitter = FileEmitter::new("out", "");
        assert_eq!(emitter.path_for("Unit"), PathBuf::from("out").join("Unit"));
    }

    #[test]
    fn test_file_emitter_reports_unwritable_target() {
        let temp = tempfile::tempdir().expect("Failed to create temp directory");
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "not a directory").expect("Failed to write blocker");

        let mut emitter = FileEmitter::new(&blocker, "ts");
        let err = emitter.emit("Unit", "").expect_err("emit should fail");
        assert!(matches!(err, Error::Io { ref path, .. } if path == &blocker));
    }

    #[test]
    fn test_memory_emitter_keeps_order_and_replaces() {
        let mut emitter = MemoryEmitter::new();
        emitter.emit("B", "first").unwrap();
        emitter.emit("A", "second").unwrap();
        emitter.emit("B", "third").unwrap();

        let names: Vec<&String> = emitter.units().keys().collect();
        assert_eq!(names, vec!["B", "A"]);
        assert_eq!(emitter.get("B"), Some("third"));
        assert!(emitter.exists("A"));
        assert!(!emitter.exists("C"));
    }
}
