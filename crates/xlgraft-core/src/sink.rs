//! Destinations for finished packages.

use crate::error::Result;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Somewhere to put named output files.
pub trait OutputSink {
    fn write(&mut self, name: &str, bytes: &[u8]) -> Result<()>;
}

/// Writes files under one directory, creating it on the first write.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    root: PathBuf,
}

impl DirectorySink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path `name` will be written to.
    pub fn path_of(&self, name: &str) -> Result<PathBuf> {
        let relative = Path::new(name);
        let plain = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if name.is_empty() || !plain {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("output name '{}' must be a relative path inside the sink", name),
            )
            .into());
        }
        Ok(self.root.join(relative))
    }
}

impl OutputSink for DirectorySink {
    fn write(&mut self, name: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path_of(name)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, bytes)?;
        log::info!("wrote {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }
}

/// Keeps outputs in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub files: BTreeMap<String, Vec<u8>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.files.get(name).map(Vec::as_slice)
    }
}

impl OutputSink for MemorySink {
    fn write(&mut self, name: &str, bytes: &[u8]) -> Result<()> {
        self.files.insert(name.to_string(), bytes.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GraftError;

    #[test]
    fn memory_sink_keeps_last_write() {
        let mut sink = MemorySink::new();
        sink.write("a.xlsx", b"one").unwrap();
        sink.write("a.xlsx", b"two").unwrap();
        assert_eq!(sink.get("a.xlsx"), Some(&b"two"[..]));
        assert_eq!(sink.files.len(), 1);
    }

    #[test]
    fn directory_sink_creates_its_directory_lazily() {
        let root = std::env::temp_dir().join(format!("xlgraft-sink-{}", std::process::id()));
        let _ = fs::remove_dir_all(&root);

        let mut sink = DirectorySink::new(&root);
        assert!(!root.exists());
        sink.write("out/book.xlsx", b"PK").unwrap();
        assert_eq!(fs::read(root.join("out/book.xlsx")).unwrap(), b"PK");

        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn directory_sink_rejects_escaping_names() {
        let sink = DirectorySink::new("unused");
        for name in ["../x.xlsx", "/etc/x.xlsx", "a/../../x.xlsx", ""] {
            let err = sink.path_of(name).unwrap_err();
            assert!(matches!(err, GraftError::Io(_)), "{name}");
        }
        assert!(sink.path_of("fine.xlsx").is_ok());
    }
}
