//! Include resolution: turning a file name into a byte stream.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor};
use std::path::{Path, PathBuf};

/// Capability the host supplies to open the root file and every include.
pub trait IncludeResolver {
    /// Open `filename` exactly as it was written in the include directive.
    fn resolve(&self, filename: &str) -> io::Result<Box<dyn BufRead>>;
}

impl<F> IncludeResolver for F
where
    F: Fn(&str) -> io::Result<Box<dyn BufRead>>,
{
    fn resolve(&self, filename: &str) -> io::Result<Box<dyn BufRead>> {
        self(filename)
    }
}

/// Resolves names on the filesystem, relative names against `base_dir`.
#[derive(Debug, Clone)]
pub struct FileResolver {
    base_dir: PathBuf,
}

impl FileResolver {
    /// Create a resolver rooted at `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Path that `filename` resolves to.
    pub fn path_for(&self, filename: &str) -> PathBuf {
        let path = Path::new(filename);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}

impl IncludeResolver for FileResolver {
    fn resolve(&self, filename: &str) -> io::Result<Box<dyn BufRead>> {
        let file = File::open(self.path_for(filename))?;
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Resolves names from an in-memory map. Used for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryResolver {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, builder style.
    pub fn with_file(mut self, name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        self.insert(name, data);
        self
    }

    /// Add or replace a file.
    pub fn insert(&mut self, name: impl Into<String>, data: impl Into<Vec<u8>>) {
        self.files.insert(name.into(), data.into());
    }
}

impl IncludeResolver for MemoryResolver {
    fn resolve(&self, filename: &str) -> io::Result<Box<dyn BufRead>> {
        match self.files.get(filename) {
            Some(data) => Ok(Box::new(Cursor::new(data.clone()))),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{}: no such file", filename),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use super::*;

    #[test]
    fn test_memory_resolver() {
        let resolver = MemoryResolver::new().with_file("a.conf", b"[a]\n".to_vec());
        let mut out = String::new();
        resolver
            .resolve("a.conf")
            .unwrap()
            .read_to_string(&mut out)
            .unwrap();
        assert_eq!(out, "[a]\n");

        let err = resolver.resolve("b.conf").err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_closure_resolver() {
        let resolver = |name: &str| -> io::Result<Box<dyn BufRead>> {
            Ok(Box::new(Cursor::new(format!("; {}\n", name).into_bytes())))
        };
        let mut out = String::new();
        resolver
            .resolve("x.conf")
            .unwrap()
            .read_to_string(&mut out)
            .unwrap();
        assert_eq!(out, "; x.conf\n");
    }

    #[test]
    fn test_file_resolver_paths() {
        let resolver = FileResolver::new("/etc/asterisk");
        assert_eq!(
            resolver.path_for("sip.conf"),
            PathBuf::from("/etc/asterisk/sip.conf")
        );
        assert_eq!(resolver.path_for("/tmp/x.conf"), PathBuf::from("/tmp/x.conf"));
    }
}
