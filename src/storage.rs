//! # Almacenamiento de Archivos
//! src/storage.rs
//!
//! Directorio configurado (`--directory`) donde viven los archivos de
//! `/files/<name>`. Todas las lecturas y escrituras pasan por un único
//! `Mutex<()>` (el guard de archivos): dos requests a archivos distintos
//! también se serializan.
//!
//! Los nombres con `..`, `/`, `\` o NUL se rechazan antes de tocar el
//! disco, así un request nunca sale del directorio configurado.

use crate::error::{Result, ServerError};
use std::fs::{self, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

/// Archivos servidos por los endpoints `/files`
#[derive(Debug)]
pub struct FileStore {
    /// Directorio raíz
    root: PathBuf,

    /// Guard global de archivos
    guard: Mutex<()>,
}

impl FileStore {
    /// Crea el store sin tocar el disco
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            guard: Mutex::new(()),
        }
    }

    /// Crea el directorio raíz si no existe
    pub fn ensure_root(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.root)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resuelve `name` dentro del directorio raíz
    pub fn resolve(&self, name: &str) -> Result<PathBuf> {
        validate_name(name)?;
        Ok(self.root.join(name))
    }

    /// Lee el archivo completo bajo el guard
    pub fn read(&self, name: &str) -> Result<Vec<u8>> {
        let path = self.resolve(name)?;
        let _lock = self.lock();

        let mut contents = Vec::new();
        fs::File::open(&path)
            .and_then(|mut file| file.read_to_end(&mut contents))
            .map_err(|source| ServerError::Resource { path: path.clone(), source })?;

        debug!(path = %path.display(), bytes = contents.len(), "archivo leído");
        Ok(contents)
    }

    /// Escribe `contents` bajo el guard, creando o truncando el archivo
    pub fn write(&self, name: &str, contents: &[u8]) -> Result<()> {
        let path = self.resolve(name)?;
        let _lock = self.lock();

        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .and_then(|mut file| {
                file.write_all(contents)?;
                file.flush()
            })
            .map_err(|source| ServerError::Resource { path: path.clone(), source })?;

        debug!(path = %path.display(), bytes = contents.len(), "archivo escrito");
        Ok(())
    }

    /// Un panic con el lock tomado no deshabilita los endpoints de archivos
    fn lock(&self) -> MutexGuard<'_, ()> {
        self.guard.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Valida que el nombre sea un único componente sin escapes
fn validate_name(name: &str) -> Result<()> {
    if name.is_empty()
        || name.contains("..")
        || name.contains('/')
        || name.contains('\\')
        || name.contains('\0')
    {
        return Err(ServerError::InvalidFileName(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;

    static COUNTER: AtomicUsize = AtomicUsize::new(0);

    fn temp_store() -> FileStore {
        let dir = std::env::temp_dir().join(format!(
            "rio_httpd_storage_{}_{}",
            std::process::id(),
            COUNTER.fetch_add(1, Ordering::SeqCst)
        ));
        let store = FileStore::new(dir);
        store.ensure_root().unwrap();
        store
    }

    #[test]
    fn test_write_then_read() {
        let store = temp_store();
        store.write("notes.txt", b"hello").unwrap();
        assert_eq!(store.read("notes.txt").unwrap(), b"hello");
    }

    #[test]
    fn test_write_truncates_previous_contents() {
        let store = temp_store();
        store.write("a", b"long contents").unwrap();
        store.write("a", b"short").unwrap();
        assert_eq!(store.read("a").unwrap(), b"short");
    }

    #[test]
    fn test_read_missing_file() {
        let store = temp_store();
        let err = store.read("missing").unwrap_err();
        assert!(matches!(err, ServerError::Resource { .. }));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_rejects_traversal() {
        let store = temp_store();
        for name in ["", "..", "../etc/passwd", "a/b", "a\\b", "x\0y"] {
            assert!(
                matches!(store.read(name), Err(ServerError::InvalidFileName(_))),
                "{:?} should be rejected",
                name
            );
        }
    }

    #[test]
    fn test_write_into_missing_root_fails() {
        let store = FileStore::new(std::env::temp_dir().join("rio_httpd_no_such_dir/nested"));
        let err = store.write("a", b"x").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_concurrent_writes_to_different_files() {
        let store = Arc::new(temp_store());
        let payload_a = vec![b'a'; 64 * 1024];
        let payload_b = vec![b'b'; 64 * 1024];

        let handles: Vec<_> = [("file_a", payload_a.clone()), ("file_b", payload_b.clone())]
            .into_iter()
            .map(|(name, payload)| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for _ in 0..20 {
                        store.write(name, &payload).unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.read("file_a").unwrap(), payload_a);
        assert_eq!(store.read("file_b").unwrap(), payload_b);
    }

    #[test]
    fn test_poisoned_guard_is_recovered() {
        let store = Arc::new(temp_store());

        let poisoner = Arc::clone(&store);
        let _ = thread::spawn(move || {
            let _lock = poisoner.guard.lock().unwrap();
            panic!("panic con el guard tomado");
        })
        .join();

        store.write("after_panic", b"ok").unwrap();
        assert_eq!(store.read("after_panic").unwrap(), b"ok");
    }
}
