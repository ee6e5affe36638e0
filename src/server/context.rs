//! # Contexto Compartido
//! src/server/context.rs
//!
//! Estado que comparten todos los workers: el store de archivos (con su
//! guard) y los límites de lectura. Se construye una vez y se comparte
//! como `Arc<ServerContext>`; no hay estado global implícito.

use crate::config::Config;
use crate::http::Limits;
use crate::rio::DEFAULT_BUFFER_SIZE;
use crate::storage::FileStore;

/// Contexto de solo lectura (salvo el guard de archivos)
#[derive(Debug)]
pub struct ServerContext {
    storage: FileStore,
    limits: Limits,
    buffer_size: usize,
}

impl ServerContext {
    pub fn new(storage: FileStore, limits: Limits, buffer_size: usize) -> Self {
        Self {
            storage,
            limits,
            buffer_size,
        }
    }

    /// Construye el contexto desde la configuración del CLI
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            FileStore::new(&config.directory),
            config.limits(),
            config.buffer_size,
        )
    }

    pub fn storage(&self) -> &FileStore {
        &self.storage
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    /// Capacidad del `RioReader` de cada conexión
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Contexto con un directorio temporal propio, para tests
    #[cfg(test)]
    pub(crate) fn for_tests() -> Self {
        use std::sync::atomic::{AtomicUsize, Ordering};

        static COUNTER: AtomicUsize = AtomicUsize::new(0);

        let dir = std::env::temp_dir().join(format!(
            "rio_httpd_ctx_{}_{}",
            std::process::id(),
            COUNTER.fetch_add(1, Ordering::SeqCst)
        ));
        let storage = FileStore::new(dir);
        storage.ensure_root().expect("temp dir");

        Self::new(storage, Limits::default(), DEFAULT_BUFFER_SIZE)
    }
}

impl Default for ServerContext {
    fn default() -> Self {
        Self::new(FileStore::new("./files"), Limits::default(), DEFAULT_BUFFER_SIZE)
    }
}
