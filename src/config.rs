//! # Configuración del Servidor
//! src/config.rs
//!
//! Configuración del servidor con soporte para argumentos CLI y variables
//! de entorno.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./rio_httpd --directory /tmp/files \
//!   --port 4221 \
//!   --workers 4 \
//!   --queue-capacity 16
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! HTTP_PORT=8080 FILES_DIR=/srv/files ./rio_httpd
//! ```

use crate::http::Limits;
use clap::Parser;
use std::time::Duration;
use tracing::info;

/// Configuración del servidor HTTP/1.1
#[derive(Debug, Clone, Parser)]
#[command(name = "rio_httpd")]
#[command(about = "Servidor HTTP/1.1 con pool fijo de workers y cola acotada de conexiones")]
#[command(version = "0.1.0")]
pub struct Config {
    /// Puerto en el que escucha el servidor
    #[arg(short, long, default_value = "4221", env = "HTTP_PORT")]
    pub port: u16,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "0.0.0.0", env = "HTTP_HOST")]
    pub host: String,

    /// Directorio donde se guardan/leen los archivos de /files
    #[arg(long, default_value = "./files", env = "FILES_DIR")]
    pub directory: String,

    // === Concurrencia ===

    /// Número de workers del pool
    #[arg(long, default_value = "4", env = "WORKERS")]
    pub workers: usize,

    /// Conexiones aceptadas que pueden esperar a un worker
    #[arg(long = "queue-capacity", default_value = "16", env = "QUEUE_CAPACITY")]
    pub queue_capacity: usize,

    // === Límites del request ===

    /// Capacidad del buffer interno de lectura
    #[arg(long = "buffer-size", default_value = "8192", env = "READ_BUFFER_SIZE")]
    pub buffer_size: usize,

    /// Longitud máxima de la request line y de cada header (bytes)
    #[arg(long = "max-line", default_value = "8192", env = "MAX_LINE")]
    pub max_line: usize,

    /// Número máximo de headers por request
    #[arg(long = "max-headers", default_value = "64", env = "MAX_HEADERS")]
    pub max_headers: usize,

    /// Content-Length máximo aceptado (bytes)
    #[arg(long = "max-body", default_value = "10485760", env = "MAX_BODY")]
    pub max_body: usize,

    // === Timeouts ===

    /// Timeout de lectura del socket en milisegundos (0 = sin timeout)
    #[arg(long = "read-timeout-ms", default_value = "30000", env = "READ_TIMEOUT_MS")]
    pub read_timeout_ms: u64,

    /// Timeout de escritura del socket en milisegundos (0 = sin timeout)
    #[arg(long = "write-timeout-ms", default_value = "30000", env = "WRITE_TIMEOUT_MS")]
    pub write_timeout_ms: u64,

    // === Logging ===

    /// Nivel de log (trace, debug, info, warn, error)
    #[arg(long = "log-level", default_value = "info", env = "LOG_LEVEL")]
    pub log_level: String,
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI
    pub fn new() -> Self {
        Config::parse()
    }

    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use rio_httpd::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "0.0.0.0:4221");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Límites que aplica el parser
    pub fn limits(&self) -> Limits {
        Limits {
            max_line: self.max_line,
            max_headers: self.max_headers,
            max_body: self.max_body,
        }
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        millis(self.read_timeout_ms)
    }

    pub fn write_timeout(&self) -> Option<Duration> {
        millis(self.write_timeout_ms)
    }

    /// Valida la configuración
    ///
    /// Retorna errores si hay valores inválidos
    pub fn validate(&self) -> Result<(), String> {
        if self.workers == 0 {
            return Err("Workers must be >= 1".to_string());
        }
        if self.queue_capacity == 0 {
            return Err("Queue capacity must be >= 1".to_string());
        }
        if self.buffer_size < 64 {
            return Err("Buffer size must be >= 64".to_string());
        }
        if self.max_line < 16 {
            return Err("Max line must be >= 16".to_string());
        }
        if self.directory.trim().is_empty() {
            return Err("Directory must not be empty".to_string());
        }
        Ok(())
    }

    /// Registra un resumen de la configuración
    pub fn print_summary(&self) {
        info!(address = %self.address(), directory = %self.directory, "red");
        info!(
            workers = self.workers,
            queue_capacity = self.queue_capacity,
            "pool de workers"
        );
        info!(
            buffer_size = self.buffer_size,
            max_line = self.max_line,
            max_headers = self.max_headers,
            max_body = self.max_body,
            "límites"
        );
        info!(
            read_timeout_ms = self.read_timeout_ms,
            write_timeout_ms = self.write_timeout_ms,
            "timeouts (0 = sin timeout)"
        );
    }
}

fn millis(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}

impl Default for Config {
    /// Configuración por defecto
    fn default() -> Self {
        Self {
            port: 4221,
            host: "0.0.0.0".to_string(),
            directory: "./files".to_string(),
            workers: 4,
            queue_capacity: 16,
            buffer_size: 8192,
            max_line: 8192,
            max_headers: 64,
            max_body: 10 * 1024 * 1024,
            read_timeout_ms: 30_000,
            write_timeout_ms: 30_000,
            log_level: "info".to_string(),
        }
    }
}
