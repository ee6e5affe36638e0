//! # rio_httpd
//! src/lib.rs
//!
//! Servidor HTTP/1.1 mínimo y concurrente: un thread acepta conexiones y
//! las encola en un buffer acotado; un pool fijo de workers las consume,
//! parsea un request por conexión, lo enruta y responde.
//!
//! ## Arquitectura
//!
//! - `rio`: I/O robusto con buffer (lecturas por línea, escrituras completas)
//! - `http`: Parser del request, tipos Request/Response y codificación gzip
//! - `router`: Selección del endpoint por contención en el path
//! - `endpoints`: `echo`, `user-agent`, `files` y el handler por defecto
//! - `storage`: Lectura/escritura serializada de archivos en el directorio base
//! - `server`: Cola acotada, pool de workers y accept loop TCP
//! - `config`: Argumentos CLI y variables de entorno
//! - `error`: Errores tipados del servidor
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use rio_httpd::config::Config;
//! use rio_httpd::server::Server;
//!
//! let config = Config::default();
//! let mut server = Server::new(config);
//! server.run().expect("Error al iniciar servidor");
//! ```

pub mod config;
pub mod endpoints;
pub mod error;
pub mod http;
pub mod rio;
pub mod router;
pub mod server;
pub mod storage;
