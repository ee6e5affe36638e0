//! # Errores del Servidor
//! src/error.rs
//!
//! Taxonomía de errores que puede producir una conexión. Ninguno de ellos
//! es fatal para el proceso: como mucho aborta la conexión actual.
//!
//! - `Io`: fallo de lectura/escritura en el socket (no incluye `EINTR`,
//!   que se reintenta en `rio`).
//! - `Protocol`: request que excede algún límite configurado.
//! - `Resource` / `InvalidFileName`: archivo inexistente o no escribible,
//!   se reporta al cliente como `404 Not Found`.
//! - `Encoding`: fallo al comprimir, se recupera enviando sin comprimir.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Error de una conexión
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Resource error on {}: {source}", path.display())]
    Resource {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid file name: {0:?}")]
    InvalidFileName(String),

    #[error("Encoding error: {0}")]
    Encoding(#[source] io::Error),
}

/// Violaciones de los límites del parser
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// Una línea no cabe en el presupuesto de lectura
    #[error("Line exceeds {limit} bytes")]
    LineTooLong { limit: usize },

    #[error("More than {limit} header lines")]
    TooManyHeaders { limit: usize },

    /// El `Content-Length` declarado supera el máximo permitido
    #[error("Declared body of {declared} bytes exceeds limit of {limit}")]
    BodyTooLarge { declared: usize, limit: usize },
}

pub type Result<T> = std::result::Result<T, ServerError>;

impl ServerError {
    /// true si el error se debe mostrar al cliente como 404
    pub fn is_not_found(&self) -> bool {
        matches!(self, ServerError::Resource { .. } | ServerError::InvalidFileName(_))
    }
}
