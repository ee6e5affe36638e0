//! # Robust I/O
//! src/rio/mod.rs
//!
//! Capa de I/O con buffer sobre un stream de bytes (una conexión TCP).
//!
//! Un `read()` sobre un socket puede devolver menos bytes de los pedidos
//! (short count) o fallar con `EINTR` si llega una señal. Este módulo
//! absorbe ambos casos:
//!
//! - `RioReader`: buffer interno para no hacer una syscall por byte;
//!   lecturas por línea (`read_line`) y de longitud exacta (`read_exact`).
//! - `write_all`: escribe todo el slice reintentando escrituras parciales
//!   e interrumpidas.
//!
//! ```text
//! socket ──read()──> [ buf interno ] ──read_line()──> request line / headers
//!                                    └─read_exact()─> body
//! ```

pub mod reader;
pub mod writer;

pub use reader::{RioReader, DEFAULT_BUFFER_SIZE};
pub use writer::write_all;
