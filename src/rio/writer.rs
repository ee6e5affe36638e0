//! # Escritura Robusta
//! src/rio/writer.rs
//!
//! En sockets, `write()` puede aceptar solo parte del buffer (short count)
//! o ser interrumpido por una señal. `write_all` sigue escribiendo hasta
//! entregar todos los bytes y solo falla ante un error real.

use std::io::{self, Write};
use tracing::trace;

/// Escribe `bytes` completo en `writer`.
///
/// - Escritura parcial: avanza y vuelve a escribir el resto.
/// - `ErrorKind::Interrupted`: reintenta.
/// - `Ok(0)`: el peer no acepta más datos, falla con `WriteZero`.
///
/// Retorna el número de bytes escritos (siempre `bytes.len()` en éxito).
///
/// # Ejemplo
/// ```
/// use rio_httpd::rio::write_all;
///
/// let mut out = Vec::new();
/// assert_eq!(write_all(&mut out, b"HTTP/1.1 200 OK\r\n\r\n").unwrap(), 19);
/// ```
pub fn write_all<W: Write + ?Sized>(writer: &mut W, bytes: &[u8]) -> io::Result<usize> {
    let mut left = bytes;

    while !left.is_empty() {
        match writer.write(left) {
            Ok(0) => {
                return Err(io::Error::new(
                    io::ErrorKind::WriteZero,
                    "connection accepted zero bytes",
                ));
            }
            Ok(n) => left = &left[n..],
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {
                trace!(remaining = left.len(), "write interrumpido, reintentando");
            }
            Err(e) => return Err(e),
        }
    }

    loop {
        match writer.flush() {
            Ok(()) => break,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }

    Ok(bytes.len())
}
