//! # Construcción de Respuestas HTTP
//!
//! API para construir respuestas y serializarlas a bytes.
//!
//! ## Formato
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Type: text/plain\r\n
//! Content-Encoding: gzip\r\n
//! Content-Length: 23\r\n
//! \r\n
//! <body>
//! ```
//!
//! `Content-Length` no se guarda como header: se calcula al serializar a
//! partir del body que realmente se envía (ya comprimido si aplica).
//!
//! ## Ejemplo de uso
//!
//! ```
//! use rio_httpd::http::{Response, StatusCode};
//!
//! let response = Response::text("hello").gzip();
//!
//! assert_eq!(response.status(), StatusCode::Ok);
//! assert_eq!(response.header("Content-Encoding"), Some("gzip"));
//! ```

use super::StatusCode;
use crate::error::{Result, ServerError};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::Write;
use tracing::warn;

/// Versión que se anuncia en la status line
pub const HTTP_VERSION: &str = "HTTP/1.1";

/// Respuesta HTTP completa
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,

    /// Headers en el orden en que se escribirán
    headers: Vec<(String, String)>,

    body: Vec<u8>,
}

impl Response {
    /// Respuesta sin headers ni body
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// `200 OK` con `Content-Type: text/plain`. El body se copia tal cual,
    /// sin exigir UTF-8.
    pub fn text(body: impl Into<Vec<u8>>) -> Self {
        Self::new(StatusCode::Ok)
            .with_header("Content-Type", "text/plain")
            .with_body_bytes(body.into())
    }

    /// `200 OK` con `Content-Type: application/octet-stream`
    pub fn octet_stream(body: Vec<u8>) -> Self {
        Self::new(StatusCode::Ok)
            .with_header("Content-Type", "application/octet-stream")
            .with_body_bytes(body)
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NotFound)
    }

    /// Agrega un header. Si ya existe uno con el mismo nombre, se reemplaza.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.add_header(name, value);
        self
    }

    /// Versión mutable de `with_header`
    pub fn add_header(&mut self, name: &str, value: &str) {
        match self.headers.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(name)) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.headers.push((name.to_string(), value.to_string())),
        }
    }

    pub fn with_body_bytes(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Comprime el body con gzip y declara `Content-Encoding: gzip`.
    ///
    /// Si la compresión falla la respuesta se devuelve intacta.
    pub fn gzip(mut self) -> Self {
        match compress_gzip(&self.body) {
            Ok(compressed) => {
                self.body = compressed;
                self.add_header("Content-Encoding", "gzip");
            }
            Err(e) => warn!(error = %e, "compresión fallida, se envía sin comprimir"),
        }
        self
    }

    /// Serializa: status line, headers, `Content-Length`, línea vacía y body
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut result = Vec::with_capacity(128 + self.body.len());

        result.extend_from_slice(format!("{} {}\r\n", HTTP_VERSION, self.status).as_bytes());

        for (name, value) in &self.headers {
            if name.eq_ignore_ascii_case("Content-Length") {
                continue;
            }
            result.extend_from_slice(format!("{}: {}\r\n", name, value).as_bytes());
        }
        result.extend_from_slice(format!("Content-Length: {}\r\n", self.body.len()).as_bytes());

        result.extend_from_slice(b"\r\n");
        result.extend_from_slice(&self.body);

        result
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

/// Comprime `input` completo en un contenedor gzip, sin streaming
pub fn compress_gzip(input: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(input).map_err(ServerError::Encoding)?;
    encoder.finish().map_err(ServerError::Encoding)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;

    fn gunzip(data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        GzDecoder::new(data).read_to_end(&mut out).unwrap();
        out
    }

    #[test]
    fn test_new_response() {
        let response = Response::new(StatusCode::Ok);
        assert_eq!(response.status(), StatusCode::Ok);
        assert!(response.headers().is_empty());
        assert!(response.body().is_empty());
    }

    #[test]
    fn test_header_replaced() {
        let response = Response::new(StatusCode::Ok)
            .with_header("Content-Type", "text/plain")
            .with_header("content-type", "application/octet-stream");

        assert_eq!(response.headers().len(), 1);
        assert_eq!(response.header("Content-Type"), Some("application/octet-stream"));
    }

    #[test]
    fn test_to_bytes_text() {
        let text = String::from_utf8(Response::text("Test").to_bytes()).unwrap();
        assert_eq!(
            text,
            "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 4\r\n\r\nTest"
        );
    }

    #[test]
    fn test_empty_response_declares_zero_length() {
        let text = String::from_utf8(Response::not_found().to_bytes()).unwrap();
        assert_eq!(text, "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\n\r\n");
    }

    #[test]
    fn test_stale_content_length_is_ignored() {
        let response = Response::text("abc").with_header("Content-Length", "999");
        let text = String::from_utf8(response.to_bytes()).unwrap();

        assert!(text.contains("Content-Length: 3\r\n"));
        assert!(!text.contains("999"));
    }

    #[test]
    fn test_octet_stream_binary_body() {
        let response = Response::octet_stream(vec![0x00, 0xFF, 0x10]);
        let bytes = response.to_bytes();

        assert_eq!(response.header("Content-Type"), Some("application/octet-stream"));
        assert!(bytes.ends_with(b"Content-Length: 3\r\n\r\n\x00\xff\x10"));
    }

    #[test]
    fn test_gzip_round_trip() {
        let response = Response::text("abc").gzip();

        assert_eq!(response.header("Content-Encoding"), Some("gzip"));
        assert_eq!(response.header("Content-Type"), Some("text/plain"));
        assert_eq!(gunzip(response.body()), b"abc");

        let bytes = response.to_bytes();
        let expected = format!("Content-Length: {}\r\n\r\n", response.body().len());
        assert!(String::from_utf8_lossy(&bytes).contains(&expected));
    }

    #[test]
    fn test_gzip_empty_body() {
        let compressed = compress_gzip(b"").unwrap();
        assert!(!compressed.is_empty());
        assert!(gunzip(&compressed).is_empty());
    }
}
