//! # Parser de Requests
//! src/http/parser.rs
//!
//! Máquina de estados que consume un `RioReader` línea a línea:
//!
//! ```text
//! AwaitingRequestLine ──> ReadingHeaders ──(línea vacía)──┬──> Complete
//!                                                         │
//!                                   (Content-Length: n)   └──> ReadingBody ──> Complete
//! ```
//!
//! Cualquier error lleva a `Failed`. Los datos malformados (headers sin `:`,
//! `Content-Length` no numérico) se degradan a "ausente"; solo se rechazan
//! los requests que superan los `Limits` configurados.

use crate::error::{ProtocolError, Result};
use crate::http::request::Request;
use crate::rio::RioReader;
use std::io::Read;
use tracing::{debug, warn};

/// Límites de tamaño del request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Bytes máximos de la request line o de un header, incluido `\r\n`
    pub max_line: usize,

    /// Número máximo de headers
    pub max_headers: usize,

    /// `Content-Length` máximo aceptado
    pub max_body: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_line: 8192,
            max_headers: 64,
            max_body: 10 * 1024 * 1024,
        }
    }
}

/// Estado del parser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseState {
    AwaitingRequestLine,
    ReadingHeaders,
    ReadingBody { remaining: usize },
    Complete,
    Failed,
}

/// Parser de un único request (uno por conexión)
pub struct RequestParser {
    state: ParseState,
    limits: Limits,
    request: Option<Request>,
}

impl RequestParser {
    pub fn new(limits: Limits) -> Self {
        Self {
            state: ParseState::AwaitingRequestLine,
            limits,
            request: None,
        }
    }

    pub fn state(&self) -> ParseState {
        self.state
    }

    /// Ejecuta la máquina de estados hasta `Complete` o `Failed`.
    ///
    /// Retorna `Ok(None)` si el peer cerró sin enviar nada.
    pub fn parse<R: Read>(&mut self, reader: &mut RioReader<R>) -> Result<Option<Request>> {
        while !matches!(self.state, ParseState::Complete | ParseState::Failed) {
            if let Err(e) = self.step(reader) {
                self.state = ParseState::Failed;
                return Err(e);
            }
        }

        Ok(self.request.take())
    }

    fn step<R: Read>(&mut self, reader: &mut RioReader<R>) -> Result<()> {
        match self.state {
            ParseState::AwaitingRequestLine => {
                let line = self.next_line(reader)?;
                if line.is_empty() {
                    debug!("conexión cerrada antes de la request line");
                    self.state = ParseState::Complete;
                    return Ok(());
                }

                let request = Request::from_request_line(&line);
                debug!(line = %String::from_utf8_lossy(request.request_line()), "request line");
                self.request = Some(request);
                self.state = ParseState::ReadingHeaders;
            }

            ParseState::ReadingHeaders => {
                let line = self.next_line(reader)?;

                if line.is_empty() {
                    // El peer cerró a mitad de los headers: se sirve lo recibido
                    warn!("headers incompletos, conexión cerrada por el peer");
                    self.state = ParseState::Complete;
                } else if line == b"\r\n" || line == b"\n" {
                    self.state = self.end_of_headers()?;
                } else {
                    self.push_header(&line)?;
                }
            }

            ParseState::ReadingBody { remaining } => {
                let mut body = vec![0u8; remaining];
                let got = reader.read_exact(&mut body)?;
                if got < remaining {
                    warn!(declared = remaining, received = got, "body truncado");
                    body.truncate(got);
                }

                if let Some(request) = self.request.as_mut() {
                    request.set_body(body);
                }
                self.state = ParseState::Complete;
            }

            ParseState::Complete | ParseState::Failed => {}
        }

        Ok(())
    }

    /// Lee una línea respetando `max_line`
    fn next_line<R: Read>(&self, reader: &mut RioReader<R>) -> Result<Vec<u8>> {
        let limit = self.limits.max_line;
        let line = reader.read_line(limit + 1)?;

        if line.len() >= limit && line.last() != Some(&b'\n') {
            return Err(ProtocolError::LineTooLong { limit }.into());
        }

        Ok(line)
    }

    fn push_header(&mut self, line: &[u8]) -> Result<()> {
        let Some(request) = self.request.as_mut() else {
            return Ok(());
        };

        if request.headers().len() >= self.limits.max_headers {
            return Err(ProtocolError::TooManyHeaders {
                limit: self.limits.max_headers,
            }
            .into());
        }

        if !request.push_header_line(line) {
            debug!(header = %String::from_utf8_lossy(line).trim_end(), "header malformado descartado");
        }

        Ok(())
    }

    /// Decide si hay body a partir de `Content-Length`
    fn end_of_headers(&self) -> Result<ParseState> {
        let declared = self.request.as_ref().and_then(Request::content_length);

        match declared {
            None | Some(0) => Ok(ParseState::Complete),
            Some(n) if n > self.limits.max_body => Err(ProtocolError::BodyTooLarge {
                declared: n,
                limit: self.limits.max_body,
            }
            .into()),
            Some(n) => Ok(ParseState::ReadingBody { remaining: n }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServerError;
    use crate::http::request::Method;

    fn parse_with(raw: &[u8], limits: Limits) -> (RequestParser, Result<Option<Request>>) {
        let mut reader = RioReader::new(raw);
        let mut parser = RequestParser::new(limits);
        let result = parser.parse(&mut reader);
        (parser, result)
    }

    fn parse(raw: &[u8]) -> Request {
        let (parser, result) = parse_with(raw, Limits::default());
        assert_eq!(parser.state(), ParseState::Complete);
        result.unwrap().expect("request")
    }

    #[test]
    fn test_parse_simple_get() {
        let request = parse(b"GET / HTTP/1.1\r\nHost: localhost:4221\r\n\r\n");

        assert_eq!(request.method(), &Method::GET);
        assert_eq!(request.path(), b"/");
        assert_eq!(request.header("Host"), Some(&b"localhost:4221"[..]));
        assert!(request.body().is_empty());
    }

    #[test]
    fn test_parse_post_with_body() {
        let request = parse(
            b"POST /files/a HTTP/1.1\r\nContent-Type: application/octet-stream\r\nContent-Length: 12\r\n\r\nhello\r\nworld",
        );

        assert_eq!(request.method(), &Method::POST);
        assert_eq!(request.header("Content-Type"), Some(&b"application/octet-stream"[..]));
        assert_eq!(request.body(), b"hello\r\nworld");
    }

    #[test]
    fn test_body_ignored_without_content_length() {
        let request = parse(b"POST /files/a HTTP/1.1\r\n\r\nstray bytes");
        assert!(request.body().is_empty());
    }

    #[test]
    fn test_garbage_content_length_means_no_body() {
        let request = parse(b"POST /files/a HTTP/1.1\r\nContent-Length: ten\r\n\r\n0123456789");
        assert!(request.body().is_empty());
    }

    #[test]
    fn test_short_body_is_kept() {
        let request = parse(b"POST /files/a HTTP/1.1\r\nContent-Length: 10\r\n\r\nabc");
        assert_eq!(request.body(), b"abc");
    }

    #[test]
    fn test_empty_stream_is_none() {
        let (parser, result) = parse_with(b"", Limits::default());
        assert!(result.unwrap().is_none());
        assert_eq!(parser.state(), ParseState::Complete);
    }

    #[test]
    fn test_eof_inside_headers() {
        let request = parse(b"GET /user-agent HTTP/1.1\r\nUser-Agent: x\r\n");
        assert_eq!(request.header("User-Agent"), Some(&b"x"[..]));
    }

    #[test]
    fn test_bare_lf_line_endings() {
        let request = parse(b"GET /echo/hi HTTP/1.1\nAccept-Encoding: gzip\n\n");
        assert_eq!(request.path(), b"/echo/hi");
        assert!(request.accepts_encoding("gzip"));
    }

    #[test]
    fn test_missing_path_is_empty() {
        let request = parse(b"GET\r\n\r\n");
        assert_eq!(request.path(), b"");
    }

    // ==================== Límites ====================

    #[test]
    fn test_line_too_long() {
        let limits = Limits { max_line: 32, ..Limits::default() };
        let raw = format!("GET /{} HTTP/1.1\r\n\r\n", "a".repeat(64));

        let (parser, result) = parse_with(raw.as_bytes(), limits);

        assert!(matches!(
            result,
            Err(ServerError::Protocol(ProtocolError::LineTooLong { limit: 32 }))
        ));
        assert_eq!(parser.state(), ParseState::Failed);
    }

    #[test]
    fn test_line_exactly_at_limit() {
        let line = b"GET /abc HTTP/1.1\r\n";
        let limits = Limits { max_line: line.len(), ..Limits::default() };
        let mut raw = line.to_vec();
        raw.extend_from_slice(b"\r\n");

        let (_, result) = parse_with(&raw, limits);
        assert_eq!(result.unwrap().unwrap().path(), b"/abc");
    }

    #[test]
    fn test_too_many_headers() {
        let limits = Limits { max_headers: 2, ..Limits::default() };
        let raw = b"GET / HTTP/1.1\r\nA: 1\r\nB: 2\r\nC: 3\r\n\r\n";

        let (_, result) = parse_with(raw, limits);
        assert!(matches!(
            result,
            Err(ServerError::Protocol(ProtocolError::TooManyHeaders { limit: 2 }))
        ));
    }

    #[test]
    fn test_body_too_large() {
        let limits = Limits { max_body: 4, ..Limits::default() };
        let raw = b"POST /files/a HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello";

        let (_, result) = parse_with(raw, limits);
        assert!(matches!(
            result,
            Err(ServerError::Protocol(ProtocolError::BodyTooLarge { declared: 5, limit: 4 }))
        ));
    }
}
