//! # Endpoint /echo
//! src/endpoints/echo.rs
//!
//! Devuelve como body el resto del path tras el token `echo`, byte a byte.

use crate::http::request::find_bytes;
use crate::http::{Request, Response};
use crate::server::ServerContext;

const TOKEN: &[u8] = b"echo";

/// Handler para `/echo/<texto>`
///
/// El body es todo lo que sigue a `echo/` en el path, tal cual (sin
/// decodificar: bytes no UTF-8 se devuelven intactos). Si el
/// cliente acepta `gzip` el body va comprimido con `Content-Encoding: gzip`.
///
/// # Ejemplo
/// ```text
/// GET /echo/abc HTTP/1.1           HTTP/1.1 200 OK
///                             =>   Content-Type: text/plain
///                                  Content-Length: 3
///
///                                  abc
/// ```
pub fn echo_handler(req: &Request, _ctx: &ServerContext) -> Response {
    let response = Response::text(echo_payload(req.path()));

    if req.accepts_encoding("gzip") {
        response.gzip()
    } else {
        response
    }
}

/// Bytes tras `echo`, sin el `/` inmediato si lo hay.
///
/// `/echoabc` da `abc`: solo se quita un separador `/`, nunca otro byte.
fn echo_payload(path: &[u8]) -> &[u8] {
    let Some(start) = find_bytes(path, TOKEN) else {
        return &[];
    };
    let rest = &path[start + TOKEN.len()..];
    rest.strip_prefix(b"/").unwrap_or(rest)
}
