//! # Endpoint /files
//! src/endpoints/files.rs
//!
//! Lectura (GET) y escritura (POST) de archivos del directorio
//! configurado. El nombre es todo lo que sigue al primer `/` después del
//! segmento `files`:
//!
//! ```text
//! GET  /files/notes.txt   => <directory>/notes.txt
//! POST /files/notes.txt   => escribe el body en <directory>/notes.txt
//! ```
//!
//! Toda operación pasa por el guard de `FileStore`. Un nombre que no es
//! UTF-8 válido se rechaza con `404` en vez de reinterpretarse.

use crate::http::request::find_bytes;
use crate::http::{Method, Request, Response, StatusCode};
use crate::server::ServerContext;
use tracing::{info, warn};

const SEGMENT: &[u8] = b"files";

/// Handler para `/files/<name>`
///
/// - GET: `200` con `application/octet-stream` y el contenido, o `404`.
/// - POST: escribe el body completo y responde `201 Created`, o `404` si
///   no se pudo abrir el archivo.
/// - Otros métodos: `404`.
pub fn files_handler(req: &Request, ctx: &ServerContext) -> Response {
    let Some(raw_name) = file_name(req.path()) else {
        return Response::not_found();
    };
    let Ok(name) = std::str::from_utf8(raw_name) else {
        warn!(file = %String::from_utf8_lossy(raw_name), "nombre de archivo no UTF-8");
        return Response::not_found();
    };

    match req.method() {
        Method::GET => get_file(name, ctx),
        Method::POST => post_file(name, req.body(), ctx),
        other => {
            warn!(method = other.as_str(), "método no soportado en /files");
            Response::not_found()
        }
    }
}

fn get_file(name: &str, ctx: &ServerContext) -> Response {
    match ctx.storage().read(name) {
        Ok(contents) => Response::octet_stream(contents),
        Err(e) if e.is_not_found() => {
            info!(file = name, error = %e, "GET /files sin resultado");
            Response::not_found()
        }
        Err(e) => {
            warn!(file = name, error = %e, "GET /files fallido");
            Response::not_found()
        }
    }
}

fn post_file(name: &str, body: &[u8], ctx: &ServerContext) -> Response {
    match ctx.storage().write(name, body) {
        Ok(()) => Response::new(StatusCode::Created),
        Err(e) => {
            warn!(file = name, error = %e, "POST /files fallido");
            Response::not_found()
        }
    }
}

/// Nombre de archivo del path, `None` si no hay `/` tras `files`
pub fn file_name(path: &[u8]) -> Option<&[u8]> {
    let start = find_bytes(path, SEGMENT)? + SEGMENT.len();
    let rest = &path[start..];
    let slash = rest.iter().position(|&b| b == b'/')?;
    Some(&rest[slash + 1..])
}
