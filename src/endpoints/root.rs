//! # Endpoint por defecto
//! src/endpoints/root.rs

use crate::http::{Request, Response, StatusCode};
use crate::server::ServerContext;

/// `/` => 200 vacío, cualquier otro path => 404 vacío
pub fn default_handler(req: &Request, _ctx: &ServerContext) -> Response {
    if req.path() == b"/" {
        Response::new(StatusCode::Ok)
    } else {
        Response::not_found()
    }
}
