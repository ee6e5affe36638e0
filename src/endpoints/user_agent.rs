//! # Endpoint /user-agent
//! src/endpoints/user_agent.rs

use crate::http::{Request, Response};
use crate::server::ServerContext;

/// Handler para `/user-agent`
///
/// Refleja el valor del primer header `User-Agent` como `text/plain`,
/// byte a byte. Sin header, el body va vacío.
pub fn user_agent_handler(req: &Request, _ctx: &ServerContext) -> Response {
    Response::text(req.header("User-Agent").unwrap_or_default())
}
