//! # Sistema de Routing
//! src/router/mod.rs
//!
//! Mapea el path de un request a un handler.
//!
//! ```text
//! Request → Router → Handler → Response
//! ```
//!
//! Las rutas se comparan por contención (`path.contains(pattern)`) en el
//! orden en que se registraron; gana la primera. Si ninguna coincide se usa
//! el handler por defecto (`/` => 200, resto => 404).

use crate::endpoints;
use crate::http::request::find_bytes;
use crate::http::{Request, Response};
use crate::server::ServerContext;

/// Tipo de función handler
///
/// Un handler recibe el Request y el contexto compartido y retorna una Response
pub type Handler = fn(&Request, &ServerContext) -> Response;

/// Router que mapea patrones de path a handlers
pub struct Router {
    /// Pares patrón → handler, en orden de prioridad
    routes: Vec<(String, Handler)>,

    /// Handler cuando ningún patrón coincide
    fallback: Handler,
}

impl Router {
    /// Crea un router vacío con el handler por defecto como fallback
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            fallback: endpoints::default_handler,
        }
    }

    /// Router con los endpoints del servidor en su orden de prioridad:
    /// `echo`, `user-agent`, `files`.
    pub fn with_endpoints() -> Self {
        let mut router = Self::new();
        router.register("echo", endpoints::echo_handler);
        router.register("user-agent", endpoints::user_agent_handler);
        router.register("files", endpoints::files_handler);
        router
    }

    /// Registra una ruta con su handler. Las rutas registradas antes tienen
    /// prioridad.
    ///
    /// # Ejemplo
    /// ```
    /// use rio_httpd::router::Router;
    /// use rio_httpd::http::{Request, Response};
    /// use rio_httpd::server::ServerContext;
    ///
    /// fn hello_handler(_req: &Request, _ctx: &ServerContext) -> Response {
    ///     Response::text("hello")
    /// }
    ///
    /// let mut router = Router::new();
    /// router.register("hello", hello_handler);
    /// ```
    pub fn register(&mut self, pattern: &str, handler: Handler) {
        self.routes.push((pattern.to_string(), handler));
    }

    /// Reemplaza el handler por defecto
    pub fn set_fallback(&mut self, handler: Handler) {
        self.fallback = handler;
    }

    /// Encuentra y ejecuta el handler apropiado para un request
    pub fn route(&self, request: &Request, ctx: &ServerContext) -> Response {
        let path = request.path();

        let handler = self
            .routes
            .iter()
            .find(|(pattern, _)| find_bytes(path, pattern.as_bytes()).is_some())
            .map(|(_, handler)| *handler)
            .unwrap_or(self.fallback);

        handler(request, ctx)
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}
