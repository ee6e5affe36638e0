//! # Ciclo Request/Response
//! src/server/connection.rs
//!
//! Lo que hace un worker con cada conexión que saca de la cola:
//!
//! ```text
//! RioReader ─> RequestParser ─> Router ─> Response::to_bytes ─> rio::write_all ─> close
//! ```
//!
//! Todo es secuencial dentro de una conexión. Un request que excede los
//! límites recibe un `400` de mejor esfuerzo; un error de I/O solo cierra
//! la conexión.

use crate::error::{Result, ServerError};
use crate::http::{RequestParser, Response, StatusCode};
use crate::rio::{self, RioReader};
use crate::router::Router;
use crate::server::ServerContext;
use std::io::{Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Tiempo máximo esperando el EOF del peer tras responder
const LINGER_TIMEOUT: Duration = Duration::from_millis(250);

/// Bytes que se descartan como máximo al cerrar
const LINGER_LIMIT: usize = 64 * 1024;

/// Conexión aceptada, pendiente de un worker
#[derive(Debug)]
pub struct Connection {
    stream: TcpStream,
    peer: SocketAddr,
}

impl Connection {
    pub fn new(stream: TcpStream, peer: SocketAddr) -> Self {
        Self { stream, peer }
    }

    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    /// Atiende el request y cierra la conexión al terminar
    pub fn serve(self, worker: usize, ctx: &ServerContext, router: &Router) {
        let start = Instant::now();
        let peer = self.peer();

        match handle_connection(&self.stream, ctx, router) {
            Ok(Some(status)) => {
                info!(
                    worker,
                    %peer,
                    status = status.as_u16(),
                    elapsed_ms = format_args!("{:.2}", start.elapsed().as_secs_f64() * 1000.0),
                    "respuesta enviada"
                );
                self.linger();
            }
            Ok(None) => debug!(worker, %peer, "conexión cerrada sin request"),
            Err(e) => warn!(worker, %peer, error = %e, "conexión abortada"),
        }
        // `self.stream` se cierra al salir de scope
    }

    /// Cierra la mitad de escritura y descarta lo que quede por leer
    /// (un body no declarado, una línea rechazada). Cerrar con datos sin
    /// leer haría que el kernel mande RST y el peer podría perder la
    /// response.
    fn linger(&self) {
        if self.stream.shutdown(Shutdown::Write).is_err() {
            return;
        }
        if self.stream.set_read_timeout(Some(LINGER_TIMEOUT)).is_err() {
            return;
        }

        let mut scratch = [0u8; 4096];
        let mut drained = 0;
        while drained < LINGER_LIMIT {
            match (&self.stream).read(&mut scratch) {
                Ok(0) | Err(_) => break,
                Ok(n) => drained += n,
            }
        }

        if drained > 0 {
            debug!(peer = %self.peer, bytes = drained, "bytes descartados al cerrar");
        }
    }
}

/// Ejecuta un ciclo completo sobre `stream`.
///
/// Retorna el status enviado, o `None` si el peer cerró sin mandar nada.
pub fn handle_connection<S: Read + Write>(
    stream: S,
    ctx: &ServerContext,
    router: &Router,
) -> Result<Option<StatusCode>> {
    let mut reader = RioReader::with_capacity(ctx.buffer_size(), stream);
    let mut parser = RequestParser::new(ctx.limits());

    let response = match parser.parse(&mut reader) {
        Ok(Some(request)) => {
            debug!(
                method = request.method().as_str(),
                path = %String::from_utf8_lossy(request.path()),
                headers = request.headers().len(),
                body = request.body().len(),
                "request"
            );
            router.route(&request, ctx)
        }
        Ok(None) => return Ok(None),
        Err(ServerError::Protocol(e)) => {
            warn!(error = %e, "request rechazado");
            Response::new(StatusCode::BadRequest)
        }
        Err(e) => return Err(e),
    };

    rio::write_all(reader.get_mut(), &response.to_bytes())?;
    Ok(Some(response.status()))
}
