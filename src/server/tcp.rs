//! # Servidor TCP Concurrente
//! src/server/tcp.rs
//!
//! Accept loop + cola acotada + pool fijo de workers:
//!
//! ```text
//! accept() ──insert──> BoundedQueue ──remove──> worker-0..N ──> Connection::serve
//! ```
//!
//! El thread principal solo acepta y encola. Si la cola está llena, el
//! accept loop se bloquea y el kernel retiene las conexiones nuevas en el
//! backlog del listener.

use crate::config::Config;
use crate::router::Router;
use crate::server::connection::Connection;
use crate::server::pool::WorkerPool;
use crate::server::queue::BoundedQueue;
use crate::server::ServerContext;
use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Servidor HTTP/1.1 con pool fijo de workers
pub struct Server {
    config: Config,
    context: Arc<ServerContext>,
    router: Arc<Router>,
    listener: Option<TcpListener>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        let context = ServerContext::from_config(&config);

        Self {
            config,
            context: Arc::new(context),
            router: Arc::new(Router::with_endpoints()),
            listener: None,
        }
    }

    /// Reemplaza el router (por defecto `Router::with_endpoints`)
    pub fn with_router(mut self, router: Router) -> Self {
        self.router = Arc::new(router);
        self
    }

    pub fn context(&self) -> &Arc<ServerContext> {
        &self.context
    }

    /// Crea el directorio de archivos y abre el listener.
    ///
    /// Retorna la dirección real, útil cuando el puerto configurado es 0.
    pub fn bind(&mut self) -> io::Result<SocketAddr> {
        self.context.storage().ensure_root()?;

        let address = self.config.address();
        let listener = TcpListener::bind(&address)?;
        let local = listener.local_addr()?;

        info!(address = %local, directory = %self.context.storage().root().display(), "servidor escuchando");

        self.listener = Some(listener);
        Ok(local)
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.listener.as_ref().and_then(|l| l.local_addr().ok())
    }

    /// Lanza el pool y corre el accept loop. No retorna salvo error al
    /// hacer bind o al lanzar los workers.
    pub fn run(&mut self) -> io::Result<()> {
        if self.listener.is_none() {
            self.bind()?;
        }
        let listener = match self.listener.as_ref() {
            Some(listener) => listener,
            None => return Err(io::Error::new(io::ErrorKind::NotConnected, "listener no inicializado")),
        };

        let queue = Arc::new(BoundedQueue::new(self.config.queue_capacity));
        let pool = {
            let context = Arc::clone(&self.context);
            let router = Arc::clone(&self.router);
            WorkerPool::spawn(
                self.config.workers,
                Arc::clone(&queue),
                Arc::new(move |conn: Connection, worker: usize| {
                    conn.serve(worker, &context, &router)
                }),
            )?
        };

        loop {
            match listener.accept() {
                Ok((stream, peer)) => {
                    if let Err(e) = self.apply_timeouts(&stream) {
                        warn!(%peer, error = %e, "no se pudieron fijar los timeouts");
                    }

                    debug!(%peer, queued = queue.len(), "conexión aceptada");

                    if queue.insert(Connection::new(stream, peer)).is_err() {
                        error!("cola cerrada, deteniendo accept loop");
                        break;
                    }
                }
                Err(e) => {
                    warn!(error = %e, "error al aceptar conexión");
                }
            }
        }

        pool.shutdown();
        Ok(())
    }

    fn apply_timeouts(&self, stream: &TcpStream) -> io::Result<()> {
        stream.set_read_timeout(self.config.read_timeout())?;
        stream.set_write_timeout(self.config.write_timeout())?;
        Ok(())
    }
}
