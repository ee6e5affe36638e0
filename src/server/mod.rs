//! # Servidor
//! src/server/mod.rs
//!
//! Piezas concurrentes del servidor: cola acotada, pool de workers, el
//! ciclo request/response por conexión y el accept loop TCP.

pub mod connection;
pub mod context;
pub mod pool;
pub mod queue;
pub mod tcp;

pub use connection::{handle_connection, Connection};
pub use context::ServerContext;
pub use pool::{ConnectionHandler, WorkerPool};
pub use queue::BoundedQueue;
pub use tcp::Server;
