//! # Módulo HTTP
//!
//! Subconjunto de HTTP/1.1 que necesita el servidor:
//!
//! - Parsing incremental de requests (request line, headers, body)
//! - Construcción de responses con compresión gzip opcional
//! - Status codes
//!
//! No hay keep-alive, chunked transfer-encoding ni pipelining: cada
//! conexión transporta exactamente un request y una respuesta.
//!
//! ### Formato de Request
//!
//! ```text
//! GET /echo/abc HTTP/1.1\r\n
//! Accept-Encoding: gzip\r\n
//! \r\n
//! ```
//!
//! ### Formato de Response
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Type: text/plain\r\n
//! Content-Length: 3\r\n
//! \r\n
//! abc
//! ```

pub mod parser;    // Máquina de estados sobre RioReader
pub mod request;   // Request parseado
pub mod response;  // Construcción de HTTP responses
pub mod status;    // Códigos de estado HTTP

pub use parser::{Limits, ParseState, RequestParser};
pub use request::{Method, Request};
pub use response::Response;
pub use status::StatusCode;
