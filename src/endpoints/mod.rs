//! # Endpoints del Servidor
//!
//! Handlers de cada categoría de ruta. Cada handler recibe el `Request`
//! ya parseado y el `ServerContext` compartido, y retorna una `Response`.
//!
//! | Ruta (contiene) | Handler             |
//! |-----------------|---------------------|
//! | `echo`          | `echo_handler`      |
//! | `user-agent`    | `user_agent_handler`|
//! | `files`         | `files_handler`     |
//! | (otra)          | `default_handler`   |
//!
//! Ningún handler falla: un header, body o `Accept-Encoding` ausente se
//! trata como vacío.

pub mod echo;
pub mod files;
pub mod root;
pub mod user_agent;

pub use echo::echo_handler;
pub use files::files_handler;
pub use root::default_handler;
pub use user_agent::user_agent_handler;
