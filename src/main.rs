//! # rio_httpd - Entry Point
//! src/main.rs
//!
//! Parsea la configuración, inicializa el logging y corre el servidor.

use rio_httpd::config::Config;
use rio_httpd::server::Server;
use tracing::{error, Level};

fn main() {
    let config = Config::new();

    let level = config.log_level.parse::<Level>().unwrap_or(Level::INFO);
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_thread_names(true)
        .with_level(true)
        .init();

    if let Err(e) = config.validate() {
        error!("configuración inválida: {}", e);
        std::process::exit(1);
    }

    config.print_summary();

    let mut server = Server::new(config);

    // Bloquea el thread principal en el accept loop
    if let Err(e) = server.run() {
        error!("error fatal: {}", e);
        std::process::exit(1);
    }
}
