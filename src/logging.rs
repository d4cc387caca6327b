//! # Logging
//! src/logging.rs
//!
//! Backend `env_logger` para la fachada `log`. `RUST_LOG` tiene prioridad
//! sobre el nivel por defecto. Cada línea lleva el nombre del thread para
//! seguir a cada worker.

use std::io::Write;
use std::thread;

/// Inicializa el logger global. Llamar una sola vez desde `main`.
pub fn init(default_level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format(|buf, record| {
            let timestamp = buf.timestamp_millis();
            writeln!(
                buf,
                "{} [{:<5}] [{}] {}",
                timestamp,
                record.level(),
                thread::current().name().unwrap_or("unnamed"),
                record.args()
            )
        })
        .init();
}
