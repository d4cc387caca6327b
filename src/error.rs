//! # Tipos de Error
//! src/error.rs
//!
//! Taxonomía de errores del servidor:
//! - `ServerError`: errores fatales (inicialización, bind, accept, config, reporte).
//!   Se propagan hasta `main` y terminan el proceso.
//! - `HandlerError`: errores de una conexión individual. El worker los
//!   registra y sigue atendiendo; nunca afectan la salud del pool.
//!
//! Una carrera entre el `accept` pendiente y el apagado es una limitación
//! conocida y no tiene variante propia.

use std::io;

pub type Result<T> = std::result::Result<T, ServerError>;

/// Errores fatales del proceso
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// El pool no pudo arrancar (tamaño 0, fallo al crear un thread)
    #[error("Initialization error: {reason}")]
    Initialization { reason: String },

    /// No se pudo crear el socket de escucha
    #[error("Unable to bind listener: {0}")]
    Bind(#[source] io::Error),

    /// El accept falló; termina el loop del dispatcher
    #[error("Unable to accept connection: {0}")]
    Accept(#[source] io::Error),

    /// Configuración inválida
    #[error("Invalid configuration: {reason}")]
    Config { reason: String },

    /// No se pudo escribir el reporte final
    #[error("Unable to write report: {0}")]
    Report(#[source] io::Error),
}

/// Errores recuperables al atender una conexión
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Protocol error: {0}")]
    Protocol(String),
}
