//! # Interfaces del Pool
//! src/pool/handler.rs
//!
//! Colaboradores externos que el pool consume:
//! - `Connection`: handle opaco de una conexión aceptada.
//! - `RequestHandler`: atiende una conexión y reporta unidades de trabajo.

use crate::error::HandlerError;
use std::io;
use std::net::{Shutdown, TcpStream};

/// Conexión aceptada. El worker que la saca de la cola es su dueño y la cierra.
pub trait Connection: Send + 'static {
    /// Etiqueta legible para logs (ej. dirección del peer)
    fn label(&self) -> String;

    /// Cierra la conexión
    fn close(self) -> io::Result<()>;
}

/// Atiende una conexión de forma síncrona.
///
/// Retorna cuántas unidades de trabajo completó. Los errores (y panics)
/// quedan contenidos en el worker que lo invoca.
pub trait RequestHandler<C>: Send + Sync + 'static {
    fn handle(&self, conn: &mut C) -> Result<u64, HandlerError>;
}

impl Connection for TcpStream {
    fn label(&self) -> String {
        self.peer_addr()
            .map(|addr| addr.to_string())
            .unwrap_or_else(|_| "unknown".to_string())
    }

    fn close(self) -> io::Result<()> {
        match self.shutdown(Shutdown::Both) {
            Err(e) if e.kind() != io::ErrorKind::NotConnected => Err(e),
            _ => Ok(()),
        }
    }
}
