//! # Módulo del Servidor
//! src/server/mod.rs
//!
//! Este módulo implementa el lado de red:
//! 1. Escucha en un puerto (`acceptor`)
//! 2. Acepta conexiones y las apila en la cola del pool (`dispatcher`)
//! 3. Contesta cada conexión con una respuesta fija (`responder`)
//! 4. Arma todo y coordina el apagado (`tcp`)

pub mod acceptor;
pub mod dispatcher;
pub mod responder;
pub mod tcp;

// Re-exportar para facilitar el uso
pub use acceptor::{Acceptor, TcpAcceptor};
pub use dispatcher::Dispatcher;
pub use responder::CannedResponder;
pub use tcp::Server;
