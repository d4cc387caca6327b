//! # Acceptor TCP
//! src/server/acceptor.rs
//!
//! Fuente de conexiones para el dispatcher. El listener es no bloqueante y se
//! consulta cada `poll_interval`, así el loop de accept puede observar el
//! apagado sin depender de cerrar el socket desde otro thread.
//!
//! Solo se duerme cuando no hay nada pendiente, así que el costo es a lo
//! sumo un `poll_interval` de latencia sobre un listener ocioso.

use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::thread;
use std::time::Duration;

use crate::pool::Connection;

/// Produce conexiones aceptadas
pub trait Acceptor: Send + 'static {
    type Conn: Connection;

    /// `Ok(Some(conn))` con una conexión nueva, `Ok(None)` si no llegó
    /// ninguna todavía. Un `Err` es fatal para el dispatcher.
    fn accept(&mut self) -> io::Result<Option<Self::Conn>>;
}

pub struct TcpAcceptor {
    listener: TcpListener,
    poll_interval: Duration,
}

impl TcpAcceptor {
    pub fn bind<A: ToSocketAddrs>(addr: A, poll_interval: Duration) -> io::Result<Self> {
        let listener = TcpListener::bind(addr)?;
        listener.set_nonblocking(true)?;
        Ok(Self {
            listener,
            poll_interval,
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}

impl Acceptor for TcpAcceptor {
    type Conn = TcpStream;

    fn accept(&mut self) -> io::Result<Option<TcpStream>> {
        match self.listener.accept() {
            Ok((stream, peer)) => {
                // Las conexiones heredan el modo del listener
                stream.set_nonblocking(false)?;
                log::debug!("accepted new connection from {}", peer);
                Ok(Some(stream))
            }
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                thread::sleep(self.poll_interval);
                Ok(None)
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => Ok(None),
            Err(e) => Err(e),
        }
    }
}
