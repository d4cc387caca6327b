//! # Respuesta Fija
//! src/server/responder.rs
//!
//! `RequestHandler` que usa el binario: lee el request (sin parsearlo) y
//! contesta siempre el mismo cuerpo con un HTTP/1.0 200 mínimo.

use crate::error::HandlerError;
use crate::pool::RequestHandler;
use std::io::{self, Read, Write};
use std::net::TcpStream;
use std::thread;
use std::time::Duration;

/// Tamaño del buffer de lectura del request
const READ_BUFFER: usize = 8192;

pub struct CannedResponder {
    body: String,
    read_timeout: Duration,
}

impl CannedResponder {
    pub fn new(body: impl Into<String>, read_timeout: Duration) -> Self {
        Self {
            body: body.into(),
            read_timeout,
        }
    }

    /// Serializa la respuesta completa
    fn response_bytes(&self) -> Vec<u8> {
        let thread_name = thread::current().name().unwrap_or("unnamed").to_string();

        let mut response = String::with_capacity(128 + self.body.len());
        response.push_str("HTTP/1.0 200 OK\r\n");
        response.push_str("Content-Type: text/plain\r\n");
        response.push_str(&format!("Content-Length: {}\r\n", self.body.len()));
        response.push_str(&format!("X-Worker-Thread: {}\r\n", thread_name));
        response.push_str("\r\n");
        response.push_str(&self.body);
        response.into_bytes()
    }
}

impl RequestHandler<TcpStream> for CannedResponder {
    fn handle(&self, stream: &mut TcpStream) -> Result<u64, HandlerError> {
        stream.set_read_timeout(Some(self.read_timeout))?;

        let mut buffer = [0u8; READ_BUFFER];
        match stream.read(&mut buffer) {
            Ok(0) => {
                log::debug!("peer closed before sending a request");
                return Ok(0);
            }
            Ok(n) => log::trace!("read {} request bytes", n),
            // Cliente lento o mudo: se contesta igual
            Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) => {
                log::debug!("request read timed out, answering anyway");
            }
            Err(e) => return Err(e.into()),
        }

        stream.write_all(&self.response_bytes())?;
        stream.flush()?;
        Ok(1)
    }
}
