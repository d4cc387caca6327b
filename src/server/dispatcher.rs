//! # Dispatcher
//! src/server/dispatcher.rs
//!
//! Loop de accept: mientras el pool corre, acepta conexiones y las apila en
//! la cola de trabajo. Un error de accept no se reintenta y termina el loop.

use crate::error::{Result, ServerError};
use crate::pool::{Connection, PoolState, WorkQueue};
use crate::server::acceptor::Acceptor;
use std::sync::Arc;

pub struct Dispatcher<A: Acceptor> {
    acceptor: A,
    queue: Arc<WorkQueue<A::Conn>>,
    state: Arc<PoolState>,
}

impl<A: Acceptor> Dispatcher<A> {
    pub fn new(acceptor: A, queue: Arc<WorkQueue<A::Conn>>, state: Arc<PoolState>) -> Self {
        Self {
            acceptor,
            queue,
            state,
        }
    }

    /// Corre hasta que se limpie el flag de ejecución o falle el accept.
    /// Retorna cuántas conexiones se apilaron. El acceptor (y con él el
    /// socket de escucha) se libera al retornar.
    pub fn run(mut self) -> Result<u64> {
        let mut accepted = 0u64;

        while self.state.is_running() {
            match self.acceptor.accept() {
                Ok(Some(conn)) => {
                    let label = conn.label();
                    self.queue.push(conn);
                    accepted += 1;
                    log::trace!("pushed connection {} onto the queue", label);
                }
                Ok(None) => continue,
                Err(e) => {
                    log::error!("unable to accept connection: {}", e);
                    return Err(ServerError::Accept(e));
                }
            }
        }

        log::info!("dispatcher stopped after {} connections, closing listener", accepted);
        Ok(accepted)
    }
}
