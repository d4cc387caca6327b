//! # Worker
//! src/pool/worker.rs
//!
//! Thread de larga vida que saca conexiones de la cola y las atiende.
//!
//! Máquina de estados: `Waiting -> Servicing -> Waiting ... -> Exited`.
//! El handler corre sin el lock de la cola, así que los workers atienden en
//! paralelo; el pop sigue siendo exclusivo.

use crate::pool::handler::{Connection, RequestHandler};
use crate::pool::queue::WorkQueue;
use crate::pool::state::{PoolState, WorkerSummary};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Waiting,
    Servicing,
    Exited,
}

pub struct Worker<C, H> {
    id: usize,
    queue: Arc<WorkQueue<C>>,
    pool: Arc<PoolState>,
    handler: Arc<H>,
    state: WorkerState,
    serviced: u64,
    units: u64,
    failures: u64,
}

impl<C, H> Worker<C, H>
where
    C: Connection,
    H: RequestHandler<C>,
{
    pub fn new(id: usize, queue: Arc<WorkQueue<C>>, pool: Arc<PoolState>, handler: Arc<H>) -> Self {
        Self {
            id,
            queue,
            pool,
            handler,
            state: WorkerState::Waiting,
            serviced: 0,
            units: 0,
            failures: 0,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    /// Loop principal. Retorna cuando el pool deja de correr, después de
    /// reportar la salida en la barrera.
    pub fn run(mut self) -> WorkerSummary {
        log::debug!("worker {} started", self.id);

        while let Some(conn) = self.next_connection() {
            self.service(conn);
        }

        self.transition(WorkerState::Exited);
        let summary = WorkerSummary {
            id: self.id,
            serviced: self.serviced,
            units: self.units,
            failures: self.failures,
        };
        log::info!(
            "worker {} exiting after serving {} connections",
            self.id,
            self.serviced
        );
        self.pool.report_exit(summary.clone());
        summary
    }

    /// Espera trabajo o apagado. `None` significa que hay que salir; lo que
    /// quede en la cola se descarta en el teardown.
    fn next_connection(&mut self) -> Option<C> {
        self.transition(WorkerState::Waiting);
        let mut queue = self.queue.lock();

        while queue.is_empty() && self.pool.is_running() {
            log::trace!("worker {} waiting for work", self.id);
            queue = self.queue.wait(queue);
        }

        if !self.pool.is_running() {
            return None;
        }

        let conn = queue.pop()?;
        self.serviced += 1;
        Some(conn)
    }

    /// Un pánico en `label`, `handle` o `close` cuenta como falla y el worker
    /// sigue vivo, así que siempre llega a `report_exit`.
    fn service(&mut self, conn: C) {
        self.transition(WorkerState::Servicing);

        let id = self.id;
        let handler = self.handler.as_ref();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| service_connection(id, handler, conn)));

        match outcome {
            Ok(Some(units)) => self.units += units,
            Ok(None) => self.failures += 1,
            Err(_) => {
                self.failures += 1;
                log::error!("worker {} connection panicked outside the handler", id);
            }
        }
    }

    fn transition(&mut self, next: WorkerState) {
        if self.state != next {
            log::trace!("worker {} {:?} -> {:?}", self.id, self.state, next);
            self.state = next;
        }
    }
}

/// Atiende y cierra una conexión. `None` si el handler falló o entró en pánico.
fn service_connection<C, H>(id: usize, handler: &H, mut conn: C) -> Option<u64>
where
    C: Connection,
    H: RequestHandler<C>,
{
    let label = conn.label();
    log::debug!("worker {} servicing {}", id, label);

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| handler.handle(&mut conn)));
    let units = match outcome {
        Ok(Ok(units)) => Some(units),
        Ok(Err(e)) => {
            log::warn!("worker {} failed to service {}: {}", id, label, e);
            None
        }
        Err(_) => {
            log::error!("worker {} handler panicked on {}", id, label);
            None
        }
    };

    if let Err(e) = conn.close() {
        log::warn!("worker {} unable to close {}: {}", id, label, e);
    }
    units
}
