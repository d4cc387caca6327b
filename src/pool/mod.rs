//! # Pool de Workers
//! src/pool/mod.rs
//!
//! Pool de tamaño fijo que consume una única cola LIFO compartida:
//! - `queue`: la cola y su condición "hay trabajo o apagando"
//! - `state`: flag de ejecución, contadores y barrera de finalización
//! - `worker`: el loop de cada thread
//! - `handler`: interfaces `Connection` y `RequestHandler`

pub mod handler;
pub mod queue;
pub mod state;
pub mod worker;

pub use handler::{Connection, RequestHandler};
pub use queue::WorkQueue;
pub use state::{ExitTotals, PoolState, WorkerSummary};
pub use worker::{Worker, WorkerState};

use crate::error::{Result, ServerError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Límite superior de workers aceptado por `start`
pub const MAX_POOL_SIZE: usize = 1024;

/// Conjunto fijo de workers
pub struct WorkerPool<C> {
    queue: Arc<WorkQueue<C>>,
    state: Arc<PoolState>,
    threads: Vec<JoinHandle<WorkerSummary>>,
}

impl<C: Connection> WorkerPool<C> {
    /// Crea la cola y el estado, y lanza exactamente `size` workers.
    ///
    /// Si un thread no arranca, los que ya corrían se detienen y se
    /// retorna `ServerError::Initialization`.
    pub fn start<H>(size: usize, handler: Arc<H>) -> Result<Self>
    where
        H: RequestHandler<C>,
    {
        if size == 0 || size > MAX_POOL_SIZE {
            return Err(ServerError::Initialization {
                reason: format!("pool size must be 1-{}, got {}", MAX_POOL_SIZE, size),
            });
        }

        let mut pool = Self {
            queue: Arc::new(WorkQueue::new()),
            state: Arc::new(PoolState::new(size)),
            threads: Vec::with_capacity(size),
        };

        for id in 0..size {
            let worker = Worker::new(
                id,
                Arc::clone(&pool.queue),
                Arc::clone(&pool.state),
                Arc::clone(&handler),
            );

            let spawned = thread::Builder::new()
                .name(format!("worker-{}", id))
                .spawn(move || worker.run());

            match spawned {
                Ok(handle) => pool.threads.push(handle),
                Err(e) => {
                    log::error!("unable to spawn worker {}: {}", id, e);
                    pool.abort_start();
                    return Err(ServerError::Initialization {
                        reason: format!("unable to spawn worker {}: {}", id, e),
                    });
                }
            }
        }

        log::info!("spawned {} pool workers", size);
        Ok(pool)
    }

    /// Detiene los workers ya lanzados cuando el arranque falla a medias
    fn abort_start(&mut self) {
        self.begin_drain();
        for handle in self.threads.drain(..) {
            let _ = handle.join();
        }
    }

    pub fn queue(&self) -> &Arc<WorkQueue<C>> {
        &self.queue
    }

    pub fn state(&self) -> &Arc<PoolState> {
        &self.state
    }

    pub fn size(&self) -> usize {
        self.state.size()
    }

    /// Pone el pool en modo drenado.
    ///
    /// Toma el lock de salida y luego el de la cola (siempre en ese orden),
    /// limpia el flag y despierta a todos los workers. Retorna `false` si el
    /// pool ya estaba drenando.
    pub fn begin_drain(&self) -> bool {
        let _exit = self.state.lock_exit();
        let _queue = self.queue.lock();
        let first = self.state.stop();
        self.queue.wake_all();
        first
    }

    /// Espera la barrera y hace join de todos los threads
    pub fn join(self) -> (ExitTotals, Arc<WorkQueue<C>>) {
        let totals = self.state.await_all_exited();

        for handle in self.threads {
            let name = handle.thread().name().unwrap_or("worker").to_string();
            if handle.join().is_err() {
                log::error!("{} terminated abnormally", name);
            }
        }

        (totals, self.queue)
    }
}
