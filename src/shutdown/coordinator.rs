//! # Coordinador de Apagado
//! src/shutdown/coordinator.rs
//!
//! Protocolo:
//! 1. Lock de salida + lock de cola, limpiar el flag de ejecución
//! 2. Despertar a todos los workers (broadcast)
//! 3. Soltar los locks y esperar la barrera de finalización
//! 4. Join del dispatcher (cierra el listener), descartar lo que quedó en la
//!    cola y armar el reporte

use crate::error::{Result, ServerError};
use crate::metrics::PoolReport;
use crate::pool::{Connection, WorkerPool};
use crate::shutdown::signal::ShutdownSignal;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

pub struct ShutdownCoordinator {
    signal: ShutdownSignal,
    poll_interval: Duration,
    started: Instant,
}

impl ShutdownCoordinator {
    pub fn new(signal: ShutdownSignal, poll_interval: Duration) -> Self {
        Self {
            signal,
            poll_interval,
            started: Instant::now(),
        }
    }

    /// Bloquea hasta que se pida el apagado o el dispatcher termine por su
    /// cuenta (error de accept)
    pub fn wait_for_trigger<T>(&self, dispatcher: &JoinHandle<T>) {
        while !self.signal.is_triggered() && !dispatcher.is_finished() {
            thread::sleep(self.poll_interval);
        }

        if self.signal.is_triggered() {
            log::info!("shutdown requested");
        } else {
            log::warn!("dispatcher stopped on its own, shutting down");
        }
    }

    /// Ejecuta el protocolo de apagado y retorna el reporte agregado.
    ///
    /// Si el dispatcher terminó con error, el pool se drena igual y el
    /// error se retorna después de loguear los totales.
    pub fn shutdown<C: Connection>(
        &self,
        pool: WorkerPool<C>,
        dispatcher: Option<JoinHandle<Result<u64>>>,
    ) -> Result<PoolReport> {
        let pool_size = pool.size();

        if !pool.begin_drain() {
            log::warn!("pool was already draining");
        }

        log::info!("waiting for {} pool workers to exit", pool_size);
        let (totals, queue) = pool.join();
        log::info!("all pool workers exited");

        let mut dispatch_error = None;
        if let Some(handle) = dispatcher {
            match handle.join() {
                Ok(Ok(_)) => {}
                Ok(Err(e)) => dispatch_error = Some(e),
                Err(_) => {
                    log::error!("dispatcher thread panicked");
                    dispatch_error = Some(ServerError::Accept(io::Error::new(
                        io::ErrorKind::Other,
                        "dispatcher thread panicked",
                    )));
                }
            }
        }

        // Lo que quedó apilado se pierde
        let leftover = queue.drain();
        let discarded = leftover.len() as u64;
        if discarded > 0 {
            log::warn!("discarding {} queued connections without service", discarded);
        }
        for conn in leftover {
            let closed = panic::catch_unwind(AssertUnwindSafe(|| {
                let label = conn.label();
                if let Err(e) = conn.close() {
                    log::debug!("unable to close discarded {}: {}", label, e);
                }
            }));
            if closed.is_err() {
                log::error!("discarded connection panicked while closing");
            }
        }

        let report = PoolReport::new(
            pool_size,
            totals,
            queue.total_pushed(),
            discarded,
            self.started.elapsed(),
        );
        log::info!("freed all resources");
        log::info!("total connections serviced: {}", report.serviced);

        match dispatch_error {
            Some(e) => Err(e),
            None => Ok(report),
        }
    }
}
