//! # Estado del Pool y Barrera de Finalización
//! src/pool/state.rs
//!
//! `PoolState` guarda el flag de ejecución y los contadores de salida.
//! La barrera se libera únicamente cuando `exited == size`.

use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Resumen que cada worker entrega una sola vez al salir
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkerSummary {
    pub id: usize,
    /// Conexiones sacadas de la cola y atendidas
    pub serviced: u64,
    /// Unidades de trabajo reportadas por el handler
    pub units: u64,
    /// Conexiones cuyo handler falló
    pub failures: u64,
}

/// Totales agregados, válidos después de la barrera
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExitTotals {
    pub exited: usize,
    pub serviced: u64,
    pub units: u64,
    pub failures: u64,
    pub workers: Vec<WorkerSummary>,
}

/// Estado protegido por el lock de salida
pub(crate) struct ExitState {
    totals: ExitTotals,
}

/// Estado compartido del pool
pub struct PoolState {
    size: usize,

    /// true -> false exactamente una vez
    running: AtomicBool,

    exit: Mutex<ExitState>,

    /// Se señala cuando sale el último worker
    all_exited: Condvar,
}

impl PoolState {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            running: AtomicBool::new(true),
            exit: Mutex::new(ExitState {
                totals: ExitTotals::default(),
            }),
            all_exited: Condvar::new(),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Limpia el flag de ejecución. Retorna `false` si ya estaba limpio.
    pub(crate) fn stop(&self) -> bool {
        self.running.swap(false, Ordering::SeqCst)
    }

    pub(crate) fn lock_exit(&self) -> MutexGuard<'_, ExitState> {
        self.exit.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registra la salida de un worker. Se llama una vez por worker.
    pub fn report_exit(&self, summary: WorkerSummary) {
        let mut exit = self.lock_exit();
        let totals = &mut exit.totals;

        debug_assert!(totals.exited < self.size, "more exits than workers");
        totals.exited += 1;
        totals.serviced += summary.serviced;
        totals.units += summary.units;
        totals.failures += summary.failures;

        log::debug!(
            "worker {} is {} of {} to exit ({} serviced)",
            summary.id,
            totals.exited,
            self.size,
            summary.serviced
        );
        totals.workers.push(summary);

        if totals.exited == self.size {
            log::debug!("last worker exited, releasing completion barrier");
            self.all_exited.notify_all();
        }
    }

    /// Cuántos workers ya reportaron salida
    pub fn exited(&self) -> usize {
        self.lock_exit().totals.exited
    }

    /// Bloquea hasta que todos los workers hayan salido.
    ///
    /// La condición se re-evalúa con el lock tomado, así que si la barrera
    /// ya se cumplió retorna de inmediato.
    pub fn await_all_exited(&self) -> ExitTotals {
        let exit = self
            .all_exited
            .wait_while(self.lock_exit(), |exit| exit.totals.exited < self.size)
            .unwrap_or_else(PoisonError::into_inner);
        exit.totals.clone()
    }

    /// Igual que `await_all_exited` pero con límite de tiempo.
    /// Retorna `None` si la barrera no se liberó a tiempo.
    pub fn await_all_exited_for(&self, timeout: Duration) -> Option<ExitTotals> {
        let deadline = Instant::now() + timeout;
        let mut exit = self.lock_exit();

        while exit.totals.exited < self.size {
            let now = Instant::now();
            if now >= deadline {
                return None;
            }
            exit = self
                .all_exited
                .wait_timeout(exit, deadline - now)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }

        Some(exit.totals.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn summary(id: usize, serviced: u64) -> WorkerSummary {
        WorkerSummary {
            id,
            serviced,
            units: serviced * 2,
            failures: 0,
        }
    }

    #[test]
    fn test_running_flag_flips_once() {
        let state = PoolState::new(2);
        assert!(state.is_running());
        assert!(state.stop());
        assert!(!state.is_running());
        assert!(!state.stop());
        assert!(!state.is_running());
    }

    #[test]
    fn test_totals_are_sum_of_workers() {
        let state = PoolState::new(3);
        state.report_exit(summary(0, 4));
        state.report_exit(summary(1, 0));
        state.report_exit(summary(2, 7));

        let totals = state.await_all_exited();
        assert_eq!(totals.exited, 3);
        assert_eq!(totals.serviced, 11);
        assert_eq!(totals.units, 22);
        assert_eq!(totals.workers.len(), 3);
        assert_eq!(
            totals.workers.iter().map(|w| w.serviced).sum::<u64>(),
            totals.serviced
        );
    }

    #[test]
    fn test_barrier_already_satisfied_returns_immediately() {
        let state = PoolState::new(1);
        state.report_exit(summary(0, 1));

        // Sin timeout: no debe quedarse colgado
        let totals = state.await_all_exited();
        assert_eq!(totals.exited, 1);
    }

    #[test]
    fn test_barrier_holds_with_missing_worker() {
        let state = PoolState::new(2);
        state.report_exit(summary(0, 1));

        assert!(state.await_all_exited_for(Duration::from_millis(100)).is_none());
        assert_eq!(state.exited(), 1);

        state.report_exit(summary(1, 1));
        assert!(state.await_all_exited_for(Duration::from_millis(100)).is_some());
    }

    #[test]
    fn test_barrier_waits_for_delayed_exit() {
        let state = Arc::new(PoolState::new(3));

        let exiters: Vec<_> = (0..3)
            .map(|id| {
                let state = Arc::clone(&state);
                thread::spawn(move || {
                    thread::sleep(Duration::from_millis(50 * (id as u64 + 1)));
                    state.report_exit(summary(id, 1));
                })
            })
            .collect();

        let totals = state.await_all_exited();
        // La barrera solo se libera con los tres reportes
        assert_eq!(totals.exited, 3);
        assert_eq!(totals.serviced, 3);

        for exiter in exiters {
            exiter.join().unwrap();
        }
    }
}
