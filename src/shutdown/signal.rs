//! # Señal de Apagado
//! src/shutdown/signal.rs
//!
//! El handler de señales solo marca un `AtomicBool`; el coordinador lo
//! consulta desde un thread normal y hace ahí las esperas bloqueantes.

use signal_hook::consts::TERM_SIGNALS;
use signal_hook::flag;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Código de salida cuando llega una segunda señal durante el apagado
pub const FORCED_EXIT_CODE: i32 = 130;

/// Disparador de apagado compartible entre threads
#[derive(Clone, Default)]
pub struct ShutdownSignal {
    requested: Arc<AtomicBool>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pide el apagado (idempotente)
    pub fn trigger(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    pub fn is_triggered(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Conecta SIGINT, SIGTERM y SIGQUIT al flag.
    ///
    /// La primera señal pide el apagado ordenado; una segunda mientras el
    /// apagado está en curso termina el proceso con `FORCED_EXIT_CODE`.
    pub fn register_os_signals(&self) -> io::Result<()> {
        for &signal in TERM_SIGNALS {
            // El orden importa: la salida condicional se evalúa antes de
            // que esta misma señal marque el flag
            flag::register_conditional_shutdown(signal, FORCED_EXIT_CODE, Arc::clone(&self.requested))?;
            flag::register(signal, Arc::clone(&self.requested))?;
        }
        log::debug!("registered termination signal handlers");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_trigger_is_shared_between_clones() {
        let signal = ShutdownSignal::new();
        let clone = signal.clone();
        assert!(!clone.is_triggered());

        signal.trigger();
        assert!(clone.is_triggered());

        // Idempotente
        signal.trigger();
        assert!(signal.is_triggered());
    }

    #[test]
    fn test_trigger_from_other_thread() {
        let signal = ShutdownSignal::new();
        let remote = signal.clone();

        thread::spawn(move || remote.trigger()).join().unwrap();
        assert!(signal.is_triggered());
    }

    #[cfg(unix)]
    #[test]
    fn test_os_signal_sets_flag() {
        let signal = ShutdownSignal::new();
        signal.register_os_signals().unwrap();

        signal_hook::low_level::raise(signal_hook::consts::SIGTERM).unwrap();

        for _ in 0..100 {
            if signal.is_triggered() {
                break;
            }
            thread::sleep(Duration::from_millis(10));
        }
        assert!(signal.is_triggered());
    }
}
