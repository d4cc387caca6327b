//! # Reporte de Apagado
//! src/metrics/report.rs
//!
//! Estadísticas agregadas que el coordinador arma después de la barrera.

use crate::pool::{ExitTotals, WorkerSummary};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize)]
pub struct PoolReport {
    pub pool_size: usize,

    /// Conexiones apiladas por el dispatcher
    pub accepted: u64,

    /// Conexiones atendidas por los workers
    pub serviced: u64,

    /// Unidades de trabajo reportadas por el handler
    pub units: u64,

    pub handler_failures: u64,

    /// Conexiones que quedaron en la cola y se cerraron sin atender
    pub discarded: u64,

    pub uptime_ms: u64,

    pub workers: Vec<WorkerSummary>,
}

impl PoolReport {
    pub fn new(pool_size: usize, totals: ExitTotals, accepted: u64, discarded: u64, uptime: Duration) -> Self {
        let mut workers = totals.workers;
        workers.sort_by_key(|w| w.id);

        Self {
            pool_size,
            accepted,
            serviced: totals.serviced,
            units: totals.units,
            handler_failures: totals.failures,
            discarded,
            uptime_ms: uptime.as_millis() as u64,
            workers,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Escribe el reporte como JSON
    pub fn write_json(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()
    }

    /// Imprime el resumen en el log
    pub fn print_summary(&self) {
        log::info!("┌──────────┬────────────┬──────────┬────────────┐");
        log::info!("│ Worker   │ Serviced   │ Units    │ Failures   │");
        log::info!("├──────────┼────────────┼──────────┼────────────┤");
        for worker in &self.workers {
            log::info!(
                "│ {:^8} │ {:^10} │ {:^8} │ {:^10} │",
                worker.id,
                worker.serviced,
                worker.units,
                worker.failures
            );
        }
        log::info!("└──────────┴────────────┴──────────┴────────────┘");
        log::info!(
            "Accepted: {}  Serviced: {}  Discarded: {}  Uptime: {:.1}s",
            self.accepted,
            self.serviced,
            self.discarded,
            self.uptime_ms as f64 / 1000.0
        );
    }
}
