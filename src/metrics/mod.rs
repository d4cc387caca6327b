//! # Módulo de Métricas
//! src/metrics/mod.rs
//!
//! Estadísticas del pool que se reportan al terminar el apagado.

pub mod report;

// Re-exportar para facilitar el uso
pub use report::PoolReport;
