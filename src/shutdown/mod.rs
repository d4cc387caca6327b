//! # Módulo de Apagado
//! src/shutdown/mod.rs
//!
//! - `signal`: flag atómico conectado a SIGINT/SIGTERM
//! - `coordinator`: drena el pool, espera la barrera y libera recursos

pub mod coordinator;
pub mod signal;

pub use coordinator::ShutdownCoordinator;
pub use signal::ShutdownSignal;
