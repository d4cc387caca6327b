//! # Pool Server
//! src/lib.rs
//!
//! Servidor TCP con un pool de tamaño fijo de workers, implementado para
//! demostrar conceptos de sistemas operativos: sincronización con mutex y
//! variables de condición, planificación LIFO y apagado coordinado.
//!
//! ## Arquitectura
//!
//! El servidor está dividido en módulos especializados:
//! - `pool`: cola de trabajo, workers, estado compartido y barrera de salida
//! - `server`: acceptor TCP, loop de accept (dispatcher) y respuesta fija
//! - `shutdown`: señal de apagado y coordinador
//! - `metrics`: reporte final agregado
//! - `config`: argumentos CLI y variables de entorno
//! - `error`: taxonomía de errores
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use pool_server::config::Config;
//! use pool_server::server::Server;
//! use pool_server::shutdown::ShutdownSignal;
//!
//! let signal = ShutdownSignal::new();
//! signal.register_os_signals().expect("signal handlers");
//!
//! let server = Server::bind(Config::default()).expect("bind");
//! let report = server.run(signal).expect("server error");
//! println!("Total serviced: {}", report.serviced);
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod pool;
pub mod server;
pub mod shutdown;
