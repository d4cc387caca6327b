//! # Servidor TCP con Pool Fijo
//! src/server/tcp.rs
//!
//! Une las piezas: acceptor -> dispatcher -> cola -> workers -> responder,
//! y delega el apagado en el `ShutdownCoordinator`.

use crate::config::Config;
use crate::error::{Result, ServerError};
use crate::metrics::PoolReport;
use crate::pool::{Connection, WorkerPool};
use crate::server::acceptor::TcpAcceptor;
use crate::server::dispatcher::Dispatcher;
use crate::server::responder::CannedResponder;
use crate::shutdown::{ShutdownCoordinator, ShutdownSignal};
use std::net::{SocketAddr, TcpStream};
use std::sync::Arc;
use std::thread;

pub struct Server {
    config: Config,
    acceptor: TcpAcceptor,
    local_addr: SocketAddr,
}

impl Server {
    /// Crea el socket de escucha. Con puerto 0 el sistema elige uno libre.
    pub fn bind(config: Config) -> Result<Self> {
        config
            .validate()
            .map_err(|reason| ServerError::Config { reason })?;

        let address = config.address();
        log::info!("starting server on {}", address);

        let acceptor = TcpAcceptor::bind(&address, config.accept_poll()).map_err(ServerError::Bind)?;
        let local_addr = acceptor.local_addr().map_err(ServerError::Bind)?;
        log::info!("listening on {}", local_addr);

        Ok(Self {
            config,
            acceptor,
            local_addr,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Corre hasta que `signal` se dispare (o el accept falle) y retorna el
    /// reporte final.
    pub fn run(self, signal: ShutdownSignal) -> Result<PoolReport> {
        let coordinator = ShutdownCoordinator::new(signal, self.config.shutdown_poll());
        let responder = Arc::new(CannedResponder::new(
            self.config.body.clone(),
            self.config.read_timeout(),
        ));

        let pool = WorkerPool::<TcpStream>::start(self.config.workers, responder)?;
        let dispatcher = Dispatcher::new(self.acceptor, Arc::clone(pool.queue()), Arc::clone(pool.state()));

        let spawned = thread::Builder::new()
            .name("dispatcher".to_string())
            .spawn(move || dispatcher.run());

        let dispatcher = match spawned {
            Ok(handle) => handle,
            Err(e) => {
                return Err(abort_start(
                    &coordinator,
                    pool,
                    format!("unable to spawn dispatcher: {}", e),
                ));
            }
        };

        coordinator.wait_for_trigger(&dispatcher);
        coordinator.shutdown(pool, Some(dispatcher))
    }
}

/// El pool ya corre: se drena y se loguea el reporte antes de abortar
fn abort_start<C: Connection>(
    coordinator: &ShutdownCoordinator,
    pool: WorkerPool<C>,
    reason: String,
) -> ServerError {
    match coordinator.shutdown(pool, None) {
        Ok(report) => report.print_summary(),
        Err(e) => log::error!("pool drain after failed start also failed: {}", e),
    }
    ServerError::Initialization { reason }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::time::Duration;

    fn test_config() -> Config {
        Config {
            port: 0,
            workers: 2,
            accept_poll_ms: 10,
            shutdown_poll_ms: 10,
            read_timeout_ms: 1_000,
            body: "pong".to_string(),
            ..Config::default()
        }
    }

    #[test]
    fn test_bind_rejects_invalid_config() {
        let mut config = test_config();
        config.workers = 0;
        assert!(matches!(Server::bind(config), Err(ServerError::Config { .. })));
    }

    #[test]
    fn test_bind_port_in_use() {
        let first = Server::bind(test_config()).unwrap();

        let mut config = test_config();
        config.port = first.local_addr().port();
        assert!(matches!(Server::bind(config), Err(ServerError::Bind(_))));
    }

    #[test]
    fn test_run_serves_and_shuts_down() {
        let server = Server::bind(test_config()).unwrap();
        let addr = server.local_addr();
        let signal = ShutdownSignal::new();

        let runner = thread::spawn({
            let signal = signal.clone();
            move || server.run(signal)
        });

        for _ in 0..3 {
            let mut client = TcpStream::connect(addr).unwrap();
            client.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
            client.write_all(b"GET / HTTP/1.0\r\n\r\n").unwrap();

            let mut text = String::new();
            client.read_to_string(&mut text).unwrap();
            assert!(text.contains("200 OK"));
            assert!(text.contains("X-Worker-Thread: worker-"));
            assert!(text.ends_with("pong"));
        }

        signal.trigger();
        let report = runner.join().unwrap().unwrap();

        assert_eq!(report.pool_size, 2);
        assert_eq!(report.accepted, 3);
        assert_eq!(report.serviced, 3);
        assert_eq!(report.units, 3);
        assert_eq!(report.discarded, 0);
    }

    #[test]
    fn test_abort_start_drains_running_pool() {
        let responder = Arc::new(CannedResponder::new("pong".to_string(), Duration::from_millis(100)));
        let pool = WorkerPool::<TcpStream>::start(2, responder).unwrap();
        let state = Arc::clone(pool.state());
        let coordinator = ShutdownCoordinator::new(ShutdownSignal::new(), Duration::from_millis(5));

        let err = abort_start(&coordinator, pool, "no dispatcher".to_string());

        assert!(matches!(err, ServerError::Initialization { ref reason } if reason == "no dispatcher"));
        assert!(!state.is_running());
        assert_eq!(state.exited(), 2);
    }
}
