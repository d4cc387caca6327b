//! # Pool Server - Entry Point
//! src/main.rs
//!
//! Punto de entrada: parsea la configuración, registra las señales y corre
//! el servidor hasta el apagado.

use pool_server::config::Config;
use pool_server::error::ServerError;
use pool_server::logging;
use pool_server::server::Server;
use pool_server::shutdown::ShutdownSignal;
use std::process::ExitCode;

fn main() -> ExitCode {
    let config = Config::new();
    logging::init(&config.log_level);

    if let Err(e) = config.validate() {
        log::error!("Configuration error: {}", e);
        return ExitCode::from(2);
    }
    config.print_summary();

    // El handler solo marca el flag; el coordinador hace las esperas
    let signal = ShutdownSignal::new();
    if let Err(e) = signal.register_os_signals() {
        log::error!("Unable to register signal handlers: {}", e);
        return ExitCode::from(2);
    }

    let report_path = config.report_json.clone();
    let result = Server::bind(config).and_then(|server| server.run(signal));

    match result {
        Ok(report) => {
            report.print_summary();
            if let Some(path) = report_path {
                if let Err(e) = report.write_json(&path).map_err(ServerError::Report) {
                    log::error!("{} ({})", e, path);
                    return ExitCode::FAILURE;
                }
                log::info!("Report written to {}", path);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("💥 Fatal error: {}", e);
            ExitCode::FAILURE
        }
    }
}
