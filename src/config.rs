//! # Configuración del Servidor
//! src/config.rs
//!
//! Este módulo define la configuración del servidor con soporte completo
//! para argumentos CLI y variables de entorno.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./pool_server --port 3000 \
//!   --workers 10 \
//!   --accept-poll-ms 100 \
//!   --report-json ./data/report.json
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! POOL_PORT=3000 POOL_WORKERS=4 RUST_LOG=debug ./pool_server
//! ```

use crate::pool::MAX_POOL_SIZE;
use clap::Parser;
use std::time::Duration;

/// Configuración del servidor con pool fijo
#[derive(Debug, Clone, Parser)]
#[command(name = "pool_server")]
#[command(about = "Servidor TCP con pool fijo de workers y apagado coordinado")]
#[command(version = "0.1.0")]
pub struct Config {
    /// Puerto en el que escucha el servidor (0 = efímero)
    #[arg(short, long, default_value = "3000", env = "POOL_PORT")]
    pub port: u16,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "127.0.0.1", env = "POOL_HOST")]
    pub host: String,

    // === Pool ===

    /// Número de workers (fijo durante toda la vida del proceso)
    #[arg(short, long = "workers", default_value = "10", env = "POOL_WORKERS")]
    pub workers: usize,

    // === Intervalos ===

    /// Cada cuánto el listener revisa si hay conexiones nuevas (ms).
    ///
    /// Con el listener ocioso, una conexión que llega espera hasta un
    /// intervalo completo antes del accept; el mismo intervalo acota cuánto
    /// tarda el dispatcher en ver el apagado. Bajarlo reduce esa latencia a
    /// costa de más despertares del dispatcher.
    #[arg(long = "accept-poll-ms", default_value = "10", env = "ACCEPT_POLL_MS")]
    pub accept_poll_ms: u64,

    /// Cada cuánto el coordinador revisa la señal de apagado (ms)
    #[arg(long = "shutdown-poll-ms", default_value = "50", env = "SHUTDOWN_POLL_MS")]
    pub shutdown_poll_ms: u64,

    /// Timeout de lectura del request por conexión (ms)
    #[arg(long = "read-timeout-ms", default_value = "5000", env = "READ_TIMEOUT_MS")]
    pub read_timeout_ms: u64,

    // === Respuesta ===

    /// Cuerpo de la respuesta fija
    #[arg(long, default_value = "Booyakasha Bounty!", env = "RESPONSE_BODY")]
    pub body: String,

    // === Salida ===

    /// Archivo donde escribir el reporte final en JSON
    #[arg(long = "report-json", env = "REPORT_JSON")]
    pub report_json: Option<String>,

    /// Nivel de log por defecto (RUST_LOG tiene prioridad)
    #[arg(long = "log-level", default_value = "info", env = "LOG_LEVEL")]
    pub log_level: String,
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI
    pub fn new() -> Self {
        Config::parse()
    }

    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use pool_server::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "127.0.0.1:3000");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn accept_poll(&self) -> Duration {
        Duration::from_millis(self.accept_poll_ms)
    }

    pub fn shutdown_poll(&self) -> Duration {
        Duration::from_millis(self.shutdown_poll_ms)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    /// Valida la configuración
    ///
    /// Retorna errores si hay valores inválidos
    pub fn validate(&self) -> Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("Host must not be empty".to_string());
        }

        // Validar pool
        if self.workers == 0 {
            return Err("Workers must be >= 1".to_string());
        }
        if self.workers > MAX_POOL_SIZE {
            return Err(format!("Workers must be <= {}", MAX_POOL_SIZE));
        }

        // Validar intervalos
        if self.accept_poll_ms == 0 {
            return Err("Accept poll interval must be > 0".to_string());
        }
        if self.shutdown_poll_ms == 0 {
            return Err("Shutdown poll interval must be > 0".to_string());
        }
        if self.read_timeout_ms == 0 {
            return Err("Read timeout must be > 0".to_string());
        }

        Ok(())
    }

    /// Imprime un resumen de la configuración
    pub fn print_summary(&self) {
        log::info!("╔══════════════════════════════════════════════╗");
        log::info!("║        Pool Server Configuration             ║");
        log::info!("╚══════════════════════════════════════════════╝");
        log::info!("🌐 Address:        {}", self.address());
        log::info!("👷 Workers:        {}", self.workers);
        log::info!("⏱️  Accept poll:    {} ms", self.accept_poll_ms);
        log::info!("⏱️  Shutdown poll:  {} ms", self.shutdown_poll_ms);
        log::info!("⏱️  Read timeout:   {} ms", self.read_timeout_ms);
        match &self.report_json {
            Some(path) => log::info!("📄 Report:         {}", path),
            None => log::info!("📄 Report:         log only"),
        }
    }
}

impl Default for Config {
    /// Configuración por defecto
    fn default() -> Self {
        Self {
            port: 3000,
            host: "127.0.0.1".to_string(),
            workers: 10,
            accept_poll_ms: 10,
            shutdown_poll_ms: 50,
            read_timeout_ms: 5_000,
            body: "Booyakasha Bounty!".to_string(),
            report_json: None,
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.workers, 10);
        assert!(config.report_json.is_none());
    }

    #[test]
    fn test_address_custom() {
        let mut config = Config::default();
        config.host = "0.0.0.0".to_string();
        config.port = 8080;
        assert_eq!(config.address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_validate_success() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_durations() {
        let config = Config::default();
        assert_eq!(config.accept_poll(), Duration::from_millis(10));
        assert_eq!(config.shutdown_poll(), Duration::from_millis(50));
        assert_eq!(config.read_timeout(), Duration::from_secs(5));
    }

    // ==================== Validation ====================

    #[test]
    fn test_validate_zero_workers() {
        let mut config = Config::default();
        config.workers = 0;
        let result = config.validate();
        assert!(result.unwrap_err().contains("Workers must be >= 1"));
    }

    #[test]
    fn test_validate_too_many_workers() {
        let mut config = Config::default();
        config.workers = MAX_POOL_SIZE + 1;
        assert!(config.validate().unwrap_err().contains("Workers must be <="));
    }

    #[test]
    fn test_validate_max_workers() {
        let mut config = Config::default();
        config.workers = MAX_POOL_SIZE;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_host() {
        let mut config = Config::default();
        config.host = "  ".to_string();
        assert!(config.validate().unwrap_err().contains("Host"));
    }

    #[test]
    fn test_validate_zero_intervals() {
        let mut config = Config::default();
        config.accept_poll_ms = 0;
        assert!(config.validate().unwrap_err().contains("Accept poll"));

        let mut config = Config::default();
        config.shutdown_poll_ms = 0;
        assert!(config.validate().unwrap_err().contains("Shutdown poll"));

        let mut config = Config::default();
        config.read_timeout_ms = 0;
        assert!(config.validate().unwrap_err().contains("Read timeout"));
    }

    // ==================== CLI ====================

    #[test]
    fn test_parse_cli_args() {
        let config = Config::try_parse_from([
            "pool_server",
            "--port",
            "0",
            "-w",
            "3",
            "--body",
            "hi",
            "--report-json",
            "/tmp/r.json",
        ])
        .unwrap();

        assert_eq!(config.port, 0);
        assert_eq!(config.workers, 3);
        assert_eq!(config.body, "hi");
        assert_eq!(config.report_json.as_deref(), Some("/tmp/r.json"));
    }

    #[test]
    fn test_parse_rejects_bad_number() {
        assert!(Config::try_parse_from(["pool_server", "--workers", "many"]).is_err());
    }

    #[test]
    fn test_config_print_summary() {
        let config = Config::default();
        // Should not panic
        config.print_summary();
    }
}
