use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

/// Startup configuration. Every flag can also come from the environment.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "formly-sim-service",
    version,
    about = "Formly AI simulation engine: POST /run returns mock alignment and risk scores"
)]
pub struct ServiceConfig {
    /// Interface to bind.
    #[arg(long, env = "FORMLY_SIM_HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "FORMLY_SIM_PORT", default_value_t = 8000)]
    pub port: u16,

    #[arg(long, env = "FORMLY_SIM_LOG_FORMAT", value_enum, default_value = "text")]
    pub log_format: LogFormat,

    /// Also serve prometheus text on GET /metrics.
    #[arg(long, env = "FORMLY_SIM_METRICS")]
    pub metrics: bool,
}

impl ServiceConfig {
    pub fn bind_target(&self) -> (&str, u16) {
        (self.host.as_str(), self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_bind_all_interfaces_on_8000() {
        let config = ServiceConfig::try_parse_from(["formly-sim-service"]).unwrap();
        assert_eq!(config.bind_target(), ("0.0.0.0", 8000));
        assert_eq!(config.log_format, LogFormat::Text);
        assert!(!config.metrics);
    }

    #[test]
    fn flags_override_defaults() {
        let config = ServiceConfig::try_parse_from([
            "formly-sim-service",
            "--host",
            "127.0.0.1",
            "--port",
            "9001",
            "--log-format",
            "json",
            "--metrics",
        ])
        .unwrap();
        assert_eq!(config.bind_target(), ("127.0.0.1", 9001));
        assert_eq!(config.log_format, LogFormat::Json);
        assert!(config.metrics);
    }

    #[test]
    fn rejects_out_of_range_port() {
        assert!(ServiceConfig::try_parse_from(["formly-sim-service", "--port", "70000"]).is_err());
    }
}
