//! Command-line configuration.

use std::net::SocketAddr;

use clap::Parser;

/// In-memory customer service.
///
/// All data lives in process memory and is gone after a restart.
#[derive(Debug, Clone, Parser)]
#[command(name = "customers", version, about)]
pub struct Config {
    /// Socket address to listen on.
    #[arg(long, default_value = "0.0.0.0:2001")]
    pub bind: SocketAddr,

    /// Prefix the customer routes are mounted under. May be empty.
    #[arg(long, default_value = "/spring", value_parser = parse_base_path)]
    pub base_path: String,

    /// Log filter used when `RUST_LOG` is not set.
    #[arg(long = "log", default_value = "info")]
    pub log_filter: String,
}

/// Accepts `""`, `/` or a path starting with `/`; trailing slashes are dropped.
fn parse_base_path(raw: &str) -> Result<String, String> {
    let trimmed = raw.trim_end_matches('/');
    if !trimmed.is_empty() && !trimmed.starts_with('/') {
        return Err(format!("base path `{raw}` must start with `/`"));
    }
    if trimmed.contains(['{', '}', '*']) {
        return Err(format!("base path `{raw}` must not contain route syntax"));
    }
    Ok(trimmed.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["customers"]).unwrap();
        assert_eq!(config.bind, "0.0.0.0:2001".parse().unwrap());
        assert_eq!(config.base_path, "/spring");
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn base_path_is_normalized() {
        let config = Config::try_parse_from(["customers", "--base-path", "/api/"]).unwrap();
        assert_eq!(config.base_path, "/api");
        let config = Config::try_parse_from(["customers", "--base-path", "/"]).unwrap();
        assert_eq!(config.base_path, "");
        let config = Config::try_parse_from(["customers", "--base-path", ""]).unwrap();
        assert_eq!(config.base_path, "");
    }

    #[test]
    fn rejects_bad_base_paths() {
        assert!(Config::try_parse_from(["customers", "--base-path", "api"]).is_err());
        assert!(Config::try_parse_from(["customers", "--base-path", "/{x}"]).is_err());
    }

    #[test]
    fn rejects_bad_bind_address() {
        assert!(Config::try_parse_from(["customers", "--bind", "nowhere"]).is_err());
    }
}
