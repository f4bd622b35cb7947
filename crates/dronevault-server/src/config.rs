//! Server settings from flags and environment
//!
//! Every flag has an environment fallback, and a `.env` file in the working
//! directory is loaded before parsing.

use std::time::Duration;

use anyhow::{bail, Result};
use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser};
use dronevault_core::ConnectConfig;

/// Drone secret extension backed by a vault/item/field secret store
#[derive(Parser, Clone)]
#[command(name = "dronevault")]
#[command(about = "Drone secret extension that resolves vault/item/field paths")]
pub struct Args {
    /// Address to listen on; a leading ':' listens on all interfaces
    #[arg(long, env = "DRONE_BIND", default_value = ":3000")]
    pub bind: String,

    /// Enable debug logging
    #[arg(
        long,
        env = "DRONE_DEBUG",
        default_value = "false",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new()
    )]
    pub debug: bool,

    /// Shared secret Drone presents as a bearer token
    #[arg(long, env = "DRONE_SECRET", hide_env_values = true)]
    pub secret: String,

    /// Secret store base URL (the /v1 API root is appended when missing)
    #[arg(long, env = "OP_CONNECT_HOST")]
    pub connect_host: String,

    /// Bearer token for the secret store
    #[arg(long, env = "OP_CONNECT_TOKEN", hide_env_values = true)]
    pub connect_token: String,

    /// Timeout for each secret store request, e.g. "15s", "500ms", "2m"
    #[arg(long, env = "OP_CONNECT_TIMEOUT", default_value = "15s", value_parser = parse_duration)]
    pub connect_timeout: Duration,
}

impl Args {
    /// Reject settings that parse but cannot work
    pub fn validate(&self) -> Result<()> {
        if self.secret.is_empty() {
            bail!("missing secret key (DRONE_SECRET)");
        }
        if self.connect_host.is_empty() {
            bail!("missing OP_CONNECT_HOST");
        }
        if self.connect_token.is_empty() {
            bail!("missing OP_CONNECT_TOKEN");
        }
        Ok(())
    }

    /// Socket address to bind, expanding `:port` to all interfaces
    pub fn bind_addr(&self) -> String {
        match self.bind.strip_prefix(':') {
            Some(port) => format!("0.0.0.0:{}", port),
            None => self.bind.clone(),
        }
    }

    /// Settings for the store client
    pub fn connect_config(&self) -> ConnectConfig {
        ConnectConfig::new(self.connect_host.clone(), self.connect_token.clone())
            .with_timeout(self.connect_timeout)
    }
}

impl std::fmt::Debug for Args {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Args")
            .field("bind", &self.bind)
            .field("debug", &self.debug)
            .field("connect_host", &self.connect_host)
            .field("connect_timeout", &self.connect_timeout)
            .finish_non_exhaustive()
    }
}

/// Parse a Go style duration such as `15s`, `1m30s`, `1.5s` or `250us`
///
/// A bare number is taken as seconds. Units are `ns`, `us` (`µs`), `ms`,
/// `s`, `m` and `h`; terms may be chained and carry a decimal fraction.
pub fn parse_duration(value: &str) -> Result<Duration, String> {
    let value = value.trim();
    let invalid = || format!("invalid duration \"{}\"", value);

    if value.is_empty() {
        return Err(invalid());
    }
    if value.bytes().all(|b| b.is_ascii_digit()) {
        return value.parse().map(Duration::from_secs).map_err(|_| invalid());
    }

    let mut total: u128 = 0;
    let mut rest = value;
    while !rest.is_empty() {
        let int_len = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        let (int_part, after) = rest.split_at(int_len);
        let (frac_part, after) = match after.strip_prefix('.') {
            Some(after) => {
                let len = after.find(|c: char| !c.is_ascii_digit()).unwrap_or(after.len());
                after.split_at(len)
            }
            None => ("", after),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }

        let unit_len = after
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(after.len());
        let (unit, after) = after.split_at(unit_len);
        let per_unit = unit_nanos(unit).ok_or_else(|| {
            if unit.is_empty() {
                format!("missing unit in duration \"{}\"", value)
            } else {
                format!("unknown duration unit \"{}\" in \"{}\"", unit, value)
            }
        })?;

        let whole: u128 = if int_part.is_empty() {
            0
        } else {
            int_part.parse().map_err(|_| invalid())?
        };
        let term = whole
            .checked_mul(per_unit)
            .and_then(|nanos| nanos.checked_add(fraction_nanos(frac_part, per_unit)))
            .ok_or_else(|| format!("duration \"{}\" is too large", value))?;
        total = total
            .checked_add(term)
            .ok_or_else(|| format!("duration \"{}\" is too large", value))?;
        rest = after;
    }

    let secs = u64::try_from(total / NANOS_PER_SEC)
        .map_err(|_| format!("duration \"{}\" is too large", value))?;
    Ok(Duration::new(secs, (total % NANOS_PER_SEC) as u32))
}

const NANOS_PER_SEC: u128 = 1_000_000_000;

fn unit_nanos(unit: &str) -> Option<u128> {
    match unit {
        "ns" => Some(1),
        "us" | "µs" | "μs" => Some(1_000),
        "ms" => Some(1_000_000),
        "s" => Some(NANOS_PER_SEC),
        "m" => Some(60 * NANOS_PER_SEC),
        "h" => Some(3600 * NANOS_PER_SEC),
        _ => None,
    }
}

/// Nanoseconds contributed by the digits after the decimal point
fn fraction_nanos(digits: &str, per_unit: u128) -> u128 {
    // Digits beyond nanosecond precision of an hour cannot change the result
    let digits = &digits[..digits.len().min(13)];
    if digits.is_empty() {
        return 0;
    }
    let numerator: u128 = digits.parse().unwrap_or(0);
    numerator * per_unit / 10u128.pow(digits.len() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec![
            "dronevault",
            "--secret",
            "shared",
            "--connect-host",
            "https://connect.example.com",
            "--connect-token",
            "token",
        ];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("15s"), Ok(Duration::from_secs(15)));
        assert_eq!(parse_duration("500ms"), Ok(Duration::from_millis(500)));
        assert_eq!(parse_duration("2m"), Ok(Duration::from_secs(120)));
        assert_eq!(parse_duration("1h"), Ok(Duration::from_secs(3600)));
        assert_eq!(parse_duration("30"), Ok(Duration::from_secs(30)));
        assert!(parse_duration("soon").is_err());
        assert!(parse_duration("5d").is_err());
    }

    #[test]
    fn test_parse_duration_compound_and_fractional() {
        assert_eq!(parse_duration("1m30s"), Ok(Duration::from_secs(90)));
        assert_eq!(parse_duration("1h2m3s"), Ok(Duration::from_secs(3723)));
        assert_eq!(parse_duration("1.5s"), Ok(Duration::from_millis(1500)));
        assert_eq!(parse_duration(".5m"), Ok(Duration::from_secs(30)));
        assert_eq!(parse_duration("250us"), Ok(Duration::from_micros(250)));
        assert_eq!(parse_duration("250µs"), Ok(Duration::from_micros(250)));
        assert_eq!(parse_duration("100ns"), Ok(Duration::from_nanos(100)));
        assert!(parse_duration("1.s5").is_err());
        assert!(parse_duration("1m30").is_err());
        assert!(parse_duration(".s").is_err());
        assert!(parse_duration("-5s").is_err());
    }

    #[test]
    fn test_parse_duration_rejects_overflow() {
        let err = parse_duration("999999999999999999h").unwrap_err();
        assert!(err.contains("too large"));
        assert!(parse_duration("99999999999999999999999999999999999999999h").is_err());
        assert!(parse_duration("99999999999999999999999").is_err());
    }

    #[test]
    fn test_defaults() {
        let args = args(&[]);
        assert_eq!(args.bind_addr(), "0.0.0.0:3000");
        assert!(!args.debug);
        assert_eq!(args.connect_timeout, Duration::from_secs(15));
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_explicit_values() {
        let args = args(&["--bind", "127.0.0.1:8080", "--debug", "true", "--connect-timeout", "3s"]);
        assert_eq!(args.bind_addr(), "127.0.0.1:8080");
        assert!(args.debug);
        assert_eq!(args.connect_config().timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_empty_secret_is_rejected() {
        let mut args = args(&[]);
        args.secret.clear();
        assert!(args.validate().unwrap_err().to_string().contains("DRONE_SECRET"));
    }

    #[test]
    fn test_debug_output_hides_secrets() {
        let debug = format!("{:?}", args(&[]));
        assert!(!debug.contains("shared"));
        assert!(!debug.contains("token"));
    }
}
