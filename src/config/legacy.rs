//! Legacy multi-host Redis variable.
//!
//! Older deployments export `REDIS_HOSTS` as a JSON array of `host:port`
//! strings. Only the first entry is used.

use crate::error::ConfigParseError;
use serde_json::Value;

/// Parse a `REDIS_HOSTS` value into the first `(host, port)` pair.
pub fn parse_redis_hosts(variable: &str, raw: &str) -> Result<(String, u16), ConfigParseError> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| ConfigParseError::invalid_json(variable, raw, &e))?;

    let entries = match value {
        Value::Array(entries) => entries,
        _ => {
            return Err(ConfigParseError::new(
                variable,
                raw,
                "expected a JSON array of host:port strings",
            ));
        }
    };

    let first = match entries.first() {
        Some(Value::String(entry)) => entry,
        Some(_) => {
            return Err(ConfigParseError::invalid_host_port(
                variable,
                raw,
                "first entry is not a string",
            ));
        }
        None => {
            return Err(ConfigParseError::new(variable, raw, "array is empty"));
        }
    };

    split_host_port(first).map_err(|reason| ConfigParseError::invalid_host_port(variable, raw, reason))
}

/// Split `host:port` on the last colon.
fn split_host_port(entry: &str) -> Result<(String, u16), &'static str> {
    let (host, port) = entry.rsplit_once(':').ok_or("missing ':'")?;
    let host = host.trim();
    if host.is_empty() {
        return Err("host is empty");
    }
    let port = port.trim().parse::<u16>().map_err(|_| "port is not a number")?;
    Ok((host.to_string(), port))
}
