//! Node Configuration
//!
//! Turns the command line into a `NodeConfig`: the listen address, the static
//! routing table (peer addresses, in the order given) and the seed data for
//! the local store, plus a few protocol tunables.

use crate::error::ConfigError;
use std::collections::HashMap;
use std::net::IpAddr;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 9070;
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(2);
pub const DEFAULT_LEDGER_RETENTION: Duration = Duration::from_secs(300);

pub const USAGE: &str = "\
Usage: floodnet-node [OPTIONS]

Options:
  -p, --port <PORT>                 Listen port (default 9070)
      --host <HOST>                 Routable listen host, also used for bare peer ports (default 127.0.0.1)
  -r, --peer <PORT|HOST:PORT>       Add a peer to the routing table (repeatable)
  -d, --data <KEY:VALUE>            Seed the local store (repeatable)
      --timeout-ms <MS>             Lookup wait interval (default 2000)
      --send-attempts <N>           Delivery attempts per peer message (default 1)
      --ledger-retention-secs <S>   Forget request ids after S seconds, 0 = never (default 300)
  -v, --verbose                     Debug logging
  -h, --help                        Print this help

Example: floodnet-node -p 9071 -r 9072 -r 9073 -d key:42";

#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Address this node listens on and puts into the `origin` of its requests.
    pub addr: String,
    /// Peers every request is broadcast to. Fixed for the node's lifetime.
    pub routing_table: Vec<String>,
    /// Initial contents of the local store.
    pub data: HashMap<String, String>,
    pub lookup_timeout: Duration,
    pub send_attempts: usize,
    /// `None` keeps ledger entries forever.
    pub ledger_retention: Option<Duration>,
    pub verbose: bool,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            addr: format!("{}:{}", DEFAULT_HOST, DEFAULT_PORT),
            routing_table: Vec::new(),
            data: HashMap::new(),
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
            send_attempts: 1,
            ledger_retention: Some(DEFAULT_LEDGER_RETENTION),
            verbose: false,
        }
    }
}

impl NodeConfig {
    /// Config for a node at `addr` with the given peers and default tunables.
    pub fn new(addr: impl Into<String>, routing_table: Vec<String>) -> Self {
        Self {
            addr: addr.into(),
            routing_table,
            ..Self::default()
        }
    }

    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    /// Parses process arguments. The first item is the program name and is
    /// skipped.
    pub fn from_args<I>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter().skip(1);

        let mut port = DEFAULT_PORT;
        let mut host = DEFAULT_HOST.to_string();
        let mut peers: Vec<String> = Vec::new();
        let mut config = Self::default();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-p" | "--port" => port = parse_value(&arg, args.next())?,
                "--host" => host = required(&arg, args.next())?,
                "-r" | "--peer" => peers.push(required(&arg, args.next())?),
                "-d" | "--data" => {
                    let entry = required(&arg, args.next())?;
                    let (key, value) = entry
                        .split_once(':')
                        .ok_or_else(|| ConfigError::InvalidData(entry.clone()))?;
                    config.data.insert(key.to_string(), value.to_string());
                }
                "--timeout-ms" => {
                    config.lookup_timeout = Duration::from_millis(parse_value(&arg, args.next())?)
                }
                "--send-attempts" => config.send_attempts = parse_value(&arg, args.next())?,
                "--ledger-retention-secs" => {
                    let secs: u64 = parse_value(&arg, args.next())?;
                    config.ledger_retention = (secs > 0).then(|| Duration::from_secs(secs));
                }
                "-v" | "--verbose" => config.verbose = true,
                "-h" | "--help" => return Err(ConfigError::HelpRequested),
                _ => return Err(ConfigError::UnknownArgument(arg)),
            }
        }

        // The listen address doubles as the origin peers answer to.
        if host
            .parse::<IpAddr>()
            .map(|ip| ip.is_unspecified())
            .unwrap_or(false)
        {
            return Err(ConfigError::UnroutableHost(host));
        }

        config.addr = format!("{}:{}", host, port);
        config.routing_table = peers
            .iter()
            .map(|peer| resolve_peer(&host, peer))
            .collect::<Result<_, _>>()?;

        if config.send_attempts == 0 {
            return Err(ConfigError::ZeroSendAttempts);
        }
        if let Some(retention) = config.ledger_retention
            && retention <= config.lookup_timeout
        {
            return Err(ConfigError::RetentionTooShort {
                retention,
                timeout: config.lookup_timeout,
            });
        }

        Ok(config)
    }
}

fn required(flag: &str, value: Option<String>) -> Result<String, ConfigError> {
    value.ok_or_else(|| ConfigError::MissingValue(flag.to_string()))
}

fn parse_value<T: FromStr>(flag: &str, value: Option<String>) -> Result<T, ConfigError> {
    let value = required(flag, value)?;
    value.parse().map_err(|_| ConfigError::InvalidValue {
        flag: flag.to_string(),
        value,
    })
}

/// A bare port means a peer on our own host.
fn resolve_peer(host: &str, peer: &str) -> Result<String, ConfigError> {
    if peer.parse::<u16>().is_ok() {
        return Ok(format!("{}:{}", host, peer));
    }
    match peer.rsplit_once(':') {
        Some((peer_host, port)) if !peer_host.is_empty() && port.parse::<u16>().is_ok() => {
            Ok(peer.to_string())
        }
        _ => Err(ConfigError::InvalidPeer(peer.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("floodnet-node")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = NodeConfig::from_args(args(&[])).unwrap();

        assert_eq!(config.addr, "127.0.0.1:9070");
        assert!(config.routing_table.is_empty());
        assert!(config.data.is_empty());
        assert_eq!(config.lookup_timeout, DEFAULT_LOOKUP_TIMEOUT);
        assert_eq!(config.send_attempts, 1);
        assert_eq!(config.ledger_retention, Some(DEFAULT_LEDGER_RETENTION));
    }

    #[test]
    fn test_full_command_line() {
        let config = NodeConfig::from_args(args(&[
            "-p", "9071", "-r", "9072", "--peer", "10.0.0.5:9000", "-d", "key:42", "-d",
            "url:http://x", "--timeout-ms", "500", "--send-attempts", "3",
            "--ledger-retention-secs", "0", "-v",
        ]))
        .unwrap();

        assert_eq!(config.addr, "127.0.0.1:9071");
        assert_eq!(
            config.routing_table,
            vec!["127.0.0.1:9072".to_string(), "10.0.0.5:9000".to_string()]
        );
        assert_eq!(config.data.get("key").map(String::as_str), Some("42"));
        // Split happens on the first colon only
        assert_eq!(config.data.get("url").map(String::as_str), Some("http://x"));
        assert_eq!(config.lookup_timeout, Duration::from_millis(500));
        assert_eq!(config.send_attempts, 3);
        assert_eq!(config.ledger_retention, None);
        assert!(config.verbose);
    }

    #[test]
    fn test_host_applies_to_bare_peer_ports() {
        let config = NodeConfig::from_args(args(&["--host", "10.0.0.2", "-r", "9100"])).unwrap();

        assert_eq!(config.addr, "10.0.0.2:9070");
        assert_eq!(config.routing_table, vec!["10.0.0.2:9100".to_string()]);
    }

    #[test]
    fn test_rejects_unspecified_host() {
        // Peers would send responses back to 0.0.0.0
        assert!(matches!(
            NodeConfig::from_args(args(&["--host", "0.0.0.0"])),
            Err(ConfigError::UnroutableHost(_))
        ));
        assert!(matches!(
            NodeConfig::from_args(args(&["--host", "::"])),
            Err(ConfigError::UnroutableHost(_))
        ));
        assert!(NodeConfig::from_args(args(&["--host", "node-a.local"])).is_ok());
    }

    #[test]
    fn test_rejects_malformed_input() {
        assert!(matches!(
            NodeConfig::from_args(args(&["-d", "novalue"])),
            Err(ConfigError::InvalidData(_))
        ));
        assert!(matches!(
            NodeConfig::from_args(args(&["-p"])),
            Err(ConfigError::MissingValue(_))
        ));
        assert!(matches!(
            NodeConfig::from_args(args(&["-p", "abc"])),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            NodeConfig::from_args(args(&["-r", "host:notaport"])),
            Err(ConfigError::InvalidPeer(_))
        ));
        assert!(matches!(
            NodeConfig::from_args(args(&["--bogus"])),
            Err(ConfigError::UnknownArgument(_))
        ));
        assert!(matches!(
            NodeConfig::from_args(args(&["--send-attempts", "0"])),
            Err(ConfigError::ZeroSendAttempts)
        ));
        assert!(matches!(
            NodeConfig::from_args(args(&["--help"])),
            Err(ConfigError::HelpRequested)
        ));
    }

    #[test]
    fn test_retention_must_outlive_lookup() {
        let result = NodeConfig::from_args(args(&[
            "--timeout-ms", "5000", "--ledger-retention-secs", "2",
        ]));

        assert!(matches!(result, Err(ConfigError::RetentionTooShort { .. })));
    }
}
