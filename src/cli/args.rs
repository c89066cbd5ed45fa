//! CLI argument definitions using clap
//!
//! ```text
//! sqlkv [-listen <port>] [-auth_key <secret>] [-db_path <file>] [-drain_timeout <secs>]
//! ```
//!
//! Flags may be written with one dash or two. Positional arguments are
//! rejected.

use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::http_server::config::{DEFAULT_AUTH_KEY, DEFAULT_PORT};
use crate::http_server::HttpServerConfig;
use crate::storage::DEFAULT_DB_PATH;

/// Long flags that may also be spelled with a single dash
const LONG_FLAGS: &[&str] = &[
    "listen",
    "auth_key",
    "db_path",
    "drain_timeout",
    "help",
    "version",
];

/// sqlkv - key-value store and raw SQL over HTTP, backed by SQLite
#[derive(Parser, Debug)]
#[command(name = "sqlkv")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Listen port
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub listen: u16,

    /// Shared secret every request body must carry as `auth_key`
    #[arg(long = "auth_key", default_value = DEFAULT_AUTH_KEY)]
    pub auth_key: String,

    /// Path to the database file, created if absent
    #[arg(long = "db_path", default_value = DEFAULT_DB_PATH)]
    pub db_path: PathBuf,

    /// Seconds to let in-flight requests finish after an interrupt
    /// (waits indefinitely when unset)
    #[arg(long = "drain_timeout", value_name = "SECONDS")]
    pub drain_timeout: Option<u64>,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse_from(normalize_args(std::env::args_os()))
    }

    /// Server configuration described by these flags
    pub fn server_config(&self) -> HttpServerConfig {
        HttpServerConfig::with_port(self.listen)
            .auth_key(self.auth_key.clone())
            .drain_timeout(self.drain_timeout.map(Duration::from_secs))
    }
}

/// Rewrite `-listen 80` / `-auth_key=x` style flags to their `--` form.
///
/// Only known long flag names are touched, and nothing after a bare `--`.
pub fn normalize_args<I, S>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let mut after_terminator = false;
    let mut out = Vec::new();

    for (idx, arg) in args.into_iter().map(Into::into).enumerate() {
        if idx == 0 || after_terminator {
            out.push(arg);
            continue;
        }
        if arg == "--" {
            after_terminator = true;
            out.push(arg);
            continue;
        }

        let rewritten = arg.to_str().and_then(|s| {
            let flag = s.strip_prefix('-').filter(|rest| !rest.starts_with('-'))?;
            let name = flag.split('=').next().unwrap_or(flag);
            LONG_FLAGS.contains(&name).then(|| OsString::from(format!("-{}", s)))
        });
        out.push(rewritten.unwrap_or(arg));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(normalize_args(args.iter().copied()))
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["sqlkv"]).unwrap();
        assert_eq!(cli.listen, 4243);
        assert_eq!(cli.auth_key, "auth");
        assert_eq!(cli.db_path, PathBuf::from("./storage.db"));
        assert_eq!(cli.drain_timeout, None);
    }

    #[test]
    fn test_single_dash_flags() {
        let cli = parse(&["sqlkv", "-listen", "8080", "-auth_key=s3cret"]).unwrap();
        assert_eq!(cli.listen, 8080);
        assert_eq!(cli.auth_key, "s3cret");
    }

    #[test]
    fn test_double_dash_flags() {
        let cli = parse(&["sqlkv", "--listen", "9000", "--db_path", "/tmp/kv.db"]).unwrap();
        assert_eq!(cli.listen, 9000);
        assert_eq!(cli.db_path, PathBuf::from("/tmp/kv.db"));
    }

    #[test]
    fn test_positional_argument_rejected() {
        assert!(parse(&["sqlkv", "extra"]).is_err());
        assert!(parse(&["sqlkv", "-listen", "80", "extra"]).is_err());
    }

    #[test]
    fn test_invalid_port_rejected() {
        assert!(parse(&["sqlkv", "-listen", "http"]).is_err());
        assert!(parse(&["sqlkv", "-listen", "70000"]).is_err());
    }

    #[test]
    fn test_only_known_flags_are_rewritten() {
        let args = normalize_args(["sqlkv", "-x", "-listen=1", "--", "-listen"]);
        assert_eq!(args, ["sqlkv", "-x", "--listen=1", "--", "-listen"]);
    }

    #[test]
    fn test_server_config() {
        let cli = parse(&["sqlkv", "-listen", "1234", "-auth_key", "k", "-drain_timeout", "3"])
            .unwrap();
        let config = cli.server_config();
        assert_eq!(config.socket_addr(), "0.0.0.0:1234");
        assert_eq!(config.auth_key, "k");
        assert_eq!(config.drain_timeout, Some(Duration::from_secs(3)));
    }
}
