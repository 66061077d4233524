//! Runtime configuration for the server and the browse client.
//!
//! Flags are parsed by hand; every flag has an environment fallback so the
//! binaries also run unattended.

use crate::search::engine::{DEFAULT_LIMIT, DEFAULT_MAX_LIMIT};
use crate::viewer::ContactPolicy;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BIND: &str = "127.0.0.1:8080";
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub catalog_path: Option<PathBuf>,
    pub contact_policy: ContactPolicy,
    pub max_limit: usize,
}

impl ServerConfig {
    /// Parses `--bind`, `--catalog`, `--contact-policy` and `--max-limit`.
    /// `args` excludes the program name.
    pub fn from_args(args: &[String]) -> Result<Self> {
        let mut bind = std::env::var("BOOKX_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string());
        let mut catalog_path = std::env::var("BOOKX_CATALOG").ok().map(PathBuf::from);
        let mut contact_policy = ContactPolicy::default();
        let mut max_limit = DEFAULT_MAX_LIMIT;

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--bind" => {
                    bind = flag_value(args, i)?.to_string();
                    i += 2;
                }
                "--catalog" => {
                    catalog_path = Some(PathBuf::from(flag_value(args, i)?));
                    i += 2;
                }
                "--contact-policy" => {
                    contact_policy = flag_value(args, i)?.parse()?;
                    i += 2;
                }
                "--max-limit" => {
                    max_limit = flag_value(args, i)?
                        .parse()
                        .context("--max-limit expects a positive integer")?;
                    i += 2;
                }
                other => {
                    tracing::warn!("Ignoring unknown argument {}", other);
                    i += 1;
                }
            }
        }

        if max_limit == 0 {
            anyhow::bail!("--max-limit must be positive");
        }

        Ok(Self {
            bind_addr: bind
                .parse()
                .with_context(|| format!("invalid bind address {}", bind))?,
            catalog_path,
            contact_policy,
            max_limit,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub server_url: String,
    pub page_size: usize,
    pub debounce: Duration,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key/value source. `BOOKX_PAGE_SIZE` is capped
    /// at the server's default maximum limit.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let server_url = lookup("BOOKX_URL").unwrap_or_else(|| format!("http://{}", DEFAULT_BIND));
        let page_size: usize = match lookup("BOOKX_PAGE_SIZE") {
            Some(raw) => raw.trim().parse().context("BOOKX_PAGE_SIZE must be an integer")?,
            None => DEFAULT_LIMIT,
        };
        let debounce_ms = match lookup("BOOKX_DEBOUNCE_MS") {
            Some(raw) => raw.trim().parse().context("BOOKX_DEBOUNCE_MS must be an integer")?,
            None => DEFAULT_DEBOUNCE_MS,
        };

        if page_size == 0 {
            anyhow::bail!("BOOKX_PAGE_SIZE must be positive");
        }
        let page_size = if page_size > DEFAULT_MAX_LIMIT {
            tracing::warn!(
                "BOOKX_PAGE_SIZE {} exceeds the server limit; using {}",
                page_size,
                DEFAULT_MAX_LIMIT
            );
            DEFAULT_MAX_LIMIT
        } else {
            page_size
        };

        Ok(Self {
            server_url: server_url.trim_end_matches('/').to_string(),
            page_size,
            debounce: Duration::from_millis(debounce_ms),
        })
    }
}

fn flag_value<'a>(args: &'a [String], i: usize) -> Result<&'a str> {
    args.get(i + 1)
        .map(String::as_str)
        .with_context(|| format!("{} expects a value", args[i]))
}
