//! Server settings from flags, with environment fallbacks.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use clap::Parser;

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(
    name = "outbreak-server",
    version,
    about = "HTTP service for the zombie building simulation"
)]
pub struct ServerArgs {
    /// Address to bind
    #[arg(long, env = "OUTBREAK_HOST", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(long, env = "OUTBREAK_PORT", default_value_t = 5000)]
    pub port: u16,

    /// Milliseconds between turns while auto-run is on
    #[arg(
        long,
        env = "OUTBREAK_TICK_MS",
        default_value_t = 1000,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub tick_ms: u64,

    /// Seed for reproducible runs (OS entropy when omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Log at debug level
    #[arg(long)]
    pub debug: bool,
}

impl Default for ServerArgs {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 5000,
            tick_ms: 1000,
            seed: None,
            debug: false,
        }
    }
}

impl ServerArgs {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Default log filter when `RUST_LOG` is unset.
    pub fn log_filter(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            "info"
        }
    }
}
