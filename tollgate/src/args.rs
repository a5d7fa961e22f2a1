use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

/// Tollgate metered completion proxy
#[derive(Debug, Parser)]
#[command(name = "tollgate", about = "Prepaid balances and a metered proxy for completion APIs")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "tollgate.toml", env = "TOLLGATE_CONFIG")]
    pub config: PathBuf,

    /// Override the listen address
    #[arg(long, env = "TOLLGATE_LISTEN")]
    pub listen: Option<SocketAddr>,

    /// Log filter directive
    #[arg(long, default_value = "info", env = "TOLLGATE_LOG")]
    pub log: String,
}
