use clap::{Parser, ValueEnum};
use std::net::SocketAddr;

#[derive(Clone, Debug, Parser)]
#[command(version, about = "Roster API server")]
pub struct RosterApiConfig {
    #[clap(
        short,
        long,
        env = "ROSTER_API_BIND_ADDR",
        default_value = "0.0.0.0:4000"
    )]
    pub bind_addr: SocketAddr,

    /// Path of the SQLite database file, or `:memory:` for a throwaway
    /// database that lives as long as the process.
    #[clap(
        short = 'D',
        long,
        env = "ROSTER_DATABASE_URL",
        default_value = "roster.db"
    )]
    pub database_url: String,

    #[clap(long, env = "ROSTER_DB_MAX_CONNECTIONS", default_value_t = 8)]
    pub db_max_connections: u32,

    /// Origins allowed to call the API from a browser, comma separated. Use
    /// `*` to reflect whatever origin the request came from.
    #[clap(
        long,
        env = "ROSTER_API_ALLOWED_ORIGINS",
        value_delimiter = ',',
        default_value = "http://localhost:5173"
    )]
    pub allowed_origins: Vec<String>,

    #[clap(
        long,
        env = "ROSTER_API_LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Pretty
    )]
    pub log_format: LogFormat,

    #[clap(long, default_value_t = false)]
    pub dump_openapi: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Json,
}
