use std::num::NonZeroUsize;

use clap::{ArgAction, Parser};

use crate::id_allocator::IdPolicy;

/// Service configuration, read from flags with environment fallbacks.
#[derive(Debug, Clone, Parser)]
#[command(name = "pos_catalog", version, about = "Point-of-sale product and category catalog")]
pub struct Config {
    /// Address to listen on
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// How new record ids are derived
    #[arg(long, env = "ID_POLICY", value_enum, default_value_t = IdPolicy::LastPlusOne)]
    pub id_policy: IdPolicy,

    /// Preload the demo catalog
    #[arg(long, env = "SEED_DATA", default_value_t = true, action = ArgAction::Set)]
    pub seed: bool,

    /// Capacity of each store's request channel
    #[arg(long, env = "STORE_BUFFER", default_value = "32")]
    pub store_buffer: NonZeroUsize,
}

impl Config {
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
