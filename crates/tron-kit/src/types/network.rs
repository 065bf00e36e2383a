//! Network identification.

use std::fmt;

/// The Tron network the client is connected to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Network {
    /// Tron mainnet.
    #[default]
    Mainnet,
    /// Shasta testnet.
    Shasta,
    /// Nile testnet.
    Nile,
    /// Any other node, e.g. a private chain.
    Custom,
}

impl Network {
    /// Returns true if this is mainnet.
    pub fn is_mainnet(&self) -> bool {
        matches!(self, Network::Mainnet)
    }

    /// Returns true for the public test networks.
    pub fn is_testnet(&self) -> bool {
        matches!(self, Network::Shasta | Network::Nile)
    }

    /// Returns the network identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Shasta => "shasta",
            Network::Nile => "nile",
            Network::Custom => "custom",
        }
    }

    /// Public HTTP API endpoint, if the network has one.
    pub fn default_url(&self) -> Option<&'static str> {
        match self {
            Network::Mainnet => Some("https://api.trongrid.io"),
            Network::Shasta => Some("https://api.shasta.trongrid.io"),
            Network::Nile => Some("https://nile.trongrid.io"),
            Network::Custom => None,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
