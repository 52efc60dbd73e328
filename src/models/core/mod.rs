//! Core domain models.

mod asset;
mod network;
mod transaction;
mod transfer;

pub use asset::Asset;
pub use network::{builtin_networks, Network, ProviderEndpoint};
pub use transaction::{ChainTransaction, GatewayAddress, InputChainTransaction};
pub use transfer::{ShardPublicKey, TransferHash, TransferParams};
