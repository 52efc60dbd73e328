//! Service layer.
//!
//! - `provider`: Multi-backend data fetch with priority-ordered fallback
//! - `chain`: Chain-adapter capability traits and the reference UTXO adapter
//! - `watcher`: Deposit-watching polling loop
//! - `signer`: External threshold-signing service contract
//! - `orchestrator`: Transfer lifecycle state machine

pub mod chain;
pub mod orchestrator;
pub mod provider;
pub mod signer;
pub mod watcher;
