//! Cross-chain asset-transfer client library.
//!
//! Moves a value-bearing asset from a source ledger to a destination ledger via
//! a threshold-signing intermediary network. The crate provides:
//!
//! - `models`: Domain data structures (networks, assets, transfers, transactions)
//! - `services`: Provider pool, chain adapters, deposit watcher, orchestrator
//! - `utils`: Retry and logging utilities
//!
//! # Flow
//! 1. A caller selects a source and a destination chain adapter
//! 2. The orchestrator derives a one-time gateway address on the source chain
//! 3. The deposit watcher polls the provider pool for deposits to that address
//! 4. A confirmed deposit is handed to the external signing service
//! 5. The signed payload is submitted to the destination adapter for release

pub mod models;
pub mod services;
pub mod utils;
