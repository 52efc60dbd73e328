//! Deterministic gateway-address derivation.
//!
//! Turns a shard public key and a transfer hash into a one-time locking
//! address: the public key is reduced to a 160-bit digest, a locking script is
//! built around that digest with the transfer hash pinned in front, and the
//! script is hashed and encoded into the chain's base58check address format.
//!
//! Same inputs always yield a byte-identical script and therefore an identical
//! address, regardless of environment; any party can recompute and verify the
//! expected gateway address from public data.

use bitcoin::{
	hashes::{hash160, Hash},
	opcodes::all::{OP_CHECKSIG, OP_DROP, OP_DUP, OP_EQUALVERIFY, OP_HASH160},
	script::Builder,
	Address, Network as NetworkParams, PublicKey, ScriptBuf,
};

use crate::{
	models::{GatewayAddress, Network, ShardPublicKey, TransferHash},
	services::chain::ChainError,
};

/// Maps a network's address-prefix bytes onto ledger parameters.
///
/// Regtest shares its base58 prefixes with testnet, so both map to the
/// testnet parameter set here.
pub(crate) fn network_params(network: &Network) -> Result<NetworkParams, ChainError> {
	match (network.p2pkh_prefix, network.p2sh_prefix) {
		(0x00, 0x05) => Ok(NetworkParams::Bitcoin),
		(0x6f, 0xc4) => Ok(NetworkParams::Testnet),
		(p2pkh, p2sh) => Err(ChainError::invalid_config(format!(
			"unrecognized address prefixes ({:#04x}, {:#04x}) for {}",
			p2pkh, p2sh, network.slug
		))),
	}
}

/// Builds the gateway locking script for a transfer.
///
/// Layout: `<transfer_hash> OP_DROP OP_DUP OP_HASH160 <hash160(shard_pubkey)>
/// OP_EQUALVERIFY OP_CHECKSIG`. The transfer hash pins the script (and so the
/// address) to one logical transfer; spending still requires a signature from
/// the shard key.
pub fn gateway_script(
	shard_public_key: &ShardPublicKey,
	transfer_hash: &TransferHash,
) -> Result<ScriptBuf, ChainError> {
	let public_key = PublicKey::from_slice(shard_public_key.as_bytes())
		.map_err(|e| ChainError::derivation_error(format!("invalid shard public key: {}", e)))?;
	let public_key_hash = hash160::Hash::hash(&public_key.to_bytes());

	Ok(Builder::new()
		.push_slice(*transfer_hash.as_bytes())
		.push_opcode(OP_DROP)
		.push_opcode(OP_DUP)
		.push_opcode(OP_HASH160)
		.push_slice(public_key_hash.to_byte_array())
		.push_opcode(OP_EQUALVERIFY)
		.push_opcode(OP_CHECKSIG)
		.into_script())
}

/// Derives the chain-encoded gateway address for a transfer.
pub fn gateway_address(
	network: &Network,
	shard_public_key: &ShardPublicKey,
	transfer_hash: &TransferHash,
) -> Result<GatewayAddress, ChainError> {
	let script = gateway_script(shard_public_key, transfer_hash)?;
	let params = network_params(network)?;
	let address = Address::p2sh(&script, params)
		.map_err(|e| ChainError::derivation_error(format!("script hash encoding failed: {}", e)))?;

	Ok(GatewayAddress {
		address: address.to_string(),
		script: script.to_bytes(),
		shard_public_key: shard_public_key.clone(),
		transfer_hash: *transfer_hash,
	})
}
