//! Transaction-codec capability and the generic Bitcoin parser

use crate::codec::BaseParser;
use crate::types::Tx;
use crate::Result;
use phore_params::address::HASH160_LEN;
use phore_params::{AddressKind, NetworkParams};
use std::sync::Arc;

/// Codec and encoding operations a coin backend exposes to the indexer
pub trait BlockChainParser: Send + Sync {
    /// Network the parser encodes for
    fn params(&self) -> &NetworkParams;

    /// Pack a transaction for storage
    fn pack_tx(&self, tx: &Tx, height: u32, block_time: i64) -> Result<Vec<u8>>;

    /// Unpack a stored transaction and its height
    fn unpack_tx(&self, buf: &[u8]) -> Result<(Tx, u32)>;

    /// Format satoshis as a decimal coin amount
    fn amount_to_decimal_string(&self, sat: u64) -> String;

    /// Decode an address of this network into its kind and HASH160
    fn address_to_hash(&self, address: &str) -> Result<(AddressKind, [u8; HASH160_LEN])>;

    /// Encode a HASH160 as an address of this network
    fn hash_to_address(&self, kind: AddressKind, hash: &[u8; HASH160_LEN]) -> String;
}

/// Network-aware parsing shared by Bitcoin-family coins.
///
/// Carries no storage codec of its own; coin parsers pick one and forward
/// the remaining operations here.
#[derive(Debug, Clone)]
pub struct BitcoinParser {
    params: Arc<NetworkParams>,
    base: BaseParser,
}

impl BitcoinParser {
    /// Create a parser bound to registered network parameters
    pub fn new(params: Arc<NetworkParams>) -> Self {
        Self {
            params,
            base: BaseParser::new(),
        }
    }

    /// Network parameters
    pub fn params(&self) -> &NetworkParams {
        &self.params
    }

    /// Shared handle to the network parameters
    pub fn params_arc(&self) -> Arc<NetworkParams> {
        Arc::clone(&self.params)
    }

    /// Format satoshis as a decimal coin amount
    pub fn amount_to_decimal_string(&self, sat: u64) -> String {
        self.base.amount_to_decimal_string(sat)
    }

    /// Decode an address of this network
    pub fn address_to_hash(&self, address: &str) -> Result<(AddressKind, [u8; HASH160_LEN])> {
        Ok(self.params.decode_address(address)?)
    }

    /// Encode a HASH160 as an address of this network
    pub fn hash_to_address(&self, kind: AddressKind, hash: &[u8; HASH160_LEN]) -> String {
        self.params.encode_address(kind, hash)
    }
}
