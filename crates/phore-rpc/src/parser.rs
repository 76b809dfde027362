//! Phore transaction parser

use phore_chain::{BaseParser, BitcoinParser, BlockChainParser, Result, Tx};
use phore_params::address::HASH160_LEN;
use phore_params::{AddressKind, NetworkParams};
use std::sync::Arc;

/// Parser for Phore transactions.
///
/// Storage packing uses the shared protobuf codec unchanged; address and
/// amount handling come from [`BitcoinParser`].
#[derive(Debug, Clone)]
pub struct PhoreParser {
    bitcoin: BitcoinParser,
    base: BaseParser,
}

impl PhoreParser {
    /// Create a parser for the given network
    pub fn new(params: Arc<NetworkParams>) -> Self {
        Self {
            bitcoin: BitcoinParser::new(params),
            base: BaseParser::new(),
        }
    }

    /// Shared handle to the network parameters
    pub fn params_arc(&self) -> Arc<NetworkParams> {
        self.bitcoin.params_arc()
    }
}

impl BlockChainParser for PhoreParser {
    fn params(&self) -> &NetworkParams {
        self.bitcoin.params()
    }

    fn pack_tx(&self, tx: &Tx, height: u32, block_time: i64) -> Result<Vec<u8>> {
        self.base.pack_tx(tx, height, block_time)
    }

    fn unpack_tx(&self, buf: &[u8]) -> Result<(Tx, u32)> {
        self.base.unpack_tx(buf)
    }

    fn amount_to_decimal_string(&self, sat: u64) -> String {
        self.bitcoin.amount_to_decimal_string(sat)
    }

    fn address_to_hash(&self, address: &str) -> Result<(AddressKind, [u8; HASH160_LEN])> {
        self.bitcoin.address_to_hash(address)
    }

    fn hash_to_address(&self, kind: AddressKind, hash: &[u8; HASH160_LEN]) -> String {
        self.bitcoin.hash_to_address(kind, hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phore_chain::{ScriptPubKey, Vout};

    fn parser() -> PhoreParser {
        PhoreParser::new(Arc::new(NetworkParams::mainnet()))
    }

    #[test]
    fn test_pack_matches_base_codec() {
        let tx = Tx {
            txid: "ab".repeat(32),
            hex: "0100".to_string(),
            version: 1,
            vout: vec![Vout {
                value_sat: 2_500_000_000,
                n: 0,
                script_pub_key: ScriptPubKey {
                    hex: "76a914".to_string(),
                    addresses: Vec::new(),
                },
            }],
            time: 1_540_000_000,
            blocktime: 1_540_000_000,
            ..Default::default()
        };

        let packed = parser().pack_tx(&tx, 42, 1_540_000_000).unwrap();
        assert_eq!(packed, BaseParser::new().pack_tx(&tx, 42, 1_540_000_000).unwrap());
        assert_eq!(parser().unpack_tx(&packed).unwrap(), (tx, 42));
    }

    #[test]
    fn test_unpack_garbage() {
        assert!(parser().unpack_tx(&[0xff, 0xff, 0xff]).is_err());
    }

    #[test]
    fn test_mainnet_address_prefix() {
        let address = parser().hash_to_address(AddressKind::PubKeyHash, &[0u8; HASH160_LEN]);
        assert!(address.starts_with('P'), "{}", address);
        assert_eq!(parser().amount_to_decimal_string(150_000_000), "1.5");
    }
}
