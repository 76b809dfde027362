//! Base58check address encoding driven by the network version bytes

use crate::network::NetworkParams;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Length of a HASH160 payload
pub const HASH160_LEN: usize = 20;

/// Legacy address type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddressKind {
    /// Pay-to-pubkey-hash
    PubKeyHash,
    /// Pay-to-script-hash
    ScriptHash,
}

impl NetworkParams {
    fn version_bytes(&self, kind: AddressKind) -> &[u8] {
        match kind {
            AddressKind::PubKeyHash => &self.pubkey_hash_addr_id,
            AddressKind::ScriptHash => &self.script_hash_addr_id,
        }
    }

    /// Encode a HASH160 as a base58check address of this network
    pub fn encode_address(&self, kind: AddressKind, hash: &[u8; HASH160_LEN]) -> String {
        let version = self.version_bytes(kind);
        let mut payload = Vec::with_capacity(version.len() + HASH160_LEN);
        payload.extend_from_slice(version);
        payload.extend_from_slice(hash);
        bs58::encode(payload).with_check().into_string()
    }

    /// Decode a base58check address, rejecting other networks' version bytes
    pub fn decode_address(&self, address: &str) -> Result<(AddressKind, [u8; HASH160_LEN])> {
        let payload = bs58::decode(address)
            .with_check(None)
            .into_vec()
            .map_err(|e| Error::InvalidAddress(format!("{}: {}", address, e)))?;

        for kind in [AddressKind::PubKeyHash, AddressKind::ScriptHash] {
            let version = self.version_bytes(kind);
            if let Some(hash) = payload.strip_prefix(version) {
                let hash: [u8; HASH160_LEN] = hash.try_into().map_err(|_| {
                    Error::InvalidAddress(format!(
                        "{}: expected {} byte hash, got {}",
                        address,
                        HASH160_LEN,
                        hash.len()
                    ))
                })?;
                return Ok((kind, hash));
            }
        }

        Err(Error::InvalidAddress(format!(
            "{}: unknown version for {}",
            address, self.name
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HASH: [u8; 20] = [
        0x8f, 0x1c, 0x3a, 0x55, 0x02, 0x44, 0x9e, 0x71, 0x0b, 0xc6, 0x2d, 0x90, 0x13, 0x7e, 0xa4,
        0x61, 0x5f, 0x08, 0xd2, 0x3b,
    ];

    #[test]
    fn test_mainnet_pubkey_hash_prefix() {
        let main = NetworkParams::mainnet();
        let address = main.encode_address(AddressKind::PubKeyHash, &HASH);
        // version byte 0x37 renders as a leading 'P'
        assert!(address.starts_with('P'), "{}", address);

        let (kind, hash) = main.decode_address(&address).unwrap();
        assert_eq!(kind, AddressKind::PubKeyHash);
        assert_eq!(hash, HASH);
    }

    #[test]
    fn test_script_hash_decodes_as_script_hash() {
        let test = NetworkParams::testnet();
        let address = test.encode_address(AddressKind::ScriptHash, &HASH);
        let (kind, _) = test.decode_address(&address).unwrap();
        assert_eq!(kind, AddressKind::ScriptHash);
    }

    #[test]
    fn test_rejects_foreign_network() {
        let main = NetworkParams::mainnet();
        let test = NetworkParams::testnet();
        let address = test.encode_address(AddressKind::PubKeyHash, &HASH);
        assert!(main.decode_address(&address).is_err());
    }

    #[test]
    fn test_rejects_bad_checksum() {
        let main = NetworkParams::mainnet();
        let mut address = main.encode_address(AddressKind::PubKeyHash, &HASH);
        let last = address.pop().unwrap();
        address.push(if last == '1' { '2' } else { '1' });
        assert!(matches!(
            main.decode_address(&address),
            Err(Error::InvalidAddress(_))
        ));
    }
}
