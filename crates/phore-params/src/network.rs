//! Phore network definitions

use crate::checkpoints::CheckpointList;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Network identifier carried in every P2P message header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NetworkMagic(pub u32);

impl fmt::Display for NetworkMagic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Main Phore network ("PHR")
pub const MAIN_PHORE_NET: NetworkMagic = NetworkMagic(0x0050_4852);
/// Test Phore network ("TPHR")
pub const TEST_PHORE_NET: NetworkMagic = NetworkMagic(0x5450_4852);

/// DNS seed used for peer discovery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsSeed {
    /// Seed hostname
    pub host: String,
    /// Whether the seed supports service-bit filtering
    pub has_filtering: bool,
}

impl DnsSeed {
    fn new(host: &str, has_filtering: bool) -> Self {
        Self {
            host: host.to_string(),
            has_filtering,
        }
    }
}

/// Consensus and encoding constants of one network.
///
/// Values are built once, registered with a
/// [`ChainParamsRegistry`](crate::ChainParamsRegistry) and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkParams {
    /// Registry name ("mainPhore" / "testPhore")
    pub name: String,
    /// Network magic
    pub net: NetworkMagic,
    /// Default P2P port
    pub default_port: u16,
    /// Peer discovery seeds
    pub dns_seeds: Vec<DnsSeed>,

    /// Proof-of-work limit in compact form
    pub pow_limit_bits: u32,
    /// Coinbase maturity (blocks)
    pub coinbase_maturity: u16,
    /// Difficulty retarget window
    pub target_timespan: Duration,
    /// Target block interval
    pub target_time_per_block: Duration,
    /// Maximum retarget step in either direction
    pub retarget_adjustment_factor: i64,
    /// Allow min-difficulty blocks after `min_diff_reduction_time`
    pub reduce_min_difficulty: bool,
    /// Delay before a min-difficulty block is accepted
    pub min_diff_reduction_time: Duration,
    /// Whether the node supports block generation
    pub generate_supported: bool,

    /// Checkpoints ordered from oldest to newest
    pub checkpoints: CheckpointList,

    /// Relay non-standard transactions
    pub relay_non_std_txs: bool,

    /// Bech32 human-readable part for segwit addresses
    pub bech32_hrp_segwit: String,
    /// Version bytes of pay-to-pubkey-hash addresses
    pub pubkey_hash_addr_id: Vec<u8>,
    /// Version bytes of pay-to-script-hash addresses
    pub script_hash_addr_id: Vec<u8>,
    /// Version bytes of WIF private keys
    pub private_key_id: Vec<u8>,
    /// BIP32 extended private key prefix
    pub hd_private_key_id: [u8; 4],
    /// BIP32 extended public key prefix
    pub hd_public_key_id: [u8; 4],
    /// BIP44 coin type (hardened)
    pub hd_coin_type: u32,
}

impl NetworkParams {
    /// Phore mainnet
    pub fn mainnet() -> Self {
        Self {
            name: "mainPhore".to_string(),
            net: MAIN_PHORE_NET,
            default_port: 11771,
            dns_seeds: vec![
                DnsSeed::new("dns0.phore.io", true),
                DnsSeed::new("phore.seed.rho.industries", true),
            ],

            pow_limit_bits: 0x207f_ffff,
            coinbase_maturity: 50,
            target_timespan: Duration::from_secs(60),
            target_time_per_block: Duration::from_secs(60),
            retarget_adjustment_factor: 4, // 25% less, 400% more
            reduce_min_difficulty: false,
            min_diff_reduction_time: Duration::ZERO,
            generate_supported: true,

            checkpoints: CheckpointList::empty(),

            relay_non_std_txs: false,

            bech32_hrp_segwit: "ph".to_string(),
            pubkey_hash_addr_id: vec![0x37], // starts with P
            script_hash_addr_id: vec![0x0d], // starts with 6
            private_key_id: vec![0xd4],
            hd_private_key_id: [0x02, 0x2d, 0x25, 0x33],
            hd_public_key_id: [0x02, 0x21, 0x31, 0x2b],
            hd_coin_type: 0x8000_01bc,
        }
    }

    /// Phore testnet
    ///
    /// Shares consensus values with mainnet; identity and encodings differ.
    pub fn testnet() -> Self {
        Self {
            name: "testPhore".to_string(),
            net: TEST_PHORE_NET,
            default_port: 11773,
            dns_seeds: Vec::new(),
            checkpoints: CheckpointList::empty(),
            bech32_hrp_segwit: "tph".to_string(),
            pubkey_hash_addr_id: vec![0x8b],
            script_hash_addr_id: vec![0x13],
            private_key_id: vec![0xef],
            hd_private_key_id: [0x3a, 0x80, 0x58, 0x37],
            hd_public_key_id: [0x3a, 0x80, 0x61, 0xa0],
            hd_coin_type: 0x8000_0001,
            ..Self::mainnet()
        }
    }

    /// Length of the address version prefix
    pub fn address_magic_len(&self) -> usize {
        self.pubkey_hash_addr_id.len()
    }

    /// Proof-of-work limit as a big-endian 256-bit target
    pub fn pow_limit(&self) -> Option<[u8; 32]> {
        compact_to_target(self.pow_limit_bits)
    }

    /// Check if these are the main network parameters
    pub fn is_mainnet(&self) -> bool {
        self.net == MAIN_PHORE_NET
    }
}

/// Expand compact difficulty bits into a big-endian 256-bit target.
///
/// Returns `None` for negative or overflowing encodings.
pub fn compact_to_target(bits: u32) -> Option<[u8; 32]> {
    let exponent = (bits >> 24) as usize;
    let mantissa = bits & 0x007f_ffff;
    if mantissa != 0 && bits & 0x0080_0000 != 0 {
        return None;
    }

    let mut target = [0u8; 32];
    if exponent <= 3 {
        let value = mantissa >> (8 * (3 - exponent));
        target[29..].copy_from_slice(&value.to_be_bytes()[1..]);
        return Some(target);
    }

    let mantissa_bytes = &mantissa.to_be_bytes()[1..];
    for (i, byte) in mantissa_bytes.iter().enumerate() {
        // position of this byte counted from the most significant end
        let pos = (32 + i).checked_sub(exponent);
        match pos {
            Some(pos) if pos < 32 => target[pos] = *byte,
            _ if *byte != 0 => return None,
            _ => {}
        }
    }
    Some(target)
}
