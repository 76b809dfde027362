//! Chain data model
//!
//! Field names follow the Bitcoin-family JSON-RPC schema so the types
//! deserialize directly from `getrawtransaction` / `getblock` responses.

use serde::{Deserialize, Serialize};

/// Satoshis per coin
pub const SATOSHIS_PER_COIN: u64 = 100_000_000;

/// Input unlocking script
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptSig {
    /// Script bytes (hex)
    #[serde(default)]
    pub hex: String,
}

/// Transaction input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vin {
    /// Coinbase data (hex); empty for regular inputs
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub coinbase: String,
    /// Spent transaction id
    #[serde(default)]
    pub txid: String,
    /// Spent output index
    #[serde(default)]
    pub vout: u32,
    /// Unlocking script
    #[serde(rename = "scriptSig", default)]
    pub script_sig: ScriptSig,
    /// Sequence number
    #[serde(default)]
    pub sequence: u32,
    /// Addresses of the spent output, when the node reports them
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub addresses: Vec<String>,
}

/// Output locking script
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptPubKey {
    /// Script bytes (hex)
    #[serde(default)]
    pub hex: String,
    /// Addresses decoded by the node
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub addresses: Vec<String>,
}

/// Transaction output
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vout {
    /// Value in satoshis (serialized as decimal coins under `value`)
    #[serde(rename = "value", with = "coin_amount")]
    pub value_sat: u64,
    /// Output index
    pub n: u32,
    /// Locking script
    #[serde(rename = "scriptPubKey", default)]
    pub script_pub_key: ScriptPubKey,
}

/// Fully resolved transaction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tx {
    /// Raw transaction (hex)
    #[serde(default)]
    pub hex: String,
    /// Transaction id
    pub txid: String,
    /// Transaction version
    #[serde(default)]
    pub version: i32,
    /// Lock time
    #[serde(default)]
    pub locktime: u32,
    /// Inputs
    #[serde(default)]
    pub vin: Vec<Vin>,
    /// Outputs
    #[serde(default)]
    pub vout: Vec<Vout>,
    /// Confirmations at fetch time
    #[serde(default)]
    pub confirmations: u32,
    /// Transaction time (unix seconds)
    #[serde(default)]
    pub time: i64,
    /// Time of the including block (unix seconds)
    #[serde(default)]
    pub blocktime: i64,
}

/// Block header as reported by `getblock` / `getblockheader`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    /// Block hash
    pub hash: String,
    /// Previous block hash
    #[serde(rename = "previousblockhash", default)]
    pub prev: String,
    /// Next block hash, empty at the tip
    #[serde(rename = "nextblockhash", default)]
    pub next: String,
    /// Block height
    pub height: u32,
    /// Confirmations (-1 for blocks off the main chain)
    #[serde(default)]
    pub confirmations: i32,
    /// Serialized size in bytes
    #[serde(default)]
    pub size: u32,
    /// Block time (unix seconds)
    #[serde(default)]
    pub time: i64,
}

/// Block header plus its transactions.
///
/// `txs` holds only fully fetched transactions; a backend may omit
/// transactions its node cannot supply, so `txs.len()` is a lower bound on
/// the node's transaction count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Header fields
    #[serde(flatten)]
    pub header: BlockHeader,
    /// Transactions in block order
    #[serde(rename = "tx", default)]
    pub txs: Vec<Tx>,
}

/// Block header with transaction ids only (`getblock` verbosity 1)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockThin {
    /// Header fields
    #[serde(flatten)]
    pub header: BlockHeader,
    /// Transaction ids in block order
    #[serde(rename = "tx", default)]
    pub txids: Vec<String>,
}

/// Node chain state (`getblockchaininfo`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChainInfo {
    /// Chain name ("main", "test", "regtest")
    pub chain: String,
    /// Validated block count
    #[serde(default)]
    pub blocks: u32,
    /// Known header count
    #[serde(default)]
    pub headers: u32,
    /// Tip hash
    #[serde(rename = "bestblockhash", default)]
    pub best_block_hash: String,
    /// Current difficulty
    #[serde(default)]
    pub difficulty: f64,
    /// Node warnings
    #[serde(default)]
    pub warnings: String,
}

mod coin_amount {
    use super::SATOSHIS_PER_COIN;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(sat: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(*sat as f64 / SATOSHIS_PER_COIN as f64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        let coins = f64::deserialize(deserializer)?;
        if !coins.is_finite() || coins < 0.0 {
            return Err(de::Error::custom(format!("invalid amount {}", coins)));
        }
        Ok((coins * SATOSHIS_PER_COIN as f64).round() as u64)
    }
}
