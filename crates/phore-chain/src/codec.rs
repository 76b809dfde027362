//! Protobuf transaction codec for the index database
//!
//! Transactions are stored without confirmations; the block time and height
//! travel alongside the transaction fields.

#![allow(missing_docs)] // Proto fields don't need individual docs

use crate::types::{ScriptPubKey, ScriptSig, Tx, Vin, Vout};
use crate::{Error, Result};
use prost::Message;

/// Stored transaction
#[derive(Clone, PartialEq, Message)]
pub struct ProtoTransaction {
    #[prost(bytes = "vec", tag = "1")]
    pub txid: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub hex: Vec<u8>,
    #[prost(uint64, tag = "3")]
    pub blocktime: u64,
    #[prost(uint32, tag = "4")]
    pub locktime: u32,
    #[prost(uint32, tag = "5")]
    pub height: u32,
    #[prost(message, repeated, tag = "6")]
    pub vin: Vec<ProtoVin>,
    #[prost(message, repeated, tag = "7")]
    pub vout: Vec<ProtoVout>,
    #[prost(int32, tag = "8")]
    pub version: i32,
}

/// Stored input
#[derive(Clone, PartialEq, Message)]
pub struct ProtoVin {
    #[prost(string, tag = "1")]
    pub coinbase: String,
    #[prost(bytes = "vec", tag = "2")]
    pub txid: Vec<u8>,
    #[prost(uint32, tag = "3")]
    pub vout: u32,
    #[prost(bytes = "vec", tag = "4")]
    pub script_sig_hex: Vec<u8>,
    #[prost(uint32, tag = "5")]
    pub sequence: u32,
    #[prost(string, repeated, tag = "6")]
    pub addresses: Vec<String>,
}

/// Stored output
#[derive(Clone, PartialEq, Message)]
pub struct ProtoVout {
    /// Big-endian value without leading zero bytes
    #[prost(bytes = "vec", tag = "1")]
    pub value_sat: Vec<u8>,
    #[prost(uint32, tag = "2")]
    pub n: u32,
    #[prost(bytes = "vec", tag = "3")]
    pub script_pub_key_hex: Vec<u8>,
    #[prost(string, repeated, tag = "4")]
    pub addresses: Vec<String>,
}

/// Coin-independent transaction codec
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseParser;

impl BaseParser {
    /// Create a codec
    pub fn new() -> Self {
        Self
    }

    /// Pack a transaction with its block height and block time.
    ///
    /// Hex fields are accepted in either case but unpack as lowercase, so
    /// only lowercase input round-trips unchanged.
    pub fn pack_tx(&self, tx: &Tx, height: u32, block_time: i64) -> Result<Vec<u8>> {
        let blocktime = u64::try_from(block_time)
            .map_err(|_| Error::Codec(format!("negative block time {}", block_time)))?;

        let vin = tx
            .vin
            .iter()
            .enumerate()
            .map(|(i, vin)| -> Result<ProtoVin> {
                Ok(ProtoVin {
                    coinbase: vin.coinbase.clone(),
                    txid: decode_hex(&vin.txid, || format!("vin {} txid", i))?,
                    vout: vin.vout,
                    script_sig_hex: decode_hex(&vin.script_sig.hex, || {
                        format!("vin {} scriptSig", i)
                    })?,
                    sequence: vin.sequence,
                    addresses: vin.addresses.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let vout = tx
            .vout
            .iter()
            .map(|vout| -> Result<ProtoVout> {
                Ok(ProtoVout {
                    value_sat: encode_amount(vout.value_sat),
                    n: vout.n,
                    script_pub_key_hex: decode_hex(&vout.script_pub_key.hex, || {
                        format!("vout {} scriptPubKey", vout.n)
                    })?,
                    addresses: vout.script_pub_key.addresses.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let proto = ProtoTransaction {
            txid: decode_hex(&tx.txid, || "txid".to_string())?,
            hex: decode_hex(&tx.hex, || "hex".to_string())?,
            blocktime,
            locktime: tx.locktime,
            height,
            vin,
            vout,
            version: tx.version,
        };
        Ok(proto.encode_to_vec())
    }

    /// Unpack a transaction and the height it was packed with
    pub fn unpack_tx(&self, buf: &[u8]) -> Result<(Tx, u32)> {
        let proto = ProtoTransaction::decode(buf)?;

        let vin = proto
            .vin
            .into_iter()
            .map(|vin| Vin {
                coinbase: vin.coinbase,
                txid: hex::encode(vin.txid),
                vout: vin.vout,
                script_sig: ScriptSig {
                    hex: hex::encode(vin.script_sig_hex),
                },
                sequence: vin.sequence,
                addresses: vin.addresses,
            })
            .collect();

        let vout = proto
            .vout
            .into_iter()
            .map(|vout| -> Result<Vout> {
                Ok(Vout {
                    value_sat: decode_amount(&vout.value_sat)?,
                    n: vout.n,
                    script_pub_key: ScriptPubKey {
                        hex: hex::encode(vout.script_pub_key_hex),
                        addresses: vout.addresses,
                    },
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let blocktime = i64::try_from(proto.blocktime)
            .map_err(|_| Error::Codec(format!("block time {} out of range", proto.blocktime)))?;

        let tx = Tx {
            hex: hex::encode(proto.hex),
            txid: hex::encode(proto.txid),
            version: proto.version,
            locktime: proto.locktime,
            vin,
            vout,
            confirmations: 0,
            time: blocktime,
            blocktime,
        };
        Ok((tx, proto.height))
    }

    /// Format satoshis as a decimal coin amount
    pub fn amount_to_decimal_string(&self, sat: u64) -> String {
        let coins = sat / crate::types::SATOSHIS_PER_COIN;
        let frac = sat % crate::types::SATOSHIS_PER_COIN;
        if frac == 0 {
            return coins.to_string();
        }
        let frac = format!("{:08}", frac);
        format!("{}.{}", coins, frac.trim_end_matches('0'))
    }
}

fn decode_hex(value: &str, field: impl FnOnce() -> String) -> Result<Vec<u8>> {
    hex::decode(value).map_err(|e| Error::Codec(format!("{}: {}", field(), e)))
}

fn encode_amount(sat: u64) -> Vec<u8> {
    let bytes = sat.to_be_bytes();
    let start = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    bytes[start..].to_vec()
}

fn decode_amount(bytes: &[u8]) -> Result<u64> {
    if bytes.len() > 8 {
        return Err(Error::Codec(format!(
            "amount of {} bytes overflows u64",
            bytes.len()
        )));
    }
    let mut buf = [0u8; 8];
    buf[8 - bytes.len()..].copy_from_slice(bytes);
    Ok(u64::from_be_bytes(buf))
}
