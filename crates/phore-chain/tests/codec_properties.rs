//! Property-based tests for the transaction codec

use phore_chain::{BaseParser, ScriptPubKey, ScriptSig, Tx, Vin, Vout};
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

fn hex_strategy(max_len: usize) -> impl Strategy<Value = String> {
    prop::collection::vec(any::<u8>(), 0..max_len).prop_map(hex::encode)
}

fn vin_strategy() -> impl Strategy<Value = Vin> {
    (hex_strategy(33), any::<u32>(), hex_strategy(80), any::<u32>()).prop_map(
        |(txid, vout, script, sequence)| Vin {
            coinbase: String::new(),
            txid,
            vout,
            script_sig: ScriptSig { hex: script },
            sequence,
            addresses: Vec::new(),
        },
    )
}

fn vout_strategy() -> impl Strategy<Value = Vout> {
    (
        any::<u64>(),
        any::<u32>(),
        hex_strategy(40),
        prop::collection::vec("P[1-9A-HJ-NP-Za-km-z]{33}", 0..2),
    )
        .prop_map(|(value_sat, n, script, addresses)| Vout {
            value_sat,
            n,
            script_pub_key: ScriptPubKey {
                hex: script,
                addresses,
            },
        })
}

/// Transactions as they look after an unpack: no confirmations, time equal
/// to the block time
fn stored_tx_strategy() -> impl Strategy<Value = Tx> {
    (
        hex_strategy(32),
        hex_strategy(200),
        any::<i32>(),
        any::<u32>(),
        prop::collection::vec(vin_strategy(), 0..4),
        prop::collection::vec(vout_strategy(), 0..4),
        0i64..=i64::MAX,
    )
        .prop_map(|(txid, hex, version, locktime, vin, vout, time)| Tx {
            hex,
            txid,
            version,
            locktime,
            vin,
            vout,
            confirmations: 0,
            time,
            blocktime: time,
        })
}

// ============================================================================
// Round-trip Properties
// ============================================================================

proptest! {
    /// Property: pack then unpack restores the transaction and its height
    #[test]
    fn prop_pack_unpack_restores_tx(tx in stored_tx_strategy(), height in any::<u32>()) {
        let parser = BaseParser::new();
        let packed = parser.pack_tx(&tx, height, tx.blocktime).unwrap();
        let (unpacked, unpacked_height) = parser.unpack_tx(&packed).unwrap();

        prop_assert_eq!(unpacked_height, height);
        prop_assert_eq!(unpacked, tx);
    }

    /// Property: confirmations never survive packing
    #[test]
    fn prop_confirmations_not_stored(
        tx in stored_tx_strategy(),
        confirmations in 1u32..1_000_000,
    ) {
        let parser = BaseParser::new();
        let mut confirmed = tx.clone();
        confirmed.confirmations = confirmations;

        let packed = parser.pack_tx(&confirmed, 1, tx.blocktime).unwrap();
        prop_assert_eq!(packed, parser.pack_tx(&tx, 1, tx.blocktime).unwrap());
    }

    /// Property: decimal strings carry at most eight fractional digits
    #[test]
    fn prop_decimal_string_precision(sat in any::<u64>()) {
        let s = BaseParser::new().amount_to_decimal_string(sat);
        let frac_len = s.split('.').nth(1).map_or(0, str::len);
        prop_assert!(frac_len <= 8);
        prop_assert!(!s.ends_with('0') || !s.contains('.'));
    }
}
