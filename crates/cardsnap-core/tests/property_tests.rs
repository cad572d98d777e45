//! Property-based tests for cardsnap-core using proptest
//!
//! These tests verify invariants that should hold for all valid inputs.

use chrono::Datelike;
use proptest::prelude::*;

use cardsnap_core::crypto::VaultCipher;
use cardsnap_core::types::{mask_card_number, parse_expiry, Card, CardCategory};
use uuid::Uuid;

// ============================================
// Arbitrary Implementations
// ============================================

fn arb_key() -> impl Strategy<Value = [u8; 32]> {
    any::<[u8; 32]>()
}

fn arb_category() -> impl Strategy<Value = CardCategory> {
    prop::sample::select(CardCategory::ALL.to_vec())
}

fn arb_card() -> impl Strategy<Value = Card> {
    (
        arb_category(),
        "[a-zA-Z ]{1,30}",
        "[0-9]{4,19}",
        "[a-zA-Z ]{1,40}",
        prop::option::of((1u32..=12, 24u32..=40).prop_map(|(m, y)| format!("{:02}/{}", m, y))),
        any::<u64>(),
        any::<u32>(),
    )
        .prop_map(
            |(category, issuer, number, holder_name, expiry_date, created_at, usage_count)| Card {
                id: Uuid::new_v4(),
                category,
                issuer,
                number,
                holder_name,
                expiry_date,
                cvv: None,
                notes: None,
                job_title: None,
                email: None,
                phone: None,
                dob: None,
                nationality: None,
                color_theme: category.default_theme().to_string(),
                created_at,
                usage_count,
            },
        )
}

// ============================================
// Crypto Boundary Laws
// ============================================

proptest! {
    #[test]
    fn prop_seal_open_round_trip(key in arb_key(), plaintext in prop::collection::vec(any::<u8>(), 0..2048)) {
        let cipher = VaultCipher::new(key);
        let blob = cipher.seal_bytes(&plaintext).unwrap();
        prop_assert_eq!(cipher.open_bytes(&blob), Some(plaintext));
    }

    #[test]
    fn prop_single_bit_flip_rejected(key in arb_key(), plaintext in prop::collection::vec(any::<u8>(), 1..512), pos_seed in any::<usize>(), bit in 0u8..8) {
        let cipher = VaultCipher::new(key);
        let mut blob = cipher.seal_bytes(&plaintext).unwrap();
        let pos = pos_seed % blob.len();
        blob[pos] ^= 1 << bit;
        // Either the nonce, the ciphertext, or the tag changed: never usable
        prop_assert!(cipher.open_bytes(&blob).is_none());
    }

    #[test]
    fn prop_open_never_panics_on_garbage(key in arb_key(), garbage in prop::collection::vec(any::<u8>(), 0..256)) {
        let cipher = VaultCipher::new(key);
        let _ = cipher.open_bytes(&garbage);
    }

    #[test]
    fn prop_typed_card_round_trip(key in arb_key(), card in arb_card()) {
        let cipher = VaultCipher::new(key);
        let blob = cipher.seal(&card).unwrap();
        let back: Card = cipher.open(&blob).unwrap();
        prop_assert_eq!(back, card);
    }
}

// ============================================
// Item Model Invariants
// ============================================

proptest! {
    #[test]
    fn prop_mask_keeps_edges(number in "[0-9]{8,19}") {
        let masked = mask_card_number(&number);
        prop_assert!(masked.starts_with(&number[..4]));
        prop_assert!(masked.ends_with(&number[number.len() - 4..]));
        // Only the edge digits survive; everything else is mask characters
        let digits = masked.chars().filter(char::is_ascii_digit).count();
        prop_assert_eq!(digits, 8);
    }

    #[test]
    fn prop_expiry_is_month_end(month in 1u32..=12, year in 24u32..=99) {
        let date = parse_expiry(&format!("{:02}/{}", month, year)).unwrap();
        prop_assert_eq!(date.succ_opt().unwrap().day0(), 0);
    }

    #[test]
    fn prop_card_json_round_trip(card in arb_card()) {
        let json = serde_json::to_string(&card).unwrap();
        let back: Card = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, card);
    }
}
