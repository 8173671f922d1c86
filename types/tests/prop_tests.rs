use proptest::prelude::*;

use splitter_types::{Address, Amount, Weight};

proptest! {
    /// The overflow-free share formula agrees with the naive one wherever
    /// the naive one does not overflow.
    #[test]
    fn share_matches_naive(raw in 0u128..(u128::MAX / 100), w in 1u8..=100) {
        let weight = Weight::new(w).unwrap();
        let expected = raw * w as u128 / 100;
        prop_assert_eq!(Amount::new(raw).share(weight).raw(), expected);
    }

    /// A share never exceeds the amount it was taken from.
    #[test]
    fn share_never_exceeds_whole(raw in any::<u128>(), w in 1u8..=100) {
        let weight = Weight::new(w).unwrap();
        prop_assert!(Amount::new(raw).share(weight) <= Amount::new(raw));
    }

    /// Shares are monotonic in the weight.
    #[test]
    fn share_monotonic_in_weight(raw in any::<u128>(), a in 1u8..=100, b in 1u8..=100) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let amount = Amount::new(raw);
        prop_assert!(amount.share(Weight::new(lo).unwrap()) <= amount.share(Weight::new(hi).unwrap()));
    }

    /// Hex display parses back to the same address.
    #[test]
    fn address_hex_round_trip(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        let addr = Address::new(bytes);
        prop_assert_eq!(Address::from_hex(&addr.to_string()).unwrap(), addr);
    }
}
