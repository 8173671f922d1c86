use proptest::prelude::*;

use splitter_engine::plan_split;
use splitter_registry::ConditionRegistry;
use splitter_types::{Address, Amount};

fn weights_summing_to_100() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(1u8..=100, 1..=25).prop_map(|raw| {
        let n = raw.len() as u32;
        let spare = 100 - n;
        let total: u32 = raw.iter().map(|&r| r as u32).sum();
        let mut weights: Vec<u32> = raw.iter().map(|&r| 1 + spare * r as u32 / total).collect();
        let assigned: u32 = weights.iter().sum();
        weights[0] += 100 - assigned;
        weights.into_iter().map(|w| w as u8).collect()
    })
}

fn registry(weights: Vec<u8>) -> ConditionRegistry {
    let recipients = (0..weights.len())
        .map(|i| Address::new(format!("r{i}").into_bytes()))
        .collect();
    ConditionRegistry::from_parallel(Address::from("owner"), recipients, weights).unwrap()
}

proptest! {
    /// Σ payout ≤ B and the truncation remainder is below the recipient count.
    #[test]
    fn remainder_is_bounded(weights in weights_summing_to_100(), balance in any::<u128>()) {
        let reg = registry(weights);
        let plan = plan_split(&reg.snapshot(), Amount::new(balance)).unwrap();

        let distributed: u128 = plan.payouts.iter().map(|p| p.amount.raw()).sum();
        prop_assert!(distributed <= balance);
        prop_assert_eq!(plan.distributed.raw(), distributed);
        prop_assert_eq!(plan.remainder.raw(), balance - distributed);
        prop_assert!(plan.remainder.raw() < reg.count() as u128);
    }

    /// Planning is deterministic for the same weights and balance.
    #[test]
    fn planning_is_deterministic(weights in weights_summing_to_100(), balance in any::<u128>()) {
        let reg = registry(weights);
        let first = plan_split(&reg.snapshot(), Amount::new(balance)).unwrap();
        let second = plan_split(&reg.snapshot(), Amount::new(balance)).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Balances that are multiples of 100 split without remainder.
    #[test]
    fn multiples_of_100_split_exactly(weights in weights_summing_to_100(), hundreds in 0u128..1_000_000_000) {
        let reg = registry(weights);
        let plan = plan_split(&reg.snapshot(), Amount::new(hundreds * 100)).unwrap();
        prop_assert_eq!(plan.remainder, Amount::ZERO);
    }
}
