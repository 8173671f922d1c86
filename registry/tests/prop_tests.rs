use proptest::prelude::*;

use splitter_registry::{ConditionRegistry, RegistryError};
use splitter_types::Address;

/// Split 100 into `n` positive integer weights.
fn weights_summing_to_100(n: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(1u8..=100, n).prop_map(move |raw| {
        let n = raw.len();
        // Give everyone 1, then hand out the remaining 100 - n by the raw proportions.
        let spare = 100 - n as u32;
        let total: u32 = raw.iter().map(|&r| r as u32).sum();
        let mut weights: Vec<u32> = raw.iter().map(|&r| 1 + spare * r as u32 / total).collect();
        let assigned: u32 = weights.iter().sum();
        weights[0] += 100 - assigned;
        weights.into_iter().map(|w| w as u8).collect()
    })
}

fn recipients(n: usize) -> Vec<Address> {
    (0..n).map(|i| Address::new(format!("recipient-{i}").into_bytes())).collect()
}

proptest! {
    /// Every valid initialisation sums to 100 and counts every condition.
    #[test]
    fn valid_init_sums_to_100(weights in (1usize..=20).prop_flat_map(weights_summing_to_100)) {
        let n = weights.len();
        let reg = ConditionRegistry::from_parallel(Address::from("owner"), recipients(n), weights).unwrap();
        prop_assert_eq!(reg.count(), n);
        prop_assert_eq!(reg.snapshot().total_weight(), 100);
        prop_assert!(reg.verify_invariants().is_ok());
    }

    /// Nudging one weight by ±1 always fails with InvalidWeightSum.
    #[test]
    fn off_by_one_always_rejected(
        weights in (2usize..=20).prop_flat_map(weights_summing_to_100),
        up in any::<bool>(),
    ) {
        let mut weights = weights;
        let idx = weights.iter().position(|&w| if up { w < 100 } else { w > 1 }).unwrap();
        if up { weights[idx] += 1 } else { weights[idx] -= 1 }
        let n = weights.len();
        let result = ConditionRegistry::from_parallel(Address::from("owner"), recipients(n), weights);
        let expected = if up { 101 } else { 99 };
        let matched = matches!(result, Err(RegistryError::InvalidWeightSum { sum }) if sum == expected);
        prop_assert!(matched);
    }

    /// Moving a condition to a fresh address preserves count and weight.
    #[test]
    fn update_preserves_count_and_weight(
        weights in (1usize..=10).prop_flat_map(weights_summing_to_100),
        pick in any::<prop::sample::Index>(),
    ) {
        let n = weights.len();
        let addrs = recipients(n);
        let owner = Address::from("owner");
        let mut reg = ConditionRegistry::from_parallel(owner.clone(), addrs.clone(), weights).unwrap();
        let target = &addrs[pick.index(n)];
        let before = reg.get_weight(target).unwrap();
        let id = reg.condition_id_of(target).unwrap();

        let fresh = Address::from("fresh");
        reg.update_recipient(&owner, id, fresh.clone()).unwrap();

        prop_assert_eq!(reg.count(), n);
        prop_assert!(!reg.is_recipient(target));
        prop_assert_eq!(reg.get_weight(&fresh).unwrap(), before);
        prop_assert!(reg.verify_invariants().is_ok());
    }

    /// Ownership transfer by anyone but the owner changes nothing.
    #[test]
    fn non_owner_transfer_is_rejected(caller in "[a-z]{1,8}") {
        prop_assume!(caller != "owner");
        let mut reg = ConditionRegistry::initialize(Address::from("owner"), vec![(Address::from("a"), 100)]).unwrap();
        let caller = Address::new(caller.into_bytes());
        let result = reg.transfer_ownership(&caller, caller.clone());
        prop_assert!(
            matches!(result, Err(RegistryError::Unauthorized { .. })),
            "non-owner transfer must be rejected"
        );
        prop_assert_eq!(reg.owner(), &Address::from("owner"));
    }
}
