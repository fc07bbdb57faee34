//! Property-based tests for minlsh.
//!
//! These tests verify invariants that should hold regardless of input:
//! - Banding parameters stay within the signature budget
//! - Every indexed signature finds its own id
//! - The capacity hint never changes query results
//! - Removal and replacement leave no stale bucket membership

use std::collections::HashSet;

use minlsh::{estimate_jaccard, optimal_params, KeyWidth, LshConfig, MinHash, MinHashLsh};
use proptest::prelude::*;

prop_compose! {
    fn arb_signature(len: usize)(sig in prop::collection::vec(any::<u64>(), len)) -> Vec<u64> {
        sig
    }
}

fn arb_width() -> impl Strategy<Value = KeyWidth> {
    prop_oneof![Just(KeyWidth::Narrow), Just(KeyWidth::Wide)]
}

mod params_props {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(40))]

        #[test]
        fn params_fit_budget(num_hash in 1usize..160, threshold in 0.01f64..=1.0) {
            let p = optimal_params(num_hash, threshold).unwrap();
            prop_assert!(p.rows >= 1);
            prop_assert!(p.bands >= 1);
            prop_assert!(p.rows * p.bands <= num_hash, "{:?} exceeds {}", p, num_hash);
            prop_assert!(p.false_positive >= 0.0 && p.false_negative >= 0.0);
        }

        #[test]
        fn index_reports_optimizer_choice(num_hash in 1usize..96, threshold in 0.05f64..=1.0) {
            let lsh = MinHashLsh::<u32>::wide(num_hash, threshold, 1).unwrap();
            let p = optimal_params(num_hash, threshold).unwrap();
            prop_assert_eq!(lsh.params(), (p.rows, p.bands));
        }
    }
}

mod index_props {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn self_match_is_deterministic(
            sigs in prop::collection::vec(arb_signature(48), 1..20),
            width in arb_width(),
            threshold in 0.1f64..=1.0,
        ) {
            let lsh = MinHashLsh::new(LshConfig::new(48, threshold).with_key_width(width)).unwrap();
            for (i, sig) in sigs.iter().enumerate() {
                lsh.add(i, sig.clone()).unwrap();
            }
            lsh.index();

            for (i, sig) in sigs.iter().enumerate() {
                prop_assert!(lsh.query(sig).unwrap().contains(&i));
            }
        }

        #[test]
        fn query_before_index_always_empty(
            sigs in prop::collection::vec(arb_signature(32), 0..10),
            query in arb_signature(32),
        ) {
            let lsh = MinHashLsh::narrow(32, 0.5, 1).unwrap();
            for (i, sig) in sigs.iter().enumerate() {
                lsh.add(i, sig.clone()).unwrap();
            }
            prop_assert!(lsh.query(&query).unwrap().is_empty());
            for sig in &sigs {
                prop_assert!(lsh.query(sig).unwrap().is_empty());
            }
        }

        #[test]
        fn capacity_hint_has_no_effect(
            sigs in prop::collection::vec(arb_signature(64), 1..25),
            queries in prop::collection::vec(arb_signature(64), 1..5),
            hint_a in 0usize..4,
            hint_b in 0usize..1000,
        ) {
            let a = MinHashLsh::narrow(64, 0.5, hint_a).unwrap();
            let b = MinHashLsh::narrow(64, 0.5, hint_b).unwrap();
            for (i, sig) in sigs.iter().enumerate() {
                a.add(i, sig.clone()).unwrap();
                b.add(i, sig.clone()).unwrap();
            }
            a.index();
            b.index();

            for query in queries.iter().chain(&sigs) {
                prop_assert_eq!(a.query(query).unwrap(), b.query(query).unwrap());
            }
        }

        #[test]
        fn removed_ids_never_returned(
            sigs in prop::collection::vec(arb_signature(32), 2..20),
            remove_mask in prop::collection::vec(any::<bool>(), 20),
        ) {
            let lsh = MinHashLsh::narrow(32, 0.5, 0).unwrap();
            for (i, sig) in sigs.iter().enumerate() {
                lsh.add(i, sig.clone()).unwrap();
            }
            lsh.index();

            let removed: HashSet<usize> = (0..sigs.len()).filter(|&i| remove_mask[i]).collect();
            for id in &removed {
                lsh.remove(id).unwrap();
            }
            lsh.index();

            for (i, sig) in sigs.iter().enumerate() {
                let hits = lsh.query(sig).unwrap();
                prop_assert!(hits.is_disjoint(&removed));
                prop_assert_eq!(hits.contains(&i), !removed.contains(&i));
            }
        }

        #[test]
        fn readd_uses_only_new_signature(
            old in arb_signature(32),
            new in arb_signature(32),
        ) {
            let lsh = MinHashLsh::wide(32, 0.5, 0).unwrap();
            lsh.add("item", old.clone()).unwrap();
            lsh.index();
            lsh.add("item", new.clone()).unwrap();
            lsh.index();

            prop_assert!(lsh.query(&new).unwrap().contains("item"));

            // Without an identical band against `new`, the old buckets must be gone.
            let (rows, bands) = lsh.params();
            let shares_band = (0..bands).any(|b| {
                old[b * rows..(b + 1) * rows] == new[b * rows..(b + 1) * rows]
            });
            prop_assert_eq!(lsh.query(&old).unwrap().contains("item"), shares_band);
        }
    }
}

mod minhash_props {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        #[test]
        fn estimate_in_unit_range(
            left in prop::collection::hash_set("[a-z]{1,6}", 1..30),
            right in prop::collection::hash_set("[a-z]{1,6}", 1..30),
            seed in any::<u64>(),
        ) {
            let mut a = MinHash::new(seed, 64).unwrap();
            a.push_all(&left);
            let mut b = MinHash::new(seed, 64).unwrap();
            b.push_all(&right);

            let est = estimate_jaccard(a.view(), b.view());
            prop_assert!((0.0..=1.0).contains(&est));
            if left == right {
                prop_assert_eq!(est, 1.0);
            }
        }

        #[test]
        fn signature_independent_of_push_order(
            mut words in prop::collection::vec("[a-z]{1,8}", 1..30),
            seed in any::<u64>(),
        ) {
            let mut forward = MinHash::new(seed, 32).unwrap();
            forward.push_all(&words);
            words.reverse();
            let mut backward = MinHash::new(seed, 32).unwrap();
            backward.push_all(&words);
            prop_assert_eq!(forward.signature(), backward.signature());
        }
    }
}
