use avl_set::avl_tree::{AvlSet, Error};
use proptest::prelude::*;
use rand::seq::SliceRandom;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::collections::BTreeSet;

const NUM_OF_OPERATIONS: usize = 100_000;

fn height_bound(len: usize) -> f64 {
    1.44 * ((len + 2) as f64).log2()
}

#[test]
fn ascending_insert_builds_expected_tree() {
    let mut set = AvlSet::new();
    for value in 1..=20 {
        set.add(value);
        set.assert_invariants();
    }

    assert_eq!(
        set.iter().cloned().collect::<Vec<u32>>(),
        (1..=20).collect::<Vec<u32>>(),
    );
    assert_eq!(set.root(), Some(&8));
    assert_eq!(set.height(), Some(4));
}

#[test]
fn ascending_triple_rotates_left() {
    let set: AvlSet<u32> = vec![10, 20, 30].into_iter().collect();
    assert_eq!(set.root(), Some(&20));
    assert_eq!(
        set.to_debug_string(),
        "20(height: 1), parent:None\n   10(height: 0), parent:20\n   30(height: 0), parent:20\n",
    );
}

#[test]
fn zig_zag_triple_rotates_twice() {
    let set: AvlSet<u32> = vec![30, 10, 20].into_iter().collect();
    assert_eq!(set.root(), Some(&20));
    assert_eq!(set.height(), Some(1));
    assert_eq!(set.iter().collect::<Vec<&u32>>(), vec![&10, &20, &30]);
    set.assert_invariants();
}

#[test]
fn discard_with_two_children_promotes_predecessor() {
    let mut set: AvlSet<u32> = (1..=7).collect();
    assert_eq!(set.root(), Some(&4));

    assert!(set.discard(&4));

    assert_eq!(set.root(), Some(&3));
    assert_eq!(set.iter().collect::<Vec<&u32>>(), vec![&1, &2, &3, &5, &6, &7]);
    assert_eq!(set.len(), 6);
    assert_eq!(
        set.to_debug_string(),
        concat!(
            "3(height: 2), parent:None\n",
            "   2(height: 1), parent:3\n",
            "      1(height: 0), parent:2\n",
            "   6(height: 1), parent:3\n",
            "      5(height: 0), parent:6\n",
            "      7(height: 0), parent:6\n",
        ),
    );
    set.assert_invariants();
}

#[test]
fn min_max_on_empty_set_fail() {
    let set: AvlSet<u32> = AvlSet::new();
    assert_eq!(set.min(), Err(Error::EmptyTree));
    assert_eq!(set.max(), Err(Error::EmptyTree));
}

#[test]
fn min_max_after_draining_fail() {
    let mut set: AvlSet<u32> = (0..3).collect();
    for value in 0..3 {
        set.discard(&value);
    }
    assert_eq!(set.min(), Err(Error::EmptyTree));
    assert_eq!(set.max(), Err(Error::EmptyTree));
}

#[test]
fn right_heavy_tie_takes_single_rotation() {
    let mut set: AvlSet<u32> = vec![2, 1, 4, 3, 5].into_iter().collect();
    set.discard(&1);
    assert_eq!(set.root(), Some(&4));
    assert_eq!(
        set.to_debug_string(),
        concat!(
            "4(height: 2), parent:None\n",
            "   2(height: 1), parent:4\n",
            "      3(height: 0), parent:2\n",
            "   5(height: 0), parent:4\n",
        ),
    );
    set.assert_invariants();
}

#[test]
fn discard_below_right_heavy_tie_stays_balanced() {
    let mut set: AvlSet<u32> = vec![6, 3, 7, 5, 1, 2, 4, 8].into_iter().collect();
    assert_eq!(set.root(), Some(&3));

    assert!(set.discard(&1));

    set.assert_invariants();
    assert_eq!(set.root(), Some(&6));
    assert_eq!(set.len(), 7);
    assert_eq!(
        set.to_debug_string(),
        concat!(
            "6(height: 3), parent:None\n",
            "   3(height: 2), parent:6\n",
            "      2(height: 0), parent:3\n",
            "      5(height: 1), parent:3\n",
            "         4(height: 0), parent:5\n",
            "   7(height: 1), parent:6\n",
            "      8(height: 0), parent:7\n",
        ),
    );
}

#[test]
fn left_heavy_tie_takes_single_rotation() {
    let mut set: AvlSet<u32> = vec![4, 2, 5, 1, 3].into_iter().collect();
    set.discard(&5);
    assert_eq!(set.root(), Some(&2));
    assert_eq!(
        set.to_debug_string(),
        concat!(
            "2(height: 2), parent:None\n",
            "   1(height: 0), parent:2\n",
            "   4(height: 1), parent:2\n",
            "      3(height: 0), parent:4\n",
        ),
    );
}

#[test]
fn discard_root_of_ascending_tree() {
    let mut set: AvlSet<u32> = (1..=20).collect();
    set.discard(&8);
    assert_eq!(set.root(), Some(&7));
    assert_eq!(set.len(), 19);
    set.assert_invariants();
}

#[test]
fn large_ascending_insert_stays_balanced() {
    let mut set = AvlSet::new();
    for value in 0..NUM_OF_OPERATIONS {
        set.add(value);
    }
    set.assert_invariants();
    assert!((set.height().unwrap() as f64) <= height_bound(set.len()));

    for value in (0..NUM_OF_OPERATIONS).filter(|value| value % 2 == 0) {
        assert!(set.discard(&value));
    }
    set.assert_invariants();
    assert_eq!(set.len(), NUM_OF_OPERATIONS / 2);
    assert_eq!(set.min(), Ok(&1));
    assert_eq!(set.max(), Ok(&(NUM_OF_OPERATIONS - 1)));
}

#[test]
fn int_test_set() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut set = AvlSet::new();
    let mut expected = BTreeSet::new();

    for i in 0..NUM_OF_OPERATIONS {
        let value = rng.gen_range(0..1000u32);

        if rng.gen::<bool>() {
            assert_eq!(set.add(value), expected.insert(value));
        } else {
            assert_eq!(set.discard(&value), expected.remove(&value));
        }
        assert_eq!(set.contains(&value), expected.contains(&value));

        if i % 1000 == 0 {
            set.assert_invariants();
        }
    }

    set.assert_invariants();
    assert_eq!(set.len(), expected.len());
    assert_eq!(set.min().ok(), expected.iter().next());
    assert_eq!(set.max().ok(), expected.iter().next_back());
    assert_eq!(
        set.iter().collect::<Vec<&u32>>(),
        expected.iter().collect::<Vec<&u32>>(),
    );
    assert_eq!(
        set.iter().rev().collect::<Vec<&u32>>(),
        expected.iter().rev().collect::<Vec<&u32>>(),
    );
}

#[test]
fn int_test_round_trip_shuffled() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut values = (0..10_000u32).collect::<Vec<u32>>();
    values.shuffle(&mut rng);

    let mut set = AvlSet::new();
    for &value in &values {
        set.add(value);
    }
    set.assert_invariants();
    assert_eq!(set.len(), values.len());

    values.shuffle(&mut rng);
    for (i, value) in values.iter().enumerate() {
        assert!(set.discard(value));
        if i % 500 == 0 {
            set.assert_invariants();
        }
    }
    assert!(set.is_empty());
    assert_eq!(set.root(), None);
    set.assert_invariants();
}

#[derive(Clone, Copy, Debug)]
enum Op {
    Add(u16),
    Discard(u16),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u16..256).prop_map(Op::Add),
        (0u16..256).prop_map(Op::Discard),
    ]
}

fn distinct_values() -> impl Strategy<Value = Vec<i32>> {
    proptest::collection::btree_set(any::<i32>(), 0..200)
        .prop_map(|values| values.into_iter().collect::<Vec<i32>>())
}

proptest! {
    #[test]
    fn btree_equivalence(ops in proptest::collection::vec(op_strategy(), 0..500)) {
        let mut set = AvlSet::new();
        let mut expected = BTreeSet::new();

        for op in ops {
            match op {
                Op::Add(value) => prop_assert_eq!(set.add(value), expected.insert(value)),
                Op::Discard(value) => prop_assert_eq!(set.discard(&value), expected.remove(&value)),
            }
            set.assert_invariants();
        }

        prop_assert_eq!(set.len(), set.iter().count());
        prop_assert_eq!(
            set.iter().collect::<Vec<&u16>>(),
            expected.iter().collect::<Vec<&u16>>(),
        );
    }

    #[test]
    fn iteration_is_strictly_ascending(values in proptest::collection::vec(any::<i64>(), 0..300)) {
        let set = values.into_iter().collect::<AvlSet<i64>>();
        let sorted = set.iter().collect::<Vec<&i64>>();
        prop_assert!(sorted.windows(2).all(|pair| pair[0] < pair[1]));
        prop_assert_eq!(sorted.len(), set.len());
    }

    #[test]
    fn round_trip_empties_set(
        (inserted, discarded) in distinct_values()
            .prop_flat_map(|values| (Just(values.clone()), Just(values).prop_shuffle()))
    ) {
        let mut set = AvlSet::new();
        for value in inserted {
            prop_assert!(set.add(value));
        }
        set.assert_invariants();

        for value in discarded {
            prop_assert!(set.discard(&value));
            set.assert_invariants();
        }
        prop_assert!(set.is_empty());
        prop_assert_eq!(set.height(), None);
    }

    #[test]
    fn add_and_discard_are_idempotent(
        values in distinct_values(),
        value in any::<i32>(),
    ) {
        let mut once = values.iter().cloned().collect::<AvlSet<i32>>();
        let mut twice = once.clone();

        once.add(value);
        twice.add(value);
        twice.add(value);
        prop_assert_eq!(&once, &twice);
        prop_assert_eq!(once.to_debug_string(), twice.to_debug_string());

        once.discard(&value);
        twice.discard(&value);
        twice.discard(&value);
        prop_assert_eq!(&once, &twice);
        prop_assert_eq!(once.to_debug_string(), twice.to_debug_string());
        twice.assert_invariants();
    }

    #[test]
    fn height_is_logarithmic(values in distinct_values()) {
        let set = values.iter().cloned().collect::<AvlSet<i32>>();
        if let Some(height) = set.height() {
            prop_assert!((height as f64) <= height_bound(set.len()));
        }
    }
}
