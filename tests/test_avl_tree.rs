mod common;

use avl_collections::avl_tree::AvlSet;
use avl_collections::AvlError;
use rand::Rng;
use std::collections::BTreeSet;

const NUM_OF_OPERATIONS: usize = 10_000;

fn new_rng() -> rand::XorShiftRng {
    rand::SeedableRng::from_seed([1, 1, 1, 1])
}

fn height_bound(len: usize) -> f64 {
    1.44 * ((len + 2) as f64).log2() - 0.328
}

#[test]
fn int_test_scenario() {
    common::init_test_setup();
    let mut set = AvlSet::new();

    for value in &[5, 3, 8, 1, 4, 7, 9, 2] {
        assert!(set.insert(*value));
        assert!(set.validate_invariant());
        assert!(set.validate_balance());
    }

    assert_eq!(
        set.iter().cloned().collect::<Vec<u32>>(),
        vec![1, 2, 3, 4, 5, 7, 8, 9],
    );
    assert_eq!(set.height(), 3);

    assert!(set.remove(&5));
    assert!(set.validate_invariant());
    assert!(set.validate_balance());
    assert_eq!(set.root().map(|node| *node.value()), Some(4));
    assert_eq!(
        set.iter().cloned().collect::<Vec<u32>>(),
        vec![1, 2, 3, 4, 7, 8, 9],
    );
}

#[test]
fn int_test_duplicate_insert() {
    let mut set = AvlSet::new();
    set.insert(10);
    let len = set.len();

    assert!(set.insert(42));
    assert!(!set.insert(42));
    assert_eq!(set.len(), len + 1);
}

#[test]
fn int_test_round_trip() {
    let mut rng = new_rng();
    let mut set = AvlSet::new();
    for _ in 0..1_000 {
        set.insert(rng.gen_range(0, 10_000u32));
    }

    for _ in 0..1_000 {
        let value = rng.gen_range(0, 10_000u32);
        if set.contains(&value) {
            continue;
        }
        let len = set.len();

        assert!(set.insert(value));
        assert!(set.contains(&value));
        assert!(set.remove(&value));
        assert!(!set.contains(&value));
        assert_eq!(set.len(), len);
    }
}

#[test]
fn int_test_invariants_after_each_operation() {
    common::init_test_setup();
    let mut rng = new_rng();
    let mut set = AvlSet::new();
    let mut expected = BTreeSet::new();

    for _ in 0..2_000 {
        let value = rng.gen_range(0, 500u32);
        if rng.gen::<bool>() {
            assert_eq!(set.insert(value), expected.insert(value));
        } else {
            assert_eq!(set.remove(&value), expected.remove(&value));
        }

        assert!(set.validate_invariant());
        assert!(set.validate_balance());
        assert_eq!(set.len(), expected.len());
    }

    assert_eq!(
        set.iter().collect::<Vec<&u32>>(),
        expected.iter().collect::<Vec<&u32>>(),
    );
}

#[test]
fn int_test_order_fidelity() {
    let mut rng = new_rng();
    let mut set = AvlSet::new();
    let mut expected = BTreeSet::new();

    for _ in 0..NUM_OF_OPERATIONS {
        let value = rng.gen::<u32>();
        set.insert(value);
        expected.insert(value);
    }
    for _ in 0..NUM_OF_OPERATIONS / 2 {
        let value = rng.gen::<u32>();
        set.remove(&value);
        expected.remove(&value);
    }
    let victims = expected.iter().step_by(3).cloned().collect::<Vec<u32>>();
    for value in &victims {
        assert!(set.remove(value));
        expected.remove(value);
    }

    let values = set.iter().cloned().collect::<Vec<u32>>();
    assert_eq!(values.len(), set.len());
    assert!(values.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(values, expected.into_iter().collect::<Vec<u32>>());
}

#[test]
fn int_test_height_bound() {
    let mut rng = new_rng();
    let mut set = AvlSet::new();

    for _ in 0..NUM_OF_OPERATIONS {
        set.insert(rng.gen::<u32>());
        assert!(set.height() as f64 <= height_bound(set.len()));
    }
    assert!(set.validate_balance());
}

#[test]
fn int_test_height_bound_sorted_input() {
    let mut set = AvlSet::new();
    for value in 0..NUM_OF_OPERATIONS {
        set.insert(value);
        assert!(set.height() as f64 <= height_bound(set.len()));
    }

    for value in (0..NUM_OF_OPERATIONS).filter(|value| value % 2 == 0) {
        assert!(set.remove(&value));
        assert!(set.height() as f64 <= height_bound(set.len()));
    }
    assert!(set.validate_invariant());
    assert!(set.validate_balance());
}

#[test]
fn int_test_cursor_matches_iter() {
    let mut rng = new_rng();
    let mut set = AvlSet::new();
    for _ in 0..1_000 {
        set.insert(rng.gen::<u32>());
    }

    let mut cursor = set.cursor();
    let mut values = Vec::new();
    while let Some(value) = cursor.next(&set).unwrap() {
        values.push(value);
    }
    assert_eq!(values, set.iter().collect::<Vec<&u32>>());
    assert_eq!(cursor.has_next(&set), Ok(false));
}

#[test]
fn int_test_cursor_fails_fast() {
    common::init_test_setup();
    let mut set = AvlSet::new();
    for value in 0..16u32 {
        set.insert(value);
    }

    let mut cursor = set.cursor();
    assert_eq!(cursor.next(&set), Ok(Some(&0)));
    assert_eq!(cursor.next(&set), Ok(Some(&1)));

    assert!(set.insert(100));
    assert_eq!(
        cursor.next(&set),
        Err(AvlError::StaleIterator {
            expected: 16,
            found: 17,
        }),
    );

    let mut cursor = set.cursor();
    assert_eq!(cursor.has_next(&set), Ok(true));
    assert!(set.remove(&100));
    assert!(cursor.has_next(&set).is_err());
    assert!(cursor.next(&set).is_err());
}

#[test]
fn int_test_into_iter_after_removals() {
    let mut set = AvlSet::new();
    for value in 0..100u32 {
        set.insert(value);
    }
    for value in (0..100u32).filter(|value| value % 5 != 0) {
        set.remove(&value);
    }

    assert_eq!(
        set.into_iter().collect::<Vec<u32>>(),
        (0..100u32).filter(|value| value % 5 == 0).collect::<Vec<u32>>(),
    );
}
