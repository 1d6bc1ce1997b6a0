//! Model-based checks: both registry kinds against a `HashMap`.

use std::collections::HashMap;

use hookslab_registry::{Handle, Registry, RegistryConfig, ShardedRegistry};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    Assign(u32),
    Get(usize),
    Delete(usize),
    Take(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => any::<u32>().prop_map(Op::Assign),
        2 => (0usize..48).prop_map(Op::Get),
        1 => (0usize..48).prop_map(Op::Delete),
        1 => (0usize..48).prop_map(Op::Take),
    ]
}

proptest! {
    #[test]
    fn registry_matches_hashmap_model(ops in proptest::collection::vec(op(), 1..250)) {
        let reg = Registry::new();
        let mut model: HashMap<Handle, u32> = HashMap::new();
        let mut high_water = 0usize;

        for op in ops {
            match op {
                Op::Assign(v) => {
                    let h = reg.assign(v);
                    prop_assert!(model.insert(h, v).is_none(), "handle {} issued twice", h);
                    high_water = high_water.max(model.len());
                }
                Op::Get(i) => prop_assert_eq!(reg.get(Handle(i)), model.get(&Handle(i)).copied()),
                Op::Delete(i) => {
                    reg.delete(Handle(i));
                    model.remove(&Handle(i));
                }
                Op::Take(i) => {
                    prop_assert_eq!(reg.get_and_delete(Handle(i)), model.remove(&Handle(i)));
                }
            }
            prop_assert_eq!(reg.live(), model.len());
        }
        prop_assert_eq!(reg.len(), high_water);

        let m = reg.metrics();
        prop_assert_eq!(m.outstanding(), model.len() as u64);
    }

    #[test]
    fn sharded_matches_hashmap_model(
        shards in 1usize..6,
        ops in proptest::collection::vec(op(), 1..250),
    ) {
        let reg = ShardedRegistry::new(&RegistryConfig { shard_count: shards, initial_capacity: 0 })
            .unwrap();
        let mut model: HashMap<Handle, u32> = HashMap::new();
        let mut high_water = 0usize;

        for op in ops {
            match op {
                Op::Assign(v) => {
                    let h = reg.assign(v);
                    prop_assert!(model.insert(h, v).is_none(), "handle {} issued twice", h);
                    high_water = high_water.max(model.len());
                }
                Op::Get(i) => prop_assert_eq!(reg.get(Handle(i)), model.get(&Handle(i)).copied()),
                Op::Delete(i) => {
                    reg.delete(Handle(i));
                    model.remove(&Handle(i));
                }
                Op::Take(i) => {
                    prop_assert_eq!(reg.get_and_delete(Handle(i)), model.remove(&Handle(i)));
                }
            }
            prop_assert_eq!(reg.live(), model.len());
        }
        // Free slots in any shard are recycled before a shard grows.
        prop_assert_eq!(reg.metrics().slots, high_water);
    }

    #[test]
    fn single_shard_issues_plain_handles(ops in proptest::collection::vec(op(), 1..150)) {
        let plain = Registry::new();
        let sharded = ShardedRegistry::new(&RegistryConfig::default()).unwrap();
        for op in ops {
            match op {
                Op::Assign(v) => prop_assert_eq!(plain.assign(v), sharded.assign(v)),
                Op::Get(i) => prop_assert_eq!(plain.get(Handle(i)), sharded.get(Handle(i))),
                Op::Delete(i) => {
                    plain.delete(Handle(i));
                    sharded.delete(Handle(i));
                }
                Op::Take(i) => prop_assert_eq!(
                    plain.get_and_delete(Handle(i)),
                    sharded.get_and_delete(Handle(i))
                ),
            }
        }
    }
}
