use fedsplit_core::DataPartitioner;
use fedsplit_env::{DivideConfig, InMemoryDataset};
use proptest::prelude::*;
use std::collections::HashSet;
use std::io::Write;
use std::sync::Arc;

fn dataset(n: usize) -> Arc<InMemoryDataset> {
    Arc::new(InMemoryDataset::from_pairs(
        (0..n).map(|i| (format!("sample_{}", i), i % 10)).collect(),
    ))
}

fn uniform(n: usize, clients: usize, seed: u64) -> DataPartitioner<InMemoryDataset> {
    let mut p = DataPartitioner::new(dataset(n), DivideConfig::default())
        .unwrap()
        .with_seed(seed);
    p.uniform_partition(clients).expect("clients > 0");
    p
}

proptest! {
    #[test]
    fn uniform_is_deterministic(n in 0usize..500, clients in 1usize..40, seed in any::<u64>()) {
        let p1 = uniform(n, clients, seed);
        let p2 = uniform(n, clients, seed);
        prop_assert_eq!(p1.partitions(), p2.partitions());
    }

    #[test]
    fn uniform_groups_are_disjoint_and_sized(n in 0usize..500, clients in 1usize..40, seed in any::<u64>()) {
        let p = uniform(n, clients, seed);
        let part_len = n / clients;

        prop_assert_eq!(p.num_partitions(), clients);
        prop_assert!(p.get_size().size.iter().all(|&s| s == part_len));

        let mut seen = HashSet::new();
        for idx in p.partitions().iter().flatten() {
            prop_assert!(*idx < n);
            prop_assert!(seen.insert(*idx), "index {} assigned twice", idx);
        }
        prop_assert_eq!(seen.len(), clients * part_len);
    }

    #[test]
    fn use_truncates_to_ratio(n in 1usize..300, clients in 1usize..10, ratio in 0.0f64..=1.0) {
        let config = DivideConfig::default().with_test_ratio(ratio);
        let mut p = DataPartitioner::new(dataset(n), config).unwrap();
        p.uniform_partition(clients).unwrap();

        for id in 0..clients {
            let group_len = p.partitions()[id].len();
            let test_view = p.use_partition(id, true).unwrap();
            prop_assert_eq!(test_view.len(), (group_len as f64 * ratio) as usize);

            let train_view = p.use_partition(id, false).unwrap();
            prop_assert_eq!(train_view.len(), group_len);
        }
        prop_assert!(p.use_partition(clients, false).is_err());
    }

    #[test]
    fn use_preserves_membership(n in 1usize..300, clients in 1usize..10, seed in any::<u64>()) {
        let mut p = uniform(n, clients, seed);
        for id in 0..clients {
            let mut expected = p.partitions()[id].clone();
            let mut got = p.use_partition(id, false).unwrap().indices().to_vec();
            expected.sort_unstable();
            got.sort_unstable();
            prop_assert_eq!(got, expected);
        }
    }

    #[test]
    fn trace_covers_every_index_once(
        owners in proptest::collection::vec(0usize..8, 0..200),
    ) {
        // owners[i] is the raw client of sample i; the trace lists samples in reverse
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "client_id,sample_name,sample_category,category_id").unwrap();
        for (i, owner) in owners.iter().enumerate().rev() {
            writeln!(file, "client{},sample_{},misc,0", owner, i).unwrap();
        }

        let mut p = DataPartitioner::new(dataset(owners.len()), DivideConfig::default()).unwrap();
        p.trace_partition(file.path()).unwrap();

        let distinct: HashSet<usize> = owners.iter().copied().collect();
        prop_assert_eq!(p.num_partitions(), distinct.len());

        let mut all: Vec<usize> = p.partitions().iter().flatten().copied().collect();
        all.sort_unstable();
        prop_assert_eq!(all, (0..owners.len()).collect::<Vec<_>>());

        for group in p.partitions() {
            prop_assert!(!group.is_empty());
            prop_assert!(group.windows(2).all(|w| w[0] < w[1]));
            let owner = owners[group[0]];
            prop_assert!(group.iter().all(|&i| owners[i] == owner));
        }
    }
}

#[test]
fn trace_groups_follow_first_seen_order() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "client_id,sample_name").unwrap();
    writeln!(file, "zeta,sample_2").unwrap();
    writeln!(file, "alpha,sample_0").unwrap();
    writeln!(file, "zeta,sample_1").unwrap();

    let mut p = DataPartitioner::new(dataset(3), DivideConfig::default()).unwrap();
    p.trace_partition(file.path()).unwrap();

    assert_eq!(p.partitions(), &[vec![1, 2], vec![0]]);
}

#[test]
fn use_sequence_is_reproducible_across_runs() {
    let run = || {
        let mut p = uniform(120, 4, 99);
        (0..4)
            .chain(0..4)
            .map(|id| p.use_partition(id, id % 2 == 0).unwrap().indices().to_vec())
            .collect::<Vec<_>>()
    };
    assert_eq!(run(), run());
}
