use rand::rngs::StdRng;
use rand::SeedableRng;

use netlist_partition::{
    BisectionPartitioningConfig, GainModel, Graph, GridLayout, InitialPartitioningMethod, Netlist,
    PassEvent,
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn load(name: &str) -> (Netlist, Graph) {
    let netlist = Netlist::open(format!("{}/tests/data/{name}", env!("CARGO_MANIFEST_DIR")))
        .expect("fixture should parse");
    let graph = Graph::from_netlist(&netlist);
    (netlist, graph)
}

#[test]
fn pairs_end_up_split_by_one_edge() {
    init_logger();
    let (netlist, graph) = load("pairs.txt");
    assert_eq!(graph.vertex_count(), netlist.num_cells as usize);

    let result = graph.partition_bisection(&Default::default());
    assert_eq!(result.best_cut.cut_size, 1);
    assert_eq!(result.best_crossing.net_crossings, 1);
    assert_eq!(result.best_crossing.cut_size, 1);

    let assignment = result.best_cut.partition.assignment(&graph);
    assert_eq!(assignment[&0], 0);
    assert_eq!(assignment[&1], 0);
    assert_eq!(assignment[&2], 0);
    assert_eq!(assignment[&3], 1);

    let layout = GridLayout::place(
        &graph,
        &result.best_cut.partition,
        netlist.num_rows as usize,
        netlist.num_cols as usize,
    )
    .unwrap();
    assert_eq!(layout.to_string(), "0 2\n1 3\n");
}

#[test]
fn clusters_never_get_worse_than_the_seed() {
    init_logger();
    let (netlist, graph) = load("clusters.txt");
    assert_eq!(graph.vertex_count(), 17);
    assert!(graph.neighbours(16).unwrap().is_empty());

    for initial_partitioning in [
        InitialPartitioningMethod::Modulo,
        InitialPartitioningMethod::Random,
        InitialPartitioningMethod::Bfs,
    ] {
        for gain_model in [GainModel::Global, GainModel::Local] {
            let config = BisectionPartitioningConfig {
                initial_partitioning,
                gain_model,
                ..Default::default()
            };

            let seed = graph.partition_initial(
                initial_partitioning,
                &mut StdRng::seed_from_u64(config.rng_seed),
            );
            let seed_cut = graph.calculate_cut_size(&seed);

            let mut lowest_seen = u32::MAX;
            let mut passes = 0;
            let result = graph.partition_bisection_observed(&config, |event| match event {
                PassEvent::Flip { cut_size, locked, .. } => {
                    assert!(*locked <= graph.vertex_count());
                    lowest_seen = lowest_seen.min(*cut_size);
                }
                PassEvent::PassFinished { flips, .. } => {
                    assert!(*flips as usize <= graph.vertex_count());
                    passes += 1;
                }
            });
            assert_eq!(passes, 6);

            let best = &result.best_cut;
            assert_eq!(graph.calculate_cut_size(&best.partition), best.cut_size);
            assert_eq!(
                graph.count_net_crossings(&result.best_crossing.partition),
                result.best_crossing.net_crossings
            );
            assert!(best.cut_size <= seed_cut);
            assert!(best.cut_size <= lowest_seen);

            let [zeros, ones] = best.partition.counts();
            assert_eq!(zeros + ones, 17);
            assert!(zeros.abs_diff(ones) <= 3, "{zeros} vs {ones}");

            GridLayout::place(
                &graph,
                &best.partition,
                netlist.num_rows as usize,
                netlist.num_cols as usize,
            )
            .unwrap();
        }
    }
}

#[test]
fn fewer_passes_stop_early() {
    let (_, graph) = load("clusters.txt");
    let config = BisectionPartitioningConfig {
        passes: 1,
        ..Default::default()
    };
    let mut finished = 0;
    let result = graph.partition_bisection_observed(&config, |event| {
        if let PassEvent::PassFinished { .. } = event {
            finished += 1;
        }
    });
    assert_eq!(finished, 1);
    assert!(result.flips as usize <= graph.vertex_count());
}
