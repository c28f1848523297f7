use criterion::{black_box, criterion_group, criterion_main, Criterion};

use pathwise_core::graph::{EdgeKind, KnowledgeGraph};

/// A layered graph: every topic in layer `l` links to every topic in `l + 1`.
fn layered_graph(layers: usize, width: usize) -> KnowledgeGraph {
    let graph = KnowledgeGraph::new();
    for layer in 0..layers {
        for i in 0..width {
            graph.add_topic(format!("t{layer}_{i}"));
        }
    }
    for layer in 0..layers - 1 {
        for i in 0..width {
            for j in 0..width {
                let kind = if i == j {
                    EdgeKind::Prerequisite
                } else {
                    EdgeKind::Related
                };
                graph
                    .add_edge(&format!("t{layer}_{i}"), &format!("t{}_{j}", layer + 1), kind)
                    .expect("source inserted above");
            }
        }
    }
    graph
}

fn bench_path(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_learning_path");

    for (layers, width) in [(10, 5), (50, 10)] {
        let graph = layered_graph(layers, width);
        let end = format!("t{}_{}", layers - 1, width - 1);
        group.bench_function(format!("layers={layers},width={width}"), |b| {
            b.iter(|| graph.find_learning_path(black_box("t0_0"), black_box(&end)))
        });
    }

    group.finish();
}

fn bench_prerequisites(c: &mut Criterion) {
    let graph = layered_graph(50, 10);

    c.bench_function("get_prerequisites/layers=50,width=10", |b| {
        b.iter(|| graph.get_prerequisites(black_box("t25_3")))
    });

    c.bench_function("prerequisite_closure/layers=50,width=10", |b| {
        b.iter(|| graph.prerequisite_closure(black_box("t49_3")))
    });
}

criterion_group!(benches, bench_path, bench_prerequisites);
criterion_main!(benches);
