//! Benchmarks for dominance analysis and SSA construction.
//!
//! Measures on synthetic flow graphs of growing size:
//! - Lengauer-Tarjan dominator tree construction
//! - DJ-graph construction and iterated dominance frontiers
//! - Full SSA conversion of a function

extern crate ssagraph;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ssagraph::{
    analysis::ssa::{function_to_ssa_form, Argument, Function, GenericScheme, SsaConfig},
    utils::graph::{
        algorithms::{compute_dominators, DominatorJoinGraph},
        Graph, NodeId,
    },
};
use std::hint::black_box;

const SIZES: [usize; 3] = [64, 512, 4096];

/// A chain of diamonds, each followed by a loop back to the start of the diamond:
/// `head -> {left, right} -> tail -> head`, `tail -> next head`.
fn diamond_loops(diamonds: usize) -> Vec<Vec<usize>> {
    let mut edges = Vec::with_capacity(diamonds * 4 + 1);
    for d in 0..diamonds {
        let head = d * 4;
        edges.push(vec![head + 1, head + 2]);
        edges.push(vec![head + 3]);
        edges.push(vec![head + 3]);
        edges.push(vec![head, head + 4]);
    }
    edges.push(Vec::new());
    edges
}

/// Prepends an entry block without predecessors to `diamond_loops` and fills each
/// block with a redefinition of one of eight registers.
fn diamond_function(diamonds: usize) -> Function {
    let edges = diamond_loops(diamonds);
    let mut function = Function::new("bench");
    let registers: Vec<_> = (0..8).map(|r| function.add_register(format!("r{r}"))).collect();

    let entry = function.add_block("entry");
    let blocks: Vec<_> = (0..edges.len())
        .map(|b| function.add_block(format!("b{b}")))
        .collect();
    let _ = function.add_edge(entry, blocks[0]);
    for (source, targets) in edges.iter().enumerate() {
        for &target in targets {
            let _ = function.add_edge(blocks[source], blocks[target]);
        }
    }

    for (value, &register) in registers.iter().enumerate() {
        let _ = function.append_instruction(
            entry,
            "mov".into(),
            vec![register],
            vec![Argument::Immediate(value as i64)],
        );
    }
    for (index, &block) in blocks.iter().enumerate() {
        let register = registers[index % registers.len()];
        let source = registers[(index * 3 + 1) % registers.len()];
        let _ = function.append_instruction(
            block,
            "add".into(),
            vec![register],
            vec![Argument::Register(register), Argument::Register(source)],
        );
    }
    function
}

fn bench_dominators(c: &mut Criterion) {
    let mut group = c.benchmark_group("dominators");
    for diamonds in SIZES {
        let graph = Graph::new(&diamond_loops(diamonds)).unwrap();
        group.throughput(Throughput::Elements(graph.size() as u64));
        group.bench_with_input(BenchmarkId::new("lengauer_tarjan", graph.size()), &graph, |b, graph| {
            b.iter(|| black_box(compute_dominators(black_box(graph), NodeId::new(0))));
        });
    }
    group.finish();
}

fn bench_dominance_frontiers(c: &mut Criterion) {
    let mut group = c.benchmark_group("dominance_frontiers");
    for diamonds in SIZES {
        let graph = Graph::new(&diamond_loops(diamonds)).unwrap();
        let dj_graph = DominatorJoinGraph::new(&graph, NodeId::new(0));
        let sites: Vec<NodeId> = (0..graph.size()).step_by(5).map(NodeId::new).collect();

        group.throughput(Throughput::Elements(graph.size() as u64));
        group.bench_with_input(BenchmarkId::new("dj_graph", graph.size()), &graph, |b, graph| {
            b.iter(|| black_box(DominatorJoinGraph::new(black_box(graph), NodeId::new(0))));
        });
        group.bench_with_input(BenchmarkId::new("iterated", graph.size()), &sites, |b, sites| {
            b.iter(|| black_box(dj_graph.iterated_dominator_frontier(black_box(sites))));
        });
    }
    group.finish();
}

fn bench_ssa_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("ssa_construction");
    for diamonds in SIZES {
        let function = diamond_function(diamonds);
        group.throughput(Throughput::Elements(function.block_count() as u64));
        group.bench_with_input(
            BenchmarkId::new("function_to_ssa_form", function.block_count()),
            &function,
            |b, function| {
                b.iter(|| {
                    let mut function = function.clone();
                    function_to_ssa_form(&mut function, &mut GenericScheme::new(), SsaConfig::minimal())
                        .unwrap();
                    black_box(function)
                });
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_dominators,
    bench_dominance_frontiers,
    bench_ssa_construction
);
criterion_main!(benches);
