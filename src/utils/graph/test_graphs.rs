//! Reference flow graphs shared by the algorithm tests.

use crate::utils::graph::Graph;

/// The flow graph of figure 1 in Lengauer and Tarjan's paper, nodes `R, A, B, ..., L`
/// numbered `0..13` in alphabetical order.
pub(crate) fn lengauer_tarjan_graph() -> Graph {
    Graph::new(&[
        vec![1, 2, 3], // R
        vec![4],       // A
        vec![1, 4, 5], // B
        vec![6, 7],    // C
        vec![12],      // D
        vec![8],       // E
        vec![9],       // F
        vec![9, 10],   // G
        vec![5, 11],   // H
        vec![11],      // I
        vec![9],       // J
        vec![9, 0],    // K
        vec![8],       // L
    ])
    .unwrap()
}

/// The flow graph of Sreedhar and Gao's phi placement paper (figure 1): loops
/// headed by 2, 3 and 12 (the last nested in the second) and an exit path through
/// 8, 15 and 16 shared by both outer loops.
pub(crate) fn sreedhar_gao_graph() -> Graph {
    Graph::new(&[
        vec![1],
        vec![2, 3],
        vec![4, 7],
        vec![9],
        vec![5],
        vec![6],
        vec![2, 8],
        vec![8],
        vec![15],
        vec![10, 11],
        vec![12],
        vec![12],
        vec![13],
        vec![3, 14, 15],
        vec![12],
        vec![16],
        vec![],
    ])
    .unwrap()
}
