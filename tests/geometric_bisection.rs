mod util;

use mesh_bisect::partitioning::bisect::{coordinate::widest_axis, inertial::principal_axis};
use mesh_bisect::prelude::*;
use util::{assert_valid_labeling, grid, part};

/// `n` points along the z axis, visited in a scrambled order.
fn collinear(n: usize) -> Coordinates {
    let pts: Vec<[f64; 3]> = (0..n).map(|i| [0.0, 0.0, ((i * 7) % n) as f64]).collect();
    Coordinates::from_points(&pts).unwrap()
}

#[test]
fn collinear_points_split_identically() {
    let n = 23;
    let g = WeightedGraph::empty(n);
    let c = collinear(n);
    for k in 1..=6 {
        let rcb = partition(&g, Some(&c), k, Strategy::Coordinate).unwrap();
        let rib = partition(&g, Some(&c), k, Strategy::Inertial).unwrap();
        assert_valid_labeling(&rcb, n, k);
        assert_eq!(rcb, rib, "k = {k}");
    }
}

#[test]
fn collinear_axis_is_the_line() {
    let c = collinear(10);
    let subset: Vec<usize> = (0..10).collect();
    assert_eq!(widest_axis(&c, &subset), 2);
    let centroid = nalgebra::DVector::from_vec(vec![0.0, 0.0, 4.5]);
    let (axis, variance) = principal_axis(&c, &subset, &centroid);
    assert!((axis[2] - 1.0).abs() < 1e-12);
    assert!(axis[0].abs() < 1e-12 && axis[1].abs() < 1e-12);
    assert!(variance > 0.0);
}

#[test]
fn isolated_vertices_balance_for_every_strategy() {
    let n = 100;
    let g = WeightedGraph::empty(n);
    let pts: Vec<[f64; 2]> = (0..n).map(|i| [(i % 10) as f64, (i / 10) as f64]).collect();
    let c = Coordinates::from_points(&pts).unwrap();
    for s in [Strategy::Coordinate, Strategy::Inertial, Strategy::Spectral] {
        let labels = partition(&g, Some(&c), 4, s).unwrap();
        assert_valid_labeling(&labels, n, 4);
        let q = quality(&g, &labels).unwrap();
        assert!((1.0..=1.25).contains(&q.balance), "{s}: balance {}", q.balance);
        assert_eq!(q.edge_cut, 0.0);
    }
}

#[test]
fn coordinate_bisection_of_a_grid_cuts_across_the_long_side() {
    let (g, c) = grid(8, 4);
    let labels = partition(&g, Some(&c), 2, Strategy::Coordinate).unwrap();
    // x spans 7, y spans 3: columns 0..4 go left
    for v in part(&labels, 0) {
        assert!(v % 8 < 4, "vertex {v} on the wrong side");
    }
    assert_eq!(quality(&g, &labels).unwrap().edge_cut, 4.0);
}

#[test]
fn inertial_bisection_follows_a_rotated_strip() {
    // 2 × 10 strip rotated by 30 degrees
    let (s, co) = (0.5, 3.0f64.sqrt() / 2.0);
    let mut pts = Vec::new();
    let mut edges = Vec::new();
    for i in 0..10 {
        for j in 0..2 {
            let (x, y) = (i as f64, j as f64 * 0.5);
            pts.push([co * x - s * y, s * x + co * y]);
            let v = 2 * i + j;
            if j == 0 {
                edges.push((v, v + 1, 1.0));
            }
            if i + 1 < 10 {
                edges.push((v, v + 2, 1.0));
            }
        }
    }
    let g = WeightedGraph::from_edges(20, &edges).unwrap();
    let c = Coordinates::from_points(&pts).unwrap();
    let labels = partition(&g, Some(&c), 2, Strategy::Inertial).unwrap();
    assert_eq!(part(&labels, 0), (0..10).collect::<Vec<_>>());
    assert_eq!(quality(&g, &labels).unwrap().edge_cut, 2.0);
}

#[test]
fn geometric_strategies_need_matching_coordinates() {
    let (g, _) = grid(3, 3);
    let (_, small) = grid(2, 2);
    for s in [Strategy::Coordinate, Strategy::Inertial] {
        assert!(matches!(
            partition(&g, None, 2, s),
            Err(PartitionError::InvalidArgument(_))
        ));
        assert!(matches!(
            partition(&g, Some(&small), 2, s),
            Err(PartitionError::InvalidArgument(_))
        ));
    }
}
