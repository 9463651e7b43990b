#![cfg(feature = "metis-support")]

mod util;

use mesh_bisect::prelude::*;
use util::{assert_valid_labeling, barbell, grid};

#[test]
fn kway_labels_every_vertex() {
    let (g, _) = grid(6, 6);
    let labels = partition(&g, None, 4, Strategy::Multiway(MultiwayMode::KWay)).unwrap();
    assert_valid_labeling(&labels, 36, 4);
    assert!(quality(&g, &labels).unwrap().edge_cut > 0.0);
}

#[test]
fn recursive_mode_finds_the_bridge() {
    let g = barbell(6);
    let cfg = PartitionerConfig {
        n_parts: 2,
        strategy: "metis-recursive".parse().unwrap(),
        ..Default::default()
    };
    let out = partition_with_config(&g, None, &cfg).unwrap();
    assert!(out.splits().is_empty());
    assert_eq!(out.quality(&g).unwrap().edge_cut, 1.0);
}
