//! Lattice topology invariants on a filled grid

mod common;

use common::{all_cells, unit_sphere_grid};
use isoqef::prelude::*;

#[test]
fn test_crossing_edges_lie_in_grid() {
    let grid = unit_sphere_grid();
    for axis in Axis::ALL {
        assert_eq!(grid.edges(axis).axis(), axis);
        for edge in grid.edges(axis) {
            assert!(grid.is_edge_in_grid(axis, edge.lower));
            assert!((0.0..1.0).contains(&edge.offset));
            assert!(!edge.material.is_empty());
        }
    }
}

#[test]
fn test_edges_sorted_for_lookup() {
    // fill() appends in (y, x, z) scan order; find() depends on it
    let grid = unit_sphere_grid();
    for axis in Axis::ALL {
        let keys: Vec<(i32, i32, i32)> = grid
            .edges(axis)
            .iter()
            .map(|e| (e.lower.y, e.lower.x, e.lower.z))
            .collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);

        for edge in grid.edges(axis) {
            let found = grid.edges(axis).find(edge.lower).expect("edge findable");
            assert_eq!(found.lower, edge.lower);
        }
    }
}

#[test]
fn test_crossing_edge_endpoints_straddle() {
    // A crossing edge has exactly one solid endpoint, on the recorded side,
    // and carries that endpoint's material.
    let grid = unit_sphere_grid();
    for axis in Axis::ALL {
        let unit = axis.unit_ivec3();
        for edge in grid.edges(axis) {
            let lower_solid = !grid.material_at(edge.lower).is_empty();
            let upper_solid = !grid.material_at(edge.lower + unit).is_empty();
            assert_ne!(lower_solid, upper_solid);
            assert_eq!(edge.solid_lower, lower_solid);
            let solid = if edge.solid_lower {
                edge.lower
            } else {
                edge.lower + unit
            };
            assert_eq!(edge.material, grid.material_at(solid));
        }
    }
}

#[test]
fn test_adjacent_cells_of_crossing_edges() {
    // Every in-grid neighbor reported for a crossing edge is a valid cell
    // whose corner materials are mixed (the crossing edge is one of its 12).
    let grid = unit_sphere_grid();
    for axis in Axis::ALL {
        for edge in grid.edges(axis) {
            let cells = grid.adjacent_cells_for_edge(axis, edge.lower);
            let mut valid = 0;
            for idx in cells {
                if idx == BAD_INDEX {
                    continue;
                }
                valid += 1;
                let cell = grid.index_to_point(idx);
                assert!(grid.is_cell_in_grid(cell));
                let materials = grid.materials_of_cell(idx);
                assert!(materials.iter().any(|m| m.is_empty()));
                assert!(materials.iter().any(|m| !m.is_empty()));
            }
            assert!(valid >= 1);
            if !grid.is_edge_on_border(axis, edge.lower) {
                assert_eq!(valid, 4);
            }
        }
    }
}

#[test]
fn test_cell_crossings_match_edge_lists() {
    // Summing per-cell crossings with edge multiplicity (an interior edge is
    // shared by 4 cells) accounts for every recorded crossing.
    let grid = unit_sphere_grid();
    let mut shared_count = 0usize;
    for cell in all_cells(&grid) {
        shared_count += grid.cell_crossings(cell).len();
    }
    let mut expected = 0usize;
    for axis in Axis::ALL {
        for edge in grid.edges(axis) {
            expected += grid
                .adjacent_cells_for_edge(axis, edge.lower)
                .iter()
                .filter(|&&c| c != BAD_INDEX)
                .count();
        }
    }
    assert_eq!(shared_count, expected);
    assert!(shared_count > 0);
}

#[test]
fn test_local_global_round_trip() {
    let grid = unit_sphere_grid();
    let p = DVec3::new(-1.25, 0.5, 1.75);
    let round = grid.local_to_global(grid.global_to_local(p));
    assert!((round - p).length() < 1e-12);
    assert_eq!(grid.local_to_global(DVec3::ZERO), grid.global_pos());
}
