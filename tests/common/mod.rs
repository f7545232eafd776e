//! Shared helpers for integration tests

use isoqef::prelude::*;

/// Unit sphere at the origin, sampled over a size-8 grid spanning `[-2, 2]`
pub fn unit_sphere_grid() -> UniformGrid {
    let field = SphereField::new(DVec3::ZERO, 1.0, Material::Stone);
    let finder = BisectionZeroFinder::new(24);
    let mut grid = UniformGrid::new(8, DVec3::ZERO, 0.5).expect("valid grid size");
    grid.fill(&field, &finder);
    grid
}

/// World-space bounding box of a cell, by its minimal lattice corner
pub fn cell_box(grid: &UniformGrid, cell: IVec3) -> (DVec3, DVec3) {
    let min = grid.local_to_global(cell.as_dvec3());
    (min, min + DVec3::splat(grid.grid_step()))
}

/// All cells of the grid, by minimal lattice corner
pub fn all_cells(grid: &UniformGrid) -> Vec<IVec3> {
    let h = grid.half_size();
    let mut cells = Vec::new();
    for y in -h..h {
        for x in -h..h {
            for z in -h..h {
                cells.push(IVec3::new(x, y, z));
            }
        }
    }
    cells
}
