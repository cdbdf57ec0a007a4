//! Cluster detection - finding matching chains and floating bubbles.
//!
//! Both searches are the same flood fill over the 6-connected hex neighborhood,
//! driven by a different predicate:
//! - chains collect same-colored bubbles around the cell a projectile stuck in
//! - reachability stamps every bubble reachable from the ceiling row with the
//!   current generation; whatever is left with an older stamp is floating

use std::collections::HashSet;

use super::{
    bubble::BubbleColor,
    grid::{BubbleGrid, GridCell},
    hex::GridPos,
};

/// Iterative flood fill from `start`.
///
/// A cell is visited when it is in bounds and `should_visit` accepts it; each
/// cell is considered at most once per call. Visiting a cell runs `on_visit`
/// and queues its neighbors. Returns the number of visited cells.
pub fn flood_fill<P, V>(
    grid: &mut BubbleGrid,
    start: GridPos,
    mut should_visit: P,
    mut on_visit: V,
) -> usize
where
    P: FnMut(GridPos, &GridCell) -> bool,
    V: FnMut(GridPos, &mut GridCell),
{
    let bounds = grid.bounds();
    let mut seen = HashSet::new();
    let mut stack = vec![start];
    let mut visited = 0;

    while let Some(pos) = stack.pop() {
        if !bounds.contains(pos) || !seen.insert(pos) {
            continue;
        }
        let Some(cell) = grid.get_mut(pos) else {
            continue;
        };
        if !should_visit(pos, cell) {
            continue;
        }

        on_visit(pos, cell);
        visited += 1;

        stack.extend(pos.neighbors());
    }

    visited
}

/// Find all connected bubbles of `color` around `root`, the root included.
///
/// Returns an empty list when `root` does not hold a bubble of that color.
pub fn collect_chain(grid: &mut BubbleGrid, root: GridPos, color: BubbleColor) -> Vec<GridPos> {
    let mut chain = Vec::new();
    flood_fill(
        grid,
        root,
        |_, cell| cell.occupant == Some(color),
        |pos, _| chain.push(pos),
    );
    chain
}

/// Stamp every bubble reachable from the ceiling with `generation`.
///
/// One flood fill per ceiling column, all sharing the stamp, so a bubble reached
/// from an earlier column is skipped by the later ones.
pub fn mark_reachable(grid: &mut BubbleGrid, generation: u32) -> usize {
    let mut marked = 0;
    for start in grid.bounds().ceiling() {
        marked += flood_fill(
            grid,
            start,
            |_, cell| cell.is_occupied() && cell.generation != generation,
            |_, cell| cell.generation = generation,
        );
    }
    marked
}

/// Find the bubbles that are no longer connected to the ceiling.
///
/// `generation` must be newer than every stamp already on the board. The
/// reachability sweep runs first; every occupied cell still carrying an older
/// stamp is returned, in row-major order. Nothing is removed here.
pub fn collect_dropping(grid: &mut BubbleGrid, generation: u32) -> Vec<GridPos> {
    mark_reachable(grid, generation);
    grid.iter()
        .filter(|(_, cell)| cell.is_occupied() && cell.generation < generation)
        .map(|(pos, _)| pos)
        .collect()
}
