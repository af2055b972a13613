use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::debug;

use super::{SearchResult, SearchStrategy};
use crate::grid::{Cell, Grid};

/// Cost of moving to an orthogonal neighbour.
const STEP_COST: f64 = 1.0;

/// Index into the node arena.
type NodeId = usize;

/// A discovered cell. Nodes live in the search's arena and refer to their
/// predecessor by index, so relaxation can repoint `parent` freely.
#[derive(Debug, Clone)]
struct SearchNode {
    cell: Cell,
    slot: usize,
    g: f64,
    h: f64,
    parent: Option<NodeId>,
}

/// Find a path from `start` to `end` using the given strategy.
///
/// The search never fails: walls at either endpoint, an empty grid or an
/// unreachable goal all produce `found = false` with the trace accumulated so
/// far. A `start` outside the grid explores nothing.
pub fn find_path(grid: &Grid, start: Cell, end: Cell, strategy: SearchStrategy) -> SearchResult {
    let Some(start_slot) = grid.index(start) else {
        debug!(%start, "start cell lies outside the grid; nothing to explore");
        return SearchResult::not_found(Vec::new());
    };

    let mut search = Search::new(grid, end, strategy);
    search.discover(start, start_slot, 0.0, None);
    let result = search.run();

    debug!(
        algorithm = %strategy,
        cost_optimal = strategy.is_cost_optimal(),
        found = result.found,
        path_cells = result.path.len(),
        explored = result.explored.len(),
        "grid search finished"
    );
    result
}

/// Search-scoped state; dropped when [`find_path`] returns.
struct Search<'a> {
    grid: &'a Grid,
    goal: Cell,
    strategy: SearchStrategy,
    nodes: Vec<SearchNode>,
    /// Cell slot -> node, for every discovered cell.
    slots: Vec<Option<NodeId>>,
    closed: Vec<bool>,
    frontier: BinaryHeap<FrontierEntry>,
    sequence: u64,
    explored: Vec<Cell>,
}

impl<'a> Search<'a> {
    fn new(grid: &'a Grid, goal: Cell, strategy: SearchStrategy) -> Self {
        Self {
            grid,
            goal,
            strategy,
            nodes: Vec::new(),
            slots: vec![None; grid.len()],
            closed: vec![false; grid.len()],
            frontier: BinaryHeap::new(),
            sequence: 0,
            explored: Vec::new(),
        }
    }

    fn run(mut self) -> SearchResult {
        let grid = self.grid;

        while let Some(entry) = self.frontier.pop() {
            let current = entry.node;
            let (cell, slot) = (self.nodes[current].cell, self.nodes[current].slot);

            // Stale duplicate left behind by relaxation.
            if self.closed[slot] {
                continue;
            }
            self.closed[slot] = true;
            self.explored.push(cell);

            if cell == self.goal {
                let path = self.reconstruct(current);
                return SearchResult {
                    found: true,
                    path,
                    explored: self.explored,
                };
            }

            let tentative_g = self.nodes[current].g + STEP_COST;
            for neighbour in grid.neighbours(cell) {
                let Some(neighbour_slot) = grid.index(neighbour) else {
                    continue;
                };
                if self.closed[neighbour_slot] {
                    continue;
                }

                let known = self.slots[neighbour_slot];
                match known {
                    None => {
                        self.discover(neighbour, neighbour_slot, tentative_g, Some(current));
                    }
                    Some(existing) if tentative_g < self.nodes[existing].g => {
                        self.relax(existing, tentative_g, current);
                    }
                    Some(_) => {}
                }
            }
        }

        SearchResult::not_found(self.explored)
    }

    fn discover(&mut self, cell: Cell, slot: usize, g: f64, parent: Option<NodeId>) {
        let id = self.nodes.len();
        let h = self.strategy.heuristic(cell, self.goal);
        self.nodes.push(SearchNode {
            cell,
            slot,
            g,
            h,
            parent,
        });
        self.slots[slot] = Some(id);
        self.push(id);
    }

    fn relax(&mut self, id: NodeId, g: f64, parent: NodeId) {
        let node = &mut self.nodes[id];
        node.g = g;
        node.parent = Some(parent);
        // Greedy priorities are frozen at discovery; the existing entry stays valid.
        if self.strategy.reprioritises_on_relax() {
            self.push(id);
        }
    }

    fn push(&mut self, id: NodeId) {
        let node = &self.nodes[id];
        let priority = self.strategy.priority(node.g, node.h);
        self.frontier
            .push(FrontierEntry::new(id, priority, self.sequence));
        self.sequence += 1;
    }

    fn reconstruct(&self, goal: NodeId) -> Vec<Cell> {
        let mut path = Vec::new();
        let mut current = Some(goal);
        while let Some(id) = current {
            let node = &self.nodes[id];
            path.push(node.cell);
            current = node.parent;
        }
        path.reverse();
        path
    }
}

#[derive(Copy, Clone, Debug, Default)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq(&other.0)
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Frontier entry ordered by priority, then by insertion sequence so equal
/// priorities pop first-in first-out.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct FrontierEntry {
    node: NodeId,
    priority: FloatOrd,
    sequence: u64,
}

impl FrontierEntry {
    fn new(node: NodeId, priority: f64, sequence: u64) -> Self {
        Self {
            node,
            priority: FloatOrd(priority),
            sequence,
        }
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap.
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
