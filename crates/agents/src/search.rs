//! Uninformed breadth-first search to a known goal.
//!
//! The search variant assumes perfect information: the goal coordinate is
//! given and hazards are ignored. Guaranteed shortest path in edge count on
//! the 4-neighbor grid graph.

use std::collections::{BTreeSet, VecDeque};

use palace_core::{Direction, GridOracle, Position};

/// One explored state in the search tree. Parent links index into the node
/// arena and always point at an earlier entry, so the links form a tree
/// rooted at the start.
#[derive(Clone, Copy, Debug)]
struct Node {
    position: Position,
    parent: Option<usize>,
    action: Option<Direction>,
    cost: u32,
}

/// A shortest path from start to goal.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Solution {
    /// Actions to replay from the start, in order.
    pub actions: Vec<Direction>,
    /// Visited coordinates, start through goal inclusive.
    pub path: Vec<Position>,
    /// Coordinates in the order they were dequeued and expanded.
    pub expansion_order: Vec<Position>,
}

impl Solution {
    /// Path length in moves.
    pub fn cost(&self) -> usize {
        self.actions.len()
    }
}

/// Breadth-first path search over a grid's 4-neighbor adjacency.
#[derive(Clone, Copy, Debug, Default)]
pub struct PathSearch;

impl PathSearch {
    /// Finds a shortest action sequence from `start` to `goal`.
    ///
    /// Returns `None` when the goal cannot be reached — the frontier drains
    /// without a hit, or either endpoint lies outside the grid. An
    /// unreachable goal is a normal negative result, not an error.
    pub fn solve<M>(map: &M, start: Position, goal: Position) -> Option<Solution>
    where
        M: GridOracle + ?Sized,
    {
        let dimensions = map.dimensions();
        if !dimensions.contains(start) || !dimensions.contains(goal) {
            tracing::debug!("endpoint off the grid: start {start}, goal {goal}");
            return None;
        }

        let mut nodes: Vec<Node> = vec![Node {
            position: start,
            parent: None,
            action: None,
            cost: 0,
        }];
        let mut frontier: VecDeque<usize> = VecDeque::from([0]);
        let mut in_frontier: BTreeSet<Position> = BTreeSet::from([start]);
        let mut explored: BTreeSet<Position> = BTreeSet::new();
        let mut expansion_order: Vec<Position> = Vec::new();

        while let Some(index) = frontier.pop_front() {
            let node = nodes[index];
            in_frontier.remove(&node.position);
            explored.insert(node.position);
            expansion_order.push(node.position);

            if node.position == goal {
                tracing::debug!(
                    "goal {goal} reached at cost {} after {} expansions",
                    node.cost,
                    expansion_order.len()
                );
                return Some(Self::reconstruct(&nodes, index, expansion_order));
            }

            for direction in Direction::ALL {
                let successor = node.position.step(direction);
                if !dimensions.contains(successor) {
                    continue;
                }
                // Both membership checks are required: explored guards
                // against re-expansion, in_frontier against duplicates
                // waiting in the queue.
                if explored.contains(&successor) || in_frontier.contains(&successor) {
                    continue;
                }
                nodes.push(Node {
                    position: successor,
                    parent: Some(index),
                    action: Some(direction),
                    cost: node.cost + 1,
                });
                frontier.push_back(nodes.len() - 1);
                in_frontier.insert(successor);
            }
        }

        tracing::debug!("frontier exhausted; goal {goal} unreachable from {start}");
        None
    }

    /// Walks parent links from the goal node back to the root, then
    /// reverses into start-to-goal order.
    fn reconstruct(nodes: &[Node], goal_index: usize, expansion_order: Vec<Position>) -> Solution {
        let mut actions = Vec::new();
        let mut path = Vec::new();
        let mut cursor = Some(goal_index);
        while let Some(index) = cursor {
            let node = nodes[index];
            path.push(node.position);
            if let Some(action) = node.action {
                actions.push(action);
            }
            cursor = node.parent;
        }
        actions.reverse();
        path.reverse();
        Solution {
            actions,
            path,
            expansion_order,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use palace_core::{CellTags, GridDimensions};

    /// Bare geometry stub: every in-bounds cell is empty.
    struct OpenGrid {
        side: u32,
    }

    impl GridOracle for OpenGrid {
        fn dimensions(&self) -> GridDimensions {
            GridDimensions::new(self.side)
        }

        fn tags_at(&self, position: Position) -> Option<CellTags> {
            self.dimensions()
                .contains(position)
                .then(CellTags::empty)
        }
    }

    #[test]
    fn three_by_three_corner_to_corner_costs_four() {
        let map = OpenGrid { side: 3 };
        let solution = PathSearch::solve(&map, Position::ORIGIN, Position::new(2, 2))
            .expect("connected grid");

        assert_eq!(solution.cost(), 4);
        assert_eq!(solution.path.first(), Some(&Position::ORIGIN));
        assert_eq!(solution.path.last(), Some(&Position::new(2, 2)));

        // Replaying the actions lands on the goal.
        let mut at = Position::ORIGIN;
        for action in &solution.actions {
            at = at.step(*action);
            assert!(map.dimensions().contains(at));
        }
        assert_eq!(at, Position::new(2, 2));
    }

    #[test]
    fn expansion_runs_in_level_order() {
        let map = OpenGrid { side: 3 };
        let solution = PathSearch::solve(&map, Position::ORIGIN, Position::new(2, 2))
            .expect("connected grid");

        let distance = |p: &Position| p.row.unsigned_abs() + p.col.unsigned_abs();
        let depths: Vec<u32> = solution.expansion_order.iter().map(distance).collect();
        let mut sorted = depths.clone();
        sorted.sort_unstable();
        assert_eq!(depths, sorted, "BFS must dequeue shallower nodes first");

        // Level order from the corner: 1 cell at depth 0, 2 at depth 1, 3
        // at depth 2, and the goal closes depth 4.
        assert_eq!(solution.expansion_order[0], Position::ORIGIN);
        assert_eq!(depths.iter().filter(|d| **d == 1).count(), 2);
        assert_eq!(depths.iter().filter(|d| **d == 2).count(), 3);
        assert_eq!(solution.expansion_order.last(), Some(&Position::new(2, 2)));
    }

    #[test]
    fn no_duplicate_expansions() {
        let map = OpenGrid { side: 4 };
        let solution = PathSearch::solve(&map, Position::ORIGIN, Position::new(3, 3))
            .expect("connected grid");

        let unique: BTreeSet<Position> = solution.expansion_order.iter().copied().collect();
        assert_eq!(unique.len(), solution.expansion_order.len());
    }

    #[test]
    fn start_equals_goal_is_an_empty_plan() {
        let map = OpenGrid { side: 3 };
        let solution =
            PathSearch::solve(&map, Position::new(1, 1), Position::new(1, 1)).expect("trivial");
        assert!(solution.actions.is_empty());
        assert_eq!(solution.path, vec![Position::new(1, 1)]);
    }

    #[test]
    fn out_of_grid_goal_reports_not_found() {
        let map = OpenGrid { side: 3 };
        assert_eq!(
            PathSearch::solve(&map, Position::ORIGIN, Position::new(5, 5)),
            None
        );
        assert_eq!(
            PathSearch::solve(&map, Position::new(-1, 0), Position::new(2, 2)),
            None
        );
    }
}
