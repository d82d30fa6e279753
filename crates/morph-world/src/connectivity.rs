//! Graph queries over the 4-adjacency graph of occupied cells.
//!
//! [`World::is_connected`] lives on the world itself; this module adds
//! articulation points, component counting, occupied-cell shortest paths
//! and bridge capacity.

use std::collections::{HashMap, HashSet, VecDeque};

use morph_core::Pos;

use crate::world::World;

/// Cells whose removal splits their component.
///
/// Iterative lowlink DFS, linear in the number of units.
pub fn articulation_points(world: &World) -> HashSet<Pos> {
    let n = world.len();
    let mut disc: HashMap<Pos, u32> = HashMap::with_capacity(n);
    let mut low: HashMap<Pos, u32> = HashMap::with_capacity(n);
    let mut cuts = HashSet::new();
    let mut timer = 0u32;

    for root in world.positions() {
        if disc.contains_key(&root) {
            continue;
        }
        disc.insert(root, timer);
        low.insert(root, timer);
        timer += 1;
        let mut root_children = 0;
        // (cell, parent, next neighbour index)
        let mut stack: Vec<(Pos, Option<Pos>, usize)> = vec![(root, None, 0)];

        while let Some(frame) = stack.last_mut() {
            let (v, parent, i) = *frame;
            if i < 4 {
                frame.2 += 1;
                let w = v.neighbours4()[i];
                if !world.has(w) || Some(w) == parent {
                    continue;
                }
                match disc.get(&w) {
                    Some(&dw) => {
                        if let Some(lv) = low.get_mut(&v) {
                            *lv = (*lv).min(dw);
                        }
                    }
                    None => {
                        disc.insert(w, timer);
                        low.insert(w, timer);
                        timer += 1;
                        stack.push((w, Some(v), 0));
                    }
                }
                continue;
            }

            stack.pop();
            let Some(p) = parent else { continue };
            let lv = low[&v];
            if let Some(lp) = low.get_mut(&p) {
                *lp = (*lp).min(lv);
            }
            if p == root {
                root_children += 1;
            } else if lv >= disc[&p] {
                cuts.insert(p);
            }
        }

        if root_children > 1 {
            cuts.insert(root);
        }
    }
    cuts
}

/// Number of 4-connected components.
pub fn component_count(world: &World) -> usize {
    let mut seen = HashSet::with_capacity(world.len());
    let mut count = 0;
    for start in world.positions() {
        if !seen.insert(start) {
            continue;
        }
        count += 1;
        let mut queue = VecDeque::from([start]);
        while let Some(p) = queue.pop_front() {
            for nb in p.neighbours4() {
                if world.has(nb) && seen.insert(nb) {
                    queue.push_back(nb);
                }
            }
        }
    }
    count
}

/// Shortest path between two occupied cells through occupied cells.
///
/// Returns the cells from `from` to `to` inclusive, or `None` if they are
/// in different components or either is vacant.
pub fn occupied_path(world: &World, from: Pos, to: Pos) -> Option<Vec<Pos>> {
    if !world.has(from) || !world.has(to) {
        return None;
    }
    let mut parent: HashMap<Pos, Pos> = HashMap::new();
    let mut queue = VecDeque::from([from]);
    parent.insert(from, from);
    while let Some(p) = queue.pop_front() {
        if p == to {
            let mut path = vec![p];
            let mut cur = p;
            while cur != from {
                cur = parent[&cur];
                path.push(cur);
            }
            path.reverse();
            return Some(path);
        }
        for nb in p.neighbours4() {
            if world.has(nb) && !parent.contains_key(&nb) {
                parent.insert(nb, p);
                queue.push_back(nb);
            }
        }
    }
    None
}

/// Units reachable from `unit` once its shortest path back to `root` is
/// cut away.
///
/// This is the amount of material hanging off `unit` on the side away
/// from the root. `unit` itself is not counted.
pub fn bridge_capacity(world: &World, root: Pos, unit: Pos) -> usize {
    let blocked: HashSet<Pos> = occupied_path(world, unit, root)
        .unwrap_or_default()
        .into_iter()
        .filter(|&p| p != unit)
        .collect();

    let mut seen = HashSet::from([unit]);
    let mut queue = VecDeque::from([unit]);
    while let Some(p) = queue.pop_front() {
        for nb in p.neighbours4() {
            if world.has(nb) && !blocked.contains(&nb) && seen.insert(nb) {
                queue.push_back(nb);
            }
        }
    }
    seen.len() - 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance::world;

    /// Brute force: a cell is a cut iff skipping it disconnects.
    fn brute_cuts(w: &World) -> HashSet<Pos> {
        w.positions().filter(|&p| !w.is_connected(Some(p))).collect()
    }

    #[test]
    fn line_interior_are_cuts() {
        let w = world(&[(0, 0), (1, 0), (2, 0), (3, 0)]);
        let cuts = articulation_points(&w);
        assert_eq!(cuts, HashSet::from([Pos::new(1, 0), Pos::new(2, 0)]));
    }

    #[test]
    fn square_has_no_cuts() {
        let w = world(&[(0, 0), (1, 0), (0, 1), (1, 1)]);
        assert!(articulation_points(&w).is_empty());
    }

    #[test]
    fn matches_brute_force_on_comb() {
        let w = world(&[
            (0, 0),
            (1, 0),
            (2, 0),
            (3, 0),
            (4, 0),
            (0, 1),
            (2, 1),
            (4, 1),
            (4, 2),
            (3, 2),
        ]);
        assert_eq!(articulation_points(&w), brute_cuts(&w));
    }

    #[test]
    fn components_counted() {
        let w = world(&[(0, 0), (1, 0), (5, 5), (9, 9), (9, 10)]);
        assert_eq!(component_count(&w), 3);
        assert_eq!(component_count(&World::new()), 0);
    }

    #[test]
    fn occupied_path_is_shortest() {
        let w = world(&[(0, 0), (1, 0), (2, 0), (2, 1), (0, 1), (0, 2), (1, 2), (2, 2)]);
        let path = occupied_path(&w, Pos::new(0, 0), Pos::new(2, 2)).unwrap();
        assert_eq!(path.len(), 5);
        assert_eq!(path.first(), Some(&Pos::new(0, 0)));
        assert_eq!(path.last(), Some(&Pos::new(2, 2)));
        assert!(occupied_path(&w, Pos::new(0, 0), Pos::new(7, 7)).is_none());
    }

    #[test]
    fn bridge_capacity_counts_far_side() {
        // root (0,0) - (1,0) - (2,0) - (3,0), with (2,1) hanging off (2,0)
        let w = world(&[(0, 0), (1, 0), (2, 0), (3, 0), (2, 1)]);
        let root = Pos::new(0, 0);
        assert_eq!(bridge_capacity(&w, root, Pos::new(1, 0)), 3);
        assert_eq!(bridge_capacity(&w, root, Pos::new(2, 0)), 2);
        assert_eq!(bridge_capacity(&w, root, Pos::new(3, 0)), 0);
        assert_eq!(bridge_capacity(&w, root, root), 4);
    }
}
