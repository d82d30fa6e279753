//! Contour walk around the outer boundary of the configuration.
//!
//! The walk starts at the extremal unit (lowest row, then lowest column)
//! and steps between edge-adjacent units, preferring at each step to turn
//! right of the last heading, then straight, then left, then back. Keeping
//! the empty outside on the right traces the outer boundary
//! counter-clockwise. Units on 1-wide stretches are visited once per side.
//!
//! The empty cells probed before each step form the *outside ring*: the
//! cells a unit can travel through when it is carried around the
//! configuration.

use morph_core::{Compass, Pos};

use crate::world::World;

/// One traversal of the outer boundary.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Contour {
    /// Units in walk order. Closed: the first and last entries are the
    /// start unit, unless the configuration is a single unit.
    pub cells: Vec<Pos>,
    /// Empty cells along the outside, in walk order, without consecutive
    /// repeats.
    pub ring: Vec<Pos>,
}

impl Contour {
    /// Walk the contour of `world`.
    pub fn trace(world: &World) -> Self {
        Self::trace_excluding(world, None)
    }

    /// Walk the contour as if the unit at `skip` were absent.
    pub fn trace_excluding(world: &World, skip: Option<Pos>) -> Self {
        let occupied = |p: Pos| Some(p) != skip && world.has(p);
        let Some(start) = world
            .positions()
            .filter(|&p| Some(p) != skip)
            .min_by_key(|p| (p.y, p.x))
        else {
            return Self::default();
        };

        let mut contour = Contour {
            cells: vec![start],
            ring: Vec::new(),
        };
        let mut cur = start;
        let mut heading = Compass::S;
        let mut first_step: Option<Compass> = None;
        let mut probed: Vec<Pos> = Vec::with_capacity(3);

        loop {
            probed.clear();
            let mut chosen = None;
            for d in [heading.right(), heading, heading.left(), heading.back()] {
                let next = cur.step(d);
                if occupied(next) {
                    chosen = Some(d);
                    break;
                }
                probed.push(next);
            }

            let Some(d) = chosen else {
                // single unit: the ring is its four sides
                contour.extend_ring(&probed);
                break;
            };
            if cur == start {
                match first_step {
                    Some(f) if f == d => {
                        // closing visit: only cells not probed on the way out
                        for &c in &probed {
                            if !contour.ring.contains(&c) {
                                contour.ring.push(c);
                            }
                        }
                        break;
                    }
                    Some(_) => {}
                    None => first_step = Some(d),
                }
            }
            contour.extend_ring(&probed);
            cur = cur.step(d);
            heading = d;
            contour.cells.push(cur);
        }
        contour
    }

    fn extend_ring(&mut self, cells: &[Pos]) {
        for &c in cells {
            if self.ring.last() != Some(&c) {
                self.ring.push(c);
            }
        }
    }

    /// Start unit of the walk, `None` for an empty world.
    pub fn start(&self) -> Option<Pos> {
        self.cells.first().copied()
    }

    /// Index of the first visit to `p`.
    pub fn first_visit(&self, p: Pos) -> Option<usize> {
        self.cells.iter().position(|&c| c == p)
    }

    /// Index of `p` in the outside ring.
    pub fn ring_index(&self, p: Pos) -> Option<usize> {
        self.ring.iter().position(|&c| c == p)
    }

    /// Ring cells from `from` to `to` inclusive, walking forwards
    /// (`forward == true`, counter-clockwise) or backwards, wrapping.
    pub fn ring_path(&self, from: Pos, to: Pos, forward: bool) -> Option<Vec<Pos>> {
        let n = self.ring.len();
        let mut i = self.ring_index(from)?;
        let j = self.ring_index(to)?;
        let mut path = vec![self.ring[i]];
        while i != j {
            i = if forward { (i + 1) % n } else { (i + n - 1) % n };
            path.push(self.ring[i]);
        }
        Some(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance::world;

    fn p(x: i32, y: i32) -> Pos {
        Pos::new(x, y)
    }

    #[test]
    fn empty_world_has_empty_contour() {
        let c = Contour::trace(&World::new());
        assert!(c.cells.is_empty());
        assert!(c.ring.is_empty());
        assert_eq!(c.start(), None);
    }

    #[test]
    fn single_unit_visits_once() {
        let c = Contour::trace(&world(&[(0, 0)]));
        assert_eq!(c.cells, vec![p(0, 0)]);
        assert_eq!(c.ring, vec![p(-1, 0), p(0, -1), p(1, 0), p(0, 1)]);
    }

    #[test]
    fn square_walks_counter_clockwise() {
        let c = Contour::trace(&world(&[(0, 0), (1, 0), (0, 1), (1, 1)]));
        assert_eq!(c.cells, vec![p(0, 0), p(1, 0), p(1, 1), p(0, 1), p(0, 0)]);
        assert_eq!(c.ring.first(), Some(&p(-1, 0)));
        assert!(c.ring.contains(&p(2, 0)));
        assert!(c.ring.contains(&p(0, 2)));
    }

    #[test]
    fn line_visits_interior_twice() {
        let c = Contour::trace(&world(&[(0, 0), (1, 0), (2, 0)]));
        assert_eq!(
            c.cells,
            vec![p(0, 0), p(1, 0), p(2, 0), p(1, 0), p(0, 0)]
        );
    }

    #[test]
    fn hole_is_not_on_the_ring() {
        let w = world(&[
            (0, 0),
            (1, 0),
            (2, 0),
            (0, 1),
            (2, 1),
            (0, 2),
            (1, 2),
            (2, 2),
        ]);
        let c = Contour::trace(&w);
        assert!(!c.ring.contains(&p(1, 1)));
        assert_eq!(c.cells.len(), 9);
    }

    #[test]
    fn ring_cells_are_empty_and_touch_the_configuration() {
        let w = world(&[(0, 0), (1, 0), (2, 0), (2, 1), (2, 2), (1, 2)]);
        let c = Contour::trace(&w);
        for &r in &c.ring {
            assert!(!w.has(r));
            assert!(w.neighbours8(r).count() > 0, "{r} floats");
        }
    }

    #[test]
    fn excluding_a_unit_walks_the_rest() {
        let w = world(&[(0, 0), (1, 0), (2, 0)]);
        let c = Contour::trace_excluding(&w, Some(p(0, 0)));
        assert_eq!(c.start(), Some(p(1, 0)));
        assert!(c.ring.contains(&p(0, 0)));
    }

    #[test]
    fn closing_visit_completes_the_ring() {
        let c = Contour::trace(&world(&[(0, 0), (1, 0), (2, 0)]));
        // (0, 1) is only probed when the walk comes back to the start
        assert_eq!(c.ring.last(), Some(&p(0, 1)));
        assert_eq!(c.ring.len(), 8);
    }

    #[test]
    fn ring_path_wraps_both_ways() {
        let c = Contour::trace(&world(&[(0, 0)]));
        let fwd = c.ring_path(p(0, 1), p(0, -1), true).unwrap();
        assert_eq!(fwd, vec![p(0, 1), p(-1, 0), p(0, -1)]);
        let back = c.ring_path(p(0, 1), p(0, -1), false).unwrap();
        assert_eq!(back, vec![p(0, 1), p(1, 0), p(0, -1)]);
        assert!(c.ring_path(p(9, 9), p(0, 1), true).is_none());
    }
}
