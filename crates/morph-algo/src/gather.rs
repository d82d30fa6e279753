//! Gather: pull loose material around the outside into weak joints.
//!
//! Each round classifies the configuration and looks along the contour for
//! a *light* unit: a connector or link cut point with little material
//! hanging off it. An empty cell beside it is chosen as the target, a
//! removable leaf further along the same branch is picked up, and the leaf
//! is carried to the target around the outside ring, one move per pull.
//!
//! Light units without a target cell are passed over. The phase ends when
//! the configuration is xy-monotone, when no light unit or leaf remains,
//! when a carry could not move at all, or when the round budget is spent.

use std::collections::{HashSet, VecDeque};

use morph_core::{Classification, Compass, PhaseError, Pos};
use morph_world::{bridge_capacity, classify, Contour, Move, StackWalk, WalkEvent, World};

use crate::config::GatherConfig;
use crate::sequence::MoveSequence;

/// A leaf being carried along its route.
#[derive(Debug)]
struct Carry {
    at: Pos,
    waypoints: VecDeque<Pos>,
    moved: bool,
}

/// The gather phase.
#[derive(Debug)]
pub struct Gather {
    config: GatherConfig,
    rounds: usize,
    carry: Option<Carry>,
    finished: bool,
}

impl Gather {
    /// A fresh gather phase.
    pub fn new(config: GatherConfig) -> Self {
        Self {
            config,
            rounds: 0,
            carry: None,
            finished: false,
        }
    }

    /// Rounds started so far.
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    fn finish(&mut self, reason: &str) -> Result<Option<Move>, PhaseError> {
        tracing::debug!(rounds = self.rounds, reason, "gather finished");
        self.finished = true;
        self.carry = None;
        Ok(None)
    }

    /// Plan the next carry, or `None` when there is nothing left to do.
    fn plan_round(&mut self, world: &mut World) -> Result<Option<Carry>, PhaseError> {
        let budget = self.config.max_rounds_per_unit.saturating_mul(world.len());
        if self.rounds >= budget || world.is_xy_monotone() {
            return Ok(None);
        }
        self.rounds += 1;

        let contour = classify(world);
        let Some(root) = contour.start() else {
            return Ok(None);
        };
        let Some((light, target)) =
            light_unit(world, &contour, root, self.config.light_capacity_limit)
        else {
            return Ok(None);
        };
        let Some(leaf) = leaf_for(world, &contour, root, light) else {
            return Ok(None);
        };
        let Some(route) = route(world, root, leaf, target) else {
            return Ok(None);
        };
        tracing::debug!(
            round = self.rounds,
            light = %light,
            target = %target,
            leaf = %leaf,
            waypoints = route.len(),
            "gather round"
        );
        Ok(Some(Carry {
            at: leaf,
            waypoints: route.into(),
            moved: false,
        }))
    }
}

impl MoveSequence for Gather {
    fn name(&self) -> &'static str {
        "gather"
    }

    fn next_move(&mut self, world: &mut World) -> Result<Option<Move>, PhaseError> {
        loop {
            if self.finished {
                return Ok(None);
            }
            if let Some(carry) = self.carry.as_mut() {
                while let Some(next) = carry.waypoints.pop_front() {
                    if next == carry.at {
                        continue;
                    }
                    // waypoints no single move reaches are skipped
                    if let Some(mv) = Move::to(world, carry.at, next) {
                        carry.at = next;
                        carry.moved = true;
                        return Ok(Some(mv));
                    }
                }
                let moved = carry.moved;
                self.carry = None;
                if !moved {
                    return self.finish("leaf is pocketed");
                }
            }
            match self.plan_round(world)? {
                Some(carry) => self.carry = Some(carry),
                None => return self.finish("no carry left"),
            }
        }
    }
}

// ── Round planning ──────────────────────────────────────────────

/// First connector or link cut point along the contour whose bridge
/// capacity is below `limit` and which has a target cell, paired with
/// that cell.
pub(crate) fn light_unit(
    world: &World,
    contour: &Contour,
    root: Pos,
    limit: usize,
) -> Option<(Pos, Pos)> {
    let mut seen = HashSet::new();
    contour
        .cells
        .iter()
        .copied()
        .filter(|&p| seen.insert(p))
        .filter(|&p| p != root)
        .filter(|&p| {
            matches!(
                world.classification(p),
                Classification::Connector | Classification::LinkCut
            )
        })
        .filter(|&p| bridge_capacity(world, root, p) < limit)
        .find_map(|p| target_cell(world, p).ok().map(|t| (p, t)))
}

/// Empty cell next to `light` that the carried leaf should fill.
///
/// Diagonal corners come first, in NE, NW, SW, SE order: the corner must
/// be empty with both flanking neighbours occupied, and at least one flank
/// a link or the flanks in different chunks. Failing that, a unit between
/// opposite neighbours takes the empty side facing more of the bounding
/// box.
pub(crate) fn target_cell(world: &World, light: Pos) -> Result<Pos, PhaseError> {
    for corner in [Compass::NE, Compass::NW, Compass::SW, Compass::SE] {
        let cell = light.step(corner);
        let (a, b) = flanks(corner);
        let (fa, fb) = (light.step(a), light.step(b));
        let (Some(ua), Some(ub)) = (world.get(fa), world.get(fb)) else {
            continue;
        };
        if world.has(cell) {
            continue;
        }
        let linked = ua.classification().is_link() || ub.classification().is_link();
        let split = matches!((ua.chunk(), ub.chunk()), (Some(x), Some(y)) if x != y);
        if linked || split {
            return Ok(cell);
        }
    }

    let occupied = |c: Compass| world.has(light.step(c));
    let Some(bounds) = world.bounds() else {
        return Err(PhaseError::NoTargetCell { light });
    };
    let sides = if occupied(Compass::N) && occupied(Compass::S) {
        let (west, east) = (light.x - bounds.min_x, bounds.max_x - light.x);
        if east > west {
            [Compass::E, Compass::W]
        } else {
            [Compass::W, Compass::E]
        }
    } else if occupied(Compass::W) && occupied(Compass::E) {
        let (south, north) = (light.y - bounds.min_y, bounds.max_y - light.y);
        if north > south {
            [Compass::N, Compass::S]
        } else {
            [Compass::S, Compass::N]
        }
    } else {
        return Err(PhaseError::NoTargetCell { light });
    };
    sides
        .into_iter()
        .map(|c| light.step(c))
        .find(|&cell| !world.has(cell))
        .ok_or(PhaseError::NoTargetCell { light })
}

/// The two edge neighbours sharing a side with the diagonal `corner`.
fn flanks(corner: Compass) -> (Compass, Compass) {
    match corner {
        Compass::NE => (Compass::N, Compass::E),
        Compass::SE => (Compass::S, Compass::E),
        Compass::SW => (Compass::S, Compass::W),
        Compass::NW => (Compass::N, Compass::W),
        straight => (straight, straight),
    }
}

/// First removable leaf on the branch the contour walks after `light`.
///
/// The branch is replayed through a [`StackWalk`] rooted at `light`.
/// Candidates are dead ends the walk backs out of and the corner members
/// of loops it closes, in the order the walk meets them.
pub(crate) fn leaf_for(world: &World, contour: &Contour, root: Pos, light: Pos) -> Option<Pos> {
    let from = contour.first_visit(light)?;
    let mut walk = StackWalk::rooted_at(light);
    for &p in contour.cells[from + 1..].iter().take_while(|&&p| p != light) {
        let candidates: Vec<Pos> = match walk.visit(p) {
            Some(WalkEvent::Backtrack { unit, tip: true, .. }) => vec![unit],
            Some(WalkEvent::Close(members)) => members
                .into_iter()
                .filter_map(|(unit, corner)| corner.then_some(unit))
                .collect(),
            _ => continue,
        };
        if let Some(leaf) = candidates
            .into_iter()
            .filter(|&u| u != root && u != light)
            .find(|&u| world.is_connected(Some(u)))
        {
            return Some(leaf);
        }
    }
    None
}

/// Waypoints from `leaf` to `target`: the target alone when one move
/// reaches it, otherwise ring cells clockwise first, avoiding the cell
/// beneath the root.
pub(crate) fn route(world: &World, root: Pos, leaf: Pos, target: Pos) -> Option<Vec<Pos>> {
    if Move::to(world, leaf, target).is_some() {
        return Some(vec![target]);
    }
    let contour = Contour::trace_excluding(world, Some(leaf));
    let origin = root.step(Compass::S);
    let entry = if contour.ring_index(leaf).is_some() {
        leaf
    } else {
        contour
            .ring
            .iter()
            .copied()
            .find(|r| (r.x - leaf.x).abs() <= 1 && (r.y - leaf.y).abs() <= 1)?
    };
    [false, true]
        .into_iter()
        .filter_map(|forward| contour.ring_path(entry, target, forward))
        .find(|path| !path.contains(&origin))
}
