//! Compaction: push material toward the south-west corner until the
//! configuration is xy-monotone.
//!
//! Every round looks for candidate maneuvers in priority order:
//!
//! 1. free moves: a chunk-stable unit slides S, W, SW or WS
//! 2. semi-free moves: the same units pivot NW or WN
//! 3. corner moves: two units rotate around a notch under an overhang
//! 4. chain moves: the top row shifts west or the right column shifts
//!    south by one cell
//! 5. carry: when nothing above applies, the highest removable unit is
//!    carried along the move graph to the lowest free cell it can reach
//!
//! Free, semi-free and corner moves must pass the chunkiness check. Every
//! candidate ends inside the bounding box and strictly lowers the pair
//! (total potential, total x), so compaction always terminates.
//!
//! [`Compact`] commits the first candidate found. [`CompactSorted`] collects
//! every candidate and commits the best scored one.

use std::cmp::Reverse;
use std::collections::VecDeque;

use morph_core::{Classification, Compass, Direction, PhaseError, Pos};
use morph_world::{classify, preserves_chunkiness_all, Bounds, Move, World};

use crate::config::CompactConfig;
use crate::sequence::MoveSequence;

// ── Candidates ──────────────────────────────────────────────────

/// Kind of maneuver a [`Candidate`] performs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CandidateKind {
    /// One slide or pivot toward the origin.
    Free,
    /// One NW or WN pivot.
    SemiFree,
    /// Two moves rotating a notch.
    Corner,
    /// A row or column shifted by one, with an optional tuck first.
    Chain,
    /// One unit carried along a shortest move path.
    Carry,
}

/// A maneuver found by one compaction round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    /// What sort of maneuver this is.
    pub kind: CandidateKind,
    /// Moves in execution order. Never empty.
    pub moves: Vec<Move>,
}

impl Candidate {
    fn single(kind: CandidateKind, mv: Move) -> Self {
        Self {
            kind,
            moves: vec![mv],
        }
    }

    /// Ranking key, larger is better.
    ///
    /// The first component is `max(x, y)` of the first source, minus
    /// `penalty` for a chain whose last move ends above the first source's
    /// row. The second is the total potential the moves shed.
    pub fn score(&self, penalty: i64) -> (i64, i64) {
        let (Some(first), Some(last)) = (self.moves.first(), self.moves.last()) else {
            return (i64::MIN, i64::MIN);
        };
        let mut score = i64::from(first.source.max_coord());
        if self.kind == CandidateKind::Chain && last.target().y > first.source.y {
            score -= penalty;
        }
        let drop = self
            .moves
            .iter()
            .map(|m| i64::from(m.source.potential()) - i64::from(m.target().potential()))
            .sum();
        (score, drop)
    }
}

/// Candidates for the current world, in priority order.
///
/// Labels must be fresh. With `all == false` the search stops at the
/// first candidate. A carry is only offered when nothing else is found
/// and [`CompactConfig::carry`] is set.
pub fn find_candidates(
    world: &mut World,
    config: &CompactConfig,
    all: bool,
) -> Result<Vec<Candidate>, PhaseError> {
    let mut found = Vec::new();
    let Some(bounds) = world.bounds() else {
        return Ok(found);
    };

    let mut stable: Vec<Pos> = world
        .units()
        .filter(|u| u.classification() == Classification::ChunkStable)
        .map(|u| u.pos())
        .collect();
    stable.sort_by_key(|p| Reverse((p.max_coord(), p.y, p.x)));

    let singles = [
        (
            CandidateKind::Free,
            [Direction::S, Direction::W, Direction::SW, Direction::WS].as_slice(),
        ),
        (
            CandidateKind::SemiFree,
            [Direction::NW, Direction::WN].as_slice(),
        ),
    ];
    for (kind, directions) in singles {
        for &p in &stable {
            for &d in directions {
                let mv = Move::new(p, d);
                if !bounds.contains(mv.target()) || !mv.is_valid(world) {
                    continue;
                }
                if preserves_chunkiness_all(world, &[mv])? {
                    found.push(Candidate::single(kind, mv));
                    if !all {
                        return Ok(found);
                    }
                }
            }
        }
    }

    for &p in &stable {
        for moves in corner_moves(world, p) {
            if fits(world, &bounds, &moves) && preserves_chunkiness_all(world, &moves)? {
                found.push(Candidate {
                    kind: CandidateKind::Corner,
                    moves,
                });
                if !all {
                    return Ok(found);
                }
            }
        }
    }

    for moves in chain_moves(world, &bounds, config.min_chain_len) {
        if fits(world, &bounds, &moves) {
            found.push(Candidate {
                kind: CandidateKind::Chain,
                moves,
            });
            if !all {
                return Ok(found);
            }
        }
    }

    if found.is_empty() && config.carry {
        if let Some(moves) = carry_moves(world, &bounds)? {
            found.push(Candidate {
                kind: CandidateKind::Carry,
                moves,
            });
        }
    }
    Ok(found)
}

/// Corner rotations around `u`: `u` steps into an empty `hole` and its
/// `mate` follows into the cell `u` left, with the overhang diagonal
/// holding the pair together. Both units must be chunk-stable.
fn corner_moves(world: &World, u: Pos) -> Vec<Vec<Move>> {
    let stable = |p: Pos| world.classification(p) == Classification::ChunkStable;
    let mut out = Vec::new();
    // (hole, mate, overhang, u's move, mate's move)
    let patterns = [
        (Compass::W, Compass::N, Compass::NW, Direction::W, Direction::S),
        (Compass::S, Compass::E, Compass::SE, Direction::S, Direction::W),
        (Compass::N, Compass::E, Compass::NE, Direction::N, Direction::W),
        (Compass::W, Compass::S, Compass::SW, Direction::W, Direction::N),
    ];
    for (hole, partner, over, first, second) in patterns {
        let mate = u.step(partner);
        if !world.has(u.step(hole)) && world.has(mate) && world.has(u.step(over)) && stable(mate)
        {
            out.push(vec![Move::new(u, first), Move::new(mate, second)]);
        }
    }
    out
}

/// Shifts of the topmost row west and the rightmost column south.
///
/// Each maximal run on that row or column whose leading cell is free
/// shifts as a unit. When the trailing unit has nothing beneath it (row)
/// or west of it (column) it is tucked under its neighbour first, and the
/// rest of the run shifts.
fn chain_moves(world: &World, bounds: &Bounds, min_len: usize) -> Vec<Vec<Move>> {
    let mut out = Vec::new();

    let top: Vec<Pos> = (bounds.min_x..=bounds.max_x)
        .map(|x| Pos::new(x, bounds.max_y))
        .collect();
    let right: Vec<Pos> = (bounds.min_y..=bounds.max_y)
        .map(|y| Pos::new(bounds.max_x, y))
        .collect();
    let axes = [
        (top, Compass::W, Compass::S, Direction::W, Direction::SW),
        (right, Compass::S, Compass::W, Direction::S, Direction::WS),
    ];

    for (line, toward, under, shift, tuck) in axes {
        for run in line.split(|&p| !world.has(p)).filter(|r| !r.is_empty()) {
            if run.len() < min_len {
                continue;
            }
            let Some((&lead, &trail)) = run.first().zip(run.last()) else {
                continue;
            };
            let free = lead.step(toward);
            if world.has(free) || !bounds.contains(free) {
                continue;
            }
            let mut moves = Vec::with_capacity(run.len());
            let mut shifted = run;
            if run.len() > 1 && !world.has(trail.step(under)) {
                moves.push(Move::new(trail, tuck));
                shifted = &run[..run.len() - 1];
            }
            moves.extend(shifted.iter().map(|&p| Move::new(p, shift)));
            out.push(moves);
        }
    }
    out
}

/// Ordering compaction drives toward: potential, then x.
fn carry_key(p: Pos) -> (i32, i32) {
    (p.potential(), p.x)
}

/// Shortest move path taking the highest removable unit to the lowest
/// empty cell of `bounds` it can reach, if any unit can improve.
fn carry_moves(world: &World, bounds: &Bounds) -> Result<Option<Vec<Move>>, PhaseError> {
    let mut units: Vec<Pos> = world.positions().collect();
    units.sort_by_key(|&p| Reverse(carry_key(p)));
    for u in units {
        if !world.is_connected(Some(u)) {
            continue;
        }
        let reach = world.move_reach(u)?;
        let Some(goal) = reach
            .cells()
            .filter(|&e| bounds.contains(e) && carry_key(e) < carry_key(u))
            .min_by_key(|&e| carry_key(e))
        else {
            continue;
        };
        if let Some(path) = reach.path_to(goal) {
            return Ok(Some(path));
        }
    }
    Ok(None)
}

/// Whether `moves` stay inside `bounds` and are each valid when played
/// in order on a copy of `world`.
fn fits(world: &World, bounds: &Bounds, moves: &[Move]) -> bool {
    if !moves.iter().all(|m| bounds.contains(m.target())) {
        return false;
    }
    let mut scratch = world.clone();
    moves
        .iter()
        .all(|m| m.is_valid(&scratch) && m.execute(&mut scratch).is_ok())
}

// ── Sequences ───────────────────────────────────────────────────

#[derive(Debug)]
struct Compactor {
    config: CompactConfig,
    pending: VecDeque<Move>,
    sorted: bool,
}

impl Compactor {
    fn next_move(
        &mut self,
        world: &mut World,
        name: &'static str,
    ) -> Result<Option<Move>, PhaseError> {
        if let Some(mv) = self.pending.pop_front() {
            return Ok(Some(mv));
        }
        if world.is_xy_monotone() {
            return Ok(None);
        }
        classify(world);
        let candidates = find_candidates(world, &self.config, self.sorted)?;
        let chosen = if self.sorted {
            best(candidates, self.config.regress_penalty)
        } else {
            candidates.into_iter().next()
        };
        let Some(chosen) = chosen else {
            tracing::warn!(phase = name, units = world.len(), "no compaction candidate");
            return Err(PhaseError::Stuck {
                phase: name,
                units: world.len(),
            });
        };
        tracing::debug!(phase = name, kind = ?chosen.kind, moves = chosen.moves.len(), "candidate");
        self.pending.extend(chosen.moves);
        Ok(self.pending.pop_front())
    }
}

/// Highest scored candidate, the earliest on ties.
fn best(candidates: Vec<Candidate>, penalty: i64) -> Option<Candidate> {
    let mut best: Option<((i64, i64), Candidate)> = None;
    for c in candidates {
        let score = c.score(penalty);
        if best.as_ref().map_or(true, |(s, _)| score > *s) {
            best = Some((score, c));
        }
    }
    best.map(|(_, c)| c)
}

/// Compaction taking the first candidate of each round.
#[derive(Debug)]
pub struct Compact(Compactor);

impl Compact {
    /// A fresh compaction phase.
    pub fn new(config: CompactConfig) -> Self {
        Self(Compactor {
            config,
            pending: VecDeque::new(),
            sorted: false,
        })
    }
}

impl MoveSequence for Compact {
    fn name(&self) -> &'static str {
        "compact"
    }

    fn next_move(&mut self, world: &mut World) -> Result<Option<Move>, PhaseError> {
        let name = self.name();
        self.0.next_move(world, name)
    }
}

/// Compaction taking the best scored candidate of each round.
#[derive(Debug)]
pub struct CompactSorted(Compactor);

impl CompactSorted {
    /// A fresh sorted compaction phase.
    pub fn new(config: CompactConfig) -> Self {
        Self(Compactor {
            config,
            pending: VecDeque::new(),
            sorted: true,
        })
    }
}

impl MoveSequence for CompactSorted {
    fn name(&self) -> &'static str {
        "compact-sorted"
    }

    fn next_move(&mut self, world: &mut World) -> Result<Option<Move>, PhaseError> {
        let name = self.name();
        self.0.next_move(world, name)
    }
}
