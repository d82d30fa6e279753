//! Chunk/link decomposition by walking the contour with a stack.
//!
//! The contour walk passes along both sides of every 1-wide stretch, so a
//! unit reappearing directly under the top of the stack means the walk
//! has just come back along a link. A unit reappearing deeper in the stack
//! means the walk closed a loop: everything above it, plus the unit
//! itself, is one chunk.
//!
//! [`StackWalk`] turns a cell sequence into those events. The classifier
//! feeds it the whole contour; gathering feeds it the stretch of contour
//! hanging off one unit to find a leaf to carry.
//!
//! Articulation points are computed once per run and only decide between
//! the `*Stable` and `*Cut` variants of a label.

use std::collections::{HashMap, HashSet};

use smallvec::SmallVec;

use morph_core::{ChunkId, Classification, Pos};

use crate::connectivity::articulation_points;
use crate::contour::Contour;
use crate::world::World;

// ── Stack walk ──────────────────────────────────────────────────

/// One structural event produced by [`StackWalk::visit`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WalkEvent {
    /// First visit of a cell.
    Push(Pos),
    /// The walk came back along a 1-wide stretch: `unit` was popped and
    /// `onto` is the new top. `tip` is set when the walk went
    /// `onto -> unit -> onto`, i.e. `unit` is a dead end.
    Backtrack {
        /// Unit popped off the stack.
        unit: Pos,
        /// Unit the walk returned to.
        onto: Pos,
        /// Whether `unit` was a dead end.
        tip: bool,
    },
    /// The walk closed a loop. Members are listed from the former top
    /// down, the unit that closed the loop last. The flag is set when the
    /// loop turns at that member.
    Close(Vec<(Pos, bool)>),
}

/// Whether the path `a -> b -> c` turns (or reverses) at `b`.
fn turns(a: Pos, b: Pos, c: Pos) -> bool {
    let (v1x, v1y) = (b.x - a.x, b.y - a.y);
    let (v2x, v2y) = (c.x - b.x, c.y - b.y);
    let cross = v1x * v2y - v1y * v2x;
    let dot = v1x * v2x + v1y * v2y;
    !(cross == 0 && dot > 0)
}

/// Stack state of a contour walk.
///
/// The top of the stack is always the cell last visited, and consecutive
/// entries are 4-adjacent.
#[derive(Clone, Debug, Default)]
pub struct StackWalk {
    stack: Vec<Pos>,
    seen: HashSet<Pos>,
    trail: [Option<Pos>; 2],
}

impl StackWalk {
    /// Empty walk.
    pub fn new() -> Self {
        Self::default()
    }

    /// Walk that starts with `root` already on the stack.
    pub fn rooted_at(root: Pos) -> Self {
        Self {
            stack: vec![root],
            seen: HashSet::from([root]),
            trail: [None, None],
        }
    }

    /// Feed the next contour cell. Returns `None` when the cell repeats
    /// the current top.
    pub fn visit(&mut self, p: Pos) -> Option<WalkEvent> {
        let two_back = self.trail[0];
        self.trail = [self.trail[1], Some(p)];

        if self.seen.insert(p) {
            self.stack.push(p);
            return Some(WalkEvent::Push(p));
        }
        let len = self.stack.len();
        if self.stack.last() == Some(&p) {
            return None;
        }
        if len >= 2 && self.stack[len - 2] == p {
            let unit = self.stack.pop()?;
            return Some(WalkEvent::Backtrack {
                unit,
                onto: p,
                tip: two_back == Some(p),
            });
        }
        if self.stack.contains(&p) {
            let first_top = *self.stack.last()?;
            let mut members = Vec::new();
            let mut after = p;
            while self.stack.last() != Some(&p) {
                let t0 = self.stack.pop()?;
                let below = *self.stack.last()?;
                members.push((t0, turns(below, t0, after)));
                after = t0;
            }
            members.push((p, turns(first_top, p, after)));
            return Some(WalkEvent::Close(members));
        }
        self.stack.push(p);
        Some(WalkEvent::Push(p))
    }
}

// ── Classification ──────────────────────────────────────────────

#[derive(Default)]
struct Membership {
    chunks: SmallVec<[ChunkId; 2]>,
    link: Option<ChunkId>,
    leaf: Option<ChunkId>,
    attached: bool,
    visits: u32,
}

impl Membership {
    fn parts(&self) -> usize {
        self.chunks.len()
            + usize::from(self.link.is_some())
            + usize::from(self.leaf.is_some())
            + usize::from(self.attached)
    }
}

/// Run of consecutive backtracks: one link stretch.
struct Run {
    id: Option<ChunkId>,
    onto: Pos,
}

/// Classify every unit and assign chunk ids.
///
/// Overwrites all labels. Link units carry the id of their stretch in the
/// chunk slot, and a dead-end unit hanging off a stretch forms a chunk of
/// its own. Returns the contour the decomposition was read from so
/// callers can reuse its ordering without walking again.
pub fn classify(world: &mut World) -> Contour {
    let contour = Contour::trace(world);
    let mut members: HashMap<Pos, Membership> = HashMap::new();
    let mut walk = StackWalk::new();
    let mut run: Option<Run> = None;
    let mut next_id = 0u32;
    let mut fresh = || {
        let id = ChunkId(next_id);
        next_id += 1;
        id
    };

    for &pos in &contour.cells {
        members.entry(pos).or_default().visits += 1;
        let Some(event) = walk.visit(pos) else { continue };

        if let WalkEvent::Backtrack { unit, onto, tip } = event {
            if run.is_none() {
                run = Some(Run { id: None, onto });
                if tip {
                    members.entry(unit).or_default().leaf = Some(fresh());
                    continue;
                }
            }
            if let Some(current) = run.as_mut() {
                current.onto = onto;
                let id = *current.id.get_or_insert_with(&mut fresh);
                members.entry(unit).or_default().link = Some(id);
            }
            continue;
        }

        if let Some(r) = run.take() {
            members.entry(r.onto).or_default().attached = true;
        }
        if let WalkEvent::Close(closed) = event {
            let chunk = fresh();
            for (unit, _) in closed {
                let m = members.entry(unit).or_default();
                if !m.chunks.contains(&chunk) {
                    m.chunks.push(chunk);
                }
            }
        }
    }
    if let Some(r) = run {
        members.entry(r.onto).or_default().attached = true;
    }

    let cuts = articulation_points(world);
    let labels: Vec<_> = world
        .units()
        .map(|u| {
            let (class, chunk) = match members.get(&u.pos()) {
                Some(m) => resolve(m, cuts.contains(&u.pos())),
                None => (Classification::None, None),
            };
            (u.id(), class, chunk)
        })
        .collect();
    for (id, class, chunk) in labels {
        world.set_label(id, class, chunk);
    }
    contour
}

fn resolve(m: &Membership, is_cut: bool) -> (Classification, Option<ChunkId>) {
    if m.parts() >= 2 {
        return (Classification::Connector, None);
    }
    if let [chunk] = m.chunks.as_slice() {
        let class = if is_cut {
            Classification::ChunkCut
        } else {
            Classification::ChunkStable
        };
        return (class, Some(*chunk));
    }
    if let Some(link) = m.link {
        let class = if is_cut {
            Classification::LinkCut
        } else {
            Classification::LinkStable
        };
        return (class, Some(link));
    }
    if let Some(leaf) = m.leaf {
        return (Classification::ChunkStable, Some(leaf));
    }
    if m.attached || m.visits > 1 {
        return (Classification::Connector, None);
    }
    (Classification::None, None)
}
