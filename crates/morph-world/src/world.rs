//! The sparse grid world of unit squares.
//!
//! [`World`] stores units in an insertion-ordered table keyed by
//! [`UnitId`] plus a `Pos → UnitId` index. Every mutation keeps the two in
//! agreement; [`World::is_consistent`] checks that they do.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

use indexmap::IndexMap;
use smallvec::SmallVec;

use morph_core::{ChunkId, Classification, Color, Compass, Pos, UnitId, WorldError};

use crate::neighbourhood::Neighbourhood;

/// A single unit square.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Unit {
    id: UnitId,
    pos: Pos,
    color: Color,
    classification: Classification,
    chunk: Option<ChunkId>,
}

impl Unit {
    /// Stable identity.
    pub fn id(&self) -> UnitId {
        self.id
    }

    /// Current cell.
    pub fn pos(&self) -> Pos {
        self.pos
    }

    /// Cosmetic color.
    pub fn color(&self) -> Color {
        self.color
    }

    /// Label from the last classifier run.
    pub fn classification(&self) -> Classification {
        self.classification
    }

    /// Chunk from the last classifier run, if the unit was assigned one.
    pub fn chunk(&self) -> Option<ChunkId> {
        self.chunk
    }
}

/// Axis-aligned bounding box of the occupied cells, inclusive on all sides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Bounds {
    /// Smallest occupied x.
    pub min_x: i32,
    /// Smallest occupied y.
    pub min_y: i32,
    /// Largest occupied x.
    pub max_x: i32,
    /// Largest occupied y.
    pub max_y: i32,
}

impl Bounds {
    /// Whether `p` lies inside the box.
    pub fn contains(&self, p: Pos) -> bool {
        (self.min_x..=self.max_x).contains(&p.x) && (self.min_y..=self.max_y).contains(&p.y)
    }

    /// Number of columns. Exact for any pair of `i32` extremes.
    pub fn width(&self) -> u64 {
        u64::from(self.max_x.abs_diff(self.min_x)) + 1
    }

    /// Number of rows. Exact for any pair of `i32` extremes.
    pub fn height(&self) -> u64 {
        u64::from(self.max_y.abs_diff(self.min_y)) + 1
    }

    /// The `(min_x, min_y)` corner.
    pub fn min_corner(&self) -> Pos {
        Pos::new(self.min_x, self.min_y)
    }
}

/// Classification state of every unit, captured for later restoration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelSnapshot {
    entries: Vec<(UnitId, Classification, Option<ChunkId>)>,
}

/// A configuration of unit squares on the integer grid.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct World {
    units: IndexMap<UnitId, Unit>,
    index: HashMap<Pos, UnitId>,
    next_id: u32,
}

impl World {
    /// An empty world.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a world from positions, all with the default color.
    pub fn from_positions<I>(positions: I) -> Result<Self, WorldError>
    where
        I: IntoIterator,
        I::Item: Into<Pos>,
    {
        let mut world = Self::new();
        for p in positions {
            world.add(p.into(), Color::DEFAULT)?;
        }
        Ok(world)
    }

    // ── Queries ─────────────────────────────────────────────────

    /// Number of units.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Whether the world holds no units.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Whether a unit occupies `pos`.
    pub fn has(&self, pos: Pos) -> bool {
        self.index.contains_key(&pos)
    }

    /// The unit at `pos`, if any.
    pub fn get(&self, pos: Pos) -> Option<&Unit> {
        self.index.get(&pos).and_then(|id| self.units.get(id))
    }

    /// Identity of the unit at `pos`, if any.
    pub fn id_at(&self, pos: Pos) -> Option<UnitId> {
        self.index.get(&pos).copied()
    }

    /// The unit with identity `id`, if it still exists.
    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(&id)
    }

    /// All units in insertion order.
    pub fn units(&self) -> impl Iterator<Item = &Unit> + '_ {
        self.units.values()
    }

    /// All occupied positions in insertion order.
    pub fn positions(&self) -> impl Iterator<Item = Pos> + '_ {
        self.units.values().map(|u| u.pos)
    }

    /// Presence map of the eight cells around `pos`.
    pub fn neighbours8(&self, pos: Pos) -> Neighbourhood {
        let mut n = Neighbourhood::default();
        for c in Compass::ALL {
            n.set(c, self.has(pos.step(c)));
        }
        n
    }

    /// Occupied edge-adjacent cells of `pos`, in N, E, S, W order.
    pub fn occupied_neighbours4(&self, pos: Pos) -> SmallVec<[Pos; 4]> {
        pos.neighbours4()
            .into_iter()
            .filter(|&p| self.has(p))
            .collect()
    }

    /// Number of occupied edge-adjacent cells.
    pub fn degree(&self, pos: Pos) -> usize {
        pos.neighbours4().into_iter().filter(|&p| self.has(p)).count()
    }

    /// Bounding box of the occupied cells, `None` for an empty world.
    pub fn bounds(&self) -> Option<Bounds> {
        let mut it = self.positions();
        let first = it.next()?;
        let mut b = Bounds {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        for p in it {
            b.min_x = b.min_x.min(p.x);
            b.min_y = b.min_y.min(p.y);
            b.max_x = b.max_x.max(p.x);
            b.max_y = b.max_y.max(p.y);
        }
        Some(b)
    }

    /// Lowest occupied unit, leftmost among ties: the contour walk's start.
    pub fn extremal(&self) -> Option<Pos> {
        self.positions().min_by_key(|p| (p.y, p.x))
    }

    /// Whether the occupied cells form a single 4-connected component.
    ///
    /// With `skip`, the cell is treated as empty. Zero or one remaining
    /// units count as connected.
    pub fn is_connected(&self, skip: Option<Pos>) -> bool {
        let remaining = self.len() - usize::from(skip.is_some_and(|s| self.has(s)));
        if remaining <= 1 {
            return true;
        }
        let Some(start) = self.positions().find(|&p| Some(p) != skip) else {
            return true;
        };

        let mut seen = HashSet::with_capacity(remaining);
        let mut queue = VecDeque::new();
        seen.insert(start);
        queue.push_back(start);
        while let Some(p) = queue.pop_front() {
            for nb in p.neighbours4() {
                if Some(nb) != skip && self.has(nb) && seen.insert(nb) {
                    queue.push_back(nb);
                }
            }
        }
        seen.len() == remaining
    }

    /// Whether the table and the position index agree.
    pub fn is_consistent(&self) -> bool {
        self.units.len() == self.index.len()
            && self
                .units
                .iter()
                .all(|(id, u)| u.id == *id && self.index.get(&u.pos) == Some(id))
    }

    // ── Lifecycle ───────────────────────────────────────────────

    /// Add a unit at `pos`.
    pub fn add(&mut self, pos: Pos, color: Color) -> Result<UnitId, WorldError> {
        if self.has(pos) {
            return Err(WorldError::Occupied { pos });
        }
        let id = UnitId(self.next_id);
        self.next_id += 1;
        self.units.insert(
            id,
            Unit {
                id,
                pos,
                color,
                classification: Classification::None,
                chunk: None,
            },
        );
        self.index.insert(pos, id);
        Ok(id)
    }

    /// Remove and return the unit at `pos`.
    pub fn remove(&mut self, pos: Pos) -> Result<Unit, WorldError> {
        let id = self.index.remove(&pos).ok_or(WorldError::Vacant { pos })?;
        self.units
            .shift_remove(&id)
            .ok_or(WorldError::Vacant { pos })
    }

    /// Relocate the unit at `src` to `dst`.
    ///
    /// Performs no legality or connectivity checks; see
    /// [`Move::is_valid`](crate::Move::is_valid).
    pub fn move_unit(&mut self, src: Pos, dst: Pos) -> Result<(), WorldError> {
        if self.has(dst) {
            return Err(WorldError::Occupied { pos: dst });
        }
        let id = self.index.remove(&src).ok_or(WorldError::Vacant { pos: src })?;
        self.index.insert(dst, id);
        if let Some(u) = self.units.get_mut(&id) {
            u.pos = dst;
        }
        Ok(())
    }

    // ── Classification ──────────────────────────────────────────

    /// Label of the unit at `pos`; [`Classification::None`] when vacant.
    pub fn classification(&self, pos: Pos) -> Classification {
        self.get(pos)
            .map(|u| u.classification)
            .unwrap_or(Classification::None)
    }

    /// Chunk of the unit at `pos`, if occupied and assigned.
    pub fn chunk_id(&self, pos: Pos) -> Option<ChunkId> {
        self.get(pos).and_then(|u| u.chunk)
    }

    /// Overwrite the label and chunk of the unit at `pos`.
    ///
    /// The classifier overwrites every label on its next run.
    pub fn set_classification(
        &mut self,
        pos: Pos,
        class: Classification,
        chunk: Option<ChunkId>,
    ) -> Result<(), WorldError> {
        let id = self.id_at(pos).ok_or(WorldError::Vacant { pos })?;
        self.set_label(id, class, chunk);
        Ok(())
    }

    pub(crate) fn set_label(&mut self, id: UnitId, class: Classification, chunk: Option<ChunkId>) {
        if let Some(u) = self.units.get_mut(&id) {
            u.classification = class;
            u.chunk = chunk;
        }
    }

    /// Capture every unit's label and chunk.
    pub fn snapshot_labels(&self) -> LabelSnapshot {
        LabelSnapshot {
            entries: self
                .units
                .values()
                .map(|u| (u.id, u.classification, u.chunk))
                .collect(),
        }
    }

    /// Restore labels captured by [`World::snapshot_labels`].
    ///
    /// Units added since the snapshot keep their current labels.
    pub fn restore_labels(&mut self, snapshot: &LabelSnapshot) {
        for &(id, class, chunk) in &snapshot.entries {
            self.set_label(id, class, chunk);
        }
    }

    // ── Rendering ───────────────────────────────────────────────

    /// ASCII rendering of the bounding box, north at the top.
    ///
    /// Empty cells render as `.`, units as `glyph(unit)`.
    pub fn render(&self, glyph: impl Fn(&Unit) -> char) -> String {
        let Some(b) = self.bounds() else {
            return String::new();
        };
        let mut out = String::with_capacity(render_capacity(&b));
        for y in (b.min_y..=b.max_y).rev() {
            for x in b.min_x..=b.max_x {
                out.push(self.get(Pos::new(x, y)).map_or('.', &glyph));
            }
            out.push('\n');
        }
        out
    }

    /// Rendering with one glyph per classification.
    pub fn render_labels(&self) -> String {
        self.render(|u| u.classification.glyph())
    }
}

/// Upper bound on the preallocation for a rendering of `b`.
const RENDER_PREALLOC: u64 = 1 << 20;

/// Bytes a rendering of `b` needs, clamped to [`RENDER_PREALLOC`].
fn render_capacity(b: &Bounds) -> usize {
    let bytes = (b.width() + 1).saturating_mul(b.height());
    usize::try_from(bytes.min(RENDER_PREALLOC)).unwrap_or(0)
}

impl fmt::Display for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(|_| '#'))
    }
}
