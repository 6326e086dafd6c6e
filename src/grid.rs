//! Zoom-bucketed spatial cells and their membership index.
//!
//! Cell size halves with every zoom bucket, so zooming out coarsens the
//! partition; at and above the clustering ceiling every marker occupies
//! a degenerate cell of its own and nothing merges.

use geo::Point;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::marker::MarkerId;

/// Highest zoom bucket the grid discretizes to.
pub const MAX_BUCKET: u8 = 29;

/// Key of a spatial cell at a fixed zoom bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKey {
    /// A grid cell; `row`/`col` are the clamped position divided by the
    /// bucket's cell span.
    Grid { bucket: u8, row: i32, col: i32 },
    /// Degenerate one-marker cell used at and above the clustering
    /// ceiling.
    Point(MarkerId),
}

/// Discretize a floating-point zoom level into a bucket, or `None` at
/// and above `ceiling`, where clustering is off.
pub fn bucket_for_zoom(zoom: f64, ceiling: f64) -> Option<u8> {
    let zoom = if zoom.is_finite() {
        zoom
    } else {
        log::warn!("non-finite zoom {zoom}, clamping to 0");
        0.0
    };
    if zoom >= ceiling {
        return None;
    }
    Some(zoom.floor().clamp(0.0, f64::from(MAX_BUCKET)) as u8)
}

/// Degrees spanned by a grid cell at `bucket`.
pub fn cell_span(base_span: f64, bucket: u8) -> f64 {
    base_span / f64::from(1u32 << u32::from(bucket.min(MAX_BUCKET)))
}

/// The cell containing `position` at `bucket`.
///
/// Malformed positions clamp to the valid geographic range instead of
/// failing; the consequence of a bad position is a cosmetic
/// misclustering, not data loss.
pub fn cell_at(position: Point<f64>, bucket: u8, base_span: f64) -> CellKey {
    let (x, y) = clamp_position(position);
    let span = cell_span(base_span, bucket);
    CellKey::Grid {
        bucket,
        row: ((y + 90.0) / span).floor() as i32,
        col: ((x + 180.0) / span).floor() as i32,
    }
}

fn clamp_position(position: Point<f64>) -> (f64, f64) {
    let mut x = position.x();
    let mut y = position.y();
    if !x.is_finite() || !y.is_finite() {
        log::warn!("non-finite marker position ({x}, {y}), clamping");
        if !x.is_finite() {
            x = 0.0;
        }
        if !y.is_finite() {
            y = 0.0;
        }
    }
    (x.clamp(-180.0, 180.0), y.clamp(-90.0, 90.0))
}

/// Membership index mapping occupied cells to their markers.
///
/// Pure bookkeeping, no policy: members are kept in insertion order and
/// operations on unknown markers are no-ops, since events can arrive out
/// of order relative to construction.
#[derive(Debug, Default)]
pub struct CellIndex {
    cells: FxHashMap<CellKey, SmallVec<[MarkerId; 4]>>,
}

impl CellIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign `id` to `key`.
    pub fn insert(&mut self, id: MarkerId, key: CellKey) {
        self.cells.entry(key).or_default().push(id);
    }

    /// Unassign `id` from `key`; empty cells are dropped.
    pub fn remove(&mut self, id: MarkerId, key: CellKey) {
        if let Some(members) = self.cells.get_mut(&key) {
            members.retain(|m| *m != id);
            if members.is_empty() {
                self.cells.remove(&key);
            }
        }
    }

    /// Members of `key` in insertion order; empty when unoccupied.
    pub fn members(&self, key: CellKey) -> &[MarkerId] {
        self.cells.get(&key).map_or(&[], |members| members.as_slice())
    }

    /// Number of occupied cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CellKey, &[MarkerId])> {
        self.cells.iter().map(|(&key, members)| (key, members.as_slice()))
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Replace a cell's membership wholesale during a repartition.
    pub(crate) fn set(&mut self, key: CellKey, members: SmallVec<[MarkerId; 4]>) {
        debug_assert!(!members.is_empty(), "empty cell stored in index");
        self.cells.insert(key, members);
    }

    /// Drain all cells, leaving the index empty.
    pub(crate) fn take_cells(&mut self) -> FxHashMap<CellKey, SmallVec<[MarkerId; 4]>> {
        std::mem::take(&mut self.cells)
    }
}
