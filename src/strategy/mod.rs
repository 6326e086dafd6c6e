//! Clustering strategies.
//!
//! Two implementations share one contract so the host can drive
//! "clustering on" and "clustering off" through the same interface:
//! [`GridStrategy`] owns the spatial index and the partition, while
//! [`NoClustering`] costs nothing per event.

mod grid;
mod noop;

pub use grid::GridStrategy;
pub use noop::NoClustering;

use geo::Point;

use crate::marker::{LogicalMarker, MarkerId};
use crate::types::PartitionStats;
use crate::widget::{MapWidget, WidgetMarkerId};

/// What an underlying-widget marker currently represents.
#[derive(Debug, Clone, PartialEq)]
pub enum MapEntity {
    /// A plain, unclustered logical marker.
    Single(MarkerId),
    /// An aggregate of two or more logical markers sharing one
    /// primitive.
    Cluster {
        anchor: Point<f64>,
        members: Vec<MarkerId>,
    },
}

impl MapEntity {
    /// Logical markers represented by this entity.
    pub fn members(&self) -> &[MarkerId] {
        match self {
            MapEntity::Single(id) => std::slice::from_ref(id),
            MapEntity::Cluster { members, .. } => members,
        }
    }
}

/// Lifecycle contract between the host map and the active clustering
/// strategy.
///
/// All hooks run on the host's event thread, synchronously and to
/// completion; implementations hold no locks. Hooks addressed at ids the
/// strategy does not track are no-ops, never errors: strategy switches
/// and out-of-order event delivery would otherwise turn into spurious
/// panics.
///
/// Strategies own no thread-affine state (the widget is passed into
/// every hook), so the contract requires `Send + Sync` and hosts may
/// move between threads as long as delivery stays serialized.
pub trait ClusteringStrategy: Send + Sync {
    /// Start tracking `marker`. The marker enters hidden and the host
    /// applies the requested visibility right afterwards, so a marker
    /// never flashes before its clustering decision is made.
    fn on_add(&mut self, marker: &LogicalMarker, widget: &mut dyn MapWidget);

    /// Stop tracking `id`, shrinking or destroying its cluster.
    fn on_remove(&mut self, id: MarkerId, widget: &mut dyn MapWidget);

    /// React to `id` moving to `position`.
    fn on_position_change(&mut self, id: MarkerId, position: Point<f64>, widget: &mut dyn MapWidget);

    /// Record `id`'s requested visibility. A shared representation stays
    /// visible while at least one member requests visible.
    fn on_visibility_change(&mut self, id: MarkerId, visible: bool, widget: &mut dyn MapWidget);

    /// React to a camera zoom change. Must be cheap when the zoom bucket
    /// is unchanged; camera events arrive many times per second during a
    /// zoom gesture.
    fn on_zoom_change(&mut self, zoom: f64, widget: &mut dyn MapWidget);

    /// Destroy every representation and clear all state. Invoking any
    /// other hook afterwards is a contract violation and asserts in
    /// debug builds.
    fn cleanup(&mut self, widget: &mut dyn MapWidget);

    /// Resolve an underlying-widget identity to what it represents, or
    /// `None` when untracked so the caller can fall back to its own
    /// identity table.
    fn map(&self, id: WidgetMarkerId) -> Option<MapEntity>;

    /// Snapshot of the current partition.
    fn stats(&self) -> PartitionStats;
}
