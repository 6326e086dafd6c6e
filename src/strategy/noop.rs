//! The disabled strategy: markers pass through unclustered.

use geo::Point;

use super::{ClusteringStrategy, MapEntity};
use crate::marker::{LogicalMarker, MarkerId};
use crate::types::PartitionStats;
use crate::widget::{MapWidget, WidgetMarkerId};

/// No-op strategy installed while clustering is off.
///
/// Every lifecycle hook does nothing and [`map`](ClusteringStrategy::map)
/// returns `None`, leaving the host's own identity table authoritative.
/// Per-event overhead is zero.
#[derive(Debug, Default)]
pub struct NoClustering;

impl NoClustering {
    pub fn new() -> Self {
        Self
    }
}

impl ClusteringStrategy for NoClustering {
    fn on_add(&mut self, _marker: &LogicalMarker, _widget: &mut dyn MapWidget) {}

    fn on_remove(&mut self, _id: MarkerId, _widget: &mut dyn MapWidget) {}

    fn on_position_change(
        &mut self,
        _id: MarkerId,
        _position: Point<f64>,
        _widget: &mut dyn MapWidget,
    ) {
    }

    fn on_visibility_change(&mut self, _id: MarkerId, _visible: bool, _widget: &mut dyn MapWidget) {
    }

    fn on_zoom_change(&mut self, _zoom: f64, _widget: &mut dyn MapWidget) {}

    fn cleanup(&mut self, _widget: &mut dyn MapWidget) {}

    fn map(&self, _id: WidgetMarkerId) -> Option<MapEntity> {
        None
    }

    fn stats(&self) -> PartitionStats {
        PartitionStats::default()
    }
}
