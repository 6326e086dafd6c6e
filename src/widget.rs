//! The map-widget boundary: marker primitives the clustering engine
//! creates, moves, and destroys.
//!
//! The engine needs five operations from the underlying widget, all
//! addressed through stable identity handles. `MemoryWidget` is an
//! in-memory implementation that records every primitive and counts
//! operations; it backs headless hosts and every test in this crate.

use geo::Point;
use rustc_hash::FxHashMap;

/// Stable identity handle of an underlying-widget marker primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetMarkerId(pub u64);

/// Icon shown by a marker primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkerIcon {
    /// The widget's regular point-marker icon.
    #[default]
    Default,
    /// Aggregate badge carrying a cluster's member count.
    ClusterBadge(u32),
}

/// Everything the widget needs to materialize a marker primitive.
#[derive(Debug, Clone)]
pub struct MarkerAppearance {
    pub position: Point<f64>,
    pub visible: bool,
    pub z_index: f32,
    pub title: Option<String>,
    pub icon: MarkerIcon,
}

/// Marker primitives of the underlying map widget.
///
/// Updates addressed at unknown handles must be ignored rather than
/// panic; teardown during a strategy switch can race with queued host
/// events.
pub trait MapWidget {
    /// Create a marker primitive and return its identity handle.
    fn create_marker(&mut self, appearance: &MarkerAppearance) -> WidgetMarkerId;

    /// Destroy a marker primitive.
    fn destroy_marker(&mut self, id: WidgetMarkerId);

    /// Move a marker primitive.
    fn set_marker_position(&mut self, id: WidgetMarkerId, position: Point<f64>);

    /// Show or hide a marker primitive.
    fn set_marker_visible(&mut self, id: WidgetMarkerId, visible: bool);

    /// Swap a marker primitive's icon.
    fn set_marker_icon(&mut self, id: WidgetMarkerId, icon: MarkerIcon);
}

/// Counters over widget operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WidgetStats {
    pub created: u64,
    pub destroyed: u64,
    pub position_updates: u64,
    pub visibility_updates: u64,
    pub icon_updates: u64,
}

impl WidgetStats {
    /// Combined create/destroy count. Comparing this across an event
    /// checks that the event produced no identity churn.
    pub fn churn(&self) -> u64 {
        self.created + self.destroyed
    }
}

/// In-memory widget backend.
#[derive(Debug, Default)]
pub struct MemoryWidget {
    markers: FxHashMap<WidgetMarkerId, MarkerAppearance>,
    next_id: u64,
    stats: WidgetStats,
}

impl MemoryWidget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live marker primitives.
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn marker(&self, id: WidgetMarkerId) -> Option<&MarkerAppearance> {
        self.markers.get(&id)
    }

    pub fn markers(&self) -> impl Iterator<Item = (WidgetMarkerId, &MarkerAppearance)> {
        self.markers.iter().map(|(&id, appearance)| (id, appearance))
    }

    /// Number of live primitives currently shown.
    pub fn visible_count(&self) -> usize {
        self.markers.values().filter(|m| m.visible).count()
    }

    pub fn stats(&self) -> WidgetStats {
        self.stats
    }
}

impl MapWidget for MemoryWidget {
    fn create_marker(&mut self, appearance: &MarkerAppearance) -> WidgetMarkerId {
        self.next_id += 1;
        let id = WidgetMarkerId(self.next_id);
        self.markers.insert(id, appearance.clone());
        self.stats.created += 1;
        id
    }

    fn destroy_marker(&mut self, id: WidgetMarkerId) {
        if self.markers.remove(&id).is_some() {
            self.stats.destroyed += 1;
        }
    }

    fn set_marker_position(&mut self, id: WidgetMarkerId, position: Point<f64>) {
        if let Some(marker) = self.markers.get_mut(&id) {
            marker.position = position;
            self.stats.position_updates += 1;
        }
    }

    fn set_marker_visible(&mut self, id: WidgetMarkerId, visible: bool) {
        if let Some(marker) = self.markers.get_mut(&id) {
            marker.visible = visible;
            self.stats.visibility_updates += 1;
        }
    }

    fn set_marker_icon(&mut self, id: WidgetMarkerId, icon: MarkerIcon) {
        if let Some(marker) = self.markers.get_mut(&id) {
            marker.icon = icon;
            self.stats.icon_updates += 1;
        }
    }
}
