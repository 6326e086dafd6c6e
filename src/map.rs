//! The strategy host: keeps an underlying widget's marker set
//! consistent with the logical marker set, clustered or not.

use std::collections::BTreeMap;

use geo::Point;
use rustc_hash::FxHashMap;

use crate::builder::ClusterMapBuilder;
use crate::marker::{LogicalMarker, MarkerId, MarkerOptions};
use crate::strategy::{ClusteringStrategy, GridStrategy, MapEntity, NoClustering};
use crate::types::{Config, PartitionStats};
use crate::widget::{MapWidget, MarkerAppearance, MarkerIcon, WidgetMarkerId};

/// Host map facade over a widget `W`.
///
/// Owns the logical markers, the widget, and the active clustering
/// strategy, and forwards every marker mutation and camera zoom change
/// into the strategy. While clustering is off the host manages one
/// widget primitive per marker itself and the installed strategy costs
/// nothing; while it is on, the grid strategy owns every primitive.
///
/// All methods must be called from one logical thread; the engine does
/// no internal locking. Hosts that deliver events from several threads
/// serialize them externally (see `SyncClusterMap` behind the `sync`
/// feature).
///
/// # Example
///
/// ```rust
/// use geocluster::{ClusterMap, MarkerOptions, MemoryWidget};
/// use geo::Point;
///
/// let mut map = ClusterMap::new(MemoryWidget::new());
/// map.set_clustering_enabled(true);
///
/// map.add_marker(MarkerOptions::new(Point::new(0.0, 0.0)));
/// map.add_marker(MarkerOptions::new(Point::new(0.0001, 0.0001)));
///
/// // The two nearby markers share one aggregate primitive.
/// assert_eq!(map.widget().len(), 1);
/// ```
pub struct ClusterMap<W: MapWidget> {
    widget: W,
    config: Config,
    zoom: f64,
    markers: BTreeMap<MarkerId, LogicalMarker>,
    strategy: Box<dyn ClusteringStrategy>,
    clustering: bool,
    /// Primitives the host manages itself while clustering is off.
    direct: FxHashMap<MarkerId, WidgetMarkerId>,
    direct_by_widget: FxHashMap<WidgetMarkerId, MarkerId>,
    next_id: u64,
}

impl<W: MapWidget> ClusterMap<W> {
    /// Create a map with default configuration, clustering disabled.
    pub fn new(widget: W) -> Self {
        Self::with_config(widget, Config::default())
    }

    pub fn with_config(widget: W, config: Config) -> Self {
        Self {
            widget,
            config,
            zoom: 0.0,
            markers: BTreeMap::new(),
            strategy: Box::new(NoClustering::new()),
            clustering: false,
            direct: FxHashMap::default(),
            direct_by_widget: FxHashMap::default(),
            next_id: 0,
        }
    }

    pub fn builder() -> ClusterMapBuilder {
        ClusterMapBuilder::new()
    }

    /// Add a logical marker and return its id.
    ///
    /// Under clustering the primitive starts hidden until the clustering
    /// decision is made and the requested visibility is applied, so a
    /// marker landing in an occupied cell never flashes on its own.
    pub fn add_marker(&mut self, options: MarkerOptions) -> MarkerId {
        self.next_id += 1;
        let id = MarkerId(self.next_id);
        let marker = LogicalMarker::new(id, options);

        if self.clustering {
            self.strategy.on_add(&marker, &mut self.widget);
            self.strategy
                .on_visibility_change(id, marker.visible(), &mut self.widget);
        } else {
            let wid = self.widget.create_marker(&Self::appearance_of(&marker));
            self.direct.insert(id, wid);
            self.direct_by_widget.insert(wid, id);
        }
        self.markers.insert(id, marker);
        id
    }

    /// Remove a marker and its representation. Returns `false` for
    /// unknown ids.
    pub fn remove_marker(&mut self, id: MarkerId) -> bool {
        if self.markers.remove(&id).is_none() {
            return false;
        }
        if self.clustering {
            self.strategy.on_remove(id, &mut self.widget);
        } else if let Some(wid) = self.direct.remove(&id) {
            self.direct_by_widget.remove(&wid);
            self.widget.destroy_marker(wid);
        }
        true
    }

    /// Move a marker. Returns `false` for unknown ids.
    pub fn set_position(&mut self, id: MarkerId, position: Point<f64>) -> bool {
        let Some(marker) = self.markers.get_mut(&id) else {
            return false;
        };
        marker.set_position(position);
        if self.clustering {
            self.strategy
                .on_position_change(id, position, &mut self.widget);
        } else if let Some(&wid) = self.direct.get(&id) {
            self.widget.set_marker_position(wid, position);
        }
        true
    }

    /// Request a marker's visibility. Returns `false` for unknown ids.
    ///
    /// Under clustering the request is recorded per member; a shared
    /// representation stays visible while any member requests visible.
    pub fn set_visible(&mut self, id: MarkerId, visible: bool) -> bool {
        let Some(marker) = self.markers.get_mut(&id) else {
            return false;
        };
        marker.set_visible(visible);
        if self.clustering {
            self.strategy
                .on_visibility_change(id, visible, &mut self.widget);
        } else if let Some(&wid) = self.direct.get(&id) {
            self.widget.set_marker_visible(wid, visible);
        }
        true
    }

    /// Forward a camera zoom change. Cheap when the zoom bucket did not
    /// change, so hosts call this on every camera event.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom;
        self.strategy.on_zoom_change(zoom, &mut self.widget);
    }

    /// Toggle clustering.
    ///
    /// Enabling seeds a grid strategy with every live marker; many
    /// plain markers may merge into clusters with no intermediate
    /// visible state. Disabling tears the partition down and recreates
    /// one plain primitive per marker. The outgoing strategy is fully
    /// torn down before the new one is installed.
    pub fn set_clustering_enabled(&mut self, enabled: bool) {
        if enabled == self.clustering {
            return;
        }
        if enabled {
            log::debug!("enabling clustering over {} markers", self.markers.len());
            for (_, wid) in self.direct.drain() {
                self.widget.destroy_marker(wid);
            }
            self.direct_by_widget.clear();
            self.strategy = Box::new(GridStrategy::with_markers(
                self.config.clone(),
                self.zoom,
                self.markers.values(),
                &mut self.widget,
            ));
        } else {
            log::debug!("disabling clustering");
            self.strategy.cleanup(&mut self.widget);
            self.strategy = Box::new(NoClustering::new());
            for marker in self.markers.values() {
                let wid = self.widget.create_marker(&Self::appearance_of(marker));
                self.direct.insert(marker.id(), wid);
                self.direct_by_widget.insert(wid, marker.id());
            }
        }
        self.clustering = enabled;
    }

    /// Resolve an underlying-widget identity to the externally visible
    /// entity it represents, e.g. to translate widget-level click
    /// callbacks into logical-marker terms.
    pub fn resolve(&self, id: WidgetMarkerId) -> Option<MapEntity> {
        if let Some(entity) = self.strategy.map(id) {
            return Some(entity);
        }
        self.direct_by_widget
            .get(&id)
            .map(|&marker| MapEntity::Single(marker))
    }

    /// Remove every marker and every representation.
    pub fn clear(&mut self) {
        self.strategy.cleanup(&mut self.widget);
        for (_, wid) in self.direct.drain() {
            self.widget.destroy_marker(wid);
        }
        self.direct_by_widget.clear();
        self.markers.clear();
        if self.clustering {
            // A cleaned strategy must not receive further hooks.
            self.strategy = Box::new(GridStrategy::new(self.config.clone(), self.zoom));
        }
    }

    pub fn marker(&self, id: MarkerId) -> Option<&LogicalMarker> {
        self.markers.get(&id)
    }

    /// Live logical markers in insertion order.
    pub fn markers(&self) -> impl Iterator<Item = &LogicalMarker> {
        self.markers.values()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn clustering_enabled(&self) -> bool {
        self.clustering
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Snapshot of the active strategy's partition. All zeros while
    /// clustering is off.
    pub fn partition_stats(&self) -> PartitionStats {
        self.strategy.stats()
    }

    /// The underlying widget, for inspection.
    pub fn widget(&self) -> &W {
        &self.widget
    }

    fn appearance_of(marker: &LogicalMarker) -> MarkerAppearance {
        MarkerAppearance {
            position: marker.position(),
            visible: marker.visible(),
            z_index: marker.z_index(),
            title: marker.title().map(String::from),
            icon: MarkerIcon::Default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::MemoryWidget;

    fn options(x: f64, y: f64) -> MarkerOptions {
        MarkerOptions::new(Point::new(x, y))
    }

    #[test]
    fn test_disabled_mode_manages_one_primitive_per_marker() {
        let mut map = ClusterMap::new(MemoryWidget::new());
        let a = map.add_marker(options(0.0, 0.0));
        let b = map.add_marker(options(0.0001, 0.0001));

        assert_eq!(map.widget().len(), 2);

        map.set_position(a, Point::new(1.0, 1.0));
        map.set_visible(b, false);
        assert_eq!(map.widget().visible_count(), 1);

        assert!(map.remove_marker(a));
        assert_eq!(map.widget().len(), 1);
    }

    #[test]
    fn test_mutators_return_false_for_unknown_ids() {
        let mut map = ClusterMap::new(MemoryWidget::new());
        assert!(!map.remove_marker(MarkerId(7)));
        assert!(!map.set_position(MarkerId(7), Point::new(0.0, 0.0)));
        assert!(!map.set_visible(MarkerId(7), true));
    }

    #[test]
    fn test_resolve_falls_back_to_the_host_table_when_disabled() {
        let mut map = ClusterMap::new(MemoryWidget::new());
        let id = map.add_marker(options(0.0, 0.0));

        let (wid, _) = map.widget().markers().next().unwrap();
        assert_eq!(map.resolve(wid), Some(MapEntity::Single(id)));
        assert_eq!(map.resolve(WidgetMarkerId(u64::MAX)), None);
    }

    #[test]
    fn test_enabling_clustering_merges_without_leftovers() {
        let mut map = ClusterMap::new(MemoryWidget::new());
        map.set_zoom(10.0);
        map.add_marker(options(0.0, 0.0));
        map.add_marker(options(0.0001, 0.0001));
        map.add_marker(options(50.0, 50.0));
        assert_eq!(map.widget().len(), 3);

        map.set_clustering_enabled(true);

        assert!(map.clustering_enabled());
        assert_eq!(map.widget().len(), 2);
        assert_eq!(
            map.partition_stats(),
            PartitionStats { markers: 3, clusters: 2, aggregates: 1 }
        );
    }

    #[test]
    fn test_disabling_clustering_restores_plain_primitives() {
        let mut map = ClusterMap::new(MemoryWidget::new());
        map.set_zoom(10.0);
        map.set_clustering_enabled(true);
        map.add_marker(options(0.0, 0.0));
        let hidden = map.add_marker(MarkerOptions::new(Point::new(0.0001, 0.0001)).hidden());
        assert_eq!(map.widget().len(), 1);

        map.set_clustering_enabled(false);

        assert_eq!(map.widget().len(), 2);
        // Per-marker intent survives the switch.
        assert_eq!(map.widget().visible_count(), 1);
        assert_eq!(map.partition_stats(), PartitionStats::default());

        let (wid, _) = map
            .widget()
            .markers()
            .find(|(_, m)| !m.visible)
            .unwrap();
        assert_eq!(map.resolve(wid), Some(MapEntity::Single(hidden)));
    }

    #[test]
    fn test_toggle_to_same_state_is_a_no_op() {
        let mut map = ClusterMap::new(MemoryWidget::new());
        map.add_marker(options(0.0, 0.0));
        let before = map.widget().stats();

        map.set_clustering_enabled(false);
        assert_eq!(map.widget().stats(), before);
    }

    #[test]
    fn test_clear_destroys_everything_and_stays_usable() {
        let mut map = ClusterMap::new(MemoryWidget::new());
        map.set_zoom(10.0);
        map.set_clustering_enabled(true);
        map.add_marker(options(0.0, 0.0));
        map.add_marker(options(0.0001, 0.0001));

        map.clear();
        assert!(map.is_empty());
        assert!(map.widget().is_empty());

        // The map accepts new markers after a clear.
        map.add_marker(options(1.0, 1.0));
        assert_eq!(map.widget().len(), 1);
    }

    #[test]
    fn test_clustered_marker_ids_resolve_after_camera_motion() {
        let mut map = ClusterMap::new(MemoryWidget::new());
        map.set_clustering_enabled(true);
        map.set_zoom(10.0);
        let a = map.add_marker(options(0.0, 0.0));
        let b = map.add_marker(options(0.0001, 0.0001));

        map.set_zoom(4.0);
        map.set_zoom(12.0);

        let (wid, _) = map.widget().markers().next().unwrap();
        let entity = map.resolve(wid).unwrap();
        assert_eq!(entity.members(), &[a, b]);
    }
}
