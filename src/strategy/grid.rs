//! Grid-based clustering: one cluster per occupied zoom-bucketed cell.

use std::collections::BTreeMap;

use geo::Point;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use super::{ClusteringStrategy, MapEntity};
use crate::cluster::{Cluster, representative};
use crate::grid::{CellIndex, CellKey, bucket_for_zoom, cell_at};
use crate::marker::{LogicalMarker, MarkerId};
use crate::types::{Config, PartitionStats, RepresentativePolicy};
use crate::widget::{MapWidget, MarkerAppearance, MarkerIcon, WidgetMarkerId};

/// Per-marker attributes the strategy needs to re-render a marker after
/// its cluster dissolves.
#[derive(Debug, Clone)]
struct MarkerState {
    position: Point<f64>,
    visible: bool,
    z_index: f32,
    title: Option<String>,
}

/// Grid-based clustering strategy.
///
/// Owns the spatial cell index and the partition: every tracked marker
/// belongs to exactly one cell, and every occupied cell is rendered by
/// exactly one underlying-widget marker, plain for one member or an
/// aggregate badge for two or more.
pub struct GridStrategy {
    config: Config,
    /// Current zoom bucket; `None` at and above the clustering ceiling,
    /// where every marker occupies a degenerate cell of its own.
    bucket: Option<u8>,
    index: CellIndex,
    /// Tracked markers in id (= insertion) order, so repartitions are
    /// deterministic.
    states: BTreeMap<MarkerId, MarkerState>,
    membership: FxHashMap<MarkerId, CellKey>,
    clusters: FxHashMap<CellKey, Cluster>,
    by_widget: FxHashMap<WidgetMarkerId, CellKey>,
    cleaned: bool,
}

impl GridStrategy {
    /// Create an empty strategy at `zoom`.
    pub fn new(config: Config, zoom: f64) -> Self {
        let bucket = bucket_for_zoom(zoom, config.max_cluster_zoom);
        Self {
            config,
            bucket,
            index: CellIndex::new(),
            states: BTreeMap::new(),
            membership: FxHashMap::default(),
            clusters: FxHashMap::default(),
            by_widget: FxHashMap::default(),
            cleaned: false,
        }
    }

    /// Create a strategy seeded with every currently-live marker: the
    /// equivalent of [`on_add`](ClusteringStrategy::on_add) for each,
    /// followed by its requested visibility. Markers sharing a cell
    /// merge immediately, with no intermediate visible state.
    pub fn with_markers<'a, I>(
        config: Config,
        zoom: f64,
        markers: I,
        widget: &mut dyn MapWidget,
    ) -> Self
    where
        I: IntoIterator<Item = &'a LogicalMarker>,
    {
        let mut strategy = Self::new(config, zoom);
        let mut requested = Vec::new();
        for marker in markers {
            strategy.on_add(marker, widget);
            requested.push((marker.id(), marker.visible()));
        }
        for (id, visible) in requested {
            strategy.on_visibility_change(id, visible, widget);
        }
        strategy
    }

    fn key_for(&self, id: MarkerId, position: Point<f64>) -> CellKey {
        match self.bucket {
            Some(bucket) => cell_at(position, bucket, self.config.base_cell_span),
            None => CellKey::Point(id),
        }
    }

    fn any_member_visible(&self, key: CellKey) -> bool {
        self.index
            .members(key)
            .iter()
            .any(|id| self.states.get(id).is_some_and(|state| state.visible))
    }

    /// Render the current members of `key` and register the cluster.
    /// A lone member renders as a plain marker with its own attributes;
    /// two or more render as an aggregate badge at the policy anchor.
    fn create_representation(&mut self, key: CellKey, widget: &mut dyn MapWidget) {
        let members: SmallVec<[MarkerId; 4]> = self.index.members(key).into();
        debug_assert!(!members.is_empty(), "representation for an empty cell");

        let (appearance, anchor) = if let [id] = members[..] {
            let Some(state) = self.states.get(&id) else {
                return;
            };
            let appearance = MarkerAppearance {
                position: state.position,
                visible: state.visible,
                z_index: state.z_index,
                title: state.title.clone(),
                icon: MarkerIcon::Default,
            };
            (appearance, state.position)
        } else {
            let anchor = representative(
                self.config.representative,
                members
                    .iter()
                    .filter_map(|id| self.states.get(id))
                    .map(|state| state.position),
            );
            let visible = members
                .iter()
                .any(|id| self.states.get(id).is_some_and(|state| state.visible));
            let appearance = MarkerAppearance {
                position: anchor,
                visible,
                z_index: 0.0,
                title: None,
                icon: MarkerIcon::ClusterBadge(members.len() as u32),
            };
            (appearance, anchor)
        };

        let shown = appearance.visible;
        let id = widget.create_marker(&appearance);
        self.by_widget.insert(id, key);
        self.clusters.insert(key, Cluster { anchor, widget: id, shown });
    }

    fn destroy_representation(&mut self, key: CellKey, widget: &mut dyn MapWidget) {
        if let Some(cluster) = self.clusters.remove(&key) {
            self.by_widget.remove(&cluster.widget);
            widget.destroy_marker(cluster.widget);
        }
    }

    /// Refresh an aggregate's badge and visibility after membership or
    /// member-visibility changes.
    fn sync_cluster(&mut self, key: CellKey, count: usize, widget: &mut dyn MapWidget) {
        let visible = self.any_member_visible(key);
        if let Some(cluster) = self.clusters.get_mut(&key) {
            widget.set_marker_icon(cluster.widget, MarkerIcon::ClusterBadge(count as u32));
            if cluster.shown != visible {
                cluster.shown = visible;
                widget.set_marker_visible(cluster.widget, visible);
            }
        }
    }

    /// Place a tracked marker into its cell at the current bucket,
    /// collapsing a lone occupant into an aggregate when it becomes the
    /// second member.
    fn attach(&mut self, id: MarkerId, widget: &mut dyn MapWidget) {
        let Some(state) = self.states.get(&id) else {
            return;
        };
        let key = self.key_for(id, state.position);
        self.index.insert(id, key);
        self.membership.insert(id, key);

        match self.index.members(key).len() {
            1 => self.create_representation(key, widget),
            2 => {
                // The lone occupant's plain marker gives way to one
                // aggregate, exactly one destroy and one create.
                self.destroy_representation(key, widget);
                self.create_representation(key, widget);
            }
            n => self.sync_cluster(key, n, widget),
        }
    }

    /// Take a marker out of its cell, dissolving the aggregate back to a
    /// plain marker when one member remains.
    fn detach(&mut self, id: MarkerId, widget: &mut dyn MapWidget) {
        let Some(key) = self.membership.remove(&id) else {
            return;
        };
        self.index.remove(id, key);

        match self.index.members(key).len() {
            0 => self.destroy_representation(key, widget),
            1 => {
                self.destroy_representation(key, widget);
                self.create_representation(key, widget);
            }
            n => self.sync_cluster(key, n, widget),
        }
    }

    /// Recompute the partition at the current bucket.
    ///
    /// Cell boundaries are bucket-relative, so this is a full pass over
    /// all tracked markers rather than an incremental diff. A cluster
    /// whose member sequence is unchanged keeps its widget marker
    /// untouched, whatever cell it now hangs off, so reclustering does
    /// not churn identities for cells that did not change.
    fn rebuild(&mut self, widget: &mut dyn MapWidget) {
        let mut regrouped: FxHashMap<CellKey, SmallVec<[MarkerId; 4]>> = FxHashMap::default();
        let mut order = Vec::new();
        for (&id, state) in &self.states {
            let key = match self.bucket {
                Some(bucket) => cell_at(state.position, bucket, self.config.base_cell_span),
                None => CellKey::Point(id),
            };
            let members = regrouped.entry(key).or_default();
            if members.is_empty() {
                order.push(key);
            }
            members.push(id);
        }

        let old_cells = self.index.take_cells();
        let old_membership = std::mem::take(&mut self.membership);
        let mut retired = std::mem::take(&mut self.clusters);
        self.by_widget.clear();

        for key in order {
            let Some(members) = regrouped.remove(&key) else {
                continue;
            };
            for &id in &members {
                self.membership.insert(id, key);
            }

            let previous = members
                .first()
                .and_then(|id| old_membership.get(id))
                .copied();
            let reusable = previous
                .filter(|prev| old_cells.get(prev).is_some_and(|old| *old == members));
            self.index.set(key, members);

            if let Some(cluster) = reusable.and_then(|prev| retired.remove(&prev)) {
                self.by_widget.insert(cluster.widget, key);
                self.clusters.insert(key, cluster);
            } else {
                self.create_representation(key, widget);
            }
        }

        for cluster in retired.into_values() {
            widget.destroy_marker(cluster.widget);
        }
    }
}

impl ClusteringStrategy for GridStrategy {
    fn on_add(&mut self, marker: &LogicalMarker, widget: &mut dyn MapWidget) {
        debug_assert!(!self.cleaned, "lifecycle hook after cleanup()");
        let id = marker.id();
        if self.states.contains_key(&id) {
            return;
        }
        // The marker enters hidden; the host applies the requested
        // visibility once the clustering decision is made.
        self.states.insert(
            id,
            MarkerState {
                position: marker.position(),
                visible: false,
                z_index: marker.z_index(),
                title: marker.title().map(String::from),
            },
        );
        self.attach(id, widget);
    }

    fn on_remove(&mut self, id: MarkerId, widget: &mut dyn MapWidget) {
        debug_assert!(!self.cleaned, "lifecycle hook after cleanup()");
        if self.states.remove(&id).is_none() {
            return;
        }
        self.detach(id, widget);
    }

    fn on_position_change(&mut self, id: MarkerId, position: Point<f64>, widget: &mut dyn MapWidget) {
        debug_assert!(!self.cleaned, "lifecycle hook after cleanup()");
        let Some(state) = self.states.get_mut(&id) else {
            return;
        };
        state.position = position;
        let Some(&old_key) = self.membership.get(&id) else {
            return;
        };

        let new_key = self.key_for(id, position);
        if new_key == old_key {
            // Same cell: reposition the widget marker only when the
            // moved marker anchors it.
            let members = self.index.members(old_key);
            let anchors = members.len() == 1
                || (self.config.representative == RepresentativePolicy::FirstMember
                    && members.first() == Some(&id));
            if anchors && let Some(cluster) = self.clusters.get_mut(&old_key) {
                cluster.anchor = position;
                widget.set_marker_position(cluster.widget, position);
            }
        } else {
            self.detach(id, widget);
            self.attach(id, widget);
        }
    }

    fn on_visibility_change(&mut self, id: MarkerId, visible: bool, widget: &mut dyn MapWidget) {
        debug_assert!(!self.cleaned, "lifecycle hook after cleanup()");
        let Some(state) = self.states.get_mut(&id) else {
            return;
        };
        if state.visible == visible {
            return;
        }
        state.visible = visible;
        let Some(&key) = self.membership.get(&id) else {
            return;
        };

        let shown = self.any_member_visible(key);
        if let Some(cluster) = self.clusters.get_mut(&key)
            && cluster.shown != shown
        {
            cluster.shown = shown;
            widget.set_marker_visible(cluster.widget, shown);
        }
    }

    fn on_zoom_change(&mut self, zoom: f64, widget: &mut dyn MapWidget) {
        debug_assert!(!self.cleaned, "lifecycle hook after cleanup()");
        let bucket = bucket_for_zoom(zoom, self.config.max_cluster_zoom);
        if bucket == self.bucket {
            return;
        }
        log::debug!(
            "zoom bucket {:?} -> {:?}, repartitioning {} markers",
            self.bucket,
            bucket,
            self.states.len()
        );
        self.bucket = bucket;
        self.rebuild(widget);
    }

    fn cleanup(&mut self, widget: &mut dyn MapWidget) {
        for cluster in self.clusters.values() {
            widget.destroy_marker(cluster.widget);
        }
        self.clusters.clear();
        self.by_widget.clear();
        self.membership.clear();
        self.index.clear();
        self.states.clear();
        self.cleaned = true;
    }

    fn map(&self, id: WidgetMarkerId) -> Option<MapEntity> {
        let key = *self.by_widget.get(&id)?;
        match self.index.members(key) {
            [] => None,
            [single] => Some(MapEntity::Single(*single)),
            members => {
                let cluster = self.clusters.get(&key)?;
                Some(MapEntity::Cluster {
                    anchor: cluster.anchor,
                    members: members.to_vec(),
                })
            }
        }
    }

    fn stats(&self) -> PartitionStats {
        PartitionStats {
            markers: self.states.len(),
            clusters: self.clusters.len(),
            aggregates: self.index.iter().filter(|(_, m)| m.len() >= 2).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::MarkerOptions;
    use crate::widget::MemoryWidget;

    fn marker(id: u64, x: f64, y: f64) -> LogicalMarker {
        LogicalMarker::new(MarkerId(id), MarkerOptions::new(Point::new(x, y)))
    }

    fn hidden_marker(id: u64, x: f64, y: f64) -> LogicalMarker {
        LogicalMarker::new(MarkerId(id), MarkerOptions::new(Point::new(x, y)).hidden())
    }

    /// Mirror of the host's add flow: create hidden, then apply the
    /// requested visibility.
    fn add(strategy: &mut GridStrategy, widget: &mut MemoryWidget, marker: &LogicalMarker) {
        strategy.on_add(marker, widget);
        strategy.on_visibility_change(marker.id(), marker.visible(), widget);
    }

    fn strategy_at_zoom(zoom: f64) -> GridStrategy {
        GridStrategy::new(Config::default(), zoom)
    }

    #[test]
    fn test_single_marker_renders_plain() {
        let mut widget = MemoryWidget::new();
        let mut strategy = strategy_at_zoom(10.0);

        add(&mut strategy, &mut widget, &marker(1, 0.0, 0.0));

        assert_eq!(widget.len(), 1);
        let (_, rendered) = widget.markers().next().unwrap();
        assert_eq!(rendered.icon, MarkerIcon::Default);
        assert!(rendered.visible);
    }

    #[test]
    fn test_second_member_collapses_to_aggregate_exactly_once() {
        let mut widget = MemoryWidget::new();
        let mut strategy = strategy_at_zoom(10.0);

        add(&mut strategy, &mut widget, &marker(1, 0.0, 0.0));
        let before = widget.stats();

        add(&mut strategy, &mut widget, &marker(2, 0.0001, 0.0001));

        let after = widget.stats();
        assert_eq!(after.created - before.created, 1);
        assert_eq!(after.destroyed - before.destroyed, 1);
        assert_eq!(widget.len(), 1);

        let (_, rendered) = widget.markers().next().unwrap();
        assert_eq!(rendered.icon, MarkerIcon::ClusterBadge(2));
        // First-member policy: the aggregate sits at marker 1.
        assert_eq!(rendered.position, Point::new(0.0, 0.0));
    }

    #[test]
    fn test_third_member_only_updates_the_badge() {
        let mut widget = MemoryWidget::new();
        let mut strategy = strategy_at_zoom(10.0);

        add(&mut strategy, &mut widget, &marker(1, 0.0, 0.0));
        add(&mut strategy, &mut widget, &marker(2, 0.0001, 0.0001));
        let before = widget.stats();

        add(&mut strategy, &mut widget, &marker(3, 0.0002, 0.0002));

        let after = widget.stats();
        assert_eq!(after.churn(), before.churn());
        let (_, rendered) = widget.markers().next().unwrap();
        assert_eq!(rendered.icon, MarkerIcon::ClusterBadge(3));
    }

    #[test]
    fn test_removal_expands_back_to_plain_exactly_once() {
        let mut widget = MemoryWidget::new();
        let mut strategy = strategy_at_zoom(10.0);

        add(&mut strategy, &mut widget, &marker(1, 0.0, 0.0));
        add(&mut strategy, &mut widget, &marker(2, 0.0001, 0.0001));
        let before = widget.stats();

        strategy.on_remove(MarkerId(1), &mut widget);

        let after = widget.stats();
        assert_eq!(after.created - before.created, 1);
        assert_eq!(after.destroyed - before.destroyed, 1);
        assert_eq!(widget.len(), 1);

        let (_, rendered) = widget.markers().next().unwrap();
        assert_eq!(rendered.icon, MarkerIcon::Default);
        assert_eq!(rendered.position, Point::new(0.0001, 0.0001));
    }

    #[test]
    fn test_removing_last_member_destroys_the_cluster() {
        let mut widget = MemoryWidget::new();
        let mut strategy = strategy_at_zoom(10.0);

        add(&mut strategy, &mut widget, &marker(1, 0.0, 0.0));
        strategy.on_remove(MarkerId(1), &mut widget);

        assert!(widget.is_empty());
        assert_eq!(strategy.stats(), PartitionStats::default());
    }

    #[test]
    fn test_visibility_aggregates_across_members() {
        let mut widget = MemoryWidget::new();
        let mut strategy = strategy_at_zoom(10.0);

        add(&mut strategy, &mut widget, &marker(1, 0.0, 0.0));
        add(&mut strategy, &mut widget, &hidden_marker(2, 0.0001, 0.0001));

        // {visible, hidden} -> shown.
        assert_eq!(widget.visible_count(), 1);

        strategy.on_visibility_change(MarkerId(1), false, &mut widget);
        assert_eq!(widget.visible_count(), 0);

        strategy.on_visibility_change(MarkerId(2), true, &mut widget);
        assert_eq!(widget.visible_count(), 1);
    }

    #[test]
    fn test_unclustering_respects_per_member_intent() {
        let mut widget = MemoryWidget::new();
        let mut strategy = strategy_at_zoom(10.0);

        add(&mut strategy, &mut widget, &marker(1, 0.0, 0.0));
        add(&mut strategy, &mut widget, &hidden_marker(2, 0.0001, 0.0001));

        // The hidden member survives; its plain marker must come back
        // hidden even though the aggregate was visible.
        strategy.on_remove(MarkerId(1), &mut widget);

        assert_eq!(widget.len(), 1);
        assert_eq!(widget.visible_count(), 0);
    }

    #[test]
    fn test_zoom_change_with_same_bucket_is_free() {
        let mut widget = MemoryWidget::new();
        let mut strategy = strategy_at_zoom(10.0);

        add(&mut strategy, &mut widget, &marker(1, 0.0, 0.0));
        add(&mut strategy, &mut widget, &marker(2, 30.0, 30.0));
        let before = widget.stats();

        strategy.on_zoom_change(10.0, &mut widget);
        strategy.on_zoom_change(10.3, &mut widget);
        strategy.on_zoom_change(10.9, &mut widget);

        assert_eq!(widget.stats(), before);
    }

    #[test]
    fn test_reclustering_preserves_unchanged_cluster_identity() {
        let mut widget = MemoryWidget::new();
        let mut strategy = strategy_at_zoom(10.0);

        add(&mut strategy, &mut widget, &marker(1, 0.0, 0.0));
        add(&mut strategy, &mut widget, &marker(2, 0.0001, 0.0001));
        assert_eq!(widget.len(), 1);
        let (id_before, _) = widget.markers().next().unwrap();

        // Coarser bucket: the pair still shares a cell, so its widget
        // marker must survive untouched.
        let churn_before = widget.stats().churn();
        strategy.on_zoom_change(5.0, &mut widget);

        assert_eq!(widget.stats().churn(), churn_before);
        let (id_after, _) = widget.markers().next().unwrap();
        assert_eq!(id_before, id_after);
    }

    #[test]
    fn test_zooming_past_ceiling_splits_everything() {
        let config = Config::default().with_max_cluster_zoom(16.0);
        let mut widget = MemoryWidget::new();
        let mut strategy = GridStrategy::new(config, 10.0);

        add(&mut strategy, &mut widget, &marker(1, 0.0, 0.0));
        add(&mut strategy, &mut widget, &marker(2, 0.0001, 0.0001));
        assert_eq!(widget.len(), 1);

        strategy.on_zoom_change(17.0, &mut widget);

        assert_eq!(widget.len(), 2);
        assert!(widget.markers().all(|(_, m)| m.icon == MarkerIcon::Default));

        // And back down they merge again.
        strategy.on_zoom_change(10.0, &mut widget);
        assert_eq!(widget.len(), 1);
    }

    #[test]
    fn test_position_change_within_cell_moves_the_singleton() {
        let mut widget = MemoryWidget::new();
        let mut strategy = strategy_at_zoom(10.0);

        add(&mut strategy, &mut widget, &marker(1, 0.0, 0.0));
        let before = widget.stats();

        strategy.on_position_change(MarkerId(1), Point::new(0.0001, 0.0001), &mut widget);

        assert_eq!(widget.stats().churn(), before.churn());
        let (_, rendered) = widget.markers().next().unwrap();
        assert_eq!(rendered.position, Point::new(0.0001, 0.0001));
    }

    #[test]
    fn test_position_change_moves_aggregate_only_for_representative() {
        let mut widget = MemoryWidget::new();
        let mut strategy = strategy_at_zoom(10.0);

        add(&mut strategy, &mut widget, &marker(1, 0.0, 0.0));
        add(&mut strategy, &mut widget, &marker(2, 0.0001, 0.0001));

        // Non-representative member moves within the cell: no-op.
        strategy.on_position_change(MarkerId(2), Point::new(0.0002, 0.0002), &mut widget);
        let (_, rendered) = widget.markers().next().unwrap();
        assert_eq!(rendered.position, Point::new(0.0, 0.0));

        // The first member anchors the aggregate.
        strategy.on_position_change(MarkerId(1), Point::new(0.0003, 0.0003), &mut widget);
        let (_, rendered) = widget.markers().next().unwrap();
        assert_eq!(rendered.position, Point::new(0.0003, 0.0003));
    }

    #[test]
    fn test_position_change_across_cells_reclusters() {
        let mut widget = MemoryWidget::new();
        let mut strategy = strategy_at_zoom(10.0);

        add(&mut strategy, &mut widget, &marker(1, 0.0, 0.0));
        add(&mut strategy, &mut widget, &marker(2, 0.0001, 0.0001));
        add(&mut strategy, &mut widget, &marker(3, 50.0, 50.0));
        assert_eq!(widget.len(), 2);

        // Marker 2 leaves the pair and joins marker 3.
        strategy.on_position_change(MarkerId(2), Point::new(50.0001, 50.0001), &mut widget);

        assert_eq!(widget.len(), 2);
        let mut icons: Vec<_> = widget.markers().map(|(_, m)| m.icon).collect();
        icons.sort_by_key(|icon| matches!(icon, MarkerIcon::ClusterBadge(_)));
        assert_eq!(icons, vec![MarkerIcon::Default, MarkerIcon::ClusterBadge(2)]);
    }

    #[test]
    fn test_hooks_for_unknown_markers_are_no_ops() {
        let mut widget = MemoryWidget::new();
        let mut strategy = strategy_at_zoom(10.0);

        strategy.on_remove(MarkerId(9), &mut widget);
        strategy.on_position_change(MarkerId(9), Point::new(1.0, 1.0), &mut widget);
        strategy.on_visibility_change(MarkerId(9), false, &mut widget);

        assert!(widget.is_empty());
        assert_eq!(strategy.stats(), PartitionStats::default());
    }

    #[test]
    fn test_double_add_is_a_no_op() {
        let mut widget = MemoryWidget::new();
        let mut strategy = strategy_at_zoom(10.0);

        let m = marker(1, 0.0, 0.0);
        add(&mut strategy, &mut widget, &m);
        let before = widget.stats();

        strategy.on_add(&m, &mut widget);
        assert_eq!(widget.stats(), before);
    }

    #[test]
    fn test_cleanup_destroys_every_representation() {
        let mut widget = MemoryWidget::new();
        let mut strategy = strategy_at_zoom(10.0);

        add(&mut strategy, &mut widget, &marker(1, 0.0, 0.0));
        add(&mut strategy, &mut widget, &marker(2, 0.0001, 0.0001));
        add(&mut strategy, &mut widget, &marker(3, 50.0, 50.0));

        strategy.cleanup(&mut widget);

        assert!(widget.is_empty());
        assert_eq!(strategy.stats(), PartitionStats::default());
    }

    #[test]
    fn test_map_resolves_singles_and_clusters() {
        let mut widget = MemoryWidget::new();
        let mut strategy = strategy_at_zoom(10.0);

        add(&mut strategy, &mut widget, &marker(1, 0.0, 0.0));
        add(&mut strategy, &mut widget, &marker(2, 0.0001, 0.0001));
        add(&mut strategy, &mut widget, &marker(3, 50.0, 50.0));

        let mut singles = 0;
        let mut clusters = 0;
        for (id, _) in widget.markers() {
            match strategy.map(id) {
                Some(MapEntity::Single(id)) => {
                    singles += 1;
                    assert_eq!(id, MarkerId(3));
                }
                Some(MapEntity::Cluster { members, .. }) => {
                    clusters += 1;
                    assert_eq!(members, vec![MarkerId(1), MarkerId(2)]);
                }
                None => panic!("strategy-owned marker did not resolve"),
            }
        }
        assert_eq!((singles, clusters), (1, 1));

        assert_eq!(strategy.map(WidgetMarkerId(u64::MAX)), None);
    }

    #[test]
    fn test_centroid_policy_anchors_at_the_mean() {
        let config = Config::default().with_representative(RepresentativePolicy::Centroid);
        let mut widget = MemoryWidget::new();
        let mut strategy = GridStrategy::new(config, 10.0);

        add(&mut strategy, &mut widget, &marker(1, 0.0, 0.0));
        add(&mut strategy, &mut widget, &marker(2, 0.0002, 0.0002));

        let (_, rendered) = widget.markers().next().unwrap();
        assert_eq!(rendered.position, Point::new(0.0001, 0.0001));
    }

    #[test]
    fn test_with_markers_seeds_without_flashing() {
        let mut widget = MemoryWidget::new();
        let markers = vec![
            marker(1, 0.0, 0.0),
            marker(2, 0.0001, 0.0001),
            hidden_marker(3, 50.0, 50.0),
        ];

        let strategy = GridStrategy::with_markers(
            Config::default(),
            10.0,
            markers.iter(),
            &mut widget,
        );

        assert_eq!(widget.len(), 2);
        assert_eq!(widget.visible_count(), 1);
        assert_eq!(
            strategy.stats(),
            PartitionStats { markers: 3, clusters: 2, aggregates: 1 }
        );
    }

    #[test]
    fn test_partition_stays_complete_under_churn() {
        let mut widget = MemoryWidget::new();
        let mut strategy = strategy_at_zoom(8.0);

        for i in 0..20 {
            let m = marker(i, f64::from(i as u32) * 0.3, 10.0);
            add(&mut strategy, &mut widget, &m);
        }
        for i in (0..20).step_by(3) {
            strategy.on_remove(MarkerId(i), &mut widget);
        }
        strategy.on_zoom_change(3.0, &mut widget);
        strategy.on_zoom_change(12.0, &mut widget);

        // Every tracked marker resolves through exactly one widget
        // marker.
        let mut seen = Vec::new();
        for (id, _) in widget.markers() {
            let entity = strategy.map(id).expect("untracked widget marker");
            seen.extend_from_slice(entity.members());
        }
        seen.sort();
        let expected: Vec<_> = (0..20)
            .filter(|i| i % 3 != 0)
            .map(MarkerId)
            .collect();
        assert_eq!(seen, expected);
    }
}
