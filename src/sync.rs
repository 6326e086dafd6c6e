//! Thread-safe wrapper for hosts that deliver events from several
//! threads.
//!
//! The clustering engine assumes serialized event delivery and performs
//! no internal locking. `SyncClusterMap` wraps [`ClusterMap`] in
//! `Arc<RwLock<..>>` so every event is processed to completion before
//! the next one enters, which is exactly the external serialization the
//! engine requires.
//!
//! # Features
//!
//! Enable the `sync` feature to use this module:
//!
//! ```toml
//! [dependencies]
//! geocluster = { version = "0.1", features = ["sync"] }
//! ```

use std::sync::Arc;

use geo::Point;
use parking_lot::RwLock;

use crate::map::ClusterMap;
use crate::marker::{LogicalMarker, MarkerId, MarkerOptions};
use crate::strategy::MapEntity;
use crate::types::{Config, PartitionStats};
use crate::widget::{MapWidget, WidgetMarkerId};

/// Thread-safe wrapper around [`ClusterMap`].
///
/// Implements `Clone` for easy sharing between threads; reads
/// (`resolve`, accessors) take a shared lock, mutations take an
/// exclusive one.
pub struct SyncClusterMap<W: MapWidget> {
    inner: Arc<RwLock<ClusterMap<W>>>,
}

impl<W: MapWidget> Clone for SyncClusterMap<W> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<W: MapWidget + Send + Sync> SyncClusterMap<W> {
    /// Wrap a map for shared use.
    pub fn new(map: ClusterMap<W>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(map)),
        }
    }

    pub fn add_marker(&self, options: MarkerOptions) -> MarkerId {
        self.inner.write().add_marker(options)
    }

    pub fn remove_marker(&self, id: MarkerId) -> bool {
        self.inner.write().remove_marker(id)
    }

    pub fn set_position(&self, id: MarkerId, position: Point<f64>) -> bool {
        self.inner.write().set_position(id, position)
    }

    pub fn set_visible(&self, id: MarkerId, visible: bool) -> bool {
        self.inner.write().set_visible(id, visible)
    }

    pub fn set_zoom(&self, zoom: f64) {
        self.inner.write().set_zoom(zoom);
    }

    pub fn set_clustering_enabled(&self, enabled: bool) {
        self.inner.write().set_clustering_enabled(enabled);
    }

    pub fn resolve(&self, id: WidgetMarkerId) -> Option<MapEntity> {
        self.inner.read().resolve(id)
    }

    pub fn clear(&self) {
        self.inner.write().clear();
    }

    pub fn marker(&self, id: MarkerId) -> Option<LogicalMarker> {
        self.inner.read().marker(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn clustering_enabled(&self) -> bool {
        self.inner.read().clustering_enabled()
    }

    pub fn config(&self) -> Config {
        self.inner.read().config().clone()
    }

    pub fn partition_stats(&self) -> PartitionStats {
        self.inner.read().partition_stats()
    }

    /// Acquire a read lock for several reads under one lock.
    pub fn read(&self) -> parking_lot::RwLockReadGuard<'_, ClusterMap<W>> {
        self.inner.read()
    }

    /// Acquire a write lock for several mutations under one lock.
    pub fn write(&self) -> parking_lot::RwLockWriteGuard<'_, ClusterMap<W>> {
        self.inner.write()
    }
}
