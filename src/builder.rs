//! Builder for assembling a configured cluster map.

use crate::error::Result;
use crate::map::ClusterMap;
use crate::types::Config;
use crate::widget::MapWidget;

/// Builder for [`ClusterMap`] with validation.
///
/// # Example
///
/// ```rust
/// use geocluster::{ClusterMap, Config, MemoryWidget};
///
/// let map = ClusterMap::builder()
///     .config(Config::default().with_max_cluster_zoom(14.0))
///     .zoom(10.0)
///     .clustering(true)
///     .build(MemoryWidget::new())
///     .unwrap();
/// assert!(map.clustering_enabled());
/// ```
#[derive(Debug)]
pub struct ClusterMapBuilder {
    config: Config,
    zoom: f64,
    clustering: bool,
}

impl ClusterMapBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            zoom: 0.0,
            clustering: false,
        }
    }

    /// Set the clustering configuration.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Set the initial camera zoom level.
    pub fn zoom(mut self, zoom: f64) -> Self {
        self.zoom = zoom;
        self
    }

    /// Start with clustering enabled.
    pub fn clustering(mut self, enabled: bool) -> Self {
        self.clustering = enabled;
        self
    }

    /// Validate the configuration and assemble the map.
    pub fn build<W: MapWidget>(self, widget: W) -> Result<ClusterMap<W>> {
        self.config.validate()?;
        let mut map = ClusterMap::with_config(widget, self.config);
        map.set_zoom(self.zoom);
        if self.clustering {
            map.set_clustering_enabled(true);
        }
        Ok(map)
    }
}

impl Default for ClusterMapBuilder {
    fn default() -> Self {
        Self::new()
    }
}
