//! Configuration and statistics types for the clustering engine.

use serde::{Deserialize, Serialize};

use crate::error::{ClusterError, Result};

/// Policy for choosing a cluster's rendered (representative) position.
///
/// The anchor is computed when a cluster's on-screen representation is
/// created and held fixed until that representation is recreated, so
/// membership churn does not make the aggregate marker wander.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RepresentativePolicy {
    /// Anchor at the first inserted member's position.
    #[default]
    FirstMember,
    /// Anchor at the arithmetic mean of the member positions at the time
    /// the representation is created.
    Centroid,
}

/// Clustering engine configuration.
///
/// Serializable so hosts can load it from JSON alongside their own
/// settings.
///
/// # Example
///
/// ```rust
/// use geocluster::Config;
///
/// let config = Config::default().with_max_cluster_zoom(14.0);
///
/// let parsed = Config::from_json(r#"{"max_cluster_zoom": 14.0}"#).unwrap();
/// assert_eq!(parsed.max_cluster_zoom, config.max_cluster_zoom);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Degrees of latitude/longitude spanned by a grid cell at zoom
    /// bucket 0. The span halves with every bucket, so zooming out
    /// coarsens clustering.
    #[serde(default = "Config::default_base_cell_span")]
    pub base_cell_span: f64,

    /// Zoom level at and above which markers are no longer merged.
    #[serde(default = "Config::default_max_cluster_zoom")]
    pub max_cluster_zoom: f64,

    /// How a cluster's rendered position is chosen.
    #[serde(default)]
    pub representative: RepresentativePolicy,
}

impl Config {
    const fn default_base_cell_span() -> f64 {
        90.0
    }

    const fn default_max_cluster_zoom() -> f64 {
        16.0
    }

    /// Parse a configuration from JSON and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_base_cell_span(mut self, degrees: f64) -> Self {
        self.base_cell_span = degrees;
        self
    }

    pub fn with_max_cluster_zoom(mut self, zoom: f64) -> Self {
        self.max_cluster_zoom = zoom;
        self
    }

    pub fn with_representative(mut self, policy: RepresentativePolicy) -> Self {
        self.representative = policy;
        self
    }

    /// Check every value against its accepted range.
    pub fn validate(&self) -> Result<()> {
        if !self.base_cell_span.is_finite() || self.base_cell_span <= 0.0 {
            return Err(ClusterError::InvalidConfig(
                "base_cell_span must be finite and positive",
            ));
        }
        if !self.max_cluster_zoom.is_finite() || self.max_cluster_zoom < 0.0 {
            return Err(ClusterError::InvalidConfig(
                "max_cluster_zoom must be finite and non-negative",
            ));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_cell_span: Self::default_base_cell_span(),
            max_cluster_zoom: Self::default_max_cluster_zoom(),
            representative: RepresentativePolicy::default(),
        }
    }
}

/// Snapshot of the active strategy's partition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PartitionStats {
    /// Markers currently tracked by the strategy.
    pub markers: usize,
    /// Occupied cells, each rendered by one underlying-widget marker.
    pub clusters: usize,
    /// Clusters with two or more members.
    pub aggregates: usize,
}
