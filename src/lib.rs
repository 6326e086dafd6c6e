//! Grid-based marker clustering for interactive map widgets.
//!
//! Nearby point markers merge into synthetic cluster markers that
//! re-form as the camera zooms, while the underlying widget's marker set
//! stays consistent with application intent. The engine decides, for a
//! dynamic set of markers, which render individually and which share an
//! aggregate primitive, and it keeps that decision correct as markers
//! are added, removed, repositioned, hidden, or the zoom level changes.
//!
//! ```rust
//! use geocluster::{ClusterMap, MarkerOptions, MemoryWidget};
//! use geo::Point;
//!
//! let mut map = ClusterMap::new(MemoryWidget::new());
//! map.set_clustering_enabled(true);
//! map.set_zoom(10.0);
//!
//! map.add_marker(MarkerOptions::new(Point::new(0.0, 0.0)));
//! map.add_marker(MarkerOptions::new(Point::new(0.0001, 0.0001)));
//! map.add_marker(MarkerOptions::new(Point::new(50.0, 50.0)));
//!
//! // The two nearby markers share one aggregate primitive.
//! assert_eq!(map.widget().len(), 2);
//! ```

pub mod builder;
mod cluster;
pub mod error;
pub mod grid;
pub mod map;
pub mod marker;
pub mod strategy;
pub mod types;
pub mod widget;

#[cfg(feature = "sync")]
pub mod sync;

pub use builder::ClusterMapBuilder;
pub use error::{ClusterError, Result};
pub use map::ClusterMap;
pub use marker::{LogicalMarker, MarkerId, MarkerOptions};
pub use strategy::{ClusteringStrategy, GridStrategy, MapEntity, NoClustering};
pub use types::{Config, PartitionStats, RepresentativePolicy};
pub use widget::{
    MapWidget, MarkerAppearance, MarkerIcon, MemoryWidget, WidgetMarkerId, WidgetStats,
};

#[cfg(feature = "sync")]
pub use sync::SyncClusterMap;

pub use geo::Point;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{ClusterMap, ClusterMapBuilder, Result};

    pub use crate::{Config, RepresentativePolicy};

    pub use crate::{MapEntity, MarkerId, MarkerOptions};

    pub use crate::{MapWidget, MemoryWidget, WidgetMarkerId};

    #[cfg(feature = "sync")]
    pub use crate::SyncClusterMap;

    pub use geo::Point;
}
