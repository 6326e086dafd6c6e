//! Logical markers: application-level point entities independent of
//! their on-screen representation.

use bytes::Bytes;
use geo::Point;

/// Identifier of a logical marker, assigned by the host map.
///
/// Ids are handed out monotonically, so ascending id order is insertion
/// order; the partition iterates markers in id order to keep rebuilds
/// deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId(pub u64);

impl std::fmt::Display for MarkerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "marker:{}", self.0)
    }
}

/// Attributes for a new logical marker.
///
/// # Example
///
/// ```rust
/// use geocluster::MarkerOptions;
/// use geo::Point;
///
/// let options = MarkerOptions::new(Point::new(-74.0060, 40.7128))
///     .with_title("NYC")
///     .with_z_index(2.0);
/// ```
#[derive(Debug, Clone)]
pub struct MarkerOptions {
    pub position: Point<f64>,
    pub visible: bool,
    pub z_index: f32,
    pub title: Option<String>,
    pub payload: Bytes,
}

impl MarkerOptions {
    /// Options for a visible, untitled marker at `position`.
    pub fn new(position: Point<f64>) -> Self {
        Self {
            position,
            visible: true,
            z_index: 0.0,
            title: None,
            payload: Bytes::new(),
        }
    }

    /// Request the marker hidden from the start.
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn with_z_index(mut self, z_index: f32) -> Self {
        self.z_index = z_index;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Attach an opaque application payload. The engine never inspects
    /// it or forwards it to the widget.
    pub fn with_payload(mut self, payload: impl Into<Bytes>) -> Self {
        self.payload = payload.into();
        self
    }
}

/// An application-level point marker tracked by the host.
///
/// The host owns the logical marker for its whole lifetime; clustering
/// only ever creates and destroys its on-screen representation.
#[derive(Debug, Clone)]
pub struct LogicalMarker {
    id: MarkerId,
    position: Point<f64>,
    visible: bool,
    z_index: f32,
    title: Option<String>,
    payload: Bytes,
}

impl LogicalMarker {
    pub(crate) fn new(id: MarkerId, options: MarkerOptions) -> Self {
        Self {
            id,
            position: options.position,
            visible: options.visible,
            z_index: options.z_index,
            title: options.title,
            payload: options.payload,
        }
    }

    pub fn id(&self) -> MarkerId {
        self.id
    }

    pub fn position(&self) -> Point<f64> {
        self.position
    }

    /// The visibility the application has requested for this marker.
    /// While the marker is clustered its shared representation may be
    /// visible even when this is `false`.
    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn z_index(&self) -> f32 {
        self.z_index
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    pub(crate) fn set_position(&mut self, position: Point<f64>) {
        self.position = position;
    }

    pub(crate) fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_defaults() {
        let options = MarkerOptions::new(Point::new(1.0, 2.0));
        assert!(options.visible);
        assert_eq!(options.z_index, 0.0);
        assert!(options.title.is_none());
        assert!(options.payload.is_empty());
    }

    #[test]
    fn test_options_builders() {
        let options = MarkerOptions::new(Point::new(0.0, 0.0))
            .hidden()
            .with_title("depot")
            .with_z_index(3.0)
            .with_payload(&b"route-7"[..]);
        assert!(!options.visible);
        assert_eq!(options.title.as_deref(), Some("depot"));
        assert_eq!(options.z_index, 3.0);
        assert_eq!(options.payload.as_ref(), b"route-7");
    }

    #[test]
    fn test_marker_id_ordering_is_insertion_order() {
        assert!(MarkerId(1) < MarkerId(2));
        assert_eq!(MarkerId(7).to_string(), "marker:7");
    }
}
