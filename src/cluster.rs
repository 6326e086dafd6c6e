//! Cluster rendering records.

use geo::Point;

use crate::types::RepresentativePolicy;
use crate::widget::WidgetMarkerId;

/// Rendering record of one occupied cell.
///
/// Membership lives in the cell index; the cluster tracks what the
/// widget currently shows for it. The anchor is fixed when the
/// representation is created and held until it is recreated, so adds and
/// removes do not make the marker wander.
#[derive(Debug, Clone)]
pub(crate) struct Cluster {
    /// Cached representative position the widget marker sits at.
    pub anchor: Point<f64>,
    /// The single underlying-widget marker rendering this cluster.
    pub widget: WidgetMarkerId,
    /// Visibility last pushed to the widget.
    pub shown: bool,
}

/// Representative position for `positions` under `policy`.
///
/// Callers pass member positions in insertion order; the iterator is
/// never empty for a live cluster.
pub(crate) fn representative<I>(policy: RepresentativePolicy, mut positions: I) -> Point<f64>
where
    I: Iterator<Item = Point<f64>>,
{
    match policy {
        RepresentativePolicy::FirstMember => {
            positions.next().unwrap_or_else(|| Point::new(0.0, 0.0))
        }
        RepresentativePolicy::Centroid => {
            let (mut x, mut y, mut n) = (0.0, 0.0, 0usize);
            for p in positions {
                x += p.x();
                y += p.y();
                n += 1;
            }
            if n == 0 {
                Point::new(0.0, 0.0)
            } else {
                Point::new(x / n as f64, y / n as f64)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_member_representative() {
        let positions = [Point::new(1.0, 2.0), Point::new(9.0, 9.0)];
        let anchor = representative(RepresentativePolicy::FirstMember, positions.into_iter());
        assert_eq!(anchor, Point::new(1.0, 2.0));
    }

    #[test]
    fn test_centroid_representative() {
        let positions = [Point::new(0.0, 0.0), Point::new(2.0, 4.0)];
        let anchor = representative(RepresentativePolicy::Centroid, positions.into_iter());
        assert_eq!(anchor, Point::new(1.0, 2.0));
    }
}
