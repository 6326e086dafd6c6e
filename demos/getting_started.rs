//! Minimal tour: add markers, toggle clustering, inspect the widget.

use geo::Point;
use geocluster::{ClusterMap, Config, MarkerIcon, MarkerOptions, MemoryWidget};

fn main() {
    env_logger::init();

    let mut map = ClusterMap::builder()
        .config(Config::default().with_max_cluster_zoom(14.0))
        .zoom(10.0)
        .clustering(true)
        .build(MemoryWidget::new())
        .expect("valid configuration");

    // A fleet around one depot, plus a stray far away.
    map.add_marker(MarkerOptions::new(Point::new(-74.0060, 40.7128)).with_title("depot"));
    map.add_marker(MarkerOptions::new(Point::new(-74.0059, 40.7127)).with_title("van 1"));
    map.add_marker(MarkerOptions::new(Point::new(-74.0058, 40.7129)).with_title("van 2"));
    map.add_marker(MarkerOptions::new(Point::new(2.3522, 48.8566)).with_title("paris office"));

    println!("zoom 10: {} primitives on the widget", map.widget().len());
    for (id, rendered) in map.widget().markers() {
        let label = match rendered.icon {
            MarkerIcon::ClusterBadge(count) => format!("cluster of {count}"),
            MarkerIcon::Default => rendered.title.clone().unwrap_or_default(),
        };
        println!("  {:?} at ({:.4}, {:.4}): {label}", id, rendered.position.x(), rendered.position.y());
    }

    // Zoom out and the stray merges in; zoom in past the ceiling and
    // everything renders individually.
    map.set_zoom(0.0);
    println!("zoom 0: {} primitives", map.widget().len());

    map.set_zoom(15.0);
    println!("zoom 15: {} primitives", map.widget().len());

    map.set_clustering_enabled(false);
    println!("clustering off: {} primitives", map.widget().len());
}
