//! Simulates a pinch-zoom gesture: a stream of fractional camera events
//! with only occasional bucket crossings, the hot path the engine is
//! tuned for.

use geo::Point;
use geocluster::{ClusterMap, MarkerOptions, MemoryWidget};

fn main() {
    env_logger::init();

    let mut map = ClusterMap::new(MemoryWidget::new());
    map.set_zoom(12.0);
    map.set_clustering_enabled(true);

    for i in 0..500 {
        let x = -0.1278 + f64::from(i % 25) * 0.002;
        let y = 51.5074 + f64::from(i / 25) * 0.002;
        map.add_marker(MarkerOptions::new(Point::new(x, y)));
    }
    println!(
        "seeded 500 markers into {} primitives",
        map.widget().len()
    );

    // Sweep the camera from zoom 12 down to 4 and back in small steps.
    let mut zoom = 12.0;
    let mut churn = map.widget().stats().churn();
    while zoom > 4.0 {
        zoom -= 0.125;
        map.set_zoom(zoom);
        let now = map.widget().stats().churn();
        if now != churn {
            println!(
                "zoom {zoom:5.2}: repartitioned, {} primitives, {:?}",
                map.widget().len(),
                map.partition_stats()
            );
            churn = now;
        }
    }
    while zoom < 12.0 {
        zoom += 0.125;
        map.set_zoom(zoom);
    }
    println!(
        "back at zoom 12: {} primitives, {:?}",
        map.widget().len(),
        map.partition_stats()
    );
}
