//! Events from several threads, serialized through `SyncClusterMap`.

use std::thread;

use geo::Point;
use geocluster::{ClusterMap, MarkerOptions, MemoryWidget, SyncClusterMap};

fn main() {
    env_logger::init();

    let mut map = ClusterMap::new(MemoryWidget::new());
    map.set_zoom(9.0);
    map.set_clustering_enabled(true);
    let map = SyncClusterMap::new(map);

    // One thread feeds marker updates, another feeds camera events.
    let feeder = {
        let map = map.clone();
        thread::spawn(move || {
            for i in 0..200 {
                let x = 13.4050 + f64::from(i % 20) * 0.01;
                let y = 52.5200 + f64::from(i / 20) * 0.01;
                map.add_marker(MarkerOptions::new(Point::new(x, y)));
            }
        })
    };
    let camera = {
        let map = map.clone();
        thread::spawn(move || {
            for step in 0..40 {
                map.set_zoom(9.0 - f64::from(step % 6));
            }
        })
    };

    feeder.join().expect("feeder thread");
    camera.join().expect("camera thread");

    map.set_zoom(9.0);
    println!(
        "{} markers in {:?}",
        map.len(),
        map.partition_stats()
    );
}
