//! K-means on a small latitude/longitude/price dataset.

use lloyd::{per_cluster_average, Kmeans};

fn main() {
    // Synthetic listings: a budget neighborhood and an expensive one.
    let listings: Vec<Vec<f64>> = vec![
        vec![40.68, -73.99, 75.0],
        vec![40.69, -73.98, 90.0],
        vec![40.70, -73.99, 110.0],
        vec![40.67, -74.00, 85.0],
        vec![40.76, -73.97, 350.0],
        vec![40.77, -73.96, 420.0],
        vec![40.78, -73.95, 390.0],
        vec![40.75, -73.98, 310.0],
    ];

    // --- K-means (k=2) ---
    let fit = Kmeans::new(2).with_seed(42).fit(&listings).unwrap();
    println!("=== K-means (k=2) ===");
    for (i, label) in fit.assignments.iter().enumerate() {
        println!(
            "  listing {:2} ({:5.2}, {:6.2}, {:6.1}) => cluster {}",
            i, listings[i][0], listings[i][1], listings[i][2], label
        );
    }

    let (first, rest) = per_cluster_average(&listings, &fit.assignments, 2).unwrap();
    println!("\naverage price: cluster 0 = {first:.1}, rest = {rest:.1}");

    // --- Cost curve over candidate k ---
    // No automatic selection here: read the elbow off the curve.
    println!("\n=== Cost by k ===");
    for k in 1..=4 {
        let fit = Kmeans::new(k).with_seed(42).fit(&listings).unwrap();
        println!(
            "  k = {} => cost {:10.2} ({} clusters survived)",
            k,
            fit.cost(&listings).unwrap(),
            fit.clusters.len()
        );
    }
}
