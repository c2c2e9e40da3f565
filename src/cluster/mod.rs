//! Clustering algorithms for grouping similar points.
//!
//! This module provides hard clustering (one label per point) for dense
//! vectors.
//!
//! ## K-means
//!
//! The classic algorithm: assign each point to the nearest centroid, then
//! update centroids to the mean of their points. Repeat until the labels
//! stop changing.
//!
//! **Objective**: Minimize within-cluster sum of squares:
//!
//! ```text
//! J = Σ_k Σ_{x ∈ C_k} ||x - μ_k||²
//! ```
//!
//! **Assumptions**:
//! - Clusters are roughly spherical
//! - Clusters have similar sizes
//! - You know k in advance
//!
//! Centroids are seeded with a k-means++ style draw and refined with Lloyd
//! iterations; see [`Kmeans`] for the exact seeding rule and for how empty
//! clusters are handled.
//!
//! ## Usage
//!
//! ```rust
//! use lloyd::cluster::{per_cluster_average, Kmeans};
//!
//! // latitude, longitude, nightly price
//! let listings = vec![
//!     vec![40.70, -74.01, 120.0],
//!     vec![40.71, -74.00, 150.0],
//!     vec![40.80, -73.95, 420.0],
//!     vec![40.81, -73.94, 390.0],
//! ];
//!
//! let fit = Kmeans::new(2).with_seed(42).fit(&listings).unwrap();
//! assert_eq!(fit.assignments.len(), listings.len());
//!
//! // Average price on each side of the two-way split.
//! let (a, b) = per_cluster_average(&listings, &fit.assignments, 2).unwrap();
//! assert!(a > 0.0 && b > 0.0);
//! ```

mod kmeans;
mod traits;
mod util;

pub use kmeans::{per_cluster_average, Kmeans, KmeansFit};
pub use traits::Clustering;
