//! Dense k-means clustering.
//!
//! `lloyd` is a small library for k-means clustering of dense vectors, built
//! on k-means++ seeding and Lloyd's iterative refinement.
//!
//! The primary public API is under [`cluster`], which provides:
//! - [`Kmeans`]: configuration and fitting (seeding, Lloyd iterations)
//! - [`KmeansFit`]: labels, surviving centroids, cluster membership, cost
//! - [`per_cluster_average`]: per-side feature mean for a two-way split
//!
//! ```rust
//! use lloyd::{Clustering, Kmeans};
//!
//! let data = vec![
//!     vec![0.0, 0.0],
//!     vec![0.1, 0.1],
//!     vec![10.0, 10.0],
//!     vec![10.1, 10.1],
//! ];
//!
//! let labels = Kmeans::new(2).with_seed(42).fit_predict(&data).unwrap();
//! assert_eq!(labels[0], labels[1]); // First two together
//! assert_ne!(labels[0], labels[2]); // Separate from last two
//! ```

#![forbid(unsafe_code)]

pub mod cluster;
pub mod error;

pub use cluster::{per_cluster_average, Clustering, Kmeans, KmeansFit};
pub use error::{Error, Result};
