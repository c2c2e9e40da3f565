//! K-means clustering.
//!
//! Partitions points into k clusters by minimizing **within-cluster sum of
//! squares** (WCSS), the foundational clustering objective (Lloyd, 1957):
//!
//! ```text
//! J = Σ_k Σ_{x ∈ C_k} ||x - μ_k||²
//! ```
//!
//! # Lloyd's Algorithm
//!
//! 1. Seed k centroids (k-means++ here)
//! 2. **Assign**: each point → nearest centroid
//! 3. **Update**: each centroid → mean of its assigned points
//! 4. Repeat until the assignment vector stops changing
//!
//! **Why it converges**: WCSS is non-increasing across rounds and there are
//! finitely many assignment vectors. The stopping test is exact equality of
//! successive assignment vectors, so an iteration cap backs it up in case
//! floating-point noise ever makes the assignments oscillate.
//!
//! # Seeding
//!
//! The first centroid is drawn uniformly from the input. Each following
//! centroid is drawn with probability proportional to the squared distance
//! to the *previously chosen* centroid. Textbook k-means++ weights by the
//! distance to the nearest of all chosen centroids; weighting against only
//! the last pick spreads consecutive centroids apart and is kept here as
//! this crate's seeding rule. Draws are with replacement, so a point can be
//! picked as a centroid twice.
//!
//! # Empty clusters
//!
//! A centroid that finishes an update round with no members is dropped, not
//! reseeded. Later rounds route points to the surviving centroids only, so
//! a fit can end with fewer than k clusters.

use std::collections::HashMap;

use rand::prelude::*;

use super::traits::Clustering;
use super::util::{centroid, euclidean, squared_euclidean};
use crate::error::{Error, Result};

/// K-means clustering algorithm.
#[derive(Debug, Clone)]
pub struct Kmeans {
    /// Number of clusters to seed.
    k: usize,
    /// Maximum Lloyd iterations before giving up.
    max_iter: usize,
    /// Random seed.
    seed: Option<u64>,
}

/// Result of a k-means fit.
#[derive(Debug, Clone)]
pub struct KmeansFit {
    /// Final cluster label per input point.
    pub assignments: Vec<usize>,
    /// Surviving centroids; `centroids[label]` is the centroid of the points
    /// in `clusters[&label]`.
    pub centroids: Vec<Vec<f64>>,
    /// Cluster members: `label -> point indices`. Labels with no members are
    /// absent, so there can be fewer entries than the k that was requested.
    pub clusters: HashMap<usize, Vec<usize>>,
    /// Lloyd rounds run until the assignments stabilized.
    pub iterations: usize,
}

impl KmeansFit {
    /// Total within-cluster sum of squared distances.
    ///
    /// Each cluster's centroid is recomputed fresh from its members, so the
    /// value reflects the clustering itself rather than any intermediate
    /// state of the fit. `data` must be the point set the fit was made on.
    pub fn cost(&self, data: &[Vec<f64>]) -> Result<f64> {
        if data.len() != self.assignments.len() {
            return Err(Error::LengthMismatch {
                points: data.len(),
                assignments: self.assignments.len(),
            });
        }

        let mut total = 0.0;
        for members in self.clusters.values() {
            let center = centroid(data, members)?;
            total += members
                .iter()
                .map(|&i| squared_euclidean(&data[i], &center))
                .sum::<f64>();
        }
        Ok(total)
    }
}

impl Kmeans {
    /// Create a new k-means clusterer searching for `k` clusters.
    ///
    /// Defaults: `max_iter = 100`, entropy-derived seed.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_iter: 100,
            seed: None,
        }
    }

    /// Set the maximum number of Lloyd iterations.
    ///
    /// Exceeding the cap without the assignments stabilizing fails the fit
    /// with [`Error::NonConvergence`].
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set the random seed used by k-means++ seeding.
    ///
    /// With a seed set, repeated fits on the same input produce identical
    /// results.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Seed centroids, run Lloyd iterations, and return the full fit.
    ///
    /// Validates the input up front: the point set must be nonempty and
    /// rectangular, and `k` must lie in `[1, n]`. No partial work is done
    /// when validation fails.
    pub fn fit(&self, data: &[Vec<f64>]) -> Result<KmeansFit> {
        let n = data.len();
        if n == 0 {
            return Err(Error::EmptyInput);
        }

        let dim = data[0].len();
        if dim == 0 {
            return Err(Error::InvalidParameter {
                name: "dimension",
                message: "must be at least 1",
            });
        }
        for point in data.iter().skip(1) {
            if point.len() != dim {
                return Err(Error::DimensionMismatch {
                    expected: dim,
                    found: point.len(),
                });
            }
        }

        if self.k == 0 || self.k > n {
            return Err(Error::InvalidClusterCount {
                requested: self.k,
                n_items: n,
            });
        }
        if self.max_iter == 0 {
            return Err(Error::InvalidParameter {
                name: "max_iter",
                message: "must be at least 1",
            });
        }

        let mut rng: Box<dyn RngCore> = match self.seed {
            Some(s) => Box::new(StdRng::seed_from_u64(s)),
            None => Box::new(rand::rng()),
        };

        let centers = seed_centers(data, self.k, &mut rng);
        self.lloyd(data, centers)
    }

    /// Alternate assignment and centroid updates until the assignment vector
    /// repeats exactly.
    fn lloyd(&self, data: &[Vec<f64>], mut centers: Vec<Vec<f64>>) -> Result<KmeansFit> {
        let mut assignments = assign(data, &centers);

        for iteration in 1..=self.max_iter {
            centers = update_centers(data, &assignments)?;
            let next = assign(data, &centers);

            if next == assignments {
                let clusters = group_members(&assignments);
                return Ok(KmeansFit {
                    assignments,
                    centroids: centers,
                    clusters,
                    iterations: iteration,
                });
            }
            assignments = next;
        }

        Err(Error::NonConvergence {
            max_iter: self.max_iter,
        })
    }
}

impl Clustering for Kmeans {
    fn fit_predict(&self, data: &[Vec<f64>]) -> Result<Vec<usize>> {
        Ok(self.fit(data)?.assignments)
    }

    fn n_clusters(&self) -> usize {
        self.k
    }
}

/// Pick `k` initial centroids with k-means++ style weighting.
///
/// Weights for each draw are squared distances to the centroid chosen in the
/// round before. If every weight is zero (all points coincide with the last
/// centroid) the draw falls back to uniform.
fn seed_centers(data: &[Vec<f64>], k: usize, rng: &mut impl Rng) -> Vec<Vec<f64>> {
    let mut centers: Vec<Vec<f64>> = Vec::with_capacity(k);

    let first = rng.random_range(0..data.len());
    centers.push(data[first].clone());

    while centers.len() < k {
        let last = &centers[centers.len() - 1];
        let weights: Vec<f64> = data.iter().map(|p| squared_euclidean(p, last)).collect();
        let total: f64 = weights.iter().sum();

        let next = if total > 0.0 {
            weighted_pick(&weights, total, rng)
        } else {
            rng.random_range(0..data.len())
        };
        centers.push(data[next].clone());
    }

    centers
}

/// Draw an index with probability proportional to its weight.
fn weighted_pick(weights: &[f64], total: f64, rng: &mut impl Rng) -> usize {
    let threshold = rng.random::<f64>() * total;
    let mut cumulative = 0.0;

    for (idx, w) in weights.iter().enumerate() {
        cumulative += w;
        if cumulative >= threshold {
            return idx;
        }
    }
    // Round-off can leave the cumulative sum a hair under the threshold.
    weights.len() - 1
}

/// Label each point with the index of its nearest center.
///
/// Ties go to the lowest center index: the comparison is strict, so a later
/// center at exactly the same distance never displaces an earlier one.
fn assign(data: &[Vec<f64>], centers: &[Vec<f64>]) -> Vec<usize> {
    data.iter()
        .map(|point| {
            let mut best = 0;
            let mut best_dist = f64::INFINITY;
            for (idx, center) in centers.iter().enumerate() {
                let dist = euclidean(point, center);
                if dist < best_dist {
                    best_dist = dist;
                    best = idx;
                }
            }
            best
        })
        .collect()
}

/// Recompute one centroid per nonempty cluster.
///
/// Buckets are sized to the highest label present. Labels with no members
/// produce no centroid, so the returned set can be smaller than the label
/// range; the next assignment round then only sees the survivors.
fn update_centers(data: &[Vec<f64>], assignments: &[usize]) -> Result<Vec<Vec<f64>>> {
    let buckets = assignments.iter().max().map_or(0, |&m| m + 1);

    let mut members: Vec<Vec<usize>> = vec![Vec::new(); buckets];
    for (idx, &label) in assignments.iter().enumerate() {
        members[label].push(idx);
    }

    let mut centers = Vec::with_capacity(buckets);
    for bucket in &members {
        if !bucket.is_empty() {
            centers.push(centroid(data, bucket)?);
        }
    }
    Ok(centers)
}

/// Group point indices by their final label, in one pass.
fn group_members(assignments: &[usize]) -> HashMap<usize, Vec<usize>> {
    let mut clusters: HashMap<usize, Vec<usize>> = HashMap::new();
    for (idx, &label) in assignments.iter().enumerate() {
        clusters.entry(label).or_default().push(idx);
    }
    clusters
}

/// Mean of one feature dimension on each side of a two-way split.
///
/// Points labeled `0` form the first group and every other label forms the
/// second, matching a `k = 2` fit. Returns `(mean_first, mean_second)`.
pub fn per_cluster_average(
    data: &[Vec<f64>],
    assignments: &[usize],
    feature_index: usize,
) -> Result<(f64, f64)> {
    if data.len() != assignments.len() {
        return Err(Error::LengthMismatch {
            points: data.len(),
            assignments: assignments.len(),
        });
    }
    if data.is_empty() {
        return Err(Error::EmptyInput);
    }
    if data.iter().any(|p| feature_index >= p.len()) {
        return Err(Error::InvalidParameter {
            name: "feature_index",
            message: "out of bounds for the given points",
        });
    }

    let (mut sum0, mut count0) = (0.0, 0usize);
    let (mut sum1, mut count1) = (0.0, 0usize);
    for (point, &label) in data.iter().zip(assignments) {
        if label == 0 {
            sum0 += point[feature_index];
            count0 += 1;
        } else {
            sum1 += point[feature_index];
            count1 += 1;
        }
    }

    if count0 == 0 {
        return Err(Error::EmptyCluster { cluster: 0 });
    }
    if count1 == 0 {
        return Err(Error::EmptyCluster { cluster: 1 });
    }
    Ok((sum0 / count0 as f64, sum1 / count1 as f64))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_blob_data() -> Vec<Vec<f64>> {
        vec![
            vec![0.0, 0.0],
            vec![0.1, 0.1],
            vec![10.0, 10.0],
            vec![10.1, 10.1],
        ]
    }

    #[test]
    fn test_kmeans_basic() {
        let data = two_blob_data();

        let kmeans = Kmeans::new(2).with_seed(42);
        let fit = kmeans.fit(&data).unwrap();

        // Points 0,1 should share a cluster, points 2,3 another.
        assert_eq!(fit.assignments[0], fit.assignments[1]);
        assert_eq!(fit.assignments[2], fit.assignments[3]);
        assert_ne!(fit.assignments[0], fit.assignments[2]);
        assert!(fit.iterations >= 1);
    }

    #[test]
    fn test_kmeans_partition() {
        // Every point lands in exactly one cluster.
        let data: Vec<Vec<f64>> = (0..50)
            .map(|i| vec![f64::from(i) * 0.1, f64::from(i % 5)])
            .collect();

        let fit = Kmeans::new(5).with_seed(123).fit(&data).unwrap();
        assert_eq!(fit.assignments.len(), data.len());

        let mut seen: Vec<usize> = fit.clusters.values().flatten().copied().collect();
        seen.sort_unstable();
        let expected: Vec<usize> = (0..data.len()).collect();
        assert_eq!(seen, expected);

        for (label, members) in &fit.clusters {
            for &idx in members {
                assert_eq!(fit.assignments[idx], *label);
            }
        }
    }

    #[test]
    fn test_kmeans_clusters_match_centroids() {
        let data = two_blob_data();
        let fit = Kmeans::new(2).with_seed(7).fit(&data).unwrap();

        assert_eq!(fit.centroids.len(), fit.clusters.len());
        for (label, members) in &fit.clusters {
            let expected = centroid(&data, members).unwrap();
            assert_eq!(fit.centroids[*label], expected);
        }
    }

    #[test]
    fn test_kmeans_two_points_two_clusters() {
        // k = n: each point becomes its own cluster.
        let data = vec![vec![0.0, 0.0], vec![5.0, 5.0]];

        let fit = Kmeans::new(2).with_seed(42).fit(&data).unwrap();
        assert_eq!(fit.clusters.len(), 2);
        assert_ne!(fit.assignments[0], fit.assignments[1]);
    }

    #[test]
    fn test_kmeans_single_cluster_cost() {
        // k = 1: centroid is the mean, cost is the spread around it.
        let data = vec![vec![0.0, 0.0], vec![2.0, 0.0], vec![4.0, 0.0]];

        let fit = Kmeans::new(1).with_seed(0).fit(&data).unwrap();
        assert!(fit.assignments.iter().all(|&l| l == 0));
        assert_eq!(fit.centroids[0], vec![2.0, 0.0]);
        assert_eq!(fit.cost(&data).unwrap(), 8.0);
    }

    #[test]
    fn test_kmeans_identical_points_collapse() {
        // Seeding draws the same point twice, ties assign everything to the
        // first center, and the empty duplicate is dropped.
        let data = vec![vec![3.0, 3.0]; 4];

        let fit = Kmeans::new(2).with_seed(9).fit(&data).unwrap();
        assert!(fit.assignments.iter().all(|&l| l == 0));
        assert_eq!(fit.clusters.len(), 1);
        assert_eq!(fit.centroids.len(), 1);
        assert_eq!(fit.cost(&data).unwrap(), 0.0);
    }

    #[test]
    fn test_kmeans_deterministic_with_seed() {
        let data = two_blob_data();

        let fit1 = Kmeans::new(2).with_seed(42).fit(&data).unwrap();
        let fit2 = Kmeans::new(2).with_seed(42).fit(&data).unwrap();

        assert_eq!(fit1.assignments, fit2.assignments, "same seed, same fit");
        assert_eq!(fit1.centroids, fit2.centroids);
        assert_eq!(fit1.iterations, fit2.iterations);
    }

    #[test]
    fn test_kmeans_cost_drops_with_second_cluster() {
        let data = two_blob_data();

        let fit1 = Kmeans::new(1).with_seed(42).fit(&data).unwrap();
        let fit2 = Kmeans::new(2).with_seed(42).fit(&data).unwrap();

        let cost1 = fit1.cost(&data).unwrap();
        let cost2 = fit2.cost(&data).unwrap();
        assert!(cost1 >= 0.0 && cost2 >= 0.0);
        assert!(cost2 < cost1, "splitting the blobs must shed cost");
    }

    #[test]
    fn test_kmeans_empty_input_error() {
        let data: Vec<Vec<f64>> = vec![];
        let result = Kmeans::new(2).fit(&data);
        assert!(matches!(result, Err(Error::EmptyInput)));
    }

    #[test]
    fn test_kmeans_k_zero_error() {
        let data = vec![vec![0.0, 0.0], vec![1.0, 1.0]];
        let result = Kmeans::new(0).fit(&data);
        assert!(matches!(
            result,
            Err(Error::InvalidClusterCount {
                requested: 0,
                n_items: 2
            })
        ));
    }

    #[test]
    fn test_kmeans_k_larger_than_n_error() {
        let data = vec![vec![0.0, 0.0], vec![1.0, 1.0]];
        let result = Kmeans::new(5).fit(&data);
        assert!(matches!(
            result,
            Err(Error::InvalidClusterCount {
                requested: 5,
                n_items: 2
            })
        ));
    }

    #[test]
    fn test_kmeans_dimension_mismatch_error() {
        let data = vec![vec![0.0, 0.0], vec![1.0, 1.0, 1.0]];
        let result = Kmeans::new(1).fit(&data);
        assert!(matches!(
            result,
            Err(Error::DimensionMismatch {
                expected: 2,
                found: 3
            })
        ));
    }

    #[test]
    fn test_kmeans_zero_max_iter_error() {
        let data = vec![vec![0.0, 0.0], vec![1.0, 1.0]];
        let result = Kmeans::new(1).with_max_iter(0).fit(&data);
        assert!(matches!(result, Err(Error::InvalidParameter { .. })));
    }

    #[test]
    fn test_kmeans_fit_predict_matches_fit() {
        let data = two_blob_data();
        let kmeans = Kmeans::new(2).with_seed(42);

        let fit = kmeans.fit(&data).unwrap();
        let labels = kmeans.fit_predict(&data).unwrap();
        assert_eq!(labels, fit.assignments);
        assert_eq!(kmeans.n_clusters(), 2);
    }

    #[test]
    fn test_assign_picks_nearest_center() {
        let data = vec![vec![0.0, 0.0], vec![9.0, 9.0], vec![1.0, 1.0]];
        let centers = vec![vec![0.5, 0.5], vec![10.0, 10.0]];
        assert_eq!(assign(&data, &centers), vec![0, 1, 0]);
    }

    #[test]
    fn test_assign_tie_breaks_to_low_index() {
        // Point exactly midway between two centers.
        let data = vec![vec![1.0, 0.0, 0.0]];
        let centers = vec![vec![0.0, 0.0, 0.0], vec![2.0, 0.0, 0.0]];
        assert_eq!(assign(&data, &centers), vec![0]);
    }

    #[test]
    fn test_update_centers_means_single_bucket() {
        let data = vec![vec![0.0, 0.0, 0.0], vec![2.0, 0.0, 0.0]];
        let centers = update_centers(&data, &[0, 0]).unwrap();
        assert_eq!(centers, vec![vec![1.0, 0.0, 0.0]]);
    }

    #[test]
    fn test_update_centers_drops_empty_bucket() {
        // Label 1 has no members; only two centroids come back.
        let data = vec![vec![0.0, 0.0], vec![4.0, 0.0], vec![6.0, 0.0]];
        let centers = update_centers(&data, &[0, 2, 2]).unwrap();
        assert_eq!(centers, vec![vec![0.0, 0.0], vec![5.0, 0.0]]);
    }

    #[test]
    fn test_per_cluster_average_binary_split() {
        let data = vec![
            vec![0.0, 0.0, 10.0],
            vec![0.0, 0.0, 20.0],
            vec![0.0, 0.0, 100.0],
        ];
        let averages = per_cluster_average(&data, &[0, 0, 1], 2).unwrap();
        assert_eq!(averages, (15.0, 100.0));
    }

    #[test]
    fn test_per_cluster_average_length_mismatch_error() {
        let data = vec![vec![0.0, 0.0], vec![1.0, 1.0]];
        let result = per_cluster_average(&data, &[0], 0);
        assert!(matches!(
            result,
            Err(Error::LengthMismatch {
                points: 2,
                assignments: 1
            })
        ));
    }

    #[test]
    fn test_per_cluster_average_empty_side_errors() {
        let data = vec![vec![0.0, 10.0], vec![0.0, 20.0]];

        let all_first = per_cluster_average(&data, &[0, 0], 1);
        assert!(matches!(all_first, Err(Error::EmptyCluster { cluster: 1 })));

        let all_second = per_cluster_average(&data, &[1, 1], 1);
        assert!(matches!(all_second, Err(Error::EmptyCluster { cluster: 0 })));
    }

    #[test]
    fn test_per_cluster_average_feature_out_of_bounds() {
        let data = vec![vec![0.0, 10.0], vec![0.0, 20.0]];
        let result = per_cluster_average(&data, &[0, 1], 2);
        assert!(matches!(result, Err(Error::InvalidParameter { .. })));
    }

    #[test]
    fn test_cost_length_mismatch_error() {
        let data = two_blob_data();
        let fit = Kmeans::new(2).with_seed(42).fit(&data).unwrap();
        let result = fit.cost(&data[..3]);
        assert!(matches!(result, Err(Error::LengthMismatch { .. })));
    }
}
