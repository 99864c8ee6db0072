//! Isolation Forest over frame feature pairs.
//!
//! From-scratch implementation of the randomized partitioning ensemble:
//! anomalies sit in sparse regions of the (timestamp, length) feature space
//! and are isolated by fewer random splits, giving them shorter average path
//! lengths and scores approaching 1.
//!
//! All randomness is drawn from an injected generator so a fixed seed
//! reproduces the forest exactly.
//!
//! # References
//!
//! Liu, F. T., Ting, K. M., & Zhou, Z. H. (2008). Isolation forest.
//! In 2008 Eighth IEEE International Conference on Data Mining (pp. 413-422).

use rand::seq::SliceRandom;
use rand::Rng;

/// Feature vector per frame: (timestamp, length).
pub type FeaturePoint = [f64; 2];

const NUM_FEATURES: usize = 2;

/// A node in an isolation tree.
#[derive(Debug, Clone)]
enum IsolationNode {
    Internal {
        feature_idx: usize,
        threshold: f64,
        left: Box<IsolationNode>,
        right: Box<IsolationNode>,
    },
    /// Leaf recording how many sub-sample points it absorbed.
    Leaf { size: usize },
}

impl IsolationNode {
    /// Edges traversed to reach the leaf, plus the expected residual depth
    /// `c(leaf_size)` had splitting continued.
    fn path_length(&self, point: &FeaturePoint, current_depth: usize) -> f64 {
        match self {
            IsolationNode::Internal {
                feature_idx,
                threshold,
                left,
                right,
            } => {
                if point[*feature_idx] < *threshold {
                    left.path_length(point, current_depth + 1)
                } else {
                    right.path_length(point, current_depth + 1)
                }
            }
            IsolationNode::Leaf { size } => current_depth as f64 + average_path_length(*size),
        }
    }
}

/// Expected path length of an unsuccessful BST search over n points:
/// `c(n) = 2*(ln(n-1) + gamma) - 2*(n-1)/n` for n > 1, else 0.
fn average_path_length(n: usize) -> f64 {
    if n <= 1 {
        return 0.0;
    }
    const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;
    2.0 * (((n - 1) as f64).ln() + EULER_GAMMA) - 2.0 * (n - 1) as f64 / n as f64
}

/// Single isolation tree.
#[derive(Debug, Clone)]
pub struct IsolationTree {
    root: IsolationNode,
}

impl IsolationTree {
    fn build<R: Rng>(points: &[FeaturePoint], max_depth: usize, rng: &mut R) -> Self {
        let root = Self::build_node(points, 0, max_depth, rng);
        IsolationTree { root }
    }

    fn build_node<R: Rng>(
        points: &[FeaturePoint],
        depth: usize,
        max_depth: usize,
        rng: &mut R,
    ) -> IsolationNode {
        if points.is_empty() {
            return IsolationNode::Leaf { size: 0 };
        }
        if depth >= max_depth || points.len() <= 1 {
            return IsolationNode::Leaf { size: points.len() };
        }
        // All points identical: nothing left to split.
        if points.windows(2).all(|w| w[0] == w[1]) {
            return IsolationNode::Leaf { size: points.len() };
        }

        let feature_idx = rng.gen_range(0..NUM_FEATURES);

        let mut min_val = f64::MAX;
        let mut max_val = f64::MIN;
        for point in points {
            let val = point[feature_idx];
            min_val = min_val.min(val);
            max_val = max_val.max(val);
        }

        // Degenerate feature at this node: fall back to a leaf.
        if (max_val - min_val).abs() < f64::EPSILON {
            return IsolationNode::Leaf { size: points.len() };
        }

        let threshold = rng.gen_range(min_val..max_val);

        let (left_points, right_points): (Vec<FeaturePoint>, Vec<FeaturePoint>) = points
            .iter()
            .copied()
            .partition(|point| point[feature_idx] < threshold);

        if left_points.is_empty() || right_points.is_empty() {
            return IsolationNode::Leaf { size: points.len() };
        }

        let left = Box::new(Self::build_node(&left_points, depth + 1, max_depth, rng));
        let right = Box::new(Self::build_node(&right_points, depth + 1, max_depth, rng));

        IsolationNode::Internal {
            feature_idx,
            threshold,
            left,
            right,
        }
    }

    fn path_length(&self, point: &FeaturePoint) -> f64 {
        self.root.path_length(point, 0)
    }
}

/// Ensemble of isolation trees.
#[derive(Debug, Clone)]
pub struct IsolationForest {
    trees: Vec<IsolationTree>,
    subsample_size: usize,
}

impl IsolationForest {
    /// Build `num_trees` trees, each over an independent uniform sub-sample
    /// of `subsample_size` points drawn without replacement (clamped to the
    /// dataset size). Tree depth is capped at `ceil(log2(subsample_size))`.
    pub fn fit<R: Rng>(
        points: &[FeaturePoint],
        num_trees: usize,
        subsample_size: usize,
        rng: &mut R,
    ) -> Self {
        if points.is_empty() {
            return IsolationForest {
                trees: Vec::new(),
                subsample_size: 0,
            };
        }

        let sample_size = subsample_size.min(points.len()).max(1);
        let max_depth = (sample_size as f64).log2().ceil() as usize;

        let mut trees = Vec::with_capacity(num_trees);
        let mut indices: Vec<usize> = (0..points.len()).collect();
        for _ in 0..num_trees {
            indices.shuffle(rng);
            let subsample: Vec<FeaturePoint> =
                indices[..sample_size].iter().map(|&i| points[i]).collect();
            trees.push(IsolationTree::build(&subsample, max_depth, rng));
        }

        IsolationForest {
            trees,
            subsample_size: sample_size,
        }
    }

    /// Anomaly score in [0, 1]: `2^(-E[path] / c(psi))`. Near 1 for isolated
    /// points, below 0.5 for deeply embedded ones.
    pub fn anomaly_score(&self, point: &FeaturePoint) -> f64 {
        if self.trees.is_empty() {
            return 0.0;
        }

        let avg_path_length: f64 = self
            .trees
            .iter()
            .map(|tree| tree.path_length(point))
            .sum::<f64>()
            / self.trees.len() as f64;

        let c = average_path_length(self.subsample_size);
        if c <= 0.0 {
            // psi <= 1, every point looks identical to the forest
            return 0.0;
        }
        2_f64.powf(-avg_path_length / c)
    }

    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn subsample_size(&self) -> usize {
        self.subsample_size
    }
}
