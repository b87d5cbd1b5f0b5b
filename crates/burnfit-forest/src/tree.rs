//! CART regression trees.
//!
//! A tree is stored as a flat arena of nodes with the root at index 0. Split
//! nodes send a row left when `row[feature] <= threshold`.

use rand::{Rng, seq::index};

use crate::ForestParams;

/// Relative tolerance below which a split is not considered an improvement.
const MIN_RELATIVE_GAIN: f64 = 1e-12;

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone, Copy)]
struct Split {
    feature: usize,
    threshold: f64,
}

/// A single fitted regression tree.
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionTree {
    nodes: Vec<Node>,
}

impl RegressionTree {
    /// Grows a tree on the rows listed in `samples`.
    ///
    /// `samples` may contain repeated indices (bootstrap draws). Inputs are
    /// assumed to be validated: rectangular, finite, and one target per row.
    ///
    /// # Panics
    ///
    /// Panics if `samples` is empty or refers to rows out of range.
    pub fn fit<X, R>(
        rows: &[X],
        targets: &[f64],
        mut samples: Vec<usize>,
        params: &ForestParams,
        rng: &mut R,
    ) -> Self
    where
        X: AsRef<[f64]>,
        R: Rng + ?Sized,
    {
        assert!(!samples.is_empty(), "a tree needs at least one sample");
        let n_features = rows.first().map_or(0, |r| r.as_ref().len());
        let mut grower = Grower {
            rows,
            targets,
            params,
            n_features,
            rng,
            nodes: vec![],
        };
        grower.grow(&mut samples, 0);
        Self {
            nodes: grower.nodes,
        }
    }

    /// Predicts the target for one row.
    #[must_use]
    pub fn predict(&self, row: &[f64]) -> f64 {
        let mut id = 0;
        loop {
            match self.nodes[id] {
                Node::Leaf { value } => return value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => id = if row[feature] <= threshold { left } else { right },
            }
        }
    }

    /// Number of split levels on the longest root-to-leaf path.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth_from(0)
    }

    fn depth_from(&self, id: usize) -> usize {
        match self.nodes[id] {
            Node::Leaf { .. } => 0,
            Node::Split { left, right, .. } => {
                1 + usize::max(self.depth_from(left), self.depth_from(right))
            }
        }
    }

    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node, Node::Leaf { .. }))
            .count()
    }
}

struct Grower<'a, X, R: ?Sized> {
    rows: &'a [X],
    targets: &'a [f64],
    params: &'a ForestParams,
    n_features: usize,
    rng: &'a mut R,
    nodes: Vec<Node>,
}

impl<X, R> Grower<'_, X, R>
where
    X: AsRef<[f64]>,
    R: Rng + ?Sized,
{
    fn value(&self, sample: usize, feature: usize) -> f64 {
        self.rows[sample].as_ref()[feature]
    }

    #[expect(clippy::cast_precision_loss)]
    fn grow(&mut self, samples: &mut [usize], depth: usize) -> usize {
        let sum = samples.iter().map(|&i| self.targets[i]).sum::<f64>();
        let id = self.nodes.len();
        self.nodes.push(Node::Leaf {
            value: sum / samples.len() as f64,
        });

        if depth >= self.params.max_depth
            || samples.len() < self.params.min_samples_split
            || self.is_pure(samples)
        {
            return id;
        }
        let Some(split) = self.best_split(samples, sum) else {
            return id;
        };

        let (lower, upper): (Vec<usize>, Vec<usize>) = samples
            .iter()
            .partition(|&&i| self.value(i, split.feature) <= split.threshold);
        samples[..lower.len()].copy_from_slice(&lower);
        samples[lower.len()..].copy_from_slice(&upper);
        let (lower, upper) = samples.split_at_mut(lower.len());

        let left = self.grow(lower, depth + 1);
        let right = self.grow(upper, depth + 1);
        self.nodes[id] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        id
    }

    fn is_pure(&self, samples: &[usize]) -> bool {
        let first = self.targets[samples[0]];
        samples.iter().all(|&i| self.targets[i] == first)
    }

    /// Finds the split that minimizes the summed squared error of both children.
    ///
    /// Features are visited in a random order until `max_features` of them
    /// have been searched. A feature that is constant over `samples` does not
    /// count toward that budget, so the node becomes a leaf only when no
    /// non-constant feature is left to draw.
    ///
    /// Minimizing child SSE is equivalent to maximizing
    /// `sum_l² / n_l + sum_r² / n_r`, which only needs running sums.
    #[expect(clippy::cast_precision_loss)]
    fn best_split(&mut self, samples: &[usize], total: f64) -> Option<Split> {
        let n = samples.len();
        let min_leaf = self.params.min_samples_leaf;
        let parent_score = total * total / n as f64;
        let mut best_score = parent_score + parent_score.abs() * MIN_RELATIVE_GAIN;
        let mut best = None;

        let budget = self.params.max_features.min(self.n_features);
        let features = index::sample(&mut *self.rng, self.n_features, self.n_features);

        let mut order = samples.to_vec();
        let mut searched = 0;
        for feature in features {
            if searched >= budget {
                break;
            }
            order.sort_by(|&a, &b| self.value(a, feature).total_cmp(&self.value(b, feature)));
            if self.value(order[0], feature) >= self.value(order[n - 1], feature) {
                continue;
            }
            searched += 1;
            let mut lower_sum = 0.0;
            for pos in 1..n {
                lower_sum += self.targets[order[pos - 1]];
                if pos < min_leaf || n - pos < min_leaf {
                    continue;
                }
                let lo = self.value(order[pos - 1], feature);
                let hi = self.value(order[pos], feature);
                if lo >= hi {
                    continue;
                }
                let upper_sum = total - lower_sum;
                let score =
                    lower_sum * lower_sum / pos as f64 + upper_sum * upper_sum / (n - pos) as f64;
                if score > best_score {
                    best_score = score;
                    best = Some(Split {
                        feature,
                        threshold: threshold_between(lo, hi),
                    });
                }
            }
        }
        best
    }
}

/// A threshold `t` with `lo <= t < hi`, as close to the midpoint as possible.
fn threshold_between(lo: f64, hi: f64) -> f64 {
    let mid = f64::midpoint(lo, hi);
    if mid < hi { mid } else { lo }
}
