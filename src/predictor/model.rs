// src/predictor/model.rs
use serde::Deserialize;

use crate::predictor::error::ModelInferenceError;

/// Anything that turns one feature row into one log-scale rent.
pub trait Regressor: Send + Sync {
    /// Number of features the model consumes.
    fn n_features(&self) -> usize;

    fn predict(&self, features: &[f64]) -> Result<f64, ModelInferenceError>;
}

/// On-disk model description, resolved against the feature columns at load.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    Linear {
        intercept: f64,
        coefficients: Vec<f64>,
    },
    TreeEnsemble {
        #[serde(default)]
        base_score: f64,
        #[serde(default)]
        aggregation: Aggregation,
        trees: Vec<RegressionTree>,
    },
    /// Returns one named feature unchanged.
    Passthrough { feature: String },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    /// Boosted trees: outputs are added to the base score.
    #[default]
    Sum,
    /// Forests: outputs are averaged, then added to the base score.
    Mean,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegressionTree {
    pub nodes: Vec<TreeNode>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
        #[serde(default)]
        missing_left: bool,
    },
    Leaf {
        value: f64,
    },
}

impl ModelArtifact {
    /// Validates the model against the ordered feature columns.
    pub fn resolve(self, feature_columns: &[String]) -> Result<Model, String> {
        let width = feature_columns.len();

        match self {
            ModelArtifact::Linear {
                intercept,
                coefficients,
            } => {
                if coefficients.len() != width {
                    return Err(format!(
                        "linear model has {} coefficients for {width} feature columns",
                        coefficients.len()
                    ));
                }
                Ok(Model::Linear {
                    intercept,
                    coefficients,
                })
            }
            ModelArtifact::TreeEnsemble {
                base_score,
                aggregation,
                trees,
            } => {
                if trees.is_empty() {
                    return Err("tree ensemble has no trees".into());
                }
                for (t, tree) in trees.iter().enumerate() {
                    tree.check(width).map_err(|e| format!("tree {t}: {e}"))?;
                }
                Ok(Model::TreeEnsemble {
                    base_score,
                    aggregation,
                    trees,
                    width,
                })
            }
            ModelArtifact::Passthrough { feature } => {
                let index = feature_columns
                    .iter()
                    .position(|c| *c == feature)
                    .ok_or_else(|| format!("passthrough feature `{feature}` is not a feature column"))?;
                Ok(Model::Passthrough { index, width })
            }
        }
    }
}

impl RegressionTree {
    /// Children must come after their parent, which also rules out cycles.
    fn check(&self, width: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("empty tree".into());
        }

        for (i, node) in self.nodes.iter().enumerate() {
            if let TreeNode::Split {
                feature,
                threshold,
                left,
                right,
                ..
            } = node
            {
                if *feature >= width {
                    return Err(format!("node {i} splits on feature {feature} of {width}"));
                }
                if threshold.is_nan() {
                    return Err(format!("node {i} has a NaN threshold"));
                }
                for child in [*left, *right] {
                    if child <= i || child >= self.nodes.len() {
                        return Err(format!("node {i} points at invalid child {child}"));
                    }
                }
            }
        }

        Ok(())
    }

    fn predict(&self, tree: usize, features: &[f64]) -> Result<f64, ModelInferenceError> {
        let mut at = 0;
        loop {
            let node = self
                .nodes
                .get(at)
                .ok_or(ModelInferenceError::BrokenTree { tree, node: at })?;

            match node {
                TreeNode::Leaf { value } => return Ok(*value),
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    missing_left,
                } => {
                    let x = features[*feature];
                    let go_left = if x.is_nan() { *missing_left } else { x < *threshold };
                    at = if go_left { *left } else { *right };
                }
            }
        }
    }
}

/// A model checked against the feature schema.
#[derive(Debug, Clone)]
pub enum Model {
    Linear {
        intercept: f64,
        coefficients: Vec<f64>,
    },
    TreeEnsemble {
        base_score: f64,
        aggregation: Aggregation,
        trees: Vec<RegressionTree>,
        width: usize,
    },
    Passthrough {
        index: usize,
        width: usize,
    },
}

impl Regressor for Model {
    fn n_features(&self) -> usize {
        match self {
            Model::Linear { coefficients, .. } => coefficients.len(),
            Model::TreeEnsemble { width, .. } | Model::Passthrough { width, .. } => *width,
        }
    }

    fn predict(&self, features: &[f64]) -> Result<f64, ModelInferenceError> {
        if features.len() != self.n_features() {
            return Err(ModelInferenceError::WidthMismatch {
                expected: self.n_features(),
                actual: features.len(),
            });
        }

        match self {
            Model::Linear {
                intercept,
                coefficients,
            } => Ok(coefficients
                .iter()
                .zip(features)
                .fold(*intercept, |acc, (w, x)| acc + w * x)),

            Model::TreeEnsemble {
                base_score,
                aggregation,
                trees,
                ..
            } => {
                let mut total = 0.0;
                for (t, tree) in trees.iter().enumerate() {
                    total += tree.predict(t, features)?;
                }
                if *aggregation == Aggregation::Mean {
                    total /= trees.len() as f64;
                }
                Ok(base_score + total)
            }

            Model::Passthrough { index, .. } => Ok(features[*index]),
        }
    }
}
