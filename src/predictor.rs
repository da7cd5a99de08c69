// Price prediction over a pre-trained, pre-serialized regression model.
//
// Two artifacts are loaded at startup: the tree-ensemble dump and the
// ordered feature-column list fixed at training time. Incoming records are
// one-hot encoded onto exactly that column set, in that order, with every
// absent column filled with zero; an unseen categorical value therefore
// contributes nothing rather than failing.
use crate::model::PredictError;

use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;

#[derive(Debug, Deserialize)]
pub struct TreeNode {
    /// Split feature index; a leaf has no feature and carries `value`.
    #[serde(default)]
    pub feature: Option<usize>,
    #[serde(default)]
    pub threshold: f64,
    #[serde(default)]
    pub left: usize,
    #[serde(default)]
    pub right: usize,
    #[serde(default)]
    pub value: f64,
}

#[derive(Debug, Deserialize)]
pub struct RegressionTree {
    pub nodes: Vec<TreeNode>,
}

impl RegressionTree {
    fn score(&self, features: &[f64]) -> f64 {
        let mut index = 0;
        loop {
            let node = &self.nodes[index];
            match node.feature {
                Some(feature) => {
                    index = if features[feature] < node.threshold {
                        node.left
                    } else {
                        node.right
                    };
                }
                None => return node.value,
            }
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GbtModel {
    #[serde(default)]
    pub base_score: f64,
    pub trees: Vec<RegressionTree>,
}

impl GbtModel {
    /// Checked once at load time so scoring can walk the node arrays
    /// without bounds handling. Child links must point forward, which also
    /// rules out cycles.
    fn validate(&self, feature_count: usize) -> Result<(), PredictError> {
        for (t, tree) in self.trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                return Err(PredictError::InvalidModel(format!("tree {t} has no nodes")));
            }
            for (i, node) in tree.nodes.iter().enumerate() {
                let Some(feature) = node.feature else {
                    continue;
                };
                if feature >= feature_count {
                    return Err(PredictError::InvalidModel(format!(
                        "tree {t} node {i} splits on feature {feature}, schema has {feature_count}"
                    )));
                }
                if node.left >= tree.nodes.len() || node.right >= tree.nodes.len() {
                    return Err(PredictError::InvalidModel(format!(
                        "tree {t} node {i} links outside the node array"
                    )));
                }
                if node.left <= i || node.right <= i {
                    return Err(PredictError::InvalidModel(format!(
                        "tree {t} node {i} links backwards"
                    )));
                }
            }
        }
        Ok(())
    }

    fn score(&self, features: &[f64]) -> f64 {
        self.base_score + self.trees.iter().map(|tree| tree.score(features)).sum::<f64>()
    }
}

pub struct PriceModel {
    model: GbtModel,
    feature_names: Vec<String>,
}

impl PriceModel {
    pub fn load(model_path: &str, feature_names_path: &str) -> Result<Self, PredictError> {
        let feature_names: Vec<String> = read_json(feature_names_path)?;
        let model: GbtModel = read_json(model_path)?;
        Self::from_parts(model, feature_names)
    }

    pub fn from_parts(model: GbtModel, feature_names: Vec<String>) -> Result<Self, PredictError> {
        model.validate(feature_names.len())?;
        Ok(Self {
            model,
            feature_names,
        })
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// One-hot encodes a flat record onto the training-time schema. Numeric
    /// values land in the column of the same name; a string value `v` in
    /// field `f` sets the `f_v` indicator column.
    pub fn encode(&self, input: &Map<String, Value>) -> Vec<f64> {
        let mut columns: HashMap<String, f64> = HashMap::with_capacity(input.len());

        for (field, value) in input {
            match value {
                Value::Number(n) => {
                    if let Some(n) = n.as_f64() {
                        columns.insert(field.clone(), n);
                    }
                }
                Value::String(s) => {
                    columns.insert(format!("{field}_{s}"), 1.0);
                }
                Value::Bool(b) => {
                    columns.insert(field.clone(), if *b { 1.0 } else { 0.0 });
                }
                _ => {}
            }
        }

        self.feature_names
            .iter()
            .map(|name| columns.get(name).copied().unwrap_or(0.0))
            .collect()
    }

    pub fn predict(&self, input: &Map<String, Value>) -> f64 {
        self.model.score(&self.encode(input))
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &str) -> Result<T, PredictError> {
    let raw = fs::read_to_string(path).map_err(|source| PredictError::ArtifactIo {
        path: path.to_string(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| PredictError::ArtifactFormat {
        path: path.to_string(),
        source,
    })
}
