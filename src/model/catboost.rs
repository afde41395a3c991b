use std::collections::HashMap;
use std::path::Path;

use log::{debug, info};
use serde::Deserialize;

use super::{Regressor, OUTPUT_DIM};
use crate::error::{Result, SspError};
use crate::features::grid::FEATURE_LEN;
use crate::features::vector::FeatureVector;

/// Deepest oblivious tree CatBoost builds.
const MAX_DEPTH: usize = 16;

// ---------------------------------------------------------------------------
// JSON export schema (only the parts needed for prediction)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ModelJson {
    #[serde(default)]
    features_info: FeaturesInfoJson,
    oblivious_trees: Vec<TreeJson>,
    #[serde(default)]
    scale_and_bias: Option<(f64, BiasJson)>,
}

#[derive(Debug, Default, Deserialize)]
struct FeaturesInfoJson {
    #[serde(default)]
    float_features: Vec<FloatFeatureJson>,
}

#[derive(Debug, Deserialize)]
struct FloatFeatureJson {
    feature_index: usize,
    flat_feature_index: usize,
}

#[derive(Debug, Deserialize)]
struct TreeJson {
    leaf_values: Vec<f64>,
    #[serde(default)]
    splits: Vec<SplitJson>,
}

#[derive(Debug, Deserialize)]
struct SplitJson {
    split_type: String,
    #[serde(default)]
    float_feature_index: Option<usize>,
    #[serde(default)]
    border: Option<f64>,
}

/// Older exports carry a scalar bias, multi-output ones a vector.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BiasJson {
    Scalar(f64),
    Vector(Vec<f64>),
}

// ---------------------------------------------------------------------------
// Compiled model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
struct Split {
    /// Position in the feature vector.
    feature: usize,
    border: f64,
}

/// Oblivious tree: level `i` uses `splits[i]` for every node, so the leaf
/// index is the bitmask of split outcomes.
#[derive(Debug, Clone, PartialEq)]
struct ObliviousTree {
    splits: Vec<Split>,
    /// `2^depth * OUTPUT_DIM` values, leaf-major.
    leaf_values: Vec<f64>,
}

impl ObliviousTree {
    fn leaf_index(&self, features: &[f64]) -> usize {
        self.splits
            .iter()
            .enumerate()
            .fold(0, |index, (depth, split)| {
                if features[split.feature] > split.border {
                    index | (1 << depth)
                } else {
                    index
                }
            })
    }
}

/// A multi-output CatBoost regressor loaded from its JSON export.
#[derive(Debug, Clone, PartialEq)]
pub struct CatBoostModel {
    trees: Vec<ObliviousTree>,
    scale: f64,
    bias: [f64; OUTPUT_DIM],
}

impl CatBoostModel {
    /// Read and validate the model file. Any I/O, parse or shape problem is a
    /// [`SspError::ModelLoad`].
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| SspError::model_load(path, format!("reading model file: {e}")))?;
        let model = Self::from_json_str(&text)
            .map_err(|reason| SspError::model_load(path, reason))?;
        info!(
            "loaded CatBoost model from {} ({} trees)",
            path.display(),
            model.tree_count()
        );
        Ok(model)
    }

    /// Parse a JSON export. The error is a human readable reason.
    pub fn from_json_str(text: &str) -> std::result::Result<Self, String> {
        let raw: ModelJson =
            serde_json::from_str(text).map_err(|e| format!("parsing model JSON: {e}"))?;

        // float_feature_index -> position in the input vector
        let flat_index: HashMap<usize, usize> = raw
            .features_info
            .float_features
            .iter()
            .map(|f| (f.feature_index, f.flat_feature_index))
            .collect();

        let trees = raw
            .oblivious_trees
            .iter()
            .enumerate()
            .map(|(t, tree)| compile_tree(t, tree, &flat_index))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let (scale, bias) = match raw.scale_and_bias {
            None => (1.0, [0.0; OUTPUT_DIM]),
            Some((scale, BiasJson::Scalar(b))) => (scale, [b; OUTPUT_DIM]),
            Some((scale, BiasJson::Vector(v))) => {
                let bias: [f64; OUTPUT_DIM] = v.as_slice().try_into().map_err(|_| {
                    format!("model has {} outputs, expected {OUTPUT_DIM}", v.len())
                })?;
                (scale, bias)
            }
        };

        debug!(
            "model: {} trees, max depth {}, scale {scale}, bias {bias:?}",
            trees.len(),
            trees.iter().map(|t| t.splits.len()).max().unwrap_or(0)
        );
        Ok(CatBoostModel { trees, scale, bias })
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }
}

fn compile_tree(
    t: usize,
    tree: &TreeJson,
    flat_index: &HashMap<usize, usize>,
) -> std::result::Result<ObliviousTree, String> {
    let splits = tree
        .splits
        .iter()
        .map(|split| {
            if split.split_type != "FloatFeature" {
                return Err(format!(
                    "tree {t}: unsupported split type '{}'",
                    split.split_type
                ));
            }
            let (Some(index), Some(border)) = (split.float_feature_index, split.border) else {
                return Err(format!("tree {t}: float split without feature index or border"));
            };
            let feature = flat_index.get(&index).copied().unwrap_or(index);
            if feature >= FEATURE_LEN {
                return Err(format!(
                    "tree {t}: split on feature {feature}, but the model input has {FEATURE_LEN} features"
                ));
            }
            Ok(Split { feature, border })
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

    if splits.len() > MAX_DEPTH {
        return Err(format!(
            "tree {t}: depth {} exceeds the maximum of {MAX_DEPTH}",
            splits.len()
        ));
    }
    let expected = (1usize << splits.len()) * OUTPUT_DIM;
    if tree.leaf_values.len() != expected {
        return Err(format!(
            "tree {t}: {} leaf values for depth {}, expected {expected} ({OUTPUT_DIM} outputs)",
            tree.leaf_values.len(),
            splits.len()
        ));
    }

    Ok(ObliviousTree {
        splits,
        leaf_values: tree.leaf_values.clone(),
    })
}

impl Regressor for CatBoostModel {
    fn predict(&self, features: &FeatureVector) -> Result<[f64; OUTPUT_DIM]> {
        let x = features.as_slice();
        if x.len() != FEATURE_LEN {
            return Err(SspError::configuration(format!(
                "model expects {FEATURE_LEN} features, got {}",
                x.len()
            )));
        }

        let mut sums = [0.0; OUTPUT_DIM];
        for tree in &self.trees {
            let offset = tree.leaf_index(x) * OUTPUT_DIM;
            let leaf = &tree.leaf_values[offset..offset + OUTPUT_DIM];
            for (sum, value) in sums.iter_mut().zip(leaf) {
                *sum += value;
            }
        }

        let mut out = [0.0; OUTPUT_DIM];
        for ((o, sum), bias) in out.iter_mut().zip(sums).zip(self.bias) {
            *o = self.scale * sum + bias;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::grid::GRID_SPECS;
    use crate::features::matrix::CountMatrix;
    use crate::features::vector::assemble;

    /// Depth-2 tree on features 0 and 539, plus a stump on feature 200.
    const MODEL: &str = r#"{
        "features_info": {"float_features": [
            {"feature_index": 0, "flat_feature_index": 0, "borders": [0.5]},
            {"feature_index": 1, "flat_feature_index": 200, "borders": [0.5]},
            {"feature_index": 2, "flat_feature_index": 539, "borders": [1.5]}
        ]},
        "oblivious_trees": [
            {
                "leaf_values": [0.1, 0.2, 0.3,  0.2, 0.2, 0.2,  0.0, 0.1, 0.4,  0.3, 0.3, 0.0],
                "splits": [
                    {"border": 0.5, "float_feature_index": 0, "split_index": 0, "split_type": "FloatFeature"},
                    {"border": 1.5, "float_feature_index": 2, "split_index": 2, "split_type": "FloatFeature"}
                ]
            },
            {
                "leaf_values": [0.0, 0.0, 0.0,  0.05, -0.05, 0.0],
                "splits": [
                    {"border": 0.5, "float_feature_index": 1, "split_index": 1, "split_type": "FloatFeature"}
                ]
            }
        ],
        "scale_and_bias": [1, [0.1, 0.1, 0.1]]
    }"#;

    fn features(pairs: [&[(usize, usize)]; 3]) -> FeatureVector {
        let matrices: Vec<CountMatrix> = GRID_SPECS
            .iter()
            .zip(pairs)
            .map(|(s, p)| CountMatrix::from_pairs(p.iter().copied(), s.h_bins, s.n_bins).unwrap())
            .collect();
        assemble(&matrices).unwrap()
    }

    fn assert_close(actual: [f64; 3], expected: [f64; 3]) {
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-12, "{actual:?} != {expected:?}");
        }
    }

    #[test]
    fn all_zero_input_takes_leftmost_leaves() {
        let model = CatBoostModel::from_json_str(MODEL).unwrap();
        assert_eq!(model.tree_count(), 2);
        let out = model.predict(&features([&[], &[], &[]])).unwrap();
        assert_close(out, [0.2, 0.3, 0.4]);
    }

    #[test]
    fn split_outcomes_set_leaf_bits() {
        let model = CatBoostModel::from_json_str(MODEL).unwrap();
        // feature 0 = 1 -> bit 0; feature 539 = 2 -> bit 1; feature 200 = 1 -> stump leaf 1
        let fv = features([&[(0, 0)], &[(0, 0)], &[(7, 9), (7, 9)]]);
        let out = model.predict(&fv).unwrap();
        assert_close(out, [0.1 + 0.3 + 0.05, 0.1 + 0.3 - 0.05, 0.1 + 0.0]);
    }

    #[test]
    fn scalar_bias_and_missing_features_info() {
        let json = r#"{
            "oblivious_trees": [{"leaf_values": [1.0, 2.0, 3.0], "splits": []}],
            "scale_and_bias": [0.5, 0.25]
        }"#;
        let model = CatBoostModel::from_json_str(json).unwrap();
        let out = model.predict(&features([&[], &[], &[]])).unwrap();
        assert_close(out, [0.75, 1.25, 1.75]);
    }

    #[test]
    fn wrong_output_dimension_is_rejected() {
        let json = r#"{
            "oblivious_trees": [{"leaf_values": [1.0, 2.0], "splits": []}],
            "scale_and_bias": [1, [0.0, 0.0]]
        }"#;
        assert!(CatBoostModel::from_json_str(json).is_err());
    }

    #[test]
    fn split_beyond_feature_vector_is_rejected() {
        let json = r#"{
            "oblivious_trees": [{
                "leaf_values": [0, 0, 0, 0, 0, 0],
                "splits": [{"border": 0.5, "float_feature_index": 540, "split_type": "FloatFeature"}]
            }]
        }"#;
        let err = CatBoostModel::from_json_str(json).unwrap_err();
        assert!(err.contains("540"));
    }

    #[test]
    fn categorical_splits_are_rejected() {
        let json = r#"{
            "oblivious_trees": [{
                "leaf_values": [0, 0, 0, 0, 0, 0],
                "splits": [{"split_type": "OneHotFeature", "cat_feature_index": 0, "value": 1}]
            }]
        }"#;
        assert!(CatBoostModel::from_json_str(json).is_err());
    }

    #[test]
    fn trees_deeper_than_catboost_allows_are_rejected() {
        let split = r#"{"border": 0.5, "float_feature_index": 0, "split_type": "FloatFeature"}"#;
        let splits = vec![split; MAX_DEPTH + 1].join(",");
        let json = format!(
            r#"{{"oblivious_trees": [{{"leaf_values": [0, 0, 0], "splits": [{splits}]}}]}}"#
        );
        let err = CatBoostModel::from_json_str(&json).unwrap_err();
        assert!(err.contains("depth 17"), "{err}");
    }

    #[test]
    fn missing_file_is_model_load_error() {
        let err = CatBoostModel::load(Path::new("/nonexistent/model.json")).unwrap_err();
        assert!(matches!(err, SspError::ModelLoad { .. }));
    }
}
