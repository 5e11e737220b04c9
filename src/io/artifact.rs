//! Read model artifact JSON files.
//!
//! The schema is defined by `models::ForestArtifact`. Reading validates the
//! artifact fully, so a forest returned from `read_model_json` is ready to
//! serve predictions.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::ModelLoadError;
use crate::models::{ForestArtifact, RandomForest};

/// Load and validate a forest artifact.
pub fn read_model_json(path: &Path) -> Result<RandomForest, ModelLoadError> {
    let file = File::open(path).map_err(|source| ModelLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let artifact: ForestArtifact =
        serde_json::from_reader(BufReader::new(file)).map_err(|source| ModelLoadError::Json {
            path: path.to_path_buf(),
            source,
        })?;

    RandomForest::from_artifact(&artifact).map_err(|reason| ModelLoadError::Schema {
        path: path.to_path_buf(),
        reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FEATURE_NAMES;
    use crate::models::{TreeArrays, FOREST_FORMAT};

    fn write_artifact(path: &Path, artifact: &ForestArtifact) {
        std::fs::write(path, serde_json::to_vec_pretty(artifact).unwrap()).unwrap();
    }

    fn one_leaf_artifact() -> ForestArtifact {
        ForestArtifact {
            format: FOREST_FORMAT.to_string(),
            feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            classes: vec![0, 1],
            trees: vec![TreeArrays {
                children_left: vec![-1],
                children_right: vec![-1],
                feature: vec![-2],
                threshold: vec![-2.0],
                value: vec![vec![3.0, 1.0]],
            }],
        }
    }

    #[test]
    fn written_artifact_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rf.json");
        write_artifact(&path, &one_leaf_artifact());

        let forest = read_model_json(&path).unwrap();
        assert_eq!(forest.n_trees(), 1);
        assert_eq!(forest.max_depth(), 0);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_model_json(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ModelLoadError::Io { .. }));
    }

    #[test]
    fn garbage_is_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rf.sav");
        std::fs::write(&path, b"\x80\x04\x95 not json").unwrap();

        let err = read_model_json(&path).unwrap_err();
        assert!(matches!(err, ModelLoadError::Json { .. }));
    }

    #[test]
    fn schema_violations_name_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rf.json");
        let mut artifact = one_leaf_artifact();
        artifact.trees.clear();
        write_artifact(&path, &artifact);

        let err = read_model_json(&path).unwrap_err();
        assert!(matches!(err, ModelLoadError::Schema { .. }));
        assert!(err.to_string().contains("rf.json"));
        assert!(err.to_string().contains("forest has no trees"));
    }

    #[test]
    fn shipped_demo_model_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("models/rf.json");
        let forest = read_model_json(&path).unwrap();
        assert_eq!(forest.n_trees(), 3);
    }
}
