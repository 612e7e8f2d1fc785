#![warn(missing_docs)]

//! ResNet50 v2 classification checker.
//!
//! Loads a pretrained ONNX image-classification model, validates it against
//! the reference tensor pairs bundled with the model-zoo distribution, and
//! classifies a photograph, reporting the top prediction, the inference
//! latency and the top-5 ranked ImageNet labels.
//!
//! Graph execution is delegated to [ONNX Runtime](https://onnxruntime.ai/)
//! through the [`ort`] crate; this crate owns the numeric pipeline around it:
//! image-to-tensor normalization, a numerically-stable softmax and top-k label
//! ranking.
//!
//! # Example
//!
//! Build an engine, preprocess an image and rank the output:
//!
//! ```no_run
//! # fn main() -> resnet_classify::Result<()> {
//! use resnet_classify::{Engine, ExecutionBackend, Labels};
//! use resnet_classify::{image_to_array, preprocess, postprocess, argmax};
//!
//! let mut engine = Engine::builder("resnet50v2/resnet50v2.onnx")
//!     .with_backend(ExecutionBackend::Cpu)
//!     .build()?;
//!
//! let labels = Labels::from_file("imagenet-simple-labels.json")?;
//! let image = image::open("images/dog.jpg")?;
//! let input = preprocess(image_to_array(&image).view());
//!
//! let output = engine.run(input.into_dyn())?;
//! let probabilities = postprocess(&output);
//! if let Some(class) = argmax(&probabilities) {
//!     println!("{}", &labels[class]);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Before classifying, the driver validates the model against the bundled
//! reference fixtures:
//!
//! ```no_run
//! # fn main() -> resnet_classify::Result<()> {
//! # let mut engine = resnet_classify::Engine::builder("resnet50v2/resnet50v2.onnx").build()?;
//! use resnet_classify::{validate, FixtureSet};
//!
//! let fixtures = FixtureSet::load("resnet50v2/test_data_set", 3)?;
//! validate(&mut engine, &fixtures)?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

pub mod engine;
pub mod error;
pub mod fetch;
pub mod fixtures;
pub mod labels;
pub mod postprocess;
pub mod preprocess;
pub mod validate;

// Re-export
pub use engine::{Engine, EngineBuilder, ExecutionBackend};
pub use error::{ClassifyError, DownloadError, Result};
pub use fixtures::FixtureSet;
pub use labels::Labels;
pub use postprocess::{argmax, postprocess, softmax, top_k};
pub use preprocess::{image_to_array, preprocess};
pub use validate::validate;

/// JSON array of class names, index = class id.
pub const LABELS_FILE: &str = "imagenet-simple-labels.json";
/// Base name of the fixture directories (`test_data_set_{0,1,2}`).
pub const TEST_DATA_BASE: &str = "resnet50v2/test_data_set";
/// Number of bundled reference fixture pairs.
pub const TEST_DATA_COUNT: usize = 3;
/// Serialized model graph, consumed opaquely by the inference engine.
pub const MODEL_FILE: &str = "resnet50v2/resnet50v2.onnx";
/// Photograph classified on each run.
pub const IMAGE_FILE: &str = "images/dog.jpg";

/// Check that the label file and the first fixture directory exist.
///
/// Run before any numeric work so a missing download terminates the process
/// with a diagnostic instead of surfacing later as an unrelated error.
pub fn check_assets(labels: &Path, fixture_base: &Path) -> Result<()> {
    if !labels.is_file() {
        return Err(ClassifyError::MissingAsset {
            path: labels.to_path_buf(),
        });
    }
    let first_fixture = fixtures::fixture_dir(fixture_base, 0);
    if !first_fixture.is_dir() {
        return Err(ClassifyError::MissingAsset {
            path: first_fixture,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_labels_is_reported_as_missing_asset() {
        let err = check_assets(
            Path::new("does-not-exist/labels.json"),
            Path::new("does-not-exist/test_data_set"),
        )
        .unwrap_err();
        assert!(matches!(err, ClassifyError::MissingAsset { path } if path.ends_with("labels.json")));
    }

    #[test]
    fn missing_fixture_dir_is_reported_as_missing_asset() {
        // Cargo.toml always exists next to the test binary's working directory.
        let err = check_assets(
            Path::new("Cargo.toml"),
            Path::new("does-not-exist/test_data_set"),
        )
        .unwrap_err();
        assert!(
            matches!(err, ClassifyError::MissingAsset { path } if path.ends_with("test_data_set_0"))
        );
    }
}
