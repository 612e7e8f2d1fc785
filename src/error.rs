//! Error types of the crate.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ClassifyError>;

/// All the ways a classification run can fail.
///
/// Every variant is fatal: the driver surfaces the first error it sees and
/// aborts the run. There is no retry or partial-success path.
#[derive(Error, Debug)]
pub enum ClassifyError {
    /// A required on-disk asset (labels, fixtures, model or image) is absent.
    #[error("Missing {path:?}")]
    MissingAsset {
        /// Path that was expected to exist.
        path: PathBuf,
    },
    /// A fixture record decoded to a tensor whose element type is not float32.
    #[error("Tensor record in {path:?} has unsupported element type {data_type}")]
    UnsupportedElementType {
        /// Fixture file the record came from.
        path: PathBuf,
        /// The ONNX `TensorProto.DataType` value found (float32 is 1).
        data_type: i32,
    },
    /// A fixture record carried no tensor payload at all.
    #[error("Tensor record in {path:?} holds no data")]
    EmptyTensorRecord {
        /// Fixture file the record came from.
        path: PathBuf,
    },
    /// A computed output disagrees with the reference output beyond tolerance.
    #[error(
        "Fixture {fixture}: output[{index}] = {actual} differs from reference {expected} \
         beyond {decimal_places} decimal places"
    )]
    ValidationMismatch {
        /// Index of the offending fixture pair.
        fixture: usize,
        /// Flat element index of the first mismatching value.
        index: usize,
        /// Reference value.
        expected: f32,
        /// Computed value.
        actual: f32,
        /// Decimal places the comparison was performed at.
        decimal_places: u32,
    },
    /// A computed output has a different shape than the reference output.
    #[error("Fixture {fixture}: output shape {actual:?} differs from reference shape {expected:?}")]
    ValidationShapeMismatch {
        /// Index of the offending fixture pair.
        fixture: usize,
        /// Reference shape.
        expected: Vec<usize>,
        /// Computed shape.
        actual: Vec<usize>,
    },
    /// The loaded model declares no inputs or no outputs.
    #[error("Model {path:?} declares no {what}")]
    ModelWithoutIo {
        /// Model file.
        path: PathBuf,
        /// Either `"inputs"` or `"outputs"`.
        what: &'static str,
    },
    /// The model produced an empty logit vector.
    #[error("Model output is empty, cannot rank labels")]
    EmptyOutput,
    /// The requested execution backend was not compiled into this build.
    #[error("Execution backend {backend} is not available in this build")]
    BackendUnavailable {
        /// Name of the requested backend.
        backend: &'static str,
    },
    /// Error raised by the ONNX Runtime wrapper.
    #[error("Inference engine error: {0}")]
    Ort(#[from] ort::Error),
    /// A tensor record failed to decode as a protobuf message.
    #[error("Failed to decode tensor record: {0}")]
    TensorDecode(#[from] prost::DecodeError),
    /// The label file failed to parse as a JSON array of strings.
    #[error("Failed to parse label file: {0}")]
    LabelParse(#[from] serde_json::Error),
    /// The target image failed to decode.
    #[error("Failed to decode image: {0}")]
    Image(#[from] image::ImageError),
    /// A tensor could not be built with the decoded shape.
    #[error("Tensor shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
    /// An underlying I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Downloading an asset failed.
    #[error("Failed to download asset: {0}")]
    Download(#[from] DownloadError),
}

/// Failures specific to fetching assets over the network.
#[derive(Error, Debug)]
pub enum DownloadError {
    /// The HTTP request itself failed.
    #[error("Request failed: {0}")]
    Request(#[from] Box<ureq::Error>),
    /// Fewer (or more) bytes were written than the server announced.
    #[error("Expected {expected} bytes, copied {copied}")]
    CopyMismatch {
        /// Bytes announced via `Content-Length`.
        expected: u64,
        /// Bytes actually copied to disk.
        copied: u64,
    },
    /// Writing the downloaded content to disk failed.
    #[error("I/O error while saving download: {0}")]
    Io(#[from] std::io::Error),
}
