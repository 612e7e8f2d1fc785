//! Reference fixture loading.
//!
//! The model zoo ships each model with `test_data_set_{i}` directories holding
//! one serialized `TensorProto` record per input and expected output. Only the
//! handful of fields needed to recover an f32 tensor are mirrored here; the
//! wire decoding itself is delegated to `prost`, which skips fields the mirror
//! does not declare.

use std::fs;
use std::path::{Path, PathBuf};

use ndarray::ArrayD;
use prost::Message;
use tracing::debug;

use crate::error::{ClassifyError, Result};

/// `TensorProto.DataType` value for 32-bit floats.
const DATA_TYPE_FLOAT: i32 = 1;

/// Subset of the ONNX `TensorProto` message (field tags per `onnx.proto`).
#[derive(Clone, PartialEq, Message)]
struct TensorRecord {
    /// Tensor shape.
    #[prost(int64, repeated, tag = "1")]
    dims: Vec<i64>,
    /// Element type discriminant.
    #[prost(int32, optional, tag = "2")]
    data_type: Option<i32>,
    /// Float payload, used when `raw_data` is absent.
    #[prost(float, repeated, tag = "4")]
    float_data: Vec<f32>,
    /// Serialized payload, little-endian element bytes.
    #[prost(bytes = "vec", optional, tag = "9")]
    raw_data: Option<Vec<u8>>,
}

/// The reference (input, expected output) tensor pairs bundled with the model.
#[derive(Debug)]
pub struct FixtureSet {
    /// Reference input tensors, one per fixture directory.
    pub inputs: Vec<ArrayD<f32>>,
    /// Expected output tensors, index-aligned with `inputs`.
    pub reference_outputs: Vec<ArrayD<f32>>,
}

impl FixtureSet {
    /// Load `count` fixture pairs from `<base>_{0..count}` directories.
    ///
    /// All inputs are loaded first, then all outputs; any unreadable or
    /// undecodable record aborts the load.
    pub fn load<P>(base: P, count: usize) -> Result<FixtureSet>
    where
        P: AsRef<Path>,
    {
        let base = base.as_ref();

        let inputs = (0..count)
            .map(|i| load_tensor(fixture_dir(base, i).join("input_0.pb")))
            .collect::<Result<Vec<_>>>()?;
        let reference_outputs = (0..count)
            .map(|i| load_tensor(fixture_dir(base, i).join("output_0.pb")))
            .collect::<Result<Vec<_>>>()?;

        Ok(FixtureSet {
            inputs,
            reference_outputs,
        })
    }

    /// Number of fixture pairs.
    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    /// Whether the set holds no fixtures.
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }
}

/// Directory of the `index`-th fixture, e.g. `resnet50v2/test_data_set_1`.
pub fn fixture_dir(base: &Path, index: usize) -> PathBuf {
    let mut dir = base.as_os_str().to_owned();
    dir.push(format!("_{}", index));
    PathBuf::from(dir)
}

/// Read and decode a single serialized tensor record.
pub fn load_tensor<P>(path: P) -> Result<ArrayD<f32>>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    let tensor = parse_tensor(&bytes, path)?;
    debug!(path = %path.display(), shape = ?tensor.shape(), "Loaded tensor record");
    Ok(tensor)
}

/// Decode a serialized `TensorProto` into an f32 tensor.
///
/// `path` is only used to name the source in errors.
fn parse_tensor(bytes: &[u8], path: &Path) -> Result<ArrayD<f32>> {
    let record = TensorRecord::decode(bytes)?;

    let data_type = record.data_type.unwrap_or_default();
    if data_type != DATA_TYPE_FLOAT {
        return Err(ClassifyError::UnsupportedElementType {
            path: path.to_path_buf(),
            data_type,
        });
    }

    let values: Vec<f32> = match record.raw_data {
        Some(raw) if !raw.is_empty() => raw
            .chunks_exact(4)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect(),
        _ if !record.float_data.is_empty() => record.float_data,
        _ => {
            return Err(ClassifyError::EmptyTensorRecord {
                path: path.to_path_buf(),
            })
        }
    };

    let shape: Vec<usize> = record.dims.iter().map(|&d| d as usize).collect();
    Ok(ArrayD::from_shape_vec(shape, values)?)
}
