//! Thin wrapper around the ONNX Runtime session.
//!
//! The engine is treated as an opaque capability: load a serialized graph,
//! report its declared input name, execute the graph on a named input tensor.
//! Everything model-specific (shapes, operators, weights) stays inside the
//! runtime.

use std::path::{Path, PathBuf};

use ndarray::ArrayD;
use ort::execution_providers::CPUExecutionProvider;
#[cfg(feature = "cuda")]
use ort::execution_providers::CUDAExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Tensor;
use tracing::{debug, info};

use crate::error::{ClassifyError, Result};

/// Execution backend the runtime should use.
///
/// The selected provider is registered with error-on-failure semantics:
/// if the backend cannot be initialized the session build fails instead of
/// silently falling back to another provider.
#[derive(Debug, Clone, Copy)]
pub enum ExecutionBackend {
    /// General-purpose CPU execution.
    Cpu,
    /// CUDA execution on the given device id.
    ///
    /// Requires the crate to be built with the `cuda` feature; selecting it
    /// in a build without that feature is an error, not a fallback.
    Cuda(i32),
}

/// Builder for an [`Engine`].
pub struct EngineBuilder {
    model_path: PathBuf,
    backend: ExecutionBackend,
    num_threads: usize,
}

impl EngineBuilder {
    /// Start building an engine for the model at `model_path`.
    pub fn new<P>(model_path: P) -> EngineBuilder
    where
        P: Into<PathBuf>,
    {
        EngineBuilder {
            model_path: model_path.into(),
            backend: ExecutionBackend::Cpu,
            num_threads: 1,
        }
    }

    /// Select the execution backend.
    pub fn with_backend(mut self, backend: ExecutionBackend) -> EngineBuilder {
        self.backend = backend;
        self
    }

    /// Set the number of intra-op threads.
    pub fn with_number_threads(mut self, num_threads: usize) -> EngineBuilder {
        self.num_threads = num_threads;
        self
    }

    /// Load the model and construct the engine.
    pub fn build(self) -> Result<Engine> {
        if !self.model_path.exists() {
            return Err(ClassifyError::MissingAsset {
                path: self.model_path,
            });
        }

        let mut builder = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(self.num_threads)?;

        builder = match self.backend {
            ExecutionBackend::Cpu => builder.with_execution_providers([
                CPUExecutionProvider::default().build().error_on_failure(),
            ])?,
            #[cfg(feature = "cuda")]
            ExecutionBackend::Cuda(device_id) => builder.with_execution_providers([
                CUDAExecutionProvider::default()
                    .with_device_id(device_id)
                    .build()
                    .error_on_failure(),
            ])?,
            #[cfg(not(feature = "cuda"))]
            ExecutionBackend::Cuda(_) => {
                return Err(ClassifyError::BackendUnavailable { backend: "CUDA" })
            }
        };

        let session = builder.commit_from_file(&self.model_path)?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .ok_or_else(|| ClassifyError::ModelWithoutIo {
                path: self.model_path.clone(),
                what: "inputs",
            })?;
        let output_name = session
            .outputs
            .first()
            .map(|output| output.name.clone())
            .ok_or_else(|| ClassifyError::ModelWithoutIo {
                path: self.model_path.clone(),
                what: "outputs",
            })?;

        info!(
            model = %self.model_path.display(),
            backend = ?self.backend,
            %input_name,
            "Loaded model"
        );

        Ok(Engine {
            session,
            input_name,
            output_name,
        })
    }
}

/// A loaded model, ready to execute.
pub struct Engine {
    session: Session,
    input_name: String,
    output_name: String,
}

impl Engine {
    /// Start building an engine for the model at `model_path`.
    pub fn builder<P>(model_path: P) -> EngineBuilder
    where
        P: AsRef<Path>,
    {
        EngineBuilder::new(model_path.as_ref())
    }

    /// Name of the model's first declared input.
    pub fn input_name(&self) -> &str {
        &self.input_name
    }

    /// Execute the graph on `input`, returning the first output tensor.
    pub fn run(&mut self, input: ArrayD<f32>) -> Result<ArrayD<f32>> {
        debug!(shape = ?input.shape(), "Running inference");
        let tensor = Tensor::from_array(input)?;
        let outputs = self
            .session
            .run(ort::inputs![self.input_name.as_str() => tensor])?;
        let output = outputs[self.output_name.as_str()]
            .try_extract_array::<f32>()?
            .to_owned();
        debug!(shape = ?output.shape(), "Inference done");
        Ok(output)
    }
}
