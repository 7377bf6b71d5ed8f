//! Compute backend selection.
//!
//! The engine tries an ordered list of execution providers — highest
//! performance first — and adopts the first one that successfully constructs
//! an inference session. When every provider fails, initialization fails
//! permanently; there is no silent degradation to mock output.

use serde::{Deserialize, Serialize};

/// One compute backend the ONNX runtime can execute on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExecutionBackend {
    /// NVIDIA GPU via CUDA.
    Cuda,
    /// Apple GPU/ANE via CoreML.
    CoreMl,
    /// Portable CPU fallback.
    Cpu,
}

impl ExecutionBackend {
    /// The default fallback order: GPU-accelerated first, CPU last.
    #[must_use]
    pub fn default_order() -> Vec<Self> {
        vec![Self::Cuda, Self::CoreMl, Self::Cpu]
    }

    /// Short name for logging.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Cuda => "cuda",
            Self::CoreMl => "coreml",
            Self::Cpu => "cpu",
        }
    }
}

impl std::fmt::Display for ExecutionBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(feature = "ort")]
impl ExecutionBackend {
    /// Build the `ort` execution provider dispatch for this backend.
    ///
    /// Registration is set to error on failure so the engine's fallback loop
    /// observes the failure instead of silently running on CPU.
    pub(crate) fn dispatch(self) -> ort::execution_providers::ExecutionProviderDispatch {
        use ort::execution_providers::{
            CPUExecutionProvider, CUDAExecutionProvider, CoreMLExecutionProvider,
            ExecutionProvider as _,
        };
        match self {
            Self::Cuda => CUDAExecutionProvider::default().build().error_on_failure(),
            Self::CoreMl => CoreMLExecutionProvider::default().build().error_on_failure(),
            Self::Cpu => CPUExecutionProvider::default().build().error_on_failure(),
        }
    }
}
