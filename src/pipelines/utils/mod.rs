use crate::core::{ModelOptions, PipelineError, Result};
use candle_core::Device;

pub mod builder;
pub use builder::BasePipelineBuilder;

/// Loads a device to be used for the model.
/// If `index` is `Some(i)` it will attempt to load the specified CUDA device.
/// When `None` it defaults to CUDA device 0 if available and otherwise falls back
/// to CPU.
pub fn load_device_with(index: Option<usize>) -> Result<Device> {
    match index {
        Some(i) => Device::new_cuda(i)
            .map_err(|e| PipelineError::Device(format!("failed to init CUDA device {i}: {e}"))),
        None => Ok(Device::cuda_if_available(0)?),
    }
}

/// CUDA 0 if available, otherwise CPU.
pub fn load_device() -> Result<Device> {
    load_device_with(None)
}

/// Request for a specific device, used by pipeline builders.
#[derive(Clone, Default)]
pub enum DeviceRequest {
    /// Use CUDA if available, otherwise CPU (default behavior).
    #[default]
    Default,
    /// Force CPU even if CUDA is available.
    Cpu,
    /// Select a specific CUDA device by index.
    Cuda(usize),
    /// Provide an already constructed device.
    Explicit(Device),
}

impl DeviceRequest {
    /// Resolve the request into an actual [`Device`].
    pub fn resolve(self) -> Result<Device> {
        match self {
            DeviceRequest::Default => load_device(),
            DeviceRequest::Cpu => Ok(Device::Cpu),
            DeviceRequest::Cuda(i) => load_device_with(Some(i)),
            DeviceRequest::Explicit(d) => Ok(d),
        }
    }
}

/// Trait providing convenience methods for pipeline builders to select a device.
pub trait DeviceSelectable: Sized {
    /// Returns a mutable reference to the builder's internal [`DeviceRequest`].
    fn device_request_mut(&mut self) -> &mut DeviceRequest;

    /// Force the pipeline to run on CPU.
    fn cpu(mut self) -> Self {
        *self.device_request_mut() = DeviceRequest::Cpu;
        self
    }

    /// Select a specific CUDA device by index.
    fn cuda_device(mut self, index: usize) -> Self {
        *self.device_request_mut() = DeviceRequest::Cuda(index);
        self
    }

    /// Provide an explicit [`Device`].
    fn device(mut self, device: Device) -> Self {
        *self.device_request_mut() = DeviceRequest::Explicit(device);
        self
    }
}

/// Utility to generate a cache key combining model options and device location.
pub fn build_cache_key<O: ModelOptions>(options: &O, device: &Device) -> String {
    format!("{}-{:?}", options.cache_key(), device.location())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Opts;

    impl ModelOptions for Opts {
        fn cache_key(&self) -> String {
            "bert-base-uncased".into()
        }
    }

    #[test]
    fn cpu_request_resolves_to_cpu() {
        let device = DeviceRequest::Cpu.resolve().unwrap();
        assert!(device.is_cpu());
    }

    #[test]
    fn explicit_request_is_passed_through() {
        let device = DeviceRequest::Explicit(Device::Cpu).resolve().unwrap();
        assert!(device.is_cpu());
    }

    #[test]
    fn cache_key_includes_device_location() {
        let key = build_cache_key(&Opts, &Device::Cpu);
        assert!(key.starts_with("bert-base-uncased-"));
        assert!(key.ends_with("Cpu"));
    }
}
