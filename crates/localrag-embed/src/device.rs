use candle_core::Device;
use localrag_core::config::ComputeDevice;
use localrag_core::{Error, Result};

/// Resolve the configured compute device. Explicit accelerators must exist;
/// `auto` walks CUDA, Metal, CPU and takes the first that initializes.
pub fn select_device(choice: ComputeDevice) -> Result<Device> {
    let device = match choice {
        ComputeDevice::Cpu => Device::Cpu,
        ComputeDevice::Cuda => Device::new_cuda(0).map_err(|e| Error::EmbeddingUnavailable(format!("CUDA device requested but unavailable: {e}")))?,
        ComputeDevice::Metal => Device::new_metal(0).map_err(|e| Error::EmbeddingUnavailable(format!("Metal device requested but unavailable: {e}")))?,
        ComputeDevice::Auto => auto_detect(),
    };
    tracing::info!(device = describe(&device), requested = ?choice, "embedding device selected");
    Ok(device)
}

fn auto_detect() -> Device {
    if candle_core::utils::cuda_is_available() {
        match Device::new_cuda(0) { Ok(dev) => return dev, Err(e) => tracing::warn!(error = %e, "CUDA detected but failed to initialize") }
    }
    if candle_core::utils::metal_is_available() {
        match Device::new_metal(0) { Ok(dev) => return dev, Err(e) => tracing::warn!(error = %e, "Metal detected but failed to initialize") }
    }
    Device::Cpu
}

pub fn describe(device: &Device) -> &'static str {
    match device {
        Device::Cpu => "cpu",
        Device::Cuda(_) => "cuda",
        Device::Metal(_) => "metal",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_cpu_always_succeeds() {
        let dev = select_device(ComputeDevice::Cpu).unwrap();
        assert_eq!(describe(&dev), "cpu");
    }

    #[test]
    fn auto_falls_back_to_something_usable() {
        assert!(select_device(ComputeDevice::Auto).is_ok());
    }

    #[cfg(not(feature = "cuda"))]
    #[test]
    fn explicit_cuda_without_support_is_embedding_unavailable() {
        let err = select_device(ComputeDevice::Cuda).unwrap_err();
        assert_eq!(err.kind(), "embedding_unavailable");
    }
}
