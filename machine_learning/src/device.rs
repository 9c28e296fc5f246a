use std::fmt::{self, Display};

use crate::{MlErr, Result};

/// Where tensors live and where computation over them runs.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Device {
    #[default]
    Cpu,
    Cuda(usize),
}

impl Device {
    /// Returns `true` if this device is an accelerator.
    pub fn is_accelerator(self) -> bool {
        matches!(self, Device::Cuda(_))
    }

    /// Picks the first accelerator reported by `probe`, falling back to the cpu.
    ///
    /// # Arguments
    /// * `probe` - The runtime to query for accelerators.
    ///
    /// # Returns
    /// The preferred device.
    pub fn select<P: DeviceProbe + ?Sized>(probe: &P) -> Self {
        probe
            .accelerators()
            .into_iter()
            .next()
            .unwrap_or(Device::Cpu)
    }

    /// Picks the preferred device for the bundled host runtime.
    pub fn auto() -> Self {
        Self::select(&HostRuntime)
    }

    /// Fails if the host runtime can't address this device.
    pub fn ensure_available(self) -> Result<()> {
        if HostRuntime.supports(self) {
            return Ok(());
        }

        Err(MlErr::DeviceUnavailable(self))
    }
}

impl Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Cpu => write!(f, "cpu"),
            Device::Cuda(ordinal) => write!(f, "cuda:{ordinal}"),
        }
    }
}

/// A compute runtime that can report which devices it is able to drive.
pub trait DeviceProbe {
    /// Lists the accelerators available to this runtime, in order of preference.
    fn accelerators(&self) -> Vec<Device>;

    /// Returns a human readable name for `device`, if known.
    fn name(&self, _device: Device) -> Option<String> {
        None
    }

    /// Returns `true` if tensors can be placed on `device`.
    fn supports(&self, device: Device) -> bool {
        device == Device::Cpu || self.accelerators().contains(&device)
    }
}

/// The `ndarray` backend, tensors are always held in host memory.
#[derive(Debug, Default, Clone, Copy)]
pub struct HostRuntime;

impl DeviceProbe for HostRuntime {
    fn accelerators(&self) -> Vec<Device> {
        Vec::new()
    }

    fn name(&self, device: Device) -> Option<String> {
        (device == Device::Cpu).then(|| "host".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeGpus(Vec<Device>);

    impl DeviceProbe for FakeGpus {
        fn accelerators(&self) -> Vec<Device> {
            self.0.clone()
        }
    }

    #[test]
    fn select_prefers_accelerator() {
        let probe = FakeGpus(vec![Device::Cuda(1), Device::Cuda(0)]);
        assert_eq!(Device::select(&probe), Device::Cuda(1));
    }

    #[test]
    fn select_falls_back_to_cpu() {
        assert_eq!(Device::select(&FakeGpus(vec![])), Device::Cpu);
        assert_eq!(Device::auto(), Device::Cpu);
    }

    #[test]
    fn host_runtime_only_supports_cpu() {
        assert!(Device::Cpu.ensure_available().is_ok());
        assert!(matches!(
            Device::Cuda(0).ensure_available(),
            Err(MlErr::DeviceUnavailable(Device::Cuda(0)))
        ));
    }

    #[test]
    fn display() {
        assert_eq!(Device::Cpu.to_string(), "cpu");
        assert_eq!(Device::Cuda(2).to_string(), "cuda:2");
    }
}
