use ash::vk;

/// A device queue handle paired with the family index it came from.
#[derive(Debug, Copy, Clone)]
pub struct DeviceQueue {
    queue: vk::Queue,
    family_index: u32,
}

impl DeviceQueue {
    pub(super) fn from_raw(queue: vk::Queue, family_index: u32) -> Self {
        Self {
            queue,
            family_index,
        }
    }

    /// The raw queue handle.
    ///
    /// # Safety
    ///
    /// Unsafe because ownership is not transferred. The queue belongs to the
    /// logical device and must not be used after the device is destroyed.
    pub unsafe fn raw(&self) -> vk::Queue {
        self.queue
    }

    pub fn family_index(&self) -> u32 {
        self.family_index
    }
}
