mod device_local_buffer;
mod host_coherent_buffer;

use ash::vk;

pub use self::{
    device_local_buffer::DeviceLocalBuffer,
    host_coherent_buffer::HostCoherentBuffer,
};

/// Common behavior for objects which own a Vulkan buffer.
pub trait Buffer {
    /// The raw buffer handle.
    ///
    /// # Safety
    ///
    /// Unsafe because ownership is not transferred. The handle must not be
    /// used after the owning object is dropped.
    unsafe fn raw(&self) -> vk::Buffer;

    /// The size of the underlying allocation, in bytes.
    fn size_in_bytes(&self) -> usize;

    /// The number of elements stored in the buffer.
    fn element_count(&self) -> usize;
}
