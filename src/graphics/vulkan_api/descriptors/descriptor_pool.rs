use std::sync::Arc;

use ash::vk;

use crate::graphics::vulkan_api::{RenderDevice, VulkanError};

/// An owned descriptor pool which is destroyed automatically when it falls
/// out of scope.
///
/// Sets allocated from the pool are freed when the pool is destroyed, so the
/// pool must outlive them.
pub struct DescriptorPool {
    descriptor_pool: vk::DescriptorPool,
    render_device: Arc<RenderDevice>,
}

impl DescriptorPool {
    /// Create a new descriptor pool with capacity for `max_sets` sets drawn
    /// from the given pool sizes.
    pub fn new(
        render_device: Arc<RenderDevice>,
        max_sets: u32,
        sizes: &[vk::DescriptorPoolSize],
    ) -> Result<Self, VulkanError> {
        let create_info = vk::DescriptorPoolCreateInfo {
            max_sets,
            pool_size_count: sizes.len() as u32,
            p_pool_sizes: sizes.as_ptr(),
            ..Default::default()
        };
        let descriptor_pool = unsafe {
            render_device
                .device()
                .create_descriptor_pool(&create_info, None)?
        };
        Ok(Self {
            descriptor_pool,
            render_device,
        })
    }

    /// Get the raw pool handle.
    ///
    /// # Safety
    ///
    /// Unsafe because ownership is not transferred.
    pub unsafe fn raw(&self) -> vk::DescriptorPool {
        self.descriptor_pool
    }
}

impl Drop for DescriptorPool {
    fn drop(&mut self) {
        unsafe {
            self.render_device
                .device()
                .destroy_descriptor_pool(self.descriptor_pool, None);
        }
    }
}
