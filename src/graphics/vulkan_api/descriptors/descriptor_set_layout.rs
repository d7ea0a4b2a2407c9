use std::sync::Arc;

use ash::vk;

use crate::graphics::vulkan_api::{RenderDevice, VulkanError};

/// An owned descriptor set layout which is destroyed automatically when it
/// falls out of scope.
pub struct DescriptorSetLayout {
    layout: vk::DescriptorSetLayout,
    render_device: Arc<RenderDevice>,
}

impl DescriptorSetLayout {
    pub fn new(
        render_device: Arc<RenderDevice>,
        bindings: &[vk::DescriptorSetLayoutBinding],
    ) -> Result<Self, VulkanError> {
        let create_info = vk::DescriptorSetLayoutCreateInfo {
            binding_count: bindings.len() as u32,
            p_bindings: bindings.as_ptr(),
            ..Default::default()
        };
        let layout = unsafe {
            render_device
                .device()
                .create_descriptor_set_layout(&create_info, None)?
        };
        Ok(Self {
            layout,
            render_device,
        })
    }

    /// Get the raw layout handle.
    ///
    /// # Safety
    ///
    /// Unsafe because ownership is not transferred.
    pub unsafe fn raw(&self) -> vk::DescriptorSetLayout {
        self.layout
    }
}

impl Drop for DescriptorSetLayout {
    fn drop(&mut self) {
        unsafe {
            self.render_device
                .device()
                .destroy_descriptor_set_layout(self.layout, None);
        }
    }
}
