use std::sync::Arc;

use ash::vk;

use crate::graphics::vulkan_api::{Allocation, RenderDevice, VulkanError};

/// An owned Vulkan image backed by a device-local allocation.
pub struct TextureImage {
    allocation: Allocation,
    image: vk::Image,
    render_device: Arc<RenderDevice>,
}

impl TextureImage {
    pub fn new(
        render_device: Arc<RenderDevice>,
        create_info: &vk::ImageCreateInfo,
    ) -> Result<Self, VulkanError> {
        let (image, allocation) = unsafe {
            // safe because the image is destroyed when this instance is
            // dropped and this instance keeps an arc of the render device
            let image =
                render_device.device().create_image(create_info, None)?;
            let allocation = render_device.allocate_memory(
                render_device.device().get_image_memory_requirements(image),
                vk::MemoryPropertyFlags::DEVICE_LOCAL,
            )?;
            render_device.device().bind_image_memory(
                image,
                allocation.device_memory(),
                0,
            )?;
            (image, allocation)
        };
        Ok(Self {
            allocation,
            image,
            render_device,
        })
    }

    /// The raw Vulkan image handle.
    ///
    /// # Safety
    ///
    /// Unsafe because ownership is not transferred.
    pub unsafe fn raw(&self) -> vk::Image {
        self.image
    }
}

impl Drop for TextureImage {
    fn drop(&mut self) {
        unsafe {
            self.render_device.device().destroy_image(self.image, None);
            self.render_device.free_memory(&self.allocation);
        }
    }
}
