use std::sync::Arc;

use ash::vk;

use crate::graphics::vulkan_api::{RenderDevice, RenderPass, VulkanError};

/// An owned framebuffer.
///
/// The framebuffer holds raw image view handles, so it must be destroyed
/// before the swapchain or depth buffer which owns the views. The
/// application enforces this ordering on every swapchain rebuild.
pub struct Framebuffer {
    framebuffer: vk::Framebuffer,
    render_device: Arc<RenderDevice>,
}

impl Framebuffer {
    pub fn new(
        render_device: Arc<RenderDevice>,
        render_pass: &RenderPass,
        attachments: &[vk::ImageView],
        extent: vk::Extent2D,
    ) -> Result<Self, VulkanError> {
        // it's safe to take the render pass's handle because the reference
        // is only held until the framebuffer is created.
        let raw_render_pass = unsafe { render_pass.raw() };

        let create_info = vk::FramebufferCreateInfo {
            render_pass: raw_render_pass,
            attachment_count: attachments.len() as u32,
            p_attachments: attachments.as_ptr(),
            width: extent.width,
            height: extent.height,
            layers: 1,
            ..Default::default()
        };
        let framebuffer = unsafe {
            render_device.device().create_framebuffer(&create_info, None)?
        };
        Ok(Self {
            framebuffer,
            render_device,
        })
    }

    /// Get the underlying Vulkan framebuffer handle.
    ///
    /// # Safety
    ///
    /// Unsafe because ownership is not transferred.
    pub unsafe fn raw(&self) -> vk::Framebuffer {
        self.framebuffer
    }
}

impl Drop for Framebuffer {
    /// # Safety
    ///
    /// The application is responsible for ensuring that no GPU operations
    /// depend on this framebuffer when it's dropped.
    fn drop(&mut self) {
        unsafe {
            self.render_device
                .device()
                .destroy_framebuffer(self.framebuffer, None);
        }
    }
}
