use std::sync::Arc;

use ash::vk;

use crate::graphics::vulkan_api::{RenderDevice, VulkanError};

/// A command buffer for one-off submissions to the graphics queue, like
/// buffer uploads and image layout transitions.
///
/// The buffer is recording from the moment it is created. Finish with
/// `submit_and_wait`.
pub struct OneTimeSubmitCommandBuffer {
    command_buffer: vk::CommandBuffer,
    command_pool: vk::CommandPool,
    fence: vk::Fence,
    render_device: Arc<RenderDevice>,
}

impl OneTimeSubmitCommandBuffer {
    pub fn new(
        render_device: Arc<RenderDevice>,
    ) -> Result<Self, VulkanError> {
        let command_pool = unsafe {
            let create_info = vk::CommandPoolCreateInfo {
                flags: vk::CommandPoolCreateFlags::TRANSIENT,
                queue_family_index: render_device
                    .graphics_queue()
                    .family_index(),
                ..Default::default()
            };
            render_device.device().create_command_pool(&create_info, None)?
        };

        let command_buffer = unsafe {
            let create_info = vk::CommandBufferAllocateInfo {
                command_pool,
                level: vk::CommandBufferLevel::PRIMARY,
                command_buffer_count: 1,
                ..Default::default()
            };
            render_device.device().allocate_command_buffers(&create_info)?[0]
        };

        let fence = unsafe {
            let create_info = vk::FenceCreateInfo::default();
            render_device.device().create_fence(&create_info, None)?
        };

        unsafe {
            let begin_info = vk::CommandBufferBeginInfo {
                flags: vk::CommandBufferUsageFlags::ONE_TIME_SUBMIT,
                ..Default::default()
            };
            render_device
                .device()
                .begin_command_buffer(command_buffer, &begin_info)?;
        }

        Ok(Self {
            command_buffer,
            command_pool,
            fence,
            render_device,
        })
    }

    /// The raw command buffer handle, currently recording.
    ///
    /// # Safety
    ///
    /// Unsafe because ownership is not transferred and the buffer must only
    /// be finished via `submit_and_wait`.
    pub unsafe fn command_buffer(&self) -> vk::CommandBuffer {
        self.command_buffer
    }

    /// End the command buffer, submit it to the graphics queue, and block
    /// until execution completes.
    pub fn submit_and_wait(self) -> Result<(), VulkanError> {
        let device = self.render_device.device();
        unsafe {
            device.end_command_buffer(self.command_buffer)?;

            let submit_info = vk::SubmitInfo {
                p_command_buffers: &self.command_buffer,
                command_buffer_count: 1,
                ..Default::default()
            };
            device.queue_submit(
                self.render_device.graphics_queue().raw(),
                &[submit_info],
                self.fence,
            )?;
            device.wait_for_fences(&[self.fence], true, u64::MAX)?;
        }
        Ok(())
    }
}

impl Drop for OneTimeSubmitCommandBuffer {
    fn drop(&mut self) {
        unsafe {
            self.render_device.device().destroy_fence(self.fence, None);
            self.render_device
                .device()
                .destroy_command_pool(self.command_pool, None);
        }
    }
}
