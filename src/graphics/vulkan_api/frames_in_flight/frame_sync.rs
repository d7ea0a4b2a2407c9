use {
    crate::graphics::{vulkan_api::RenderDevice, GraphicsError},
    anyhow::Context,
    ash::vk,
};

/// All of the per-frame synchronization resources.
///
/// Each in-flight frame owns two binary semaphores, a fence, and a transient
/// command pool with a single primary command buffer. These live for the
/// whole application run; only the swapchain and its dependents are
/// recreated on resize.
#[derive(Copy, Clone, Debug)]
pub(super) struct FrameSync {
    pub(super) index: usize,
    pub(super) command_buffer: vk::CommandBuffer,
    pub(super) command_pool: vk::CommandPool,
    pub(super) swapchain_image_acquired_semaphore: vk::Semaphore,
    pub(super) graphics_commands_completed_semaphore: vk::Semaphore,
    pub(super) graphics_commands_completed_fence: vk::Fence,
}

impl FrameSync {
    /// Create synchronization resources for a single in-flight frame.
    ///
    /// The fence starts signaled so the first wait on this slot returns
    /// immediately.
    ///
    /// # Safety
    ///
    /// Unsafe because all resources must be destroyed before the device.
    pub unsafe fn new(
        render_device: &RenderDevice,
        index: usize,
    ) -> Result<Self, GraphicsError> {
        let swapchain_image_acquired_semaphore = {
            let create_info = vk::SemaphoreCreateInfo::default();
            render_device
                .device()
                .create_semaphore(&create_info, None)
                .with_context(|| {
                    format!("Unable to create semaphore for frame {}", index)
                })?
        };
        render_device.name_vulkan_object(
            format!("Frame {} Swapchain Image Acquired", index),
            vk::ObjectType::SEMAPHORE,
            swapchain_image_acquired_semaphore,
        );

        let graphics_commands_completed_semaphore = {
            let create_info = vk::SemaphoreCreateInfo::default();
            render_device
                .device()
                .create_semaphore(&create_info, None)
                .with_context(|| {
                    format!("Unable to create semaphore for frame {}", index)
                })?
        };
        render_device.name_vulkan_object(
            format!("Frame {} Graphics Commands Completed", index),
            vk::ObjectType::SEMAPHORE,
            graphics_commands_completed_semaphore,
        );

        let graphics_commands_completed_fence = {
            let create_info = vk::FenceCreateInfo {
                flags: vk::FenceCreateFlags::SIGNALED,
                ..Default::default()
            };
            render_device
                .device()
                .create_fence(&create_info, None)
                .with_context(|| {
                    format!("Unable to create fence for frame {}", index)
                })?
        };
        render_device.name_vulkan_object(
            format!("Frame {} Graphics Commands Completed", index),
            vk::ObjectType::FENCE,
            graphics_commands_completed_fence,
        );

        let command_pool = {
            let create_info = vk::CommandPoolCreateInfo {
                flags: vk::CommandPoolCreateFlags::TRANSIENT,
                queue_family_index: render_device
                    .graphics_queue()
                    .family_index(),
                ..Default::default()
            };
            render_device
                .device()
                .create_command_pool(&create_info, None)
                .with_context(|| {
                    format!("Unable to create command pool for frame {}", index)
                })?
        };
        render_device.name_vulkan_object(
            format!("Frame {} Command Pool", index),
            vk::ObjectType::COMMAND_POOL,
            command_pool,
        );

        let command_buffer = {
            let create_info = vk::CommandBufferAllocateInfo {
                command_pool,
                level: vk::CommandBufferLevel::PRIMARY,
                command_buffer_count: 1,
                ..Default::default()
            };
            render_device
                .device()
                .allocate_command_buffers(&create_info)
                .with_context(|| {
                    format!(
                        "Unable to allocate command buffer for frame {}",
                        index
                    )
                })?[0]
        };
        render_device.name_vulkan_object(
            format!("Frame {} Command Buffer", index),
            vk::ObjectType::COMMAND_BUFFER,
            command_buffer,
        );

        Ok(Self {
            index,
            command_buffer,
            command_pool,
            swapchain_image_acquired_semaphore,
            graphics_commands_completed_semaphore,
            graphics_commands_completed_fence,
        })
    }

    /// Block until this frame's last graphics command submission completes.
    ///
    /// The wait is unbounded. A device which never signals the fence hangs
    /// the calling thread.
    pub fn wait_for_graphics_commands_to_complete(
        &self,
        render_device: &RenderDevice,
    ) -> Result<(), GraphicsError> {
        unsafe {
            render_device
                .device()
                .wait_for_fences(
                    &[self.graphics_commands_completed_fence],
                    true,
                    u64::MAX,
                )
                .context(
                    "Error while waiting for graphics commands to complete",
                )?
        }
        Ok(())
    }

    /// Reset this frame's fence, then reset the command pool and restart the
    /// command buffer.
    ///
    /// This must only be called once the frame is certain to be submitted.
    /// Resetting the fence and then skipping the submit leaves the next wait
    /// on this slot blocked forever.
    pub fn reset_fence_and_restart_command_buffer(
        &self,
        render_device: &RenderDevice,
    ) -> Result<(), GraphicsError> {
        unsafe {
            // SAFE because the caller waits for the previous submission
            // before resetting resources.
            render_device
                .device()
                .reset_fences(&[self.graphics_commands_completed_fence])
                .with_context(|| {
                    format!(
                        "Could not reset graphics completed fence for frame {}",
                        self.index
                    )
                })?;
            render_device
                .device()
                .reset_command_pool(
                    self.command_pool,
                    vk::CommandPoolResetFlags::empty(),
                )
                .with_context(|| {
                    format!(
                        "Could not reset command pool for frame {}",
                        self.index
                    )
                })?;
            let begin_info = vk::CommandBufferBeginInfo {
                flags: vk::CommandBufferUsageFlags::ONE_TIME_SUBMIT,
                ..Default::default()
            };
            render_device
                .device()
                .begin_command_buffer(self.command_buffer, &begin_info)
                .with_context(|| {
                    format!(
                        "Could not begin command buffer for frame {}",
                        self.index
                    )
                })?;
        }
        Ok(())
    }

    /// Destroy all resources used by this frame.
    ///
    /// # Safety
    ///
    /// Unsafe because the caller must wait for all graphics commands which
    /// reference this frame to complete first.
    pub unsafe fn destroy(&mut self, render_device: &RenderDevice) {
        render_device
            .device()
            .destroy_command_pool(self.command_pool, None);
        render_device
            .device()
            .destroy_semaphore(self.swapchain_image_acquired_semaphore, None);
        render_device.device().destroy_semaphore(
            self.graphics_commands_completed_semaphore,
            None,
        );
        render_device
            .device()
            .destroy_fence(self.graphics_commands_completed_fence, None);
    }
}
