//! Just the logic for acquiring and presenting swapchain images.

use {super::Swapchain, crate::graphics::GraphicsError, ash::vk};

/// The outcome of an acquire or present operation.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SwapchainStatus {
    /// Completed the operation with the given swapchain image index.
    Optimal(usize),

    /// Completed the operation, but the swapchain no longer matches the
    /// surface exactly. The image is still usable. Rebuild when convenient.
    Suboptimal(usize),

    /// The operation did not complete and the swapchain must be rebuilt.
    NeedsRebuild,
}

impl Swapchain {
    /// Acquire the next swapchain image.
    ///
    /// # Params
    ///
    /// * `semaphore` - signaled when the acquired image is actually ready
    ///   for rendering.
    ///
    /// # Safety
    ///
    /// The application must handle the NeedsRebuild status by rebuilding the
    /// swapchain before the next acquire.
    pub unsafe fn acquire_swapchain_image(
        &self,
        semaphore: vk::Semaphore,
        fence: vk::Fence,
    ) -> Result<SwapchainStatus, GraphicsError> {
        let result = self.loader.acquire_next_image(
            self.swapchain_khr,
            u64::MAX,
            semaphore,
            fence,
        );
        match result {
            Ok((index, false)) => {
                Ok(SwapchainStatus::Optimal(index as usize))
            }

            // the image was acquired but the swapchain does not match the
            // surface exactly anymore
            Ok((index, true)) => {
                log::debug!("Acquire image: swapchain suboptimal.");
                Ok(SwapchainStatus::Suboptimal(index as usize))
            }

            Err(vk::Result::ERROR_OUT_OF_DATE_KHR) => {
                log::debug!("Acquire image: swapchain lost, needs rebuild.");
                Ok(SwapchainStatus::NeedsRebuild)
            }

            Err(error) => Err(GraphicsError::RuntimeError(
                anyhow::Error::new(error)
                    .context("Unexpected error while acquiring swapchain image"),
            )),
        }
    }

    /// Present a swapchain image to the screen.
    ///
    /// # Safety
    ///
    /// Unsafe because:
    ///   - the application must handle the NeedsRebuild status by rebuilding
    ///     the swapchain
    ///   - the image must have been transitioned to the present layout,
    ///     typically by a render pass.
    pub unsafe fn present_swapchain_image(
        &self,
        index: usize,
        wait_semaphores: &[vk::Semaphore],
    ) -> Result<SwapchainStatus, GraphicsError> {
        let index_u32 = index as u32;
        let present_info = vk::PresentInfoKHR {
            p_wait_semaphores: wait_semaphores.as_ptr(),
            wait_semaphore_count: wait_semaphores.len() as u32,
            p_swapchains: &self.swapchain_khr,
            swapchain_count: 1,
            p_image_indices: &index_u32,
            ..Default::default()
        };
        let result = self
            .loader
            .queue_present(self.render_device.present_queue().raw(), &present_info);
        match result {
            Ok(false) => Ok(SwapchainStatus::Optimal(index)),

            Ok(true) => {
                log::debug!("Present image: swapchain suboptimal.");
                Ok(SwapchainStatus::Suboptimal(index))
            }

            Err(vk::Result::ERROR_OUT_OF_DATE_KHR) => {
                log::debug!("Present image: swapchain lost, needs rebuild.");
                Ok(SwapchainStatus::NeedsRebuild)
            }

            Err(error) => Err(GraphicsError::RuntimeError(
                anyhow::Error::new(error)
                    .context("Unexpected error while presenting swapchain image"),
            )),
        }
    }
}
