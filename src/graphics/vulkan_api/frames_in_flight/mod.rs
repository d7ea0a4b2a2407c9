mod frame;
mod frame_sync;

use std::sync::Arc;

use {anyhow::Context, ash::vk};

use self::frame_sync::FrameSync;
use crate::graphics::{
    vulkan_api::{RenderDevice, Swapchain, SwapchainStatus},
    GraphicsError,
};

pub use self::frame::Frame;

/// The result of a call to FramesInFlight::acquire_frame.
pub enum FrameStatus {
    /// The frame is started and ready for commands.
    FrameStarted(Frame),

    /// No frame could be started because the swapchain needs to be rebuilt.
    SwapchainNeedsRebuild,
}

/// Synchronization for multiple in-flight frames.
///
/// Owns the swapchain and a fixed ring of per-frame resources. Each frame
/// slot walks through the same protocol:
///
/// 1. wait on the slot's fence for the commands submitted N frames ago
/// 2. acquire a swapchain image, signaling the slot's acquire semaphore
/// 3. reset the fence and restart the slot's command buffer
/// 4. the caller records commands
/// 5. submit, waiting on the acquire semaphore at color-attachment output
///    and signaling the render-finished semaphore and the fence
/// 6. present, waiting on the render-finished semaphore
/// 7. advance to the next slot
///
/// When the acquire fails because the swapchain is stale, the slot's fence
/// is left signaled and the cursor does not advance, so the same slot
/// retries cleanly after the rebuild.
pub struct FramesInFlight {
    swapchain_needs_rebuild: bool,
    current_frame: usize,
    frames: Vec<FrameSync>,
    swapchain: Option<Swapchain>,
    render_device: Arc<RenderDevice>,
}

impl FramesInFlight {
    /// Create resources for synchronizing multiple in-flight frames.
    ///
    /// # Params
    ///
    /// * `render_device` - used to create all Vulkan resources
    /// * `framebuffer_size` - the drawable size in pixels, used to create
    ///   the swapchain
    /// * `frame_count` - the number of in-flight frames. Typically 2 or 3.
    pub fn new(
        render_device: Arc<RenderDevice>,
        framebuffer_size: (i32, i32),
        frame_count: usize,
    ) -> Result<Self, GraphicsError> {
        let mut frames = vec![];
        for i in 0..frame_count {
            frames.push(unsafe {
                // SAFE because all frames are kept and destroyed by this
                // struct.
                FrameSync::new(&render_device, i)?
            });
        }

        let (w, h) = framebuffer_size;
        let swapchain = Swapchain::new(
            render_device.clone(),
            (w as u32, h as u32),
            None,
        )?;

        Ok(Self {
            swapchain_needs_rebuild: false,
            current_frame: 0,
            frames,
            swapchain: Some(swapchain),
            render_device,
        })
    }

    /// Wait for every frame's commands to finish executing on the GPU.
    ///
    /// It is an error to call this between `acquire_frame` and
    /// `present_frame`.
    pub fn wait_for_all_frames_to_complete(
        &self,
    ) -> Result<(), GraphicsError> {
        for (index, frame_sync) in self.frames.iter().enumerate() {
            frame_sync
                .wait_for_graphics_commands_to_complete(&self.render_device)
                .with_context(|| {
                    format!(
                        "Error waiting for frame {}'s commands to complete",
                        index
                    )
                })?;
        }
        Ok(())
    }

    /// Wait for every frame to finish executing, idle the device, then
    /// rebuild the swapchain.
    ///
    /// Per-frame sync resources and command buffers are untouched. Resources
    /// which depend on the swapchain images (framebuffers in particular)
    /// must be destroyed before this call and recreated afterwards.
    ///
    /// It is an error to call this between `acquire_frame` and
    /// `present_frame`.
    pub fn stall_and_rebuild_swapchain(
        &mut self,
        framebuffer_size: (i32, i32),
    ) -> Result<(), GraphicsError> {
        self.wait_for_all_frames_to_complete()?;
        self.render_device.wait_idle()?;

        let old_swapchain = self.swapchain.take();
        let (w, h) = framebuffer_size;
        let new_swapchain = Swapchain::new(
            self.render_device.clone(),
            (w as u32, h as u32),
            old_swapchain,
        )?;
        self.swapchain = Some(new_swapchain);

        self.swapchain_needs_rebuild = false;

        Ok(())
    }

    /// Get the current swapchain.
    pub fn swapchain(&self) -> &Swapchain {
        debug_assert!(self.swapchain.is_some());
        self.swapchain.as_ref().unwrap()
    }

    /// Force the swapchain to be rebuilt the next time a frame is requested.
    ///
    /// Useful when it's known that the swapchain is about to go stale, like
    /// when the window is resized.
    pub fn invalidate_swapchain(&mut self) {
        self.swapchain_needs_rebuild = true;
    }

    /// The maximum number of in-flight frames.
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Start the next frame.
    ///
    /// Blocks until the commands this slot submitted previously have
    /// finished executing, then acquires a swapchain image. On success the
    /// slot's command buffer is reset and already recording.
    pub fn acquire_frame(&mut self) -> Result<FrameStatus, GraphicsError> {
        if self.swapchain_needs_rebuild {
            return Ok(FrameStatus::SwapchainNeedsRebuild);
        }

        let frame_sync = self.frames[self.current_frame];

        frame_sync
            .wait_for_graphics_commands_to_complete(&self.render_device)?;

        let status = unsafe {
            self.swapchain().acquire_swapchain_image(
                frame_sync.swapchain_image_acquired_semaphore,
                vk::Fence::null(),
            )?
        };
        let swapchain_image_index = match acquire_action(status) {
            AcquireAction::Proceed {
                swapchain_image_index,
                rebuild_after_present,
            } => {
                if rebuild_after_present {
                    self.swapchain_needs_rebuild = true;
                }
                swapchain_image_index
            }
            AcquireAction::SkipFrame => {
                // The fence stays signaled and the cursor stays put. Nothing
                // will be submitted for this slot, so resetting the fence
                // here would deadlock the next acquire.
                self.swapchain_needs_rebuild = true;
                return Ok(FrameStatus::SwapchainNeedsRebuild);
            }
        };

        frame_sync
            .reset_fence_and_restart_command_buffer(&self.render_device)?;

        let frame = Frame::new(frame_sync, swapchain_image_index);
        Ok(FrameStatus::FrameStarted(frame))
    }

    /// Submit a frame's commands to the graphics queue, schedule the
    /// swapchain image for presentation, and advance to the next frame slot.
    pub fn present_frame(
        &mut self,
        frame: Frame,
    ) -> Result<(), GraphicsError> {
        debug_assert!(frame.frame_index() == self.current_frame);

        let swapchain_image_index = frame.swapchain_image_index();
        let sync = frame.take_sync();
        let device = self.render_device.device();

        unsafe {
            device.end_command_buffer(sync.command_buffer).with_context(
                || {
                    format!(
                        "Error ending graphics command buffer for frame {}",
                        self.current_frame
                    )
                },
            )?;

            let wait_stages =
                [vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT];
            let submit_info = vk::SubmitInfo {
                p_wait_semaphores: &sync.swapchain_image_acquired_semaphore,
                wait_semaphore_count: 1,
                p_wait_dst_stage_mask: wait_stages.as_ptr(),
                p_command_buffers: &sync.command_buffer,
                command_buffer_count: 1,
                p_signal_semaphores: &sync
                    .graphics_commands_completed_semaphore,
                signal_semaphore_count: 1,
                ..Default::default()
            };
            device
                .queue_submit(
                    self.render_device.graphics_queue().raw(),
                    &[submit_info],
                    sync.graphics_commands_completed_fence,
                )
                .with_context(|| {
                    format!(
                        "Error submitting graphics commands for frame {}",
                        self.current_frame
                    )
                })?;
        }

        let status = unsafe {
            self.swapchain()
                .present_swapchain_image(
                    swapchain_image_index,
                    &[sync.graphics_commands_completed_semaphore],
                )
                .with_context(|| {
                    format!(
                        "Error while presenting swapchain image {} for frame {}",
                        swapchain_image_index, self.current_frame,
                    )
                })?
        };
        if !matches!(status, SwapchainStatus::Optimal(_)) {
            self.swapchain_needs_rebuild = true;
        }

        // the commands are submitted and the fence will signal, so it is
        // safe to move on to the next slot
        self.current_frame =
            next_frame_index(self.current_frame, self.frames.len());

        Ok(())
    }
}

impl Drop for FramesInFlight {
    fn drop(&mut self) {
        if let Err(error) = self.wait_for_all_frames_to_complete() {
            log::error!(
                "Error waiting for frames before destruction: {:?}",
                error
            );
        }
        for frame_sync in self.frames.iter_mut() {
            unsafe {
                // SAFE because all submissions were just waited on
                frame_sync.destroy(&self.render_device);
            }
        }
        // the swapchain is dropped by its own Drop impl
    }
}

/// What a frame slot does with the outcome of a swapchain image acquire.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum AcquireAction {
    /// Reset the fence and record commands for the acquired image. When
    /// `rebuild_after_present` is set the image is usable this frame, but
    /// the swapchain must be rebuilt after presentation.
    Proceed {
        swapchain_image_index: usize,
        rebuild_after_present: bool,
    },

    /// Skip the frame entirely. The slot's fence must stay signaled and the
    /// cursor must not advance so the same slot retries after the rebuild.
    SkipFrame,
}

fn acquire_action(status: SwapchainStatus) -> AcquireAction {
    match status {
        SwapchainStatus::Optimal(index) => AcquireAction::Proceed {
            swapchain_image_index: index,
            rebuild_after_present: false,
        },
        SwapchainStatus::Suboptimal(index) => AcquireAction::Proceed {
            swapchain_image_index: index,
            rebuild_after_present: true,
        },
        SwapchainStatus::NeedsRebuild => AcquireAction::SkipFrame,
    }
}

fn next_frame_index(current_frame: usize, frame_count: usize) -> usize {
    (current_frame + 1) % frame_count
}

#[cfg(test)]
mod test {
    use {
        super::{acquire_action, next_frame_index, AcquireAction},
        crate::graphics::vulkan_api::SwapchainStatus,
    };

    #[test]
    fn the_frame_cursor_wraps_around() {
        assert_eq!(next_frame_index(0, 3), 1);
        assert_eq!(next_frame_index(1, 3), 2);
        assert_eq!(next_frame_index(2, 3), 0);
    }

    #[test]
    fn a_single_frame_always_reuses_slot_zero() {
        assert_eq!(next_frame_index(0, 1), 0);
    }

    #[test]
    fn an_optimal_acquire_proceeds_without_a_rebuild() {
        assert_eq!(
            acquire_action(SwapchainStatus::Optimal(2)),
            AcquireAction::Proceed {
                swapchain_image_index: 2,
                rebuild_after_present: false,
            }
        );
    }

    #[test]
    fn a_suboptimal_acquire_uses_the_image_then_rebuilds() {
        assert_eq!(
            acquire_action(SwapchainStatus::Suboptimal(1)),
            AcquireAction::Proceed {
                swapchain_image_index: 1,
                rebuild_after_present: true,
            }
        );
    }

    #[test]
    fn a_stale_acquire_skips_the_frame_and_keeps_the_slot() {
        // SkipFrame leaves the fence signaled and the cursor unchanged. The
        // cursor only ever moves through next_frame_index after a submit, so
        // the same slot handles the retry.
        assert_eq!(
            acquire_action(SwapchainStatus::NeedsRebuild),
            AcquireAction::SkipFrame
        );
    }
}
