//! The windowed application: owns the GLFW window, the render device, the
//! in-flight frames, and the scene, and drives them all from the main loop.

mod glfw_window;

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::{
    graphics::vulkan_api::{FrameStatus, FramesInFlight, RenderDevice},
    scene::SceneRenderer,
    timing::FrameRateLimit,
};

pub use self::glfw_window::{EventReceiver, GlfwWindow, WindowError};

/// The number of frames which can be in flight simultaneously.
const FRAMES_IN_FLIGHT_COUNT: usize = 3;

/// The main application state.
///
/// Fields are declared in drop order: the scene's framebuffers must go
/// before the swapchain, and everything Vulkan must go before the window.
pub struct Application {
    frame_rate_limit: FrameRateLimit,
    scene: SceneRenderer,
    frames_in_flight: FramesInFlight,

    // kept so the device outlives every wrapper the application owns
    _render_device: Arc<RenderDevice>,

    event_receiver: Option<EventReceiver>,
    window: GlfwWindow,
}

impl Application {
    /// Create the window and all of the Vulkan resources needed to draw the
    /// scene into it.
    pub fn new(window_title: &str) -> Result<Self> {
        let mut window = GlfwWindow::new(window_title)?;
        let event_receiver = window.take_event_receiver()?;

        let render_device = window
            .create_render_device()
            .context("Unable to create the render device")?;

        let frames_in_flight = FramesInFlight::new(
            render_device.clone(),
            window.get_framebuffer_size(),
            FRAMES_IN_FLIGHT_COUNT,
        )
        .context("Unable to create the application's frames in flight")?;

        let scene = SceneRenderer::new(&render_device, &frames_in_flight)
            .context("Unable to create the scene renderer")?;

        Ok(Self {
            frame_rate_limit: FrameRateLimit::new(120, 30),
            scene,
            frames_in_flight,
            _render_device: render_device,
            event_receiver: Some(event_receiver),
            window,
        })
    }

    /// Run the application, blocking until the main event loop exits.
    pub fn run(mut self) -> Result<()> {
        let event_receiver = self
            .event_receiver
            .take()
            .context("The event receiver is missing")?;

        while !self.window.should_close() {
            self.frame_rate_limit.start_frame();
            for (_, event) in self.window.flush_window_events(&event_receiver)
            {
                self.handle_event(event)?;
            }
            self.draw_frame()?;
            self.frame_rate_limit.sleep_to_limit();
        }

        // Up to frame_count frames can still be executing when the loop
        // exits. Drain them before drop impls start destroying the
        // resources their commands reference.
        self.frames_in_flight
            .wait_for_all_frames_to_complete()
            .context("Error waiting for all frames at shutdown")?;

        log::debug!(
            "Average frame time at exit: {:?}",
            self.frame_rate_limit.avg_frame_time()
        );

        Ok(())
    }

    fn handle_event(&mut self, event: glfw::WindowEvent) -> Result<()> {
        use glfw::{Action, Key, WindowEvent};
        match event {
            WindowEvent::Close
            | WindowEvent::Key(Key::Escape, _, Action::Press, _) => {
                self.window.set_should_close(true);
            }
            WindowEvent::FramebufferSize(_, _) => {
                // the swapchain would go stale on its own, but reacting to
                // the event avoids presenting a stretched frame first
                self.frames_in_flight.invalidate_swapchain();
            }
            _ => (),
        }
        Ok(())
    }

    /// Acquire a frame, record the scene's commands, and present it.
    ///
    /// When the swapchain is stale, rebuild it and skip drawing. The next
    /// pass through the main loop retries with the fresh swapchain.
    fn draw_frame(&mut self) -> Result<()> {
        let frame = match self.frames_in_flight.acquire_frame()? {
            FrameStatus::FrameStarted(frame) => frame,
            FrameStatus::SwapchainNeedsRebuild => {
                return self.rebuild_swapchain();
            }
        };

        self.scene.update(frame.frame_index())?;
        self.scene.record_commands(&frame);

        self.frames_in_flight
            .present_frame(frame)
            .context("Unable to present the frame")?;
        Ok(())
    }

    fn rebuild_swapchain(&mut self) -> Result<()> {
        let framebuffer_size = self.window.wait_for_valid_framebuffer_size();

        // Submitted frames can still reference the framebuffers, so the GPU
        // must drain before anything is destroyed.
        self.frames_in_flight
            .wait_for_all_frames_to_complete()
            .context("Error waiting for all frames before the rebuild")?;

        // Framebuffers hold views of the old swapchain's images, so they
        // must be destroyed before the swapchain is replaced.
        self.scene.release_swapchain_resources();

        self.frames_in_flight
            .stall_and_rebuild_swapchain(framebuffer_size)
            .context("Unable to rebuild the swapchain")?;

        self.scene
            .rebuild_swapchain_resources(self.frames_in_flight.swapchain())
            .context("Unable to rebuild the scene's swapchain resources")?;

        Ok(())
    }
}
