use std::sync::Arc;

use ash::vk;
use thiserror::Error;

use crate::graphics::vulkan_api::{Instance, RenderDevice, VulkanError};

/// Things which can go wrong while creating and manipulating GLFW windows.
#[derive(Debug, Error)]
pub enum WindowError {
    #[error("Failed to initialize the GLFW library")]
    UnableToInitGLFW(#[from] glfw::InitError),

    #[error("Vulkan is not supported by GLFW on this platform")]
    VulkanNotSupported,

    #[error("The GLFW window could not be created")]
    WindowCreateFailed,

    #[error("The window's event receiver has already been taken")]
    EventReceiverLost,

    #[error(
        "GLFW is unable to determine the required Vulkan extensions for \
         this platform"
    )]
    RequiredExtensionsUnavailable,

    #[error("Unable to create the Vulkan window surface {:?}", .0)]
    UnableToCreateSurface(#[source] vk::Result),

    #[error(transparent)]
    UnexpectedVulkanError(#[from] VulkanError),
}

/// GLFW uses a receiver for accepting window events. This type alias is more
/// convenient to write and read than the full name.
pub type EventReceiver = glfw::GlfwReceiver<(f64, glfw::WindowEvent)>;

/// All of the GLFW resources required for managing a single-windowed
/// application.
///
/// GlfwWindow derefs as the underlying window handle so application code can
/// configure the window however is convenient.
pub struct GlfwWindow {
    window_handle: glfw::PWindow,
    event_receiver: Option<EventReceiver>,
    glfw: glfw::Glfw,
}

impl GlfwWindow {
    /// Initialize the GLFW library and create a new window.
    ///
    /// The window starts in "windowed" mode with key, close, and framebuffer
    /// size events enabled.
    pub fn new(window_title: &str) -> Result<Self, WindowError> {
        let mut glfw = glfw::init(glfw::fail_on_errors)?;

        if !glfw.vulkan_supported() {
            return Err(WindowError::VulkanNotSupported);
        }

        // Tell GLFW not to bother setting up the OpenGL API
        glfw.window_hint(glfw::WindowHint::ClientApi(
            glfw::ClientApiHint::NoApi,
        ));

        let (mut window_handle, event_receiver) = glfw
            .create_window(
                1366,
                768,
                window_title,
                glfw::WindowMode::Windowed,
            )
            .ok_or(WindowError::WindowCreateFailed)?;

        window_handle.set_key_polling(true);
        window_handle.set_close_polling(true);
        window_handle.set_framebuffer_size_polling(true);

        Ok(Self {
            window_handle,
            event_receiver: Some(event_receiver),
            glfw,
        })
    }

    /// Take ownership of this window's event receiver. The receiver can then
    /// be used to flush window events.
    pub fn take_event_receiver(
        &mut self,
    ) -> Result<EventReceiver, WindowError> {
        self.event_receiver
            .take()
            .ok_or(WindowError::EventReceiverLost)
    }

    /// Poll GLFW for window events and flush them out into an iterator.
    pub fn flush_window_events<'events>(
        &mut self,
        event_receiver: &'events EventReceiver,
    ) -> glfw::FlushedMessages<'events, (f64, glfw::WindowEvent)> {
        self.glfw.poll_events();
        glfw::flush_messages(event_receiver)
    }

    /// Block until the window has a non-zero drawable size.
    ///
    /// A zero-sized framebuffer cannot back a swapchain. This happens when
    /// the window is minimized, so sleep until events indicate the window
    /// is restored.
    pub fn wait_for_valid_framebuffer_size(&mut self) -> (i32, i32) {
        let (mut width, mut height) =
            self.window_handle.get_framebuffer_size();
        while width == 0 || height == 0 {
            log::info!("Waiting for a nonzero framebuffer size");
            self.glfw.wait_events();
            (width, height) = self.window_handle.get_framebuffer_size();
        }
        (width, height)
    }

    /// Create the Vulkan instance, surface, and render device for the
    /// current window.
    pub fn create_render_device(
        &self,
    ) -> Result<Arc<RenderDevice>, WindowError> {
        let required_extensions = self
            .glfw
            .get_required_instance_extensions()
            .ok_or(WindowError::RequiredExtensionsUnavailable)?;
        let instance = Instance::new(&required_extensions)?;

        let mut surface = vk::SurfaceKHR::null();
        let result = self.window_handle.create_window_surface(
            instance.ash().handle(),
            std::ptr::null(),
            &mut surface,
        );
        if result != vk::Result::SUCCESS {
            return Err(WindowError::UnableToCreateSurface(result));
        }

        let render_device = RenderDevice::new(instance, surface)?;
        Ok(Arc::new(render_device))
    }
}

impl std::ops::Deref for GlfwWindow {
    type Target = glfw::PWindow;

    fn deref(&self) -> &Self::Target {
        &self.window_handle
    }
}

impl std::ops::DerefMut for GlfwWindow {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.window_handle
    }
}
