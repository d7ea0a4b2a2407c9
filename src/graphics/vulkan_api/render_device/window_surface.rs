use ash::{extensions::khr, vk};

use crate::graphics::vulkan_api::{Instance, VulkanError};

/// The surface targeted by this application and the Ash extension loader
/// which provides access to KHR surface functions.
pub struct WindowSurface {
    surface: vk::SurfaceKHR,
    surface_loader: khr::Surface,
}

impl WindowSurface {
    /// Take ownership of a surface created by the windowing system.
    pub fn new(instance: &Instance, surface: vk::SurfaceKHR) -> Self {
        let surface_loader =
            khr::Surface::new(instance.entry(), instance.ash());
        Self {
            surface,
            surface_loader,
        }
    }

    /// The raw surface handle.
    ///
    /// # Safety
    ///
    /// Unsafe because ownership is not transferred.
    pub unsafe fn surface_khr(&self) -> vk::SurfaceKHR {
        self.surface
    }

    /// Check whether a queue family on the device can present to this
    /// surface.
    ///
    /// # Safety
    ///
    /// Unsafe because the physical device must belong to the instance which
    /// created this surface.
    pub unsafe fn get_physical_device_surface_support(
        &self,
        physical_device: &vk::PhysicalDevice,
        queue_family_index: u32,
    ) -> Result<bool, VulkanError> {
        let supported = self.surface_loader.get_physical_device_surface_support(
            *physical_device,
            queue_family_index,
            self.surface,
        )?;
        Ok(supported)
    }

    /// All surface formats the device supports for this surface. Returns an
    /// empty vector if the query fails.
    ///
    /// # Safety
    ///
    /// Unsafe because the physical device must belong to the instance which
    /// created this surface.
    pub unsafe fn supported_formats(
        &self,
        physical_device: &vk::PhysicalDevice,
    ) -> Vec<vk::SurfaceFormatKHR> {
        self.surface_loader
            .get_physical_device_surface_formats(
                *physical_device,
                self.surface,
            )
            .unwrap_or_default()
    }

    /// All presentation modes the device supports for this surface. Returns
    /// an empty vector if the query fails.
    ///
    /// # Safety
    ///
    /// Unsafe because the physical device must belong to the instance which
    /// created this surface.
    pub unsafe fn supported_presentation_modes(
        &self,
        physical_device: &vk::PhysicalDevice,
    ) -> Vec<vk::PresentModeKHR> {
        self.surface_loader
            .get_physical_device_surface_present_modes(
                *physical_device,
                self.surface,
            )
            .unwrap_or_default()
    }

    /// The current surface capabilities. These change when the window is
    /// resized, so they are re-queried on every swapchain rebuild.
    ///
    /// # Safety
    ///
    /// Unsafe because the physical device must belong to the instance which
    /// created this surface.
    pub unsafe fn capabilities(
        &self,
        physical_device: &vk::PhysicalDevice,
    ) -> Result<vk::SurfaceCapabilitiesKHR, VulkanError> {
        self.surface_loader
            .get_physical_device_surface_capabilities(
                *physical_device,
                self.surface,
            )
            .map_err(VulkanError::UnableToGetSurfaceCapabilities)
    }

    /// Destroy the surface.
    ///
    /// # Safety
    ///
    /// Unsafe because the surface must not be in use by any swapchain and
    /// must be destroyed before the instance.
    pub unsafe fn destroy(&mut self) {
        self.surface_loader.destroy_surface(self.surface, None);
    }
}
