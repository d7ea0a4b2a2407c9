mod device_queue;
mod memory;
mod physical_device;
mod queue_families;
mod window_surface;

use ash::vk;

use self::queue_families::QueueFamilies;
use crate::graphics::vulkan_api::{Instance, VulkanError};

pub(crate) use self::window_surface::WindowSurface;

pub use self::{device_queue::DeviceQueue, memory::Allocation};

/// The Vulkan logical device, the queues used for rendering and presentation,
/// and the surface being presented to.
///
/// Most Vulkan objects in this crate hold an `Arc<RenderDevice>` so that the
/// device reliably outlives the resources it created.
pub struct RenderDevice {
    graphics_queue: DeviceQueue,
    present_queue: DeviceQueue,
    memory_properties: vk::PhysicalDeviceMemoryProperties,
    physical_device: vk::PhysicalDevice,
    logical_device: ash::Device,
    window_surface: WindowSurface,
    instance: Instance,
}

impl RenderDevice {
    /// Pick a physical device and create the logical device and queues for
    /// this application.
    pub fn new(
        instance: Instance,
        surface_khr: vk::SurfaceKHR,
    ) -> Result<Self, VulkanError> {
        let window_surface = WindowSurface::new(&instance, surface_khr);
        let physical_device = physical_device::find_optimal_physical_device(
            &instance,
            &window_surface,
        )?;
        let queue_families = QueueFamilies::find_for_physical_device(
            &instance,
            &window_surface,
            &physical_device,
        )?;
        let logical_device = instance.create_logical_device(
            &physical_device,
            &physical_device::required_device_extensions(),
            &physical_device::required_device_features(),
            &queue_families.as_queue_create_infos(),
        )?;
        let (graphics_queue, present_queue) =
            queue_families.get_queues(&logical_device);

        let properties =
            instance.get_physical_device_properties(&physical_device);
        let device_name = unsafe {
            std::ffi::CStr::from_ptr(properties.device_name.as_ptr())
                .to_string_lossy()
                .into_owned()
        };
        log::info!("Using device: {}", device_name);

        let memory_properties =
            instance.get_physical_device_memory_properties(&physical_device);

        Ok(Self {
            graphics_queue,
            present_queue,
            memory_properties,
            physical_device,
            logical_device,
            window_surface,
            instance,
        })
    }

    /// The Ash logical device handle.
    pub fn device(&self) -> &ash::Device {
        &self.logical_device
    }

    pub fn graphics_queue(&self) -> &DeviceQueue {
        &self.graphics_queue
    }

    pub fn present_queue(&self) -> &DeviceQueue {
        &self.present_queue
    }

    /// Block until every queue on the device has finished all pending work.
    pub fn wait_idle(&self) -> Result<(), VulkanError> {
        unsafe { self.logical_device.device_wait_idle()? };
        Ok(())
    }

    /// Create an Ash extension loader for swapchain functions.
    pub fn create_swapchain_loader(&self) -> ash::extensions::khr::Swapchain {
        ash::extensions::khr::Swapchain::new(
            self.instance.ash(),
            &self.logical_device,
        )
    }

    /// The raw surface being presented to.
    ///
    /// # Safety
    ///
    /// Unsafe because ownership is not transferred. The surface is destroyed
    /// when the RenderDevice is dropped.
    pub unsafe fn surface_khr(&self) -> vk::SurfaceKHR {
        self.window_surface.surface_khr()
    }

    pub fn supported_surface_formats(&self) -> Vec<vk::SurfaceFormatKHR> {
        unsafe {
            self.window_surface.supported_formats(&self.physical_device)
        }
    }

    pub fn supported_presentation_modes(&self) -> Vec<vk::PresentModeKHR> {
        unsafe {
            self.window_surface
                .supported_presentation_modes(&self.physical_device)
        }
    }

    pub fn surface_capabilities(
        &self,
    ) -> Result<vk::SurfaceCapabilitiesKHR, VulkanError> {
        unsafe { self.window_surface.capabilities(&self.physical_device) }
    }

    /// The distinct queue family indices which access swapchain images.
    pub fn swapchain_queue_family_indices(&self) -> Vec<u32> {
        let graphics = self.graphics_queue.family_index();
        let present = self.present_queue.family_index();
        if graphics == present {
            vec![graphics]
        } else {
            vec![graphics, present]
        }
    }

    /// Find the first candidate format which supports the requested features
    /// with the given tiling.
    pub fn find_supported_format(
        &self,
        candidates: &[vk::Format],
        tiling: vk::ImageTiling,
        features: vk::FormatFeatureFlags,
    ) -> Result<vk::Format, VulkanError> {
        candidates
            .iter()
            .copied()
            .find(|&format| {
                let properties = self
                    .instance
                    .get_physical_device_format_properties(
                        &self.physical_device,
                        format,
                    );
                match tiling {
                    vk::ImageTiling::LINEAR => {
                        properties.linear_tiling_features.contains(features)
                    }
                    _ => properties.optimal_tiling_features.contains(features),
                }
            })
            .ok_or_else(|| VulkanError::NoSupportedFormat {
                formats: candidates.to_vec(),
                tiling,
                features,
            })
    }

    /// Allocate a chunk of device memory that satisfies the given
    /// requirements.
    ///
    /// # Safety
    ///
    /// Unsafe because the allocation is not freed automatically. The caller
    /// must pair every allocation with a call to `free_memory`.
    pub unsafe fn allocate_memory(
        &self,
        memory_requirements: vk::MemoryRequirements,
        property_flags: vk::MemoryPropertyFlags,
    ) -> Result<Allocation, VulkanError> {
        let memory_type_index = memory::find_memory_type_index(
            &memory_requirements,
            &self.memory_properties,
            property_flags,
        )
        .ok_or(VulkanError::NoSuitableMemoryType(property_flags))?;

        let allocate_info = vk::MemoryAllocateInfo {
            allocation_size: memory_requirements.size,
            memory_type_index,
            ..Default::default()
        };
        let device_memory = self
            .logical_device
            .allocate_memory(&allocate_info, None)
            .map_err(VulkanError::UnableToAllocateDeviceMemory)?;

        Ok(Allocation::new(
            device_memory,
            memory_requirements.size,
            memory_type_index,
        ))
    }

    /// Free a memory allocation.
    ///
    /// # Safety
    ///
    /// Unsafe because the caller must ensure the device no longer uses the
    /// memory and that no mapped pointers into the allocation remain.
    pub unsafe fn free_memory(&self, allocation: &Allocation) {
        self.logical_device
            .free_memory(allocation.device_memory(), None);
    }

    /// Give a debug name for a Vulkan object owned by this device. The name
    /// set here will be visible in the Vulkan validation layer logs.
    pub fn name_vulkan_object<Name, Handle>(
        &self,
        name: Name,
        object_type: vk::ObjectType,
        handle: Handle,
    ) where
        Name: Into<String>,
        Handle: vk::Handle + Copy,
    {
        let owned_name = name.into();
        let Ok(cname) = std::ffi::CString::new(owned_name) else {
            return;
        };
        let name_info = vk::DebugUtilsObjectNameInfoEXT {
            object_type,
            p_object_name: cname.as_ptr(),
            object_handle: handle.as_raw(),
            ..Default::default()
        };
        self.instance
            .debug_utils_set_object_name(&self.logical_device, &name_info);
    }
}

impl Drop for RenderDevice {
    fn drop(&mut self) {
        unsafe {
            self.logical_device
                .device_wait_idle()
                .expect("Error while idling the device before destruction!");
            self.logical_device.destroy_device(None);
            self.window_surface.destroy();
        }
    }
}
