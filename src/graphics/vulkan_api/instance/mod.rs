mod debug_callback;
mod extensions;
mod layers;

use ash::{extensions::ext::DebugUtils, vk};

use crate::{
    graphics::vulkan_api::{ffi::to_os_ptrs, VulkanError},
    logging::PrettyList,
};

/// The Vulkan library instance, the validation layer debug messenger, and
/// instance-level query functions.
pub struct Instance {
    debug_messenger: vk::DebugUtilsMessengerEXT,
    debug: DebugUtils,
    entry: ash::Entry,
    ash: ash::Instance,
}

impl Instance {
    /// Create a new instance with the given extensions enabled.
    ///
    /// `required_extensions` is typically the set of extensions the window
    /// system needs for presentation. The debug utils extension is added
    /// automatically.
    pub fn new(required_extensions: &[String]) -> Result<Self, VulkanError> {
        let (ash, entry) = create_instance(required_extensions)?;
        let (debug, debug_messenger) =
            debug_callback::create_debug_logger(&entry, &ash)?;
        Ok(Self {
            debug_messenger,
            debug,
            entry,
            ash,
        })
    }

    pub fn ash(&self) -> &ash::Instance {
        &self.ash
    }

    pub fn entry(&self) -> &ash::Entry {
        &self.entry
    }

    /// List every physical device available to this instance.
    pub fn enumerate_physical_devices(
        &self,
    ) -> Result<Vec<vk::PhysicalDevice>, VulkanError> {
        unsafe {
            self.ash
                .enumerate_physical_devices()
                .map_err(VulkanError::UnableToEnumeratePhysicalDevices)
        }
    }

    pub fn get_physical_device_properties(
        &self,
        physical_device: &vk::PhysicalDevice,
    ) -> vk::PhysicalDeviceProperties {
        unsafe { self.ash.get_physical_device_properties(*physical_device) }
    }

    pub fn get_physical_device_features(
        &self,
        physical_device: &vk::PhysicalDevice,
    ) -> vk::PhysicalDeviceFeatures {
        unsafe { self.ash.get_physical_device_features(*physical_device) }
    }

    pub fn get_physical_device_memory_properties(
        &self,
        physical_device: &vk::PhysicalDevice,
    ) -> vk::PhysicalDeviceMemoryProperties {
        unsafe {
            self.ash
                .get_physical_device_memory_properties(*physical_device)
        }
    }

    pub fn get_physical_device_queue_family_properties(
        &self,
        physical_device: &vk::PhysicalDevice,
    ) -> Vec<vk::QueueFamilyProperties> {
        unsafe {
            self.ash
                .get_physical_device_queue_family_properties(*physical_device)
        }
    }

    pub fn get_physical_device_format_properties(
        &self,
        physical_device: &vk::PhysicalDevice,
        format: vk::Format,
    ) -> vk::FormatProperties {
        unsafe {
            self.ash
                .get_physical_device_format_properties(*physical_device, format)
        }
    }

    pub fn enumerate_device_extension_properties(
        &self,
        physical_device: &vk::PhysicalDevice,
    ) -> Vec<vk::ExtensionProperties> {
        unsafe {
            self.ash
                .enumerate_device_extension_properties(*physical_device)
                .unwrap_or_default()
        }
    }

    /// Create the logical device with the given extensions, features, and
    /// queues enabled.
    pub fn create_logical_device(
        &self,
        physical_device: &vk::PhysicalDevice,
        device_extensions: &[String],
        enabled_features: &vk::PhysicalDeviceFeatures,
        queue_create_infos: &[vk::DeviceQueueCreateInfo],
    ) -> Result<ash::Device, VulkanError> {
        log::debug!(
            "Required device extensions: {}",
            PrettyList(device_extensions)
        );

        let (_extension_names, extension_ptrs) =
            unsafe { to_os_ptrs(device_extensions) };

        let create_info = vk::DeviceCreateInfo {
            p_queue_create_infos: queue_create_infos.as_ptr(),
            queue_create_info_count: queue_create_infos.len() as u32,
            pp_enabled_extension_names: extension_ptrs.as_ptr(),
            enabled_extension_count: extension_ptrs.len() as u32,
            p_enabled_features: enabled_features,
            ..Default::default()
        };

        unsafe {
            self.ash
                .create_device(*physical_device, &create_info, None)
                .map_err(VulkanError::UnableToCreateLogicalDevice)
        }
    }

    /// Give a debug name to a Vulkan object. Names set here are visible in
    /// validation layer messages.
    pub fn debug_utils_set_object_name(
        &self,
        logical_device: &ash::Device,
        name_info: &vk::DebugUtilsObjectNameInfoEXT,
    ) {
        let result = unsafe {
            self.debug
                .set_debug_utils_object_name(logical_device.handle(), name_info)
        };
        if let Err(error) = result {
            log::warn!("Unable to set debug name for object: {:?}", error);
        }
    }
}

impl Drop for Instance {
    fn drop(&mut self) {
        unsafe {
            self.debug
                .destroy_debug_utils_messenger(self.debug_messenger, None);
            self.ash.destroy_instance(None);
        }
    }
}

fn debug_layers() -> Vec<String> {
    vec!["VK_LAYER_KHRONOS_validation".to_owned()]
}

fn create_instance(
    required_extensions: &[String],
) -> Result<(ash::Instance, ash::Entry), VulkanError> {
    use std::ffi::CString;

    let entry = ash::Entry::linked();

    let mut required_with_debug = Vec::new();
    required_with_debug.extend_from_slice(required_extensions);
    required_with_debug.push(
        DebugUtils::name()
            .to_str()
            .map_err(VulkanError::InvalidDebugLayerName)?
            .to_owned(),
    );

    extensions::check_extensions(&entry, &required_with_debug)?;
    layers::check_layers(&entry, &debug_layers())?;

    log::debug!("Required Extensions: {}", PrettyList(&required_with_debug));

    let app_name = CString::new("spindrift").unwrap();
    let engine_name = CString::new("no engine").unwrap();

    let app_info = vk::ApplicationInfo {
        p_engine_name: engine_name.as_ptr(),
        p_application_name: app_name.as_ptr(),
        application_version: vk::make_api_version(0, 1, 0, 0),
        engine_version: vk::make_api_version(0, 1, 0, 0),
        api_version: vk::make_api_version(0, 1, 2, 0),
        ..Default::default()
    };

    let (_layer_names, layer_ptrs) = unsafe { to_os_ptrs(&debug_layers()) };
    let (_ext_names, ext_ptrs) = unsafe { to_os_ptrs(&required_with_debug) };

    let create_info = vk::InstanceCreateInfo {
        p_application_info: &app_info,
        pp_enabled_layer_names: layer_ptrs.as_ptr(),
        enabled_layer_count: layer_ptrs.len() as u32,
        pp_enabled_extension_names: ext_ptrs.as_ptr(),
        enabled_extension_count: ext_ptrs.len() as u32,
        ..Default::default()
    };

    let instance = unsafe {
        entry
            .create_instance(&create_info, None)
            .map_err(VulkanError::UnableToCreateInstance)?
    };

    Ok((instance, entry))
}
