use ash::vk;

use crate::{
    graphics::vulkan_api::{
        render_device::{queue_families::QueueFamilies, WindowSurface},
        Instance, VulkanError,
    },
    logging::PrettyList,
};

/// Get the set of required device extensions for this application.
pub fn required_device_extensions() -> Vec<String> {
    let swapchain = ash::extensions::khr::Swapchain::name()
        .to_string_lossy()
        .into_owned();
    vec![swapchain]
}

/// The physical device features this application enables.
pub fn required_device_features() -> vk::PhysicalDeviceFeatures {
    vk::PhysicalDeviceFeatures {
        sampler_anisotropy: vk::TRUE,
        ..Default::default()
    }
}

/// Find the first physical device which can run this application.
pub fn find_optimal_physical_device(
    instance: &Instance,
    window_surface: &WindowSurface,
) -> Result<vk::PhysicalDevice, VulkanError> {
    instance
        .enumerate_physical_devices()?
        .into_iter()
        .find(|device| is_device_suitable(instance, window_surface, device))
        .ok_or(VulkanError::NoSuitableDeviceFound)
}

fn is_device_suitable(
    instance: &Instance,
    window_surface: &WindowSurface,
    physical_device: &vk::PhysicalDevice,
) -> bool {
    if any_missing_extensions(instance, physical_device) {
        return false;
    }

    if QueueFamilies::find_for_physical_device(
        instance,
        window_surface,
        physical_device,
    )
    .is_err()
    {
        log::trace!(
            "Could not find suitable queue families for physical device {:?}",
            physical_device
        );
        return false;
    }

    unsafe {
        if window_surface.supported_formats(physical_device).is_empty() {
            log::trace!(
                "No supported format could be found for physical device {:?}",
                physical_device
            );
            return false;
        }

        if window_surface
            .supported_presentation_modes(physical_device)
            .is_empty()
        {
            log::trace!(
                "No presentation modes could be found for physical device {:?}",
                physical_device
            );
            return false;
        }
    }

    let features = instance.get_physical_device_features(physical_device);
    if features.sampler_anisotropy != vk::TRUE {
        log::trace!(
            "Sampler anisotropy is unsupported by physical device {:?}",
            physical_device
        );
        return false;
    }

    true
}

/// Check that all required device extensions are available.
/// Returns true if there are any required device extensions that are not
/// available.
fn any_missing_extensions(
    instance: &Instance,
    physical_device: &vk::PhysicalDevice,
) -> bool {
    let available_device_extensions: Vec<String> = instance
        .enumerate_device_extension_properties(physical_device)
        .iter()
        .map(|extension| {
            String::from_utf8(
                extension
                    .extension_name
                    .iter()
                    .take_while(|&&c| c != 0)
                    .map(|&c| c as u8)
                    .collect(),
            )
        })
        .filter_map(|item| item.ok())
        .collect();

    log::trace!(
        "Available physical device extensions: {}",
        PrettyList(&available_device_extensions),
    );

    required_device_extensions().iter().any(|required_name| {
        let is_missing = !available_device_extensions
            .iter()
            .any(|name| name.contains(required_name));
        if is_missing {
            log::trace!("Device extension {} is not available", required_name);
        }
        is_missing
    })
}
