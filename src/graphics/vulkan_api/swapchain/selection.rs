//! Decision logic for swapchain creation parameters.
//!
//! These functions are total over their inputs so the policy can be tested
//! without a live Vulkan device.

use ash::vk;

use crate::graphics::vulkan_api::{RenderDevice, VulkanError};

/// Pick the surface format for the swapchain.
///
/// Prefers B8G8R8A8 with sRGB nonlinear color, falling back to the first
/// reported format.
pub fn choose_surface_format(
    formats: &[vk::SurfaceFormatKHR],
) -> vk::SurfaceFormatKHR {
    formats
        .iter()
        .copied()
        .find(|format| {
            format.color_space == vk::ColorSpaceKHR::SRGB_NONLINEAR
                && format.format == vk::Format::B8G8R8A8_SRGB
        })
        .unwrap_or_else(|| formats[0])
}

/// Pick the presentation mode. Mailbox when available, otherwise FIFO which
/// Vulkan guarantees to be supported.
pub fn choose_present_mode(
    modes: &[vk::PresentModeKHR],
) -> vk::PresentModeKHR {
    if modes.contains(&vk::PresentModeKHR::MAILBOX) {
        vk::PresentModeKHR::MAILBOX
    } else {
        vk::PresentModeKHR::FIFO
    }
}

/// Compute the swapchain extent.
///
/// Some window systems report a fixed current extent. When they don't (the
/// width is the u32 sentinel), the drawable size is clamped to the surface's
/// supported range.
pub fn choose_swap_extent(
    capabilities: &vk::SurfaceCapabilitiesKHR,
    framebuffer_size: (u32, u32),
) -> vk::Extent2D {
    if capabilities.current_extent.width != u32::MAX {
        capabilities.current_extent
    } else {
        let (width, height) = framebuffer_size;
        vk::Extent2D {
            width: width.clamp(
                capabilities.min_image_extent.width,
                capabilities.max_image_extent.width,
            ),
            height: height.clamp(
                capabilities.min_image_extent.height,
                capabilities.max_image_extent.height,
            ),
        }
    }
}

/// Compute the number of swapchain images to request. One more than the
/// minimum reduces the odds of waiting on the driver, clamped to the maximum
/// when the surface reports a bound.
pub fn choose_image_count(
    capabilities: &vk::SurfaceCapabilitiesKHR,
) -> u32 {
    let proposed_image_count = capabilities.min_image_count + 1;
    if capabilities.max_image_count > 0 {
        proposed_image_count.min(capabilities.max_image_count)
    } else {
        proposed_image_count
    }
}

/// Build one color image view per swapchain image.
pub fn create_image_views(
    render_device: &RenderDevice,
    swapchain_images: &[vk::Image],
    format: vk::Format,
) -> Result<Vec<vk::ImageView>, VulkanError> {
    let mut image_views = vec![];
    for (i, &image) in swapchain_images.iter().enumerate() {
        let create_info = vk::ImageViewCreateInfo {
            image,
            format,
            view_type: vk::ImageViewType::TYPE_2D,
            subresource_range: vk::ImageSubresourceRange {
                aspect_mask: vk::ImageAspectFlags::COLOR,
                base_mip_level: 0,
                level_count: 1,
                base_array_layer: 0,
                layer_count: 1,
            },
            components: vk::ComponentMapping {
                r: vk::ComponentSwizzle::IDENTITY,
                g: vk::ComponentSwizzle::IDENTITY,
                b: vk::ComponentSwizzle::IDENTITY,
                a: vk::ComponentSwizzle::IDENTITY,
            },
            ..Default::default()
        };
        let image_view = unsafe {
            render_device
                .device()
                .create_image_view(&create_info, None)?
        };
        render_device.name_vulkan_object(
            format!("swapchain image view {}", i),
            vk::ObjectType::IMAGE_VIEW,
            image_view,
        );
        image_views.push(image_view);
    }
    Ok(image_views)
}

#[cfg(test)]
mod test {
    use super::*;

    fn format(
        format: vk::Format,
        color_space: vk::ColorSpaceKHR,
    ) -> vk::SurfaceFormatKHR {
        vk::SurfaceFormatKHR {
            format,
            color_space,
        }
    }

    #[test]
    fn prefers_bgra_srgb_when_available() {
        let formats = [
            format(
                vk::Format::R8G8B8A8_UNORM,
                vk::ColorSpaceKHR::SRGB_NONLINEAR,
            ),
            format(vk::Format::B8G8R8A8_SRGB, vk::ColorSpaceKHR::SRGB_NONLINEAR),
        ];
        assert_eq!(choose_surface_format(&formats), formats[1]);
    }

    #[test]
    fn falls_back_to_the_first_format() {
        let formats = [
            format(
                vk::Format::R8G8B8A8_UNORM,
                vk::ColorSpaceKHR::SRGB_NONLINEAR,
            ),
            format(
                vk::Format::R8G8B8A8_SRGB,
                vk::ColorSpaceKHR::SRGB_NONLINEAR,
            ),
        ];
        assert_eq!(choose_surface_format(&formats), formats[0]);
    }

    #[test]
    fn srgb_format_without_srgb_color_space_is_not_enough() {
        let formats = [
            format(vk::Format::R8G8B8A8_UNORM, vk::ColorSpaceKHR::SRGB_NONLINEAR),
            format(
                vk::Format::B8G8R8A8_SRGB,
                vk::ColorSpaceKHR::EXTENDED_SRGB_LINEAR_EXT,
            ),
        ];
        assert_eq!(choose_surface_format(&formats), formats[0]);
    }

    #[test]
    fn mailbox_wins_when_present() {
        let modes = [
            vk::PresentModeKHR::FIFO,
            vk::PresentModeKHR::MAILBOX,
            vk::PresentModeKHR::IMMEDIATE,
        ];
        assert_eq!(choose_present_mode(&modes), vk::PresentModeKHR::MAILBOX);
    }

    #[test]
    fn fifo_is_the_fallback_mode() {
        let modes = [vk::PresentModeKHR::IMMEDIATE, vk::PresentModeKHR::FIFO];
        assert_eq!(choose_present_mode(&modes), vk::PresentModeKHR::FIFO);
    }

    #[test]
    fn fixed_current_extent_is_used_verbatim() {
        let capabilities = vk::SurfaceCapabilitiesKHR {
            current_extent: vk::Extent2D {
                width: 1280,
                height: 720,
            },
            ..Default::default()
        };
        let extent = choose_swap_extent(&capabilities, (555, 555));
        assert_eq!(extent.width, 1280);
        assert_eq!(extent.height, 720);
    }

    #[test]
    fn flexible_extent_clamps_the_drawable_size() {
        let capabilities = vk::SurfaceCapabilitiesKHR {
            current_extent: vk::Extent2D {
                width: u32::MAX,
                height: u32::MAX,
            },
            min_image_extent: vk::Extent2D {
                width: 64,
                height: 64,
            },
            max_image_extent: vk::Extent2D {
                width: 2048,
                height: 2048,
            },
            ..Default::default()
        };
        let extent = choose_swap_extent(&capabilities, (4096, 32));
        assert_eq!(extent.width, 2048);
        assert_eq!(extent.height, 64);
    }

    #[test]
    fn image_count_is_min_plus_one() {
        let capabilities = vk::SurfaceCapabilitiesKHR {
            min_image_count: 2,
            max_image_count: 8,
            ..Default::default()
        };
        assert_eq!(choose_image_count(&capabilities), 3);
    }

    #[test]
    fn image_count_respects_a_bounded_max() {
        let capabilities = vk::SurfaceCapabilitiesKHR {
            min_image_count: 3,
            max_image_count: 3,
            ..Default::default()
        };
        assert_eq!(choose_image_count(&capabilities), 3);
    }

    #[test]
    fn zero_max_image_count_means_unbounded() {
        let capabilities = vk::SurfaceCapabilitiesKHR {
            min_image_count: 4,
            max_image_count: 0,
            ..Default::default()
        };
        assert_eq!(choose_image_count(&capabilities), 5);
    }
}
