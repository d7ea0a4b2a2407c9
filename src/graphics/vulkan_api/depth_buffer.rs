use std::sync::Arc;

use ash::vk;

use crate::graphics::vulkan_api::{RenderDevice, TextureImage, VulkanError};

/// The depth attachment for the render pass. Sized to the swapchain extent,
/// so it is recreated on every swapchain rebuild.
pub struct DepthBuffer {
    format: vk::Format,
    image_view: vk::ImageView,
    _image: TextureImage,
    render_device: Arc<RenderDevice>,
}

impl DepthBuffer {
    /// Pick the depth format to use for the device.
    pub fn find_depth_format(
        render_device: &RenderDevice,
    ) -> Result<vk::Format, VulkanError> {
        render_device.find_supported_format(
            &[
                vk::Format::D32_SFLOAT,
                vk::Format::D32_SFLOAT_S8_UINT,
                vk::Format::D24_UNORM_S8_UINT,
            ],
            vk::ImageTiling::OPTIMAL,
            vk::FormatFeatureFlags::DEPTH_STENCIL_ATTACHMENT,
        )
    }

    /// Create a depth image and view with the given extent.
    pub fn new(
        render_device: Arc<RenderDevice>,
        format: vk::Format,
        extent: vk::Extent2D,
    ) -> Result<Self, VulkanError> {
        let image = TextureImage::new(
            render_device.clone(),
            &vk::ImageCreateInfo {
                image_type: vk::ImageType::TYPE_2D,
                extent: vk::Extent3D {
                    width: extent.width,
                    height: extent.height,
                    depth: 1,
                },
                mip_levels: 1,
                array_layers: 1,
                format,
                tiling: vk::ImageTiling::OPTIMAL,
                initial_layout: vk::ImageLayout::UNDEFINED,
                usage: vk::ImageUsageFlags::DEPTH_STENCIL_ATTACHMENT,
                sharing_mode: vk::SharingMode::EXCLUSIVE,
                samples: vk::SampleCountFlags::TYPE_1,
                ..Default::default()
            },
        )?;

        let image_view = unsafe {
            let create_info = vk::ImageViewCreateInfo {
                image: image.raw(),
                view_type: vk::ImageViewType::TYPE_2D,
                format,
                subresource_range: vk::ImageSubresourceRange {
                    aspect_mask: vk::ImageAspectFlags::DEPTH,
                    base_mip_level: 0,
                    level_count: 1,
                    base_array_layer: 0,
                    layer_count: 1,
                },
                ..Default::default()
            };
            render_device.device().create_image_view(&create_info, None)?
        };
        render_device.name_vulkan_object(
            "depth buffer image view",
            vk::ObjectType::IMAGE_VIEW,
            image_view,
        );

        Ok(Self {
            format,
            image_view,
            _image: image,
            render_device,
        })
    }

    pub fn format(&self) -> vk::Format {
        self.format
    }

    /// The view of the depth image.
    ///
    /// # Safety
    ///
    /// Unsafe because ownership is not transferred. Framebuffers built from
    /// this view must be destroyed before the DepthBuffer.
    pub unsafe fn image_view(&self) -> vk::ImageView {
        self.image_view
    }
}

impl Drop for DepthBuffer {
    fn drop(&mut self) {
        unsafe {
            self.render_device
                .device()
                .destroy_image_view(self.image_view, None);
        }
    }
}
