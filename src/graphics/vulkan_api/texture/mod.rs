mod image;
mod sampler;

use std::sync::Arc;

use ash::vk;

use crate::graphics::vulkan_api::{
    Buffer, HostCoherentBuffer, OneTimeSubmitCommandBuffer, RenderDevice,
    VulkanError,
};

pub use self::{image::TextureImage, sampler::Sampler};

/// A sampled 2D texture: a device-local image in the shader-read-only
/// layout, a view of it, and a sampler.
pub struct Texture2D {
    image_view: vk::ImageView,
    sampler: Sampler,
    image: TextureImage,
    render_device: Arc<RenderDevice>,
}

impl Texture2D {
    /// Upload RGBA8 pixel data into a new sampled image.
    ///
    /// The pixels travel through a host-visible staging buffer. The image is
    /// transitioned UNDEFINED -> TRANSFER_DST for the copy, then
    /// TRANSFER_DST -> SHADER_READ_ONLY for sampling. Blocks until the
    /// upload completes.
    pub fn from_rgba_pixels(
        render_device: Arc<RenderDevice>,
        width: u32,
        height: u32,
        rgba_pixels: &[u8],
    ) -> Result<Self, VulkanError> {
        debug_assert!(rgba_pixels.len() == (width * height * 4) as usize);

        let image = TextureImage::new(
            render_device.clone(),
            &vk::ImageCreateInfo {
                image_type: vk::ImageType::TYPE_2D,
                extent: vk::Extent3D {
                    width,
                    height,
                    depth: 1,
                },
                mip_levels: 1,
                array_layers: 1,
                format: vk::Format::R8G8B8A8_SRGB,
                tiling: vk::ImageTiling::OPTIMAL,
                initial_layout: vk::ImageLayout::UNDEFINED,
                usage: vk::ImageUsageFlags::TRANSFER_DST
                    | vk::ImageUsageFlags::SAMPLED,
                sharing_mode: vk::SharingMode::EXCLUSIVE,
                samples: vk::SampleCountFlags::TYPE_1,
                ..Default::default()
            },
        )?;

        let staging_buffer = HostCoherentBuffer::new_with_data(
            render_device.clone(),
            vk::BufferUsageFlags::TRANSFER_SRC,
            rgba_pixels,
        )?;

        let one_time_submit =
            OneTimeSubmitCommandBuffer::new(render_device.clone())?;
        unsafe {
            // safe because the image and staging buffer outlive the blocking
            // submission
            upload_and_transition(
                &render_device,
                one_time_submit.command_buffer(),
                staging_buffer.raw(),
                image.raw(),
                width,
                height,
            );
        }
        one_time_submit.submit_and_wait()?;

        let image_view = unsafe {
            let create_info = vk::ImageViewCreateInfo {
                image: image.raw(),
                view_type: vk::ImageViewType::TYPE_2D,
                format: vk::Format::R8G8B8A8_SRGB,
                subresource_range: vk::ImageSubresourceRange {
                    aspect_mask: vk::ImageAspectFlags::COLOR,
                    base_mip_level: 0,
                    level_count: 1,
                    base_array_layer: 0,
                    layer_count: 1,
                },
                ..Default::default()
            };
            render_device.device().create_image_view(&create_info, None)?
        };

        let sampler = Sampler::new(
            render_device.clone(),
            &vk::SamplerCreateInfo {
                mag_filter: vk::Filter::LINEAR,
                min_filter: vk::Filter::LINEAR,
                address_mode_u: vk::SamplerAddressMode::REPEAT,
                address_mode_v: vk::SamplerAddressMode::REPEAT,
                address_mode_w: vk::SamplerAddressMode::REPEAT,
                anisotropy_enable: vk::TRUE,
                max_anisotropy: 16.0,
                border_color: vk::BorderColor::INT_OPAQUE_BLACK,
                unnormalized_coordinates: vk::FALSE,
                compare_enable: vk::FALSE,
                compare_op: vk::CompareOp::ALWAYS,
                mipmap_mode: vk::SamplerMipmapMode::LINEAR,
                ..Default::default()
            },
        )?;

        Ok(Self {
            image_view,
            sampler,
            image,
            render_device,
        })
    }

    /// The view of the sampled image.
    ///
    /// # Safety
    ///
    /// Unsafe because ownership is not transferred.
    pub unsafe fn image_view(&self) -> vk::ImageView {
        self.image_view
    }

    pub fn sampler(&self) -> &Sampler {
        &self.sampler
    }

    /// The underlying image.
    pub fn image(&self) -> &TextureImage {
        &self.image
    }
}

impl Drop for Texture2D {
    fn drop(&mut self) {
        unsafe {
            self.render_device
                .device()
                .destroy_image_view(self.image_view, None);
        }
    }
}

/// Record the staging-buffer copy along with the layout transitions before
/// and after it.
unsafe fn upload_and_transition(
    render_device: &RenderDevice,
    command_buffer: vk::CommandBuffer,
    staging_buffer: vk::Buffer,
    image: vk::Image,
    width: u32,
    height: u32,
) {
    let subresource_range = vk::ImageSubresourceRange {
        aspect_mask: vk::ImageAspectFlags::COLOR,
        base_mip_level: 0,
        level_count: 1,
        base_array_layer: 0,
        layer_count: 1,
    };

    let to_transfer_dst = vk::ImageMemoryBarrier {
        old_layout: vk::ImageLayout::UNDEFINED,
        new_layout: vk::ImageLayout::TRANSFER_DST_OPTIMAL,
        src_queue_family_index: vk::QUEUE_FAMILY_IGNORED,
        dst_queue_family_index: vk::QUEUE_FAMILY_IGNORED,
        image,
        subresource_range,
        src_access_mask: vk::AccessFlags::empty(),
        dst_access_mask: vk::AccessFlags::TRANSFER_WRITE,
        ..Default::default()
    };
    render_device.device().cmd_pipeline_barrier(
        command_buffer,
        vk::PipelineStageFlags::TOP_OF_PIPE,
        vk::PipelineStageFlags::TRANSFER,
        vk::DependencyFlags::empty(),
        &[],
        &[],
        &[to_transfer_dst],
    );

    let copy_region = vk::BufferImageCopy {
        buffer_offset: 0,
        buffer_row_length: 0,
        buffer_image_height: 0,
        image_subresource: vk::ImageSubresourceLayers {
            aspect_mask: vk::ImageAspectFlags::COLOR,
            mip_level: 0,
            base_array_layer: 0,
            layer_count: 1,
        },
        image_offset: vk::Offset3D { x: 0, y: 0, z: 0 },
        image_extent: vk::Extent3D {
            width,
            height,
            depth: 1,
        },
    };
    render_device.device().cmd_copy_buffer_to_image(
        command_buffer,
        staging_buffer,
        image,
        vk::ImageLayout::TRANSFER_DST_OPTIMAL,
        &[copy_region],
    );

    let to_shader_read = vk::ImageMemoryBarrier {
        old_layout: vk::ImageLayout::TRANSFER_DST_OPTIMAL,
        new_layout: vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL,
        src_queue_family_index: vk::QUEUE_FAMILY_IGNORED,
        dst_queue_family_index: vk::QUEUE_FAMILY_IGNORED,
        image,
        subresource_range,
        src_access_mask: vk::AccessFlags::TRANSFER_WRITE,
        dst_access_mask: vk::AccessFlags::SHADER_READ,
        ..Default::default()
    };
    render_device.device().cmd_pipeline_barrier(
        command_buffer,
        vk::PipelineStageFlags::TRANSFER,
        vk::PipelineStageFlags::FRAGMENT_SHADER,
        vk::DependencyFlags::empty(),
        &[],
        &[],
        &[to_shader_read],
    );
}
