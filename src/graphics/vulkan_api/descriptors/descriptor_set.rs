use std::sync::Arc;

use ash::vk;

use crate::graphics::vulkan_api::{
    Buffer, DescriptorPool, DescriptorSetLayout, RenderDevice, Texture2D,
    VulkanError,
};

/// A descriptor set allocated from a [`DescriptorPool`].
///
/// The set does not own its handle, the pool frees it on destruction. It
/// keeps the pool alive via an Arc so the handle cannot dangle.
pub struct DescriptorSet {
    descriptor_set: vk::DescriptorSet,
    _descriptor_pool: Arc<DescriptorPool>,
    render_device: Arc<RenderDevice>,
}

impl DescriptorSet {
    /// Allocate `count` descriptor sets with the given layout.
    pub fn allocate(
        render_device: &Arc<RenderDevice>,
        descriptor_pool: &Arc<DescriptorPool>,
        layout: &DescriptorSetLayout,
        count: u32,
    ) -> Result<Vec<Self>, VulkanError> {
        let layouts: Vec<vk::DescriptorSetLayout> =
            (0..count).map(|_| unsafe { layout.raw() }).collect();
        let allocate_info = vk::DescriptorSetAllocateInfo {
            descriptor_pool: unsafe { descriptor_pool.raw() },
            descriptor_set_count: layouts.len() as u32,
            p_set_layouts: layouts.as_ptr(),
            ..Default::default()
        };
        let raw_sets = unsafe {
            render_device.device().allocate_descriptor_sets(&allocate_info)?
        };
        let descriptor_sets = raw_sets
            .into_iter()
            .map(|descriptor_set| Self {
                descriptor_set,
                _descriptor_pool: descriptor_pool.clone(),
                render_device: render_device.clone(),
            })
            .collect();
        Ok(descriptor_sets)
    }

    /// Write a uniform buffer binding to this descriptor set.
    ///
    /// # Safety
    ///
    /// Unsafe because the application must ensure the descriptor set is not
    /// in use by the GPU when it is modified.
    pub unsafe fn write_uniform_buffer(
        &self,
        binding: u32,
        buffer: &impl Buffer,
    ) {
        let buffer_info = vk::DescriptorBufferInfo {
            buffer: buffer.raw(),
            offset: 0,
            range: vk::WHOLE_SIZE,
        };
        let write = vk::WriteDescriptorSet {
            dst_set: self.descriptor_set,
            dst_binding: binding,
            dst_array_element: 0,
            descriptor_count: 1,
            descriptor_type: vk::DescriptorType::UNIFORM_BUFFER,
            p_buffer_info: &buffer_info,
            ..Default::default()
        };
        self.render_device.device().update_descriptor_sets(&[write], &[]);
    }

    /// Write a combined image sampler binding to this descriptor set.
    ///
    /// # Safety
    ///
    /// Unsafe because the application must ensure the descriptor set is not
    /// in use by the GPU when it is modified.
    pub unsafe fn write_combined_image_sampler(
        &self,
        binding: u32,
        texture: &Texture2D,
    ) {
        let image_info = vk::DescriptorImageInfo {
            sampler: texture.sampler().raw(),
            image_view: texture.image_view(),
            image_layout: vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL,
        };
        let write = vk::WriteDescriptorSet {
            dst_set: self.descriptor_set,
            dst_binding: binding,
            dst_array_element: 0,
            descriptor_count: 1,
            descriptor_type: vk::DescriptorType::COMBINED_IMAGE_SAMPLER,
            p_image_info: &image_info,
            ..Default::default()
        };
        self.render_device.device().update_descriptor_sets(&[write], &[]);
    }

    /// Get the raw descriptor set handle.
    ///
    /// # Safety
    ///
    /// Unsafe because ownership is not transferred.
    pub unsafe fn raw(&self) -> vk::DescriptorSet {
        self.descriptor_set
    }
}
