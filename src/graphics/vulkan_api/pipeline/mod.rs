mod shader_module;

use std::sync::Arc;

use ash::vk;

use crate::graphics::vulkan_api::{
    DescriptorSetLayout, RenderDevice, VulkanError,
};

pub use self::shader_module::ShaderModule;

/// An owned pipeline layout. Keeps the descriptor set layouts it was built
/// from alive for as long as the pipeline layout exists.
pub struct PipelineLayout {
    pipeline_layout: vk::PipelineLayout,
    descriptor_set_layouts: Vec<Arc<DescriptorSetLayout>>,
    render_device: Arc<RenderDevice>,
}

impl PipelineLayout {
    pub fn new(
        render_device: Arc<RenderDevice>,
        descriptor_set_layouts: &[Arc<DescriptorSetLayout>],
        push_constant_ranges: &[vk::PushConstantRange],
    ) -> Result<Self, VulkanError> {
        let raw_layouts: Vec<vk::DescriptorSetLayout> = descriptor_set_layouts
            .iter()
            .map(|layout| unsafe { layout.raw() })
            .collect();
        let create_info = vk::PipelineLayoutCreateInfo {
            set_layout_count: raw_layouts.len() as u32,
            p_set_layouts: raw_layouts.as_ptr(),
            push_constant_range_count: push_constant_ranges.len() as u32,
            p_push_constant_ranges: push_constant_ranges.as_ptr(),
            ..Default::default()
        };
        let pipeline_layout = unsafe {
            render_device
                .device()
                .create_pipeline_layout(&create_info, None)?
        };
        Ok(Self {
            pipeline_layout,
            descriptor_set_layouts: descriptor_set_layouts.to_vec(),
            render_device,
        })
    }

    pub fn descriptor_set_layout(
        &self,
        index: usize,
    ) -> &Arc<DescriptorSetLayout> {
        &self.descriptor_set_layouts[index]
    }

    /// Get the raw pipeline layout handle.
    ///
    /// # Safety
    ///
    /// Unsafe because ownership is not transferred.
    pub unsafe fn raw(&self) -> vk::PipelineLayout {
        self.pipeline_layout
    }
}

impl Drop for PipelineLayout {
    fn drop(&mut self) {
        unsafe {
            self.render_device
                .device()
                .destroy_pipeline_layout(self.pipeline_layout, None);
        }
    }
}

/// An owned graphics pipeline.
pub struct GraphicsPipeline {
    pipeline: vk::Pipeline,
    render_device: Arc<RenderDevice>,
}

impl GraphicsPipeline {
    /// Create a new graphics pipeline from a full create info struct.
    ///
    /// The caller is responsible for keeping any shader modules referenced
    /// by the create info alive until this call returns.
    pub fn new(
        render_device: Arc<RenderDevice>,
        create_info: &vk::GraphicsPipelineCreateInfo,
    ) -> Result<Self, VulkanError> {
        let pipelines = unsafe {
            render_device
                .device()
                .create_graphics_pipelines(
                    vk::PipelineCache::null(),
                    std::slice::from_ref(create_info),
                    None,
                )
                .map_err(|(_, result)| {
                    VulkanError::UnableToCreateGraphicsPipeline(result)
                })?
        };
        Ok(Self {
            pipeline: pipelines[0],
            render_device,
        })
    }

    /// Get the raw pipeline handle.
    ///
    /// # Safety
    ///
    /// Unsafe because ownership is not transferred. The caller must ensure
    /// that no GPU operations refer to the pipeline when it is dropped.
    pub unsafe fn raw(&self) -> vk::Pipeline {
        self.pipeline
    }
}

impl Drop for GraphicsPipeline {
    fn drop(&mut self) {
        unsafe {
            self.render_device
                .device()
                .destroy_pipeline(self.pipeline, None);
        }
    }
}
