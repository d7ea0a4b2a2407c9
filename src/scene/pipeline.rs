use std::sync::Arc;

use ash::vk;

use super::Vertex;
use crate::graphics::vulkan_api::{
    DescriptorSetLayout, GraphicsPipeline, PipelineLayout, RenderDevice,
    RenderPass, ShaderModule, VulkanError,
};

const VERTEX_SHADER_PATH: &str =
    concat!(env!("CARGO_MANIFEST_DIR"), "/shaders/model.vert.spv");
const FRAGMENT_SHADER_PATH: &str =
    concat!(env!("CARGO_MANIFEST_DIR"), "/shaders/model.frag.spv");

/// Build the pipeline layout for the model pipeline.
///
/// A single descriptor set with the per-frame uniform buffer at binding 0
/// and the model texture at binding 1.
pub fn create_pipeline_layout(
    render_device: Arc<RenderDevice>,
) -> Result<PipelineLayout, VulkanError> {
    let descriptor_set_layout = Arc::new(DescriptorSetLayout::new(
        render_device.clone(),
        &[
            vk::DescriptorSetLayoutBinding {
                binding: 0,
                descriptor_type: vk::DescriptorType::UNIFORM_BUFFER,
                descriptor_count: 1,
                stage_flags: vk::ShaderStageFlags::VERTEX,
                ..Default::default()
            },
            vk::DescriptorSetLayoutBinding {
                binding: 1,
                descriptor_type: vk::DescriptorType::COMBINED_IMAGE_SAMPLER,
                descriptor_count: 1,
                stage_flags: vk::ShaderStageFlags::FRAGMENT,
                ..Default::default()
            },
        ],
    )?);
    PipelineLayout::new(render_device, &[descriptor_set_layout], &[])
}

/// Build the graphics pipeline for the model pipeline.
///
/// Viewport and scissor are dynamic so the pipeline survives swapchain
/// rebuilds without being recreated.
pub fn create_pipeline(
    render_device: &Arc<RenderDevice>,
    render_pass: &RenderPass,
    layout: &PipelineLayout,
) -> Result<GraphicsPipeline, VulkanError> {
    let vertex_shader = ShaderModule::from_spirv_file(
        render_device.clone(),
        VERTEX_SHADER_PATH,
    )?;
    let fragment_shader = ShaderModule::from_spirv_file(
        render_device.clone(),
        FRAGMENT_SHADER_PATH,
    )?;
    let pipeline_stage_create_infos = [
        vertex_shader.stage_create_info(vk::ShaderStageFlags::VERTEX),
        fragment_shader.stage_create_info(vk::ShaderStageFlags::FRAGMENT),
    ];

    let vertex_input_binding_descriptions = [Vertex::binding_description()];
    let vertex_input_attribute_descriptions = Vertex::attribute_descriptions();
    let vertex_input_state = vk::PipelineVertexInputStateCreateInfo {
        p_vertex_binding_descriptions: vertex_input_binding_descriptions
            .as_ptr(),
        vertex_binding_description_count: vertex_input_binding_descriptions
            .len() as u32,
        p_vertex_attribute_descriptions: vertex_input_attribute_descriptions
            .as_ptr(),
        vertex_attribute_description_count: vertex_input_attribute_descriptions
            .len() as u32,
        ..Default::default()
    };
    let input_assembly_state = vk::PipelineInputAssemblyStateCreateInfo {
        topology: vk::PrimitiveTopology::TRIANGLE_LIST,
        ..Default::default()
    };
    let dynamic_states =
        [vk::DynamicState::VIEWPORT, vk::DynamicState::SCISSOR];
    let dynamic_state = vk::PipelineDynamicStateCreateInfo {
        p_dynamic_states: dynamic_states.as_ptr(),
        dynamic_state_count: dynamic_states.len() as u32,
        ..Default::default()
    };
    let viewport_state = vk::PipelineViewportStateCreateInfo {
        viewport_count: 1,
        scissor_count: 1,
        ..Default::default()
    };
    let rasterization_state = vk::PipelineRasterizationStateCreateInfo {
        depth_clamp_enable: vk::FALSE,
        rasterizer_discard_enable: vk::FALSE,
        polygon_mode: vk::PolygonMode::FILL,
        line_width: 1.0,
        cull_mode: vk::CullModeFlags::BACK,
        front_face: vk::FrontFace::COUNTER_CLOCKWISE,
        depth_bias_enable: vk::FALSE,
        ..Default::default()
    };
    let multisample_state = vk::PipelineMultisampleStateCreateInfo {
        sample_shading_enable: vk::FALSE,
        rasterization_samples: vk::SampleCountFlags::TYPE_1,
        ..Default::default()
    };
    let depth_stencil_state = vk::PipelineDepthStencilStateCreateInfo {
        depth_test_enable: vk::TRUE,
        depth_write_enable: vk::TRUE,
        depth_compare_op: vk::CompareOp::LESS,
        depth_bounds_test_enable: vk::FALSE,
        stencil_test_enable: vk::FALSE,
        ..Default::default()
    };
    let color_blend_attachment = vk::PipelineColorBlendAttachmentState {
        color_write_mask: vk::ColorComponentFlags::RGBA,
        blend_enable: vk::FALSE,
        ..Default::default()
    };
    let color_blend_state = vk::PipelineColorBlendStateCreateInfo {
        logic_op_enable: vk::FALSE,
        logic_op: vk::LogicOp::COPY,
        attachment_count: 1,
        p_attachments: &color_blend_attachment,
        ..Default::default()
    };

    let graphics_pipeline_create_info = vk::GraphicsPipelineCreateInfo {
        p_stages: pipeline_stage_create_infos.as_ptr(),
        stage_count: pipeline_stage_create_infos.len() as u32,
        p_vertex_input_state: &vertex_input_state,
        p_input_assembly_state: &input_assembly_state,
        p_dynamic_state: &dynamic_state,
        p_viewport_state: &viewport_state,
        p_rasterization_state: &rasterization_state,
        p_multisample_state: &multisample_state,
        p_depth_stencil_state: &depth_stencil_state,
        p_color_blend_state: &color_blend_state,

        // It is safe to take the raw handles here because they are not
        // retained after the pipeline is constructed.
        render_pass: unsafe { render_pass.raw() },
        layout: unsafe { layout.raw() },

        subpass: 0,
        base_pipeline_index: -1,
        base_pipeline_handle: vk::Pipeline::null(),
        ..Default::default()
    };

    GraphicsPipeline::new(render_device.clone(), &graphics_pipeline_create_info)
}
