//! Thin RAII wrappers around the Vulkan objects this application uses.
//!
//! Every wrapper keeps an `Arc<RenderDevice>` so raw handles can never
//! outlive the logical device which created them.

mod buffer;
mod commands;
mod depth_buffer;
mod descriptors;
mod error;
mod ffi;
mod framebuffer;
mod frames_in_flight;
mod instance;
mod pipeline;
mod render_device;
mod render_pass;
mod swapchain;
mod texture;

pub use self::{
    buffer::{Buffer, DeviceLocalBuffer, HostCoherentBuffer},
    commands::OneTimeSubmitCommandBuffer,
    depth_buffer::DepthBuffer,
    descriptors::{DescriptorPool, DescriptorSet, DescriptorSetLayout},
    error::VulkanError,
    framebuffer::Framebuffer,
    frames_in_flight::{Frame, FrameStatus, FramesInFlight},
    instance::Instance,
    pipeline::{GraphicsPipeline, PipelineLayout, ShaderModule},
    render_device::{Allocation, RenderDevice},
    render_pass::RenderPass,
    swapchain::{Swapchain, SwapchainStatus},
    texture::{Sampler, Texture2D, TextureImage},
};
