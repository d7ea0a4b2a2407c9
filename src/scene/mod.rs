//! The demo scene: two stacked textured quads spinning about the Z axis.
//!
//! The renderer owns everything which depends on the swapchain, so the
//! application can tear those pieces down and rebuild them when the window
//! is resized without touching the rest of the scene.

mod geometry;
mod pipeline;
mod uniforms;
mod vertex;

use std::{sync::Arc, time::Instant};

use ash::vk;

use crate::graphics::{
    vulkan_api::{
        Buffer, DepthBuffer, DescriptorPool, DescriptorSet,
        DeviceLocalBuffer, Frame, Framebuffer, FramesInFlight,
        GraphicsPipeline, HostCoherentBuffer, PipelineLayout, RenderDevice,
        RenderPass, Swapchain, Texture2D,
    },
    GraphicsError,
};

pub use self::{uniforms::UniformBufferObject, vertex::Vertex};

/// Renders the spinning model.
///
/// Resources which depend on the swapchain (the depth buffer and the
/// framebuffers) are rebuilt through `release_swapchain_resources` and
/// `rebuild_swapchain_resources`. Everything else lives for the whole
/// application.
pub struct SceneRenderer {
    extent: vk::Extent2D,
    depth_format: vk::Format,
    start_time: Instant,

    // swapchain-dependent resources, order matters for Drop
    framebuffers: Vec<Framebuffer>,
    depth_buffer: Option<DepthBuffer>,

    pipeline: GraphicsPipeline,
    pipeline_layout: PipelineLayout,
    descriptor_sets: Vec<DescriptorSet>,
    uniform_buffers: Vec<HostCoherentBuffer<UniformBufferObject>>,
    index_buffer: DeviceLocalBuffer<u16>,
    vertex_buffer: DeviceLocalBuffer<Vertex>,

    // referenced by the descriptor sets, kept alive here
    _texture: Texture2D,

    render_pass: RenderPass,

    render_device: Arc<RenderDevice>,
}

impl SceneRenderer {
    pub fn new(
        render_device: &Arc<RenderDevice>,
        frames_in_flight: &FramesInFlight,
    ) -> Result<Self, GraphicsError> {
        let swapchain = frames_in_flight.swapchain();
        let frame_count = frames_in_flight.frame_count();

        let depth_format = DepthBuffer::find_depth_format(render_device)?;
        let render_pass = RenderPass::new(
            render_device.clone(),
            swapchain.format(),
            depth_format,
        )?;

        let pipeline_layout =
            pipeline::create_pipeline_layout(render_device.clone())?;
        let pipeline = pipeline::create_pipeline(
            render_device,
            &render_pass,
            &pipeline_layout,
        )?;

        let vertex_buffer = DeviceLocalBuffer::new_with_data(
            render_device.clone(),
            vk::BufferUsageFlags::VERTEX_BUFFER,
            &geometry::quad_vertices(),
        )?;
        let index_buffer = DeviceLocalBuffer::new_with_data(
            render_device.clone(),
            vk::BufferUsageFlags::INDEX_BUFFER,
            &geometry::quad_indices(),
        )?;

        let texture_pixels = checkerboard_pixels();
        let texture = Texture2D::from_rgba_pixels(
            render_device.clone(),
            texture_pixels.width(),
            texture_pixels.height(),
            texture_pixels.as_raw(),
        )?;

        let mut uniform_buffers = vec![];
        for _ in 0..frame_count {
            uniform_buffers.push(HostCoherentBuffer::new(
                render_device.clone(),
                vk::BufferUsageFlags::UNIFORM_BUFFER,
                1,
            )?);
        }

        let descriptor_pool = Arc::new(DescriptorPool::new(
            render_device.clone(),
            frame_count as u32,
            &[
                vk::DescriptorPoolSize {
                    ty: vk::DescriptorType::UNIFORM_BUFFER,
                    descriptor_count: frame_count as u32,
                },
                vk::DescriptorPoolSize {
                    ty: vk::DescriptorType::COMBINED_IMAGE_SAMPLER,
                    descriptor_count: frame_count as u32,
                },
            ],
        )?);
        let descriptor_sets = DescriptorSet::allocate(
            render_device,
            &descriptor_pool,
            pipeline_layout.descriptor_set_layout(0),
            frame_count as u32,
        )?;
        for (descriptor_set, uniform_buffer) in
            descriptor_sets.iter().zip(uniform_buffers.iter())
        {
            unsafe {
                // safe because the sets are not in use by any frame yet
                descriptor_set.write_uniform_buffer(0, uniform_buffer);
                descriptor_set.write_combined_image_sampler(1, &texture);
            }
        }

        let mut scene_renderer = Self {
            extent: swapchain.extent(),
            depth_format,
            start_time: Instant::now(),
            framebuffers: vec![],
            depth_buffer: None,
            pipeline,
            pipeline_layout,
            descriptor_sets,
            uniform_buffers,
            index_buffer,
            vertex_buffer,
            _texture: texture,
            render_pass,
            render_device: render_device.clone(),
        };
        scene_renderer.rebuild_swapchain_resources(swapchain)?;
        Ok(scene_renderer)
    }

    /// Write the current frame's uniform data.
    ///
    /// Only call this after the frame has been acquired. The frame's fence
    /// has signaled by then, so the GPU is done reading this slot's buffer.
    pub fn update(&mut self, frame_index: usize) -> Result<(), GraphicsError> {
        let seconds = self.start_time.elapsed().as_secs_f32();
        let ubo = UniformBufferObject::mvp_at(seconds, self.extent);
        unsafe {
            self.uniform_buffers[frame_index].as_slice_mut()?[0] = ubo;
        }
        Ok(())
    }

    /// Record the scene's draw commands into the frame's command buffer.
    pub fn record_commands(&self, frame: &Frame) {
        let device = self.render_device.device();
        let command_buffer = frame.command_buffer();

        let clear_values = [
            vk::ClearValue {
                color: vk::ClearColorValue {
                    float32: [0.0, 0.0, 0.0, 1.0],
                },
            },
            vk::ClearValue {
                depth_stencil: vk::ClearDepthStencilValue {
                    depth: 1.0,
                    stencil: 0,
                },
            },
        ];
        let render_pass_begin_info = vk::RenderPassBeginInfo {
            // safe because all handles outlive this frame's submission
            render_pass: unsafe { self.render_pass.raw() },
            framebuffer: unsafe {
                self.framebuffers[frame.swapchain_image_index()].raw()
            },
            render_area: vk::Rect2D {
                offset: vk::Offset2D { x: 0, y: 0 },
                extent: self.extent,
            },
            clear_value_count: clear_values.len() as u32,
            p_clear_values: clear_values.as_ptr(),
            ..Default::default()
        };

        unsafe {
            device.cmd_begin_render_pass(
                command_buffer,
                &render_pass_begin_info,
                vk::SubpassContents::INLINE,
            );
            device.cmd_bind_pipeline(
                command_buffer,
                vk::PipelineBindPoint::GRAPHICS,
                self.pipeline.raw(),
            );
            device.cmd_set_viewport(
                command_buffer,
                0,
                &[vk::Viewport {
                    x: 0.0,
                    y: 0.0,
                    width: self.extent.width as f32,
                    height: self.extent.height as f32,
                    min_depth: 0.0,
                    max_depth: 1.0,
                }],
            );
            device.cmd_set_scissor(
                command_buffer,
                0,
                &[vk::Rect2D {
                    offset: vk::Offset2D { x: 0, y: 0 },
                    extent: self.extent,
                }],
            );
            device.cmd_bind_vertex_buffers(
                command_buffer,
                0,
                &[self.vertex_buffer.raw()],
                &[0],
            );
            device.cmd_bind_index_buffer(
                command_buffer,
                self.index_buffer.raw(),
                0,
                vk::IndexType::UINT16,
            );
            device.cmd_bind_descriptor_sets(
                command_buffer,
                vk::PipelineBindPoint::GRAPHICS,
                self.pipeline_layout.raw(),
                0,
                &[self.descriptor_sets[frame.frame_index()].raw()],
                &[],
            );
            device.cmd_draw_indexed(
                command_buffer,
                self.index_buffer.element_count() as u32,
                1,
                0,
                0,
                0,
            );
            device.cmd_end_render_pass(command_buffer);
        }
    }

    /// Destroy the framebuffers and depth buffer ahead of a swapchain
    /// rebuild.
    ///
    /// The caller must ensure no frames are in flight.
    pub fn release_swapchain_resources(&mut self) {
        self.framebuffers.clear();
        self.depth_buffer = None;
    }

    /// Recreate the depth buffer and framebuffers for a new swapchain.
    pub fn rebuild_swapchain_resources(
        &mut self,
        swapchain: &Swapchain,
    ) -> Result<(), GraphicsError> {
        debug_assert!(self.framebuffers.is_empty());

        self.extent = swapchain.extent();

        let depth_buffer = DepthBuffer::new(
            self.render_device.clone(),
            self.depth_format,
            self.extent,
        )?;

        let mut framebuffers = vec![];
        for index in 0..swapchain.image_count() {
            let attachments = unsafe {
                // safe because the framebuffers are destroyed before the
                // swapchain and depth buffer on every rebuild
                [swapchain.image_view(index), depth_buffer.image_view()]
            };
            framebuffers.push(Framebuffer::new(
                self.render_device.clone(),
                &self.render_pass,
                &attachments,
                self.extent,
            )?);
        }

        self.depth_buffer = Some(depth_buffer);
        self.framebuffers = framebuffers;
        Ok(())
    }
}

/// An 8x8 checkerboard scaled up to 256x256 pixels.
fn checkerboard_pixels() -> image::RgbaImage {
    image::RgbaImage::from_fn(256, 256, |x, y| {
        if ((x / 32) + (y / 32)) % 2 == 0 {
            image::Rgba([240, 240, 240, 255])
        } else {
            image::Rgba([40, 40, 60, 255])
        }
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn the_checkerboard_squares_alternate() {
        let pixels = checkerboard_pixels();
        assert_eq!(pixels.width(), 256);
        assert_eq!(pixels.height(), 256);
        assert_ne!(pixels.get_pixel(0, 0), pixels.get_pixel(32, 0));
        assert_eq!(pixels.get_pixel(0, 0), pixels.get_pixel(32, 32));
    }
}
