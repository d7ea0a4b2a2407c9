use std::{marker::PhantomData, sync::Arc};

use ash::vk;

use crate::graphics::vulkan_api::{
    Allocation, Buffer, HostCoherentBuffer, OneTimeSubmitCommandBuffer,
    RenderDevice, VulkanError,
};

/// A Vulkan device buffer backed by a device-local memory allocation.
///
/// Device-local memory cannot be written by the host, so data arrives via a
/// host-visible staging buffer and a one-time transfer submission.
pub struct DeviceLocalBuffer<T> {
    element_count: usize,
    buffer: vk::Buffer,
    allocation: Allocation,
    render_device: Arc<RenderDevice>,
    _phantom_data: PhantomData<T>,
}

impl<T> DeviceLocalBuffer<T>
where
    T: Copy,
{
    /// Create a new device-local buffer with space for `len` elements.
    ///
    /// TRANSFER_DST is added to the usage flags automatically so the buffer
    /// can be filled from a staging buffer.
    pub fn new(
        render_device: Arc<RenderDevice>,
        usage: vk::BufferUsageFlags,
        len: usize,
    ) -> Result<Self, VulkanError> {
        let size_in_bytes = len * std::mem::size_of::<T>();
        let create_info = vk::BufferCreateInfo {
            size: size_in_bytes as u64,
            usage: usage | vk::BufferUsageFlags::TRANSFER_DST,
            sharing_mode: vk::SharingMode::EXCLUSIVE,
            ..Default::default()
        };
        let buffer = unsafe {
            render_device.device().create_buffer(&create_info, None)?
        };
        let allocation = unsafe {
            let memory_requirements = render_device
                .device()
                .get_buffer_memory_requirements(buffer);
            render_device.allocate_memory(
                memory_requirements,
                vk::MemoryPropertyFlags::DEVICE_LOCAL,
            )?
        };

        unsafe {
            // safe because the buffer and allocation are held together in
            // this object
            render_device.device().bind_buffer_memory(
                buffer,
                allocation.device_memory(),
                0,
            )?;
        }

        Ok(Self {
            element_count: len,
            buffer,
            allocation,
            render_device,
            _phantom_data: PhantomData,
        })
    }

    /// Create a device-local buffer and fill it with the provided data via a
    /// staging buffer. Blocks until the transfer completes.
    pub fn new_with_data(
        render_device: Arc<RenderDevice>,
        usage: vk::BufferUsageFlags,
        initial_data: &[T],
    ) -> Result<Self, VulkanError> {
        let buffer =
            Self::new(render_device.clone(), usage, initial_data.len())?;

        let staging_buffer = HostCoherentBuffer::new_with_data(
            render_device.clone(),
            vk::BufferUsageFlags::TRANSFER_SRC,
            initial_data,
        )?;

        let one_time_submit =
            OneTimeSubmitCommandBuffer::new(render_device.clone())?;
        unsafe {
            // safe because both buffers outlive the blocking submission
            let region = vk::BufferCopy {
                src_offset: 0,
                dst_offset: 0,
                size: staging_buffer.size_in_bytes() as u64,
            };
            render_device.device().cmd_copy_buffer(
                one_time_submit.command_buffer(),
                staging_buffer.raw(),
                buffer.buffer,
                &[region],
            );
        }
        one_time_submit.submit_and_wait()?;

        Ok(buffer)
    }
}

impl<T> Buffer for DeviceLocalBuffer<T> {
    unsafe fn raw(&self) -> vk::Buffer {
        self.buffer
    }

    fn size_in_bytes(&self) -> usize {
        self.allocation.size_in_bytes()
    }

    fn element_count(&self) -> usize {
        self.element_count
    }
}

impl<T> Drop for DeviceLocalBuffer<T> {
    /// # Safety
    ///
    /// The application must ensure no device operations reference this
    /// buffer when it is dropped.
    fn drop(&mut self) {
        unsafe {
            self.render_device.device().destroy_buffer(self.buffer, None);
            self.render_device.free_memory(&self.allocation);
        }
    }
}
