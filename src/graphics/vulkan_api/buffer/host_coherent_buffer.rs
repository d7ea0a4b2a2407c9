use std::{marker::PhantomData, sync::Arc};

use ash::vk;

use crate::graphics::vulkan_api::{
    Allocation, Buffer, RenderDevice, VulkanError,
};

/// A Vulkan device buffer which is mapped to host-coherent memory.
///
/// Used for data the CPU rewrites often, like per-frame uniforms, and for
/// staging uploads to device-local memory.
pub struct HostCoherentBuffer<T> {
    element_count: usize,
    buffer: vk::Buffer,
    allocation: Allocation,
    render_device: Arc<RenderDevice>,
    _phantom_data: PhantomData<T>,
}

impl<T> HostCoherentBuffer<T>
where
    T: Copy,
{
    /// Create a new device buffer that the host can read and write.
    ///
    /// `len` is the number of elements to be stored in the buffer.
    pub fn new(
        render_device: Arc<RenderDevice>,
        usage: vk::BufferUsageFlags,
        len: usize,
    ) -> Result<Self, VulkanError> {
        let size_in_bytes = len * std::mem::size_of::<T>();
        let create_info = vk::BufferCreateInfo {
            size: size_in_bytes as u64,
            usage,
            sharing_mode: vk::SharingMode::EXCLUSIVE,
            ..Default::default()
        };
        let buffer = unsafe {
            render_device.device().create_buffer(&create_info, None)?
        };
        let mut allocation = unsafe {
            let memory_requirements = render_device
                .device()
                .get_buffer_memory_requirements(buffer);
            render_device.allocate_memory(
                memory_requirements,
                vk::MemoryPropertyFlags::HOST_COHERENT
                    | vk::MemoryPropertyFlags::HOST_VISIBLE,
            )?
        };

        unsafe {
            // safe because the memory is allocated with the HOST_VISIBLE bit
            allocation.map(&render_device)?;

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

    /// Create a new host-visible buffer sized for the provided slice. Data
    /// from the slice is copied into the buffer immediately.
    pub fn new_with_data(
        render_device: Arc<RenderDevice>,
        usage: vk::BufferUsageFlags,
        initial_data: &[T],
    ) -> Result<Self, VulkanError> {
        let mut buffer = Self::new(render_device, usage, initial_data.len())?;
        unsafe {
            // SAFE because the buffer cannot be in-use by the GPU until
            // after it's returned from this constructor.
            buffer.as_slice_mut()?.copy_from_slice(initial_data);
        }
        Ok(buffer)
    }

    /// Access the underlying memory as if it were a slice of T.
    ///
    /// # Safety
    ///
    /// Unsafe because:
    ///   - a freshly created buffer holds undefined values
    ///   - the caller must synchronize reads/writes with the device
    pub unsafe fn as_slice(&self) -> Result<&[T], VulkanError> {
        self.allocation.as_slice()
    }

    /// Access the underlying memory as if it were a mut slice of T.
    ///
    /// # Safety
    ///
    /// Unsafe because:
    ///   - a freshly created buffer holds undefined values
    ///   - the caller must synchronize reads/writes with the device
    pub unsafe fn as_slice_mut(&mut self) -> Result<&mut [T], VulkanError> {
        self.allocation.as_slice_mut()
    }
}

impl<T> Buffer for HostCoherentBuffer<T> {
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

impl<T> Drop for HostCoherentBuffer<T> {
    /// # Safety
    ///
    /// The application must ensure no device operations reference this
    /// buffer when it is dropped.
    fn drop(&mut self) {
        unsafe {
            self.render_device.device().destroy_buffer(self.buffer, None);
            self.allocation.unmap(&self.render_device);
            self.render_device.free_memory(&self.allocation);
        }
    }
}
