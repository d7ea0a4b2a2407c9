use std::ffi::c_void;

use ash::vk;

use crate::graphics::vulkan_api::{RenderDevice, VulkanError};

/// Find the index of a memory type which both satisfies the resource's
/// requirements and has the requested property flags.
pub(super) fn find_memory_type_index(
    requirements: &vk::MemoryRequirements,
    memory_properties: &vk::PhysicalDeviceMemoryProperties,
    property_flags: vk::MemoryPropertyFlags,
) -> Option<u32> {
    (0..memory_properties.memory_type_count).find(|&index| {
        let type_supported =
            requirements.memory_type_bits & (1 << index) != 0;
        let properties_supported = memory_properties.memory_types
            [index as usize]
            .property_flags
            .contains(property_flags);
        type_supported && properties_supported
    })
}

/// An allocated chunk of device memory.
pub struct Allocation {
    device_memory: vk::DeviceMemory,
    size_in_bytes: vk::DeviceSize,
    memory_type_index: u32,
    cpu_mapped_ptr: Option<*mut c_void>,
}

impl Allocation {
    /// Get the size of the allocation in bytes.
    pub fn size_in_bytes(&self) -> usize {
        self.size_in_bytes as usize
    }

    /// Get the device's memory type index.
    pub fn memory_type_index(&self) -> u32 {
        self.memory_type_index
    }

    /// Create a CPU-accessible pointer to the memory in this allocation.
    ///
    /// # Safety
    ///
    /// Unsafe because:
    ///  - only memory allocated with HOST_VISIBLE can be mapped
    ///  - memory that is not HOST_COHERENT requires additional
    ///    synchronization after writes/reads
    ///  - the application is responsible for making a corresponding call to
    ///    unmap
    pub unsafe fn map(
        &mut self,
        render_device: &RenderDevice,
    ) -> Result<(), VulkanError> {
        let mapped_ptr = render_device
            .device()
            .map_memory(
                self.device_memory,
                0,
                self.size_in_bytes,
                vk::MemoryMapFlags::empty(),
            )
            .map_err(VulkanError::UnableToMapDeviceMemory)?;
        self.cpu_mapped_ptr = Some(mapped_ptr);
        Ok(())
    }

    /// Unmap the cpu-accessible pointer to the memory in this allocation.
    pub fn unmap(&mut self, render_device: &RenderDevice) {
        if self.cpu_mapped_ptr.take().is_some() {
            // safe because this only occurs if the memory is already mapped
            unsafe {
                render_device.device().unmap_memory(self.device_memory)
            }
        }
    }

    /// Access the mapped device memory as a slice of T.
    ///
    /// # Safety
    ///
    /// Unsafe because:
    ///  - a call to map() must be made prior to calling this function
    ///  - errors if the host-mapped pointer is not correctly aligned for the
    ///    type T. Use #[repr(C, packed)] on types which will be written into
    ///    GPU buffers to have maximum control over memory layout.
    pub unsafe fn as_slice<T>(&self) -> Result<&[T], VulkanError> {
        let mapped_ptr = self
            .cpu_mapped_ptr
            .ok_or(VulkanError::DeviceMemoryIsNotMapped)?;

        if (mapped_ptr as usize % std::mem::align_of::<T>()) != 0 {
            return Err(VulkanError::DeviceMemoryIsNotAlignedForType(
                std::any::type_name::<T>().to_owned(),
            ));
        }

        let number_of_elements =
            self.size_in_bytes as usize / std::mem::size_of::<T>();

        Ok(std::slice::from_raw_parts(
            mapped_ptr as *const T,
            number_of_elements,
        ))
    }

    /// Access the mapped device memory as a mutable slice of T.
    ///
    /// # Safety
    ///
    /// Unsafe because:
    ///  - a call to map() must be made prior to calling this function
    ///  - errors if the host-mapped pointer is not correctly aligned for the
    ///    type T
    ///  - the caller must externally synchronize reads/writes with the device
    pub unsafe fn as_slice_mut<T>(&mut self) -> Result<&mut [T], VulkanError> {
        let mapped_ptr = self
            .cpu_mapped_ptr
            .ok_or(VulkanError::DeviceMemoryIsNotMapped)?;

        if (mapped_ptr as usize % std::mem::align_of::<T>()) != 0 {
            return Err(VulkanError::DeviceMemoryIsNotAlignedForType(
                std::any::type_name::<T>().to_owned(),
            ));
        }

        let number_of_elements =
            self.size_in_bytes as usize / std::mem::size_of::<T>();

        Ok(std::slice::from_raw_parts_mut(
            mapped_ptr as *mut T,
            number_of_elements,
        ))
    }
}

// internal api
impl Allocation {
    /// Create a new memory allocation with the given Vulkan memory handle.
    ///
    /// # Safety
    ///
    /// Unsafe because the memory object is *not* dropped automatically. The
    /// application is responsible for freeing the allocation when it is no
    /// longer in use.
    pub(super) unsafe fn new(
        device_memory: vk::DeviceMemory,
        size_in_bytes: vk::DeviceSize,
        memory_type_index: u32,
    ) -> Self {
        Self {
            device_memory,
            size_in_bytes,
            memory_type_index,
            cpu_mapped_ptr: None,
        }
    }

    /// Get the underlying device memory handle.
    ///
    /// # Safety
    ///
    /// Unsafe because ownership is not transferred. The allocation still
    /// owns the device memory.
    pub(in crate::graphics::vulkan_api) unsafe fn device_memory(
        &self,
    ) -> vk::DeviceMemory {
        self.device_memory
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn memory_properties_with_types(
        flags: &[vk::MemoryPropertyFlags],
    ) -> vk::PhysicalDeviceMemoryProperties {
        let mut properties = vk::PhysicalDeviceMemoryProperties {
            memory_type_count: flags.len() as u32,
            ..Default::default()
        };
        for (i, &property_flags) in flags.iter().enumerate() {
            properties.memory_types[i] = vk::MemoryType {
                property_flags,
                heap_index: 0,
            };
        }
        properties
    }

    #[test]
    fn picks_the_first_matching_type() {
        let properties = memory_properties_with_types(&[
            vk::MemoryPropertyFlags::DEVICE_LOCAL,
            vk::MemoryPropertyFlags::HOST_VISIBLE
                | vk::MemoryPropertyFlags::HOST_COHERENT,
        ]);
        let requirements = vk::MemoryRequirements {
            size: 1024,
            alignment: 64,
            memory_type_bits: 0b11,
        };

        let index = find_memory_type_index(
            &requirements,
            &properties,
            vk::MemoryPropertyFlags::HOST_VISIBLE
                | vk::MemoryPropertyFlags::HOST_COHERENT,
        );

        assert_eq!(index, Some(1));
    }

    #[test]
    fn respects_the_memory_type_bits_mask() {
        let properties = memory_properties_with_types(&[
            vk::MemoryPropertyFlags::DEVICE_LOCAL,
            vk::MemoryPropertyFlags::DEVICE_LOCAL,
        ]);
        let requirements = vk::MemoryRequirements {
            size: 1024,
            alignment: 64,
            // only the second memory type is usable
            memory_type_bits: 0b10,
        };

        let index = find_memory_type_index(
            &requirements,
            &properties,
            vk::MemoryPropertyFlags::DEVICE_LOCAL,
        );

        assert_eq!(index, Some(1));
    }

    #[test]
    fn returns_none_when_no_type_matches() {
        let properties = memory_properties_with_types(&[
            vk::MemoryPropertyFlags::DEVICE_LOCAL,
        ]);
        let requirements = vk::MemoryRequirements {
            size: 1024,
            alignment: 64,
            memory_type_bits: 0b1,
        };

        let index = find_memory_type_index(
            &requirements,
            &properties,
            vk::MemoryPropertyFlags::HOST_VISIBLE,
        );

        assert_eq!(index, None);
    }
}
