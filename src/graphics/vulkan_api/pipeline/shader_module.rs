use std::{path::Path, sync::Arc};

use ash::vk;

use crate::graphics::vulkan_api::{RenderDevice, VulkanError};

const DEFAULT_ENTRY_POINT: &[u8] = b"main\0";

/// An owned vk::ShaderModule which is destroyed automatically when it falls
/// out of scope.
pub struct ShaderModule {
    shader_module: vk::ShaderModule,
    render_device: Arc<RenderDevice>,
}

impl ShaderModule {
    /// Create a shader module from compiled SPIR-V bytes.
    pub fn from_spirv_bytes(
        render_device: Arc<RenderDevice>,
        source: &[u8],
    ) -> Result<Self, VulkanError> {
        let source_u32 = copy_to_u32(source)?;
        let create_info = vk::ShaderModuleCreateInfo {
            p_code: source_u32.as_ptr(),
            code_size: source_u32.len() * std::mem::size_of::<u32>(),
            ..Default::default()
        };
        let shader_module = unsafe {
            render_device.device().create_shader_module(&create_info, None)?
        };
        Ok(Self {
            shader_module,
            render_device,
        })
    }

    /// Read a compiled SPIR-V file from disk and build a shader module from
    /// its contents.
    pub fn from_spirv_file(
        render_device: Arc<RenderDevice>,
        path: impl AsRef<Path>,
    ) -> Result<Self, VulkanError> {
        let bytes = std::fs::read(path.as_ref()).map_err(|source| {
            VulkanError::UnableToReadShaderFile {
                path: path.as_ref().to_path_buf(),
                source,
            }
        })?;
        Self::from_spirv_bytes(render_device, &bytes)
    }

    /// Get the vulkan stage create info for this shader module.
    ///
    /// Note: assumes a "main" entrypoint.
    pub fn stage_create_info(
        &self,
        stage: vk::ShaderStageFlags,
    ) -> vk::PipelineShaderStageCreateInfo {
        vk::PipelineShaderStageCreateInfo {
            stage,
            module: self.shader_module,
            p_name: DEFAULT_ENTRY_POINT.as_ptr() as *const std::os::raw::c_char,
            ..Default::default()
        }
    }
}

impl Drop for ShaderModule {
    fn drop(&mut self) {
        unsafe {
            self.render_device
                .device()
                .destroy_shader_module(self.shader_module, None);
        }
    }
}

/// Copy a byte slice into a properly-aligned u32 array.
///
/// Vulkan expects SPIR-V source in u32 words, but files and `include_bytes!`
/// only provide u8 bytes. A full copy handles both the alignment and the
/// little-endian word decode.
fn copy_to_u32(bytes: &[u8]) -> Result<Vec<u32>, VulkanError> {
    const U32_SIZE: usize = std::mem::size_of::<u32>();
    if bytes.len() % U32_SIZE != 0 {
        return Err(VulkanError::InvalidSourceLengthInShaderSPIRV);
    }

    let mut buffer: Vec<u32> = Vec::with_capacity(bytes.len() / U32_SIZE);
    let mut input: &[u8] = bytes;
    while !input.is_empty() {
        let (word_slice, rest) = input.split_at(U32_SIZE);
        input = rest;
        let word = u32::from_le_bytes(
            word_slice
                .try_into()
                .map_err(VulkanError::InvalidBytesInShaderSPIRV)?,
        );
        buffer.push(word);
    }

    Ok(buffer)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn copy_to_u32_decodes_little_endian_words() {
        let bytes = [0x01, 0x00, 0x00, 0x00, 0x78, 0x56, 0x34, 0x12];
        let words = copy_to_u32(&bytes).unwrap();
        assert_eq!(words, vec![1, 0x12345678]);
    }

    #[test]
    fn copy_to_u32_rejects_partial_words() {
        let bytes = [0x01, 0x00, 0x00];
        assert!(copy_to_u32(&bytes).is_err());
    }

    #[test]
    fn copy_to_u32_accepts_empty_input() {
        let words = copy_to_u32(&[]).unwrap();
        assert!(words.is_empty());
    }
}
