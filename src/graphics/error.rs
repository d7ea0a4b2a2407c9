use thiserror::Error;

use crate::graphics::vulkan_api::VulkanError;

#[derive(Error, Debug)]
pub enum GraphicsError {
    #[error(transparent)]
    VulkanError(#[from] VulkanError),

    #[error(transparent)]
    RuntimeError(#[from] anyhow::Error),
}
