use std::str::Utf8Error;

use ash::vk;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VulkanError {
    #[error(transparent)]
    InvalidDebugLayerName(#[from] Utf8Error),

    #[error("The following extensions are required but unavailable {:?}", .0)]
    RequiredExtensionsNotFound(Vec<String>),

    #[error("Unable to get the available Vulkan extensions {:?}", .0)]
    UnableToListAvailableExtensions(#[source] vk::Result),

    #[error("The following layers are required but unavailable {:?}", .0)]
    RequiredLayersNotFound(Vec<String>),

    #[error("Unable to get the available Vulkan layers {:?}", .0)]
    UnableToListAvailableLayers(#[source] vk::Result),

    #[error("Unable to create a Vulkan instance {:?}", .0)]
    UnableToCreateInstance(#[source] vk::Result),

    #[error("Unable to create the Vulkan debug messenger {:?}", .0)]
    UnableToCreateDebugMessenger(#[source] vk::Result),

    #[error("Unable to enumerate the Vulkan physical devices {:?}", .0)]
    UnableToEnumeratePhysicalDevices(#[source] vk::Result),

    #[error("No physical device meets this application's requirements")]
    NoSuitableDeviceFound,

    #[error("No queue family supports graphics operations")]
    UnableToFindGraphicsQueue,

    #[error("No queue family supports presenting to the window surface")]
    UnableToFindPresentQueue,

    #[error("Unable to create the Vulkan logical device {:?}", .0)]
    UnableToCreateLogicalDevice(#[source] vk::Result),

    #[error("Unable to query the window surface capabilities {:?}", .0)]
    UnableToGetSurfaceCapabilities(#[source] vk::Result),

    #[error("Unable to create the swapchain {:?}", .0)]
    UnableToCreateSwapchain(#[source] vk::Result),

    #[error("Unable to get the swapchain images {:?}", .0)]
    UnableToGetSwapchainImages(#[source] vk::Result),

    #[error("No memory type supports the required properties {:?}", .0)]
    NoSuitableMemoryType(vk::MemoryPropertyFlags),

    #[error("Unable to allocate device memory {:?}", .0)]
    UnableToAllocateDeviceMemory(#[source] vk::Result),

    #[error("Unable to map device memory {:?}", .0)]
    UnableToMapDeviceMemory(#[source] vk::Result),

    #[error("The device memory is not mapped for host access")]
    DeviceMemoryIsNotMapped,

    #[error("The mapped device memory is not properly aligned for {}", .0)]
    DeviceMemoryIsNotAlignedForType(String),

    #[error("SPIR-V source bytes must be a multiple of 4 in length")]
    InvalidSourceLengthInShaderSPIRV,

    #[error("Invalid bytes in SPIR-V shader source")]
    InvalidBytesInShaderSPIRV(#[source] std::array::TryFromSliceError),

    #[error("Unable to read the compiled shader at {:?}. Run the build with glslc on the path to compile shaders.", .path)]
    UnableToReadShaderFile {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unable to create the graphics pipeline {:?}", .0)]
    UnableToCreateGraphicsPipeline(#[source] vk::Result),

    #[error(
        "None of the candidate formats {:?} support {:?} with tiling {:?}",
        .formats, .features, .tiling
    )]
    NoSupportedFormat {
        formats: Vec<vk::Format>,
        tiling: vk::ImageTiling,
        features: vk::FormatFeatureFlags,
    },

    #[error("Unexpected Vulkan API error {:?}", .0)]
    UnexpectedApiError(#[from] vk::Result),
}
