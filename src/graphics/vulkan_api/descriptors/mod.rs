mod descriptor_pool;
mod descriptor_set;
mod descriptor_set_layout;

pub use self::{
    descriptor_pool::DescriptorPool, descriptor_set::DescriptorSet,
    descriptor_set_layout::DescriptorSetLayout,
};
