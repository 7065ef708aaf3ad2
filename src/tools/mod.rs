pub mod handler;
pub mod paystack;
pub mod registry;

pub use handler::{Endpoint, Placement, ToolDescriptor, ToolHandler};
pub use registry::{ToolRegistry, ToolRegistryBuilder};
