pub mod http;
pub mod mcp;

pub use http::{router, serve as serve_http};
pub use mcp::McpServer;
