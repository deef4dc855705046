pub mod protocol;
pub mod server;

pub use protocol::{InputRangeError, RecommendRequest, RecommendResponse};
pub use server::{HttpResponse, RecommendServer, ServerConfig, ServerError, DEFAULT_ADDR};
