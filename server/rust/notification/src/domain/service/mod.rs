pub mod personalization;
pub mod push_gateway;

pub use personalization::{personalize, NAME_PLACEHOLDER};
pub use push_gateway::{BatchResponse, PushGateway, PushGatewayError, SendResponse, MAX_BATCH_SIZE};
