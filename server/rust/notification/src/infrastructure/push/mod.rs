pub mod access_token;
pub mod fcm_client;

pub use access_token::{AccessTokenProvider, ServiceAccountKey, FCM_SCOPE};
pub use fcm_client::{FcmPushGateway, SKIPPED_AFTER_AUTH_FAILURE};
