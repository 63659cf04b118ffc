pub mod delivery_endpoint_repository;
pub mod notification_log_repository;
pub mod user_directory_repository;

pub use delivery_endpoint_repository::DeliveryEndpointRepository;
pub use notification_log_repository::NotificationLogRepository;
pub use user_directory_repository::UserDirectoryRepository;
