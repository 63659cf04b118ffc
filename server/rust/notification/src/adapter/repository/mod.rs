pub mod delivery_endpoint_postgres;
pub mod in_memory;
pub mod notification_log_postgres;
pub mod user_directory_postgres;

pub use delivery_endpoint_postgres::DeliveryEndpointPostgresRepository;
pub use in_memory::{
    InMemoryDeliveryEndpointRepository, InMemoryNotificationLogRepository,
    InMemoryUserDirectoryRepository,
};
pub use notification_log_postgres::NotificationLogPostgresRepository;
pub use user_directory_postgres::UserDirectoryPostgresRepository;
