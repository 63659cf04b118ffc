pub mod dispatch_notification;

pub use dispatch_notification::{DispatchNotificationUseCase, DispatchSettings};
