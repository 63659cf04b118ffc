pub mod delivery_endpoint;
pub mod notification_record;
pub mod outbound_message;
pub mod recipient;
pub mod session;
pub mod target;

pub use delivery_endpoint::{DeliveryEndpoint, EndpointLinkage};
pub use notification_record::NotificationRecord;
pub use outbound_message::OutboundMessage;
pub use recipient::Recipient;
pub use session::Session;
pub use target::{TargetKind, TargetSpecification, UnknownTargetKind};
