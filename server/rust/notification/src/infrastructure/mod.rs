pub mod config;
pub mod database;
pub mod push;
pub mod session_verifier;
pub mod telemetry;

pub use session_verifier::{HostedAuthSessionVerifier, SessionError, SessionVerifier};
