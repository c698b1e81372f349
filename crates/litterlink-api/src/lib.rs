// litterlink-api: Async Rust client for the PetKit and Whisker cloud APIs

pub mod auth;
pub mod error;
pub mod petkit;
pub mod session;
pub mod transport;
pub mod whisker;

pub use auth::Credentials;
pub use error::Error;
pub use petkit::{ClientTimezone, PetKitClient, PetKitEndpoints};
pub use session::{Session, SessionCell, SessionState};
pub use transport::{RawResponse, RequestBody, Transport, TransportConfig};
pub use whisker::{WhiskerClient, WhiskerEndpoints};
