// Whisker / Litter-Robot (GraphQL) client.
//
// AWS Cognito `USER_PASSWORD_AUTH` issues an ID token used as the bearer
// credential; the account id (`mid`) is read from the token's payload.
// Pet-profile and robot telemetry live behind two GraphQL endpoints.

pub mod auth;
pub mod client;
pub mod models;
pub mod pets;
pub mod robots;

pub use client::{WhiskerClient, WhiskerEndpoints};
pub use models::{RobotActivity, WeightEntry, WhiskerPet, WhiskerRobot};
