// PetKit (REST) client.
//
// Form-encoded requests against a regional gateway discovered at login,
// `X-Session` token auth, and `{ "result": ... }` response envelopes.

pub mod auth;
pub mod client;
pub mod family;
pub mod models;
pub mod records;

pub use client::{ClientTimezone, PetKitClient, PetKitEndpoints};
pub use models::{
    DeviceRecord, Family, FamilyDevice, FamilyPet, PetKitId, RecordContent, RegionServer,
};
