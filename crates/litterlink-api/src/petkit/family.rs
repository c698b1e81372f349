// PetKit family endpoints
//
// A family groups the account's devices and pets; both lists come back
// from one call.

use tracing::debug;

use crate::error::Error;
use crate::petkit::client::PetKitClient;
use crate::petkit::models::Family;

impl PetKitClient {
    /// List families with their devices and pets.
    ///
    /// `GET /group/family/list`. A null or missing result is an empty list.
    pub async fn list_families(&self) -> Result<Vec<Family>, Error> {
        debug!("listing families");
        let families: Option<Vec<Family>> = self.get("/group/family/list").await?;
        Ok(families.unwrap_or_default())
    }
}
