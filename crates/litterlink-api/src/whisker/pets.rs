// Whisker pet-profile queries

use serde_json::json;
use tracing::debug;

use crate::error::Error;
use crate::whisker::client::{Surface, WhiskerClient};
use crate::whisker::models::{WeightEntry, WhiskerPet};

const PETS_BY_USER: &str = "query GetPetsByUser($userId: String!) { \
    getPetsByUser(userId: $userId) { petId name weight } }";

const WEIGHT_HISTORY: &str = "query GetWeightHistory($petId: String!, $limit: Int) { \
    getWeightHistoryByPetId(petId: $petId, limit: $limit) { weight timestamp } }";

impl WhiskerClient {
    /// All pets on the logged-in account.
    pub async fn pets(&self) -> Result<Vec<WhiskerPet>, Error> {
        let user_id = self.user_id()?;
        debug!(user_id, "fetching pets");
        self.query_list(
            Surface::PetProfile,
            "getPetsByUser",
            PETS_BY_USER,
            json!({ "userId": user_id }),
        )
        .await
    }

    /// Most recent `limit` weight readings for one pet, server-side limited.
    pub async fn weight_history(&self, pet_id: &str, limit: u32) -> Result<Vec<WeightEntry>, Error> {
        debug!(pet_id, limit, "fetching weight history");
        self.query_list(
            Surface::PetProfile,
            "getWeightHistoryByPetId",
            WEIGHT_HISTORY,
            json!({ "petId": pet_id, "limit": limit }),
        )
        .await
    }
}
