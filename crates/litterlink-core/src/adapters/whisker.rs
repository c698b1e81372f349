// ── Whisker adapter ──
//
// No day walk: each pet's weight history and each robot's activity log
// is one GraphQL query with `limit = depth`. Robot status comes from the
// robot listing itself and is stamped with the fetch time. Pets without a
// `petId` and robots without a serial are counted as skipped records.

use async_trait::async_trait;
use tracing::{debug, info};

use litterlink_api::{Credentials, SessionState, TransportConfig, WhiskerClient};

use crate::backend::{Backend, FetchRequest, FetchedData};
use crate::backfill::{self, diag};
use crate::config::{LitterboxConfig, VendorConfig};
use crate::convert;
use crate::error::CoreError;
use crate::model::Vendor;

/// `Backend` over the Whisker GraphQL cloud.
pub struct WhiskerBackend {
    client: WhiskerClient,
}

impl WhiskerBackend {
    pub fn new(config: &LitterboxConfig) -> Result<Self, CoreError> {
        let VendorConfig::Whisker { endpoints } = &config.vendor else {
            return Err(CoreError::Config {
                message: "Whisker backend needs a Whisker vendor configuration".into(),
            });
        };

        let transport = TransportConfig::default()
            .with_timeout(config.timeout)
            .build()?;
        let credentials = Credentials::new(config.username.clone(), config.password.clone());

        Ok(Self::from_client(WhiskerClient::new(
            transport,
            endpoints.clone(),
            credentials,
        )))
    }

    pub fn from_client(client: WhiskerClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &WhiskerClient {
        &self.client
    }

    async fn collect_pets(
        &self,
        request: FetchRequest,
        data: &mut FetchedData,
    ) -> Result<(), CoreError> {
        let pets = self.client.pets().await?;
        debug!(count = pets.len(), "Whisker pets received");

        for pet in &pets {
            let Some(unified) = convert::whisker_pet(pet) else {
                diag!(request.diagnostics, name = %pet.name, "skipping pet without an id");
                data.summary.records_skipped += 1;
                continue;
            };
            let pet_id = unified.id.clone();
            data.pets.push(unified);

            data.summary.pages_attempted += 1;
            let entries = match self.client.weight_history(&pet_id, request.depth).await {
                Ok(entries) => entries,
                Err(e) => {
                    let page = format!("weight/{pet_id}");
                    backfill::skip_failed_page(&mut data.summary, e, &page, request.diagnostics)?;
                    continue;
                }
            };
            for entry in &entries {
                match convert::whisker_weight_visit(pet, entry) {
                    Some(visit) => data.visits.push(visit),
                    None => data.summary.records_skipped += 1,
                }
            }
        }
        Ok(())
    }

    async fn collect_robots(
        &self,
        request: FetchRequest,
        data: &mut FetchedData,
    ) -> Result<(), CoreError> {
        let robots = self.client.robots().await?;

        for robot in &robots {
            let Some(status) = convert::whisker_status(robot, request.now) else {
                diag!(
                    request.diagnostics,
                    name = robot.name.as_deref().unwrap_or_default(),
                    "skipping robot without a serial"
                );
                data.summary.records_skipped += 1;
                continue;
            };
            let serial = status.device_id.clone();
            debug!(
                serial = %serial,
                litter = status.litter_level_percent,
                waste = status.waste_level_percent,
                "robot status"
            );
            data.statuses.push(status);

            data.summary.pages_attempted += 1;
            let activity = match self.client.robot_activity(&serial, request.depth).await {
                Ok(activity) => activity,
                Err(e) => {
                    let page = format!("activity/{serial}");
                    backfill::skip_failed_page(&mut data.summary, e, &page, request.diagnostics)?;
                    continue;
                }
            };
            for entry in activity.iter().filter(|a| !convert::is_weight_echo(a)) {
                match convert::whisker_activity_visit(robot, entry) {
                    Some(visit) => data.visits.push(visit),
                    None => data.summary.records_skipped += 1,
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl Backend for WhiskerBackend {
    fn vendor(&self) -> Vendor {
        Vendor::Whisker
    }

    async fn login(&self) -> Result<(), CoreError> {
        Ok(self.client.login().await?)
    }

    async fn fetch_history(&self, request: FetchRequest) -> Result<FetchedData, CoreError> {
        info!(limit = request.depth, "Whisker fetch starting");
        let mut data = FetchedData::default();
        self.collect_pets(request, &mut data).await?;
        self.collect_robots(request, &mut data).await?;
        Ok(data)
    }

    fn session_state(&self) -> SessionState {
        self.client.session_state()
    }
}
