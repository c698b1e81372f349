// ── PetKit adapter ──
//
// Family list first (devices + pets), then a backward day walk per
// supported litter box. Pet weights are not part of the family payload,
// so they are taken from the newest weighed visit. Devices and pets that
// come back without an id are counted as skipped records.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::{debug, info};

use litterlink_api::petkit::{FamilyDevice, FamilyPet};
use litterlink_api::{ClientTimezone, Credentials, PetKitClient, SessionState, TransportConfig};

use crate::backend::{Backend, FetchRequest, FetchedData};
use crate::backfill::{self, DayWalk, diag};
use crate::config::{LitterboxConfig, VendorConfig};
use crate::convert::{self, PetKitEvent};
use crate::error::CoreError;
use crate::model::Vendor;

/// `Backend` over the PetKit REST cloud.
pub struct PetKitBackend {
    client: PetKitClient,
}

impl PetKitBackend {
    /// Build the client for `config`. `now` fixes the UTC offset reported
    /// to the vendor at login.
    pub fn new(config: &LitterboxConfig, now: DateTime<Utc>) -> Result<Self, CoreError> {
        let VendorConfig::PetKit { region, endpoints } = &config.vendor else {
            return Err(CoreError::Config {
                message: "PetKit backend needs a PetKit vendor configuration".into(),
            });
        };

        let transport = TransportConfig::default()
            .with_timeout(config.timeout)
            .build()?;
        let credentials = Credentials::new(config.username.clone(), config.password.clone());

        Ok(Self::from_client(PetKitClient::new(
            transport,
            endpoints.clone(),
            credentials,
            region.clone(),
            client_timezone(config.timezone, now),
        )))
    }

    pub fn from_client(client: PetKitClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &PetKitClient {
        &self.client
    }

    /// Walk one device's history and fold the records into `data`.
    async fn backfill_device(
        &self,
        device: &FamilyDevice,
        pet_names: &HashMap<String, String>,
        request: FetchRequest,
        data: &mut FetchedData,
    ) -> Result<(), CoreError> {
        let Some(device_id) = device.device_id.as_ref().map(ToString::to_string) else {
            diag!(
                request.diagnostics,
                device_name = %device.device_name,
                "skipping device without an id"
            );
            data.summary.records_skipped += 1;
            return Ok(());
        };
        let kind = device.device_type.to_lowercase();

        if !backfill::is_supported(&kind) {
            diag!(
                request.diagnostics,
                device_id = %device_id,
                device_type = %device.device_type,
                "skipping unsupported device type"
            );
            data.summary.devices_skipped += 1;
            return Ok(());
        }

        for day in DayWalk::for_device(request.today, request.depth, &kind) {
            data.summary.pages_attempted += 1;
            let records = match self.client.device_records(&kind, &device_id, day).await {
                Ok(records) => records,
                Err(e) => {
                    let page = format!("{kind}/{device_id}@{day}");
                    backfill::skip_failed_page(&mut data.summary, e, &page, request.diagnostics)?;
                    continue;
                }
            };
            debug!(device_id = %device_id, %day, count = records.len(), "device records received");

            for record in &records {
                match convert::petkit_event(record, device, pet_names) {
                    Some(PetKitEvent::Visit(visit)) => data.visits.push(visit),
                    Some(PetKitEvent::Cycle { record, status }) => {
                        data.visits.push(record);
                        data.statuses.push(status);
                    }
                    None => data.summary.records_skipped += 1,
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl Backend for PetKitBackend {
    fn vendor(&self) -> Vendor {
        Vendor::PetKit
    }

    async fn login(&self) -> Result<(), CoreError> {
        Ok(self.client.login().await?)
    }

    async fn fetch_history(&self, request: FetchRequest) -> Result<FetchedData, CoreError> {
        let families = self.client.list_families().await?;
        let devices: Vec<&FamilyDevice> = families.iter().flat_map(|f| &f.devices).collect();
        let pets: Vec<&FamilyPet> = families.iter().flat_map(|f| &f.pets).collect();
        info!(
            devices = devices.len(),
            pets = pets.len(),
            depth_days = request.depth,
            "PetKit backfill starting"
        );

        let pet_names: HashMap<String, String> = pets
            .iter()
            .filter_map(|p| Some((p.pet_id.as_ref()?.to_string(), p.pet_name.clone())))
            .collect();

        let mut data = FetchedData::default();
        for device in devices {
            self.backfill_device(device, &pet_names, request, &mut data)
                .await?;
        }

        for pet in pets {
            match convert::petkit_pet(pet, &data.visits) {
                Some(unified) => data.pets.push(unified),
                None => {
                    diag!(request.diagnostics, pet_name = %pet.pet_name, "skipping pet without an id");
                    data.summary.records_skipped += 1;
                }
            }
        }
        Ok(data)
    }

    fn session_state(&self) -> SessionState {
        self.client.session_state()
    }
}

/// IANA name and current offset of `tz`, as PetKit's login form wants.
pub fn client_timezone(tz: Tz, now: DateTime<Utc>) -> ClientTimezone {
    let offset_secs = tz
        .offset_from_utc_datetime(&now.naive_utc())
        .fix()
        .local_minus_utc();
    ClientTimezone {
        id: tz.name().to_owned(),
        offset_hours: f64::from(offset_secs) / 3600.0,
    }
}
