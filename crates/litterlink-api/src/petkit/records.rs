// PetKit device-record endpoints
//
// One call returns the events a litter box logged on a single calendar
// day. Bulk hardware ignores the date and returns its whole history.

use chrono::NaiveDate;
use tracing::debug;
use url::form_urlencoded;

use crate::error::Error;
use crate::petkit::client::PetKitClient;
use crate::petkit::models::DeviceRecord;

/// Date field name the endpoint expects for a device type.
///
/// The T3 firmware predates the rename and still wants `day`.
pub fn date_field(device_type: &str) -> &'static str {
    if device_type.eq_ignore_ascii_case("t3") {
        "day"
    } else {
        "date"
    }
}

impl PetKitClient {
    /// Fetch the events one device recorded on `day`.
    ///
    /// `POST /{type}/getDeviceRecord` with `{day|date}=YYYYMMDD&deviceId=...`.
    /// A null result means the device logged nothing that day.
    pub async fn device_records(
        &self,
        device_type: &str,
        device_id: &str,
        day: NaiveDate,
    ) -> Result<Vec<DeviceRecord>, Error> {
        let device_type = device_type.to_lowercase();
        let path = format!("/{device_type}/getDeviceRecord");
        let stamp = day.format("%Y%m%d").to_string();
        debug!(device_id, day = %stamp, "fetching device records");

        let form = form_urlencoded::Serializer::new(String::new())
            .append_pair(date_field(&device_type), &stamp)
            .append_pair("deviceId", device_id)
            .finish();

        let records: Option<Vec<DeviceRecord>> = self.post_form(&path, form).await?;
        Ok(records.unwrap_or_default())
    }
}
