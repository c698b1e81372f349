// PetKit authentication
//
// Region discovery against the passport host, then a form-encoded login
// at the chosen regional gateway. The session id from the login response
// is sent as `X-Session` on every later request.

use md5::{Digest, Md5};
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::{debug, info};
use url::Url;
use url::form_urlencoded;

use crate::error::Error;
use crate::petkit::client::{ClientTimezone, Envelope, PetKitClient, decode_payload, unwrap_envelope};
use crate::petkit::models::{LoginResult, RegionServer, RegionServerList};
use crate::session::Session;
use crate::transport::RequestBody;

/// Gateway selected for the configured region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRegion {
    /// Gateway URL without trailing slash.
    pub gateway: String,
    /// Canonical region id as reported by the server.
    pub region_id: String,
}

/// Device metadata blob the app sends as the `client` login field.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ClientInfo<'a> {
    locale: &'a str,
    name: &'a str,
    os_version: &'a str,
    platform: &'a str,
    source: &'a str,
    version: &'a str,
    timezone_id: &'a str,
    timezone: String,
}

impl PetKitClient {
    /// Resolve the regional gateway, then log in with username/password.
    ///
    /// On success the session (token + gateway) is stored and used by all
    /// subsequent requests. On failure the session is cleared.
    pub async fn login(&self) -> Result<(), Error> {
        self.session().begin_login();
        match self.authenticate().await {
            Ok(session) => {
                self.session().establish(session);
                info!(username = self.credentials().username(), "PetKit login successful");
                Ok(())
            }
            Err(e) => {
                self.session().fail();
                Err(e)
            }
        }
    }

    async fn authenticate(&self) -> Result<Session, Error> {
        let region = self.resolve_region().await?;
        let gateway = Url::parse(&region.gateway)?;
        let url = Self::join(&gateway, "/user/login")?;
        debug!("logging in at {}", url);

        let form = login_form(
            &self.endpoints().api_version,
            &client_blob(self, self.timezone())?,
            &region.region_id,
            self.credentials().username(),
            self.credentials().password(),
        );

        let resp = self
            .transport()
            .send(Method::POST, url, self.headers(None)?, RequestBody::Form(form))
            .await?;

        let status = resp.status;
        if !status.is_success() {
            return Err(Error::Authentication {
                message: format!("login failed (HTTP {status})"),
            });
        }

        let payload = match unwrap_envelope(&resp.body) {
            Ok(Envelope::Payload(payload)) => payload,
            Ok(Envelope::SessionExpired) => {
                return Err(Error::Authentication {
                    message: "login rejected: session expired".into(),
                });
            }
            Err(Error::Vendor { code, message }) => {
                return Err(Error::Authentication {
                    message: format!("login rejected ({code}): {message}"),
                });
            }
            Err(e) => return Err(e),
        };

        let result: LoginResult = decode_payload(payload)?;
        let login = result.session.ok_or_else(|| Error::Authentication {
            message: "login response carried no session; check credentials and region".into(),
        })?;

        let mut session = Session::new(SecretString::from(login.id));
        session.base_url = Some(gateway);
        Ok(session)
    }

    /// Fetch the regional server list and pick the configured region.
    ///
    /// `GET {passport}/v1/regionservers`. Matches case-insensitively on the
    /// server's `name` or `id`.
    pub async fn resolve_region(&self) -> Result<ResolvedRegion, Error> {
        let url = Self::join(&self.endpoints().passport, "/v1/regionservers")?;
        debug!("resolving region '{}' via {}", self.region(), url);

        let resp = self
            .transport()
            .send(Method::GET, url, self.headers(None)?, RequestBody::Empty)
            .await?
            .error_for_status()?;

        let servers: RegionServerList = match unwrap_envelope(&resp.body)? {
            Envelope::Payload(payload) => decode_payload(payload)?,
            Envelope::SessionExpired => RegionServerList { list: Vec::new() },
        };

        select_region(&servers.list, self.region()).ok_or_else(|| Error::RegionNotFound {
            region: self.region().to_owned(),
        })
    }
}

/// Pick the server whose name or id equals `wanted`, ignoring case.
pub(crate) fn select_region(servers: &[RegionServer], wanted: &str) -> Option<ResolvedRegion> {
    let wanted = wanted.to_lowercase();
    servers
        .iter()
        .find(|s| s.name.to_lowercase() == wanted || s.id.to_lowercase() == wanted)
        .map(|s| ResolvedRegion {
            gateway: s.gateway.strip_suffix('/').unwrap_or(&s.gateway).to_owned(),
            region_id: s.id.clone(),
        })
}

/// Lowercase hex MD5 of the password, as the vendor requires.
pub(crate) fn md5_hex(password: &SecretString) -> String {
    hex::encode(Md5::digest(password.expose_secret().as_bytes()))
}

fn client_blob(client: &PetKitClient, tz: &ClientTimezone) -> Result<String, Error> {
    let endpoints = client.endpoints();
    let info = ClientInfo {
        locale: &endpoints.locale,
        name: &endpoints.device_model,
        os_version: &endpoints.os_version,
        platform: &endpoints.platform,
        source: &endpoints.source,
        version: &endpoints.api_version,
        timezone_id: &tz.id,
        timezone: format!("{:.1}", tz.offset_hours),
    };
    serde_json::to_string(&info).map_err(|e| Error::Deserialization {
        message: format!("failed to encode client info: {e}"),
        body: String::new(),
    })
}

/// Form body for `POST /user/login`, fields in the order the app sends them.
pub(crate) fn login_form(
    version: &str,
    client_blob: &str,
    region_id: &str,
    username: &str,
    password: &SecretString,
) -> String {
    form_urlencoded::Serializer::new(String::new())
        .append_pair("oldVersion", version)
        .append_pair("client", client_blob)
        .append_pair("encrypt", "1")
        .append_pair("region", region_id)
        .append_pair("username", username)
        .append_pair("password", &md5_hex(password))
        .finish()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn server(name: &str, id: &str, gateway: &str) -> RegionServer {
        RegionServer {
            id: id.into(),
            name: name.into(),
            gateway: gateway.into(),
        }
    }

    #[test]
    fn region_matches_id_case_insensitively() {
        let servers = vec![
            server("Europe", "eu1", "https://eu.example.com/"),
            server("US East", "us1", "https://a.example.com/"),
        ];
        let picked = select_region(&servers, "US1").unwrap();
        assert_eq!(picked.gateway, "https://a.example.com");
        assert_eq!(picked.region_id, "us1");
    }

    #[test]
    fn region_matches_name() {
        let servers = vec![server("US East", "us1", "https://a.example.com")];
        let picked = select_region(&servers, "us east").unwrap();
        assert_eq!(picked.gateway, "https://a.example.com");
    }

    #[test]
    fn unknown_region_is_none() {
        let servers = vec![server("US East", "us1", "https://a.example.com/")];
        assert!(select_region(&servers, "mars").is_none());
    }

    #[test]
    fn md5_is_lowercase_hex() {
        let pw = SecretString::from("password");
        assert_eq!(md5_hex(&pw), "5f4dcc3b5aa765d61d8327deb882cf99");
    }

    #[test]
    fn login_form_field_order_and_encoding() {
        let pw = SecretString::from("password");
        let form = login_form("12.4.1", r#"{"a":1}"#, "us1", "me@example.com", &pw);
        assert_eq!(
            form,
            "oldVersion=12.4.1&client=%7B%22a%22%3A1%7D&encrypt=1&region=us1\
             &username=me%40example.com&password=5f4dcc3b5aa765d61d8327deb882cf99"
        );
    }
}
