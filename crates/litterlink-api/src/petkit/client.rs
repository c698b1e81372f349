// PetKit HTTP client
//
// Wraps the shared `Transport` with PetKit-specific headers, URL
// construction against the session's regional gateway, `result` envelope
// unwrapping, and the single re-login retry on authorization failure.
// Endpoint modules (auth, family, records) add inherent methods in
// separate files.

use reqwest::Method;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::auth::Credentials;
use crate::error::Error;
use crate::petkit::models::ErrorBody;
use crate::session::{SessionCell, SessionState};
use crate::transport::{RequestBody, Transport};

/// PetKit reports an expired session as error code 5 inside an HTTP 200.
const SESSION_EXPIRED_CODE: i64 = 5;

/// Endpoints and client identifiers the PetKit app presents.
///
/// Defaults match the Android app; override `passport` to point at a mock
/// server in tests.
#[derive(Debug, Clone)]
pub struct PetKitEndpoints {
    /// Global entry point serving the regional server list.
    pub passport: Url,
    pub api_version: String,
    pub client_header: String,
    pub user_agent: String,
    pub locale: String,
    pub device_model: String,
    pub os_version: String,
    pub platform: String,
    pub source: String,
}

impl Default for PetKitEndpoints {
    fn default() -> Self {
        Self {
            passport: Url::parse("https://passport.petkt.com")
                .unwrap_or_else(|_| unreachable!("static URL is valid")),
            api_version: "12.4.1".into(),
            client_header: "android(15.1;23127PN0CG)".into(),
            user_agent: "okhttp/3.12.11".into(),
            locale: "en-US".into(),
            device_model: "23127PN0CG".into(),
            os_version: "15.1".into(),
            platform: "android".into(),
            source: "app.petkit-android".into(),
        }
    }
}

impl PetKitEndpoints {
    /// Production identifiers with a different passport URL.
    pub fn with_passport(passport: Url) -> Self {
        Self {
            passport,
            ..Self::default()
        }
    }
}

/// Timezone hint sent in the login `client` blob.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientTimezone {
    /// IANA name, e.g. `America/New_York`.
    pub id: String,
    /// Current UTC offset in hours.
    pub offset_hours: f64,
}

impl Default for ClientTimezone {
    fn default() -> Self {
        Self {
            id: "UTC".into(),
            offset_hours: 0.0,
        }
    }
}

/// Effective payload of a PetKit response after envelope handling.
pub(crate) enum Envelope {
    Payload(Value),
    SessionExpired,
}

/// Raw HTTP client for the PetKit cloud.
///
/// Holds the credentials so it can log in again on its own when the server
/// rejects the session.
pub struct PetKitClient {
    transport: Transport,
    endpoints: PetKitEndpoints,
    credentials: Credentials,
    region: String,
    timezone: ClientTimezone,
    session: SessionCell,
}

impl PetKitClient {
    pub fn new(
        transport: Transport,
        endpoints: PetKitEndpoints,
        credentials: Credentials,
        region: impl Into<String>,
        timezone: ClientTimezone,
    ) -> Self {
        Self {
            transport,
            endpoints,
            credentials,
            region: region.into(),
            timezone,
            session: SessionCell::new(),
        }
    }

    pub fn session(&self) -> &SessionCell {
        &self.session
    }

    pub fn session_state(&self) -> SessionState {
        self.session.state()
    }

    pub fn endpoints(&self) -> &PetKitEndpoints {
        &self.endpoints
    }

    pub(crate) fn transport(&self) -> &Transport {
        &self.transport
    }

    pub(crate) fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub(crate) fn region(&self) -> &str {
        &self.region
    }

    pub(crate) fn timezone(&self) -> &ClientTimezone {
        &self.timezone
    }

    // ── Headers & URLs ───────────────────────────────────────────────

    /// Headers the vendor requires on every call, plus `X-Session` when a
    /// token is supplied.
    pub(crate) fn headers(&self, token: Option<&SecretString>) -> Result<HeaderMap, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
        headers.insert("X-Api-Version", header_value(&self.endpoints.api_version)?);
        headers.insert("X-Client", header_value(&self.endpoints.client_header)?);
        headers.insert(USER_AGENT, header_value(&self.endpoints.user_agent)?);
        if let Some(token) = token {
            let mut value = header_value(token.expose_secret())?;
            value.set_sensitive(true);
            headers.insert("X-Session", value);
        }
        Ok(headers)
    }

    /// `{base}{path}` with the base's trailing slash removed.
    pub(crate) fn join(base: &Url, path: &str) -> Result<Url, Error> {
        let base = base.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}{path}"))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Authorized GET against the session gateway, decoded into `T`.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let payload = self
            .authorized(Method::GET, path, RequestBody::Empty)
            .await?;
        decode_payload(payload)
    }

    /// Authorized form POST against the session gateway, decoded into `T`.
    pub(crate) async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        form: String,
    ) -> Result<T, Error> {
        let payload = self
            .authorized(Method::POST, path, RequestBody::Form(form))
            .await?;
        decode_payload(payload)
    }

    /// Issue a request with the current session; on an authorization
    /// failure log in once more and replay it. A second rejection is final.
    async fn authorized(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
    ) -> Result<Value, Error> {
        if let Envelope::Payload(payload) = self.attempt(method.clone(), path, body.clone()).await?
        {
            return Ok(payload);
        }

        warn!(path, "PetKit session rejected, logging in again");
        self.session.invalidate();
        self.login().await?;

        match self.attempt(method, path, body).await? {
            Envelope::Payload(payload) => Ok(payload),
            Envelope::SessionExpired => {
                self.session.fail();
                Err(Error::SessionExpired)
            }
        }
    }

    async fn attempt(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
    ) -> Result<Envelope, Error> {
        let session = self.session.current().ok_or(Error::NotAuthenticated)?;
        let base = session.base_url.as_ref().ok_or(Error::NotAuthenticated)?;
        let url = Self::join(base, path)?;
        let headers = self.headers(Some(&session.token))?;

        let resp = self.transport.send(method, url, headers, body).await?;
        if resp.is_unauthorized() {
            debug!(path, "HTTP 401 from PetKit");
            return Ok(Envelope::SessionExpired);
        }
        let resp = resp.error_for_status()?;
        unwrap_envelope(&resp.body)
    }
}

/// Strip the `{ "result": ... }` wrapper, surfacing `{ "error": ... }`.
pub(crate) fn unwrap_envelope(body: &str) -> Result<Envelope, Error> {
    let mut doc: Value = serde_json::from_str(body).map_err(|e| Error::decode(&e, body))?;

    if let Some(err) = doc.get("error").filter(|v| !v.is_null()) {
        let err: ErrorBody = serde_json::from_value(err.clone()).map_err(|e| Error::decode(&e, body))?;
        if err.code == SESSION_EXPIRED_CODE {
            return Ok(Envelope::SessionExpired);
        }
        return Err(Error::Vendor {
            code: err.code,
            message: err.msg.unwrap_or_default(),
        });
    }

    match doc.get_mut("result") {
        Some(result) => Ok(Envelope::Payload(result.take())),
        None => Ok(Envelope::Payload(doc)),
    }
}

pub(crate) fn decode_payload<T: DeserializeOwned>(payload: Value) -> Result<T, Error> {
    let text = payload.to_string();
    serde_json::from_value(payload).map_err(|e| Error::decode(&e, &text))
}

fn header_value(raw: &str) -> Result<HeaderValue, Error> {
    HeaderValue::from_str(raw).map_err(|e| Error::Authentication {
        message: format!("invalid header value: {e}"),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn result_field_is_unwrapped() {
        let Envelope::Payload(v) = unwrap_envelope(r#"{"result":{"a":1}}"#).unwrap() else {
            panic!("expected payload");
        };
        assert_eq!(v["a"], 1);
    }

    #[test]
    fn body_without_result_passes_through() {
        let Envelope::Payload(v) = unwrap_envelope(r"[1,2]").unwrap() else {
            panic!("expected payload");
        };
        assert_eq!(v.as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn vendor_error_surfaces() {
        let err = unwrap_envelope(r#"{"error":{"code":122,"msg":"bad password"}}"#)
            .err()
            .unwrap();
        assert!(matches!(err, Error::Vendor { code: 122, .. }));
    }

    #[test]
    fn session_expired_code_requests_relogin() {
        let env = unwrap_envelope(r#"{"error":{"code":5,"msg":"expired"}}"#).unwrap();
        assert!(matches!(env, Envelope::SessionExpired));
    }

    #[test]
    fn join_strips_trailing_slash() {
        let base = Url::parse("https://api.example.com/latest/").unwrap();
        let url = PetKitClient::join(&base, "/user/login").unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/latest/user/login");
    }
}
