// Whisker GraphQL client
//
// Every data call is a JSON `{query, variables}` POST carrying the Cognito
// ID token as a bearer credential. A 401 triggers one re-login and replay.

use reqwest::Method;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, warn};
use url::Url;

use crate::auth::Credentials;
use crate::error::Error;
use crate::session::{SessionCell, SessionState};
use crate::transport::{RawResponse, RequestBody, Transport};
use crate::whisker::models::GraphQlResponse;

/// Identity provider, app client id and GraphQL endpoints.
///
/// Defaults are the production values used by the Whisker app.
#[derive(Debug, Clone)]
pub struct WhiskerEndpoints {
    pub cognito: Url,
    pub client_id: String,
    /// Pet profiles and weight history.
    pub pet_graphql: Url,
    /// Litter-Robot 4 status and activity.
    pub robot_graphql: Url,
}

impl Default for WhiskerEndpoints {
    fn default() -> Self {
        let parse = |raw: &str| Url::parse(raw).unwrap_or_else(|_| unreachable!("static URL"));
        Self {
            cognito: parse("https://cognito-idp.us-east-1.amazonaws.com/"),
            client_id: "4552ujeu3aic90nf8qn53levmn".into(),
            pet_graphql: parse("https://pet-profile.iothings.site/graphql"),
            robot_graphql: parse("https://lr4.iothings.site/graphql"),
        }
    }
}

/// Which GraphQL surface a query targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    PetProfile,
    Robot,
}

/// Raw HTTP client for the Whisker cloud.
pub struct WhiskerClient {
    transport: Transport,
    endpoints: WhiskerEndpoints,
    credentials: Credentials,
    session: SessionCell,
}

impl WhiskerClient {
    pub fn new(transport: Transport, endpoints: WhiskerEndpoints, credentials: Credentials) -> Self {
        Self {
            transport,
            endpoints,
            credentials,
            session: SessionCell::new(),
        }
    }

    pub fn session(&self) -> &SessionCell {
        &self.session
    }

    pub fn session_state(&self) -> SessionState {
        self.session.state()
    }

    pub fn endpoints(&self) -> &WhiskerEndpoints {
        &self.endpoints
    }

    /// Account id decoded from the ID token at login.
    pub fn user_id(&self) -> Result<String, Error> {
        self.session
            .current()
            .and_then(|s| s.subject)
            .ok_or(Error::NotAuthenticated)
    }

    pub(crate) fn transport(&self) -> &Transport {
        &self.transport
    }

    pub(crate) fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    fn url_for(&self, surface: Surface) -> Url {
        match surface {
            Surface::PetProfile => self.endpoints.pet_graphql.clone(),
            Surface::Robot => self.endpoints.robot_graphql.clone(),
        }
    }

    // ── GraphQL ──────────────────────────────────────────────────────

    /// Run a query whose result at `data.<operation>` is a list.
    ///
    /// A missing or null list is returned as empty. GraphQL `errors` only
    /// fail the call when no data came back with them.
    pub(crate) async fn query_list<T: DeserializeOwned>(
        &self,
        surface: Surface,
        operation: &str,
        query: &str,
        variables: Value,
    ) -> Result<Vec<T>, Error> {
        debug!(operation, "GraphQL query");
        let body = json!({ "query": query, "variables": variables });
        let resp = self.authorized(self.url_for(surface), body).await?;

        let envelope: GraphQlResponse =
            serde_json::from_str(&resp.body).map_err(|e| Error::decode(&e, &resp.body))?;

        let data = envelope
            .data
            .and_then(|mut data| data.remove(operation))
            .filter(|v| !v.is_null());

        if !envelope.errors.is_empty() {
            let message = envelope
                .errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            if data.is_none() {
                return Err(Error::GraphQl { message });
            }
            warn!(operation, %message, "GraphQL returned partial data");
        }

        match data {
            Some(value) => {
                let text = value.to_string();
                serde_json::from_value(value).map_err(|e| Error::decode(&e, &text))
            }
            None => Ok(Vec::new()),
        }
    }

    /// POST with the bearer token; on 401 log in once more and replay.
    async fn authorized(&self, url: Url, body: Value) -> Result<RawResponse, Error> {
        let resp = self.attempt(url.clone(), body.clone()).await?;
        if !resp.is_unauthorized() {
            return resp.error_for_status();
        }

        warn!("Whisker token rejected, logging in again");
        self.session.invalidate();
        self.login().await?;

        let resp = self.attempt(url, body).await?;
        if resp.is_unauthorized() {
            self.session.fail();
            return Err(Error::SessionExpired);
        }
        resp.error_for_status()
    }

    async fn attempt(&self, url: Url, body: Value) -> Result<RawResponse, Error> {
        let session = self.session.current().ok_or(Error::NotAuthenticated)?;
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", session.token.expose_secret()))
            .map_err(|e| Error::Authentication {
                message: format!("invalid token header value: {e}"),
            })?;
        bearer.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, bearer);

        self.transport
            .send(Method::POST, url, headers, RequestBody::Json(body))
            .await
    }
}
