// Whisker authentication
//
// Cognito `InitiateAuth` with the USER_PASSWORD_AUTH flow. The ID token is
// only a bearer credential here, so its signature is never checked; we just
// read the `mid` claim out of the payload segment.

use base64::Engine;
use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use reqwest::Method;
use reqwest::header::HeaderMap;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::error::{Error, floor_char_boundary};
use crate::session::Session;
use crate::transport::RequestBody;
use crate::whisker::client::WhiskerClient;
use crate::whisker::models::{IdTokenClaims, InitiateAuthResponse};

const AMZ_JSON: &str = "application/x-amz-json-1.1";
const INITIATE_AUTH_TARGET: &str = "AWSCognitoIdentityProviderService.InitiateAuth";

impl WhiskerClient {
    /// Exchange email/password for Cognito tokens.
    ///
    /// On success the ID token becomes the session bearer token and the
    /// account id is decoded from it. On failure the session is cleared.
    pub async fn login(&self) -> Result<(), Error> {
        self.session().begin_login();
        match self.authenticate().await {
            Ok(session) => {
                info!(user_id = ?session.subject, "Whisker login successful");
                self.session().establish(session);
                Ok(())
            }
            Err(e) => {
                self.session().fail();
                Err(e)
            }
        }
    }

    async fn authenticate(&self) -> Result<Session, Error> {
        let url = self.endpoints().cognito.clone();
        debug!("authenticating with Cognito at {}", url);

        let payload = json!({
            "ClientId": self.endpoints().client_id,
            "AuthFlow": "USER_PASSWORD_AUTH",
            "AuthParameters": {
                "USERNAME": self.credentials().username(),
                "PASSWORD": self.credentials().password().expose_secret(),
            },
        });

        let mut headers = HeaderMap::new();
        headers.insert(
            "X-Amz-Target",
            reqwest::header::HeaderValue::from_static(INITIATE_AUTH_TARGET),
        );

        let resp = self
            .transport()
            .send(
                Method::POST,
                url,
                headers,
                RequestBody::Raw {
                    content_type: AMZ_JSON,
                    data: payload.to_string(),
                },
            )
            .await?;

        if resp.status != reqwest::StatusCode::OK {
            let preview = &resp.body[..floor_char_boundary(&resp.body, 200)];
            return Err(Error::Authentication {
                message: format!("Cognito rejected login (HTTP {}): {preview}", resp.status),
            });
        }

        let parsed: InitiateAuthResponse =
            serde_json::from_str(&resp.body).map_err(|e| Error::decode(&e, &resp.body))?;

        let Some(tokens) = parsed.authentication_result else {
            return Err(Error::Authentication {
                message: match parsed.challenge_name {
                    Some(challenge) => format!("unsupported auth challenge: {challenge}"),
                    None => "no AuthenticationResult in Cognito response".into(),
                },
            });
        };

        let subject = decode_subject(&tokens.id_token)?;

        let mut session = Session::new(SecretString::from(tokens.id_token));
        session.secondary_token = tokens.access_token.map(SecretString::from);
        session.subject = Some(subject);
        Ok(session)
    }
}

/// Read the `mid` claim from the payload segment of a JWT.
pub fn decode_subject(token: &str) -> Result<String, Error> {
    let mut parts = token.split('.');
    let (Some(_header), Some(payload), Some(_signature)) =
        (parts.next(), parts.next(), parts.next())
    else {
        return Err(Error::TokenDecode {
            message: "token is not a three-part JWT".into(),
        });
    };

    let trimmed = payload.trim_end_matches('=');
    let bytes = URL_SAFE_NO_PAD
        .decode(trimmed)
        .or_else(|_| STANDARD_NO_PAD.decode(trimmed))
        .map_err(|e| Error::TokenDecode {
            message: format!("payload is not base64: {e}"),
        })?;

    let claims: IdTokenClaims = serde_json::from_slice(&bytes).map_err(|e| Error::TokenDecode {
        message: format!("payload is not JSON: {e}"),
    })?;

    match claims.mid {
        Some(Value::String(mid)) if !mid.is_empty() => Ok(mid),
        Some(Value::Number(mid)) => Ok(mid.to_string()),
        _ => Err(Error::TokenDecode {
            message: "token carries no mid claim".into(),
        }),
    }
}
