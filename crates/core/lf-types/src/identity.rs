//! AWS identity: region, credentials and endpoint override.

use crate::params::{self, RuntimeParameters};
use lf_error::ConfigError;
use std::fmt;

/// Where credentials come from.
#[derive(Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// A static key pair, optionally with a session token
    Static {
        access_key_id: String,
        secret_access_key: String,
        session_token: Option<String>,
    },
    /// A named profile from the shared AWS config files
    Profile(String),
}

impl fmt::Debug for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static {
                access_key_id,
                session_token,
                ..
            } => f
                .debug_struct("Static")
                .field("access_key_id", access_key_id)
                .field("secret_access_key", &"********")
                .field("session_token", &session_token.as_ref().map(|_| "********"))
                .finish(),
            Self::Profile(name) => f.debug_tuple("Profile").field(name).finish(),
        }
    }
}

/// Validated identity used to build service clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwsSettings {
    pub region: String,
    pub credentials: CredentialSource,
    pub endpoint_url: Option<String>,
}

impl AwsSettings {
    /// Validate identity parameters.
    ///
    /// The region is required. Credentials are a complete static key pair or,
    /// failing that, a profile name. Half a key pair is malformed even when a
    /// profile is also given.
    pub fn from_params(params: &RuntimeParameters) -> Result<Self, ConfigError> {
        let region = params.require(params::AWS_REGION)?.trim().to_string();

        let access_key = params.optional(params::AWS_ACCESS_KEY_ID);
        let secret_key = params.optional(params::AWS_SECRET_ACCESS_KEY);
        let profile = params.optional(params::AWS_CONFIGURATION_PROFILE);

        let credentials = match (access_key, secret_key, profile) {
            (Some(ak), Some(sk), _) => CredentialSource::Static {
                access_key_id: ak.to_string(),
                secret_access_key: sk.to_string(),
                session_token: params
                    .optional(params::AWS_SESSION_TOKEN)
                    .map(str::to_string),
            },
            (Some(_), None, _) => {
                return Err(ConfigError::Credentials(format!(
                    "{} is set but {} is missing",
                    params::AWS_ACCESS_KEY_ID,
                    params::AWS_SECRET_ACCESS_KEY
                )))
            }
            (None, Some(_), _) => {
                return Err(ConfigError::Credentials(format!(
                    "{} is set but {} is missing",
                    params::AWS_SECRET_ACCESS_KEY,
                    params::AWS_ACCESS_KEY_ID
                )))
            }
            (None, None, Some(profile)) => CredentialSource::Profile(profile.trim().to_string()),
            (None, None, None) => {
                return Err(ConfigError::Credentials(format!(
                    "either {} and {}, or {} must be set",
                    params::AWS_ACCESS_KEY_ID,
                    params::AWS_SECRET_ACCESS_KEY,
                    params::AWS_CONFIGURATION_PROFILE
                )))
            }
        };

        let endpoint_url = match params.optional(params::AWS_ENDPOINT_URL) {
            Some(url) => {
                let url = url.trim();
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    return Err(ConfigError::InvalidValue {
                        name: params::AWS_ENDPOINT_URL.to_string(),
                        reason: format!("'{}' is not an http(s) URL", url),
                    });
                }
                Some(url.to_string())
            }
            None => None,
        };

        Ok(Self {
            region,
            credentials,
            endpoint_url,
        })
    }

    /// Create settings for a static key pair.
    pub fn with_static_keys(
        region: impl Into<String>,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> Self {
        Self {
            region: region.into(),
            credentials: CredentialSource::Static {
                access_key_id: access_key_id.into(),
                secret_access_key: secret_access_key.into(),
                session_token: None,
            },
            endpoint_url: None,
        }
    }

    /// Set an endpoint override.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint.into());
        self
    }
}
