use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use google_cloud_auth::credentials::CredentialsFile;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::ConnectionError;

/// Name of the secret entry holding the service account.
pub const SECRET_ENTRY: &str = "gcp_service_account";

/// Google service account key, as found in a downloaded key file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceAccount {
    #[serde(rename = "type")]
    pub account_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key_id: Option<String>,
    pub private_key: String,
    pub client_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_uri: Option<String>,
}

impl ServiceAccount {
    fn validate(self, origin: &CredentialOrigin) -> Result<Self, ConnectionError> {
        let invalid = |message: &str| ConnectionError::InvalidCredentials {
            origin: origin.to_string(),
            message: message.to_string(),
        };
        if self.account_type != "service_account" {
            return Err(invalid("type must be \"service_account\""));
        }
        if !self.private_key.contains("PRIVATE KEY") {
            return Err(invalid("private_key is not a PEM key"));
        }
        if !self.client_email.contains('@') {
            return Err(invalid("client_email is not an e-mail address"));
        }
        Ok(self)
    }

    pub fn into_credentials_file(self) -> Result<CredentialsFile, ConnectionError> {
        let invalid = |e: serde_json::Error| ConnectionError::InvalidCredentials {
            origin: self.client_email.clone(),
            message: e.to_string(),
        };
        let value = serde_json::to_value(&self).map_err(invalid)?;
        serde_json::from_value(value).map_err(invalid)
    }
}

/// Where the credentials were found.
#[derive(Debug, Clone, PartialEq)]
pub enum CredentialOrigin {
    Secrets(PathBuf),
    File(PathBuf),
}

impl fmt::Display for CredentialOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialOrigin::Secrets(path) => {
                write!(f, "{} [{SECRET_ENTRY}]", path.display())
            }
            CredentialOrigin::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Resolves the service account: the `gcp_service_account` secret entry when present,
/// the credential file otherwise. A present but broken entry does not fall back.
pub fn resolve_credentials(
    secrets: &Path,
    credentials_file: &Path,
) -> Result<(CredentialOrigin, ServiceAccount), ConnectionError> {
    if let Some(entry) = secret_entry(secrets)? {
        let origin = CredentialOrigin::Secrets(secrets.to_path_buf());
        info!("Found {SECRET_ENTRY} in {}", secrets.display());
        let account = entry
            .try_into::<ServiceAccount>()
            .map_err(|e| ConnectionError::InvalidCredentials {
                origin: origin.to_string(),
                message: e.message().to_string(),
            })?;
        let account = account.validate(&origin)?;
        return Ok((origin, account));
    }

    debug!("No {SECRET_ENTRY} secret, reading {}", credentials_file.display());
    let origin = CredentialOrigin::File(credentials_file.to_path_buf());
    let text =
        fs::read_to_string(credentials_file).map_err(|source| ConnectionError::CredentialsFile {
            path: credentials_file.to_path_buf(),
            source,
        })?;
    let account: ServiceAccount =
        serde_json::from_str(&text).map_err(|e| ConnectionError::InvalidCredentials {
            origin: origin.to_string(),
            message: e.to_string(),
        })?;
    let account = account.validate(&origin)?;
    Ok((origin, account))
}

/// The secret entry, if the secrets file exists and holds one.
fn secret_entry(secrets: &Path) -> Result<Option<toml::Value>, ConnectionError> {
    let text = match fs::read_to_string(secrets) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(ConnectionError::Secrets {
                path: secrets.to_path_buf(),
                message: e.to_string(),
            });
        }
    };
    let mut table: toml::Table = toml::from_str(&text).map_err(|e| ConnectionError::Secrets {
        path: secrets.to_path_buf(),
        message: e.message().to_string(),
    })?;
    Ok(table.remove(SECRET_ENTRY))
}
