use crate::document_store::ServiceCredentials;
use crate::domain::EmailAddress;
use secrecy::{ExposeSecret, Secret};
use serde_aux::field_attributes::deserialize_number_from_string;

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub email_client: EmailClientSettings,
    pub document_store: DocumentStoreSettings,
    pub approval: ApprovalSettings,
}

#[derive(serde::Deserialize, Clone)]
pub struct ApplicationSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
    /// Public origin embedded in the approval links we email out. The local default points at the
    /// loopback address; deployments behind a proxy must override it or the admin receives links
    /// nobody can click.
    pub base_url: String,
}

#[derive(serde::Deserialize, Clone)]
pub struct EmailClientSettings {
    pub base_url: String,
    pub sender_email: String,
    pub admin_email: String,
    pub authorization_token: Secret<String>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
}

impl EmailClientSettings {
    /// The address every notification is sent from. It must be pre-verified with the email
    /// provider.
    pub fn sender(&self) -> Result<EmailAddress, String> {
        EmailAddress::parse(self.sender_email.clone())
    }

    /// The fixed administrative recipient of every approval request.
    pub fn admin(&self) -> Result<EmailAddress, String> {
        EmailAddress::parse(self.admin_email.clone())
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_milliseconds)
    }
}

#[derive(serde::Deserialize, Clone)]
pub struct DocumentStoreSettings {
    pub base_url: String,
    /// Serialized JSON credential blob, exactly as handed out by the document store:
    /// `{"project_id": "...", "api_token": "..."}`. Deployments supply it through the
    /// `APP_DOCUMENT_STORE__SERVICE_ACCOUNT` environment variable.
    pub service_account: Secret<String>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
}

impl DocumentStoreSettings {
    pub fn credentials(&self) -> Result<ServiceCredentials, serde_json::Error> {
        serde_json::from_str(self.service_account.expose_secret())
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_milliseconds)
    }
}

#[derive(serde::Deserialize, Clone)]
pub struct ApprovalSettings {
    /// Shared secret embedded in the accept/reject links and checked on every callback. The
    /// checked-in default is a publicly known placeholder: it keeps local development friction
    /// free, but a deployment that does not override `APP_APPROVAL__SECRET` accepts tokens anyone
    /// can forge.
    pub secret: Secret<String>,
}

/// Loads the layered configuration: `configuration/base.yaml`, then the environment-specific file
/// selected by `APP_ENVIRONMENT` (`local` by default), then `APP_*` environment variables.
///
/// Environment variables use `__` as the level separator, e.g. `APP_APPLICATION__PORT=5001` sets
/// `Settings.application.port`. That is how deployments inject the values that must never be
/// committed: the email provider key (`APP_EMAIL_CLIENT__AUTHORIZATION_TOKEN`), the document
/// store service account (`APP_DOCUMENT_STORE__SERVICE_ACCOUNT`), the approval secret
/// (`APP_APPROVAL__SECRET`) and the public base URL (`APP_APPLICATION__BASE_URL`).
pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().expect("Failed to determine the current directory");
    let configuration_directory = base_path.join("configuration");

    // Detect the running environment. Default to `local` if unspecified.
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .expect("Failed to parse APP_ENVIRONMENT.");
    let environment_filename = format!("{}.yaml", environment.as_str());

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")))
        .add_source(config::File::from(
            configuration_directory.join(environment_filename),
        ))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}

/// The possible runtime environment for our application.
pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{other} is not a supported environment. Use either `local` or `production`."
            )),
        }
    }
}
