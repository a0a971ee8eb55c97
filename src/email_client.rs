use crate::domain::EmailAddress;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};

/// A client for the email delivery provider's REST API.
///
/// One instance is built at startup and shared across requests; the underlying `reqwest::Client`
/// keeps a connection pool behind an `Arc`, so cloning handles is cheap and no further
/// synchronisation is needed.
pub struct EmailClient {
    http_client: Client,
    base_url: String,
    sender: EmailAddress,
    authorization_token: Secret<String>,
}

impl EmailClient {
    pub fn new(
        base_url: String,
        sender: EmailAddress,
        authorization_token: Secret<String>,
        timeout: std::time::Duration,
    ) -> Result<Self, reqwest::Error> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            base_url,
            sender,
            authorization_token,
        })
    }

    /// A single delivery attempt - there is no retry here. A non-2xx provider response (bad key,
    /// unverified sender, quota) surfaces as an error just like a network failure.
    pub async fn send_email(
        &self,
        recipient: &EmailAddress,
        subject: &str,
        html_content: &str,
    ) -> Result<(), reqwest::Error> {
        let url = format!("{}/v3/mail/send", self.base_url);
        let request_body = SendEmailRequest {
            to: recipient.as_ref(),
            from: self.sender.as_ref(),
            subject,
            html: html_content,
        };
        self.http_client
            .post(&url)
            .bearer_auth(self.authorization_token.expose_secret())
            .json(&request_body)
            .send()
            .await?
            // `send` only fails on transport errors; turn non-2xx statuses into errors as well.
            .error_for_status()?;
        Ok(())
    }
}

/// Using a lifetime parameter lets us reference the caller's data instead of cloning four strings
/// on every send.
#[derive(serde::Serialize)]
struct SendEmailRequest<'a> {
    to: &'a str,
    from: &'a str,
    subject: &'a str,
    html: &'a str,
}
