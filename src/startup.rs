use crate::configuration::Settings;
use crate::document_store::DocumentStoreClient;
use crate::domain::EmailAddress;
use crate::email_client::EmailClient;
use crate::routes;
use actix_web::{dev::Server, web, App, HttpServer};
use once_cell::sync::Lazy;
use secrecy::Secret;
use std::net::TcpListener;
use tera::Tera;
use tracing_actix_web::TracingLogger;

/// The template registry for the approval email.
///
/// The template text is embedded in the binary with `include_str!`, so a malformed template takes
/// the process down the first time the registry is touched rather than on some later
/// notification. Tera auto-escapes every value rendered into a `.html` template.
static TEMPLATES: Lazy<Tera> = Lazy::new(|| {
    let mut templates = Tera::default();
    templates
        .add_raw_template(
            "approval_email.html",
            include_str!("../templates/approval_email.html"),
        )
        .expect("Failed to register the approval email template");
    templates
});

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    /// Builds every collaborator out of `Settings` and binds the listener. All credential and
    /// address validation happens here: a misconfigured application refuses to start instead of
    /// failing on its first request.
    pub async fn build(configuration: Settings) -> Result<Self, std::io::Error> {
        let sender_email = configuration
            .email_client
            .sender()
            .expect("Invalid sender email address.");
        let admin_email = configuration
            .email_client
            .admin()
            .expect("Invalid admin email address.");
        let timeout = configuration.email_client.timeout();
        let email_client = EmailClient::new(
            configuration.email_client.base_url,
            sender_email,
            configuration.email_client.authorization_token,
            timeout,
        )
        .expect("Unable to build email client");

        let credentials = configuration
            .document_store
            .credentials()
            .expect("Invalid document store service account.");
        let store_timeout = configuration.document_store.timeout();
        let store_client = DocumentStoreClient::new(
            configuration.document_store.base_url,
            credentials,
            store_timeout,
        )
        .expect("Unable to build document store client");

        let address = format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        );
        let listener = TcpListener::bind(&address)?;
        // Retrieve the port assigned to us by the OS
        let port = listener.local_addr().unwrap().port();
        let server = run(
            listener,
            email_client,
            store_client,
            AdminEmail(admin_email),
            ApplicationBaseUrl(configuration.application.base_url),
            ApprovalSecret(configuration.approval.secret),
        )?;

        // We "save" the bound port in one of `Application`'s fields.
        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// A more expressive name that makes it clear that this function only returns when the
    /// application is stopped.
    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

/// We need a wrapper type in order to retrieve the base URL in the `notify_admin` handler.
/// Retrieval from the context, in actix-web, is type-based: using a raw `String` would expose us
/// to conflicts.
pub struct ApplicationBaseUrl(pub String);

/// The shared secret embedded in every approval link and checked by `handle_approval`.
pub struct ApprovalSecret(pub Secret<String>);

/// The address every approval request email is sent to.
pub struct AdminEmail(pub EmailAddress);

pub fn run(
    listener: TcpListener,
    email_client: EmailClient,
    store_client: DocumentStoreClient,
    admin_email: AdminEmail,
    base_url: ApplicationBaseUrl,
    approval_secret: ApprovalSecret,
) -> Result<Server, std::io::Error> {
    // Wrap the shared collaborators in a smart pointer
    let email_client = web::Data::new(email_client);
    let store_client = web::Data::new(store_client);
    let admin_email = web::Data::new(admin_email);
    let base_url = web::Data::new(base_url);
    let approval_secret = web::Data::new(approval_secret);
    let templates = web::Data::new(&*TEMPLATES);
    let server = HttpServer::new(move || {
        App::new()
            // Middlewares are added using the `wrap` method on `App`
            .wrap(TracingLogger::default())
            .route("/health_check", web::get().to(routes::health_check))
            .route("/notify-admin", web::post().to(routes::notify_admin))
            .route("/handle-approval", web::get().to(routes::handle_approval))
            // Register the shared collaborators as part of the application state
            .app_data(email_client.clone())
            .app_data(store_client.clone())
            .app_data(admin_email.clone())
            .app_data(base_url.clone())
            .app_data(approval_secret.clone())
            .app_data(templates.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
