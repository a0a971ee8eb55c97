use approval_relay::configuration::get_configuration;
use approval_relay::startup::Application;
use approval_relay::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let subscriber = get_subscriber("approval-relay".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    // Panic if we can't read configuration
    let configuration = get_configuration().expect("Failed to read configuration.");
    let application = Application::build(configuration).await?;
    tracing::info!("Server listening on port {}", application.port());
    application.run_until_stopped().await?;
    Ok(())
}
