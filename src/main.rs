use std::sync::Arc;

use anyhow::Context;

use roti_bank::channels::{
    EmailConfig, MessagingSender, SmtpEmailSender, TwilioConfig, WhatsAppSender,
};
use roti_bank::config::ServiceConfig;
use roti_bank::donation::{DonationNotifier, NotifierSettings};
use roti_bank::webhook::{IntentRouter, webhook_routes};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before anything reads the environment
    let dotenv = dotenvy::dotenv();

    // Install rustls crypto provider before any TLS usage
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install rustls crypto provider"))?;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    if let Ok(path) = dotenv {
        tracing::info!(path = %path.display(), "Loaded environment file");
    }

    let config = ServiceConfig::from_env().context("service configuration")?;
    let email_config = EmailConfig::from_env(&config.org_name).context("email configuration")?;
    let twilio_config = TwilioConfig::from_env().context("Twilio configuration")?;

    // ── Notification clients ────────────────────────────────────────
    let email = Arc::new(SmtpEmailSender::new(&email_config).context("SMTP sender")?);
    let sandbox_join_code = twilio_config.sandbox_join_code.clone();
    let whatsapp = Arc::new(WhatsAppSender::new(twilio_config));

    eprintln!("🍞 Roti Bank webhook v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Organization: {}", config.org_name);
    eprintln!(
        "   Email: {} via {}:{}",
        email_config.username, email_config.smtp_host, email_config.smtp_port
    );
    eprintln!(
        "   WhatsApp: {}{}",
        whatsapp.sender_id(),
        if whatsapp.is_sandbox() { " (sandbox)" } else { "" }
    );
    eprintln!(
        "   Donations: {} validation, {} replies",
        config.policy.validation, config.policy.response
    );
    eprintln!("   Webhook: http://0.0.0.0:{}/webhook\n", config.port);

    // ── Fulfillment ─────────────────────────────────────────────────
    let notifier = Arc::new(DonationNotifier::new(
        email,
        whatsapp,
        NotifierSettings {
            org_name: config.org_name.clone(),
            sandbox_join_code,
        },
        config.policy,
    ));
    let router = Arc::new(IntentRouter::new(config.org_name.clone(), notifier));
    let app = webhook_routes(router);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("Failed to bind port {}", config.port))?;
    tracing::info!(port = config.port, "Roti Bank server is running");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("Shutting down");
        })
        .await?;

    Ok(())
}
