use anyhow::{Context as _, Result, bail};
use chrono::Utc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use verification_codes::application::dto::{AuthorizationContext, GrantSubject};
use verification_codes::config::AppConfig;
use verification_codes::infrastructure;

#[tokio::main]
async fn main() {
    if let Err(err) = bootstrap().await {
        tracing::error!(error = %err, "fatal error");
        eprintln!("fatal error: {err:#}");
        std::process::exit(1);
    }
}

/// Connect the configured backend, create its table if needed and prove the
/// store/consume cycle works end to end.
async fn bootstrap() -> Result<()> {
    init_tracing();

    let config = AppConfig::from_env()?;
    tracing::info!(backend = %config.backend(), "starting verification code store check");

    let service = infrastructure::build_service(&config)
        .await
        .context("failed to initialise verification code backend")?;

    let sample = AuthorizationContext::new(
        GrantSubject {
            user_id: 0,
            username: "self-check".into(),
        },
        "verification-codes-self-check",
        Utc::now(),
    );

    let code = service.store(&sample).await?;
    let restored: AuthorizationContext = service.consume(code.as_str()).await?;
    if restored != sample {
        bail!("self-check context did not survive a store/consume round trip");
    }
    match service.consume::<AuthorizationContext>(code.as_str()).await {
        Err(verification_codes::ApplicationError::InvalidCode) => {}
        Ok(_) => bail!("self-check code was redeemable twice"),
        Err(err) => return Err(err.into()),
    }

    tracing::info!(backend = service.backend_name(), "verification code store ready");
    Ok(())
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG")
        .ok()
        .unwrap_or_else(|| "info,sqlx=warn".to_string());

    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(env_filter))
        .with(tracing_subscriber::fmt::layer());

    if subscriber.try_init().is_err() {
        tracing::warn!("tracing subscriber already initialised");
    }
}
