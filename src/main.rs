use anyhow::Result;
use tracing::info;

use pricewatch::config::{ChannelChoice, Settings};
use pricewatch::notify::{EmailChannel, NotificationChannel, SmsChannel};
use pricewatch::pipeline::PriceWatch;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pricewatch=debug".parse()?),
        )
        .init();

    // A missing .env file is fine; the environment itself may carry the vars.
    dotenvy::dotenv().ok();

    let settings = Settings::from_env()?;
    info!(
        url = %settings.watch.source_url,
        threshold = %settings.watch.price_threshold,
        "starting price watch run"
    );

    let pipeline = PriceWatch::new(settings.watch.clone(), settings.http_timeout)?;

    let channel: Box<dyn NotificationChannel> = match settings.channel {
        ChannelChoice::Sms => Box::new(SmsChannel::new(settings.sms, settings.http_timeout)?),
        ChannelChoice::Email => Box::new(EmailChannel::new(settings.email)),
    };

    let summary = pipeline.run(channel.as_ref()).await?;
    info!(
        extracted = summary.extracted,
        flagged = summary.flagged,
        notified = summary.notified,
        "run complete"
    );

    Ok(())
}
