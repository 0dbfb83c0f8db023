//! Mood bot - a Telegram companion that asks how you are
//!
//! Reads text and voice messages, classifies the sender's mood from a
//! lexicon and answers with encouragement or coping exercises.

mod config;
mod exercises;
mod journal;
mod mood;
mod runtime;
mod speech;
mod state_machine;
mod telegram;

use config::BotConfig;
use journal::FileJournal;
use mood::Lexicon;
use runtime::{Journal, RuntimeManager, Services};
use speech::{DeepgramClient, FfmpegTranscoder, VoicePipeline};
use std::sync::Arc;
use telegram::TelegramClient;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Updates buffered between the poller and the runtime manager
const EVENT_BUFFER: usize = 64;

fn init_tracing(dev: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "mood_bot=info".into());
    let registry = tracing_subscriber::registry().with(filter);

    if dev {
        registry.with(tracing_subscriber::fmt::layer()).init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_span_list(false),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Configuration
    let env_file = BotConfig::load_env_file();
    let config = BotConfig::from_env()?;
    init_tracing(config.dev);

    match env_file {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded environment file"),
        Err(e) => tracing::debug!(error = %e, "No environment file loaded"),
    }

    let lexicon = match &config.lexicon_path {
        Some(path) => Lexicon::load(path)?,
        None => Lexicon::builtin(),
    };
    tracing::info!(patterns = lexicon.pattern_count(), custom = config.lexicon_path.is_some(), "Lexicon loaded");

    // Collaborators
    let telegram = TelegramClient::new(&config.telegram_api_base, &config.telegram_token)?;
    let me = telegram.get_me().await?;
    tracing::info!(username = me.username.as_deref().unwrap_or_default(), "Authorized on account");

    let journal: Option<Arc<dyn Journal>> = match FileJournal::open(&config.journal_path).await {
        Ok(journal) => {
            tracing::info!(path = %journal.path().display(), "Conversation journal open");
            Some(Arc::new(journal))
        }
        Err(e) => {
            tracing::warn!(path = %config.journal_path.display(), error = %e, "Journal unavailable, continuing without it");
            None
        }
    };

    let messenger = Arc::new(telegram.clone());
    let pipeline = VoicePipeline::new(
        messenger.clone(),
        Arc::new(FfmpegTranscoder::new(&config.ffmpeg)),
        Arc::new(DeepgramClient::new(&config.deepgram_token, &config.deepgram_endpoint)?),
        &config.scratch_dir,
    );
    tracing::info!(scratch_dir = %pipeline.scratch_dir().display(), encoder = %config.ffmpeg, "Voice pipeline ready");

    let manager = RuntimeManager::new(Services {
        messenger,
        journal,
        pipeline: Arc::new(pipeline),
        lexicon: Arc::new(lexicon),
    });

    // Shutdown on Ctrl-C
    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl-C");
                return;
            }
            tracing::info!("Received Ctrl-C, shutting down");
            cancel.cancel();
        }
    });

    let (event_tx, event_rx) = mpsc::channel(EVENT_BUFFER);
    let poller = tokio::spawn(telegram::poll_updates(
        telegram,
        config.poll_timeout,
        event_tx,
        cancel.clone(),
    ));

    manager.run(event_rx, cancel).await;
    poller.await?;

    Ok(())
}
