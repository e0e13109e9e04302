//! RescueAR console host entry point.

use std::error::Error;
use std::sync::Arc;

use rescuear_app::config::{AppConfig, LogFormat};
use rescuear_app::console::ConsoleCommand;
use rescuear_app::model::locate_model;
use rescuear_app::renderer::run_renderer;
use rescuear_app::sensor::SimulatedSensor;
use rescuear_app::session::{RunningSession, SessionParts, resolve_procedure};
use rescuear_app::speech::{ConsoleSpeechBackend, UtteranceSink};
use rescuear_core::clock::SystemClock;
use rescuear_session::application::handle::session_channel;
use rescuear_tracking::application::session::TrackingSession;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match format {
        LogFormat::Json => tracing_subscriber::fmt().with_env_filter(filter).json().init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).pretty().init(),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::from_env()?;
    init_tracing(config.log_format);

    tracing::info!("Starting RescueAR");

    let procedure = Arc::new(resolve_procedure(&config)?);
    let model = locate_model(&config.model_path);
    let (handle, inbox) = session_channel();

    // Speech engine callbacks go through the inbox like every other input.
    let speech_inbox = handle.clone();
    let sink: UtteranceSink = Arc::new(move |event| speech_inbox.utterance_event(event));
    let speech = Arc::new(ConsoleSpeechBackend::new(
        tokio::runtime::Handle::current(),
        sink,
    ));

    let session = RunningSession::spawn(
        SessionParts {
            procedure: Arc::clone(&procedure),
            model,
            speech,
            voice: config.voice.clone(),
            clock: Arc::new(SystemClock),
        },
        handle,
        inbox,
    );
    let renderer = tokio::spawn(run_renderer(session.subscribe_events()));

    let tracking_inbox = session.handle.clone();
    let tracking = TrackingSession::new(config.tracking)
        .on_quality_change(move |quality| tracking_inbox.tracking_quality_changed(quality))
        .start(SimulatedSensor::new(config.sensor_fps));

    // Deferred by the coordinator until tracking is normal.
    session.handle.place_model(procedure.initial_pose());

    tracing::info!("Commands: next, complete, quit");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else { break };
        if line.trim().is_empty() {
            continue;
        }
        match line.parse::<ConsoleCommand>() {
            Ok(ConsoleCommand::Next) => {
                session.handle.advance();
            }
            Ok(ConsoleCommand::Complete) => {
                session.handle.complete();
            }
            Ok(ConsoleCommand::Quit) => break,
            Err(e) => tracing::warn!(input = %line.trim(), "{e}"),
        }
    }

    tracking.stop();
    session.shutdown().await;
    if let Err(e) = renderer.await {
        tracing::warn!(error = %e, "renderer task failed");
    }

    tracing::info!("RescueAR stopped");
    Ok(())
}
