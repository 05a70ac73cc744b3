//! Per-actor realtime client
//!
//! Maintains one WebSocket connection to the platform's realtime endpoint
//! and forwards parsed events to the owning actor. Connect failures and
//! unexpected closes never escalate; the client backs off and retries
//! until the run stops or the actor goes away.

use crate::connection::ConnectionStateMachine;
use crate::events::RealtimeEvent;
use futures::StreamExt;
use stampede_core::StopSignal;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, warn};

pub async fn run_client(
    url: String,
    actor_id: String,
    backoff: Duration,
    events: mpsc::Sender<RealtimeEvent>,
    mut stop: StopSignal,
) {
    let mut machine = ConnectionStateMachine::new();

    loop {
        if stop.is_stopped() {
            return;
        }
        machine.connect_started();

        let attempt = tokio::select! {
            attempt = connect_async(url.as_str()) => attempt,
            _ = stop.wait() => return,
        };

        let mut stream = match attempt {
            Ok((stream, _)) => stream,
            Err(error) => {
                warn!(actor = %actor_id, %error, "realtime connect failed");
                machine.closed();
                tokio::select! {
                    _ = tokio::time::sleep(backoff) => continue,
                    _ = stop.wait() => return,
                }
            }
        };

        machine.connected();
        debug!(
            actor = %actor_id,
            reconnects = machine.reconnects(),
            "realtime connected"
        );

        loop {
            tokio::select! {
                frame = stream.next() => match frame {
                    Some(Ok(Message::Text(text))) => {
                        if let Some(event) = RealtimeEvent::parse(&text) {
                            // A gone receiver means the actor stopped
                            if events.send(event).await.is_err() {
                                return;
                            }
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(error)) => {
                        warn!(actor = %actor_id, %error, "realtime stream error");
                        break;
                    }
                    None => break,
                },
                _ = stop.wait() => return,
            }
        }

        machine.closed();
        debug!(actor = %actor_id, backoff_ms = backoff.as_millis() as u64, "realtime closed");

        tokio::select! {
            _ = tokio::time::sleep(backoff) => {}
            _ = stop.wait() => return,
        }
    }
}
