//! Realtime pipeline event channel
//!
//! Connects to the backend websocket, joins the pipeline room for one
//! execution and forwards decoded events to the consumer over an mpsc
//! channel. Delivery is at-most-once; there is no ack protocol, so a
//! missed event is undetectable on this side.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, warn};
use url::Url;

use flowdeck_core::domain::status::{ExecutionId, PipelineStatusEvent, StepStatusEvent};
use flowdeck_core::domain::log::LogLine;
use flowdeck_core::dto::events::{self, InboundEvent};

use crate::error::{ClientError, Result};

const MAX_CONNECT_ATTEMPTS: u32 = 5;
const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
const MAX_BACKOFF: Duration = Duration::from_secs(5);

/// Event delivered to the channel consumer.
#[derive(Debug, Clone)]
pub enum ChannelEvent {
    Connected,
    /// `retrying: false` is terminal; the task has stopped.
    Disconnected { retrying: bool },
    Joined(ExecutionId),
    Log(LogLine),
    Status(PipelineStatusEvent),
    Step(StepStatusEvent),
}

/// Command sent from the consumer into the channel task.
#[derive(Debug, Clone)]
pub enum ChannelCommand {
    /// Leave the current pipeline room and join another one on the same
    /// connection. The consumer is expected to reset its live state.
    Switch(ExecutionId),
    Shutdown,
}

/// Handle over a background websocket task.
///
/// Dropping the handle aborts the task.
pub struct EventChannel {
    events: mpsc::Receiver<ChannelEvent>,
    commands: mpsc::Sender<ChannelCommand>,
    task: JoinHandle<()>,
}

impl EventChannel {
    /// Connect to the event endpoint derived from the HTTP base URL and
    /// join the pipeline room for `execution_id`.
    pub fn connect(base_url: &str, execution_id: ExecutionId) -> Result<Self> {
        let ws_url = websocket_url(base_url)?;
        let (event_tx, event_rx) = mpsc::channel(256);
        let (command_tx, command_rx) = mpsc::channel(16);

        let task = tokio::spawn(channel_loop(ws_url, execution_id, event_tx, command_rx));

        Ok(Self {
            events: event_rx,
            commands: command_tx,
            task,
        })
    }

    /// Receive the next event, or `None` once the task has stopped.
    pub async fn recv(&mut self) -> Option<ChannelEvent> {
        self.events.recv().await
    }

    pub async fn switch(&self, execution_id: ExecutionId) -> Result<()> {
        self.commands
            .send(ChannelCommand::Switch(execution_id))
            .await
            .map_err(|_| ClientError::Channel("channel task has stopped".to_string()))
    }

    pub async fn shutdown(&self) {
        let _ = self.commands.send(ChannelCommand::Shutdown).await;
    }
}

impl Drop for EventChannel {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Derive the websocket endpoint from the HTTP base URL.
fn websocket_url(base_url: &str) -> Result<Url> {
    let mut url = Url::parse(base_url)
        .map_err(|err| ClientError::Channel(format!("invalid base URL: {err}")))?;

    let scheme = match url.scheme() {
        "https" | "wss" => "wss",
        _ => "ws",
    };
    url.set_scheme(scheme)
        .map_err(|_| ClientError::Channel("base URL has no host".to_string()))?;

    Ok(url)
}

async fn channel_loop(
    ws_url: Url,
    mut execution_id: ExecutionId,
    tx: mpsc::Sender<ChannelEvent>,
    mut commands: mpsc::Receiver<ChannelCommand>,
) {
    let mut backoff = INITIAL_BACKOFF;
    let mut attempts = 0u32;

    loop {
        let connect = connect_async(ws_url.as_str()).await;
        let mut ws = match connect {
            Ok((ws, _)) => ws,
            Err(err) => {
                attempts += 1;
                warn!("connect attempt {attempts} failed: {err}");
                if attempts >= MAX_CONNECT_ATTEMPTS {
                    let _ = tx.send(ChannelEvent::Disconnected { retrying: false }).await;
                    return;
                }
                let _ = tx.send(ChannelEvent::Disconnected { retrying: true }).await;
                tokio::time::sleep(backoff).await;
                backoff = next_backoff(backoff);
                continue;
            }
        };
        attempts = 0;
        backoff = INITIAL_BACKOFF;

        // Join the pipeline room on every connect, initial or not.
        if ws
            .send(Message::Text(events::encode_join(&execution_id)))
            .await
            .is_err()
        {
            let _ = ws.close(None).await;
            continue;
        }
        let _ = tx.send(ChannelEvent::Connected).await;

        let mut shutdown = false;
        loop {
            tokio::select! {
                frame = ws.next() => match frame {
                    Some(Ok(Message::Text(text))) => {
                        match events::decode(&text) {
                            Some(event) => {
                                let _ = tx.send(channel_event(event)).await;
                            }
                            None => debug!("ignoring unknown event frame"),
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(_)) | None => break,
                },
                command = commands.recv() => match command {
                    Some(ChannelCommand::Switch(next)) => {
                        let [leave, join] = switch_frames(&execution_id, &next);
                        execution_id = next;
                        let left = ws.send(Message::Text(leave)).await;
                        let joined = ws.send(Message::Text(join)).await;
                        if left.is_err() || joined.is_err() {
                            break;
                        }
                    }
                    Some(ChannelCommand::Shutdown) | None => {
                        let _ = ws.send(Message::Text(events::encode_leave(&execution_id))).await;
                        shutdown = true;
                        break;
                    }
                },
            }
        }

        let _ = ws.close(None).await;
        if shutdown {
            return;
        }
        let _ = tx.send(ChannelEvent::Disconnected { retrying: true }).await;
    }
}

fn channel_event(event: InboundEvent) -> ChannelEvent {
    match event {
        InboundEvent::Joined(id) => ChannelEvent::Joined(id),
        InboundEvent::Log(line) => ChannelEvent::Log(line),
        InboundEvent::Status(status) => ChannelEvent::Status(status),
        InboundEvent::Step(step) => ChannelEvent::Step(step),
    }
}

/// Frames sent when moving to another pipeline room on a live connection:
/// leave the old room first, then join the new one.
fn switch_frames(old: &ExecutionId, new: &ExecutionId) -> [String; 2] {
    [events::encode_leave(old), events::encode_join(new)]
}

fn next_backoff(current: Duration) -> Duration {
    let next = current + current;
    if next > MAX_BACKOFF { MAX_BACKOFF } else { next }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_and_caps() {
        let mut delay = INITIAL_BACKOFF;
        let mut observed = Vec::new();
        for _ in 0..5 {
            observed.push(delay.as_secs());
            delay = next_backoff(delay);
        }
        assert_eq!(observed, vec![1, 2, 4, 5, 5]);
    }

    #[test]
    fn websocket_url_maps_schemes() {
        assert_eq!(
            websocket_url("http://localhost:3001").unwrap().as_str(),
            "ws://localhost:3001/"
        );
        assert_eq!(
            websocket_url("https://ci.example.com").unwrap().as_str(),
            "wss://ci.example.com/"
        );
    }

    #[test]
    fn websocket_url_rejects_garbage() {
        assert!(websocket_url("not a url").is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_five_failed_attempts() {
        // Port 1 is closed; every connect is refused immediately, so the
        // task runs through its full retry budget.
        let mut channel = EventChannel::connect("http://127.0.0.1:1", "exec-x".into())
            .expect("valid base URL");

        let mut retrying = 0;
        loop {
            match channel.recv().await {
                Some(ChannelEvent::Disconnected { retrying: true }) => retrying += 1,
                Some(ChannelEvent::Disconnected { retrying: false }) => break,
                Some(other) => panic!("unexpected event: {:?}", other),
                None => panic!("channel closed without a terminal disconnect"),
            }
        }

        assert_eq!(retrying, 4);
        // The task has stopped; no further events arrive.
        assert!(channel.recv().await.is_none());
    }

    #[test]
    fn switch_leaves_old_room_before_joining_new() {
        let frames = switch_frames(&"exec-old".into(), &"exec-new".into());
        assert!(frames[0].contains("leave-pipeline"));
        assert!(frames[0].contains("exec-old"));
        assert!(frames[1].contains("join-pipeline"));
        assert!(frames[1].contains("exec-new"));
    }
}
