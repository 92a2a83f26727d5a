// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Companion (wrist device) playback channel.
//!
//! Delivery is best-effort: sends never block, nothing is queued for an
//! unreachable device, and nothing is acknowledged. The last message wins.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Playback state pushed to the companion.
///
/// `route_index` is the 1-based ordinal of the playing route; 0 means none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CompanionMessage {
    // Listed first: untagged matching tries variants in order and the status
    // shape is a subset of this one.
    #[serde(rename_all = "camelCase")]
    Progress {
        route_index: usize,
        current_step: usize,
        total_steps: usize,
        is_playing: bool,
    },
    #[serde(rename_all = "camelCase")]
    Status { route_index: usize, is_playing: bool },
}

impl CompanionMessage {
    /// Nothing is playing.
    pub fn stopped() -> Self {
        CompanionMessage::Status {
            route_index: 0,
            is_playing: false,
        }
    }

    pub fn progress(route_index: usize, current_step: usize, total_steps: usize) -> Self {
        CompanionMessage::Progress {
            route_index,
            current_step,
            total_steps,
            is_playing: true,
        }
    }

    pub fn is_playing(&self) -> bool {
        match self {
            CompanionMessage::Progress { is_playing, .. }
            | CompanionMessage::Status { is_playing, .. } => *is_playing,
        }
    }

    pub fn to_json(&self) -> String {
        // Plain data with no maps; serialization cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Requests sent by the companion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum CompanionRequest {
    /// The companion's Next control was pressed.
    #[serde(rename = "nextStep")]
    NextStep,
}

impl CompanionRequest {
    /// Decode a raw companion payload. Unknown actions yield `None`.
    pub fn from_json(payload: &str) -> Option<Self> {
        serde_json::from_str(payload).ok()
    }
}

/// Outbound side of the companion link.
pub trait CompanionChannel: Send + Sync {
    /// Fire-and-forget. Dropped silently if the companion is unreachable.
    fn send(&self, message: CompanionMessage);
}

/// Channel for when no companion is paired.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullCompanion;

impl CompanionChannel for NullCompanion {
    fn send(&self, message: CompanionMessage) {
        tracing::trace!(?message, "No companion paired, dropping message");
    }
}

/// In-process companion link over tokio channels.
#[derive(Clone)]
pub struct LinkedCompanion {
    outbound: mpsc::Sender<CompanionMessage>,
    reachable: Arc<AtomicBool>,
}

impl CompanionChannel for LinkedCompanion {
    fn send(&self, message: CompanionMessage) {
        if !self.reachable.load(Ordering::Acquire) {
            tracing::trace!(?message, "Companion unreachable, dropping message");
            return;
        }
        if let Err(e) = self.outbound.try_send(message) {
            tracing::trace!(error = %e, "Companion send failed, dropping message");
        }
    }
}

/// The companion end of a link.
pub struct CompanionDevice {
    inbox: mpsc::Receiver<CompanionMessage>,
    requests: mpsc::Sender<CompanionRequest>,
    reachable: Arc<AtomicBool>,
}

impl CompanionDevice {
    pub async fn recv(&mut self) -> Option<CompanionMessage> {
        self.inbox.recv().await
    }

    /// Next already-delivered message, without waiting.
    pub fn try_recv(&mut self) -> Option<CompanionMessage> {
        self.inbox.try_recv().ok()
    }

    /// Press Next on the companion. Returns whether the request was delivered.
    pub fn request_next(&self) -> bool {
        self.reachable.load(Ordering::Acquire)
            && self.requests.try_send(CompanionRequest::NextStep).is_ok()
    }

    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::Release);
    }
}

/// Create a linked pair plus the stream of requests coming from the device.
///
/// `capacity` bounds each direction; overflow is dropped.
pub fn link(
    capacity: usize,
) -> (
    LinkedCompanion,
    CompanionDevice,
    mpsc::Receiver<CompanionRequest>,
) {
    let (out_tx, out_rx) = mpsc::channel(capacity.max(1));
    let (req_tx, req_rx) = mpsc::channel(capacity.max(1));
    let reachable = Arc::new(AtomicBool::new(true));

    (
        LinkedCompanion {
            outbound: out_tx,
            reachable: reachable.clone(),
        },
        CompanionDevice {
            inbox: out_rx,
            requests: req_tx,
            reachable,
        },
        req_rx,
    )
}
