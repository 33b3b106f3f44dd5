//! Request/reply correlation
//!
//! ## Architecture
//!
//! ```text
//! caller ──► Correlator::register(request) ──► PendingReply ──► wait().await
//!                      │                                           ▲
//!            DashMap<(node, request id)>                           │
//!                      ▲                                           │
//! transport ──► Correlator::resolve(node, request id, Reply) ──────┘
//! ```
//!
//! The correlator is transport-agnostic: whoever moves frames hands it the
//! reply payload (JSON or XML) or a fault, keyed by the destination node and
//! request id. [`PendingReply::wait`] turns it into the typed response. Every
//! path that yields no usable reply (timeout, decode failure, dropped entry)
//! produces the response's failure form; only cancellation yields `None`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use serde_json::Value;
use tokio::sync::oneshot;
use tokio::time::timeout;
use tracing::{info, trace, warn};
use xmltree::Element;

use crate::codec::CustomCodecs;
use crate::config::ExchangeSettings;
use crate::domain::{Fault, NetworkingNodeId, Outcome, RequestId};
use crate::message::{Request, Response};

/// What the transport received for a pending request.
#[derive(Debug, Clone)]
pub enum Reply {
    Json(Value),
    Xml(Element),
    Fault(Fault),
}

type ExchangeKey = (NetworkingNodeId, RequestId);

struct PendingExchange {
    action: &'static str,
    /// Distinguishes a registration from a later one under the same key.
    registration: u64,
    reply_sender: oneshot::Sender<Reply>,
}

type PendingTable = Arc<DashMap<ExchangeKey, PendingExchange>>;

/// Pending-request table pairing replies with the requests they answer.
#[derive(Clone)]
pub struct Correlator {
    pending: PendingTable,
    next_registration: Arc<AtomicU64>,
    settings: ExchangeSettings,
}

impl Correlator {
    pub fn new(settings: ExchangeSettings) -> Self {
        Self {
            pending: Arc::new(DashMap::new()),
            next_registration: Arc::new(AtomicU64::new(0)),
            settings,
        }
    }

    pub fn settings(&self) -> &ExchangeSettings {
        &self.settings
    }

    /// Start waiting for the reply to `request`.
    ///
    /// A second registration under the same node and request id replaces the
    /// first; the replaced waiter resolves with its failure response.
    pub fn register<R: Request>(&self, request: R) -> PendingReply<R> {
        let request = Arc::new(request);
        let key = (request.destination().clone(), request.request_id().clone());
        let (reply_sender, reply_receiver) = oneshot::channel();
        let registration = self.next_registration.fetch_add(1, Ordering::Relaxed);

        let replaced = self.pending.insert(
            key.clone(),
            PendingExchange {
                action: R::ACTION,
                registration,
                reply_sender,
            },
        );
        if replaced.is_some() {
            warn!(
                charge_point_id = key.0.as_str(),
                action = R::ACTION,
                message_id = key.1.as_str(),
                "Replacing pending request with the same id"
            );
        }

        info!(
            charge_point_id = key.0.as_str(),
            action = R::ACTION,
            message_id = key.1.as_str(),
            "Awaiting reply"
        );

        let wait_timeout = request
            .envelope()
            .request_timeout()
            .unwrap_or_else(|| self.settings.response_timeout());

        PendingReply {
            request,
            key,
            registration,
            reply_receiver,
            pending: Arc::clone(&self.pending),
            wait_timeout,
            codecs: CustomCodecs::none(),
            log_payloads: self.settings.log_payloads,
        }
    }

    /// Hand a reply to the waiter registered under `node` / `request_id`.
    ///
    /// Returns `false` when no such request is pending or its waiter is gone.
    pub fn resolve(&self, node: &NetworkingNodeId, request_id: &RequestId, reply: Reply) -> bool {
        let key = (node.clone(), request_id.clone());
        match self.pending.remove(&key) {
            Some((_, pending)) => {
                info!(
                    charge_point_id = node.as_str(),
                    action = pending.action,
                    message_id = request_id.as_str(),
                    "Received reply"
                );
                if pending.reply_sender.send(reply).is_err() {
                    warn!(
                        charge_point_id = node.as_str(),
                        action = pending.action,
                        message_id = request_id.as_str(),
                        "Reply arrived after the waiter went away"
                    );
                    return false;
                }
                true
            }
            None => {
                warn!(
                    charge_point_id = node.as_str(),
                    message_id = request_id.as_str(),
                    "Reply for unknown request"
                );
                false
            }
        }
    }

    pub fn is_pending(&self, node: &NetworkingNodeId, request_id: &RequestId) -> bool {
        self.pending
            .contains_key(&(node.clone(), request_id.clone()))
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Drop every pending request of `node`, e.g. when its connection closes.
    /// Their waiters resolve with the failure response.
    pub fn cleanup_node(&self, node: &NetworkingNodeId) -> usize {
        let before = self.pending.len();
        self.pending.retain(|(pending_node, _), _| pending_node != node);
        let removed = before.saturating_sub(self.pending.len());
        if removed > 0 {
            info!(
                charge_point_id = node.as_str(),
                count = removed,
                "Dropped pending requests"
            );
        }
        removed
    }
}

impl Default for Correlator {
    fn default() -> Self {
        Self::new(ExchangeSettings::default())
    }
}

impl std::fmt::Debug for Correlator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Correlator")
            .field("pending", &self.pending.len())
            .field("settings", &self.settings)
            .finish()
    }
}

/// The reply to one registered request, not yet received.
pub struct PendingReply<R: Request> {
    request: Arc<R>,
    key: ExchangeKey,
    registration: u64,
    reply_receiver: oneshot::Receiver<Reply>,
    pending: PendingTable,
    wait_timeout: Duration,
    codecs: CustomCodecs<R::Response>,
    log_payloads: bool,
}

impl<R: Request> PendingReply<R> {
    pub fn request(&self) -> &Arc<R> {
        &self.request
    }

    pub fn timeout(&self) -> Duration {
        self.wait_timeout
    }

    /// Decode the reply with these hooks.
    pub fn with_codecs(mut self, codecs: CustomCodecs<R::Response>) -> Self {
        self.codecs = codecs;
        self
    }

    /// Wait for the reply.
    ///
    /// Returns `None` only when the request's cancellation handle fires first;
    /// the pending entry is removed in that case.
    pub async fn wait(self) -> Option<R::Response> {
        let Self {
            request,
            key,
            registration,
            reply_receiver,
            pending,
            wait_timeout,
            codecs,
            log_payloads,
        } = self;
        let (node, request_id) = (&key.0, &key.1);
        let cancellation = request.envelope().cancellation().cloned();
        // A later registration under the same key owns the entry from then on.
        let release = || {
            pending.remove_if(&key, |_, exchange| exchange.registration == registration);
        };

        let cancelled = async {
            match &cancellation {
                Some(handle) => handle.cancelled().await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;

            _ = cancelled => {
                release();
                info!(
                    charge_point_id = node.as_str(),
                    action = R::ACTION,
                    message_id = request_id.as_str(),
                    "Request cancelled"
                );
                None
            }
            received = timeout(wait_timeout, reply_receiver) => match received {
                Ok(Ok(reply)) => Some(interpret(request, reply, &codecs, log_payloads)),
                Ok(Err(_)) => {
                    warn!(
                        charge_point_id = node.as_str(),
                        action = R::ACTION,
                        message_id = request_id.as_str(),
                        "Pending request dropped"
                    );
                    Some(R::Response::failed(request))
                }
                Err(_) => {
                    release();
                    warn!(
                        charge_point_id = node.as_str(),
                        action = R::ACTION,
                        message_id = request_id.as_str(),
                        timeout = ?wait_timeout,
                        "Request timed out"
                    );
                    Some(R::Response::failed(request))
                }
            }
        }
    }
}

impl<R: Request> std::fmt::Debug for PendingReply<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingReply")
            .field("request", &self.request)
            .field("timeout", &self.wait_timeout)
            .finish()
    }
}

fn interpret<R: Request>(
    request: Arc<R>,
    reply: Reply,
    codecs: &CustomCodecs<R::Response>,
    log_payloads: bool,
) -> R::Response {
    let parsed = match reply {
        Reply::Json(payload) => {
            if log_payloads {
                trace!(action = R::ACTION, payload = %payload, "Reply payload");
            }
            R::Response::try_parse_json(&payload, Arc::clone(&request), codecs.json_parser.as_ref())
        }
        Reply::Xml(element) => {
            if log_payloads {
                trace!(action = R::ACTION, element = ?element, "Reply payload");
            }
            R::Response::try_parse_xml(&element, Arc::clone(&request), codecs.xml_parser.as_ref())
        }
        Reply::Fault(fault) => {
            warn!(
                charge_point_id = request.destination().as_str(),
                action = R::ACTION,
                message_id = request.request_id().as_str(),
                fault = %fault,
                "Request failed"
            );
            return R::Response::failed_with(request, Outcome::Fault(fault));
        }
    };

    parsed.unwrap_or_else(|e| {
        warn!(
            charge_point_id = request.destination().as_str(),
            action = R::ACTION,
            message_id = request.request_id().as_str(),
            reason = %e,
            "Invalid reply"
        );
        R::Response::failed(request)
    })
}
