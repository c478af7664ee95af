/********************************************************************************
 * Copyright (c) 2026 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

use crate::call_timings::CallTimings;
use crate::control_plane::call_observer::{CallObserver, CallOpened};
use crate::control_plane::call_routing;
use crate::control_plane::line_registry::{Line, LineRegistry, TelephoneSnapshot};
use crate::data_plane::call_stream::StreamBinding;
use crate::data_plane::channel::{Channel, ChannelHandle};
use crate::error::ExchangeError;
use crate::observability::{events, fields};
use crate::status::Status;
use crate::telephone::Telephone;
use crate::telephone_record::{TelephoneId, TelephoneRecord};
use std::sync::Arc;
use tokio::sync::{watch, Mutex, RwLock};
use tracing::{debug, info, warn};

const COMPONENT: &str = "exchange";

struct ExchangeInner {
    name: String,
    timings: CallTimings,
    lines: Mutex<LineRegistry>,
    call_observers: RwLock<Vec<Arc<dyn CallObserver>>>,
}

///
/// [`Exchange`] is the registry and router coordinating call state between telephones.
///
/// It is a cheap, cloneable handle: every [`Telephone`] it hands out keeps one, and all
/// routing operations go through the same registry lock. Tests and simulation runs
/// create a fresh exchange instead of sharing a process-wide one.
///
/// # Examples
///
/// ```
/// use pots_exchange::{Exchange, Status, TelephoneRecord};
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let exchange = Exchange::new("quick-start");
/// let one = exchange.register(TelephoneRecord::new(1).unwrap()).await.unwrap();
/// let two = exchange.register(TelephoneRecord::new(2).unwrap()).await.unwrap();
///
/// one.dial(two.id()).await.unwrap();
/// let call = two.answer().await.unwrap();
/// assert_eq!(call.caller_id, one.id());
/// assert_eq!(one.status().await.unwrap(), Status::Busy);
///
/// one.hang_up().await.unwrap();
/// assert_eq!(two.status().await.unwrap(), Status::OffCall);
/// # });
/// ```
#[derive(Clone)]
pub struct Exchange {
    inner: Arc<ExchangeInner>,
}

impl Exchange {
    pub fn new(name: &str) -> Self {
        Self::with_timings(name, CallTimings::default())
    }

    pub fn with_timings(name: &str, timings: CallTimings) -> Self {
        debug!(
            component = COMPONENT,
            exchange = name,
            dial_timeout_ms = timings.dial_timeout.as_millis() as u64,
            stream_interval_ms = timings.stream_interval.as_millis() as u64,
            "exchange started"
        );

        Self {
            inner: Arc::new(ExchangeInner {
                name: name.to_string(),
                timings,
                lines: Mutex::new(LineRegistry::new()),
                call_observers: RwLock::new(Vec::new()),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn timings(&self) -> CallTimings {
        self.inner.timings
    }

    /// Registers a telephone with a fresh, empty outbound channel named `pipe<id>`.
    pub async fn register(&self, record: TelephoneRecord) -> Result<Telephone, ExchangeError> {
        let channel = Channel::new(&record.default_channel_name());
        self.register_with_channel(record, channel).await
    }

    /// Registers a telephone publishing on `channel` instead of a fresh one.
    pub async fn register_with_channel(
        &self,
        record: TelephoneRecord,
        channel: Channel,
    ) -> Result<Telephone, ExchangeError> {
        let id = record.id();
        let outbound = ChannelHandle::new(channel);

        let mut lines = self.inner.lines.lock().await;
        if let Err(err) = lines.insert(Line::new(id, outbound.clone())) {
            warn!(
                event = events::TELEPHONE_REGISTER_FAILED,
                component = COMPONENT,
                telephone = %id,
                err = %err,
                "telephone registration failed"
            );
            return Err(err);
        }

        info!(
            event = events::TELEPHONE_REGISTER_OK,
            component = COMPONENT,
            telephone = %id,
            channel = outbound.name(),
            registered = lines.len(),
            "telephone registered"
        );
        Ok(Telephone::new(id, self.clone(), outbound))
    }

    /// Removes a telephone. Any call it was part of is cancelled and the peer it was
    /// ringing with, dialing or talking to goes back to `OffCall`.
    pub async fn unregister(&self, id: TelephoneId) -> Result<(), ExchangeError> {
        let mut lines = self.inner.lines.lock().await;
        match lines.remove(id) {
            Ok(_) => {
                info!(
                    event = events::TELEPHONE_UNREGISTER_OK,
                    component = COMPONENT,
                    telephone = %id,
                    "telephone unregistered"
                );
                Ok(())
            }
            Err(err) => {
                warn!(
                    event = events::TELEPHONE_UNREGISTER_FAILED,
                    component = COMPONENT,
                    telephone = %id,
                    err = %err,
                    "telephone unregistration failed"
                );
                Err(err)
            }
        }
    }

    pub async fn lookup(&self, id: TelephoneId) -> Result<Telephone, ExchangeError> {
        let lines = self.inner.lines.lock().await;
        let line = lines.get(id)?;
        Ok(Telephone::new(id, self.clone(), line.outbound.clone()))
    }

    pub async fn snapshot(&self, id: TelephoneId) -> Result<TelephoneSnapshot, ExchangeError> {
        let lines = self.inner.lines.lock().await;
        Ok(lines.get(id)?.snapshot())
    }

    pub async fn len(&self) -> usize {
        self.inner.lines.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Registered ids, in registration order.
    pub async fn registered_ids(&self) -> Vec<TelephoneId> {
        self.inner.lines.lock().await.ids()
    }

    /// Empties the registry between independent simulation runs. Calls in flight are
    /// cancelled.
    pub async fn reset(&self) {
        let mut lines = self.inner.lines.lock().await;
        let dropped = lines.len();
        lines.clear();

        info!(
            event = events::REGISTRY_RESET,
            component = COMPONENT,
            dropped,
            "registry reset"
        );
    }

    pub async fn add_call_observer(&self, observer: Arc<dyn CallObserver>) {
        self.inner.call_observers.write().await.push(observer);
    }

    /// `origin` starts calling `destination`: origin goes `Dialing`, destination goes
    /// `Ringing`. Fails with [`ExchangeError::Busy`] and touches nothing when the
    /// destination is already in a call.
    pub async fn enroute_call(
        &self,
        origin: TelephoneId,
        destination: TelephoneId,
    ) -> Result<(), ExchangeError> {
        let result = {
            let mut lines = self.inner.lines.lock().await;
            call_routing::enroute_call(&mut lines, origin, destination)
        };

        match &result {
            Ok(()) => debug!(
                event = events::ENROUTE_CALL_OK,
                component = COMPONENT,
                telephone = %origin,
                peer = %destination,
                "call enrouted"
            ),
            Err(err) => warn!(
                event = events::ENROUTE_CALL_FAILED,
                component = COMPONENT,
                telephone = %origin,
                peer = %destination,
                err = %err,
                "enroute call failed"
            ),
        }
        result
    }

    /// `acceptor` accepts the call ringing from `caller`. Both end up `Busy` with their
    /// channels cross-wired; registered [`CallObserver`]s are notified afterwards.
    pub async fn open_call_between(
        &self,
        acceptor: TelephoneId,
        caller: TelephoneId,
    ) -> Result<CallOpened, ExchangeError> {
        let result = {
            let mut lines = self.inner.lines.lock().await;
            call_routing::open_call_between(&mut lines, acceptor, caller)
        };

        match result {
            Ok(opened) => {
                info!(
                    event = events::OPEN_CALL_OK,
                    component = COMPONENT,
                    telephone = %acceptor,
                    peer = %caller,
                    call_id = fields::format_call_id(Some(opened.call_id)),
                    "call opened"
                );
                for observer in self.inner.call_observers.read().await.iter() {
                    observer.on_call_opened(&opened).await;
                }
                Ok(opened)
            }
            Err(err) => {
                warn!(
                    event = events::OPEN_CALL_FAILED,
                    component = COMPONENT,
                    telephone = %acceptor,
                    peer = %caller,
                    err = %err,
                    "open call failed"
                );
                Err(err)
            }
        }
    }

    /// `closer` ends its established or pending call with `peer`.
    ///
    /// Only `peer` is returned to `OffCall`; the closer normalizes itself, which is what
    /// [`Telephone::hang_up`] does in the same lock acquisition.
    pub async fn close_call_between(
        &self,
        closer: TelephoneId,
        peer: TelephoneId,
    ) -> Result<(), ExchangeError> {
        let result = {
            let mut lines = self.inner.lines.lock().await;
            call_routing::close_call_between(&mut lines, closer, peer)
        };
        self.after_close(closer, peer, result).await
    }

    /// Live-path check between two registered telephones. Order independent.
    pub async fn communication_exists(
        &self,
        one: TelephoneId,
        two: TelephoneId,
    ) -> Result<bool, ExchangeError> {
        let lines = self.inner.lines.lock().await;
        let one = lines.get(one)?.snapshot();
        let two = lines.get(two)?.snapshot();
        Ok(one.is_connected_to(&two))
    }

    /// Closes the call `id` is part of and resets `id` itself, atomically.
    pub(crate) async fn hang_up(&self, id: TelephoneId) -> Result<TelephoneId, ExchangeError> {
        let (peer, result) = {
            let mut lines = self.inner.lines.lock().await;
            let peer = call_routing::hang_up_target(&lines, id)?;
            let result = match call_routing::close_call_between(&mut lines, id, peer) {
                // A peer that left the exchange has nothing left to signal.
                Err(ExchangeError::NotFound(missing)) if missing == peer => Ok(()),
                result => result,
            };
            if result.is_ok() {
                lines.get_mut(id)?.release();
            }
            (peer, result)
        };
        self.after_close(id, peer, result).await.map(|()| peer)
    }

    /// Returns `id` to `OffCall` with every call reference cleared.
    pub(crate) async fn release(&self, id: TelephoneId) -> Result<(), ExchangeError> {
        let mut lines = self.inner.lines.lock().await;
        lines.get_mut(id)?.release();

        debug!(
            event = events::LINE_RELEASED,
            component = COMPONENT,
            telephone = %id,
            "line released"
        );
        Ok(())
    }

    /// Releases `id` only while it is still in `expected`. Returns whether it did.
    pub(crate) async fn release_if(
        &self,
        id: TelephoneId,
        expected: Status,
    ) -> Result<bool, ExchangeError> {
        let mut lines = self.inner.lines.lock().await;
        let line = lines.get_mut(id)?;
        if line.status() != expected {
            return Ok(false);
        }
        line.release();

        debug!(
            event = events::LINE_RELEASED,
            component = COMPONENT,
            telephone = %id,
            "line released"
        );
        Ok(true)
    }

    pub(crate) async fn subscribe_status(
        &self,
        id: TelephoneId,
    ) -> Result<watch::Receiver<Status>, ExchangeError> {
        let lines = self.inner.lines.lock().await;
        Ok(lines.get(id)?.subscribe())
    }

    /// Resolves the channel `id` currently consumes: the outbound channel of its peer.
    pub(crate) async fn inbound_channel(
        &self,
        id: TelephoneId,
    ) -> Result<Option<ChannelHandle>, ExchangeError> {
        let lines = self.inner.lines.lock().await;
        let Some(peer) = lines.get(id)?.inbound_peer else {
            return Ok(None);
        };
        Ok(lines.get(peer).ok().map(|line| line.outbound.clone()))
    }

    /// Everything the streaming tasks of `id` need for its current call.
    pub(crate) async fn stream_binding(
        &self,
        id: TelephoneId,
    ) -> Result<StreamBinding, ExchangeError> {
        let mut lines = self.inner.lines.lock().await;
        let line = lines.get_mut(id)?;
        let (call_id, token) = match (line.status(), line.call()) {
            (Status::Busy, Some(call)) => (call.call_id, call.token.clone()),
            _ => return Err(ExchangeError::NoActiveCall(id)),
        };
        line.start_streaming()?;

        Ok(StreamBinding {
            telephone: id,
            call_id,
            token,
            status: line.subscribe(),
            outbound: line.outbound.clone(),
        })
    }

    async fn after_close(
        &self,
        closer: TelephoneId,
        peer: TelephoneId,
        result: Result<(), ExchangeError>,
    ) -> Result<(), ExchangeError> {
        match &result {
            Ok(()) => {
                info!(
                    event = events::CLOSE_CALL_OK,
                    component = COMPONENT,
                    telephone = %closer,
                    peer = %peer,
                    "call closed"
                );
                for observer in self.inner.call_observers.read().await.iter() {
                    observer.on_call_closed(closer, peer).await;
                }
            }
            Err(err) => warn!(
                event = events::CLOSE_CALL_FAILED,
                component = COMPONENT,
                telephone = %closer,
                peer = %peer,
                err = %err,
                "close call failed"
            ),
        }
        result
    }
}
