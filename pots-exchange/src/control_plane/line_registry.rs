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

//! Line registry: per-telephone call state owned by the exchange.

use crate::data_plane::channel::ChannelHandle;
use crate::error::ExchangeError;
use crate::status::Status;
use crate::telephone_record::TelephoneId;
use std::collections::HashMap;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Point-in-time copy of one telephone's call fields.
///
/// Peer references are ids resolved through the exchange at time of use, never live
/// references to the other line.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TelephoneSnapshot {
    pub id: TelephoneId,
    pub status: Status,
    /// Peer most recently dialed or currently talked to.
    pub last_call: Option<TelephoneId>,
    /// Peer currently ringing this telephone.
    pub incoming_call: Option<TelephoneId>,
    /// Peer whose outbound channel this telephone consumes. Set only while `Busy`.
    pub inbound_peer: Option<TelephoneId>,
    pub call_id: Option<Uuid>,
}

impl TelephoneSnapshot {
    /// Live-path predicate between two telephones. Order independent.
    ///
    /// Holds when both are `Busy` and point at each other through `last_call`, or when
    /// one is `Dialing` the other while that other is `Ringing` from it.
    pub fn is_connected_to(&self, other: &TelephoneSnapshot) -> bool {
        if self.id == other.id {
            return false;
        }

        let talking = self.status == Status::Busy
            && other.status == Status::Busy
            && self.last_call == Some(other.id)
            && other.last_call == Some(self.id);

        talking || Self::is_ringing(self, other) || Self::is_ringing(other, self)
    }

    fn is_ringing(dialer: &TelephoneSnapshot, ringing: &TelephoneSnapshot) -> bool {
        dialer.status == Status::Dialing
            && ringing.status == Status::Ringing
            && dialer.last_call == Some(ringing.id)
            && ringing.incoming_call == Some(dialer.id)
    }
}

/// Cancellation scope shared by both sides of one established call.
#[derive(Clone, Debug)]
pub(crate) struct ActiveCall {
    pub(crate) call_id: Uuid,
    pub(crate) token: CancellationToken,
}

impl ActiveCall {
    pub(crate) fn new() -> Self {
        Self {
            call_id: Uuid::new_v4(),
            token: CancellationToken::new(),
        }
    }
}

pub(crate) struct Line {
    pub(crate) id: TelephoneId,
    pub(crate) last_call: Option<TelephoneId>,
    pub(crate) incoming_call: Option<TelephoneId>,
    pub(crate) inbound_peer: Option<TelephoneId>,
    pub(crate) outbound: ChannelHandle,
    status: Status,
    call: Option<ActiveCall>,
    streaming: bool,
    status_tx: watch::Sender<Status>,
}

impl Line {
    pub(crate) fn new(id: TelephoneId, outbound: ChannelHandle) -> Self {
        let (status_tx, _) = watch::channel(Status::OffCall);
        Self {
            id,
            last_call: None,
            incoming_call: None,
            inbound_peer: None,
            outbound,
            status: Status::OffCall,
            call: None,
            streaming: false,
            status_tx,
        }
    }

    pub(crate) fn status(&self) -> Status {
        self.status
    }

    /// Updates the status and notifies watchers. Leaving `Busy` ends the active call.
    pub(crate) fn set_status(&mut self, status: Status) {
        self.status = status;
        if status != Status::Busy {
            self.end_call();
        }
        self.status_tx.send_replace(status);
    }

    pub(crate) fn attach_call(&mut self, call: ActiveCall) {
        self.call = Some(call);
        self.streaming = false;
    }

    /// Marks the producer/consumer pair of the current call as started. Fails when it
    /// already was, so each call gets exactly one pair per side.
    pub(crate) fn start_streaming(&mut self) -> Result<(), ExchangeError> {
        if self.streaming {
            return Err(ExchangeError::Busy(self.id));
        }
        self.streaming = true;
        Ok(())
    }

    /// The telephone this line is currently ringing with, dialing or talking to.
    pub(crate) fn peer(&self) -> Option<TelephoneId> {
        match self.status {
            Status::Ringing => self.incoming_call,
            Status::Dialing | Status::Busy => self.last_call,
            Status::OffCall => None,
        }
    }

    pub(crate) fn call(&self) -> Option<&ActiveCall> {
        self.call.as_ref()
    }

    /// Returns the line to its initial `OffCall` shape.
    pub(crate) fn release(&mut self) {
        self.last_call = None;
        self.incoming_call = None;
        self.inbound_peer = None;
        self.set_status(Status::OffCall);
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<Status> {
        self.status_tx.subscribe()
    }

    pub(crate) fn snapshot(&self) -> TelephoneSnapshot {
        TelephoneSnapshot {
            id: self.id,
            status: self.status,
            last_call: self.last_call,
            incoming_call: self.incoming_call,
            inbound_peer: self.inbound_peer,
            call_id: self.call.as_ref().map(|call| call.call_id),
        }
    }

    fn end_call(&mut self) {
        if let Some(call) = self.call.take() {
            call.token.cancel();
        }
        self.streaming = false;
    }
}

/// Registry of lines keyed by telephone id, remembering registration order.
#[derive(Default)]
pub(crate) struct LineRegistry {
    lines: HashMap<TelephoneId, Line>,
    registration_order: Vec<TelephoneId>,
}

impl LineRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Inserts a line. Fails without side effects when the id is taken.
    pub(crate) fn insert(&mut self, line: Line) -> Result<(), ExchangeError> {
        if self.lines.contains_key(&line.id) {
            return Err(ExchangeError::AlreadyRegistered(line.id));
        }
        self.registration_order.push(line.id);
        self.lines.insert(line.id, line);
        Ok(())
    }

    /// Removes a line, ending whatever call it was part of. Lines left ringing with,
    /// dialing or talking to the removed one are released as well.
    pub(crate) fn remove(&mut self, id: TelephoneId) -> Result<Line, ExchangeError> {
        let mut line = self.lines.remove(&id).ok_or(ExchangeError::NotFound(id))?;
        self.registration_order.retain(|registered| *registered != id);
        line.release();

        for other in self.lines.values_mut() {
            if other.peer() == Some(id) || other.inbound_peer == Some(id) {
                other.release();
            }
        }
        Ok(line)
    }

    pub(crate) fn get(&self, id: TelephoneId) -> Result<&Line, ExchangeError> {
        self.lines.get(&id).ok_or(ExchangeError::NotFound(id))
    }

    pub(crate) fn get_mut(&mut self, id: TelephoneId) -> Result<&mut Line, ExchangeError> {
        self.lines.get_mut(&id).ok_or(ExchangeError::NotFound(id))
    }

    /// Ids in registration order.
    pub(crate) fn ids(&self) -> Vec<TelephoneId> {
        self.registration_order.clone()
    }

    pub(crate) fn len(&self) -> usize {
        self.lines.len()
    }

    /// Empties the registry, ending every call in flight.
    pub(crate) fn clear(&mut self) {
        for line in self.lines.values_mut() {
            line.release();
        }
        self.lines.clear();
        self.registration_order.clear();
    }
}
