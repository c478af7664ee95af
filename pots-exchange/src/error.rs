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

//! Error taxonomy for routing, endpoint and channel operations.

use crate::telephone_record::TelephoneId;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failures surfaced by [`Exchange`](crate::Exchange) and
/// [`Telephone`](crate::Telephone) operations.
///
/// Every kind is fatal to the single operation that raised it only. The registry is
/// never left half-updated: failed transitions touch no line at all.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ExchangeError {
    /// The telephone id is not registered.
    NotFound(TelephoneId),
    /// Registration of an id that is already present.
    AlreadyRegistered(TelephoneId),
    /// The telephone is already in a call.
    Busy(TelephoneId),
    /// The two telephones do not share the path the operation requires.
    NoPath { from: TelephoneId, to: TelephoneId },
    DialingMyself(TelephoneId),
    NoIncomingCall(TelephoneId),
    NoActiveCall(TelephoneId),
    /// Telephone numbers are strictly positive.
    InvalidNumber(u32),
    /// A per-call streaming task panicked or was aborted.
    StreamTaskFailed(String),
}

impl Display for ExchangeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ExchangeError::NotFound(id) => {
                write!(f, "telephone {id} does not belong to the exchange")
            }
            ExchangeError::AlreadyRegistered(id) => {
                write!(f, "telephone {id} is already registered")
            }
            ExchangeError::Busy(id) => write!(f, "telephone {id} is busy"),
            ExchangeError::NoPath { from, to } => {
                write!(f, "there is no path between telephone {from} and {to}")
            }
            ExchangeError::DialingMyself(id) => {
                write!(f, "telephone {id} is dialing itself")
            }
            ExchangeError::NoIncomingCall(id) => {
                write!(f, "no one is calling telephone {id}")
            }
            ExchangeError::NoActiveCall(id) => {
                write!(f, "telephone {id} has no active call")
            }
            ExchangeError::InvalidNumber(number) => {
                write!(f, "{number} is not a valid telephone number")
            }
            ExchangeError::StreamTaskFailed(reason) => {
                write!(f, "call streaming task failed: {reason}")
            }
        }
    }
}

impl Error for ExchangeError {}

/// Failures raised by [`Channel`](crate::Channel) access.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ChannelError {
    /// Consume on a channel with nothing queued. Recoverable.
    Empty { channel: String },
    /// Only `0` and `1` travel on a channel.
    InvalidBit(u8),
}

impl Display for ChannelError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ChannelError::Empty { channel } => write!(f, "channel {channel} is empty"),
            ChannelError::InvalidBit(value) => write!(f, "{value} is not a bit"),
        }
    }
}

impl Error for ChannelError {}
