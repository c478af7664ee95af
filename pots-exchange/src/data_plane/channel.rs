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

//! FIFO bit channels connecting two telephones during a call.

use crate::error::ChannelError;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;

/// A single value travelling on a [`Channel`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Bit {
    Zero,
    One,
}

impl Bit {
    /// Converts a slice of `0`/`1` digits, failing on the first other value.
    pub fn from_digits(digits: &[u8]) -> Result<Vec<Bit>, ChannelError> {
        digits.iter().map(|digit| Bit::try_from(*digit)).collect()
    }
}

impl TryFrom<u8> for Bit {
    type Error = ChannelError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Bit::Zero),
            1 => Ok(Bit::One),
            other => Err(ChannelError::InvalidBit(other)),
        }
    }
}

impl From<bool> for Bit {
    fn from(value: bool) -> Self {
        if value {
            Bit::One
        } else {
            Bit::Zero
        }
    }
}

impl From<Bit> for u8 {
    fn from(bit: Bit) -> Self {
        match bit {
            Bit::Zero => 0,
            Bit::One => 1,
        }
    }
}

impl From<Bit> for char {
    fn from(bit: Bit) -> Self {
        match bit {
            Bit::Zero => '0',
            Bit::One => '1',
        }
    }
}

///
/// [`Channel`] is an unbounded, named FIFO of [`Bit`]s. Two channels are equal when
/// both their name and their queued content are equal.
///
/// # Examples
///
/// ```
/// use pots_exchange::{Bit, Channel};
///
/// let mut channel = Channel::new("pipe1");
/// channel.publish(Bit::One);
/// channel.publish(Bit::Zero);
///
/// assert_eq!(channel.consume(), Ok(Bit::One));
/// assert_eq!(channel.consume(), Ok(Bit::Zero));
/// assert!(channel.consume().is_err());
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Channel {
    name: String,
    bits: VecDeque<Bit>,
}

impl Channel {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            bits: VecDeque::new(),
        }
    }

    /// Builds a channel that already holds `bits`, oldest first.
    pub fn with_bits(name: &str, bits: impl IntoIterator<Item = Bit>) -> Self {
        Self {
            name: name.to_string(),
            bits: bits.into_iter().collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Appends `bit` at the tail. Never fails.
    pub fn publish(&mut self, bit: Bit) {
        self.bits.push_back(bit);
    }

    /// Removes and returns the oldest bit.
    pub fn consume(&mut self) -> Result<Bit, ChannelError> {
        self.bits.pop_front().ok_or_else(|| ChannelError::Empty {
            channel: self.name.clone(),
        })
    }

    pub fn bits(&self) -> impl Iterator<Item = &Bit> {
        self.bits.iter()
    }
}

/// Shared handle over one telephone's outbound [`Channel`].
///
/// The owning telephone's producer is the single writer; the connected peer's consumer
/// is the single reader. Handles compare by identity through [`same_channel`].
///
/// [`same_channel`]: ChannelHandle::same_channel
#[derive(Clone, Debug)]
pub struct ChannelHandle {
    name: Arc<str>,
    channel: Arc<Mutex<Channel>>,
}

impl ChannelHandle {
    pub fn new(channel: Channel) -> Self {
        Self {
            name: Arc::from(channel.name()),
            channel: Arc::new(Mutex::new(channel)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn publish(&self, bit: Bit) {
        self.channel.lock().await.publish(bit);
    }

    pub async fn consume(&self) -> Result<Bit, ChannelError> {
        self.channel.lock().await.consume()
    }

    pub async fn len(&self) -> usize {
        self.channel.lock().await.len()
    }

    /// Copy of the channel's current name and content.
    pub async fn snapshot(&self) -> Channel {
        self.channel.lock().await.clone()
    }

    /// Returns `true` when both handles point at the same underlying channel.
    pub fn same_channel(&self, other: &ChannelHandle) -> bool {
        Arc::ptr_eq(&self.channel, &other.channel)
    }
}
