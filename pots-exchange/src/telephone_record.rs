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

//! Telephone identity and the basic record used at registration.

use crate::error::ExchangeError;
use std::fmt::{Display, Formatter};

/// Number of a telephone inside one exchange. Always strictly positive.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct TelephoneId(u32);

impl TelephoneId {
    /// Builds an id, rejecting `0` with [`ExchangeError::InvalidNumber`].
    pub fn new(number: u32) -> Result<Self, ExchangeError> {
        if number == 0 {
            return Err(ExchangeError::InvalidNumber(number));
        }
        Ok(Self(number))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for TelephoneId {
    type Error = ExchangeError;

    fn try_from(number: u32) -> Result<Self, Self::Error> {
        Self::new(number)
    }
}

impl Display for TelephoneId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

///
/// [`TelephoneRecord`] is the registration payload handed over by the administration
/// surface. It only carries the validated number; call state is owned by the exchange.
///
/// # Examples
///
/// ```
/// use pots_exchange::TelephoneRecord;
///
/// let record = TelephoneRecord::new(7).unwrap();
/// assert_eq!(record.id().get(), 7);
/// assert!(TelephoneRecord::new(0).is_err());
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TelephoneRecord {
    id: TelephoneId,
}

impl TelephoneRecord {
    pub fn new(number: u32) -> Result<Self, ExchangeError> {
        Ok(Self {
            id: TelephoneId::new(number)?,
        })
    }

    pub fn id(&self) -> TelephoneId {
        self.id
    }

    /// Name of the outbound channel a freshly registered telephone publishes on.
    pub(crate) fn default_channel_name(&self) -> String {
        format!("pipe{}", self.id)
    }
}

impl From<TelephoneId> for TelephoneRecord {
    fn from(id: TelephoneId) -> Self {
        Self { id }
    }
}

impl Display for TelephoneRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Telephone ({})", self.id)
    }
}
