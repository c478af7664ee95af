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

//! Hook invoked by the exchange on call transitions, used for caller-ID style features.

use crate::telephone_record::TelephoneId;
use async_trait::async_trait;
use uuid::Uuid;

/// Routing result of a successful call-open.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CallOpened {
    /// Correlation id shared by both sides for the lifetime of the call.
    pub call_id: Uuid,
    pub acceptor: TelephoneId,
    /// Telephone that dialed the acceptor.
    pub caller_id: TelephoneId,
}

///
/// [`CallObserver`] receives call transitions after the exchange has released its
/// registry lock, so implementations may call back into the exchange.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use pots_exchange::{CallObserver, CallOpened};
///
/// struct CallerIdDisplay;
///
/// #[async_trait]
/// impl CallObserver for CallerIdDisplay {
///     async fn on_call_opened(&self, call: &CallOpened) {
///         println!("{} picked up a call from {}", call.acceptor, call.caller_id);
///     }
/// }
/// ```
#[async_trait]
pub trait CallObserver: Send + Sync {
    async fn on_call_opened(&self, call: &CallOpened);

    async fn on_call_closed(&self, _closer: TelephoneId, _peer: TelephoneId) {}
}
