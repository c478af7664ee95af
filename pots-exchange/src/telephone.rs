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

use crate::control_plane::call_observer::CallOpened;
use crate::control_plane::line_registry::TelephoneSnapshot;
use crate::data_plane::call_stream::{CallStream, StreamMode};
use crate::data_plane::channel::ChannelHandle;
use crate::error::ExchangeError;
use crate::exchange::Exchange;
use crate::observability::{events, fields};
use crate::status::Status;
use crate::telephone_record::TelephoneId;
use std::fmt;
use tracing::{debug, info, warn};

const COMPONENT: &str = "telephone";

/// How a [`Telephone::wait_for_answer`] ended.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DialOutcome {
    /// The destination answered; the line is `Busy`.
    Answered,
    /// The dial ended some other way, for example the destination hung up.
    Ended,
    /// Nobody answered within the dial timeout; the line is back to `OffCall`.
    TimedOut,
}

///
/// [`Telephone`] is the per-line handle a user of the exchange drives.
///
/// All call state lives in the [`Exchange`]; a telephone only carries its id, its
/// outbound channel and the exchange it is registered with, so clones are cheap and
/// every clone sees the same line.
///
#[derive(Clone)]
pub struct Telephone {
    id: TelephoneId,
    exchange: Exchange,
    outbound: ChannelHandle,
}

impl Telephone {
    pub(crate) fn new(id: TelephoneId, exchange: Exchange, outbound: ChannelHandle) -> Self {
        Self {
            id,
            exchange,
            outbound,
        }
    }

    pub fn id(&self) -> TelephoneId {
        self.id
    }

    pub fn exchange(&self) -> &Exchange {
        &self.exchange
    }

    pub fn outbound_channel(&self) -> &ChannelHandle {
        &self.outbound
    }

    /// Outbound channel of the current peer, if a call is established.
    pub async fn inbound_channel(&self) -> Result<Option<ChannelHandle>, ExchangeError> {
        self.exchange.inbound_channel(self.id).await
    }

    pub async fn status(&self) -> Result<Status, ExchangeError> {
        Ok(self.snapshot().await?.status)
    }

    pub async fn snapshot(&self) -> Result<TelephoneSnapshot, ExchangeError> {
        self.exchange.snapshot(self.id).await
    }

    /// Who is calling, while the line rings.
    pub async fn caller_id(&self) -> Result<Option<TelephoneId>, ExchangeError> {
        let snapshot = self.snapshot().await?;
        Ok(match snapshot.status {
            Status::Ringing => snapshot.incoming_call,
            _ => None,
        })
    }

    /// Starts calling `destination`.
    ///
    /// When the destination is busy or unknown the line is put back to `OffCall` before
    /// the error is returned.
    pub async fn dial(&self, destination: TelephoneId) -> Result<(), ExchangeError> {
        if destination == self.id {
            return Err(ExchangeError::DialingMyself(self.id));
        }

        debug!(
            event = events::DIAL_START,
            component = COMPONENT,
            telephone = %self.id,
            peer = %destination,
            "dialing"
        );

        match self.exchange.enroute_call(self.id, destination).await {
            Ok(()) => Ok(()),
            Err(err @ (ExchangeError::Busy(_) | ExchangeError::NotFound(_))) => {
                if self.exchange.release(self.id).await.is_ok() {
                    warn!(
                        event = events::DIAL_RECOVERED,
                        component = COMPONENT,
                        telephone = %self.id,
                        peer = %destination,
                        err = %err,
                        "dial failed, line released"
                    );
                }
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    /// Waits until the dialed telephone answers or the dial timeout of the exchange
    /// elapses. Fails with [`ExchangeError::Busy`] when the line is not dialing.
    pub async fn wait_for_answer(&self) -> Result<DialOutcome, ExchangeError> {
        let mut status_rx = self.exchange.subscribe_status(self.id).await?;
        if *status_rx.borrow_and_update() != Status::Dialing {
            return Err(ExchangeError::Busy(self.id));
        }

        let dial_timeout = self.exchange.timings().dial_timeout;
        let waited = tokio::time::timeout(dial_timeout, async {
            status_rx
                .wait_for(|status| *status != Status::Dialing)
                .await
                .map(|status| *status)
        })
        .await;

        let status = match waited {
            Ok(Ok(status)) => status,
            Ok(Err(_)) => return Err(ExchangeError::NotFound(self.id)),
            Err(_) => {
                if self.exchange.release_if(self.id, Status::Dialing).await? {
                    info!(
                        event = events::DIAL_TIMEOUT,
                        component = COMPONENT,
                        telephone = %self.id,
                        timeout_ms = dial_timeout.as_millis() as u64,
                        "nobody answered"
                    );
                    return Ok(DialOutcome::TimedOut);
                }
                self.status().await?
            }
        };

        if status == Status::Busy {
            info!(
                event = events::DIAL_ANSWERED,
                component = COMPONENT,
                telephone = %self.id,
                "call answered"
            );
            Ok(DialOutcome::Answered)
        } else {
            info!(
                event = events::DIAL_ENDED,
                component = COMPONENT,
                telephone = %self.id,
                status = %status,
                "dial ended without answer"
            );
            Ok(DialOutcome::Ended)
        }
    }

    /// Picks up the ringing line and opens the call with whoever dialed it.
    pub async fn answer(&self) -> Result<CallOpened, ExchangeError> {
        let snapshot = self.snapshot().await?;
        match (snapshot.status, snapshot.incoming_call) {
            (Status::Ringing, Some(caller)) => {
                self.exchange.open_call_between(self.id, caller).await
            }
            (Status::Busy, _) => Err(ExchangeError::Busy(self.id)),
            _ => Err(ExchangeError::NoIncomingCall(self.id)),
        }
    }

    /// Ends the current call, pending or established. Both lines end up `OffCall`.
    pub async fn hang_up(&self) -> Result<(), ExchangeError> {
        let peer = self.exchange.hang_up(self.id).await?;

        info!(
            event = events::HANG_UP_OK,
            component = COMPONENT,
            telephone = %self.id,
            peer = %fields::format_optional_id(Some(peer)),
            "hung up"
        );
        Ok(())
    }

    /// Spawns the producer and consumer of this line for the established call. A call
    /// gets one pair per side; asking again fails with [`ExchangeError::Busy`].
    pub async fn stream_call(&self, mode: StreamMode) -> Result<CallStream, ExchangeError> {
        let binding = self.exchange.stream_binding(self.id).await?;
        let interval = self.exchange.timings().stream_interval;
        Ok(CallStream::spawn(
            binding,
            self.exchange.clone(),
            mode,
            interval,
        ))
    }
}

impl fmt::Debug for Telephone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Telephone")
            .field("id", &self.id)
            .field("exchange", &self.exchange.name())
            .field("outbound", &self.outbound.name())
            .finish()
    }
}

impl fmt::Display for Telephone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Telephone ({})", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::DialOutcome;
    use crate::{
        CallTimings, Exchange, ExchangeError, Status, Telephone, TelephoneId, TelephoneRecord,
    };
    use std::time::Duration;

    fn id(number: u32) -> TelephoneId {
        TelephoneId::new(number).expect("valid id")
    }

    async fn pair(exchange: &Exchange) -> (Telephone, Telephone) {
        let one = exchange
            .register(TelephoneRecord::new(1).expect("valid number"))
            .await
            .expect("fresh id");
        let two = exchange
            .register(TelephoneRecord::new(2).expect("valid number"))
            .await
            .expect("fresh id");
        (one, two)
    }

    #[tokio::test]
    async fn dialing_myself_is_rejected_without_touching_the_line() {
        let exchange = Exchange::new("self-dial");
        let (one, _two) = pair(&exchange).await;

        assert_eq!(
            one.dial(id(1)).await,
            Err(ExchangeError::DialingMyself(id(1)))
        );
        assert_eq!(one.status().await, Ok(Status::OffCall));
    }

    #[tokio::test]
    async fn dialing_myself_is_rejected_in_every_call_state() {
        let exchange = Exchange::new("self-dial-states");
        let (one, two) = pair(&exchange).await;

        one.dial(two.id()).await.expect("idle");
        for (telephone, expected) in [(&one, Status::Dialing), (&two, Status::Ringing)] {
            let before = telephone.snapshot().await.expect("registered");
            assert_eq!(before.status, expected);
            assert_eq!(
                telephone.dial(telephone.id()).await,
                Err(ExchangeError::DialingMyself(telephone.id()))
            );
            assert_eq!(telephone.snapshot().await, Ok(before));
        }

        two.answer().await.expect("ringing");
        for telephone in [&one, &two] {
            let before = telephone.snapshot().await.expect("registered");
            assert_eq!(before.status, Status::Busy);
            assert_eq!(
                telephone.dial(telephone.id()).await,
                Err(ExchangeError::DialingMyself(telephone.id()))
            );
            assert_eq!(telephone.snapshot().await, Ok(before));
        }
    }

    #[tokio::test]
    async fn dialing_an_unknown_number_leaves_the_line_off_call() {
        let exchange = Exchange::new("unknown");
        let (one, _two) = pair(&exchange).await;

        assert_eq!(one.dial(id(9)).await, Err(ExchangeError::NotFound(id(9))));
        assert_eq!(one.status().await, Ok(Status::OffCall));
    }

    #[tokio::test]
    async fn caller_id_is_only_shown_while_ringing() {
        let exchange = Exchange::new("caller-id");
        let (one, two) = pair(&exchange).await;

        assert_eq!(two.caller_id().await, Ok(None));
        one.dial(two.id()).await.expect("idle");
        assert_eq!(two.caller_id().await, Ok(Some(id(1))));
        two.answer().await.expect("ringing");
        assert_eq!(two.caller_id().await, Ok(None));
    }

    #[tokio::test]
    async fn answer_without_a_ringing_line_fails() {
        let exchange = Exchange::new("answer");
        let (one, two) = pair(&exchange).await;

        assert_eq!(two.answer().await, Err(ExchangeError::NoIncomingCall(id(2))));
        one.dial(two.id()).await.expect("idle");
        two.answer().await.expect("ringing");
        assert_eq!(two.answer().await, Err(ExchangeError::Busy(id(2))));
    }

    #[tokio::test]
    async fn hang_up_without_a_call_fails() {
        let exchange = Exchange::new("hang-up");
        let (one, _two) = pair(&exchange).await;

        assert_eq!(one.hang_up().await, Err(ExchangeError::NoActiveCall(id(1))));
    }

    #[tokio::test]
    async fn wait_for_answer_requires_a_dialing_line() {
        let exchange = Exchange::new("not-dialing");
        let (one, _two) = pair(&exchange).await;

        assert_eq!(one.wait_for_answer().await, Err(ExchangeError::Busy(id(1))));
    }

    #[tokio::test]
    async fn wait_for_answer_returns_once_answered() {
        let exchange = Exchange::new("answered");
        let (one, two) = pair(&exchange).await;
        one.dial(two.id()).await.expect("idle");

        let (outcome, opened) = tokio::join!(one.wait_for_answer(), two.answer());
        assert_eq!(outcome, Ok(DialOutcome::Answered));
        assert_eq!(opened.expect("ringing").caller_id, id(1));
    }

    #[tokio::test(start_paused = true)]
    async fn wait_for_answer_times_out_and_resets_the_dialer_only() {
        let exchange = Exchange::with_timings(
            "timeout",
            CallTimings {
                dial_timeout: Duration::from_secs(10),
                stream_interval: Duration::from_millis(10),
            },
        );
        let (one, two) = pair(&exchange).await;
        one.dial(two.id()).await.expect("idle");

        assert_eq!(one.wait_for_answer().await, Ok(DialOutcome::TimedOut));
        assert_eq!(one.status().await, Ok(Status::OffCall));
        assert_eq!(two.status().await, Ok(Status::Ringing));
    }

    #[tokio::test]
    async fn stream_call_requires_an_established_call() {
        let exchange = Exchange::new("stream");
        let (one, two) = pair(&exchange).await;
        one.dial(two.id()).await.expect("idle");

        assert_eq!(
            one.stream_call(crate::StreamMode::Random { seed: None })
                .await
                .err(),
            Some(ExchangeError::NoActiveCall(id(1)))
        );
    }
}
