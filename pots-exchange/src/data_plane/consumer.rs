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

use crate::data_plane::channel::Bit;
use crate::error::ChannelError;
use crate::exchange::Exchange;
use crate::observability::events;
use crate::observability::fields::{self, StreamContext};
use crate::status::Status;
use crate::telephone_record::TelephoneId;
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

const COMPONENT: &str = "consumer";

enum Poll {
    Received(Bit),
    Empty,
    Detached,
}

/// Reads bits from whatever channel the peer of `telephone` currently publishes on.
///
/// The inbound channel is looked up through the exchange on every read, so a peer that
/// leaves the registry mid-call detaches the consumer instead of leaving it on a stale
/// queue.
pub(crate) struct Consumer {
    context: StreamContext,
    exchange: Exchange,
    telephone: TelephoneId,
    status: watch::Receiver<Status>,
    token: CancellationToken,
    interval: Duration,
}

impl Consumer {
    pub(crate) fn new(
        context: StreamContext,
        exchange: Exchange,
        telephone: TelephoneId,
        status: watch::Receiver<Status>,
        token: CancellationToken,
        interval: Duration,
    ) -> Self {
        Self {
            context,
            exchange,
            telephone,
            status,
            token,
            interval,
        }
    }

    /// One read per interval until the call ends. Empty reads are skipped.
    pub(crate) async fn run_polling(self) -> Vec<Bit> {
        let mut received = Vec::new();
        let mut reason = fields::REASON_CALL_ENDED;

        while self.call_active() {
            match self.poll().await {
                Poll::Received(bit) => received.push(bit),
                Poll::Empty => {}
                Poll::Detached => {
                    reason = fields::REASON_INBOUND_DETACHED;
                    break;
                }
            }

            tokio::select! {
                _ = self.token.cancelled() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        self.log_stop(&received, reason);
        received
    }

    /// Drains `expect` bits, waiting one interval whenever the channel runs dry.
    pub(crate) async fn run_scripted(self, expect: usize) -> Vec<Bit> {
        let mut received = Vec::with_capacity(expect);
        let mut reason = fields::REASON_SCRIPT_DONE;

        while received.len() < expect {
            match self.poll().await {
                Poll::Received(bit) => {
                    received.push(bit);
                    continue;
                }
                Poll::Detached => {
                    reason = fields::REASON_INBOUND_DETACHED;
                    break;
                }
                Poll::Empty => {}
            }

            if !self.call_active() {
                reason = fields::REASON_CALL_ENDED;
                break;
            }
            tokio::select! {
                _ = self.token.cancelled() => {
                    reason = fields::REASON_CALL_ENDED;
                    break;
                }
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        self.log_stop(&received, reason);
        received
    }

    fn call_active(&self) -> bool {
        !self.token.is_cancelled() && *self.status.borrow() == Status::Busy
    }

    async fn poll(&self) -> Poll {
        let inbound = match self.exchange.inbound_channel(self.telephone).await {
            Ok(Some(inbound)) => inbound,
            Ok(None) | Err(_) => return Poll::Detached,
        };

        match inbound.consume().await {
            Ok(bit) => {
                debug!(
                    event = events::CONSUMER_RECEIVE,
                    component = COMPONENT,
                    telephone = %self.context.telephone,
                    call_id = %self.context.call_id,
                    channel = inbound.name(),
                    bit = %char::from(bit),
                    "bit received"
                );
                Poll::Received(bit)
            }
            Err(err @ ChannelError::Empty { .. }) => {
                debug!(
                    event = events::CONSUMER_EMPTY,
                    component = COMPONENT,
                    telephone = %self.context.telephone,
                    call_id = %self.context.call_id,
                    err = %err,
                    "nothing to read"
                );
                Poll::Empty
            }
            Err(_) => Poll::Empty,
        }
    }

    fn log_stop(&self, received: &[Bit], reason: &'static str) {
        info!(
            event = events::CONSUMER_STOP,
            component = COMPONENT,
            telephone = %self.context.telephone,
            call_id = %self.context.call_id,
            bits = %fields::format_bits(received),
            reason,
            "consumer stopped"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::Consumer;
    use crate::observability::fields::{StreamContext, ROLE_CONSUMER};
    use crate::{Bit, Channel, Exchange, TelephoneId, TelephoneRecord};
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    fn id(number: u32) -> TelephoneId {
        TelephoneId::new(number).expect("valid id")
    }

    async fn connected_exchange(preloaded: Vec<Bit>) -> Exchange {
        let exchange = Exchange::new("consumer");
        exchange
            .register_with_channel(
                TelephoneRecord::new(1).expect("valid number"),
                Channel::with_bits("pipe1", preloaded),
            )
            .await
            .expect("fresh id");
        exchange
            .register(TelephoneRecord::new(2).expect("valid number"))
            .await
            .expect("fresh id");
        exchange.enroute_call(id(1), id(2)).await.expect("idle");
        exchange
            .open_call_between(id(2), id(1))
            .await
            .expect("ringing");
        exchange
    }

    async fn consumer_of_two(exchange: &Exchange) -> (Consumer, CancellationToken) {
        let binding = exchange.stream_binding(id(2)).await.expect("busy");
        let consumer = Consumer::new(
            StreamContext::new(Some(binding.call_id), id(2), ROLE_CONSUMER),
            exchange.clone(),
            id(2),
            binding.status,
            binding.token.clone(),
            Duration::from_millis(5),
        );
        (consumer, binding.token)
    }

    #[tokio::test]
    async fn scripted_run_drains_the_peer_channel_in_order() {
        let bits = Bit::from_digits(&[1, 0, 0, 1]).expect("binary digits");
        let exchange = connected_exchange(bits.clone()).await;
        let (consumer, _token) = consumer_of_two(&exchange).await;

        assert_eq!(consumer.run_scripted(4).await, bits);
    }

    #[tokio::test(start_paused = true)]
    async fn scripted_run_stops_short_when_the_call_ends() {
        let bits = Bit::from_digits(&[1, 1]).expect("binary digits");
        let exchange = connected_exchange(bits.clone()).await;
        let (consumer, _token) = consumer_of_two(&exchange).await;
        let task = tokio::spawn(consumer.run_scripted(5));

        tokio::time::sleep(Duration::from_millis(20)).await;
        exchange.close_call_between(id(1), id(2)).await.expect("talking");

        assert_eq!(task.await.expect("consumer task"), bits);
    }

    #[tokio::test]
    async fn polling_run_stops_when_the_peer_is_unregistered() {
        let exchange = connected_exchange(Vec::new()).await;
        let (consumer, token) = consumer_of_two(&exchange).await;

        exchange.unregister(id(1)).await.expect("registered");

        assert!(token.is_cancelled());
        assert!(consumer.run_polling().await.is_empty());
    }
}
