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

use crate::data_plane::channel::{Bit, ChannelHandle};
use crate::observability::events;
use crate::observability::fields::{self, StreamContext};
use crate::status::Status;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

const COMPONENT: &str = "producer";

/// Publishes bits on the outbound channel of one side of a call.
pub(crate) struct Producer {
    context: StreamContext,
    outbound: ChannelHandle,
    status: watch::Receiver<Status>,
    token: CancellationToken,
    interval: Duration,
}

impl Producer {
    pub(crate) fn new(
        context: StreamContext,
        outbound: ChannelHandle,
        status: watch::Receiver<Status>,
        token: CancellationToken,
        interval: Duration,
    ) -> Self {
        Self {
            context,
            outbound,
            status,
            token,
            interval,
        }
    }

    /// Publishes one random bit per interval until the call ends. Returns the count.
    pub(crate) async fn run_random(self, seed: Option<u64>) -> usize {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut published = 0;
        while self.call_active() {
            let bit = Bit::from(rng.gen_bool(0.5));
            self.publish(bit).await;
            published += 1;

            tokio::select! {
                _ = self.token.cancelled() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        self.log_stop(published, fields::REASON_CALL_ENDED);
        published
    }

    /// Publishes `bits` back to back, stopping early if the call ends.
    pub(crate) async fn run_scripted(self, bits: Vec<Bit>) -> usize {
        let mut published = 0;
        for bit in bits {
            if !self.call_active() {
                self.log_stop(published, fields::REASON_CALL_ENDED);
                return published;
            }
            self.publish(bit).await;
            published += 1;
        }

        self.log_stop(published, fields::REASON_SCRIPT_DONE);
        published
    }

    fn call_active(&self) -> bool {
        !self.token.is_cancelled() && *self.status.borrow() == Status::Busy
    }

    async fn publish(&self, bit: Bit) {
        self.outbound.publish(bit).await;
        debug!(
            event = events::PRODUCER_PUBLISH,
            component = COMPONENT,
            telephone = %self.context.telephone,
            call_id = %self.context.call_id,
            channel = self.outbound.name(),
            bit = %char::from(bit),
            "bit published"
        );
    }

    fn log_stop(&self, published: usize, reason: &'static str) {
        info!(
            event = events::PRODUCER_STOP,
            component = COMPONENT,
            telephone = %self.context.telephone,
            call_id = %self.context.call_id,
            published,
            reason,
            "producer stopped"
        );
    }
}
