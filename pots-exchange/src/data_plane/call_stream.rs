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
use crate::data_plane::consumer::Consumer;
use crate::data_plane::producer::Producer;
use crate::error::ExchangeError;
use crate::exchange::Exchange;
use crate::observability::events;
use crate::observability::fields::{self, StreamContext};
use crate::runtime::stream_runtime::{join_stream_task, spawn_stream_task};
use crate::status::Status;
use crate::telephone_record::TelephoneId;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;
use uuid::Uuid;

const COMPONENT: &str = "call_stream";

/// How the two streaming tasks of a telephone behave during a call.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StreamMode {
    /// Publish a random bit and read one inbound bit every interval until the call ends.
    /// A seed makes the published sequence reproducible.
    Random { seed: Option<u64> },
    /// Publish `send` once and read exactly `expect` bits.
    Scripted { send: Vec<Bit>, expect: usize },
}

/// What one side of a call sent and received.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StreamReport {
    pub telephone: TelephoneId,
    pub call_id: Uuid,
    pub published: usize,
    pub received: Vec<Bit>,
}

/// Call-scoped state handed out by the exchange to start streaming.
pub(crate) struct StreamBinding {
    pub(crate) telephone: TelephoneId,
    pub(crate) call_id: Uuid,
    pub(crate) token: CancellationToken,
    pub(crate) status: watch::Receiver<Status>,
    pub(crate) outbound: ChannelHandle,
}

/// Running producer and consumer of one telephone. Both stop on their own once the
/// call ends; [`CallStream::join`] collects what they did.
pub struct CallStream {
    telephone: TelephoneId,
    call_id: Uuid,
    producer: JoinHandle<usize>,
    producer_context: StreamContext,
    consumer: JoinHandle<Vec<Bit>>,
    consumer_context: StreamContext,
}

impl CallStream {
    pub(crate) fn spawn(
        binding: StreamBinding,
        exchange: Exchange,
        mode: StreamMode,
        interval: Duration,
    ) -> Self {
        let StreamBinding {
            telephone,
            call_id,
            token,
            status,
            outbound,
        } = binding;

        let producer_context =
            StreamContext::new(Some(call_id), telephone, fields::ROLE_PRODUCER);
        let consumer_context =
            StreamContext::new(Some(call_id), telephone, fields::ROLE_CONSUMER);

        let producer = Producer::new(
            producer_context.clone(),
            outbound,
            status.clone(),
            token.clone(),
            interval,
        );
        let consumer = Consumer::new(
            consumer_context.clone(),
            exchange,
            telephone,
            status,
            token,
            interval,
        );

        let (producer, consumer) = match mode {
            StreamMode::Random { seed } => (
                spawn_stream_task(&producer_context, producer.run_random(seed)),
                spawn_stream_task(&consumer_context, consumer.run_polling()),
            ),
            StreamMode::Scripted { send, expect } => (
                spawn_stream_task(&producer_context, producer.run_scripted(send)),
                spawn_stream_task(&consumer_context, consumer.run_scripted(expect)),
            ),
        };

        Self {
            telephone,
            call_id,
            producer,
            producer_context,
            consumer,
            consumer_context,
        }
    }

    pub fn telephone(&self) -> TelephoneId {
        self.telephone
    }

    pub fn call_id(&self) -> Uuid {
        self.call_id
    }

    pub fn is_finished(&self) -> bool {
        self.producer.is_finished() && self.consumer.is_finished()
    }

    pub async fn join(self) -> Result<StreamReport, ExchangeError> {
        let published = join_stream_task(&self.producer_context, self.producer).await?;
        let received = join_stream_task(&self.consumer_context, self.consumer).await?;

        info!(
            event = events::CALL_FINISHED,
            component = COMPONENT,
            telephone = %self.telephone,
            call_id = %fields::format_call_id(Some(self.call_id)),
            published,
            received = %fields::format_bits(&received),
            "call stream finished"
        );

        Ok(StreamReport {
            telephone: self.telephone,
            call_id: self.call_id,
            published,
            received,
        })
    }
}
