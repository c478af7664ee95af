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

use crate::error::ExchangeError;
use crate::observability::events;
use crate::observability::fields::StreamContext;
use std::future::Future;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

const COMPONENT: &str = "stream_runtime";

pub(crate) fn spawn_stream_task<F>(context: &StreamContext, task: F) -> JoinHandle<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    let handle = tokio::spawn(task);

    debug!(
        event = events::RUNTIME_SPAWN_OK,
        component = COMPONENT,
        task = %context.task_name(),
        call_id = %context.call_id,
        "stream task spawned"
    );
    handle
}

/// Awaits a stream task, turning a panic or abort into [`ExchangeError::StreamTaskFailed`].
pub(crate) async fn join_stream_task<T>(
    context: &StreamContext,
    handle: JoinHandle<T>,
) -> Result<T, ExchangeError> {
    handle.await.map_err(|err| {
        warn!(
            event = events::RUNTIME_JOIN_FAILED,
            component = COMPONENT,
            task = %context.task_name(),
            call_id = %context.call_id,
            err = %err,
            "stream task failed"
        );
        ExchangeError::StreamTaskFailed(format!("{}: {err}", context.task_name()))
    })
}
