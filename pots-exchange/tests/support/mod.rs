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

use pots_exchange::{CallTimings, Exchange, Telephone, TelephoneId, TelephoneRecord};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

pub(crate) fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub(crate) fn id(number: u32) -> TelephoneId {
    TelephoneId::new(number).expect("telephone numbers start at 1")
}

/// Exchange with short timings so streaming tests finish quickly.
pub(crate) fn make_exchange(name: &str) -> Exchange {
    Exchange::with_timings(
        name,
        CallTimings {
            dial_timeout: Duration::from_millis(500),
            stream_interval: Duration::from_millis(5),
        },
    )
}

pub(crate) async fn register_all(exchange: &Exchange, numbers: &[u32]) -> Vec<Telephone> {
    let mut telephones = Vec::with_capacity(numbers.len());
    for number in numbers {
        let record = TelephoneRecord::new(*number).expect("telephone numbers start at 1");
        telephones.push(
            exchange
                .register(record)
                .await
                .expect("registration should succeed"),
        );
    }
    telephones
}

#[allow(dead_code)]
pub(crate) async fn connect(caller: &Telephone, acceptor: &Telephone) {
    caller
        .dial(acceptor.id())
        .await
        .expect("dial should succeed");
    acceptor.answer().await.expect("answer should succeed");
}
