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

//! Timing knobs shared by every telephone of one exchange.

use std::time::Duration;

pub const DEFAULT_DIAL_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_STREAM_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CallTimings {
    /// How long a dialing telephone waits for the peer to answer.
    pub dial_timeout: Duration,
    /// Pause between two producer publications or two consumer reads.
    pub stream_interval: Duration,
}

impl Default for CallTimings {
    fn default() -> Self {
        Self {
            dial_timeout: DEFAULT_DIAL_TIMEOUT,
            stream_interval: DEFAULT_STREAM_INTERVAL,
        }
    }
}
