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

//! Call status of a single telephone line.

use std::fmt::{Display, Formatter};

/// Exactly one value per telephone at any time. `OffCall` is both the initial
/// state and the state every call returns to.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Status {
    #[default]
    OffCall,
    Dialing,
    Ringing,
    Busy,
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Status::OffCall => "OFF_CALL",
            Status::Dialing => "DIALING",
            Status::Ringing => "RINGING",
            Status::Busy => "BUSY",
        };
        write!(f, "{label}")
    }
}
