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

//! Bit transport between telephones.
//!
//! Every telephone owns one outbound [`channel::Channel`]. Once a call is open the
//! telephone runs a producer publishing on that channel and a consumer reading the
//! peer's channel, both bound to the cancellation scope of the call.
//!
//! ```
//! use pots_exchange::{Bit, Channel, ChannelError};
//!
//! let mut channel = Channel::new("pipe1");
//! channel.publish(Bit::One);
//! assert_eq!(channel.consume(), Ok(Bit::One));
//! assert!(matches!(channel.consume(), Err(ChannelError::Empty { .. })));
//! ```

pub(crate) mod call_stream;
pub(crate) mod channel;
mod consumer;
mod producer;
