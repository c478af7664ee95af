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

//! Canonical structured field keys and value-format helpers.

use crate::telephone_record::TelephoneId;
use uuid::Uuid;

pub const EVENT: &str = "event";
pub const COMPONENT: &str = "component";
pub const TELEPHONE: &str = "telephone";
pub const PEER: &str = "peer";
pub const CALL_ID: &str = "call_id";
pub const ROLE: &str = "role";
pub const CHANNEL: &str = "channel";
pub const BIT: &str = "bit";
pub const REASON: &str = "reason";
pub const ERR: &str = "err";

pub const NONE: &str = "none";
pub const ROLE_PRODUCER: &str = "producer";
pub const ROLE_CONSUMER: &str = "consumer";
pub const REASON_CALL_ENDED: &str = "call_ended";
pub const REASON_SCRIPT_DONE: &str = "script_done";
pub const REASON_INBOUND_DETACHED: &str = "inbound_detached";

/// Correlation data attached to every event a streaming task emits.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StreamContext {
    pub call_id: String,
    pub telephone: String,
    pub role: &'static str,
}

impl StreamContext {
    pub fn new(call_id: Option<Uuid>, telephone: TelephoneId, role: &'static str) -> Self {
        Self {
            call_id: format_call_id(call_id),
            telephone: telephone.to_string(),
            role,
        }
    }

    /// Task label, for example `producer_3`.
    pub fn task_name(&self) -> String {
        format!("{}_{}", self.role, self.telephone)
    }
}

pub fn format_optional_id(id: Option<TelephoneId>) -> String {
    id.map(|id| id.to_string())
        .unwrap_or_else(|| NONE.to_string())
}

pub fn format_call_id(call_id: Option<Uuid>) -> String {
    call_id
        .map(|call_id| call_id.hyphenated().to_string())
        .unwrap_or_else(|| NONE.to_string())
}

pub fn format_bits<'a>(bits: impl IntoIterator<Item = &'a crate::Bit>) -> String {
    bits.into_iter().map(|bit| char::from(*bit)).collect()
}

#[cfg(test)]
mod tests {
    use super::{format_bits, format_call_id, format_optional_id, StreamContext, NONE};
    use crate::{Bit, TelephoneId};
    use uuid::Uuid;

    #[test]
    fn format_optional_id_falls_back_when_absent() {
        let id = TelephoneId::new(9).expect("valid id");

        assert_eq!(format_optional_id(Some(id)), "9");
        assert_eq!(format_optional_id(None), NONE);
    }

    #[test]
    fn format_call_id_is_hyphenated() {
        let call_id = Uuid::new_v4();

        assert_eq!(format_call_id(Some(call_id)).len(), 36);
        assert_eq!(format_call_id(None), NONE);
    }

    #[test]
    fn format_bits_renders_digits_in_order() {
        assert_eq!(format_bits(&[Bit::Zero, Bit::One, Bit::One]), "011");
    }

    #[test]
    fn stream_context_task_name_joins_role_and_telephone() {
        let context = StreamContext::new(
            None,
            TelephoneId::new(3).expect("valid id"),
            super::ROLE_PRODUCER,
        );

        assert_eq!(context.task_name(), "producer_3");
        assert_eq!(context.call_id, NONE);
    }
}
