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

//! Call-routing transitions over the line registry.
//!
//! Each function validates everything first and mutates only afterwards, so a failed
//! transition leaves both lines untouched. Callers hold the registry lock for the whole
//! call, which makes every transition atomic with respect to the two lines involved.

use crate::control_plane::call_observer::CallOpened;
use crate::control_plane::line_registry::{ActiveCall, LineRegistry};
use crate::error::ExchangeError;
use crate::status::Status;
use crate::telephone_record::TelephoneId;

/// `origin` starts calling `destination`.
pub(crate) fn enroute_call(
    lines: &mut LineRegistry,
    origin: TelephoneId,
    destination: TelephoneId,
) -> Result<(), ExchangeError> {
    if origin == destination {
        return Err(ExchangeError::DialingMyself(origin));
    }

    lines.get(origin)?;
    if lines.get(destination)?.status() == Status::Busy {
        return Err(ExchangeError::Busy(destination));
    }

    let origin_line = lines.get_mut(origin)?;
    origin_line.last_call = Some(destination);
    origin_line.set_status(Status::Dialing);

    let destination_line = lines.get_mut(destination)?;
    destination_line.incoming_call = Some(origin);
    destination_line.set_status(Status::Ringing);

    Ok(())
}

/// `acceptor` picks up the call ringing from `caller`. Both sides end up `Busy`, each
/// consuming the other's outbound channel.
pub(crate) fn open_call_between(
    lines: &mut LineRegistry,
    acceptor: TelephoneId,
    caller: TelephoneId,
) -> Result<CallOpened, ExchangeError> {
    let acceptor_view = lines.get(acceptor)?.snapshot();
    let caller_view = lines.get(caller)?.snapshot();

    if acceptor_view.status != Status::Ringing || !acceptor_view.is_connected_to(&caller_view) {
        return Err(ExchangeError::NoPath {
            from: acceptor,
            to: caller,
        });
    }

    let call = ActiveCall::new();
    let opened = CallOpened {
        call_id: call.call_id,
        acceptor,
        caller_id: caller,
    };

    for (line_id, peer) in [(caller, acceptor), (acceptor, caller)] {
        let line = lines.get_mut(line_id)?;
        line.last_call = Some(peer);
        line.incoming_call = None;
        line.inbound_peer = Some(peer);
        line.attach_call(call.clone());
        line.set_status(Status::Busy);
    }

    Ok(opened)
}

/// `closer` ends its call with `peer`. Only the peer is normalized here.
pub(crate) fn close_call_between(
    lines: &mut LineRegistry,
    closer: TelephoneId,
    peer: TelephoneId,
) -> Result<(), ExchangeError> {
    let closer_view = lines.get(closer)?.snapshot();
    let peer_view = lines.get(peer)?.snapshot();

    if !closer_view.is_connected_to(&peer_view) {
        return Err(ExchangeError::NoPath {
            from: closer,
            to: peer,
        });
    }

    let peer_line = lines.get_mut(peer)?;
    peer_line.incoming_call = None;
    peer_line.inbound_peer = None;
    peer_line.set_status(Status::OffCall);

    Ok(())
}

/// Peer a hang-up from `id` has to signal, derived from its current status.
pub(crate) fn hang_up_target(
    lines: &LineRegistry,
    id: TelephoneId,
) -> Result<TelephoneId, ExchangeError> {
    lines.get(id)?.peer().ok_or(ExchangeError::NoActiveCall(id))
}
