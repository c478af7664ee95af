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

mod support;

use pots_exchange::{DialOutcome, ExchangeError, Status};
use support::{connect, id, init_logging, make_exchange, register_all};

#[tokio::test]
async fn full_call_lifecycle_returns_both_lines_to_off_call() {
    init_logging();
    let exchange = make_exchange("lifecycle");
    let telephones = register_all(&exchange, &[1, 2]).await;
    let (one, two) = (&telephones[0], &telephones[1]);

    one.dial(two.id()).await.expect("idle destination");
    assert_eq!(one.status().await, Ok(Status::Dialing));
    assert_eq!(two.status().await, Ok(Status::Ringing));

    let opened = two.answer().await.expect("ringing line");
    assert_eq!(opened.acceptor, id(2));
    assert_eq!(opened.caller_id, id(1));
    assert_eq!(one.status().await, Ok(Status::Busy));
    assert_eq!(two.status().await, Ok(Status::Busy));

    let one_inbound = one.inbound_channel().await.expect("registered").expect("in call");
    let two_inbound = two.inbound_channel().await.expect("registered").expect("in call");
    assert!(one_inbound.same_channel(two.outbound_channel()));
    assert!(two_inbound.same_channel(one.outbound_channel()));

    let one_snapshot = one.snapshot().await.expect("registered");
    let two_snapshot = two.snapshot().await.expect("registered");
    assert_eq!(one_snapshot.call_id, Some(opened.call_id));
    assert_eq!(two_snapshot.call_id, Some(opened.call_id));

    two.hang_up().await.expect("established call");
    for telephone in [one, two] {
        let snapshot = telephone.snapshot().await.expect("registered");
        assert_eq!(snapshot.status, Status::OffCall);
        assert_eq!(snapshot.inbound_peer, None);
        assert_eq!(snapshot.call_id, None);
    }
    assert_eq!(exchange.communication_exists(id(1), id(2)).await, Ok(false));
}

#[tokio::test]
async fn third_telephone_gets_busy_while_a_call_is_established() {
    init_logging();
    let exchange = make_exchange("busy");
    let telephones = register_all(&exchange, &[1, 2, 3]).await;
    connect(&telephones[0], &telephones[1]).await;

    let one_before = telephones[0].snapshot().await.expect("registered");
    assert_eq!(
        telephones[2].dial(id(1)).await,
        Err(ExchangeError::Busy(id(1)))
    );

    assert_eq!(telephones[0].snapshot().await, Ok(one_before));
    assert_eq!(telephones[2].status().await, Ok(Status::OffCall));
    assert_eq!(exchange.communication_exists(id(1), id(2)).await, Ok(true));
    assert_eq!(exchange.communication_exists(id(3), id(1)).await, Ok(false));
}

#[tokio::test]
async fn opening_a_call_that_was_never_routed_fails_with_no_path() {
    init_logging();
    let exchange = make_exchange("no-path");
    register_all(&exchange, &[4, 5]).await;

    let err = exchange
        .open_call_between(id(4), id(5))
        .await
        .expect_err("nothing was dialed");

    assert_eq!(err, ExchangeError::NoPath { from: id(4), to: id(5) });
    assert_eq!(err.to_string(), "there is no path between telephone 4 and 5");
    assert_eq!(exchange.snapshot(id(4)).await.map(|s| s.status), Ok(Status::OffCall));
    assert_eq!(exchange.snapshot(id(5)).await.map(|s| s.status), Ok(Status::OffCall));
}

#[tokio::test]
async fn answering_a_call_dialed_to_someone_else_fails() {
    init_logging();
    let exchange = make_exchange("wrong-acceptor");
    let telephones = register_all(&exchange, &[1, 2, 3]).await;
    telephones[0].dial(id(2)).await.expect("idle destination");

    assert!(exchange.open_call_between(id(3), id(1)).await.is_err());
    assert_eq!(telephones[0].status().await, Ok(Status::Dialing));
    assert_eq!(telephones[1].status().await, Ok(Status::Ringing));
}

#[tokio::test]
async fn caller_hanging_up_while_ringing_cancels_the_pending_call() {
    init_logging();
    let exchange = make_exchange("pending");
    let telephones = register_all(&exchange, &[1, 2]).await;
    telephones[0].dial(id(2)).await.expect("idle destination");

    telephones[0].hang_up().await.expect("pending call");

    assert_eq!(telephones[0].status().await, Ok(Status::OffCall));
    assert_eq!(telephones[1].status().await, Ok(Status::OffCall));
    assert_eq!(
        telephones[1].answer().await,
        Err(ExchangeError::NoIncomingCall(id(2)))
    );
}

#[tokio::test]
async fn destination_rejecting_while_ringing_ends_the_dial() {
    init_logging();
    let exchange = make_exchange("rejected");
    let telephones = register_all(&exchange, &[1, 2]).await;
    telephones[0].dial(id(2)).await.expect("idle destination");

    let (outcome, rejected) = tokio::join!(
        telephones[0].wait_for_answer(),
        telephones[1].hang_up()
    );

    assert_eq!(outcome, Ok(DialOutcome::Ended));
    assert_eq!(rejected, Ok(()));
    assert_eq!(telephones[0].status().await, Ok(Status::OffCall));
}

#[tokio::test(start_paused = true)]
async fn unanswered_dial_times_out_after_the_dial_timeout() {
    init_logging();
    let exchange = make_exchange("timeout");
    let telephones = register_all(&exchange, &[1, 2]).await;
    telephones[0].dial(id(2)).await.expect("idle destination");

    let started = tokio::time::Instant::now();
    assert_eq!(
        telephones[0].wait_for_answer().await,
        Ok(DialOutcome::TimedOut)
    );

    assert!(started.elapsed() >= exchange.timings().dial_timeout);
    assert_eq!(telephones[0].status().await, Ok(Status::OffCall));
    assert_eq!(telephones[1].status().await, Ok(Status::Ringing));
}

#[tokio::test]
async fn communication_exists_agrees_in_both_directions() {
    init_logging();
    let exchange = make_exchange("symmetry");
    let telephones = register_all(&exchange, &[1, 2, 3]).await;

    let check = |expected: bool| {
        let exchange = exchange.clone();
        async move {
            for (a, b) in [(1, 2), (2, 1)] {
                assert_eq!(exchange.communication_exists(id(a), id(b)).await, Ok(expected));
            }
        }
    };

    check(false).await;
    telephones[0].dial(id(2)).await.expect("idle destination");
    check(true).await;
    telephones[1].answer().await.expect("ringing line");
    check(true).await;
    telephones[0].hang_up().await.expect("established call");
    check(false).await;

    assert_eq!(
        exchange.communication_exists(id(1), id(9)).await,
        Err(ExchangeError::NotFound(id(9)))
    );
}
