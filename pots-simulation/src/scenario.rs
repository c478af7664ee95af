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

use crate::config::Step;
use pots_exchange::{
    CallStream, Exchange, ExchangeError, Status, StreamMode, Telephone, TelephoneId,
};
use std::time::Duration;
use tracing::{info, warn};

/// Outcome of a whole scenario run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScenarioSummary {
    pub(crate) succeeded: usize,
    pub(crate) failed: usize,
}

/// Drives telephones registered on one exchange through a list of steps. A failing step
/// is reported and the run moves on, so scenarios can narrate busy lines and timeouts.
pub struct Scenario {
    exchange: Exchange,
    seed: Option<u64>,
    streams: Vec<CallStream>,
}

impl Scenario {
    pub fn new(exchange: Exchange, seed: Option<u64>) -> Self {
        Self {
            exchange,
            seed,
            streams: Vec::new(),
        }
    }

    pub async fn run(&mut self, steps: &[Step]) -> ScenarioSummary {
        let mut summary = ScenarioSummary::default();

        for (index, step) in steps.iter().enumerate() {
            match self.run_step(step).await {
                Ok(()) => summary.succeeded += 1,
                Err(err) => {
                    warn!(step = index, action = ?step, err = %err, "step failed");
                    summary.failed += 1;
                }
            }
        }

        self.exchange.reset().await;
        for stream in std::mem::take(&mut self.streams) {
            Self::report(stream).await;
        }

        info!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            "scenario finished"
        );
        summary
    }

    async fn run_step(&mut self, step: &Step) -> Result<(), ExchangeError> {
        match step {
            Step::Dial { from, to } => {
                let caller = self.telephone(*from).await?;
                caller.dial(TelephoneId::new(*to)?).await?;
                info!("{caller} is calling telephone {to}");
            }
            Step::WaitForAnswer { telephone } => {
                let telephone = self.telephone(*telephone).await?;
                let outcome = telephone.wait_for_answer().await?;
                info!("{telephone} stopped waiting: {outcome:?}");
            }
            Step::Answer { telephone } => {
                let telephone = self.telephone(*telephone).await?;
                let call = telephone.answer().await?;
                info!("{telephone} answered a call from telephone {}", call.caller_id);
            }
            Step::Talk {
                telephone,
                duration_ms,
            } => {
                let telephone = self.telephone(*telephone).await?;
                let snapshot = telephone.snapshot().await?;
                let peer = match (snapshot.status, snapshot.last_call) {
                    (Status::Busy, Some(peer)) => self.exchange.lookup(peer).await?,
                    _ => return Err(ExchangeError::NoActiveCall(telephone.id())),
                };

                for side in [&telephone, &peer] {
                    let seed = self
                        .seed
                        .map(|seed| seed.wrapping_add(u64::from(side.id().get())));
                    let stream = side.stream_call(StreamMode::Random { seed }).await?;
                    self.streams.push(stream);
                }
                info!("{telephone} and {peer} are talking");
                tokio::time::sleep(Duration::from_millis(*duration_ms)).await;
            }
            Step::HangUp { telephone } => {
                let telephone = self.telephone(*telephone).await?;
                let call_id = telephone.snapshot().await?.call_id;
                telephone.hang_up().await?;
                info!("{telephone} hung up");

                let (finished, running): (Vec<_>, Vec<_>) = std::mem::take(&mut self.streams)
                    .into_iter()
                    .partition(|stream| Some(stream.call_id()) == call_id);
                self.streams = running;
                for stream in finished {
                    Self::report(stream).await;
                }
            }
        }
        Ok(())
    }

    async fn telephone(&self, number: u32) -> Result<Telephone, ExchangeError> {
        self.exchange.lookup(TelephoneId::new(number)?).await
    }

    async fn report(stream: CallStream) {
        let telephone = stream.telephone();
        match stream.join().await {
            Ok(report) => {
                let received: String = report
                    .received
                    .iter()
                    .map(|bit| char::from(*bit))
                    .collect();
                info!(
                    "Telephone ({telephone}) sent {} bits and received [{received}]",
                    report.published
                );
            }
            Err(err) => warn!(telephone = %telephone, err = %err, "stream failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Scenario, ScenarioSummary};
    use crate::config::Step;
    use pots_exchange::{CallTimings, Exchange, Status, TelephoneId, TelephoneRecord};
    use std::time::Duration;

    async fn exchange_with(numbers: &[u32]) -> Exchange {
        let exchange = Exchange::with_timings(
            "scenario",
            CallTimings {
                dial_timeout: Duration::from_millis(50),
                stream_interval: Duration::from_millis(5),
            },
        );
        for number in numbers {
            exchange
                .register(TelephoneRecord::new(*number).expect("valid number"))
                .await
                .expect("fresh id");
        }
        exchange
    }

    #[tokio::test]
    async fn busy_line_is_reported_as_a_failed_step() {
        let exchange = exchange_with(&[1, 2, 3]).await;
        let mut scenario = Scenario::new(exchange.clone(), Some(11));

        let summary = scenario
            .run(&[
                Step::Dial { from: 1, to: 2 },
                Step::Answer { telephone: 2 },
                Step::Dial { from: 3, to: 2 },
                Step::Talk {
                    telephone: 1,
                    duration_ms: 20,
                },
                Step::HangUp { telephone: 1 },
            ])
            .await;

        assert_eq!(
            summary,
            ScenarioSummary {
                succeeded: 4,
                failed: 1
            }
        );
        assert!(exchange.is_empty().await);
    }

    #[tokio::test]
    async fn unanswered_dial_times_out_without_failing_the_step() {
        let exchange = exchange_with(&[4, 5]).await;
        let mut scenario = Scenario::new(exchange.clone(), None);

        assert_eq!(scenario.run_step(&Step::Dial { from: 4, to: 5 }).await, Ok(()));
        assert_eq!(
            scenario
                .run_step(&Step::WaitForAnswer { telephone: 4 })
                .await,
            Ok(())
        );

        let four = TelephoneId::new(4).expect("valid id");
        assert_eq!(
            exchange.snapshot(four).await.map(|snapshot| snapshot.status),
            Ok(Status::OffCall)
        );
    }
}
