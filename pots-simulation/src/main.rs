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

mod config;
mod scenario;

use crate::config::Config;
use crate::scenario::Scenario;
use async_trait::async_trait;
use clap::Parser;
use pots_exchange::{CallObserver, CallOpened, Exchange, TelephoneRecord};
use std::error::Error;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command()]
struct SimulationArgs {
    #[arg(short, long, value_name = "FILE")]
    config: String,
}

/// Narrates who picked up whose call.
struct CallerIdDisplay;

#[async_trait]
impl CallObserver for CallerIdDisplay {
    async fn on_call_opened(&self, call: &CallOpened) {
        info!(
            "Telephone ({}) picked up, caller id shows telephone {}",
            call.acceptor, call.caller_id
        );
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let _ = tracing_subscriber::fmt::try_init();

    info!("Started pots-simulation");

    let args = SimulationArgs::parse();
    let config = Config::load(&args.config)?;

    let exchange = Exchange::with_timings(&config.exchange.name, config.exchange.timings());
    exchange.add_call_observer(Arc::new(CallerIdDisplay)).await;

    for number in &config.telephones {
        let telephone = exchange.register(TelephoneRecord::new(*number)?).await?;
        info!("{telephone} registered with {}", exchange.name());
    }

    let summary = Scenario::new(exchange, config.seed).run(&config.steps).await;
    info!("Simulation done: {summary:?}");

    Ok(())
}
