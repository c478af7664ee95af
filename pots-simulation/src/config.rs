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

use pots_exchange::{CallTimings, DEFAULT_DIAL_TIMEOUT, DEFAULT_STREAM_INTERVAL};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::time::Duration;

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub(crate) exchange: ExchangeConfig,
    pub(crate) telephones: Vec<u32>,
    #[serde(default)]
    pub(crate) seed: Option<u64>,
    pub(crate) steps: Vec<Step>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct ExchangeConfig {
    pub(crate) name: String,
    #[serde(default = "default_dial_timeout_ms")]
    pub(crate) dial_timeout_ms: u64,
    #[serde(default = "default_stream_interval_ms")]
    pub(crate) stream_interval_ms: u64,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum Step {
    Dial { from: u32, to: u32 },
    WaitForAnswer { telephone: u32 },
    Answer { telephone: u32 },
    Talk { telephone: u32, duration_ms: u64 },
    HangUp { telephone: u32 },
}

fn default_dial_timeout_ms() -> u64 {
    DEFAULT_DIAL_TIMEOUT.as_millis() as u64
}

fn default_stream_interval_ms() -> u64 {
    DEFAULT_STREAM_INTERVAL.as_millis() as u64
}

impl Config {
    pub fn load(path: &str) -> Result<Self, Box<dyn Error>> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Unable to read config file {path}: {e}"))?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, Box<dyn Error>> {
        json5::from_str(contents)
            .map_err(|e| format!("Unable to parse config file: {e}").into())
    }
}

impl ExchangeConfig {
    pub fn timings(&self) -> CallTimings {
        CallTimings {
            dial_timeout: Duration::from_millis(self.dial_timeout_ms),
            stream_interval: Duration::from_millis(self.stream_interval_ms),
        }
    }
}
