// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP/JSON bodies and routes shared by the bundled transports.
//!
//! Wire format: one JSON document per HTTP body or WebSocket text frame.
//! Field names are camelCase; timestamps are epoch milliseconds.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod query;
mod request;
mod response;
pub mod route;
mod wire;

pub use query::{LogQuery, DEFAULT_LOG_LIMIT};
pub use request::{DeleteManyRequest, InterveneRequest};
pub use response::{reason, AgentList, DeleteManyResponse, ErrorBody, LogPage};
pub use wire::{decode, decode_str, encode, encode_string, ProtocolError};
