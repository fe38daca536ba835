// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Transports between the agent store and the agent backend

pub mod http;
pub mod transport;
pub mod ws;

pub use http::HttpBackend;
pub use transport::{
    Backend, CommandTransport, PollTransport, PushTransport, StatsTransport, TransportError,
};
pub use ws::WsPush;

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeTransport, TransportCall};
