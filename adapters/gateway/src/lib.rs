#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Gateway to the adaptive opponent that plans attacks and learns from outcomes.
//!
//! [`AttackAdvisor`] is the seam the session talks to. [`HttpGateway`] speaks
//! the JSON protocol of the remote AI service, while [`OfflineAdvisor`] plays
//! the opponent locally for sessions without a server.

mod advisor;
mod error;
mod http;
mod offline;
mod wire;

pub use advisor::AttackAdvisor;
pub use error::GatewayError;
pub use http::{GatewayConfig, HttpGateway, FEEDBACK_PATH, NEXT_WAVE_PATH, TRAIN_PATH};
pub use offline::OfflineAdvisor;
