//! Service layer for weather-cache
//!
//! Cache-first weather resolution and per-user search history, sitting
//! between the HTTP/CLI surfaces and the storage/upstream crates.

#![allow(clippy::missing_errors_doc, reason = "Errors are self-explanatory from Result types")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]
#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]

mod error;
mod history_recorder;
mod weather_resolver;


pub use error::ServiceError;
pub use history_recorder::HistoryRecorder;
pub use weather_resolver::{WeatherResolver, canonical_key};
