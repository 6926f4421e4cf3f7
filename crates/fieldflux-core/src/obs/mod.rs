//! Instrumentation boundary.
//!
//! Executor logic never touches counter state directly; every signal
//! flows through [`sink::record`] as a [`sink::MetricsEvent`].

pub mod metrics;
pub mod sink;
