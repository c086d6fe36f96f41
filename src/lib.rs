//! Study-progress planner.
//!
//! Turns two user-maintained JSON schedules (GK revisions and maths /
//! reasoning practice) into today's priorities, a capped daily plan, a
//! 7-day load forecast and plain-text guidance. The planning modules are
//! pure; `store`, `config` and the `routes_*` modules are the thin shell
//! that serves them over HTTP.

pub mod models;     // Data structures (items, buckets, plans, diagnostics)
pub mod parser;     // JSON schedule normalization
pub mod logic;      // Classification, daily plan, zero-day guard, exam flag
pub mod forecast;   // 7-day load forecast
pub mod guidance;   // Study guidance messages

pub mod config;
pub mod error;
pub mod logging;
pub mod store;      // Read-only loading of the schedule files
pub mod routes_plan;
pub mod routes_schedule;
