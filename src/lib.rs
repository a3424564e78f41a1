//! Filter, aggregate and chart pipeline behind the bioink laboratory dashboard.
//!
//! ```text
//!  file ──► data::cache ──► data::filter ──► stats ──► chart ──► pages::PageView
//! ```
//!
//! Everything here is UI-agnostic; the `bioink-dash` binary drives it with
//! egui, `--dump` drives it headless.

pub mod chart;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod pages;
pub mod stats;
