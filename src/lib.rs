//! Read-only HTTP gateway over on-chain loyalty programs.
//!
//! Loyalty program contracts expose their collections — bounties, prizes,
//! reward templates, members, vouchers — as an identifier list plus a
//! per-identifier detail getter. This crate serves those collections over
//! HTTP by running a batch fan-out per request: fetch the list, fetch each
//! item, and tolerate partial per-item failures by substituting well-formed
//! placeholder records. A request only fails outright when its input is bad
//! or the identifier-list read itself fails.
//!
//! # Modules
//!
//! - [`aggregate`] — The batch fan-out: ordered, length-preserving, with
//!   per-item failure absorption and optional bounded concurrency.
//! - [`chain`] — Alloy contract bindings and the [`chain::LoyaltySource`]
//!   read abstraction.
//! - [`config`] — Environment-based server configuration.
//! - [`gateway`] — One read operation per HTTP route, binding sources to the
//!   aggregator.
//! - [`handlers`] — Axum endpoint handlers and routing.
//! - [`network`] — Supported networks and their chain IDs.
//! - [`provider_cache`] — Per-network read-only JSON-RPC providers.
//! - [`sig_down`] — Graceful shutdown signal handling.
//! - [`telemetry`] — Tracing and OpenTelemetry setup.
//! - [`types`] — Normalized item records and response envelopes.

pub mod aggregate;
pub mod chain;
pub mod config;
pub mod gateway;
pub mod handlers;
pub mod network;
pub mod provider_cache;
pub mod sig_down;
pub mod telemetry;
pub mod types;
