//! catbridge — web bridge for Yaesu CAT frequency monitoring and control
//!
//! Polls a transceiver's Main/Sub VFO frequencies over a serial CAT link
//! and serves them to browsers, relaying set-frequency commands back.
//!
//! ## Architecture (Hexagonal / Ports & Adapters)
//!
//! - `domain/` - Pure domain types, no I/O dependencies
//! - `cat/` - CAT protocol codec (pure) and the serial session (I/O)
//! - `ports/` - Trait definitions for the serial link
//! - `adapters/` - `serialport`-crate implementation of the ports
//! - `state/` - Shared display state
//! - `service/` - The one shared service object (session + state)
//! - `poller/` - Background polling thread
//! - `web/` - Thin HTTP façade (page, snapshot, SSE stream, set endpoint)

// Core domain (pure, no I/O)
pub mod cat;
pub mod domain;
pub mod ports;

// Adapters (external I/O)
pub mod adapters;

// Runtime
pub mod poller;
pub mod service;
pub mod state;
pub mod web;
