//! profit-estrategista: lead capture and CRM sync for the Profit Estrategista site
//!
//! This library provides the core components for:
//! - Form validation into lead records
//! - Durable pending-lead storage
//! - CRM delivery with fast-path attempt, periodic sweep and retry policy
//! - WhatsApp handoff links
//! - Route gating for the members area
//! - Product catalog with checkout links
//! - Position sizing for B3 futures
//! - Structured logging and Prometheus metrics

pub mod app;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod crm;
pub mod lead;
pub mod messaging;
pub mod routes;
pub mod sizing;
pub mod store;
pub mod sync;
pub mod telemetry;
