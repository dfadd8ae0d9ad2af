//! Workforce Rotation Indicator Engine
//!
//! This crate computes monthly and annual personnel rotation indicators
//! (retirements, headcount at period start and end, average workforce and
//! rotation percentage) from point-in-time employee snapshots served by an
//! HR source such as a SAP OData service.
//!
//! - [`calculation`] holds the pure rules: date normalization, monthly
//!   classification and filter option extraction.
//! - [`fetcher`] defines the snapshot source contract and its adapters.
//! - [`service`] fetches snapshots under a timeout and fans annual
//!   computations out over a bounded worker pool.
//! - [`api`] exposes the service as JSON endpoints.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod models;
pub mod service;
