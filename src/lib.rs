//! Tracking Service - health tracker ingestion backend
//!
//! Validates sleep, physical activity, body fat, log and environment records
//! submitted for children and institutions, stores them, and announces every
//! write on a message bus.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
