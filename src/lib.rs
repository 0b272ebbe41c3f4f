//! AHP Engine - Pairwise comparison and priority derivation
//!
//! This crate maintains reciprocal judgment matrices per hierarchy node,
//! sequences the elicitation of missing judgments, derives priority vectors
//! with a consistency check, and aggregates several evaluators into one
//! group result.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
