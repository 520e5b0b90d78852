//! Twinverse Core
//!
//! Core types for the Twinverse creation pipeline client.
//!
//! This crate contains:
//! - Domain types: Stage, JobHandle, PipelineContext, Route
//! - DTOs: request/response shapes for the per-stage Job Service API

pub mod domain;
pub mod dto;
