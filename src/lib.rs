// ABOUTME: Main library entry point for the breakline integration core
// ABOUTME: Wearable OAuth/activity ingestion and ocean condition rating for the surf log platform
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Breakline

#![deny(unsafe_code)]

//! # Breakline Core
//!
//! The integration core of the Breakline surf session tracker. This crate
//! reconciles noisy external data with the domain model:
//!
//! - **Wearable sync**: OAuth2/PKCE token lifecycle for a connected wearable
//!   account, plus an ingestion pipeline that deduplicates, geo-matches, and
//!   converts external activity records into session drafts.
//! - **Condition rating**: converts wave height, wind vector, and swell
//!   period into a deterministic 0-6 quality level, and scores how closely
//!   independent forecast sources agree on the same quantity.
//!
//! Account storage, the relational schema, and HTTP routing live outside
//! this crate; it talks to them through the traits in [`storage`].

pub mod agreement;
pub mod conditions;
pub mod config;
pub mod constants;
pub mod geo;
pub mod http;
pub mod ingest;
pub mod logging;
pub mod models;
pub mod oauth;
pub mod rating;
pub mod storage;
pub mod units;
