// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Wanderly: client core for generated city walking routes
//!
//! This crate talks to the Wanderly backend through a token-refreshing
//! gateway, draws generated routes between points of interest, and tracks
//! the user's progress along them, mirroring playback to a companion device.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
