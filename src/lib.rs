//! Lume Likes - likes and matches backend for the Lume dating app
//!
//! This library provides the like/match reconciliation flow behind the
//! `/api/like` endpoint: recording one-way likes and creating a match
//! record when two users have liked each other.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{LikeError, LikeOutcome, LikeReconciler, ProfileStore, StoreError};
pub use crate::models::{LikeRequest, MatchRecord, ProfileDocument};
