// Core like/match reconciliation logic
pub mod reconciler;

pub use reconciler::{LikeError, LikeOutcome, LikeReconciler, ProfileStore, StoreError};
