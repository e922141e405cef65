// Service exports
pub mod auth;
pub mod firestore;

pub use auth::{AuthError, AuthenticatedUser, FirebaseTokenVerifier};
pub use firestore::{FirestoreClient, FirestoreCollections, FirestoreError};
