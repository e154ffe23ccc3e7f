//! API middleware.
//!
//! One layer: request identification. There is no rejecting auth gate —
//! requests without a valid token run as the development identity.

pub mod auth;
