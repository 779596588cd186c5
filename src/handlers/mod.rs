// handlers/mod.rs - two security tiers
//
// Public (no auth) → Protected (OAuth2 session under /auth)
pub mod protected;
pub mod public;
