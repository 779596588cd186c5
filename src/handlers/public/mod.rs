// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Person CRUD, the liveness probe and the entry point of the login flow.

pub mod login;
pub mod ping;
pub mod users;

pub use login::login;
pub use ping::ping;
