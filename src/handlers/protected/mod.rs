// handlers/protected/mod.rs - Protected handlers (OAuth2 session required)
//
// Mounted under /auth behind `middleware::auth_middleware`, which injects
// the `CurrentUser` these handlers read.

pub mod private;

pub use private::{api, user_info};
