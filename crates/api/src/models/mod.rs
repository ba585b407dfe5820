//! Domain models for the API.
//!
//! These types represent validated domain objects separate from database row
//! types. They are also the JSON response shapes, so everything here derives
//! `Serialize` and deliberately has no field for password hashes.

pub mod cart;
pub mod order;
pub mod product;
pub mod user;

pub use cart::CartLine;
pub use order::NewOrderItem;
pub use product::Product;
pub use user::{PublicUser, User};
