//! Types library for the DEX order client
//!
//! Value objects shared by the pure computation core and the async
//! order service. Everything here is owned by the call that produced it;
//! no type in this crate holds shared mutable state.
//!
//! # Modules
//! - `ids`: Asset, order and address identifiers
//! - `keys`: Public keys and signatures (base58 on the wire)
//! - `numeric`: Integer money amounts with asset decimals
//! - `asset`: Assets and asset pairs
//! - `market`: Displayable markets
//! - `order`: Order parameters, signed orders and matcher order views
//! - `order_book`: Bid/ask levels
//! - `fee`: Matcher fee settings
//! - `settings`: Local general-asset priority settings
//! - `errors`: Error taxonomy

pub mod ids;
pub mod keys;
pub mod numeric;
pub mod asset;
pub mod market;
pub mod order;
pub mod order_book;
pub mod fee;
pub mod settings;
pub mod errors;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::asset::*;
    pub use crate::errors::*;
    pub use crate::fee::*;
    pub use crate::ids::*;
    pub use crate::keys::*;
    pub use crate::market::*;
    pub use crate::numeric::*;
    pub use crate::order::*;
    pub use crate::order_book::*;
    pub use crate::settings::*;
}
