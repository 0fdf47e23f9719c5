#![allow(clippy::pedantic)]
#![allow(clippy::nursery)]
#![deny(clippy::unwrap_used)]
#![allow(clippy::missing_errors_doc)]

pub mod client;
pub mod constants;
pub mod error;
pub mod notifier;
pub mod profile;
pub mod store;
pub mod token;

pub use crate::client::*;
pub use crate::constants::*;
pub use crate::error::*;
pub use crate::notifier::*;
pub use crate::profile::*;
pub use crate::store::*;
pub use crate::token::*;
