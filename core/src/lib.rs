pub mod binary;
pub mod bootstrapping;
pub mod ciphertext;
pub mod circuits;
pub mod elem;
pub mod errors;
pub mod gates;
pub mod keyring;
pub mod keys;
pub mod parameters;
#[cfg(test)]
mod tests;
pub mod transit_key;

pub use binary::*;
pub use bootstrapping::*;
pub use ciphertext::*;
pub use circuits::*;
pub use elem::*;
pub use errors::*;
pub use gates::*;
pub use keyring::*;
pub use keys::*;
pub use parameters::*;
pub use transit_key::*;

pub use sampling::source::Source;

pub(crate) const SIX_SIGMA: f64 = 6.0;
