pub mod bit_matrix;
pub mod gadget;
pub mod mat_ops;
pub mod matrix;
pub mod modulus;
pub mod sampling;
pub mod stats;

pub use bit_matrix::*;
pub use gadget::*;
pub use mat_ops::*;
pub use matrix::*;
pub use modulus::*;
pub use sampling::*;
pub use stats::*;
