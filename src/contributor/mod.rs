//! Values a compiled construct hands back to the host besides its own nodes:
//! role permissions, stack outputs and the worker function declaration.

mod outputs;
mod permissions;
mod worker;

pub use outputs::*;
pub use permissions::*;
pub use worker::*;
