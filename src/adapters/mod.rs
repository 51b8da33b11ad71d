// Adapters layer: concrete implementations of the domain ports for external systems.

pub mod hibp;
pub mod storage;

#[cfg(feature = "lambda")]
pub mod secrets;
#[cfg(feature = "lambda")]
pub mod ses;
