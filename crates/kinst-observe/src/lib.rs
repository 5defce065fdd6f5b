mod logger;
pub use logger::*;

#[cfg(feature = "progress")]
mod subscriber;
#[cfg(feature = "progress")]
pub use subscriber::*;
