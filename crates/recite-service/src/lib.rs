//! Word resolution and the recite operations built on top of the store.

mod envelope;
mod error;
mod resolver;
mod service;
mod view;

pub use envelope::Envelope;
pub use error::ReciteError;
pub use resolver::{WordCache, WordResolver};
pub use service::ReciteService;
pub use view::{AudioStatus, ClientConfig, ReviewWords, UnitWordItem, WordInfo};

pub type Result<T> = std::result::Result<T, ReciteError>;

#[cfg(test)]
pub(crate) mod testing;
