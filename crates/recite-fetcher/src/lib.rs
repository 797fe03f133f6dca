mod audio;
mod iciba;
pub mod parse;

pub use iciba::IcibaFetcher;
