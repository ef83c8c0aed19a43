pub mod types;
pub mod charset;
pub mod ascii;
pub mod loader;
pub mod cache;
pub mod codec;
pub mod config;
pub mod synthetic;

pub use types::*;
pub use charset::*;
pub use ascii::*;
pub use loader::*;
pub use cache::*;
pub use codec::*;
pub use config::*;
