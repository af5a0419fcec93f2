mod cache;
mod flash;

pub use cache::ACCESS_TOKEN_KEY;
pub use cache::ACCESS_TOKEN_TTL;
pub use cache::FileCache;
pub use cache::MemoryCache;
pub use cache::TokenCache;
pub use flash::Flash;
pub use flash::FlashBag;
pub use flash::FlashKind;
