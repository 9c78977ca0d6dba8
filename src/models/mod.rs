pub mod feed;
pub mod objects;
pub mod track;
pub mod versioned;

pub use feed::*;
pub use objects::*;
pub use track::*;
pub use versioned::*;
