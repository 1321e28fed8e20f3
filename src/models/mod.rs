pub mod block;
pub mod fragment;
pub mod metadata;
pub mod statement;

pub use block::*;
pub use fragment::*;
pub use metadata::*;
pub use statement::*;
