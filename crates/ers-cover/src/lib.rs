//! Range-cover index layer: the trees of hyperranges that schemes use to
//! compute `descend` (insertion cover), `brc` (best range cover), `src`
//! (single range cover), and `urc` (uniform range cover) over a query.

pub mod divider;
mod error;
mod product;
mod tree;

pub use divider::{AxisStrategy, Divider};
pub use error::CoverError;
pub use product::RangeCoverTreeProduct;
pub use tree::RangeCoverTree;
