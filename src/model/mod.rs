mod division;
mod event;
mod match_item;
mod row;
mod snapshot;

pub use division::*;
pub use event::*;
pub use match_item::*;
pub use row::*;
pub use snapshot::*;
