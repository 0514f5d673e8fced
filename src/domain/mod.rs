mod error;
mod ledger;
mod money;
mod receipt;

pub use error::*;
pub use ledger::*;
pub use money::*;
pub use receipt::*;
