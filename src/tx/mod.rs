//! Transaction building, signing, submission and confirmation

mod builder;
mod receipt;
mod sender;

pub use builder::TransactionTemplate;
pub use receipt::{ReceiptOutcome, ReceiptWaiter};
pub use sender::TransactionSender;
