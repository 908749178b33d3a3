//! Transaction validation, sending and gas fallback.

pub mod allow_list;
pub mod sender;
pub mod submitter;

pub use allow_list::{AllowListPolicy, AllowListValidator, AllowListVerdict};
pub use sender::{ProviderSender, SendError, TransactionSender};
pub use submitter::{SubmittedTransaction, TransactionPayload, TransactionSubmitter};
