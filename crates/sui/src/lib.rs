// Module declarations
pub mod balance;
pub mod chain;
pub mod client;
pub mod faucet;
pub mod tx;

// Re-export commonly used items
pub use balance::{format_sui, get_balance};
pub use client::{get_client, get_client_by_str, Network};
pub use tx::{build_draft, execute, DraftBytes, ExecuteResult};
