//! Providers Module - External Data Sources
//!
//! Chain adapters and the RPC / explorer clients behind them.

pub mod adapter;
pub mod evm;
pub mod explorer;
pub mod registry;
pub mod rpc;
pub mod solana;

pub use adapter::ChainAdapter;
pub use evm::EvmAdapter;
pub use explorer::ExplorerClient;
pub use registry::{AdapterRegistry, PendingAdapter};
pub use rpc::RpcProvider;
pub use solana::SolanaAdapter;
