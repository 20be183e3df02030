//! Request handlers

pub mod balances;
pub mod common;
pub mod funding;
pub mod health;
pub mod pools;
pub mod quotes;
pub mod swaps;

pub use balances::get_balances;
pub use funding::{get_deposit, get_withdrawal, post_deposit, post_withdrawal, settle_deposit};
pub use health::{health, ready};
pub use pools::{create_asset, create_pool, get_assets, get_pool, get_pools};
pub use quotes::post_quote;
pub use swaps::{cancel_swap, confirm_swap, get_swap, get_swaps, post_swap};
