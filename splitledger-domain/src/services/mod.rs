pub mod group_balance;
pub mod pairwise_balance;
pub mod settlement_optimizer;
pub mod split_validator;

pub use group_balance::{GroupBalanceAggregator, GroupBalances};
pub use pairwise_balance::{PairwiseAccounting, PairwiseBalanceCalculator};
pub use settlement_optimizer::SettlementOptimizer;
pub use split_validator::SplitValidator;
