pub mod human;
pub mod ledger;
pub mod policy;
pub mod random;
pub mod registry;
pub mod strategy;

pub use human::HumanBot;
pub use ledger::{CardLedger, Holding, LedgerEntry};
pub use policy::{RankPolicy, StrategyParams, WeightClass, WeightState};
pub use random::RandomBot;
pub use strategy::StrategyBot;
