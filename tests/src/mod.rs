#[cfg(test)]
pub mod create_and_mint_tests;
#[cfg(test)]
pub mod listing_flow_tests;
#[cfg(test)]
pub mod snapshot_dry_run_tests;
#[cfg(test)]
pub mod utils;
