pub mod convert;
pub mod delete;
pub mod rates;
pub mod referral;
pub mod save;
pub mod setup;
pub mod trades;
pub mod ui;

#[cfg(test)]
pub(crate) mod testing;
