#[cfg(test)]
pub mod bootstrap_tests;
#[cfg(test)]
pub mod exchange_tests;
#[cfg(test)]
pub mod metadata_tests;
#[cfg(test)]
pub mod star_creation_tests;
#[cfg(test)]
pub mod transfer_tests;
