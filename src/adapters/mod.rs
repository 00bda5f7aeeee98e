//! Adapters for secret material
//!
//! - `secrets`: resolution of the platform bearer credential, including
//!   passphrase-sealed keys in the settings file

pub mod secrets;
