//! Pure helpers and static data tables

pub mod device_catalog;

pub use device_catalog::{device_display_name, device_item_numbers, is_mac_address};
