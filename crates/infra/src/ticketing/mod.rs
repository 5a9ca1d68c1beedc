//! Helpdesk ticketing adapters

pub mod connectwise;

pub use connectwise::ConnectWiseClient;
