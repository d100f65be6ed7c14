//! 802.11 station discovery and deauthentication engine.

pub mod commands;
pub mod config;
pub mod error;
pub mod network;
pub mod packet;
pub mod pcap;
pub mod wifi;

#[cfg(test)]
mod test_utils;
