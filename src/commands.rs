//! Textual command table for the interactive session.

use pnet::util::MacAddr;

use crate::error::{ReconError, Result};
use crate::network::parse_mac;
use crate::network::sorting::SortBy;
use crate::wifi::WiFiRecon;

pub const HELP: &str = "\
  wifi.recon on                  Start 802.11 capture
  wifi.recon off                 Stop 802.11 capture
  wifi.recon set bs MAC          Target one access point and discover its clients
  wifi.recon clear bs            Drop the access point target
  wifi.recon set client MAC      Target one client for deauthentication
  wifi.recon clear client        Drop the client target
  wifi.deauth                    Deauthenticate the targeted client(s)
  wifi.show [seen]               List stations by name, or by last seen
  wifi.alias MAC LABEL           Label a known station
  wifi.json                      Dump the station table as JSON
  help                           Show this help
  quit                           Exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    ReconOn,
    ReconOff,
    SetAccessPoint(MacAddr),
    ClearAccessPoint,
    SetClient(MacAddr),
    ClearClient,
    Deauth,
    Show(SortBy),
    Alias { hw_address: MacAddr, label: String },
    Json,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let unknown = || ReconError::UnknownCommand(line.trim().to_string());

        let command = match tokens.as_slice() {
            ["wifi.recon", "on"] => Command::ReconOn,
            ["wifi.recon", "off"] => Command::ReconOff,
            ["wifi.recon", "set", "bs", mac] => Command::SetAccessPoint(parse_mac(mac)?),
            ["wifi.recon", "clear", "bs"] => Command::ClearAccessPoint,
            ["wifi.recon", "set", "client", mac] => Command::SetClient(parse_mac(mac)?),
            ["wifi.recon", "clear", "client"] => Command::ClearClient,
            ["wifi.deauth"] => Command::Deauth,
            ["wifi.show"] => Command::Show(SortBy::Name),
            ["wifi.show", by] => Command::Show(SortBy::parse(by)),
            ["wifi.alias", mac, label @ ..] if !label.is_empty() => Command::Alias {
                hw_address: parse_mac(mac)?,
                label: label.join(" "),
            },
            ["wifi.json"] => Command::Json,
            ["help"] => Command::Help,
            ["quit"] | ["exit"] => Command::Quit,
            _ => return Err(unknown()),
        };
        Ok(command)
    }
}

/// Run one command against the engine, returning text to print if any.
pub fn execute(recon: &WiFiRecon, command: &Command) -> Result<Option<String>> {
    match command {
        Command::ReconOn => recon.start().map(|_| None),
        Command::ReconOff => recon.stop().map(|_| None),
        Command::SetAccessPoint(bssid) => {
            recon.set_ap_filter(*bssid);
            Ok(None)
        }
        Command::ClearAccessPoint => {
            recon.clear_ap_filter();
            Ok(None)
        }
        Command::SetClient(client) => {
            recon.set_client_filter(*client);
            Ok(None)
        }
        Command::ClearClient => {
            recon.clear_client_filter();
            Ok(None)
        }
        Command::Deauth => {
            let stats = recon.start_deauth()?;
            Ok(Some(format!(
                "{} deauth frames sent, {} failed",
                stats.sent, stats.failed
            )))
        }
        Command::Show(by) => Ok(Some(recon.show(*by))),
        Command::Alias { hw_address, label } => {
            if recon.set_alias(&hw_address.to_string(), label) {
                Ok(None)
            } else {
                Ok(Some(format!("{} is not a known station", hw_address)))
            }
        }
        Command::Json => recon.json().map(Some),
        Command::Help => Ok(Some(HELP.to_string())),
        Command::Quit => Ok(None),
    }
}
