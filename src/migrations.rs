//! The built-in migration chain.
//!
//! Covers document versions 7.5.0 through 8.7.0. All steps are pure
//! version bumps except 8.0.2 → 8.1.0, which reworks the VPN
//! connection schema.

use std::net::IpAddr;

use crate::document::Document;
use crate::map::AttrMap;
use crate::migrate::{Migration, VersionBump};
use crate::value::{Row, Setting, Table, Value};
use crate::version::Version;
use crate::{Error, Result};

/// Returns the built-in chain, in ascending order.
pub(crate) fn builtin_chain() -> Vec<Box<dyn Migration>> {
    // 8.0.2 -> 8.1.0 is the schema rework; everything else bumps the
    // version pragma only
    let bumps: &[((u32, u32, u32), (u32, u32, u32))] = &[
        ((7, 5, 0), (7, 6, 0)),
        ((7, 6, 0), (7, 6, 1)),
        ((7, 6, 1), (7, 6, 2)),
        ((7, 6, 2), (8, 0, 1)),
        ((8, 0, 1), (8, 0, 2)),
        ((8, 1, 0), (8, 1, 2)),
        ((8, 1, 2), (8, 1, 3)),
        ((8, 1, 3), (8, 1, 4)),
        ((8, 1, 4), (8, 1, 5)),
        ((8, 1, 5), (8, 1, 6)),
        ((8, 1, 6), (8, 1, 7)),
        ((8, 1, 7), (8, 1, 8)),
        ((8, 1, 8), (8, 3, 0)),
        ((8, 3, 0), (8, 3, 1)),
        ((8, 3, 1), (8, 4, 0)),
        ((8, 4, 0), (8, 4, 1)),
        ((8, 4, 1), (8, 4, 2)),
        ((8, 4, 2), (8, 5, 0)),
        ((8, 5, 0), (8, 5, 1)),
        ((8, 5, 1), (8, 5, 2)),
        ((8, 5, 2), (8, 5, 3)),
        ((8, 5, 3), (8, 6, 0)),
        ((8, 6, 0), (8, 6, 1)),
        ((8, 6, 1), (8, 7, 0)),
    ];

    let version =
        |(major, minor, patch): (u32, u32, u32)| Version::new(major, minor, patch, "default");

    let mut chain: Vec<Box<dyn Migration>> = Vec::new();
    for &(from, to) in bumps {
        chain.push(Box::new(VersionBump::new(version(from), version(to))));
        if to == (8, 0, 2) {
            chain.push(Box::new(VpnSchemaRework));
        }
    }
    chain
}

/// The 8.0.2 → 8.1.0 step: reworks the VPN connection schema.
///
/// - `VPN_ENABLED` becomes `VPN_START` (`yes` → `started`, `no` →
///   `stopped`),
/// - firewall rule `TARGET` columns become empty `TARGET_REF` columns,
/// - `LOCAL_1TO1NAT` becomes the table-valued `LOCAL_N_TO_N_NAT`,
/// - the external switch reference moves into the connection row's
///   `CONTROL`/`CONTROL_INV` columns plus a top-level
///   `SERVICE_SWITCH1_TYPE` setting.
pub struct VpnSchemaRework;

impl VpnSchemaRework {
    fn fail(&self, message: impl Into<String>) -> Error {
        Error::migration(self.from_version(), self.to_version(), message)
    }

    /// Number of rows of the table-valued setting at `path`, or `None`
    /// if the setting is absent or not a table.
    fn row_count(doc: &Document, path: &str) -> Result<Option<usize>> {
        Ok(doc
            .get_setting(path)?
            .and_then(|setting| setting.value.as_table())
            .map(|table| table.rows.len()))
    }

    /// `VPN_ENABLED` → `VPN_START` in every connection row.
    fn rework_vpn_start(&self, doc: &mut Document) -> Result<()> {
        let Some(connections) = Self::row_count(doc, "VPN_CONNECTION")? else {
            return Ok(());
        };

        for i in 0..connections {
            let enabled_path = format!("VPN_CONNECTION.{i}.VPN_ENABLED");
            let Some(setting) = doc.get_setting(&enabled_path)? else {
                continue;
            };

            let start = match setting.value_text()? {
                "yes" => "started",
                "no" => "stopped",
                other => {
                    return Err(self.fail(format!(
                        "{enabled_path} holds '{other}', expected 'yes' or 'no'"
                    )));
                }
            };

            doc.set_simple(&format!("VPN_CONNECTION.{i}.VPN_START"), start)?;
            doc.remove_setting(&enabled_path)?;
        }
        Ok(())
    }

    /// `TARGET` → `TARGET_REF` in every firewall rule row.
    fn rework_firewall_targets(&self, doc: &mut Document) -> Result<()> {
        let Some(connections) = Self::row_count(doc, "VPN_CONNECTION")? else {
            return Ok(());
        };

        for i in 0..connections {
            for direction in ["FW_INCOMING", "FW_OUTGOING"] {
                let table_path = format!("VPN_CONNECTION.{i}.{direction}");
                let Some(rules) = Self::row_count(doc, &table_path)? else {
                    continue;
                };

                for j in 0..rules {
                    let target_path = format!("{table_path}.{j}.TARGET");
                    let Some(target) = doc.get_setting_mut(&target_path)? else {
                        continue;
                    };
                    target.name = "TARGET_REF".to_string();
                    target.value = Value::Simple(String::new());
                }
            }
        }
        Ok(())
    }

    /// `LOCAL_1TO1NAT` → table-valued `LOCAL_N_TO_N_NAT` in every
    /// tunnel row that carries the old column.
    fn rework_local_nat(&self, doc: &mut Document) -> Result<()> {
        let Some(connections) = Self::row_count(doc, "VPN_CONNECTION")? else {
            return Ok(());
        };

        for i in 0..connections {
            let tunnel_path = format!("VPN_CONNECTION.{i}.TUNNEL");
            let Some(tunnels) = Self::row_count(doc, &tunnel_path)? else {
                continue;
            };

            for j in 0..tunnels {
                let nat_path = format!("{tunnel_path}.{j}.LOCAL_1TO1NAT");
                let Some(nat) = doc.get_setting(&nat_path)? else {
                    continue;
                };
                let nat_ip: IpAddr = nat
                    .value_text()?
                    .parse()
                    .map_err(|_| self.fail(format!("{nat_path} is not a valid IP address")))?;

                let local_path = format!("{tunnel_path}.{j}.LOCAL");
                let local = doc
                    .get_setting(&local_path)?
                    .ok_or_else(|| self.fail(format!("{local_path} is missing")))?;
                let (local_ip, prefix_len) = parse_cidr(local.value_text()?)
                    .ok_or_else(|| self.fail(format!("{local_path} is not a valid network")))?;

                let row = Row {
                    id: None,
                    settings: vec![
                        Setting::simple("COMMENT", ""),
                        Setting::simple("FROM_NET", nat_ip.to_string()),
                        Setting::simple("MASK", prefix_len.to_string()),
                        Setting::simple("TO_NET", local_ip.to_string()),
                    ],
                };
                let replacement = Table {
                    attributes: AttrMap::new(),
                    rows: vec![row],
                };

                // keeps the setting's position inside the tunnel row
                let Some(setting) = doc.get_setting_mut(&nat_path)? else {
                    continue;
                };
                setting.name = "LOCAL_N_TO_N_NAT".to_string();
                setting.value = Value::Table(replacement);
            }
        }
        Ok(())
    }

    /// Moves the external switch reference into the connection row.
    fn rework_external_switch(&self, doc: &mut Document) -> Result<()> {
        let Some(rowref) = doc.get_attribute("VPN_EXTERNAL_SWITCH_REF", "rowref")? else {
            return Ok(());
        };

        let switch_type = match doc.get_setting("VPN_RS_EXTERNAL_SWITCH_TYPE")? {
            Some(setting) => setting.value_text()?.to_string(),
            None => "button".to_string(),
        };

        let row_index = doc
            .get_setting("VPN_CONNECTION")?
            .and_then(|setting| setting.value.as_table())
            .and_then(|table| table.row_index(&rowref))
            .ok_or_else(|| Error::not_found("VPN connection row", rowref.as_str()))?;

        doc.set_simple(&format!("VPN_CONNECTION.{row_index}.CONTROL"), "cmd1")?;
        doc.set_simple(&format!("VPN_CONNECTION.{row_index}.CONTROL_INV"), "no")?;
        doc.set_setting(Setting::simple("SERVICE_SWITCH1_TYPE", switch_type));
        doc.remove_setting("VPN_EXTERNAL_SWITCH_REF")?;
        doc.remove_setting("VPN_RS_EXTERNAL_SWITCH_TYPE")?;
        Ok(())
    }
}

impl Migration for VpnSchemaRework {
    fn from_version(&self) -> Version {
        Version::new(8, 0, 2, "default")
    }

    fn to_version(&self) -> Version {
        Version::new(8, 1, 0, "default")
    }

    fn apply(&self, doc: &Document) -> Result<Document> {
        let mut next = doc.clone();
        self.rework_vpn_start(&mut next)?;
        self.rework_firewall_targets(&mut next)?;
        self.rework_local_nat(&mut next)?;
        self.rework_external_switch(&mut next)?;
        next.set_version(&self.to_version());
        Ok(next)
    }
}

/// Splits `a.b.c.d/len` into its address and prefix length.
fn parse_cidr(text: &str) -> Option<(IpAddr, u8)> {
    let (addr, len) = text.split_once('/')?;
    let addr: IpAddr = addr.parse().ok()?;
    let len: u8 = len.parse().ok()?;
    let max = if addr.is_ipv4() { 32 } else { 128 };
    (len <= max).then_some((addr, len))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_chain_is_contiguous_and_ascending() {
        let chain = builtin_chain();
        assert_eq!(chain[0].from_version(), Version::new(7, 5, 0, ""));
        assert_eq!(
            chain.last().unwrap().to_version(),
            Version::new(8, 7, 0, "")
        );
        for pair in chain.windows(2) {
            assert_eq!(pair[0].to_version(), pair[1].from_version());
        }
    }

    #[test]
    fn parse_cidr_accepts_networks_and_rejects_garbage() {
        let (addr, len) = parse_cidr("10.0.0.0/24").unwrap();
        assert_eq!(addr.to_string(), "10.0.0.0");
        assert_eq!(len, 24);

        assert!(parse_cidr("10.0.0.0").is_none());
        assert!(parse_cidr("10.0.0.0/33").is_none());
        assert!(parse_cidr("not-an-ip/8").is_none());
    }
}
