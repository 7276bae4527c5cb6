// file: src/azure/records.rs
// version: 1.1.0
// guid: 42128bc9-6601-4d7b-9dc0-adeffad26364

//! Records parsed from `az` JSON output
//!
//! Parsing is tolerant: unknown fields are ignored, and identity fields that
//! are missing, null or not strings become placeholder strings instead of
//! errors.

use crate::select::Selectable;
use serde::Deserialize;
use serde_json::Value;

pub const UNKNOWN_NAME: &str = "UnknownName";
pub const UNKNOWN_RG: &str = "UnknownRG";
pub const UNKNOWN_ID: &str = "UnknownId";

/// One entry of `az vm list`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualMachine {
    pub name: String,
    pub resource_group: String,
}

impl VirtualMachine {
    pub fn new(name: impl Into<String>, resource_group: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resource_group: resource_group.into(),
        }
    }
}

/// One entry of `az account list`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    pub name: String,
    pub id: String,
    /// Currently active subscription
    pub is_default: bool,
}

/// String value of `key`, or `fallback` when it is missing, null or not a string
fn string_field(entry: &Value, key: &str, fallback: &str) -> String {
    entry
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or(fallback)
        .to_string()
}

impl From<&Value> for VirtualMachine {
    fn from(entry: &Value) -> Self {
        Self {
            name: string_field(entry, "name", UNKNOWN_NAME),
            resource_group: string_field(entry, "resourceGroup", UNKNOWN_RG),
        }
    }
}

impl From<&Value> for Subscription {
    fn from(entry: &Value) -> Self {
        Self {
            name: string_field(entry, "name", UNKNOWN_NAME),
            id: string_field(entry, "id", UNKNOWN_ID),
            is_default: entry.get("isDefault").and_then(Value::as_bool).unwrap_or(false),
        }
    }
}

/// Parse `az vm list -o json`
///
/// Only the top level must be an array; each entry is read field by field.
pub fn parse_vm_list(json: &str) -> serde_json::Result<Vec<VirtualMachine>> {
    let entries: Vec<Value> = serde_json::from_str(json)?;
    Ok(entries.iter().map(Into::into).collect())
}

/// Parse `az account list -o json`
pub fn parse_subscription_list(json: &str) -> serde_json::Result<Vec<Subscription>> {
    let entries: Vec<Value> = serde_json::from_str(json)?;
    Ok(entries.iter().map(Into::into).collect())
}

// `az vm list-ip-addresses` nests the addresses several levels deep:
// [{"virtualMachine": {"network": {"publicIpAddresses": [{"ipAddress": ".."}]}}}]

#[derive(Deserialize)]
struct IpAddressEntry {
    #[serde(rename = "virtualMachine")]
    virtual_machine: Option<VmNetworkInfo>,
}

#[derive(Deserialize)]
struct VmNetworkInfo {
    network: Option<NetworkInfo>,
}

#[derive(Deserialize)]
struct NetworkInfo {
    #[serde(rename = "publicIpAddresses")]
    public_ip_addresses: Option<Vec<PublicIpAddress>>,
}

#[derive(Deserialize)]
struct PublicIpAddress {
    #[serde(rename = "ipAddress")]
    ip_address: Option<String>,
}

/// First non-empty public IP in `az vm list-ip-addresses -o json` output
///
/// The error is a short reason suitable for an address resolution message.
pub fn first_public_ip(json: &str) -> std::result::Result<String, String> {
    let entries: Vec<IpAddressEntry> =
        serde_json::from_str(json).map_err(|e| format!("unexpected response shape: {}", e))?;

    entries
        .into_iter()
        .filter_map(|entry| entry.virtual_machine?.network?.public_ip_addresses)
        .flatten()
        .filter_map(|ip| ip.ip_address)
        .map(|ip| ip.trim().to_string())
        .find(|ip| !ip.is_empty())
        .ok_or_else(|| "no public IP address assigned".to_string())
}

impl Selectable for VirtualMachine {
    const TITLE: &'static str = "Available VMs";
    const HEADERS: &'static [&'static str] = &["VM Name", "Resource Group"];

    fn cells(&self) -> Vec<String> {
        vec![self.name.clone(), self.resource_group.clone()]
    }

    fn describe(&self) -> String {
        format!("Selected VM: {} (RG: {})", self.name, self.resource_group)
    }
}

impl Selectable for Subscription {
    const TITLE: &'static str = "Available Subscriptions";
    const HEADERS: &'static [&'static str] = &["Subscription", "Id", "Active"];

    fn cells(&self) -> Vec<String> {
        let active = if self.is_default { "*" } else { "" };
        vec![self.name.clone(), self.id.clone(), active.to_string()]
    }

    fn describe(&self) -> String {
        format!("Selected subscription: {} ({})", self.name, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_vm_list() {
        let json = r#"[
            {"name": "web1", "resourceGroup": "rg1", "location": "westeurope", "tags": {}},
            {"name": "web2", "resourceGroup": "rg2"}
        ]"#;

        let vms = parse_vm_list(json).unwrap();

        assert_eq!(
            vms,
            vec![VirtualMachine::new("web1", "rg1"), VirtualMachine::new("web2", "rg2")]
        );
    }

    #[test]
    fn test_missing_and_null_fields_get_placeholders() {
        let vms = parse_vm_list(r#"[{"resourceGroup": "rg1"}, {"name": "db", "resourceGroup": null}]"#).unwrap();

        assert_eq!(vms[0].name, UNKNOWN_NAME);
        assert_eq!(vms[1].resource_group, UNKNOWN_RG);
    }

    #[test]
    fn test_non_string_fields_get_placeholders() {
        let json = r#"[
            {"name": 42, "resourceGroup": "rg1"},
            {"name": "db", "resourceGroup": {"id": "rg2"}},
            "not an object"
        ]"#;

        let vms = parse_vm_list(json).unwrap();

        assert_eq!(vms[0], VirtualMachine::new(UNKNOWN_NAME, "rg1"));
        assert_eq!(vms[1], VirtualMachine::new("db", UNKNOWN_RG));
        assert_eq!(vms[2], VirtualMachine::new(UNKNOWN_NAME, UNKNOWN_RG));

        let subs = parse_subscription_list(r#"[{"name": "Dev", "id": 7, "isDefault": "yes"}]"#).unwrap();
        assert_eq!(subs[0].id, UNKNOWN_ID);
        assert!(!subs[0].is_default);
    }

    #[test]
    fn test_empty_list_parses() {
        assert!(parse_vm_list("[]").unwrap().is_empty());
        assert!(parse_subscription_list("[]").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(parse_vm_list(r#"[{"name": "web1", "resourceGro"#).is_err());
        assert!(parse_vm_list(r#"{"name": "web1"}"#).is_err());
    }

    #[test]
    fn test_parse_subscription_list() {
        let json = r#"[
            {"name": "Dev", "id": "1111", "isDefault": false, "state": "Enabled"},
            {"name": "Prod", "id": "2222", "isDefault": true},
            {"id": "3333"}
        ]"#;

        let subs = parse_subscription_list(json).unwrap();

        assert_eq!(subs.len(), 3);
        assert!(subs[1].is_default);
        assert_eq!(subs[2].name, UNKNOWN_NAME);
        assert!(!subs[2].is_default);
        assert_eq!(subs[1].cells(), vec!["Prod", "2222", "*"]);
    }

    #[test]
    fn test_first_public_ip() {
        let json = r#"[{
            "virtualMachine": {
                "name": "web1",
                "network": {
                    "privateIpAddresses": ["10.0.0.4"],
                    "publicIpAddresses": [
                        {"ipAddress": "", "name": "stale"},
                        {"ipAddress": "20.1.2.3", "name": "web1-ip"}
                    ]
                }
            }
        }]"#;

        assert_eq!(first_public_ip(json).unwrap(), "20.1.2.3");
    }

    #[test]
    fn test_first_public_ip_missing() {
        let private_only = r#"[{"virtualMachine": {"network": {"privateIpAddresses": ["10.0.0.4"], "publicIpAddresses": []}}}]"#;
        assert_eq!(first_public_ip(private_only).unwrap_err(), "no public IP address assigned");

        assert!(first_public_ip("[]").is_err());
        assert!(first_public_ip(r#"[{"virtualMachine": null}]"#).is_err());
    }

    #[test]
    fn test_first_public_ip_shape_mismatch() {
        let err = first_public_ip(r#"{"virtualMachine": {}}"#).unwrap_err();
        assert!(err.starts_with("unexpected response shape"));
    }
}
