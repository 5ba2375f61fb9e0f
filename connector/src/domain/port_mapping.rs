//! Translation of Docker-style exposed ports into OpenShift port objects.
//!
//! Pure functions only — no I/O, no async.

use std::collections::{BTreeMap, BTreeSet};

use anyhow::Result;
use connector_common::{ContainerPort, IntOrString, ServicePort, default_port_names};

use crate::domain::error::ConnectorError;

/// `"<port>/<protocol>"` → per-port options (ignored by the translation).
pub type ExposedPorts = BTreeMap<String, BTreeMap<String, String>>;

const PROTOCOL_DELIMITER: char = '/';

/// Table of well-known port numbers and the names their ports get.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortNames(BTreeMap<u16, String>);

impl PortNames {
    #[must_use]
    pub fn new(names: BTreeMap<u16, String>) -> Self {
        Self(names)
    }

    /// Table name for `port`, or the raw `spec` key when the port is unknown.
    #[must_use]
    pub fn name_for(&self, port: u16, spec: &str) -> String {
        self.0
            .get(&port)
            .filter(|name| !name.is_empty())
            .map_or_else(|| spec.to_string(), Clone::clone)
    }
}

impl Default for PortNames {
    fn default() -> Self {
        Self(default_port_names())
    }
}

/// A parsed `"<port>/<protocol>"` key. `protocol` keeps the caller's casing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortSpec {
    pub port: u16,
    pub protocol: String,
}

/// Parse an exposed-port key.
///
/// # Errors
///
/// Returns `MalformedPortSpec` if the key has no protocol segment, the port is
/// not an integer in `0..=65535`, or the protocol is neither tcp nor udp.
pub fn parse_port_spec(spec: &str) -> Result<PortSpec> {
    let malformed = |reason: &str| ConnectorError::MalformedPortSpec {
        spec: spec.to_string(),
        reason: reason.to_string(),
    };

    let (port, protocol) = spec
        .split_once(PROTOCOL_DELIMITER)
        .ok_or_else(|| malformed("missing '/<protocol>' segment"))?;
    let port: u16 = port
        .parse()
        .map_err(|_| malformed("port is not an integer between 0 and 65535"))?;
    if protocol.is_empty() {
        return Err(malformed("protocol is empty").into());
    }
    if !protocol.eq_ignore_ascii_case("tcp") && !protocol.eq_ignore_ascii_case("udp") {
        return Err(malformed("protocol must be tcp or udp").into());
    }
    Ok(PortSpec {
        port,
        protocol: protocol.to_string(),
    })
}

/// Build the Service ports for `exposed`, in key order.
///
/// Port and target port are the same number; the protocol is kept as written.
///
/// # Errors
///
/// Returns `MalformedPortSpec` for the first invalid key.
pub fn to_service_ports(exposed: &ExposedPorts, names: &PortNames) -> Result<Vec<ServicePort>> {
    exposed
        .keys()
        .map(|spec| -> Result<ServicePort> {
            let parsed = parse_port_spec(spec)?;
            Ok(ServicePort {
                name: names.name_for(parsed.port, spec),
                protocol: parsed.protocol,
                port: parsed.port,
                target_port: IntOrString::Int(i32::from(parsed.port)),
                node_port: None,
            })
        })
        .collect()
}

/// Build the container ports for `exposed`, protocol upper-cased.
///
/// # Errors
///
/// Returns `MalformedPortSpec` for the first invalid key.
pub fn to_container_ports(
    exposed: &ExposedPorts,
    names: &PortNames,
) -> Result<BTreeSet<ContainerPort>> {
    exposed
        .keys()
        .map(|spec| -> Result<ContainerPort> {
            let parsed = parse_port_spec(spec)?;
            Ok(ContainerPort {
                name: names.name_for(parsed.port, spec),
                protocol: parsed.protocol.to_ascii_uppercase(),
                container_port: parsed.port,
            })
        })
        .collect()
}
