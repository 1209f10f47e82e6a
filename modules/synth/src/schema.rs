//! Field mappings from run settings into each client dialect.

use crate::select::Endpoint;
use crate::template::set_at;
use cfsub_core::{CoreType, Result, Settings};
use serde_json::{json, Value};

/// Where a client dialect keeps the fields cfsub fills in.
pub trait ClientSchema {
    fn core_type(&self) -> CoreType;

    /// Pointer/value pairs shared by every config generated in one run.
    fn profile_fields(&self, settings: &Settings, identity: &str) -> Vec<(&'static str, Value)>;

    fn address_pointer(&self) -> &'static str;

    /// Remote port; also where a cutter port is written.
    fn port_pointer(&self) -> &'static str;
}

pub struct Xray;

impl ClientSchema for Xray {
    fn core_type(&self) -> CoreType { CoreType::Xray }

    fn profile_fields(&self, settings: &Settings, identity: &str) -> Vec<(&'static str, Value)> {
        vec![
            ("/inbounds/0/port", json!(settings.socks_port)),
            ("/inbounds/1/port", json!(settings.http_port)),
            ("/outbounds/0/settings/vnext/0/port", json!(settings.port)),
            ("/outbounds/0/streamSettings/tlsSettings/serverName", json!(settings.host)),
            ("/outbounds/0/streamSettings/tlsSettings/fingerprint", json!(settings.fingerprint.as_str())),
            ("/outbounds/0/streamSettings/wsSettings/headers/Host", json!(settings.host)),
            ("/outbounds/0/settings/vnext/0/users/0/id", json!(identity)),
        ]
    }

    fn address_pointer(&self) -> &'static str { "/outbounds/0/settings/vnext/0/address" }

    fn port_pointer(&self) -> &'static str { "/outbounds/0/settings/vnext/0/port" }
}

/// sing-box configs always carry the `android` uTLS fingerprint; `--fingerprint` only
/// reaches xray configs.
pub const SING_BOX_FINGERPRINT: &str = "android";

pub struct SingBox;

impl ClientSchema for SingBox {
    fn core_type(&self) -> CoreType { CoreType::SingBox }

    fn profile_fields(&self, settings: &Settings, identity: &str) -> Vec<(&'static str, Value)> {
        vec![
            ("/inbounds/0/listen_port", json!(settings.socks_port)),
            ("/inbounds/1/listen_port", json!(settings.http_port)),
            ("/outbounds/0/server_port", json!(settings.port)),
            ("/outbounds/0/tls/server_name", json!(settings.host)),
            ("/outbounds/0/tls/utls/fingerprint", json!(SING_BOX_FINGERPRINT)),
            ("/outbounds/0/transport/headers/Host", json!(settings.host)),
            ("/outbounds/0/uuid", json!(identity)),
        ]
    }

    fn address_pointer(&self) -> &'static str { "/outbounds/0/server" }

    fn port_pointer(&self) -> &'static str { "/outbounds/0/server_port" }
}

pub fn schema_for(core: CoreType) -> &'static dyn ClientSchema {
    match core {
        CoreType::Xray => &Xray,
        CoreType::SingBox => &SingBox,
    }
}

/// Copy of `template` with the run-wide fields applied.
pub fn apply_profile(template: &Value, schema: &dyn ClientSchema, settings: &Settings, identity: &str) -> Result<Value> {
    let mut doc = template.clone();
    for (pointer, value) in schema.profile_fields(settings, identity) {
        set_at(&mut doc, pointer, value)?;
    }
    Ok(doc)
}

/// Copy of `base` pointed at one endpoint.
pub fn apply_endpoint(base: &Value, schema: &dyn ClientSchema, endpoint: &Endpoint) -> Result<Value> {
    let mut doc = base.clone();
    set_at(&mut doc, schema.address_pointer(), json!(endpoint.address))?;
    if let Some(port) = endpoint.port {
        set_at(&mut doc, schema.port_pointer(), json!(port))?;
    }
    Ok(doc)
}
