use serde_json::json;
use shub_domain::config::{ApiConfig, DatabaseConfig, ServerConfig};
use std::net::{IpAddr, Ipv4Addr};

#[test]
fn defaults_give_a_runnable_local_setup() {
    let server = ServerConfig::default();
    assert_eq!(server.port, 4710);
    assert_eq!(server.address, IpAddr::V4(Ipv4Addr::UNSPECIFIED));
    assert!(server.ssl.is_none());

    let db = DatabaseConfig::default();
    assert_eq!(db.url, "mem://");
    assert_eq!((db.namespace.as_str(), db.database.as_str()), ("shub", "core"));
    assert!(db.credentials.is_some());
}

#[test]
fn socket_addr_combines_address_and_port() {
    let server = ServerConfig { port: 9000, ..ServerConfig::default() };
    assert_eq!(server.socket_addr().to_string(), "0.0.0.0:9000");
}

#[test]
fn partial_files_fall_back_to_defaults() {
    let raw = json!({
        "server": { "address": "::", "port": 8080 },
        "database": { "url": "mem://", "namespace": "n", "database": "d", "credentials": null }
    });

    let cfg: ApiConfig = serde_json::from_value(raw).expect("config deserialize");
    assert_eq!(cfg.server.port, 8080);
    assert_eq!(cfg.database.namespace, "n");
    assert!(cfg.database.credentials.is_none());

    let empty: ApiConfig = serde_json::from_value(json!({})).expect("empty config");
    assert_eq!(empty.server.port, 4710);
}
