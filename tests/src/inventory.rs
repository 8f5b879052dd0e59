use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use portinspector_common::config::{Credentials, SwitchConfig};
use portinspector_common::network::device::ReportRow;
use portinspector_common::session::scripted::ScriptedConnector;
use portinspector_common::utils::retry::{Backoff, RetryPolicy};
use portinspector_core::commands;
use portinspector_core::inventory::PortInventory;

const ACCESS: &str = "10.0.0.2";
const CORE: &str = "10.0.0.1";

const INTERFACE_STATUS: &str = "\
Gi1/0/7    printer            connected    20         a-full a-100 10/100/1000BaseTX
Gi1/0/48   uplink             connected    trunk      a-full a-1000 10/100/1000BaseTX
";
const MAC_TABLE: &str = "\
          Mac Address Table
-------------------------------------------

Vlan    Mac Address       Type        Ports
----    -----------       --------    -----
  20    0011.2233.4455    DYNAMIC     Gi1/0/7
Total Mac Addresses for this criterion: 1
";
const LLDP_DETAIL: &str = "\
------------------------------------------------
Local Intf: Gi1/0/7
Chassis id: 0011.2233.4455
Port id: 0011.2233.4455
Port Description: eth0
System Name: printer-3f

Management Addresses:
    IP: 10.20.30.40

Total entries displayed: 1
";
const DESCRIPTION: &str = "\
Interface                      Status         Protocol Description
Gi1/0/7                        up             up       printer 3rd floor
";

fn switch(core: Option<&str>) -> SwitchConfig {
    SwitchConfig {
        access_switch: ACCESS.to_string(),
        core_switch: core.map(str::to_string),
        excluded_ports: vec!["Gi1/0/48".to_string()],
    }
}

fn credentials() -> Credentials {
    Credentials::new("cisco_ios", "netops").with_secrets("pw".to_string(), "secret".to_string())
}

fn no_wait(max_attempts: u32) -> RetryPolicy {
    RetryPolicy::default()
        .with_max_attempts(max_attempts)
        .with_backoff(Backoff::Fixed(Duration::ZERO))
}

fn access_switch() -> ScriptedConnector {
    ScriptedConnector::new()
        .with_prompt(ACCESS, "access-sw-01#")
        .reply(ACCESS, commands::CONNECTED_PORTS, INTERFACE_STATUS)
        .reply(ACCESS, &commands::mac_table("Gi1/0/7"), MAC_TABLE)
        .reply(ACCESS, &commands::lldp_detail("Gi1/0/7"), LLDP_DETAIL)
        .reply(ACCESS, &commands::description("Gi1/0/7"), DESCRIPTION)
}

#[tokio::test]
async fn one_neighbor_behind_one_port() {
    let connector = access_switch();
    let inventory = PortInventory::new(Arc::new(connector.clone()), switch(None)).with_retry(no_wait(3));

    let records = inventory.collect(&credentials()).await.unwrap();

    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.port(), "Gi1/0/7");
    assert_eq!(record.vlans.as_deref(), Some("20"));
    assert_eq!(record.system_name.as_deref(), Some("printer-3f"));
    assert_eq!(record.ip_address, Some(Ipv4Addr::new(10, 20, 30, 40)));
    assert_eq!(record.mac_address.as_deref(), Some("0011.2233.4455"));
    assert_eq!(record.port_description.as_deref(), Some("printer 3rd floor"));

    assert_eq!(connector.count(ACCESS, &commands::mac_table("Gi1/0/48")), 0);
    assert_eq!(connector.count(ACCESS, &commands::cdp_detail("Gi1/0/7")), 0);
    assert_eq!(connector.closed(ACCESS), 1);
}

#[tokio::test]
async fn hostname_then_report_rows() {
    let inventory = PortInventory::new(Arc::new(access_switch()), switch(None)).with_retry(no_wait(3));

    let hostname = inventory.fetch_hostname(&credentials()).await.unwrap();
    let records = inventory.collect(&credentials()).await.unwrap();
    let rows: Vec<ReportRow> = records.iter().map(ReportRow::from).collect();

    assert_eq!(hostname, "access-sw-01");
    assert_eq!(
        rows[0].cells(),
        [
            "20",
            "Gi1/0/7",
            "printer-3f",
            "10.20.30.40",
            "0011.2233.4455",
            "printer 3rd floor"
        ]
    );
}

#[tokio::test]
async fn quiet_port_still_gets_a_row() {
    let connector = ScriptedConnector::new()
        .reply(ACCESS, commands::CONNECTED_PORTS, INTERFACE_STATUS)
        .reply(ACCESS, &commands::mac_table("Gi1/0/7"), "");
    let inventory = PortInventory::new(Arc::new(connector.clone()), switch(None)).with_retry(no_wait(4));

    let records = inventory.collect(&credentials()).await.unwrap();
    let rows: Vec<ReportRow> = records.iter().map(ReportRow::from).collect();

    assert_eq!(connector.count(ACCESS, &commands::mac_table("Gi1/0/7")), 4);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].cells(), ["-", "Gi1/0/7", "-", "-", "-", "-"]);
}

#[tokio::test]
async fn cdp_fallback_after_arp_lookup() {
    let connector = ScriptedConnector::new()
        .reply(ACCESS, commands::CONNECTED_PORTS, INTERFACE_STATUS)
        .reply(ACCESS, &commands::mac_table("Gi1/0/7"), MAC_TABLE)
        .reply(ACCESS, &commands::lldp_detail("Gi1/0/7"), "\nTotal entries displayed: 0\n")
        .reply(
            ACCESS,
            &commands::cdp_detail("Gi1/0/7"),
            "Device ID: printer-3f\nEntry address(es):\n  IP address: 10.20.30.41\n",
        )
        .reply(
            CORE,
            &commands::arp("0011.2233.4455"),
            "Internet  10.20.30.40   12   0011.2233.4455  ARPA   Vlan20\n",
        );
    let inventory =
        PortInventory::new(Arc::new(connector.clone()), switch(Some(CORE))).with_retry(no_wait(1));

    let records = inventory.collect(&credentials()).await.unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].system_name.as_deref(), Some("printer-3f"));
    assert_eq!(records[0].ip_address, Some(Ipv4Addr::new(10, 20, 30, 41)));
    assert_eq!(records[0].mac_address.as_deref(), Some("0011.2233.4455"));
    assert_eq!(connector.opened(CORE), 1);
    assert_eq!(connector.closed(CORE), 1);
}

#[tokio::test]
async fn timed_out_port_does_not_leak_into_the_next() {
    let connector = ScriptedConnector::new()
        .reply(
            ACCESS,
            commands::CONNECTED_PORTS,
            "Gi1/0/7    printer   connected    20\nGi1/0/8    desk      connected    20\n",
        )
        .time_out(ACCESS, &commands::mac_table("Gi1/0/7"))
        .reply(ACCESS, &commands::mac_table("Gi1/0/8"), MAC_TABLE);
    let inventory = PortInventory::new(Arc::new(connector.clone()), switch(None)).with_retry(no_wait(3));

    let records = inventory.collect(&credentials()).await.unwrap();

    let ports: Vec<&str> = records.iter().map(|r| r.port()).collect();
    assert_eq!(ports, vec!["Gi1/0/7", "Gi1/0/8"]);
    assert!(records.iter().all(|r| r.mac_address.is_none()));
    assert_eq!(connector.count(ACCESS, &commands::mac_table("Gi1/0/7")), 1);
    assert_eq!(connector.count(ACCESS, &commands::mac_table("Gi1/0/8")), 0);
    assert_eq!(connector.closed(ACCESS), 1);
}
