use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path)
}

fn path_as_str(path: &Path) -> &str {
    path.to_str().expect("path should be valid utf-8")
}

fn upnp_conf() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("upnp-conf"))
}

#[test]
fn verify_passes_for_basic_fixture() {
    upnp_conf()
        .arg("verify")
        .arg(fixture("fixtures/upnp-basic.xml"))
        .arg("--interfaces")
        .arg(fixture("fixtures/interfaces.toml"))
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "result ok upnp=enabled outbound=eth0 listen=eth1,eth2",
        ));
}

#[test]
fn verify_accepts_absent_subtree() {
    upnp_conf()
        .arg("verify")
        .arg(fixture("fixtures/upnp-absent.xml"))
        .arg("--interfaces")
        .arg(fixture("fixtures/interfaces.toml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("result ok upnp=absent"));
}

#[test]
fn verify_rejects_missing_outbound_interface() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("config.xml");
    fs::write(&input, r#"<config><service><upnp/></service></config>"#).expect("write");

    upnp_conf()
        .arg("verify")
        .arg(path_as_str(&input))
        .arg("--interfaces")
        .arg(fixture("fixtures/interfaces.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Must define the outbound-interface!"));
}

#[test]
fn verify_rejects_unknown_outbound_interface() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("config.xml");
    fs::write(
        &input,
        r#"<config><service><upnp>
            <outbound-interface>pppoe0</outbound-interface>
            <listen-on>eth1</listen-on>
        </upnp></service></config>"#,
    )
    .expect("write");

    upnp_conf()
        .arg("verify")
        .arg(path_as_str(&input))
        .arg("--interfaces")
        .arg(fixture("fixtures/interfaces.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "outbound-interface \"pppoe0\" does not exist",
        ));
}

#[test]
fn verify_reports_listen_interface_without_address() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("config.xml");
    fs::write(
        &input,
        r#"<config><service><upnp>
            <outbound-interface>eth0</outbound-interface>
            <listen-on>eth3</listen-on>
        </upnp></service></config>"#,
    )
    .expect("write");

    upnp_conf()
        .arg("verify")
        .arg(path_as_str(&input))
        .arg("--interfaces")
        .arg(fixture("fixtures/interfaces.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("\"eth3\" has no IPv4 address"));
}

#[test]
fn verify_reports_bad_interface_table() {
    let dir = tempdir().expect("tempdir");
    let table = dir.path().join("interfaces.toml");
    fs::write(&table, "[[interface]]\naddress = \"10.0.0.1\"\n").expect("write");

    upnp_conf()
        .arg("verify")
        .arg(fixture("fixtures/upnp-basic.xml"))
        .arg("--interfaces")
        .arg(path_as_str(&table))
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid interface table"));
}
