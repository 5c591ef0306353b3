use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::{tempdir, TempDir};

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path)
}

fn path_as_str(path: &Path) -> &str {
    path.to_str().expect("path should be valid utf-8")
}

/// A stand-in service manager that appends its arguments to `calls.log`.
fn fake_systemctl(dir: &TempDir, exit_code: i32) -> (PathBuf, PathBuf) {
    let log = dir.path().join("calls.log");
    let script = dir.path().join("systemctl");
    fs::write(
        &script,
        format!(
            "#!/bin/sh\necho \"$@\" >> '{}'\nexit {exit_code}\n",
            log.display()
        ),
    )
    .expect("write script");
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).expect("chmod");
    (script, log)
}

fn apply_cmd(config: &Path, output: &Path, systemctl: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("upnp-conf"));
    cmd.arg("apply")
        .arg(path_as_str(config))
        .arg("--interfaces")
        .arg(fixture("fixtures/interfaces.toml"))
        .arg("--output")
        .arg(path_as_str(output))
        .arg("--systemctl")
        .arg(path_as_str(systemctl));
    cmd
}

#[test]
fn apply_renders_and_restarts_silently() {
    let dir = tempdir().expect("tempdir");
    let (systemctl, log) = fake_systemctl(&dir, 0);
    let output = dir.path().join("miniupnpd.conf");

    apply_cmd(&fixture("fixtures/upnp-basic.xml"), &output, &systemctl)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let written = fs::read_to_string(&output).expect("rendered");
    assert!(written.contains("ext_ifname=eth0\n"));
    assert!(written.contains("listening_ip=192.168.1.0/24\nlistening_ip=10.20.0.0/16\n"));
    assert_eq!(
        fs::read_to_string(&log).expect("log"),
        "restart miniupnpd.service\n"
    );
}

#[test]
fn apply_absent_stops_and_removes_file() {
    let dir = tempdir().expect("tempdir");
    let (systemctl, log) = fake_systemctl(&dir, 0);
    let output = dir.path().join("miniupnpd.conf");
    fs::write(&output, "ext_ifname=eth0\n").expect("stale file");

    for _ in 0..2 {
        apply_cmd(&fixture("fixtures/upnp-absent.xml"), &output, &systemctl)
            .assert()
            .success();
        assert!(!output.exists());
    }

    assert_eq!(
        fs::read_to_string(&log).expect("log"),
        "stop miniupnpd.service\nstop miniupnpd.service\n"
    );
}

#[test]
fn apply_fails_on_unknown_listen_interface() {
    let dir = tempdir().expect("tempdir");
    let (systemctl, log) = fake_systemctl(&dir, 0);
    let output = dir.path().join("miniupnpd.conf");
    let config = dir.path().join("config.xml");
    fs::write(
        &config,
        r#"<config><service><upnp>
            <outbound-interface>eth0</outbound-interface>
            <listen-on>eth9</listen-on>
        </upnp></service></config>"#,
    )
    .expect("write");

    apply_cmd(&config, &output, &systemctl)
        .assert()
        .failure()
        .stderr(predicate::str::contains("eth9"));

    assert!(!output.exists());
    assert!(!log.exists());
}

#[test]
fn apply_uses_custom_unit_name() {
    let dir = tempdir().expect("tempdir");
    let (systemctl, log) = fake_systemctl(&dir, 0);
    let output = dir.path().join("miniupnpd.conf");

    apply_cmd(&fixture("fixtures/upnp-basic.xml"), &output, &systemctl)
        .arg("--unit")
        .arg("upnpd.service")
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(&log).expect("log"),
        "restart upnpd.service\n"
    );
}

#[test]
fn apply_reports_service_manager_failure() {
    let dir = tempdir().expect("tempdir");
    let (systemctl, _) = fake_systemctl(&dir, 5);
    let output = dir.path().join("miniupnpd.conf");

    apply_cmd(&fixture("fixtures/upnp-basic.xml"), &output, &systemctl)
        .assert()
        .failure()
        .stderr(predicate::str::contains("restart miniupnpd.service failed"));
}

#[test]
fn apply_reports_unparseable_config() {
    let dir = tempdir().expect("tempdir");
    let (systemctl, log) = fake_systemctl(&dir, 0);
    let output = dir.path().join("miniupnpd.conf");
    let config = dir.path().join("broken.xml");
    fs::write(&config, "<config><service>").expect("write");

    apply_cmd(&config, &output, &systemctl)
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse"));
    assert!(!log.exists());
}
