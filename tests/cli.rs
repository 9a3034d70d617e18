use assert_cmd::prelude::*;
use predicates::str::contains;
use std::process::Command;

#[test]
fn headless_prints_defaults_and_orbit_start() {
    let mut cmd = Command::cargo_bin("wavescape").expect("binary exists");
    cmd.arg("--headless");
    cmd.assert()
        .success()
        .stdout(contains("wavelength"))
        .stdout(contains("0.38"))
        .stdout(contains("(5, 2.5)"))
        .stdout(contains("0.75"))
        .stdout(contains("#2d81ae"))
        .stdout(contains("#66c1f9"))
        .stdout(contains("(0.00, 0.23, 3.00)"))
        .stdout(contains("(1.00, 0.00, 0.00)"))
        .stdout(contains("elevation over"));
}

#[test]
fn headless_accepts_custom_subdivisions() {
    let mut cmd = Command::cargo_bin("wavescape").expect("binary exists");
    cmd.arg("--headless").arg("--subdivisions").arg("16");
    cmd.assert()
        .success()
        .stdout(contains("16x16 samples"));
}

#[test]
fn out_of_range_subdivisions_warn_and_clamp() {
    let mut cmd = Command::cargo_bin("wavescape").expect("binary exists");
    cmd.arg("--headless").arg("--subdivisions").arg("100000");
    cmd.assert()
        .success()
        .stderr(contains("out of range"));
}
