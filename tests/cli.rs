use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::io::Write;

fn source_file(text: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".tsx").tempfile().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file
}

#[test]
fn demo_is_transformed_by_default() {
    let mut cmd = cargo_bin_cmd!("tsx-refresh");
    cmd.arg("--no-color").arg("--run-id").arg("42");

    let output_pred = predicate::str::contains("\"use strict\";")
        .and(predicate::str::contains("__s(MyComponent, \"42:MyComponent\", true);"))
        .and(predicate::str::contains("React.createElement(Container, null"))
        .and(predicate::str::contains("\x1b[").not());

    cmd.assert().success().stdout(output_pred);
}

#[test]
fn colored_output_contains_escape_sequences() {
    let mut cmd = cargo_bin_cmd!("tsx-refresh");
    cmd.arg("--run-id").arg("1");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\x1b["));
}

#[test]
fn esm_output_keeps_imports() {
    let file = source_file("import { a } from './a';\nexport const b = a;\n");
    let mut cmd = cargo_bin_cmd!("tsx-refresh");
    cmd.arg(file.path())
        .arg("--no-color")
        .arg("--module")
        .arg("esmodule");

    cmd.assert().success().stdout(
        predicate::str::contains("import { a } from './a';")
            .and(predicate::str::contains("export const b = a;")),
    );
}

#[test]
fn stdin_is_read_with_dash() {
    let mut cmd = cargo_bin_cmd!("tsx-refresh");
    cmd.arg("-")
        .arg("--no-color")
        .arg("--pass")
        .arg("identity")
        .write_stdin("let x: number = 1;\n");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("let x = 1;"));
}

#[test]
fn inline_helpers_flag_inlines_definitions() {
    let file = source_file("import React from 'react';\n");
    let mut cmd = cargo_bin_cmd!("tsx-refresh");
    cmd.arg(file.path()).arg("--no-color").arg("--inline-helpers");

    cmd.assert().success().stdout(
        predicate::str::contains("function _interop_require_default(obj)")
            .and(predicate::str::contains("@swc/helpers").not()),
    );
}

#[test]
fn config_file_is_layered() {
    let mut config = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(config, "[module]\ntype = \"esmodule\"\n\n[transform]\njsx = \"preserve\"").unwrap();
    let file = source_file("export const el = <b>hi</b>;\n");

    let mut cmd = cargo_bin_cmd!("tsx-refresh");
    cmd.arg(file.path())
        .arg("--no-color")
        .arg("--config")
        .arg(config.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("export const el = <b>hi</b>;"));
}

#[test]
fn parse_errors_exit_non_zero() {
    let file = source_file("const = ;\n");
    let mut cmd = cargo_bin_cmd!("tsx-refresh");
    cmd.arg(file.path());

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("parse error at 1:"));
}

#[test]
fn unknown_module_format_is_a_config_error() {
    let mut cmd = cargo_bin_cmd!("tsx-refresh");
    cmd.arg("--module").arg("amd");

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("unknown module type 'amd'"));
}

#[test]
fn unknown_pass_is_a_config_error() {
    let mut cmd = cargo_bin_cmd!("tsx-refresh");
    cmd.arg("--pass").arg("minify");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("pass 'minify' is not registered"));
}

#[test]
fn react_refresh_refuses_production_without_override() {
    let mut config = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(config, "[[passes]]\nname = \"react-refresh\"").unwrap();

    let mut cmd = cargo_bin_cmd!("tsx-refresh");
    cmd.arg("--config")
        .arg(config.path())
        .arg("--env")
        .arg("production");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("skipEnvCheck"));
}

#[test]
fn list_passes_shows_builtins() {
    let mut cmd = cargo_bin_cmd!("tsx-refresh");
    cmd.arg("--list-passes");

    cmd.assert().success().stdout(
        predicate::str::contains("identity").and(predicate::str::contains("react-refresh")),
    );
}
