//! Architecture contract tests.

mod support;

use support::architecture::{
    find_code_lines_containing, find_non_export_lines_in_mod_files, read_relative,
};

#[test]
fn domain_has_no_framework_or_outer_layer_imports() {
    let hits = find_code_lines_containing(
        "src/domain",
        &[
            "crate::adapter",
            "crate::infrastructure",
            "crate::application",
            "crate::port",
            "tokio::",
            "reqwest::",
        ],
    );

    assert!(
        hits.is_empty(),
        "found forbidden imports in domain layer: {hits:#?}"
    );
}

#[test]
fn application_reaches_the_exchange_only_through_ports() {
    let hits = find_code_lines_containing(
        "src/application",
        &[
            "crate::adapter",
            "crate::infrastructure",
            "reqwest::",
            "tokio::time",
            "owo_colors",
            "indicatif",
        ],
    );

    assert!(
        hits.is_empty(),
        "found adapter or transport imports in application layer: {hits:#?}"
    );
}

#[test]
fn ports_depend_only_on_domain() {
    let hits = find_code_lines_containing(
        "src/port",
        &["crate::adapter", "crate::infrastructure", "crate::application"],
    );

    assert!(
        hits.is_empty(),
        "found outer layer imports in ports: {hits:#?}"
    );
}

#[test]
fn mod_rs_is_export_only() {
    let violations = find_non_export_lines_in_mod_files("src");
    assert!(
        violations.is_empty(),
        "found non-export content in mod.rs files: {violations:#?}"
    );
}

#[test]
fn order_submissions_bypass_the_retry_path() {
    let source = read_relative("src/adapter/outbound/binance/client.rs");
    let Some(start) = source.find("async fn submit_immediate(") else {
        panic!("binance client should implement submit_immediate");
    };
    let Some(end) = source[start..].find("fn exchange_name(") else {
        panic!("binance client should implement exchange_name");
    };

    assert!(
        !source[start..start + end].contains("get_with_retry"),
        "order submission and cancel must not go through the retrying GET path"
    );
}
