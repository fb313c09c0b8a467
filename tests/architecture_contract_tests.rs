//! Architecture contract tests.

mod support;

use support::architecture::{
    find_lines_containing, find_non_export_lines_in_mod_files, path_exists, read_relative,
};

#[test]
fn domain_has_no_framework_or_outer_layer_imports() {
    let hits = find_lines_containing(
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
fn ports_depend_only_on_domain() {
    let hits = find_lines_containing(
        "src/port",
        &[
            "crate::adapter",
            "crate::infrastructure",
            "crate::application",
            "reqwest::",
        ],
    );

    assert!(hits.is_empty(), "ports must only depend on domain: {hits:#?}");
}

#[test]
fn application_layer_has_no_direct_adapter_imports() {
    let hits = find_lines_containing(
        "src/application",
        &["crate::adapter::", "crate::infrastructure::", "reqwest::"],
    );
    assert!(
        hits.is_empty(),
        "application layer should not import adapters directly: {hits:#?}"
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
fn engine_only_reads_through_ports() {
    let source = read_relative("src/application/engine.rs");
    for port in [
        "Arc<dyn OrderSource>",
        "Arc<dyn MarketDataSource>",
        "Arc<dyn StructureSnapshotStore>",
        "Arc<dyn SalesHistory>",
        "Arc<dyn CostLedger>",
        "Arc<dyn NameResolver>",
    ] {
        assert!(source.contains(port), "engine ports should hold `{port}`");
    }
}

#[test]
fn live_market_adapter_is_isolated() {
    assert!(
        path_exists("src/adapter/outbound/esi/client.rs"),
        "ESI client should live under adapter/outbound/esi"
    );

    let hits = find_lines_containing("src", &["reqwest::"])
        .into_iter()
        .filter(|hit| {
            !hit.file.starts_with("src/adapter/outbound/esi/") && hit.file != "src/error.rs"
        })
        .collect::<Vec<_>>();
    assert!(
        hits.is_empty(),
        "HTTP access should stay inside the ESI adapter: {hits:#?}"
    );
}
