#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::structures::ServiceModuleName;

#[test]
fn test_import_string_from_dotted() {
    let s = ImportString::from_dotted("botocore.client");
    assert_eq!(s.parts(), &["botocore".to_string(), "client".to_string()]);
    assert_eq!(s.parent(), "botocore");
    assert_eq!(s.to_string(), "botocore.client");
}

#[test]
fn test_import_string_drops_empty_segments() {
    assert_eq!(
        ImportString::from_dotted("a..b."),
        ImportString::from_dotted("a.b")
    );
    assert!(ImportString::from_dotted("").is_empty());
}

#[test]
fn test_import_string_builtins() {
    assert!(ImportString::from_dotted(BUILTINS).is_builtins());
    assert!(!ImportString::from_dotted("typing").is_builtins());
}

#[test]
fn test_record_identity_ignores_fallback() {
    let plain = ImportRecord::named("typing", "Literal");
    let gated = ImportRecord::named("typing", "Literal")
        .with_fallback((3, 8), ImportRecord::named("typing_extensions", "Literal"));
    assert_eq!(plain, gated);

    let mut set = ImportSet::new();
    set.insert(plain);
    set.insert(gated);
    assert_eq!(set.len(), 1);
    // last write wins
    assert!(set.iter().next().unwrap().needs_version_check());
}

#[test]
fn test_record_ordering_module_then_symbol() {
    let mut records = vec![
        ImportRecord::named("typing", "List"),
        ImportRecord::module("sys"),
        ImportRecord::named("typing", "Dict"),
        ImportRecord::named("botocore.client", "BaseClient"),
        ImportRecord::module("typing"),
    ];
    records.sort();
    let rendered: Vec<String> = records.iter().map(ImportRecord::render).collect();
    assert_eq!(
        rendered,
        vec![
            "from botocore.client import BaseClient",
            "import sys",
            "import typing",
            "from typing import Dict",
            "from typing import List",
        ]
    );
}

#[test]
fn test_render_with_alias() {
    let record = ImportRecord::named("botocore.client", "BaseClient").with_alias("Base");
    assert_eq!(
        record.render(),
        "from botocore.client import BaseClient as Base"
    );
}

#[test]
fn test_render_version_gated_block() {
    let record = ImportRecord::named("typing", "TypedDict")
        .with_fallback((3, 8), ImportRecord::named("typing_extensions", "TypedDict"));
    assert_eq!(
        record.render(),
        "if sys.version_info >= (3, 8):\n    from typing import TypedDict\nelse:\n    from typing_extensions import TypedDict"
    );
}

#[test]
fn test_external_form_rewrites_internal_records() {
    let record = ImportRecord::internal(ServiceModuleName::TypeDefs, "BucketTypeDef");
    assert!(record.is_internal());
    assert!(record.is_type_defs());
    assert_eq!(record.render(), "from .type_defs import BucketTypeDef");

    let external = external_form(&record, "stubs_s3");
    assert!(!external.is_internal());
    assert!(!external.is_type_defs());
    assert_eq!(
        external.render(),
        "from stubs_s3.type_defs import BucketTypeDef"
    );
}

#[test]
fn test_external_form_keeps_third_party_records() {
    let record = ImportRecord::named("botocore.paginate", "Paginator");
    assert_eq!(external_form(&record, "stubs_s3").render(), record.render());
}

#[test]
fn test_add_required_adds_version_check_for_fallback() {
    let literal = ImportRecord::named("typing", "Literal")
        .with_fallback((3, 8), ImportRecord::named("typing_extensions", "Literal"));
    let mut set = ImportSet::new();
    set.add_required(&literal, "stubs_s3");

    assert!(set.contains(&ImportRecord::module(VERSION_CHECK_MODULE)));
    assert!(set.contains(&ImportRecord::named("typing", "Literal")));
    // the fallback is rendered inline, never imported on its own
    assert!(!set.contains(&ImportRecord::named("typing_extensions", "Literal")));
    assert_eq!(set.len(), 2);
}

#[test]
fn test_add_required_skips_builtins() {
    let mut set = ImportSet::new();
    set.add_required(&ImportRecord::named(BUILTINS, "str"), "stubs_s3");
    assert!(set.is_empty());
}

#[test]
fn test_add_child_type_skips_type_defs() {
    let mut set = ImportSet::new();
    set.add_child_type(
        &ImportRecord::internal(ServiceModuleName::TypeDefs, "BucketTypeDef"),
        "stubs_s3",
    );
    set.add_child_type(&ImportRecord::named("datetime", "datetime"), "stubs_s3");
    let rendered: Vec<String> = set.iter().map(ImportRecord::render).collect();
    assert_eq!(rendered, vec!["from datetime import datetime"]);
}

#[test]
fn test_import_set_sorted_regardless_of_insert_order() {
    let records = vec![
        ImportRecord::named("typing", "Union"),
        ImportRecord::named("datetime", "datetime"),
        ImportRecord::named("typing", "Any"),
    ];
    let forward: ImportSet = records.iter().cloned().collect();
    let backward: ImportSet = records.iter().rev().cloned().collect();
    assert_eq!(forward.into_sorted_vec(), backward.into_sorted_vec());
}
