use mguard_cfg::{
    from_str, AccessModifier, Document, Error, MergeConfiguration, Setting, Value, Version,
};

const VERSION_LINE: &str = "#version 8.1.0.default\n";

#[test]
fn round_trips_a_lone_version_pragma() {
    let doc = from_str(VERSION_LINE).unwrap();
    assert_eq!(doc.to_string(), VERSION_LINE);
}

#[test]
fn set_simple_changes_only_the_value() {
    let input = "#version 8.1.0.default\n\nNAME = \"a\"\n";
    let mut doc = from_str(input).unwrap();

    doc.set_simple("NAME", "b").unwrap();

    assert_eq!(doc.to_string(), input.replace("\"a\"", "\"b\""));
}

#[test]
fn attribute_promotion_and_demotion() {
    let mut doc = from_str("#version 8.1.0.default\n\nX = \"v\"\n").unwrap();

    doc.set_attribute("X", "uuid", "U1").unwrap();
    assert_eq!(
        doc.to_string(),
        "#version 8.1.0.default\n\nX = {\n  uuid = \"U1\"\n  value = \"v\"\n}\n"
    );

    doc.remove_attribute("X", "uuid").unwrap();
    assert_eq!(doc.to_string(), "#version 8.1.0.default\n\nX = \"v\"\n");
}

#[test]
fn table_merge_keyed_by_row_id() {
    let source = from_str(concat!(
        "#version 8.1.0.default\n",
        "T = {\n",
        "  {\n    { rid = \"A\" }\n    V = \"a\"\n  }\n",
        "  {\n    { rid = \"B\" }\n    V = \"b\"\n  }\n",
        "}\n",
    ))
    .unwrap();
    let other = from_str(concat!(
        "#version 8.1.0.default\n",
        "T = {\n",
        "  {\n    { rid = \"B\" }\n    V = \"b2\"\n  }\n",
        "  {\n    { rid = \"C\" }\n    V = \"c\"\n  }\n",
        "}\n",
    ))
    .unwrap();

    let merged = source.merge(&other).unwrap();
    let table = merged
        .get_setting("T")
        .unwrap()
        .unwrap()
        .value
        .as_table()
        .unwrap();

    let ids: Vec<_> = table.rows.iter().map(|r| r.id.as_deref().unwrap()).collect();
    assert_eq!(ids, vec!["A", "B", "C"]);
    assert_eq!(
        table.rows[1].get("V").unwrap().value.as_simple(),
        Some("b2")
    );
    assert_eq!(table.rows[0].get("V").unwrap().value.as_simple(), Some("a"));
}

#[test]
fn selective_merge_filters_top_level_settings() {
    let source = from_str("#version 8.1.0.default\n\nA = \"1\"\nB = \"2\"\n").unwrap();
    let other = from_str("#version 8.1.0.default\n\nA = \"9\"\nB = \"8\"\n").unwrap();

    let config = MergeConfiguration::from_reader("A\n".as_bytes()).unwrap();
    let merged = source.merge_selective(&other, &config).unwrap();

    assert_eq!(
        merged.get_setting("A").unwrap().unwrap().value.as_simple(),
        Some("9")
    );
    assert_eq!(
        merged.get_setting("B").unwrap().unwrap().value.as_simple(),
        Some("2")
    );
}

#[test]
fn migration_chain_reaches_8_1_0_with_the_rework_applied() {
    let doc = from_str(concat!(
        "#version 7.5.0.default\n",
        "\n",
        "VPN_CONNECTION = {\n",
        "  {\n",
        "    { rid = \"conn-1\" }\n",
        "    VPN_ENABLED = \"yes\"\n",
        "    TUNNEL = {\n",
        "      {\n",
        "        LOCAL = \"10.0.0.0/24\"\n",
        "        LOCAL_1TO1NAT = \"192.168.1.0\"\n",
        "      }\n",
        "    }\n",
        "  }\n",
        "}\n",
    ))
    .unwrap();

    let migrated = doc.migrate(&Version::new(8, 1, 0, "default")).unwrap();
    assert_eq!(migrated.version().unwrap(), Version::new(8, 1, 0, "default"));

    // the VPN rework ran on the way
    assert!(migrated
        .get_setting("VPN_CONNECTION.0.VPN_ENABLED")
        .unwrap()
        .is_none());
    assert_eq!(
        migrated
            .get_setting("VPN_CONNECTION.0.VPN_START")
            .unwrap()
            .unwrap()
            .value
            .as_simple(),
        Some("started")
    );
    assert!(migrated
        .get_setting("VPN_CONNECTION.0.TUNNEL.0.LOCAL_N_TO_N_NAT")
        .unwrap()
        .unwrap()
        .value
        .is_table());
}

#[test]
fn merge_with_empty_document_is_the_identity() {
    let doc = from_str("#version 8.1.0.default\n\nA = \"1\"\n").unwrap();
    let empty = from_str(VERSION_LINE).unwrap();

    let merged = doc.merge(&empty).unwrap();
    assert_eq!(merged.to_string(), doc.to_string());
}

#[test]
fn merge_is_idempotent() {
    let doc = from_str(concat!(
        "#version 8.1.0.default\n",
        "A = \"1\"\n",
        "T = {\n  {\n    { rid = \"R\" }\n    V = \"x\"\n  }\n}\n",
    ))
    .unwrap();
    let other = from_str(concat!(
        "#version 8.1.0.default\n",
        "A = \"2\"\n",
        "T = {\n  {\n    { rid = \"R\" }\n    V = \"y\"\n  }\n}\n",
    ))
    .unwrap();

    let once = doc.merge(&other).unwrap();
    let twice = once.merge(&other).unwrap();
    assert_eq!(once.to_string(), twice.to_string());
}

#[test]
fn cross_variant_merge_conflicts_fail() {
    let scalar = from_str("#version 8.1.0.default\n\nX = \"1\"\n").unwrap();
    let table = from_str("#version 8.1.0.default\n\nX = {\n  {\n    V = \"1\"\n  }\n}\n").unwrap();

    assert!(matches!(
        scalar.merge(&table),
        Err(Error::TypeMismatch { .. })
    ));
    assert!(matches!(
        table.merge(&scalar),
        Err(Error::TypeMismatch { .. })
    ));
}

#[test]
fn path_engine_creates_and_finds_the_same_node() {
    let mut doc = from_str(VERSION_LINE).unwrap();

    doc.create_placeholder("T.1.INNER.0.LEAF").unwrap();
    let leaf = doc.get_setting("T.1.INNER.0.LEAF").unwrap().unwrap();
    assert_eq!(leaf.value.as_simple(), Some(""));

    // rows 0 and 1 exist, row 0 is empty
    let table = doc
        .get_setting("T")
        .unwrap()
        .unwrap()
        .value
        .as_table()
        .unwrap();
    assert_eq!(table.rows.len(), 2);
    assert!(table.rows[0].settings.is_empty());
}

#[test]
fn removing_missing_settings_is_a_no_op() {
    let mut doc = from_str("#version 8.1.0.default\n\nA = \"1\"\n").unwrap();
    let before = doc.to_string();

    doc.remove_setting("B").unwrap();
    doc.remove_setting("A.0.X").unwrap_err(); // A is not a table
    assert_eq!(doc.to_string(), before);
}

#[test]
fn uuid_and_access_helpers() {
    let mut doc = from_str(concat!(
        "#version 8.1.0.default\n",
        "\n",
        "S = \"v\"\n",
        "T = {\n  {\n    V = \"x\"\n  }\n}\n",
    ))
    .unwrap();

    doc.set_uuid("S", "S-UUID").unwrap();
    doc.set_uuid("T", "T-UUID").unwrap();
    assert_eq!(doc.get_uuid("S").unwrap().as_deref(), Some("S-UUID"));
    assert_eq!(doc.get_uuid("T").unwrap().as_deref(), Some("T-UUID"));

    // the table keeps its rows; the uuid lands in the attribute block
    let table = doc.get_setting("T").unwrap().unwrap().value.as_table().unwrap();
    assert_eq!(table.attributes.get("uuid"), Some("T-UUID"));
    assert_eq!(table.rows.len(), 1);

    doc.set_access("S", AccessModifier::MustNotOverwrite).unwrap();
    assert_eq!(
        doc.get_access("S").unwrap(),
        Some(AccessModifier::MustNotOverwrite)
    );
    doc.remove_access("S").unwrap();
    assert_eq!(doc.get_access("S").unwrap(), None);

    assert!(doc.set_uuid("MISSING", "X").is_err());
}

#[test]
fn quoting_survives_a_round_trip() {
    let mut doc = from_str(VERSION_LINE).unwrap();
    doc.set_setting(Setting::simple("Q", "say \"hi\" \\ and a \\n"));

    let text = doc.to_string();
    let reparsed = from_str(&text).unwrap();
    assert_eq!(
        reparsed.get_setting("Q").unwrap().unwrap().value.as_simple(),
        Some("say \"hi\" \\ and a \\n")
    );
    assert_eq!(reparsed.to_string(), text);
}

#[test]
fn pragma_updates_and_insertions() {
    let mut doc = from_str("#version 8.1.0.default\n\nA = \"1\"\n").unwrap();

    doc.set_pragma("version", "8.3.0.default");
    assert_eq!(doc.get_pragma("version"), Some("8.3.0.default"));

    doc.set_pragma("comment", "lab device");
    assert_eq!(
        doc.to_string(),
        "#version 8.3.0.default\n#comment lab device\n\nA = \"1\"\n"
    );
}

#[test]
fn value_with_metadata_exposes_its_payload() {
    let doc = from_str(concat!(
        "#version 8.1.0.default\n",
        "X = {\n  uuid = \"U\"\n  value = \"payload\"\n}\n",
    ))
    .unwrap();

    let setting = doc.get_setting("X").unwrap().unwrap();
    assert!(setting.value.is_with_metadata());
    assert_eq!(setting.value_text().unwrap(), "payload");
}

#[test]
fn table_variant_mismatch_is_reported_with_the_path() {
    let doc = from_str("#version 8.1.0.default\n\nX = \"1\"\n").unwrap();
    match doc.get_setting("X.0.Y") {
        Err(Error::TypeMismatch { path, .. }) => assert_eq!(path, "X.0.Y"),
        other => panic!("expected a type mismatch, got {other:?}"),
    }
}

#[test]
fn merge_appends_unknown_tables_and_settings() {
    let source = from_str(VERSION_LINE).unwrap();
    let other = from_str(concat!(
        "#version 8.1.0.default\n",
        "A = \"1\"\n",
        "T = {\n  {\n    { rid = \"R\" }\n    V = \"x\"\n  }\n}\n",
    ))
    .unwrap();

    let merged = source.merge(&other).unwrap();
    assert!(merged.get_setting("A").unwrap().is_some());
    assert!(merged.get_setting("T.0.V").unwrap().is_some());
}

#[test]
fn merge_configuration_from_value_setting() {
    // settings carrying metadata are scalar for merge purposes
    let source = from_str("#version 8.1.0.default\n\nX = \"old\"\n").unwrap();
    let other = from_str(concat!(
        "#version 8.1.0.default\n",
        "X = {\n  uuid = \"U\"\n  value = \"new\"\n}\n",
    ))
    .unwrap();

    let merged = source.merge(&other).unwrap();
    let setting = merged.get_setting("X").unwrap().unwrap();
    assert!(setting.value.is_with_metadata());
    assert_eq!(setting.value_text().unwrap(), "new");
}

#[test]
fn documents_expose_row_ids_and_references() {
    let doc = from_str(concat!(
        "#version 8.1.0.default\n",
        "SWITCH = {\n  rowref = \"conn-1\"\n  value = \"on\"\n}\n",
        "VPN_CONNECTION = {\n",
        "  {\n    { rid = \"conn-1\" }\n  }\n",
        "  {\n    { rid = \"conn-2\" }\n  }\n",
        "}\n",
    ))
    .unwrap();

    assert_eq!(doc.row_ids(), vec!["conn-1", "conn-2"]);
    assert_eq!(doc.row_refs(), vec!["conn-1"]);
}

#[test]
fn crlf_input_is_canonicalized() {
    let doc = from_str("#version 8.1.0.default\r\n\r\nA = \"1\"\r\n").unwrap();
    assert_eq!(doc.to_string(), "#version 8.1.0.default\n\nA = \"1\"\n");
}

#[test]
fn missing_trailing_newline_is_tolerated() {
    let doc = from_str("#version 8.1.0.default\n\nA = \"1\"").unwrap();
    assert_eq!(doc.to_string(), "#version 8.1.0.default\n\nA = \"1\"\n");
}

#[test]
fn documents_survive_the_file_helpers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.atv");

    let doc = from_str("#version 8.1.0.default\n\nA = \"1\"\n").unwrap();
    doc.to_file(&path).unwrap();

    let reloaded = Document::from_file(&path).unwrap();
    assert_eq!(reloaded.to_string(), doc.to_string());
}

#[test]
fn set_setting_replaces_any_variant() {
    let mut doc = from_str(concat!(
        "#version 8.1.0.default\n",
        "T = {\n  {\n    V = \"x\"\n  }\n}\n",
    ))
    .unwrap();

    doc.set_setting(Setting::new("T", Value::Simple("flat".to_string())));
    assert_eq!(
        doc.get_setting("T").unwrap().unwrap().value.as_simple(),
        Some("flat")
    );
}
