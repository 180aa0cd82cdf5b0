//! Tests for summary formatters and the registry lifecycle

use periscope_core::error::PeriscopeError;
use periscope_core::formatters::{
    FormatterRegistry, STATE_SUMMARY_CAP, summarize_identifier, summarize_name, summarize_state, summarize_variant,
};
use periscope_core::mock::{MockRegistrar, MockSession, MockValue};
use periscope_core::names::{WELL_KNOWN_BOUND, WELL_KNOWN_NAMES};
use periscope_core::types::{Address, TargetProfile};

fn session_with_state() -> MockSession
{
    let session = MockSession::new();
    session.push_frame(
        "typecheckOne",
        vec![("gs", "core::GlobalState", MockValue::direct("core::GlobalState", "gs"))],
    );
    session
}

#[test]
fn test_identifier_zero_is_default()
{
    let session = session_with_state();
    let profile = TargetProfile::default();
    let value = MockValue::integer("core::NameRef", "nm", 0);
    assert_eq!(summarize_identifier(&session, &value, &profile), "Default ID");
}

#[test]
fn test_identifier_negative_is_default()
{
    let session = session_with_state();
    let profile = TargetProfile::default();
    let value = MockValue::integer("core::NameRef", "nm", -3);
    assert_eq!(summarize_identifier(&session, &value, &profile), "Default ID");
}

#[test]
fn test_identifier_last_reserved_id_uses_the_table()
{
    let session = session_with_state();
    let profile = TargetProfile::default();
    let id = WELL_KNOWN_BOUND - 1;
    let value = MockValue::integer("core::NameRef", "nm", id);
    #[allow(clippy::cast_sign_loss)]
    let expected = WELL_KNOWN_NAMES[id as usize];
    assert_eq!(summarize_identifier(&session, &value, &profile), expected);
    // Table decode never touches the evaluator.
    assert!(session.evaluated().is_empty());
}

#[test]
fn test_identifier_at_bound_goes_dynamic()
{
    // The boundary is exact: id == BOUND is already a runtime-minted name.
    let session = session_with_state();
    session.set_evaluation(
        "(nm).showRaw(gs)",
        Ok(MockValue::direct("std::string", "").with_display("<U interned>")),
    );
    let profile = TargetProfile::default();
    let value = MockValue::integer("core::NameRef", "nm", WELL_KNOWN_BOUND).with_method("showRaw", 1);
    assert_eq!(summarize_identifier(&session, &value, &profile), "<U interned>");
    assert_eq!(session.evaluated(), vec!["(nm).showRaw(gs)".to_string()]);
}

#[test]
fn test_identifier_dynamic_failure_degrades()
{
    // Nothing scripted for the render expression, so evaluation fails.
    let session = session_with_state();
    let profile = TargetProfile::default();
    let id = WELL_KNOWN_BOUND + 17;
    let value = MockValue::integer("core::NameRef", "nm", id).with_method("showRaw", 1);
    assert_eq!(summarize_identifier(&session, &value, &profile), format!("Dynamic ID {id}"));
}

#[test]
fn test_identifier_unreadable_id_is_marked()
{
    let session = session_with_state();
    let profile = TargetProfile::default();
    let value = MockValue::direct("core::NameRef", "nm"); // no integer payload
    let text = summarize_identifier(&session, &value, &profile);
    assert!(text.starts_with("<error:"), "got {text}");
}

#[test]
fn test_name_utf8_tag_shows_nested_summary()
{
    let profile = TargetProfile::default();
    let value = MockValue::direct("core::Name", "name")
        .with_field("kind", MockValue::integer("core::NameKind", "name.kind", 1))
        .with_field("utf8", MockValue::direct("std::string_view", "name.utf8").with_summary("\"foo=\""));
    assert_eq!(summarize_name(&value, &profile), "\"foo=\"");
}

#[test]
fn test_name_other_tags_report_the_kind()
{
    let profile = TargetProfile::default();
    let value = MockValue::direct("core::Name", "name")
        .with_field("kind", MockValue::integer("core::NameKind", "name.kind", 3));
    assert_eq!(summarize_name(&value, &profile), "Name kind=3");
}

#[test]
fn test_state_summary_reads_the_rendered_string()
{
    let session = session_with_state();
    let buffer = Address::new(0x1000);
    session.set_evaluation(
        "(gs).toCString()",
        Ok(MockValue::integer("const char *", "", 0x1000)),
    );
    session.set_memory(buffer, b"GlobalState{files=3}\0".to_vec());

    let profile = TargetProfile::default();
    let value = MockValue::direct("core::GlobalState", "gs");
    assert_eq!(summarize_state(&session, &value, &profile), "GlobalState{files=3}");
}

#[test]
fn test_state_summary_dereferences_pointers()
{
    let session = session_with_state();
    let buffer = Address::new(0x2000);
    session.set_evaluation(
        "(*gs_ptr).toCString()",
        Ok(MockValue::integer("const char *", "", 0x2000)),
    );
    session.set_memory(buffer, b"GlobalState{files=0}\0".to_vec());

    let profile = TargetProfile::default();
    let pointee = MockValue::direct("core::GlobalState", "*gs_ptr");
    let value = MockValue::pointer("core::GlobalState *", "gs_ptr", pointee);
    assert_eq!(summarize_state(&session, &value, &profile), "GlobalState{files=0}");
}

#[test]
fn test_state_summary_marks_truncation_exactly_at_the_cap()
{
    let session = session_with_state();
    let buffer = Address::new(0x3000);
    session.set_evaluation(
        "(gs).toCString()",
        Ok(MockValue::integer("const char *", "", 0x3000)),
    );
    // An unterminated run longer than the cap: the read fills the cap.
    session.set_memory(buffer, vec![b'G'; STATE_SUMMARY_CAP + 64]);

    let profile = TargetProfile::default();
    let value = MockValue::direct("core::GlobalState", "gs");
    let text = summarize_state(&session, &value, &profile);
    assert!(text.ends_with("<truncated>"), "got {} bytes", text.len());
    assert_eq!(text.len(), STATE_SUMMARY_CAP + "<truncated>".len());
}

#[test]
fn test_state_summary_short_read_is_not_truncated()
{
    let session = session_with_state();
    let buffer = Address::new(0x4000);
    session.set_evaluation(
        "(gs).toCString()",
        Ok(MockValue::integer("const char *", "", 0x4000)),
    );
    // The readable region ends before the cap and carries no terminator.
    session.set_memory(buffer, vec![b'G'; 16]);

    let profile = TargetProfile::default();
    let value = MockValue::direct("core::GlobalState", "gs");
    assert_eq!(summarize_state(&session, &value, &profile), "G".repeat(16));
}

#[test]
fn test_state_summary_surfaces_read_failures()
{
    let session = session_with_state();
    session.set_evaluation(
        "(gs).toCString()",
        Ok(MockValue::integer("const char *", "", 0x5000)),
    );
    // No memory scripted at 0x5000.

    let profile = TargetProfile::default();
    let value = MockValue::direct("core::GlobalState", "gs");
    let text = summarize_state(&session, &value, &profile);
    assert!(text.starts_with("<error:"), "got {text}");
    assert!(text.contains("unreadable address"), "got {text}");
}

#[test]
fn test_variant_formatter_delegates_to_the_renderer()
{
    let session = session_with_state();
    session.set_evaluation(
        "(send).showRaw(gs)",
        Ok(MockValue::direct("std::string", "").with_display("Send { fun = each }")),
    );

    let profile = TargetProfile::default();
    let value = MockValue::direct("cfg::Send", "send").with_method("showRaw", 1);
    assert_eq!(summarize_variant(&session, &value, &profile), "Send { fun = each }");
}

#[test]
fn test_variant_formatter_falls_back_to_the_raw_value()
{
    let session = session_with_state();
    let profile = TargetProfile::default();
    // No rendering method: degrade to the handle's raw primitive value.
    let value = MockValue::direct("cfg::Send", "send").with_display("0x0000000104a0c2d0");
    assert_eq!(summarize_variant(&session, &value, &profile), "0x0000000104a0c2d0");
}

#[test]
fn test_variant_formatter_reports_errors_without_a_raw_value()
{
    let session = session_with_state();
    let profile = TargetProfile::default();
    let value = MockValue::direct("cfg::Send", "send");
    let text = summarize_variant(&session, &value, &profile);
    assert!(text.starts_with("<error:"), "got {text}");
    assert!(text.contains("cfg::Send"), "got {text}");
}

#[test]
fn test_registry_attach_installs_the_fixed_table()
{
    let mut registry = FormatterRegistry::new(TargetProfile::default());
    let mut host = MockRegistrar::new();
    registry.attach(&mut host).unwrap();

    assert!(registry.is_attached());
    let expected = 3 + registry.profile().variant_types.len();
    assert_eq!(host.summary_count(), expected);
    for pattern in registry.patterns() {
        assert!(host.has_summary(&pattern), "missing registration for {pattern}");
    }
}

#[test]
fn test_registry_attach_is_write_once()
{
    let mut registry = FormatterRegistry::new(TargetProfile::default());
    let mut host = MockRegistrar::new();
    registry.attach(&mut host).unwrap();

    let err = registry.attach(&mut host).unwrap_err();
    assert!(matches!(err, PeriscopeError::AlreadyAttached));
}

#[test]
fn test_registry_detach_then_attach()
{
    let mut registry = FormatterRegistry::new(TargetProfile::default());
    let mut host = MockRegistrar::new();
    registry.attach(&mut host).unwrap();
    registry.detach(&mut host).unwrap();

    assert!(!registry.is_attached());
    assert_eq!(host.summary_count(), 0);
    registry.attach(&mut host).unwrap();
    assert!(registry.is_attached());
}

#[test]
fn test_registered_formatter_fires_like_the_host_would()
{
    let mut registry = FormatterRegistry::new(TargetProfile::default());
    let mut host = MockRegistrar::new();
    registry.attach(&mut host).unwrap();

    let session = session_with_state();
    let value = MockValue::integer("core::NameRef", "nm", 0);
    let text = host.summarize("core::NameRef", &session, &value).expect("registered");
    assert_eq!(text, "Default ID");
}
