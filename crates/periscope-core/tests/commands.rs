//! Tests for interactive command handlers

use periscope_core::commands::{CommandSet, render_command, state_command};
use periscope_core::mock::{MockRegistrar, MockSession, MockValue};
use periscope_core::types::{Address, TargetProfile};

fn scripted_session() -> MockSession
{
    let session = MockSession::new();
    session.push_frame(
        "typecheckOne",
        vec![("gs", "core::GlobalState", MockValue::direct("core::GlobalState", "gs"))],
    );
    session
}

#[test]
fn test_render_command_round_trip()
{
    let session = scripted_session();
    session.set_evaluation(
        "bb->exprs[0]",
        Ok(MockValue::direct("cfg::Send", "bb->exprs[0]").with_method("showRaw", 1)),
    );
    session.set_evaluation(
        "(bb->exprs[0]).showRaw(gs)",
        Ok(MockValue::direct("std::string", "").with_display("Send { fun = map }")),
    );

    let profile = TargetProfile::default();
    assert_eq!(render_command(&session, "bb->exprs[0]", &profile), "Send { fun = map }");
}

#[test]
fn test_render_command_without_arguments_prints_usage()
{
    let session = scripted_session();
    let profile = TargetProfile::default();
    assert_eq!(render_command(&session, "  ", &profile), "usage: render <expression>");
}

#[test]
fn test_render_command_degrades_to_error_text()
{
    let session = scripted_session();
    let profile = TargetProfile::default();
    let output = render_command(&session, "no_such_var", &profile);
    assert!(output.starts_with("error:"), "got {output}");
}

#[test]
fn test_state_command_renders_the_resolved_state()
{
    let session = scripted_session();
    let buffer = Address::new(0x1000);
    session.set_evaluation("(gs).toCString()", Ok(MockValue::integer("const char *", "", 0x1000)));
    session.set_memory(buffer, b"GlobalState{files=12}\0".to_vec());

    let profile = TargetProfile::default();
    assert_eq!(state_command(&session, "", &profile), "GlobalState{files=12}");
}

#[test]
fn test_state_command_without_a_state_in_scope()
{
    let session = MockSession::new();
    session.push_frame("main", vec![]);
    let profile = TargetProfile::default();
    let output = state_command(&session, "", &profile);
    assert!(output.starts_with("error:"), "got {output}");
}

#[test]
fn test_command_set_registers_both_commands()
{
    let set = CommandSet::new(TargetProfile::default());
    let mut host = MockRegistrar::new();
    set.register(&mut host).unwrap();
    assert_eq!(host.command_names(), vec!["render".to_string(), "state".to_string()]);

    let session = scripted_session();
    let output = host.run_command("render", &session, "").expect("registered");
    assert_eq!(output, "usage: render <expression>");
}
