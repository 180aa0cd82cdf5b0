//! Demonstrates the session-bootstrap wiring a host performs at attach time,
//! driven against the scriptable in-memory host.
//!
//! A real integration implements the `session::Session` / `session::Registrar`
//! traits over its debugger's API and runs exactly this sequence when the
//! extension is loaded.

use periscope_core::commands::CommandSet;
use periscope_core::formatters::FormatterRegistry;
use periscope_core::mock::{MockRegistrar, MockSession, MockValue};
use periscope_core::session::Session;
use periscope_core::types::TargetProfile;

fn main()
{
    periscope_utils::init_logging().expect("Failed to initialize logging");

    // A stopped "process": the current frame belongs to a typechecking
    // routine, the global state lives two frames out.
    let session = MockSession::new();
    session.push_frame("processExpression", vec![]);
    session.push_frame("typecheckOne", vec![]);
    session.push_frame(
        "runTypechecking",
        vec![("gs", "core::GlobalState", MockValue::direct("core::GlobalState", "gs"))],
    );
    session.set_evaluation(
        "(send).showRaw(gs)",
        Ok(MockValue::direct("std::string", "").with_display("Send { fun = build, args = 2 }")),
    );
    session.set_evaluation("send", Ok(MockValue::direct("cfg::Send", "send").with_method("showRaw", 1)));

    // Attach-time wiring: formatter table plus interactive commands.
    let profile = TargetProfile::default();
    let mut host = MockRegistrar::new();
    let mut registry = FormatterRegistry::new(profile.clone());
    registry.attach(&mut host).expect("attach formatter registry");
    CommandSet::new(profile).register(&mut host).expect("register commands");

    // The host displays a matching value: the registered formatter fires.
    let value = MockValue::direct("cfg::Send", "send").with_method("showRaw", 1);
    let summary = host.summarize("cfg::Send", &session, &value).expect("formatter registered");
    println!("summary   : {summary}");

    // The user runs a command.
    let printed = host.run_command("render", &session, "send").expect("command registered");
    println!("render    : {printed}");

    let frame = session.current_frame().expect("current frame");
    println!("frame     : {}", frame.function_name().unwrap_or_default());
    println!("evaluated : {:?}", session.evaluated());
}
