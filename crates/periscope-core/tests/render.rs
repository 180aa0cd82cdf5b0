//! Tests for dynamic stringification

use periscope_core::error::PeriscopeError;
use periscope_core::mock::{MockSession, MockValue};
use periscope_core::render::Renderer;
use periscope_core::session::Session;
use periscope_core::types::TargetProfile;

/// A value whose runtime type declares the rendering method.
fn renderable(path: &str, arity: usize) -> MockValue
{
    MockValue::direct("cfg::Send", path).with_method("showRaw", arity)
}

#[test]
fn test_end_to_end_arity_one()
{
    // State context resolves in the grandparent frame, method arity is 1:
    // the render call returns the evaluator's result text unmodified.
    let session = MockSession::new();
    session.push_frame("processBinding", vec![]);
    session.push_frame("typecheckOne", vec![]);
    session.push_frame(
        "runTypechecking",
        vec![("gs", "core::GlobalState", MockValue::direct("core::GlobalState", "gs"))],
    );
    session.set_evaluation(
        "(send).showRaw(gs)",
        Ok(MockValue::direct("std::string", "").with_display("Send { fun = build }")),
    );

    let profile = TargetProfile::default();
    let frame = session.current_frame().unwrap();
    let value = renderable("send", 1);

    let text = Renderer::new(&session, &profile).render(frame.as_ref(), &value).unwrap();
    assert_eq!(text, "Send { fun = build }");
    assert_eq!(session.evaluated(), vec!["(send).showRaw(gs)".to_string()]);
}

#[test]
fn test_arity_one_never_resolves_a_graph()
{
    // No CFG instance anywhere in the chain; arity 1 must not care.
    let session = MockSession::new();
    session.push_frame(
        "typecheckOne",
        vec![("gs", "core::GlobalState", MockValue::direct("core::GlobalState", "gs"))],
    );
    session.set_evaluation(
        "(ident).showRaw(gs)",
        Ok(MockValue::direct("std::string", "").with_display("Ident { x }")),
    );

    let profile = TargetProfile::default();
    let frame = session.current_frame().unwrap();
    let value = MockValue::direct("cfg::Ident", "ident").with_method("showRaw", 1);

    let text = Renderer::new(&session, &profile).render(frame.as_ref(), &value).unwrap();
    assert_eq!(text, "Ident { x }");
}

#[test]
fn test_arity_two_requires_a_graph_context()
{
    let session = MockSession::new();
    session.push_frame(
        "typecheckOne",
        vec![("gs", "core::GlobalState", MockValue::direct("core::GlobalState", "gs"))],
    );

    let profile = TargetProfile::default();
    let frame = session.current_frame().unwrap();
    let value = renderable("send", 2);

    let err = Renderer::new(&session, &profile).render(frame.as_ref(), &value).unwrap_err();
    match err {
        PeriscopeError::MissingContext(what) => assert_eq!(what, "no CFG instance"),
        other => panic!("expected MissingContext, got {other}"),
    }
}

#[test]
fn test_arity_two_passes_both_arguments()
{
    let session = MockSession::new();
    session.push_frame(
        "buildBlock",
        vec![
            ("gs", "core::GlobalState", MockValue::direct("core::GlobalState", "gs")),
            ("cfg", "cfg::CFG", MockValue::direct("cfg::CFG", "cfg")),
        ],
    );
    session.set_evaluation(
        "(send).showRaw(gs, cfg)",
        Ok(MockValue::direct("std::string", "").with_display("Send { recv = <self> }")),
    );

    let profile = TargetProfile::default();
    let frame = session.current_frame().unwrap();
    let value = renderable("send", 2);

    let text = Renderer::new(&session, &profile).render(frame.as_ref(), &value).unwrap();
    assert_eq!(text, "Send { recv = <self> }");
    assert_eq!(session.evaluated(), vec!["(send).showRaw(gs, cfg)".to_string()]);
}

#[test]
fn test_missing_state_context()
{
    let session = MockSession::new();
    session.push_frame("main", vec![("argc", "int", MockValue::integer("int", "argc", 1))]);

    let profile = TargetProfile::default();
    let frame = session.current_frame().unwrap();
    let value = renderable("send", 1);

    let err = Renderer::new(&session, &profile).render(frame.as_ref(), &value).unwrap_err();
    match err {
        PeriscopeError::MissingContext(what) => assert_eq!(what, "no state instance"),
        other => panic!("expected MissingContext, got {other}"),
    }
}

#[test]
fn test_no_render_method_names_the_type()
{
    let session = MockSession::new();
    session.push_frame(
        "typecheckOne",
        vec![("gs", "core::GlobalState", MockValue::direct("core::GlobalState", "gs"))],
    );

    let profile = TargetProfile::default();
    let frame = session.current_frame().unwrap();
    let value = MockValue::direct("core::FileRef", "file");

    let err = Renderer::new(&session, &profile).render(frame.as_ref(), &value).unwrap_err();
    assert!(matches!(err, PeriscopeError::NoRenderMethod { .. }));
    assert!(err.to_string().contains("core::FileRef"));
}

#[test]
fn test_pointer_handle_is_dereferenced_before_rendering()
{
    let session = MockSession::new();
    session.push_frame(
        "typecheckOne",
        vec![("gs", "core::GlobalState", MockValue::direct("core::GlobalState", "gs"))],
    );
    session.set_evaluation(
        "(*send_ptr).showRaw(gs)",
        Ok(MockValue::direct("std::string", "").with_display("Send { }")),
    );

    let profile = TargetProfile::default();
    let frame = session.current_frame().unwrap();
    let pointee = renderable("*send_ptr", 1);
    let value = MockValue::pointer("cfg::Send *", "send_ptr", pointee);

    let text = Renderer::new(&session, &profile).render(frame.as_ref(), &value).unwrap();
    assert_eq!(text, "Send { }");
}

#[test]
fn test_rendering_a_pointer_twice_is_idempotent()
{
    let session = MockSession::new();
    session.push_frame(
        "typecheckOne",
        vec![("gs", "core::GlobalState", MockValue::direct("core::GlobalState", "gs"))],
    );
    session.set_evaluation(
        "(*send_ptr).showRaw(gs)",
        Ok(MockValue::direct("std::string", "").with_display("Send { }")),
    );

    let profile = TargetProfile::default();
    let frame = session.current_frame().unwrap();
    let value = MockValue::pointer("cfg::Send *", "send_ptr", renderable("*send_ptr", 1));

    let renderer = Renderer::new(&session, &profile);
    renderer.render(frame.as_ref(), &value).unwrap();
    renderer.render(frame.as_ref(), &value).unwrap();
    let evaluated = session.evaluated();
    assert_eq!(evaluated.len(), 2);
    assert_eq!(evaluated[0], evaluated[1]);
}

#[test]
fn test_context_wrapper_state_gets_member_suffix()
{
    let session = MockSession::new();
    session.push_frame(
        "typecheckOne",
        vec![("ctx", "core::Context", MockValue::direct("core::Context", "ctx"))],
    );
    session.set_evaluation(
        "(send).showRaw(ctx.state)",
        Ok(MockValue::direct("std::string", "").with_display("Send { }")),
    );

    let profile = TargetProfile::default();
    let frame = session.current_frame().unwrap();
    let value = renderable("send", 1);

    let text = Renderer::new(&session, &profile).render(frame.as_ref(), &value).unwrap();
    assert_eq!(text, "Send { }");
    assert_eq!(session.evaluated(), vec!["(send).showRaw(ctx.state)".to_string()]);
}

#[test]
fn test_smart_pointer_state_is_normalized()
{
    let session = MockSession::new();
    session.push_frame(
        "realmain",
        vec![(
            "gs_owner",
            "std::unique_ptr<core::GlobalState>",
            MockValue::direct("std::unique_ptr<core::GlobalState>", "gs_owner"),
        )],
    );
    session.set_evaluation(
        "(send).showRaw((*(gs_owner)))",
        Ok(MockValue::direct("std::string", "").with_display("Send { }")),
    );

    let profile = TargetProfile::default();
    let frame = session.current_frame().unwrap();
    let value = renderable("send", 1);

    let text = Renderer::new(&session, &profile).render(frame.as_ref(), &value).unwrap();
    assert_eq!(text, "Send { }");
}

#[test]
fn test_invalid_evaluation_result_fails()
{
    let session = MockSession::new();
    session.push_frame(
        "typecheckOne",
        vec![("gs", "core::GlobalState", MockValue::direct("core::GlobalState", "gs"))],
    );
    session.set_evaluation("(send).showRaw(gs)", Ok(MockValue::invalid("std::string")));

    let profile = TargetProfile::default();
    let frame = session.current_frame().unwrap();
    let value = renderable("send", 1);

    let err = Renderer::new(&session, &profile).render(frame.as_ref(), &value).unwrap_err();
    assert!(matches!(err, PeriscopeError::EvaluationFailed(_)));
}

#[test]
fn test_empty_evaluation_result_fails()
{
    let session = MockSession::new();
    session.push_frame(
        "typecheckOne",
        vec![("gs", "core::GlobalState", MockValue::direct("core::GlobalState", "gs"))],
    );
    session.set_evaluation("(send).showRaw(gs)", Ok(MockValue::direct("std::string", "").with_display("")));

    let profile = TargetProfile::default();
    let frame = session.current_frame().unwrap();
    let value = renderable("send", 1);

    let err = Renderer::new(&session, &profile).render(frame.as_ref(), &value).unwrap_err();
    assert!(matches!(err, PeriscopeError::EvaluationFailed(_)));
}
