use std::sync::{Arc, Once};

use counter_core::{
    update, ControllerState, CounterPosition, Effect, FieldCounterConfig, FormId, Msg,
    ReadTiming, SurfaceId, SurfaceKind, ThresholdLevel,
};
use counter_engine::validate_submission;
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(counter_logging::initialize_for_tests);
}

fn attach(
    state: ControllerState,
    surface: &str,
    kind: SurfaceKind,
    config: &Arc<FieldCounterConfig>,
    content: &str,
) -> (ControllerState, Vec<Effect>) {
    update(
        state,
        Msg::Attach {
            surface_id: SurfaceId::from(surface),
            form_id: FormId::from("node-form"),
            kind,
            config: config.clone(),
            content: Some(content.to_string()),
        },
    )
}

/// Delivers a change notification and, as the host would, the resulting read.
fn edit(state: ControllerState, surface: &str, content: &str) -> (ControllerState, Vec<Effect>) {
    let surface_id = SurfaceId::from(surface);
    let (state, effects) = update(
        state,
        Msg::ContentChanged {
            surface_id: surface_id.clone(),
        },
    );
    let binding = match effects.as_slice() {
        [Effect::ReadContent { binding, .. }] => *binding,
        other => panic!("expected a single read, got {other:?}"),
    };
    update(
        state,
        Msg::ContentRead {
            surface_id,
            binding,
            content: Some(content.to_string()),
        },
    )
}

fn threshold(state: &ControllerState, surface: &str) -> ThresholdLevel {
    state
        .counter(&SurfaceId::from(surface))
        .expect("attached counter")
        .threshold()
}

#[test]
fn attach_measures_prefilled_content_and_renders() {
    init_logging();
    let config = Arc::new(FieldCounterConfig::new(10).with_position(CounterPosition::Before));
    let (state, effects) = attach(ControllerState::new(), "title", SurfaceKind::PlainText, &config, "hello");

    let counter = state.counter(&SurfaceId::from("title")).unwrap();
    assert_eq!(counter.current_length(), 5);
    assert_eq!(counter.remaining(), 5);
    assert_eq!(counter.threshold(), ThresholdLevel::Warning);
    assert_eq!(
        effects,
        vec![
            Effect::Subscribe {
                surface_id: SurfaceId::from("title"),
            },
            Effect::MountCounter {
                surface_id: SurfaceId::from("title"),
                position: CounterPosition::Before,
            },
            Effect::RenderStatus {
                surface_id: SurfaceId::from("title"),
                text: "Remaining: 5".to_string(),
                threshold: ThresholdLevel::Warning,
            },
        ]
    );
}

#[test]
fn attach_is_idempotent() {
    init_logging();
    let config = Arc::new(FieldCounterConfig::new(10));
    let (state, _) = attach(ControllerState::new(), "title", SurfaceKind::PlainText, &config, "abc");
    let before = state.clone();

    let (state, effects) = attach(state, "title", SurfaceKind::PlainText, &config, "abcdefghijkl");

    assert_eq!(state, before);
    assert_eq!(state.len(), 1);
    assert!(effects.is_empty());
    assert_eq!(state.counter(&SurfaceId::from("title")).unwrap().current_length(), 3);
}

#[test]
fn disabled_config_attaches_nothing() {
    init_logging();
    let config = Arc::new(FieldCounterConfig::new(0));
    let (state, effects) = attach(ControllerState::new(), "title", SurfaceKind::PlainText, &config, "abc");

    assert!(state.is_empty());
    assert!(effects.is_empty());
}

#[test]
fn unreadable_content_counts_as_empty() {
    init_logging();
    let (state, _) = update(
        ControllerState::new(),
        Msg::Attach {
            surface_id: SurfaceId::from("body"),
            form_id: FormId::from("node-form"),
            kind: SurfaceKind::RichText,
            config: Arc::new(FieldCounterConfig::new(10)),
            content: None,
        },
    );
    let counter = state.counter(&SurfaceId::from("body")).unwrap();
    assert_eq!(counter.current_length(), 0);
    assert_eq!(counter.remaining(), 10);
    assert_eq!(counter.threshold(), ThresholdLevel::Normal);
}

#[test]
fn threshold_follows_remaining_characters() {
    init_logging();
    let config = Arc::new(FieldCounterConfig::new(10));
    let (state, _) = attach(ControllerState::new(), "title", SurfaceKind::PlainText, &config, "");
    assert_eq!(threshold(&state, "title"), ThresholdLevel::Normal);

    let (state, _) = edit(state, "title", "abcd");
    assert_eq!(threshold(&state, "title"), ThresholdLevel::Normal);
    assert_eq!(state.counter(&SurfaceId::from("title")).unwrap().remaining(), 6);

    let (state, _) = edit(state, "title", "abcde");
    assert_eq!(threshold(&state, "title"), ThresholdLevel::Warning);
    assert_eq!(state.counter(&SurfaceId::from("title")).unwrap().remaining(), 5);

    let (state, _) = edit(state, "title", "abcdefghijk");
    assert_eq!(threshold(&state, "title"), ThresholdLevel::Over);
    assert_eq!(state.counter(&SurfaceId::from("title")).unwrap().remaining(), -1);

    let (state, _) = edit(state, "title", "ab");
    assert_eq!(threshold(&state, "title"), ThresholdLevel::Normal);
}

#[test]
fn markup_is_stripped_when_configured() {
    init_logging();
    let config = Arc::new(FieldCounterConfig::new(9).with_count_markup(false));
    let (state, effects) = attach(ControllerState::new(), "body", SurfaceKind::RichText, &config, "<p>Hi</p>");

    let counter = state.counter(&SurfaceId::from("body")).unwrap();
    assert_eq!(counter.current_length(), 2);
    assert_eq!(counter.remaining(), 7);
    assert!(effects.contains(&Effect::RenderStatus {
        surface_id: SurfaceId::from("body"),
        text: "Remaining: 7".to_string(),
        threshold: ThresholdLevel::Normal,
    }));
}

#[test]
fn display_length_matches_server_validation() {
    init_logging();
    let config = Arc::new(FieldCounterConfig::new(12).with_count_markup(false));
    let contents = ["<p>Hello</p>\r\n<p>world</p>", "plain\r\ntext", "<b>x</b> <open", ""];
    let (mut state, _) = attach(ControllerState::new(), "body", SurfaceKind::PlainText, &config, "");

    for content in contents {
        let (next, _) = edit(state, "body", content);
        state = next;
        let counter = state.counter(&SurfaceId::from("body")).unwrap();
        let validation = validate_submission(content, config.limit());
        assert_eq!(counter.current_length(), validation.length);
        assert_eq!(counter.remaining(), validation.remaining());
        assert_eq!(counter.threshold() != ThresholdLevel::Over, validation.passed());
    }
}

#[test]
fn repeated_reads_of_unchanged_content_are_silent() {
    init_logging();
    let config = Arc::new(FieldCounterConfig::new(10));
    let (state, _) = attach(ControllerState::new(), "title", SurfaceKind::PlainText, &config, "");

    let (state, effects) = edit(state, "title", "abc");
    assert_eq!(effects.len(), 1);
    let after_first = state.clone();

    let (state, effects) = edit(state, "title", "abc");
    assert!(effects.is_empty());
    assert_eq!(state, after_first);
}

#[test]
fn rich_text_reads_are_deferred() {
    init_logging();
    let config = Arc::new(FieldCounterConfig::new(10));
    let (state, _) = attach(ControllerState::new(), "body", SurfaceKind::RichText, &config, "");
    let (state, _) = attach(state, "title", SurfaceKind::PlainText, &config, "");

    let (state, effects) = update(
        state,
        Msg::ContentChanged {
            surface_id: SurfaceId::from("body"),
        },
    );
    assert!(matches!(
        effects.as_slice(),
        [Effect::ReadContent {
            timing: ReadTiming::Deferred,
            ..
        }]
    ));

    let (_, effects) = update(
        state,
        Msg::ContentChanged {
            surface_id: SurfaceId::from("title"),
        },
    );
    assert!(matches!(
        effects.as_slice(),
        [Effect::ReadContent {
            timing: ReadTiming::Immediate,
            ..
        }]
    ));
}

#[test]
fn reads_for_a_previous_binding_are_dropped() {
    init_logging();
    let config = Arc::new(FieldCounterConfig::new(10));
    let surface_id = SurfaceId::from("body");
    let (state, _) = attach(ControllerState::new(), "body", SurfaceKind::RichText, &config, "");
    let stale_binding = state.binding_id(&surface_id).unwrap();

    let (state, _) = update(state, Msg::Detach { surface_id: surface_id.clone() });
    let (state, _) = attach(state, "body", SurfaceKind::RichText, &config, "ab");
    assert_ne!(state.binding_id(&surface_id), Some(stale_binding));

    let (state, effects) = update(
        state,
        Msg::ContentRead {
            surface_id: surface_id.clone(),
            binding: stale_binding,
            content: Some("a much longer stale text".to_string()),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.counter(&surface_id).unwrap().current_length(), 2);
}

#[test]
fn detach_discards_counter_and_cancels_reads() {
    init_logging();
    let config = Arc::new(FieldCounterConfig::new(10));
    let (state, _) = attach(ControllerState::new(), "body", SurfaceKind::RichText, &config, "abc");

    let (state, effects) = update(
        state,
        Msg::Detach {
            surface_id: SurfaceId::from("body"),
        },
    );
    assert!(state.is_empty());
    assert_eq!(
        effects,
        vec![
            Effect::CancelDeferredRead {
                surface_id: SurfaceId::from("body"),
            },
            Effect::Release {
                surface_id: SurfaceId::from("body"),
            },
        ]
    );
}

#[test]
fn gate_blocks_on_first_offending_surface() {
    init_logging();
    let config = Arc::new(FieldCounterConfig::new(3));
    let (state, _) = attach(ControllerState::new(), "a", SurfaceKind::PlainText, &config, "too long");
    let (state, _) = attach(state, "b", SurfaceKind::PlainText, &config, "ok");
    let (state, _) = attach(state, "c", SurfaceKind::PlainText, &config, "also too long");

    let gate = state.gate_submission(&FormId::from("node-form"));
    assert!(!gate.allow);
    assert_eq!(gate.first_offending_surface, Some(SurfaceId::from("a")));

    let (_, effects) = update(
        state,
        Msg::SubmitRequested {
            form_id: FormId::from("node-form"),
        },
    );
    assert_eq!(
        effects,
        vec![Effect::BlockSubmission {
            form_id: FormId::from("node-form"),
            focus: SurfaceId::from("a"),
        }]
    );
}

#[test]
fn gate_ignores_fields_that_allow_overflow() {
    init_logging();
    let lenient = Arc::new(FieldCounterConfig::new(3).with_prevent_submit(false));
    let strict = Arc::new(FieldCounterConfig::new(3));
    let (state, _) = attach(ControllerState::new(), "a", SurfaceKind::PlainText, &lenient, "too long");
    let (state, _) = attach(state, "b", SurfaceKind::PlainText, &strict, "ok");

    let gate = state.gate_submission(&FormId::from("node-form"));
    assert!(gate.allow);
    assert_eq!(gate.first_offending_surface, None);

    let (_, effects) = update(
        state,
        Msg::SubmitRequested {
            form_id: FormId::from("node-form"),
        },
    );
    assert!(effects.is_empty());
}

#[test]
fn gate_only_considers_surfaces_of_the_form() {
    init_logging();
    let config = Arc::new(FieldCounterConfig::new(3));
    let (state, _) = update(
        ControllerState::new(),
        Msg::Attach {
            surface_id: SurfaceId::from("elsewhere"),
            form_id: FormId::from("search-form"),
            kind: SurfaceKind::PlainText,
            config: config.clone(),
            content: Some("too long".to_string()),
        },
    );
    let (state, _) = attach(state, "a", SurfaceKind::PlainText, &config, "ok");

    assert!(state.gate_submission(&FormId::from("node-form")).allow);
    assert!(!state.gate_submission(&FormId::from("search-form")).allow);
}

#[test]
fn view_lists_counters_in_attachment_order() {
    init_logging();
    let config = Arc::new(FieldCounterConfig::new(10).with_status_template("{used}/{max}"));
    let (state, _) = attach(ControllerState::new(), "summary", SurfaceKind::PlainText, &config, "abc");
    let (state, _) = attach(state, "body", SurfaceKind::RichText, &config, "");

    let view = state.view();
    let rows: Vec<_> = view
        .counters
        .iter()
        .map(|c| (c.surface_id.as_str(), c.status_text.as_str()))
        .collect();
    assert_eq!(rows, vec![("summary", "3/10"), ("body", "0/10")]);
}

#[test]
fn notifications_for_unknown_surfaces_are_ignored() {
    init_logging();
    let state = ControllerState::new();
    let surface_id = SurfaceId::from("missing");

    let (next, effects) = update(
        state.clone(),
        Msg::ContentChanged {
            surface_id: surface_id.clone(),
        },
    );
    assert_eq!(state, next);
    assert!(effects.is_empty());

    let (next, effects) = update(next, Msg::Detach { surface_id });
    assert_eq!(state, next);
    assert!(effects.is_empty());
}
