use super::*;

#[test]
fn ui_state_defaults_to_pen_with_void_ink_on_draw_view() {
    let ui = UiState::default();
    assert_eq!(ui.view, View::Draw);
    assert_eq!(ui.tool, Tool::Pen);
    assert_eq!(ui.ink, "#2c2c2c");
    assert_eq!(ui.selected, None);
}

#[test]
fn input_state_defaults_to_idle() {
    assert_eq!(InputState::default(), InputState::Idle);
    assert!(!InputState::Idle.is_active());
}

#[test]
fn every_gesture_is_active() {
    let drag = InputState::DraggingOverlay { id: OverlayId::nil(), last: Point::new(1.0, 2.0) };
    for state in [InputState::Drawing, drag, InputState::Board, InputState::Suppressed] {
        assert!(state.is_active(), "{state:?}");
    }
}

#[test]
fn view_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&View::Stream).unwrap(), "\"stream\"");
    let view: View = serde_json::from_str("\"board\"").unwrap();
    assert_eq!(view, View::Board);
}
