//! Assertion helpers for scenario checks.

use blackway_core::Document;
use blackway_platform::{MessageValue, OutboundMessage, ParamKind};
use blackway_widgets::Toolkit;

/// Assertion result with structured failure details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssertionResult {
    Passed,
    Failed { code: String, message: String },
}

impl AssertionResult {
    fn failed(code: &str, message: String) -> Self {
        AssertionResult::Failed {
            code: code.to_string(),
            message,
        }
    }

    pub fn is_passed(&self) -> bool {
        matches!(self, AssertionResult::Passed)
    }
}

fn missing(id: &str) -> AssertionResult {
    AssertionResult::failed("missing_widget", format!("{id}: widget not found"))
}

pub fn evaluate_assert_value(
    toolkit: &Toolkit,
    id: &str,
    expected: f64,
    tolerance: f64,
) -> AssertionResult {
    if !toolkit.contains(id) {
        return missing(id);
    }
    let Some(actual) = toolkit.value_of(id) else {
        return AssertionResult::failed("not_continuous", format!("{id}: widget has no value"));
    };
    if (actual - expected).abs() <= tolerance {
        AssertionResult::Passed
    } else {
        AssertionResult::failed(
            "value_mismatch",
            format!("{id}: expected value {expected}, got {actual}"),
        )
    }
}

pub fn evaluate_assert_frame(toolkit: &Toolkit, id: &str, expected: u32) -> AssertionResult {
    if !toolkit.contains(id) {
        return missing(id);
    }
    match toolkit.frame_of(id) {
        Some(frame) if frame == expected => AssertionResult::Passed,
        Some(frame) => AssertionResult::failed(
            "frame_mismatch",
            format!("{id}: expected frame {expected}, got {frame}"),
        ),
        None => AssertionResult::failed("not_continuous", format!("{id}: widget has no frame")),
    }
}

pub fn evaluate_assert_state(toolkit: &Toolkit, id: &str, expected: bool) -> AssertionResult {
    if !toolkit.contains(id) {
        return missing(id);
    }
    match toolkit.state_of(id) {
        Some(state) if state == expected => AssertionResult::Passed,
        Some(state) => AssertionResult::failed(
            "state_mismatch",
            format!("{id}: expected state {expected}, got {state}"),
        ),
        None => AssertionResult::failed("not_stateful", format!("{id}: widget has no state")),
    }
}

pub fn evaluate_assert_missing(toolkit: &Toolkit, id: &str) -> AssertionResult {
    if toolkit.contains(id) || toolkit.document().get_element_by_id(id).is_some() {
        AssertionResult::failed("still_present", format!("{id}: still present"))
    } else {
        AssertionResult::Passed
    }
}

/// Text content of a connected element, looked up by DOM id
pub fn evaluate_assert_text(document: &Document, id: &str, expected: &str) -> AssertionResult {
    let Some(element) = document
        .get_element_by_id(id)
        .and_then(|el| document.element(el))
    else {
        return AssertionResult::failed("missing_element", format!("{id}: element not found"));
    };
    let actual = element.text.as_deref().unwrap_or_default();
    if actual == expected {
        AssertionResult::Passed
    } else {
        AssertionResult::failed(
            "text_mismatch",
            format!("{id}: expected text {expected:?}, got {actual:?}"),
        )
    }
}

/// Checks the most recent message of `param`
pub fn evaluate_assert_sent(
    sent: &[OutboundMessage],
    param: ParamKind,
    expected: Option<&MessageValue>,
) -> AssertionResult {
    let Some(last) = sent.iter().rev().find(|m| m.kind == param) else {
        return AssertionResult::failed("not_sent", format!("{param}: no message sent"));
    };
    if last.value.as_ref() == expected {
        AssertionResult::Passed
    } else {
        AssertionResult::failed(
            "message_mismatch",
            format!("{param}: expected {expected:?}, last sent {:?}", last.value),
        )
    }
}

pub fn evaluate_assert_sent_count(sent: &[OutboundMessage], expected: usize) -> AssertionResult {
    if sent.len() == expected {
        AssertionResult::Passed
    } else {
        AssertionResult::failed(
            "count_mismatch",
            format!("expected {expected} messages, got {}", sent.len()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blackway_core::ElementTag;
    use blackway_widgets::{KnobConfig, LedConfig, ToolkitConfig};

    fn toolkit() -> Toolkit {
        let mut document = Document::new();
        document.create_container("panel").unwrap();
        let mut toolkit = Toolkit::with_document(ToolkitConfig::default(), document);
        toolkit.create_knob("panel", KnobConfig::new().id("gain")).unwrap();
        toolkit
            .create_led("panel", LedConfig {
                id: Some("lamp".to_string()),
                ..LedConfig::default()
            })
            .unwrap();
        toolkit
    }

    #[test]
    fn test_value_and_frame() {
        let toolkit = toolkit();
        assert!(evaluate_assert_value(&toolkit, "gain", 50.0, 1e-9).is_passed());
        assert!(evaluate_assert_frame(&toolkit, "gain", 63).is_passed());
        assert!(matches!(
            evaluate_assert_value(&toolkit, "gain", 10.0, 1e-9),
            AssertionResult::Failed { code, .. } if code == "value_mismatch"
        ));
        assert!(matches!(
            evaluate_assert_value(&toolkit, "lamp", 0.0, 1e-9),
            AssertionResult::Failed { code, .. } if code == "not_continuous"
        ));
        assert_eq!(evaluate_assert_frame(&toolkit, "nope", 0), missing("nope"));
    }

    #[test]
    fn test_state_and_missing() {
        let toolkit = toolkit();
        assert!(evaluate_assert_state(&toolkit, "lamp", false).is_passed());
        assert!(!evaluate_assert_state(&toolkit, "lamp", true).is_passed());
        assert!(!evaluate_assert_state(&toolkit, "gain", true).is_passed());
        assert!(evaluate_assert_missing(&toolkit, "other").is_passed());
        assert!(!evaluate_assert_missing(&toolkit, "gain").is_passed());
        assert!(!evaluate_assert_missing(&toolkit, "panel").is_passed());
    }

    #[test]
    fn test_text() {
        let mut toolkit = toolkit();
        let document = toolkit.document_mut();
        let shown = document.create_element(ElementTag::Div);
        document.set_dom_id(shown, "gainValue");
        document.element_mut(shown).unwrap().text = Some("50 dB".to_string());
        let panel = document.get_element_by_id("panel").unwrap();
        document.append_child(panel, shown);

        let document = toolkit.document();
        assert!(evaluate_assert_text(document, "gainValue", "50 dB").is_passed());
        assert!(matches!(
            evaluate_assert_text(document, "gainValue", "0 dB"),
            AssertionResult::Failed { code, .. } if code == "text_mismatch"
        ));
        assert!(matches!(
            evaluate_assert_text(document, "other", ""),
            AssertionResult::Failed { code, .. } if code == "missing_element"
        ));
    }

    #[test]
    fn test_sent() {
        let sent = vec![
            OutboundMessage::number(ParamKind::Volume, 0.2),
            OutboundMessage::play_note(),
            OutboundMessage::number(ParamKind::Volume, 0.4),
        ];
        let latest = MessageValue::Number(0.4);
        assert!(evaluate_assert_sent(&sent, ParamKind::Volume, Some(&latest)).is_passed());
        assert!(evaluate_assert_sent(&sent, ParamKind::PlayNote, None).is_passed());
        assert!(!evaluate_assert_sent(&sent, ParamKind::StopNote, None).is_passed());
        assert!(
            !evaluate_assert_sent(&sent, ParamKind::Volume, Some(&MessageValue::Number(0.2)))
                .is_passed()
        );
        assert!(evaluate_assert_sent_count(&sent, 3).is_passed());
        assert!(!evaluate_assert_sent_count(&sent, 1).is_passed());
    }
}
