//! 应答契约集成测试：只通过公开 API 调用 respond / Responder

use medassist::memory::Turn;
use medassist::respond;
use medassist::responder::tables::{CLARIFY_TEXT, EMERGENCY_TEXT, GREETING_TEXT};
use medassist::responder::{Assessment, Responder};

fn prior() -> Vec<Turn> {
    vec![Turn::assistant(GREETING_TEXT), Turn::user("earlier message")]
}

#[test]
fn test_greeting_for_empty_history() {
    assert_eq!(respond("hello", &[]), GREETING_TEXT);
    assert_eq!(respond("", &[]), GREETING_TEXT);
}

#[test]
fn test_emergency_beats_symptom_words() {
    let text = respond("I have chest pain and a fever", &prior());
    assert_eq!(text, EMERGENCY_TEXT);
}

#[test]
fn test_unknown_words_need_clarification() {
    assert_eq!(respond("xyz123", &prior()), CLARIFY_TEXT);
}

#[test]
fn test_fever_and_cough() {
    let text = respond("I have a fever and cough", &prior());
    assert!(text.starts_with("Based on your symptoms (fever, cough), You may have the flu."));
    assert!(text.contains("⚕️ Please note:"));
}

#[test]
fn test_output_order_ignores_input_order() {
    let a = respond("cough, then fever", &prior());
    let b = respond("fever, then cough", &prior());
    assert_eq!(a, b);
    assert!(a.contains("(fever, cough)"));
}

#[test]
fn test_all_symptoms_pick_flu() {
    // flu 四项全中，严格大于其他诊断
    let r = Responder::default();
    let a = r.assess(
        "fever, cough, headache, sore throat, tired, nausea and wheezing",
        &prior(),
    );
    match a {
        Assessment::Diagnosis { symptoms, name, .. } => {
            assert_eq!(symptoms.len(), 7);
            assert_eq!(name, "flu");
        }
        other => panic!("Expected Diagnosis, got {:?}", other),
    }
}

#[test]
fn test_respiratory_needs_strictly_more() {
    // respiratory 3 项（cough, breathlessness, fever）> flu 2 项
    let text = respond("cough, fever and shortness of breath", &prior());
    assert!(text.contains("(fever, cough, breathlessness)"));
    assert!(text.contains("respiratory infection"));
}

#[test]
fn test_repeated_calls_identical() {
    let h = prior();
    let first = respond("migraine and vomiting", &h);
    for _ in 0..3 {
        assert_eq!(respond("migraine and vomiting", &h), first);
    }
}
