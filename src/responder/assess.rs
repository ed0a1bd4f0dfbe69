//! 症状评估：问候 → 急症 → 症状检测 → 诊断打分
//!
//! 规则按优先级依次判断，先命中者返回；所有比较均基于一次小写化后的输入做子串包含，
//! 不分词、不做词形还原。评估是纯函数：相同输入总得到相同输出。

use crate::memory::Turn;
use crate::responder::tables::{
    DiagnosisEntry, SymptomEntry, CLARIFY_TEXT, DIAGNOSES, DISCLAIMER_SUFFIX, EMERGENCY_KEYWORDS,
    EMERGENCY_TEXT, GREETING_KEYWORDS, GREETING_TEXT, SYMPTOMS,
};

/// 单次评估的结论（渲染前的结构化形式）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assessment {
    /// 首轮或包含问候词
    Greeting,
    /// 命中紧急关键词
    Emergency,
    /// 未检测到任何症状，请求补充描述
    NeedDetail,
    /// 检测到症状且某个诊断至少匹配一项
    Diagnosis {
        symptoms: Vec<&'static str>,
        name: &'static str,
        advice: &'static str,
    },
    /// 检测到症状但没有诊断匹配
    Unmatched { symptoms: Vec<&'static str> },
}

impl Assessment {
    /// 分支名（日志用）
    pub fn kind(&self) -> &'static str {
        match self {
            Assessment::Greeting => "greeting",
            Assessment::Emergency => "emergency",
            Assessment::NeedDetail => "need_detail",
            Assessment::Diagnosis { .. } => "diagnosis",
            Assessment::Unmatched { .. } => "unmatched",
        }
    }

    /// 渲染为回复文本
    pub fn into_reply(self) -> String {
        match self {
            Assessment::Greeting => GREETING_TEXT.to_string(),
            Assessment::Emergency => EMERGENCY_TEXT.to_string(),
            Assessment::NeedDetail => CLARIFY_TEXT.to_string(),
            Assessment::Diagnosis {
                symptoms, advice, ..
            } => format!(
                "Based on your symptoms ({}), {}{}",
                symptoms.join(", "),
                advice,
                DISCLAIMER_SUFFIX
            ),
            Assessment::Unmatched { symptoms } => format!(
                "I understand you're experiencing: {}. While I can provide general information, these symptoms should be evaluated by a healthcare professional for an accurate diagnosis and appropriate treatment. If your symptoms are severe or worsening, please seek medical attention promptly.",
                symptoms.join(", ")
            ),
        }
    }
}

/// 应答器：持有症状表与诊断表的引用，默认使用内置表
#[derive(Debug, Clone, Copy)]
pub struct Responder {
    symptoms: &'static [SymptomEntry],
    diagnoses: &'static [DiagnosisEntry],
}

impl Default for Responder {
    fn default() -> Self {
        Self::new(SYMPTOMS, DIAGNOSES)
    }
}

impl Responder {
    pub fn new(symptoms: &'static [SymptomEntry], diagnoses: &'static [DiagnosisEntry]) -> Self {
        Self {
            symptoms,
            diagnoses,
        }
    }

    /// 评估一条用户输入；history 为空时总是问候
    pub fn assess(&self, message: &str, history: &[Turn]) -> Assessment {
        let lower = message.to_lowercase();

        let assessment = if history.is_empty() || contains_any(&lower, GREETING_KEYWORDS) {
            Assessment::Greeting
        } else if contains_any(&lower, EMERGENCY_KEYWORDS) {
            Assessment::Emergency
        } else {
            let symptoms = self.detect_symptoms(&lower);
            if symptoms.is_empty() {
                Assessment::NeedDetail
            } else {
                match self.best_diagnosis(&symptoms) {
                    Some(d) => Assessment::Diagnosis {
                        symptoms,
                        name: d.name,
                        advice: d.advice,
                    },
                    None => Assessment::Unmatched { symptoms },
                }
            }
        };

        tracing::debug!(
            kind = assessment.kind(),
            history_len = history.len(),
            "assessed message"
        );
        assessment
    }

    /// 评估并渲染为文本
    pub fn respond(&self, message: &str, history: &[Turn]) -> String {
        self.assess(message, history).into_reply()
    }

    /// 按症状表顺序收集命中的症状 key（无重复）；lower 须已小写
    pub fn detect_symptoms(&self, lower: &str) -> Vec<&'static str> {
        self.symptoms
            .iter()
            .filter(|s| contains_any(lower, s.triggers))
            .map(|s| s.key)
            .collect()
    }

    /// 匹配数严格大于当前最佳才替换，故同分时保留先出现的诊断；匹配数为 0 的不参与
    fn best_diagnosis(&self, detected: &[&str]) -> Option<&'static DiagnosisEntry> {
        let mut best: Option<(&'static DiagnosisEntry, usize)> = None;
        for d in self.diagnoses {
            let count = d.required.iter().filter(|r| detected.contains(*r)).count();
            if count > 0 && best.map_or(true, |(_, c)| count > c) {
                best = Some((d, count));
            }
        }
        if let Some((d, count)) = best {
            tracing::debug!(diagnosis = d.name, match_count = count, ?detected, "best diagnosis");
        }
        best.map(|(d, _)| d)
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// 基于内置表的应答：respond(message, history) -> text
pub fn respond(message: &str, history: &[Turn]) -> String {
    Responder::default().respond(message, history)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history() -> Vec<Turn> {
        vec![Turn::assistant(GREETING_TEXT)]
    }

    #[test]
    fn test_empty_history_always_greets() {
        assert_eq!(respond("hello", &[]), GREETING_TEXT);
        assert_eq!(respond("", &[]), GREETING_TEXT);
        assert_eq!(respond("I have chest pain", &[]), GREETING_TEXT);
    }

    #[test]
    fn test_greeting_is_substring_match() {
        // "this" 中含 "hi"
        assert_eq!(respond("this fever is bad", &history()), GREETING_TEXT);
        assert_eq!(respond("HELLO there", &history()), GREETING_TEXT);
    }

    #[test]
    fn test_greeting_precedes_emergency() {
        assert_eq!(respond("hello, bleeding", &history()), GREETING_TEXT);
    }

    #[test]
    fn test_emergency_overrides_symptoms() {
        assert_eq!(respond("I have chest pain", &history()), EMERGENCY_TEXT);
        assert_eq!(
            respond("fever, cough and BLEEDING", &history()),
            EMERGENCY_TEXT
        );
        assert_eq!(respond("I can't breathe", &history()), EMERGENCY_TEXT);
    }

    #[test]
    fn test_every_emergency_keyword_escalates() {
        for keyword in EMERGENCY_KEYWORDS {
            let message = format!("fever, cough and {}", keyword.to_uppercase());
            assert_eq!(respond(&message, &history()), EMERGENCY_TEXT, "{}", keyword);
        }
        assert_eq!(respond("he is unconscious", &history()), EMERGENCY_TEXT);
        assert_eq!(respond("severe pain in my back", &history()), EMERGENCY_TEXT);
        assert_eq!(respond("this is an emergency", &history()), GREETING_TEXT);
        assert_eq!(respond("it is an emergency", &history()), EMERGENCY_TEXT);
    }

    #[test]
    fn test_no_symptoms_asks_for_detail() {
        assert_eq!(respond("xyz123", &history()), CLARIFY_TEXT);
        assert_eq!(respond("", &history()), CLARIFY_TEXT);
    }

    #[test]
    fn test_fever_and_cough_tie_goes_to_flu() {
        let r = Responder::default();
        let a = r.assess("I have a fever and cough", &history());
        match &a {
            Assessment::Diagnosis { symptoms, name, .. } => {
                assert_eq!(symptoms, &vec!["fever", "cough"]);
                // flu 与 respiratory 均为 2，flu 在前
                assert_eq!(*name, "flu");
            }
            other => panic!("Expected Diagnosis, got {:?}", other),
        }
        let text = a.into_reply();
        assert!(text.starts_with("Based on your symptoms (fever, cough), You may have the flu."));
        assert!(text.ends_with(DISCLAIMER_SUFFIX));
    }

    #[test]
    fn test_detection_follows_table_order() {
        let r = Responder::default();
        let detected = r.detect_symptoms("wheezing, nausea, sore throat and a fever");
        assert_eq!(detected, vec!["fever", "soreThroat", "nausea", "breathlessness"]);
    }

    #[test]
    fn test_single_symptom_diagnoses() {
        let r = Responder::default();
        let name_of = |msg: &str| match r.assess(msg, &history()) {
            Assessment::Diagnosis { name, .. } => name,
            other => panic!("Expected Diagnosis for {:?}, got {:?}", msg, other),
        };
        assert_eq!(name_of("my sore throat"), "cold");
        assert_eq!(name_of("I have nausea"), "stomachBug");
        assert_eq!(name_of("wheezing"), "respiratory");
        // fatigue：flu 与 stomachBug 同为 1，flu 在前
        assert_eq!(name_of("so tired"), "flu");
    }

    #[test]
    fn test_higher_count_replaces_earlier() {
        let r = Responder::default();
        match r.assess("nausea, vomiting, exhausted", &history()) {
            Assessment::Diagnosis { symptoms, name, .. } => {
                assert_eq!(symptoms, vec!["fatigue", "nausea"]);
                assert_eq!(name, "stomachBug");
            }
            other => panic!("Expected Diagnosis, got {:?}", other),
        }
    }

    static ORPHAN_SYMPTOMS: &[SymptomEntry] = &[
        SymptomEntry {
            key: "rash",
            triggers: &["rash", "itchy"],
        },
        SymptomEntry {
            key: "fever",
            triggers: &["fever"],
        },
    ];

    static FEVER_ONLY: &[DiagnosisEntry] = &[DiagnosisEntry {
        name: "flu",
        required: &["fever"],
        advice: "Rest.",
    }];

    #[test]
    fn test_unmatched_symptoms_get_generic_reply() {
        let r = Responder::new(ORPHAN_SYMPTOMS, FEVER_ONLY);
        let a = r.assess("an itchy rash", &history());
        assert_eq!(
            a,
            Assessment::Unmatched {
                symptoms: vec!["rash"]
            }
        );
        assert!(a
            .into_reply()
            .starts_with("I understand you're experiencing: rash. While I can"));
    }

    static TIE_DIAGNOSES: &[DiagnosisEntry] = &[
        DiagnosisEntry {
            name: "first",
            required: &["rash"],
            advice: "First advice.",
        },
        DiagnosisEntry {
            name: "second",
            required: &["fever"],
            advice: "Second advice.",
        },
    ];

    #[test]
    fn test_tie_keeps_earlier_diagnosis() {
        let r = Responder::new(ORPHAN_SYMPTOMS, TIE_DIAGNOSES);
        let text = r.respond("rash and fever", &history());
        assert_eq!(
            text,
            format!(
                "Based on your symptoms (rash, fever), First advice.{}",
                DISCLAIMER_SUFFIX
            )
        );
    }

    #[test]
    fn test_respond_is_pure() {
        let h = history();
        let first = respond("cough and fever", &h);
        let second = respond("cough and fever", &h);
        assert_eq!(first, second);
    }

    #[test]
    fn test_arbitrary_unicode_is_total() {
        assert_eq!(respond("😷 Ünïcödé ÄÖ", &history()), CLARIFY_TEXT);
    }
}
