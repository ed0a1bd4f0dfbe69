//! 静态查找表：症状关键词表与诊断规则表
//!
//! 两张表均为编译期常量，顺序即迭代顺序（检测结果与诊断打分都依赖该顺序）；内容预先小写。

/// 症状表条目：症状 key 与其触发短语（小写子串）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymptomEntry {
    pub key: &'static str,
    pub triggers: &'static [&'static str],
}

/// 诊断表条目：诊断名、所需症状 key、建议文本
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagnosisEntry {
    pub name: &'static str,
    pub required: &'static [&'static str],
    pub advice: &'static str,
}

/// 症状表（顺序固定：fever → breathlessness）
pub static SYMPTOMS: &[SymptomEntry] = &[
    SymptomEntry {
        key: "fever",
        triggers: &["high temperature", "fever", "hot", "burning up"],
    },
    SymptomEntry {
        key: "cough",
        triggers: &["cough", "coughing", "chest pain"],
    },
    SymptomEntry {
        key: "headache",
        triggers: &["headache", "head pain", "migraine"],
    },
    SymptomEntry {
        key: "soreThroat",
        triggers: &["sore throat", "throat pain", "swallowing pain"],
    },
    SymptomEntry {
        key: "fatigue",
        triggers: &["tired", "fatigue", "exhausted", "weakness"],
    },
    SymptomEntry {
        key: "nausea",
        triggers: &["nausea", "vomiting", "sick", "stomach"],
    },
    SymptomEntry {
        key: "breathlessness",
        triggers: &["breathless", "breathing", "shortness of breath", "wheezing"],
    },
];

/// 诊断表（顺序固定，同分时靠前者胜出）
pub static DIAGNOSES: &[DiagnosisEntry] = &[
    DiagnosisEntry {
        name: "flu",
        required: &["fever", "cough", "headache", "fatigue"],
        advice: "You may have the flu. I recommend rest, staying hydrated, and taking over-the-counter fever reducers. If symptoms worsen or persist beyond 7 days, please consult a healthcare provider.",
    },
    DiagnosisEntry {
        name: "cold",
        required: &["cough", "soreThroat", "headache"],
        advice: "Your symptoms suggest a common cold. Get plenty of rest, drink warm fluids, and consider using throat lozenges. Most colds resolve within 7-10 days. If symptoms worsen, consult a doctor.",
    },
    DiagnosisEntry {
        name: "stomachBug",
        required: &["nausea", "fatigue", "headache"],
        advice: "You might have a stomach bug or gastroenteritis. Stay hydrated with clear fluids, eat bland foods when you can, and rest. If symptoms persist beyond 48 hours or you show signs of dehydration, seek medical attention.",
    },
    DiagnosisEntry {
        name: "respiratory",
        required: &["cough", "breathlessness", "fever"],
        advice: "Your symptoms suggest a respiratory infection. Please seek medical attention soon for proper evaluation. In the meantime, rest and monitor your breathing. If breathing difficulties worsen, seek emergency care.",
    },
];

/// 紧急关键词：命中任一即直接返回急救提示
pub const EMERGENCY_KEYWORDS: &[&str] = &[
    "chest pain",
    "can't breathe",
    "severe pain",
    "bleeding",
    "unconscious",
    "emergency",
];

/// 问候关键词（子串匹配，"this" 也会命中 "hi"）
pub const GREETING_KEYWORDS: &[&str] = &["hello", "hi"];

pub const GREETING_TEXT: &str = "Hello! I'm your AI Medical Assistant. I'm here to help you understand your symptoms. Please describe what symptoms you're experiencing, and I'll provide some preliminary guidance. Remember, this is not a substitute for professional medical advice.";

pub const EMERGENCY_TEXT: &str = "⚠️ These symptoms sound serious. Please seek immediate medical attention by calling emergency services or going to the nearest emergency room. Do not delay.";

pub const CLARIFY_TEXT: &str = "I'd like to help you better. Could you please describe your symptoms in more detail? For example, are you experiencing fever, cough, headache, nausea, or any other specific symptoms?";

pub const DISCLAIMER_SUFFIX: &str = "\n\n⚕️ Please note: This is a preliminary assessment. For accurate diagnosis and treatment, please consult with a qualified healthcare professional.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_are_lowercase() {
        for s in SYMPTOMS {
            for t in s.triggers {
                assert_eq!(*t, t.to_lowercase(), "trigger {} not lowercase", t);
            }
        }
        for k in EMERGENCY_KEYWORDS {
            assert_eq!(*k, k.to_lowercase());
        }
    }

    #[test]
    fn test_diagnoses_reference_known_symptoms() {
        for d in DIAGNOSES {
            for r in d.required {
                assert!(
                    SYMPTOMS.iter().any(|s| s.key == *r),
                    "{} requires unknown symptom {}",
                    d.name,
                    r
                );
            }
        }
    }
}
