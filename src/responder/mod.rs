//! 应答器：症状关键词 → 诊断规则 → 建议文本（纯函数，无外部依赖）

pub mod assess;
pub mod tables;

pub use assess::{respond, Assessment, Responder};
pub use tables::{DiagnosisEntry, SymptomEntry, DIAGNOSES, SYMPTOMS};
