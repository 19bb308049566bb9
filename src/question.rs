use itertools::Itertools;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Labels used for every true/false question regardless of the record's own options
pub const BOOLEAN_OPTIONS: [&str; 2] = ["True", "False"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum_macros::Display)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Unknown or missing values fall back to `Easy`
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_lowercase()).as_deref() {
            Some("medium") => Difficulty::Medium,
            Some("hard") => Difficulty::Hard,
            _ => Difficulty::Easy,
        }
    }

    /// Number of filled stars shown for this difficulty
    pub fn stars(&self) -> u8 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Medium => 2,
            Difficulty::Hard => 3,
        }
    }
}

/// A question record as it arrives from the data source.
///
/// Every field is optional and loosely typed: scalars are stringified and
/// list fields that are not arrays are treated as missing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawQuestionRecord {
    #[serde(deserialize_with = "lenient_string")]
    pub category: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub difficulty: Option<String>,
    #[serde(rename = "type", deserialize_with = "lenient_string")]
    pub kind: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub question: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub correct_answer: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub answer: Option<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub incorrect_answers: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient_list")]
    pub options: Option<Vec<String>>,
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_to_string(&value))
}

fn lenient_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(Some(items.iter().filter_map(scalar_to_string).collect())),
        _ => Ok(None),
    }
}

/// Canonical, decoded question
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub category: String,
    pub difficulty: Difficulty,
    pub text: String,
    pub options: Vec<String>,
    pub answer: String,
}

impl Question {
    /// A question is playable only when its answer is one of its options
    pub fn is_well_formed(&self) -> bool {
        !self.answer.is_empty() && self.options.iter().any(|o| *o == self.answer)
    }
}

fn is_valid_escape(bytes: &[u8]) -> bool {
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            match bytes.get(i + 1..i + 3) {
                Some([hi, lo]) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() => i += 3,
                _ => return false,
            }
        } else {
            i += 1;
        }
    }
    true
}

/// Percent-decode a field, returning the input unchanged when it is not validly encoded
pub fn decode_str(raw: &str) -> String {
    if !is_valid_escape(raw.as_bytes()) {
        return raw.to_string();
    }
    match urlencoding::decode(raw) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => raw.to_string(),
    }
}

pub fn normalize(raw: &RawQuestionRecord) -> Question {
    let answer = match raw.correct_answer.as_deref() {
        Some(a) if !a.is_empty() => decode_str(a),
        _ => raw.answer.as_deref().map(decode_str).unwrap_or_default(),
    };

    let mut options: Vec<String> = match (&raw.incorrect_answers, &raw.options) {
        (Some(incorrect), _) => incorrect.iter().map(|o| decode_str(o)).collect(),
        (None, Some(options)) => options.iter().map(|o| decode_str(o)).collect(),
        (None, None) => vec![],
    };

    if !answer.is_empty() && !options.contains(&answer) {
        options.push(answer.clone());
    }
    options = options.into_iter().unique().collect();

    if raw.kind.as_deref() == Some("boolean") {
        options = BOOLEAN_OPTIONS.iter().map(|s| s.to_string()).collect();
    }

    Question {
        category: raw.category.as_deref().map(decode_str).unwrap_or_default(),
        difficulty: Difficulty::parse(raw.difficulty.as_deref()),
        text: raw.question.as_deref().map(decode_str).unwrap_or_default(),
        options,
        answer,
    }
}
