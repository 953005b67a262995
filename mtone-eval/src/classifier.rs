//! Response classifier
//!
//! Turns unstructured model output into a tone label and, independently, a
//! best-effort pinyin-with-tone transcription.
//!
//! Tone rules are tried in a fixed order and the first match wins:
//!
//! 1. `tone_phrase`: "tone N" / "Tone: N" (case-insensitive)
//! 2. `answer_item`: digit after the "2)" answer marker the prompt asks for
//! 3. `standalone_digit`: a lone digit 1-4 not followed by ")"
//! 4. `pinyin_suffix`: digit trailing a run of letters, e.g. "cai4"
//!
//! No match is a distinct outcome (empty label), not a wrong guess.
//!
//! Known limitation: `standalone_digit` can fire on an unrelated digit
//! elsewhere in the response ("1 of 4 options", "3 seconds"). The precedence
//! is kept as-is so results stay comparable across runs.

use mtone_common::Tone;
use once_cell::sync::Lazy;
use regex::Regex;

/// Result of classifying one response
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Classification {
    /// Predicted tone, `None` when no rule matched
    pub tone: Option<Tone>,
    /// Lower-cased pinyin with tone digit, e.g. "cai4"
    pub pinyin: Option<String>,
    /// Name of the rule that produced `tone`
    pub rule: Option<&'static str>,
}

impl Classification {
    /// Tone as interchange label: "1".."4" or ""
    pub fn tone_label(&self) -> String {
        self.tone.map(|t| t.to_string()).unwrap_or_default()
    }

    /// Pinyin as interchange label, "" when absent
    pub fn pinyin_label(&self) -> String {
        self.pinyin.clone().unwrap_or_default()
    }
}

type Extractor = fn(&Regex, &str) -> Option<Tone>;

/// One ordered tone-extraction rule
struct ToneRule {
    name: &'static str,
    pattern: Regex,
    extract: Extractor,
}

impl ToneRule {
    fn new(name: &'static str, pattern: &str, extract: Extractor) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).expect("tone rule pattern must compile"),
            extract,
        }
    }
}

static TONE_RULES: Lazy<Vec<ToneRule>> = Lazy::new(|| {
    vec![
        ToneRule::new("tone_phrase", r"(?i)\btone\s*[:\s]*([1-4])\b", first_capture),
        ToneRule::new("answer_item", r"2\)\s*([1-4])\b", first_capture),
        ToneRule::new("standalone_digit", r"\b([1-4])\b", first_not_list_marker),
        ToneRule::new("pinyin_suffix", r"(?i)[a-zü]+([1-4])\b", first_capture),
    ]
});

static PINYIN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b([a-zü]+)([1-4])\b").expect("pinyin pattern must compile"));

fn first_capture(pattern: &Regex, text: &str) -> Option<Tone> {
    let caps = pattern.captures(text)?;
    Tone::from_label(caps.get(1)?.as_str())
}

/// First matching digit that is not a list marker like "1)"
fn first_not_list_marker(pattern: &Regex, text: &str) -> Option<Tone> {
    pattern
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .find(|m| !text[m.end()..].starts_with(')'))
        .and_then(|m| Tone::from_label(m.as_str()))
}

/// Apply the ordered tone rules; returns the tone and the rule that matched
pub fn match_tone(text: &str) -> Option<(Tone, &'static str)> {
    TONE_RULES
        .iter()
        .find_map(|rule| (rule.extract)(&rule.pattern, text).map(|tone| (tone, rule.name)))
}

/// Predicted tone for a response; `None` for absent, empty or unmatched text
pub fn predict_tone(response: Option<&str>) -> Option<Tone> {
    let text = response.map(str::trim).filter(|t| !t.is_empty())?;
    match_tone(text).map(|(tone, _)| tone)
}

/// First "letters + tone digit" token, lower-cased (e.g. "Cai4" → "cai4")
pub fn extract_pinyin(response: Option<&str>) -> Option<String> {
    let text = response.map(str::trim).filter(|t| !t.is_empty())?;
    let caps = PINYIN.captures(text)?;
    Some(format!("{}{}", caps[1].to_lowercase(), &caps[2]))
}

/// Classify a raw model response
pub fn classify(response: Option<&str>) -> Classification {
    let text = match response.map(str::trim).filter(|t| !t.is_empty()) {
        Some(text) => text,
        None => return Classification::default(),
    };

    let matched = match_tone(text);
    Classification {
        tone: matched.map(|(tone, _)| tone),
        pinyin: extract_pinyin(Some(text)),
        rule: matched.map(|(_, rule)| rule),
    }
}
