//! Control-kind classification from topic naming conventions.
//!
//! A topic's kind is decided by string shape alone — no payload
//! inspection, no registry. The dispatcher resolves each topic once and
//! caches the result, so classification must be a pure function of the
//! topic string.

use serde::Serialize;
use strum::Display;

// ── Range bounds ─────────────────────────────────────────────────────────

/// Inclusive slider limits for a range control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RangeBounds {
    pub min: i64,
    pub max: i64,
}

impl RangeBounds {
    /// Hue angle in degrees.
    pub const DEGREES: Self = Self { min: 0, max: 359 };
    /// Color temperature in kelvin.
    pub const KELVIN: Self = Self { min: 2500, max: 9000 };
    /// Plain percentage.
    pub const PERCENT: Self = Self { min: 0, max: 100 };

    /// Clamp `value` into these bounds.
    #[must_use]
    pub fn clamp(self, value: i64) -> i64 {
        value.clamp(self.min, self.max)
    }

    /// Parse a raw payload as the displayed slider value.
    ///
    /// Unparsable payloads fall back to the minimum; out-of-range numbers
    /// are clamped, the way a native slider pins its thumb at the end.
    #[must_use]
    pub fn parse(self, raw: &str) -> i64 {
        raw.parse().map_or(self.min, |value| self.clamp(value))
    }
}

// ── Control kinds ────────────────────────────────────────────────────────

/// What a topic renders as and how updates mutate it.
///
/// `EnumValues` is the odd one out: it names the option-list companion of
/// an enum control and never materializes a widget of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ControlKind {
    /// Read-only reading with an optional unit.
    Sensor,
    /// Integer slider between fixed bounds.
    Range(RangeBounds),
    /// One-of-many selector fed by a `…/values` companion topic.
    Enum,
    /// Option-list refresh for the enum at the parent topic.
    EnumValues,
    /// On/off switch; `"on"` is the only value that reads as on.
    Toggle,
    /// Free-form string.
    Text,
}

// ── Classification rules ─────────────────────────────────────────────────

/// A single naming-convention test.
#[derive(Debug, Clone, Copy)]
enum Pattern {
    /// The fragment appears anywhere in the topic.
    Contains(&'static str),
    /// The topic ends with the fragment.
    Suffix(&'static str),
}

impl Pattern {
    fn matches(self, topic: &str) -> bool {
        match self {
            Self::Contains(fragment) => topic.contains(fragment),
            Self::Suffix(fragment) => topic.ends_with(fragment),
        }
    }
}

/// Ordered rules; the first match wins.
///
/// Order is load-bearing where patterns overlap: the hygrothermograph
/// substring outranks every suffix, so a sensor's humidity-in-percent
/// reading stays a read-only sensor instead of becoming a slider.
const RULES: &[(Pattern, ControlKind)] = &[
    (Pattern::Contains("hygrothermograph"), ControlKind::Sensor),
    (Pattern::Suffix("degrees"), ControlKind::Range(RangeBounds::DEGREES)),
    (Pattern::Suffix("enum"), ControlKind::Enum),
    (Pattern::Suffix("enum/values"), ControlKind::EnumValues),
    (Pattern::Suffix("kelvin"), ControlKind::Range(RangeBounds::KELVIN)),
    (Pattern::Suffix("percent"), ControlKind::Range(RangeBounds::PERCENT)),
    (Pattern::Suffix("power"), ControlKind::Toggle),
];

/// Classify a topic by its naming conventions.
///
/// Topics matching no rule are free text.
#[must_use]
pub fn classify(topic: &str) -> ControlKind {
    RULES
        .iter()
        .find(|(pattern, _)| pattern.matches(topic))
        .map_or(ControlKind::Text, |&(_, kind)| kind)
}
