//! Dynamic README block assembly.

use std::fmt::Write;

use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::age::age_on;
use crate::breakdown::ElapsedBreakdown;

/// A named person with a birth date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partner {
    pub name: String,
    pub born: NaiveDate,
}

/// The anchor data every run renders from: when the clock started and who
/// the two partners are.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Couple {
    pub start: DateTime<Utc>,
    pub partners: [Partner; 2],
}

/// Output of [`render_block`].
///
/// `duration` is kept separately so the notifier can reuse the humanized
/// string without re-deriving it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedBlock {
    pub text: String,
    pub duration: String,
}

/// Render the dynamic section for `reference`.
///
/// Duration sentence, blank separator, ages sentence, and a celebratory
/// line when the reference month is a partner's birth month. The block
/// always ends with exactly one trailing newline. Pure; cannot fail.
#[must_use]
pub fn render_block(couple: &Couple, reference: DateTime<Utc>) -> RenderedBlock {
    let duration = ElapsedBreakdown::between(couple.start, reference).humanize();
    let today = reference.date_naive();
    let [first, second] = &couple.partners;

    let mut text = format!("We have been together for **{duration}**.\n\n");
    let _ = writeln!(
        text,
        "{} is **{}** years old, and {} is **{}** years old.",
        first.name,
        age_on(first.born, today),
        second.name,
        age_on(second.born, today),
    );

    let birthday_month = couple
        .partners
        .iter()
        .any(|p| p.born.month() == reference.month());
    if birthday_month {
        text.push_str("\nIt's our birthday month! \u{1f389}\n");
    }

    RenderedBlock { text, duration }
}
