//! Heuristic resume field extractor.
//!
//! Pure and synchronous: the same text always yields the same record. Each field
//! is an ordered list of strategies and the first one that produces a value wins;
//! later strategies are never consulted, even if they would match "better".

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::resume::models::{Extraction, ParsedResumeData, ResumeField};
use crate::resume::scoring::fallback_confidence;

const NAME_SCAN_LINES: usize = 3;
const NAME_MAX_CHARS: usize = 60;

const SKILLS_HEADING_FOLLOWING_LINES: usize = 8;
const SKILLS_PHRASE_FOLLOWING_LINES: usize = 3;
const SKILL_MIN_CHARS: usize = 2;
const SKILL_MAX_CHARS: usize = 29;
const MAX_SKILLS: usize = 15;

const SUMMARY_FOLLOWING_LINES: usize = 6;
const SUMMARY_SECTION_MAX_CHARS: usize = 400;
const SUMMARY_PARAGRAPH_MAX_CHARS: usize = 300;
const SUMMARY_PARAGRAPH_MIN_LEN: usize = 50;
const SUMMARY_PARAGRAPH_MAX_LEN: usize = 500;
const SUMMARY_PARAGRAPH_FORBIDDEN: &[&str] = &["@", "phone", "address", "resume"];

const HISTORY_FOLLOWING_LINES: usize = 6;
const HISTORY_MAX_CHARS: usize = 500;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}").unwrap());

static PHONE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        // Labelled: "Phone: ...", "Tel. ...", "Mobile ...", "Call ..."
        Regex::new(r"(?i)\b(?:telephone|phone|tel|mobile|call)\b[ ]*[:.]?[ ]*([+\d\s\-().]{10,})")
            .unwrap(),
        // North American: (NNN) NNN-NNNN with optional +1
        Regex::new(r"(?:\+1[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}\b").unwrap(),
        // International digit groups
        Regex::new(r"\+?\d{1,3}[-.\s]?\d{3,4}[-.\s]?\d{3,4}[-.\s]?\d{3,4}").unwrap(),
    ]
});

static NAME_LINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\p{L}\s'.\-]+$").unwrap());
static NAME_STOPWORDS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:resume|cv|phone|tel|www)\b").unwrap());
static NAME_LABEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)\b(?:full[ \t]+name|name)[ \t]*:[ \t]*(\p{L}[\p{L} \t]*)").unwrap()
});

const US_CITIES: &[&str] = &[
    "New York",
    "Los Angeles",
    "Chicago",
    "Houston",
    "Phoenix",
    "Philadelphia",
    "San Antonio",
    "San Diego",
    "Dallas",
    "San Jose",
    "Austin",
    "Jacksonville",
    "Fort Worth",
    "Columbus",
    "Charlotte",
    "San Francisco",
    "Indianapolis",
    "Seattle",
    "Denver",
    "Washington",
    "Boston",
    "El Paso",
    "Nashville",
    "Detroit",
    "Oklahoma City",
    "Portland",
    "Las Vegas",
    "Memphis",
    "Louisville",
    "Baltimore",
    "Milwaukee",
    "Albuquerque",
    "Tucson",
    "Fresno",
    "Sacramento",
    "Mesa",
    "Kansas City",
    "Atlanta",
    "Omaha",
    "Colorado Springs",
    "Raleigh",
    "Miami",
    "Long Beach",
    "Virginia Beach",
    "Oakland",
    "Minneapolis",
    "Tulsa",
    "Tampa",
    "Arlington",
    "New Orleans",
];

static LOCATION_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        // Labelled street address
        Regex::new(
            r"(?im)\b(?:address|location)[ \t]*:[ \t]*([^\n]*\b(?:street|st|avenue|ave|road|rd|boulevard|blvd|lane|ln|drive|dr|court|ct|way|place|pl|suite)\b[^\n]*)",
        )
        .unwrap(),
        // City, ST 12345
        Regex::new(r"\b([A-Z][a-zA-Z.]*(?:[ ][A-Z][a-zA-Z.]*)*,[ ]*[A-Z]{2}[ ]+\d{5}(?:-\d{4})?)\b")
            .unwrap(),
        // City, ST
        Regex::new(r"\b([A-Z][a-zA-Z.]*(?:[ ][A-Z][a-zA-Z.]*)*,[ ]*[A-Z]{2})\b").unwrap(),
        // "X City", "X State", "X Province", "X Country"
        Regex::new(r"\b([A-Z][a-zA-Z]*(?:[ ][A-Z][a-zA-Z]*)*[ ](?:City|State|Province|Country))\b")
            .unwrap(),
        // Known US city followed by a state code
        Regex::new(&format!(
            r"\b((?:{})[ ]*,?[ ]*[A-Z]{{2}})\b",
            US_CITIES.join("|")
        ))
        .unwrap(),
    ]
});

/// Up to two title-case words before a heading keyword ("Key Skills",
/// "Areas of Expertise", "Executive Summary").
const HEADING_PREFIX: &str = r"(?:\p{Lu}[\p{L}&]*[ \t]+(?:(?i:of|and|&)[ \t]+)?){0,2}";

/// Line-anchored heading: optional bullet, optional title-case prefix, then one
/// of the case-insensitive `keywords`.
fn heading_regex(keywords: &str) -> Regex {
    Regex::new(&format!(
        r"(?m)^[ \t]*(?:[•*▪·\-][ \t]*)?{HEADING_PREFIX}(?i:{keywords})\b"
    ))
    .unwrap()
}

static SKILLS_HEADING_RE: Lazy<Regex> = Lazy::new(|| {
    heading_regex(
        r"technical[ \t]+skills|programming[ \t]+languages|skills|technologies|competencies|expertise|proficiencies",
    )
});
static SKILLS_PHRASE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:proficient[ \t]+in|experienced[ \t]+with|knowledge[ \t]+of)\b").unwrap()
});
static SKILL_SEPARATOR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[,|•·▪*\-–\s]+").unwrap());

static SUMMARY_HEADING_RE: Lazy<Regex> =
    Lazy::new(|| heading_regex(r"summary|objective|profile|about|overview"));
static SUMMARY_LONG_HEADING_RE: Lazy<Regex> = Lazy::new(|| {
    heading_regex(r"professional[ \t]+summary|career[ \t]+objective|personal[ \t]+statement")
});

static EXPERIENCE_HEADING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?im)^[ \t]*(?:work[ \t]+experience|professional[ \t]+experience|employment[ \t]+history|work[ \t]+history|experience)\b",
    )
    .unwrap()
});
static EDUCATION_HEADING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^[ \t]*(?:education|academic[ \t]+background)\b").unwrap()
});

/// A line that opens a new resume section and therefore ends a captured block.
static SECTION_HEADING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?:work\s+experience|professional\s+experience|experience|employment|work\s+history|education|academic\s+background|projects|certifications?|professional\s+summary|summary|career\s+objective|objective|profile|overview|technical\s+skills|skills|interests|hobbies|references|awards|publications|achievements)\b",
    )
    .unwrap()
});

/// Working views over the input text.
struct ResumeText {
    /// Input with line endings normalised to `\n`.
    raw: String,
    /// Every whitespace run collapsed to one space.
    clean: String,
}

impl ResumeText {
    fn new(text: &str) -> Self {
        let raw = text.replace("\r\n", "\n").replace('\r', "\n");
        let clean = collapse_whitespace(&raw);
        Self { raw, clean }
    }

    /// Non-empty trimmed lines.
    fn lines(&self) -> impl Iterator<Item = &str> {
        self.raw.lines().map(str::trim).filter(|l| !l.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq)]
struct PersonName {
    first: String,
    last: String,
}

impl PersonName {
    /// First word becomes the first name, the remaining words the last name.
    /// Needs at least two words.
    fn from_words(text: &str) -> Option<Self> {
        let mut words = text.split_whitespace();
        let first = words.next()?;
        let rest: Vec<&str> = words.collect();
        if rest.is_empty() {
            return None;
        }
        Some(Self {
            first: first.to_string(),
            last: rest.join(" "),
        })
    }
}

type Strategy<T> = fn(&ResumeText) -> Option<T>;

const NAME_STRATEGIES: &[Strategy<PersonName>] = &[name_from_leading_lines, name_from_label];
const SKILLS_STRATEGIES: &[Strategy<Vec<String>>] = &[skills_from_heading, skills_from_phrase];
const SUMMARY_STRATEGIES: &[Strategy<String>] = &[
    summary_from_heading,
    summary_from_long_heading,
    summary_from_paragraph,
];

/// Runs `strategies` in order and returns the first value produced.
fn first_match<T>(doc: &ResumeText, strategies: &[Strategy<T>]) -> Option<T> {
    strategies.iter().find_map(|strategy| strategy(doc))
}

/// Extracts a `ParsedResumeData` from raw resume text. Never fails: unmatched
/// fields keep their placeholders and the confidence drops accordingly.
pub fn extract(text: &str) -> ParsedResumeData {
    extract_with_matches(text).data
}

/// Like [`extract`], additionally reporting which scored fields were not found.
pub fn extract_with_matches(text: &str) -> Extraction {
    let doc = ResumeText::new(text);
    let mut data = ParsedResumeData::default();
    let mut missing_fields = Vec::new();

    match first_match(&doc, NAME_STRATEGIES) {
        Some(name) => {
            data.first_name = name.first;
            data.last_name = name.last;
        }
        None => missing_fields.push(ResumeField::Name),
    }

    match extract_email(&doc) {
        Some(email) => data.email = email,
        None => missing_fields.push(ResumeField::Email),
    }

    match extract_phone(&doc) {
        Some(phone) => data.phone = phone,
        None => missing_fields.push(ResumeField::Phone),
    }

    match extract_location(&doc) {
        Some(location) => data.location = location,
        None => missing_fields.push(ResumeField::Location),
    }

    match first_match(&doc, SKILLS_STRATEGIES) {
        Some(skills) => data.skills = skills,
        None => missing_fields.push(ResumeField::Skills),
    }

    match first_match(&doc, SUMMARY_STRATEGIES) {
        Some(summary) => data.summary = summary,
        None => missing_fields.push(ResumeField::Summary),
    }

    if let Some(experience) = history_section(&doc, &EXPERIENCE_HEADING_RE) {
        data.experience = experience;
    }
    if let Some(education) = history_section(&doc, &EDUCATION_HEADING_RE) {
        data.education = education;
    }

    let mut extraction = Extraction {
        data,
        missing_fields,
    };
    extraction.data.confidence = fallback_confidence(extraction.fields_found());

    debug!(
        "Heuristic extraction matched {}/{} fields (confidence {:.2}), missing: {:?}",
        extraction.fields_found(),
        ResumeField::ALL.len(),
        extraction.data.confidence,
        extraction.missing_fields
    );

    extraction
}

// ────────────────────────────────────────────────────────────────────────────
// Contact details
// ────────────────────────────────────────────────────────────────────────────

fn extract_email(doc: &ResumeText) -> Option<String> {
    EMAIL_RE.find(&doc.clean).map(|m| m.as_str().to_string())
}

fn extract_phone(doc: &ResumeText) -> Option<String> {
    PHONE_PATTERNS.iter().find_map(|regex| {
        let caps = regex.captures(&doc.clean)?;
        let matched = caps.get(1).or_else(|| caps.get(0))?;
        let phone = tidy_phone(matched.as_str());
        (!phone.is_empty()).then_some(phone)
    })
}

/// Collapses internal whitespace and drops trailing separators picked up by
/// the labelled pattern.
fn tidy_phone(raw: &str) -> String {
    collapse_whitespace(raw)
        .trim_end_matches(|c: char| !c.is_ascii_digit())
        .to_string()
}

fn extract_location(doc: &ResumeText) -> Option<String> {
    LOCATION_PATTERNS.iter().find_map(|regex| {
        let caps = regex.captures(&doc.raw)?;
        let location = caps.get(1)?.as_str().trim();
        (!location.is_empty()).then(|| location.to_string())
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Name
// ────────────────────────────────────────────────────────────────────────────

fn name_from_leading_lines(doc: &ResumeText) -> Option<PersonName> {
    doc.lines().take(NAME_SCAN_LINES).find_map(|line| {
        if line.chars().count() >= NAME_MAX_CHARS
            || line.contains('@')
            || NAME_STOPWORDS_RE.is_match(line)
            || !NAME_LINE_RE.is_match(line)
        {
            return None;
        }
        PersonName::from_words(line)
    })
}

fn name_from_label(doc: &ResumeText) -> Option<PersonName> {
    let caps = NAME_LABEL_RE.captures(&doc.raw)?;
    PersonName::from_words(caps.get(1)?.as_str())
}

// ────────────────────────────────────────────────────────────────────────────
// Skills
// ────────────────────────────────────────────────────────────────────────────

fn skills_from_heading(doc: &ResumeText) -> Option<Vec<String>> {
    skills_from_section(doc, &SKILLS_HEADING_RE, SKILLS_HEADING_FOLLOWING_LINES)
}

fn skills_from_phrase(doc: &ResumeText) -> Option<Vec<String>> {
    skills_from_section(doc, &SKILLS_PHRASE_RE, SKILLS_PHRASE_FOLLOWING_LINES)
}

fn skills_from_section(
    doc: &ResumeText,
    label: &Regex,
    following_lines: usize,
) -> Option<Vec<String>> {
    let block = capture_section(&doc.raw, label, following_lines).join("\n");
    let skills = split_skills(&block);
    (!skills.is_empty()).then_some(skills)
}

fn split_skills(block: &str) -> Vec<String> {
    SKILL_SEPARATOR_RE
        .split(block)
        .map(|token| token.trim_matches(|c: char| matches!(c, '.' | ';' | ':' | '(' | ')')))
        .filter(|token| {
            let len = token.chars().count();
            (SKILL_MIN_CHARS..=SKILL_MAX_CHARS).contains(&len)
                && !token.chars().all(|c| c.is_ascii_digit())
        })
        .take(MAX_SKILLS)
        .map(str::to_string)
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Summary
// ────────────────────────────────────────────────────────────────────────────

fn summary_from_heading(doc: &ResumeText) -> Option<String> {
    summary_from_section(doc, &SUMMARY_HEADING_RE)
}

fn summary_from_long_heading(doc: &ResumeText) -> Option<String> {
    summary_from_section(doc, &SUMMARY_LONG_HEADING_RE)
}

fn summary_from_section(doc: &ResumeText, label: &Regex) -> Option<String> {
    let pieces = capture_section(&doc.raw, label, SUMMARY_FOLLOWING_LINES);
    if pieces.is_empty() {
        return None;
    }
    Some(truncate_chars(
        &collapse_whitespace(&pieces.join(" ")),
        SUMMARY_SECTION_MAX_CHARS,
    ))
}

/// First reasonably long prose line among lines 2–10 that is not contact info.
fn summary_from_paragraph(doc: &ResumeText) -> Option<String> {
    doc.lines()
        .skip(1)
        .take(9)
        .find(|line| {
            let len = line.chars().count();
            let lower = line.to_lowercase();
            (SUMMARY_PARAGRAPH_MIN_LEN..=SUMMARY_PARAGRAPH_MAX_LEN).contains(&len)
                && !SUMMARY_PARAGRAPH_FORBIDDEN
                    .iter()
                    .any(|word| lower.contains(word))
        })
        .map(|line| truncate_chars(line, SUMMARY_PARAGRAPH_MAX_CHARS))
}

// ────────────────────────────────────────────────────────────────────────────
// Experience / education
// ────────────────────────────────────────────────────────────────────────────

fn history_section(doc: &ResumeText, label: &Regex) -> Option<String> {
    let pieces = capture_section(&doc.raw, label, HISTORY_FOLLOWING_LINES);
    if pieces.is_empty() {
        return None;
    }
    Some(truncate_chars(&pieces.join("\n"), HISTORY_MAX_CHARS))
}

// ────────────────────────────────────────────────────────────────────────────
// Shared helpers
// ────────────────────────────────────────────────────────────────────────────

/// Captures the block that follows the first match of `label`: the rest of the
/// label's own line plus up to `following_lines` further lines. Stops early at
/// a blank line (once something was captured) or at the next section heading.
fn capture_section<'t>(raw: &'t str, label: &Regex, following_lines: usize) -> Vec<&'t str> {
    let Some(found) = label.find(raw) else {
        return Vec::new();
    };

    let after = &raw[found.end()..];
    let (label_line, rest) = after.split_once('\n').unwrap_or((after, ""));

    let mut pieces = Vec::new();
    let label_line = label_line
        .trim_start_matches(|c: char| c.is_whitespace() || matches!(c, ':' | '-' | '–' | '|'))
        .trim();
    if !label_line.is_empty() {
        pieces.push(label_line);
    }

    for line in rest.lines().take(following_lines) {
        let line = line.trim();
        if line.is_empty() {
            if pieces.is_empty() {
                continue;
            }
            break;
        }
        if SECTION_HEADING_RE.is_match(line) {
            break;
        }
        pieces.push(line);
    }

    pieces
}

fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RE.replace_all(text, " ").trim().to_string()
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
