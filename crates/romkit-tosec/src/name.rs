//! TOSEC file name grammar.
//!
//! A catalogued file is named
//! `Title (Date)(Publisher)(options...)[flags...].ext`. Parsing runs in two
//! passes: a fixed pattern extracts title, date, publisher and format, then
//! the text between the publisher group and the extension is scanned for
//! bracketed flags and parenthesized options.
//!
//! The remainder is located by searching for the last `(Publisher)` in the
//! name. A publisher that itself contains parentheses is cut at its first
//! `)`, so the remainder starts inside the real publisher group and may
//! begin with its tail (`Foo (UK))(Europe)` yields publisher `Foo (UK` and
//! remainder `)(Europe)`). If the last `(Publisher)` lies at or past the
//! extension dot, the remainder is empty and no flags or options are
//! reported.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use romkit_core::ParseError;

static MAIN_DATA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*?) \((.*?)\)\((.*?)\).*\.(.*)$").unwrap());
static FLAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[(.*?)\]").unwrap());
static OPTION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\((.*?)\)").unwrap());

/// Two-letter language codes recognised in option groups.
pub const LANGUAGE_CODES: &[&str] = &[
    "en", "fr", "de", "es", "it", "ja", "zh", "ko", "pt", "ru", "nl", "pl", "sv", "no", "da", "fi",
    "tr", "ar", "he", "hi", "th", "vi", "id", "ms", "cs", "hu", "ro", "bg", "el", "uk", "hr", "sk",
    "sl", "lt", "lv", "et", "fa", "ur",
];

/// Release region named in an option group.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
pub enum Region {
    Japan,
    #[strum(serialize = "USA")]
    #[serde(rename = "USA")]
    Usa,
    Europe,
    World,
    International,
    Asia,
    Australia,
    Brazil,
    China,
    Korea,
    Taiwan,
}

/// Metadata decoded from one TOSEC file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TosecFile {
    /// The original file name.
    pub file_name: String,
    pub title: String,
    /// Release date as written (`1987`, `19xx`, `1990-05-12`...).
    pub date: String,
    pub publisher: String,
    /// Container format: the text after the last `.`.
    pub format: String,
    /// Bracketed flags in the order they appear.
    pub flags: Vec<String>,
    /// First option group naming a region.
    pub region: Option<Region>,
    /// First option group holding a language code or code pair.
    pub language: Option<String>,
}

impl TosecFile {
    /// Check if a flag is present.
    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.iter().any(|f| f == flag)
    }
}

impl FromStr for TosecFile {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_file_name(s)
    }
}

/// Parse a file name according to the TOSEC naming convention.
pub fn parse_file_name(file_name: &str) -> Result<TosecFile, ParseError> {
    let invalid = || ParseError::InvalidFormat {
        file_name: file_name.to_string(),
    };

    let caps = MAIN_DATA.captures(file_name).ok_or_else(invalid)?;
    let group = |i: usize| caps.get(i).map_or("", |m| m.as_str());

    let title = group(1).trim();
    let date = group(2).trim();
    let raw_publisher = group(3);
    let publisher = raw_publisher.trim();
    let format = group(4).trim();
    if title.is_empty() || date.is_empty() || publisher.is_empty() || format.is_empty() {
        return Err(invalid());
    }

    // Group 4 starts right after the final '.'.
    let suffix_start = caps.get(4).map_or(file_name.len(), |m| m.start() - 1);
    let rest = remainder(file_name, raw_publisher, suffix_start);

    let flags = bracketed(&FLAG, rest);
    let (region, language) = classify_options(bracketed(&OPTION, rest));

    Ok(TosecFile {
        file_name: file_name.to_string(),
        title: title.to_string(),
        date: date.to_string(),
        publisher: publisher.to_string(),
        format: format.to_string(),
        flags,
        region,
        language,
    })
}

/// Text between the last `(publisher)` and `suffix_start`, or `""`.
fn remainder<'a>(file_name: &'a str, publisher: &str, suffix_start: usize) -> &'a str {
    let needle = format!("({publisher})");
    let Some(idx) = file_name.rfind(&needle) else {
        return "";
    };
    let start = idx + needle.len();
    if start >= suffix_start || suffix_start > file_name.len() {
        return "";
    }
    &file_name[start..suffix_start]
}

fn bracketed(pattern: &Regex, text: &str) -> Vec<String> {
    pattern
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .collect()
}

/// Assign the first region and the first language found, in scan order.
fn classify_options(options: Vec<String>) -> (Option<Region>, Option<String>) {
    let mut region = None;
    let mut language = None;

    for option in options {
        if region.is_none()
            && let Ok(r) = option.parse::<Region>()
        {
            region = Some(r);
            continue;
        }
        if language.is_none() && is_language(&option) {
            language = Some(option);
        }
    }

    (region, language)
}

/// `en`, or two codes joined by a hyphen such as `en-de`.
pub fn is_language(option: &str) -> bool {
    let is_code = |code: &str| LANGUAGE_CODES.contains(&code);
    match option.split_once('-') {
        Some((first, second)) => is_code(first) && is_code(second),
        None => is_code(option),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remainder_between_publisher_and_extension() {
        let name = "Zynaps (1987)(Hewson Consultants)(Europe)[a].zip";
        let caps = MAIN_DATA.captures(name).unwrap();
        let suffix_start = caps.get(4).unwrap().start() - 1;
        assert_eq!(remainder(name, "Hewson Consultants", suffix_start), "(Europe)[a]");
    }

    #[test]
    fn test_remainder_missing_publisher_is_empty() {
        assert_eq!(remainder("Game (1990)(Pub).zip", "Other", 15), "");
    }

    #[test]
    fn test_remainder_degenerate_bounds_is_empty() {
        let name = "Game (1990)(Pub).zip";
        assert_eq!(remainder(name, "Pub", 16), "");
        assert_eq!(remainder(name, "Pub", 100), "");
    }

    #[test]
    fn test_is_language() {
        assert!(is_language("en"));
        assert!(is_language("en-de"));
        assert!(!is_language("EN"));
        assert!(!is_language("en-de-fr"));
        assert!(!is_language("xx"));
        assert!(!is_language("english"));
    }

    #[test]
    fn test_region_text() {
        assert_eq!("USA".parse::<Region>().unwrap(), Region::Usa);
        assert_eq!(Region::Usa.to_string(), "USA");
        assert_eq!(Region::Europe.to_string(), "Europe");
        assert!("europe".parse::<Region>().is_err());
    }

    #[test]
    fn test_first_match_wins() {
        let options = vec![
            "PAL".to_string(),
            "de".to_string(),
            "Japan".to_string(),
            "Europe".to_string(),
            "en".to_string(),
        ];
        let (region, language) = classify_options(options);
        assert_eq!(region, Some(Region::Japan));
        assert_eq!(language.as_deref(), Some("de"));
    }
}
