use regex::{Captures, Regex};

use super::types::{Extraction, FieldExtractor, RawFields};

/// Positional layout shared by both line variants: date-time, head, category
/// phrase, Bl/Ar/CadID, a nozzle tag word, then the three coordinates. Field
/// separators are whitespace runs of any length.
const LAYOUT_PREFIX: &str = r"^\s*(?P<time>\d{4}/\d{2}/\d{2}\s+\d{2}:\d{2}:\d{2}(?:\.\d+)?)\s+Head:\s*(?P<head>\d+)\s+(?P<category>[A-Za-z]+)\s+Bl:(?P<bl>\S+)\s+Ar:(?P<ar>\S+)\s+CadID:(?P<cad_id>\S+)\s+\S+\s+PosX:(?P<pos_x>-?\d+(?:\.\d+)?)\s+PosY:(?P<pos_y>-?\d+(?:\.\d+)?)\s+TouchZ:(?P<touch_z>-?\d+(?:\.\d+)?)";

/// Extra columns of the richer log variant: a constant `100` column, actual
/// and target grip force, a debug word, a letter+number token and the two
/// touch-time integers.
const LAYOUT_EXTENDED_TAIL: &str = r"\s+100\s+Act\(gf\):(?P<act_gf>-?\d+(?:\.\d+)?)\s+Target\(gf\):(?P<target_gf>-?\d+(?:\.\d+)?)\s+Dbg:(?P<dbg>\S+)\s+(?P<c_value>[A-Za-z]+\d+)\s+TouchTime:(?P<touch_time1>\d+)\s+(?P<touch_time2>\d+)\s*$";

/// Full-pattern field extractor.
///
/// Matches the entire line against one fixed positional pattern. The extended
/// layout is tried first, then the base layout; a line either matches a
/// layout wholly, producing every field in one shot, or yields `NotMatched`.
/// There is no partial capture.
pub struct PatternExtractor {
    base: Regex,
    extended: Regex,
}

impl PatternExtractor {
    pub fn new() -> Self {
        Self {
            base: Regex::new(&format!(r"{LAYOUT_PREFIX}\s*$"))
                .expect("Failed to compile regex"),
            extended: Regex::new(&format!(r"{LAYOUT_PREFIX}{LAYOUT_EXTENDED_TAIL}"))
                .expect("Failed to compile regex"),
        }
    }

    /// Detect whether any of the leading lines of `contents` follows the
    /// full positional layout.
    pub fn detect(contents: &str) -> bool {
        let extractor = Self::new();
        contents
            .lines()
            .filter(|line| !line.trim().is_empty())
            .take(50)
            .any(|line| extractor.extract(line) != Extraction::NotMatched)
    }

    fn capture(captures: &Captures<'_>, name: &str) -> Option<String> {
        captures.name(name).map(|m| m.as_str().to_string())
    }

    fn to_fields(captures: &Captures<'_>) -> RawFields {
        RawFields {
            time: Self::capture(captures, "time"),
            head: Self::capture(captures, "head"),
            category: Self::capture(captures, "category")
                .map(|c| c.trim().to_string()),
            bl: Self::capture(captures, "bl"),
            ar: Self::capture(captures, "ar"),
            cad_id: Self::capture(captures, "cad_id"),
            pos_x: Self::capture(captures, "pos_x"),
            pos_y: Self::capture(captures, "pos_y"),
            touch_z: Self::capture(captures, "touch_z"),
            act_gf: Self::capture(captures, "act_gf"),
            target_gf: Self::capture(captures, "target_gf"),
            dbg: Self::capture(captures, "dbg"),
            c_value: Self::capture(captures, "c_value"),
            touch_time1: Self::capture(captures, "touch_time1"),
            touch_time2: Self::capture(captures, "touch_time2"),
        }
    }
}

impl Default for PatternExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for PatternExtractor {
    fn extract(&self, line: &str) -> Extraction {
        // Extended first: the base layout is a prefix of the extended one.
        if let Some(captures) = self.extended.captures(line) {
            return Extraction::Extracted(Self::to_fields(&captures));
        }
        if let Some(captures) = self.base.captures(line) {
            return Extraction::Extracted(Self::to_fields(&captures));
        }
        Extraction::NotMatched
    }
}
