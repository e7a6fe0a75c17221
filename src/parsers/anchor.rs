use regex::Regex;

use super::types::{Extraction, FieldExtractor, RawFields};

/// Category tokens recognized at the position following the head value.
/// Only `Place` survives normalization, but all three are located so that
/// `Flux`/`Pick` lines still extract cleanly and reject downstream.
const CATEGORY_TOKENS: &[&str] = &["Place", "Flux", "Pick"];

/// Anchor-search field extractor.
///
/// Locates fixed label substrings in a fixed order (`Head:`, the category
/// token, `PosX:`, `PosY:`, `TouchZ:`), each search starting after the end of
/// the previous label. A label bounds the value of the field before it, so a
/// missing anchor omits that field and everything downstream of it; the line
/// as a whole still extracts. Lines without `Head:` are not calibration lines
/// at all and yield `NotMatched`.
pub struct AnchorExtractor {
    /// Strips a `.ddd` fractional-seconds suffix from the time value
    fraction: Regex,
    /// Matches the touch height: a decimal with exactly 4 fractional digits
    touch_z: Regex,
}

impl AnchorExtractor {
    pub fn new() -> Self {
        Self {
            fraction: Regex::new(r"\.\d+").expect("Failed to compile regex"),
            touch_z: Regex::new(r"\d+\.\d{4}").expect("Failed to compile regex"),
        }
    }

    /// Find the earliest category token at or after `from`, returning its
    /// absolute byte offset.
    fn find_category(line: &str, from: usize) -> Option<usize> {
        CATEGORY_TOKENS
            .iter()
            .filter_map(|token| line[from..].find(token).map(|i| from + i))
            .min()
    }

    /// Find `label` at or after `from`, returning the absolute offsets of its
    /// start and of the first byte after it.
    fn label_span(line: &str, label: &str, from: usize) -> Option<(usize, usize)> {
        line[from..]
            .find(label)
            .map(|i| (from + i, from + i + label.len()))
    }
}

impl Default for AnchorExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for AnchorExtractor {
    fn extract(&self, line: &str) -> Extraction {
        let Some(head_label) = line.find("Head:") else {
            return Extraction::NotMatched;
        };

        let mut fields = RawFields::default();

        // Everything before `Head:` is the time value; drop any
        // fractional-seconds suffix so both .fff and plain layouts normalize
        // to the same string.
        let time_raw = line[..head_label].trim();
        fields.time = Some(self.fraction.replace(time_raw, "").into_owned());

        let head_start = head_label + "Head:".len();
        let Some(category_at) = Self::find_category(line, head_start) else {
            return Extraction::Extracted(fields);
        };
        fields.head = Some(line[head_start..category_at].trim().to_string());

        // The category token is the 5 characters at the anchor, trimmed
        // ("Place", "Flux ", "Pick " all reduce to the bare token).
        let token: String = line[category_at..].chars().take(5).collect();
        fields.category = Some(token.trim().to_string());

        let Some((_, pos_x_start)) = Self::label_span(line, "PosX:", category_at) else {
            return Extraction::Extracted(fields);
        };
        // PosX is bounded by the PosY: label; without it PosX cannot be
        // delimited and is omitted along with everything after it.
        let Some((pos_y_label, pos_y_start)) = Self::label_span(line, "PosY:", pos_x_start) else {
            return Extraction::Extracted(fields);
        };
        fields.pos_x = Some(line[pos_x_start..pos_y_label].trim().to_string());

        let Some((touch_z_label, touch_z_start)) = Self::label_span(line, "TouchZ:", pos_y_start)
        else {
            return Extraction::Extracted(fields);
        };
        fields.pos_y = Some(line[pos_y_start..touch_z_label].trim().to_string());

        if let Some(m) = self.touch_z.find(&line[touch_z_start..]) {
            fields.touch_z = Some(m.as_str().to_string());
        }

        Extraction::Extracted(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLACE_LINE: &str = "2024/01/15 10:30:00.123 Head: 1 Place     Bl:0 Ar:0 CadID:5 X1 PosX:12.3456 PosY:7.8901 TouchZ:0.1234";

    #[test]
    fn test_extract_place_line() {
        let extractor = AnchorExtractor::new();
        let fields = extractor.extract(PLACE_LINE).fields().unwrap();

        assert_eq!(fields.time.as_deref(), Some("2024/01/15 10:30:00"));
        assert_eq!(fields.head.as_deref(), Some("1"));
        assert_eq!(fields.category.as_deref(), Some("Place"));
        assert_eq!(fields.pos_x.as_deref(), Some("12.3456"));
        assert_eq!(fields.pos_y.as_deref(), Some("7.8901"));
        assert_eq!(fields.touch_z.as_deref(), Some("0.1234"));
    }

    #[test]
    fn test_fractional_seconds_stripped() {
        let extractor = AnchorExtractor::new();
        let fields = extractor.extract(PLACE_LINE).fields().unwrap();
        assert_eq!(fields.time.as_deref(), Some("2024/01/15 10:30:00"));

        let plain = PLACE_LINE.replace(".123 Head:", " Head:");
        let fields = extractor.extract(&plain).fields().unwrap();
        assert_eq!(fields.time.as_deref(), Some("2024/01/15 10:30:00"));
    }

    #[test]
    fn test_no_head_label_is_not_matched() {
        let extractor = AnchorExtractor::new();
        assert_eq!(extractor.extract(""), Extraction::NotMatched);
        assert_eq!(
            extractor.extract("2024/01/15 10:30:00 machine started"),
            Extraction::NotMatched
        );
        assert_eq!(
            extractor.extract("PosX:1.0 PosY:2.0 TouchZ:0.1234"),
            Extraction::NotMatched
        );
    }

    #[test]
    fn test_flux_and_pick_categories_extract() {
        let extractor = AnchorExtractor::new();

        let flux = PLACE_LINE.replace("Place", "Flux ");
        let fields = extractor.extract(&flux).fields().unwrap();
        assert_eq!(fields.category.as_deref(), Some("Flux"));

        let pick = PLACE_LINE.replace("Place", "Pick ");
        let fields = extractor.extract(&pick).fields().unwrap();
        assert_eq!(fields.category.as_deref(), Some("Pick"));
    }

    #[test]
    fn test_missing_category_keeps_time_only() {
        let extractor = AnchorExtractor::new();
        let line = "2024/01/15 10:30:00 Head: 2 homing";
        let fields = extractor.extract(line).fields().unwrap();

        assert_eq!(fields.time.as_deref(), Some("2024/01/15 10:30:00"));
        assert_eq!(fields.head, None);
        assert_eq!(fields.category, None);
        assert_eq!(fields.pos_x, None);
    }

    #[test]
    fn test_missing_pos_y_omits_downstream() {
        // Without PosY: the PosX value has no right bound; PosX, PosY and
        // TouchZ must all be absent while earlier fields survive.
        let extractor = AnchorExtractor::new();
        let line = "2024/01/15 10:30:00 Head: 1 Place PosX:12.3456 TouchZ:0.1234";
        let fields = extractor.extract(line).fields().unwrap();

        assert_eq!(fields.head.as_deref(), Some("1"));
        assert_eq!(fields.category.as_deref(), Some("Place"));
        assert_eq!(fields.pos_x, None);
        assert_eq!(fields.pos_y, None);
        assert_eq!(fields.touch_z, None);
    }

    #[test]
    fn test_touch_z_requires_four_decimals() {
        let extractor = AnchorExtractor::new();
        let line = "2024/01/15 10:30:00 Head: 1 Place PosX:1.0 PosY:2.0 TouchZ:0.12";
        let fields = extractor.extract(line).fields().unwrap();
        assert_eq!(fields.touch_z, None);

        // Extra digits are truncated to the first four, as the search stops
        // after exactly four fractional digits.
        let line = "2024/01/15 10:30:00 Head: 1 Place PosX:1.0 PosY:2.0 TouchZ:0.123456";
        let fields = extractor.extract(line).fields().unwrap();
        assert_eq!(fields.touch_z.as_deref(), Some("0.1234"));
    }
}
