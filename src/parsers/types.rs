use serde::Serialize;

/// Raw field substrings located on one log line, before any type coercion.
///
/// Every field is optional: the anchor extractor fills in whatever it could
/// locate, the pattern extractor fills either the full base or extended set.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RawFields {
    pub time: Option<String>,
    pub head: Option<String>,
    pub category: Option<String>,
    pub bl: Option<String>,
    pub ar: Option<String>,
    pub cad_id: Option<String>,
    pub pos_x: Option<String>,
    pub pos_y: Option<String>,
    pub touch_z: Option<String>,
    pub act_gf: Option<String>,
    pub target_gf: Option<String>,
    pub dbg: Option<String>,
    pub c_value: Option<String>,
    pub touch_time1: Option<String>,
    pub touch_time2: Option<String>,
}

/// Outcome of running a field extractor over a single line.
#[derive(Clone, Debug, PartialEq)]
pub enum Extraction {
    /// The line is a calibration log line; carries whatever fields were found.
    Extracted(RawFields),
    /// The line is irrelevant to the calibration log format.
    NotMatched,
}

impl Extraction {
    /// Consume the extraction, yielding the fields if the line matched.
    pub fn fields(self) -> Option<RawFields> {
        match self {
            Extraction::Extracted(fields) => Some(fields),
            Extraction::NotMatched => None,
        }
    }
}

/// Trait for per-line field extractors
pub trait FieldExtractor {
    fn extract(&self, line: &str) -> Extraction;
}

/// Supported extraction strategies
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ExtractorKind {
    /// Ordered substring anchor search, tolerant of missing trailing fields
    #[default]
    Anchor,
    /// Single full-line pattern match, all fields in one shot
    Pattern,
}

impl ExtractorKind {
    pub fn name(&self) -> &'static str {
        match self {
            ExtractorKind::Anchor => "anchor",
            ExtractorKind::Pattern => "pattern",
        }
    }
}
