pub mod anchor;
pub mod pattern;
pub mod types;

pub use anchor::AnchorExtractor;
pub use pattern::PatternExtractor;
pub use types::{Extraction, ExtractorKind, FieldExtractor, RawFields};

/// Pick an extraction strategy by content sniffing: if the leading lines
/// follow the full positional layout the strict pattern extractor is used,
/// otherwise the tolerant anchor search.
pub fn sniff(contents: &str) -> ExtractorKind {
    if PatternExtractor::detect(contents) {
        ExtractorKind::Pattern
    } else {
        ExtractorKind::Anchor
    }
}

/// Build the extractor for a strategy.
pub fn build(kind: ExtractorKind) -> Box<dyn FieldExtractor> {
    match kind {
        ExtractorKind::Anchor => Box::new(AnchorExtractor::new()),
        ExtractorKind::Pattern => Box::new(PatternExtractor::new()),
    }
}
