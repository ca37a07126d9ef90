//! Layout reconstruction: table inference, reading order and paragraph roles.

mod classifier;
mod header_footer;
mod orderer;
mod table_detector;

pub use classifier::{ClassifiedParagraph, ParagraphClassifier};
pub use header_footer::{HeaderFooterFilter, ParagraphCorpus};
pub use orderer::{ContentOrderer, PageInput, DEFAULT_TABLE_SLACK};
pub use table_detector::{
    Row, TableDetector, TableDetectorConfig, DEFAULT_MIN_LINES, DEFAULT_MIN_ROWS,
    DEFAULT_MODE_COVERAGE, DEFAULT_Y_BAND,
};
