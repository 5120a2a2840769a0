//! Segment parsing and shipment summaries.

pub mod consignee;
pub mod date;
pub mod segment;
pub mod summary;
pub mod tokenizer;

use std::str::FromStr;

pub use consignee::summarize_consignee;
pub use date::format_edi_date;
pub use segment::{DateQualifier, Segment, SegmentKind};
pub use summary::{NO_INFO, summarize_tender};
pub use tokenizer::{RecordLayout, Tokenizer};

use crate::error::ParseError;

/// Which summary a batch produces for each record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportStyle {
    /// Transaction-aware 204 tender summary.
    #[default]
    Tender,
    /// Party names, addresses and BOL numbers only.
    Consignee,
}

impl ReportStyle {
    pub fn summarize(&self, segments: &[Segment]) -> Result<String, ParseError> {
        match self {
            Self::Tender => summarize_tender(segments),
            Self::Consignee => Ok(summarize_consignee(segments)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tender => "tender",
            Self::Consignee => "consignee",
        }
    }
}

impl FromStr for ReportStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tender" => Ok(Self::Tender),
            "consignee" => Ok(Self::Consignee),
            other => Err(format!(
                "unknown report style '{other}' (expected tender or consignee)"
            )),
        }
    }
}

/// Tokenize and summarize one record's text.
pub fn summarize_record(
    text: &str,
    tokenizer: &Tokenizer,
    style: ReportStyle,
) -> Result<String, ParseError> {
    let segments = tokenizer.tokenize(text);
    style.summarize(&segments)
}
