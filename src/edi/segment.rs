//! Segments and tag classification.
//!
//! A segment is the `*`-delimited field group between two terminators. The
//! first field is the tag; everything after it is positional and only means
//! something once the tag (and sometimes a qualifier) is known.

use crate::error::ParseError;

/// Separator between the fields of one segment.
pub const FIELD_SEPARATOR: char = '*';

/// An immutable, ordered list of fields. Field 0 is the tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    fields: Vec<String>,
}

impl Segment {
    /// Split a single segment's text into fields.
    pub fn parse(raw: &str) -> Self {
        Self {
            fields: raw.split(FIELD_SEPARATOR).map(str::to_string).collect(),
        }
    }

    /// The segment tag (`ST`, `S5`, `OID`, ...).
    pub fn tag(&self) -> &str {
        self.fields.first().map(String::as_str).unwrap_or_default()
    }

    /// Field at `index`, where index 0 is the tag.
    pub fn field(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }

    /// Field at `index`, or a `MissingField` error naming this segment's tag.
    pub fn require(&self, index: usize) -> Result<&str, ParseError> {
        self.field(index).ok_or_else(|| ParseError::MissingField {
            tag: self.tag().to_string(),
            index,
        })
    }

    /// The last field. For a bare tag this is the tag itself.
    pub fn last(&self) -> &str {
        self.fields.last().map(String::as_str).unwrap_or_default()
    }

    pub(crate) fn len(&self) -> usize {
        self.fields.len()
    }

    /// Index of the first field equal to `marker`, ignoring the tag.
    pub fn position(&self, marker: &str) -> Option<usize> {
        self.fields
            .iter()
            .skip(1)
            .position(|f| f == marker)
            .map(|i| i + 1)
    }

    /// Field immediately before the first `marker` field.
    pub fn before_marker(&self, marker: &str) -> Option<&str> {
        let index = self.position(marker)?;
        self.field(index - 1)
    }

    /// Field immediately after the first `marker` field.
    pub fn after_marker(&self, marker: &str) -> Option<&str> {
        let index = self.position(marker)?;
        self.field(index + 1)
    }
}

// ── Classification ──────────────────────────────────────────────────

/// `G62` date qualifiers that appear in a tender summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateQualifier {
    ShipBy,
    Pickup,
    Delivery,
    WindowStart,
    WindowEnd,
}

impl DateQualifier {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "38" => Some(Self::ShipBy),
            "77" => Some(Self::Pickup),
            "70" => Some(Self::Delivery),
            "53" => Some(Self::WindowStart),
            "54" => Some(Self::WindowEnd),
            _ => None,
        }
    }

    /// Label printed before the formatted date.
    pub fn label(&self) -> &'static str {
        match self {
            Self::ShipBy => "Ship by",
            Self::Pickup => "Pickup Date",
            Self::Delivery => "Delivery Date",
            Self::WindowStart => "Delivery Window Start",
            Self::WindowEnd => "Delivery Window End",
        }
    }
}

/// What a segment means to the tender summarizer.
///
/// Anything the summarizer does not report on maps to `Ignored`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind<'a> {
    /// `ST*204*...`; carries the last field (the control number).
    TransactionStart { control: &'a str },
    /// `L11*<ref>*WH`
    WarehouseLink(&'a str),
    /// `L11*<ref>*MB`
    MasterBill(&'a str),
    /// `S5` stop-off details holding case and weight totals.
    StopTotals,
    /// `G62*<qualifier>*<date>` for a reported qualifier.
    Date(DateQualifier),
    /// `OID` order line.
    Order,
    /// `N1*ST*<name>`, followed by the address and city lines.
    ShipTo,
    /// `SE`
    TransactionEnd,
    Ignored,
}

impl<'a> SegmentKind<'a> {
    pub fn classify(segment: &'a Segment) -> Self {
        match (segment.tag(), segment.field(1)) {
            ("ST", Some("204")) => Self::TransactionStart {
                control: segment.last(),
            },
            ("L11", Some(reference)) => match segment.last() {
                "WH" => Self::WarehouseLink(reference),
                "MB" => Self::MasterBill(reference),
                _ => Self::Ignored,
            },
            ("S5", _) => Self::StopTotals,
            ("G62", Some(code)) => DateQualifier::from_code(code)
                .map(Self::Date)
                .unwrap_or(Self::Ignored),
            ("OID", _) => Self::Order,
            ("N1", Some("ST")) => Self::ShipTo,
            ("SE", _) => Self::TransactionEnd,
            _ => Self::Ignored,
        }
    }

    /// Short label for logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::TransactionStart { .. } => "transaction_start",
            Self::WarehouseLink(_) => "warehouse_link",
            Self::MasterBill(_) => "master_bill",
            Self::StopTotals => "stop_totals",
            Self::Date(_) => "date",
            Self::Order => "order",
            Self::ShipTo => "ship_to",
            Self::TransactionEnd => "transaction_end",
            Self::Ignored => "ignored",
        }
    }
}
