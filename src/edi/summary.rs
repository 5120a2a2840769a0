//! Tender summarizer: the per-record state machine.
//!
//! Walks the segments once, left to right, appending one line per reported
//! segment. Totals and the seen-PO set belong to the current transaction and
//! are cleared at every `SE`.

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::edi::date::format_edi_date;
use crate::edi::segment::{Segment, SegmentKind};
use crate::error::ParseError;

/// Placeholder for marker-located fields that are absent.
pub const NO_INFO: &str = "No info provided.";

/// Marker preceding (S5) or following (OID) the case count.
const CASES_MARKER: &str = "CA";
/// Marker preceding (S5) or following (OID) the weight in pounds.
const WEIGHT_MARKER: &str = "L";

/// State scoped to one `ST`…`SE` transaction.
#[derive(Debug, Default)]
struct TransactionState {
    totals_recorded: bool,
    seen_pos: HashSet<String>,
}

impl TransactionState {
    fn reset(&mut self) {
        self.totals_recorded = false;
        self.seen_pos.clear();
    }
}

/// Build the tender summary for one record.
///
/// Fails only on input the report cannot represent honestly: a missing
/// positional field, a malformed date, or a ship-to block cut short.
pub fn summarize_tender(segments: &[Segment]) -> Result<String, ParseError> {
    let mut state = TransactionState::default();
    let mut output = String::new();
    let mut index = 0;

    while index < segments.len() {
        let segment = &segments[index];
        let kind = SegmentKind::classify(segment);
        trace!(index, tag = segment.tag(), kind = kind.label(), "Dispatch segment");

        match kind {
            SegmentKind::TransactionStart { control } => {
                debug!(control, "Transaction start");
                output.push_str(&format!("\n\nNew Record: {control}\n"));
            }
            SegmentKind::WarehouseLink(reference) => {
                output.push_str(&format!("Warehouse Link: {reference}\n"));
            }
            SegmentKind::MasterBill(reference) => {
                output.push_str(&format!("Master Bill: {reference}\n"));
            }
            SegmentKind::StopTotals => {
                if !state.totals_recorded {
                    let cases = segment.before_marker(CASES_MARKER).unwrap_or(NO_INFO);
                    let weight = segment.before_marker(WEIGHT_MARKER).unwrap_or(NO_INFO);
                    output.push_str(&format!(
                        "Total Cases: {cases}\nTotal Weight: {weight}\n"
                    ));
                    state.totals_recorded = true;
                }
            }
            SegmentKind::Date(qualifier) => {
                let date = format_edi_date(segment.require(2)?.trim())?;
                output.push_str(&format!("{}: {date}\n", qualifier.label()));
            }
            SegmentKind::Order => {
                let bol = segment.require(1)?;
                let po = segment.require(2)?;
                if state.seen_pos.insert(po.to_string()) {
                    let cases = segment.after_marker(CASES_MARKER).unwrap_or(NO_INFO);
                    let weight = segment.after_marker(WEIGHT_MARKER).unwrap_or(NO_INFO);
                    output.push_str(&format!(
                        "Order: BOL {bol} | PO {po} | PCS {cases} | LBS {weight}\n"
                    ));
                } else {
                    debug!(po, "Skipping repeated purchase order");
                }
            }
            SegmentKind::ShipTo => {
                output.push_str(&ship_to_block(segments, index)?);
                // Street and city lines were consumed as lookahead.
                index += 2;
            }
            SegmentKind::TransactionEnd => {
                debug!(orders = state.seen_pos.len(), "Transaction end");
                state.reset();
            }
            SegmentKind::Ignored => {}
        }

        index += 1;
    }

    Ok(output)
}

/// Format the `Deliver To:` block for the `N1*ST` segment at `index`.
///
/// Nothing is returned unless the whole block can be built.
fn ship_to_block(segments: &[Segment], index: usize) -> Result<String, ParseError> {
    let name = segments[index].require(2)?;

    let (Some(street), Some(location)) = (segments.get(index + 1), segments.get(index + 2))
    else {
        return Err(ParseError::TruncatedAddress {
            name: name.to_string(),
            available: segments.len() - index - 1,
        });
    };

    let address = address_field(street, 1)?;
    let city = address_field(location, 1)?;
    let state = address_field(location, 2)?;
    let zip = address_field(location, 3)?;

    Ok(format!(
        "Deliver To:\n{name}\n{address}\n{city}, {state} {zip}\n"
    ))
}

fn address_field(segment: &Segment, index: usize) -> Result<&str, ParseError> {
    segment
        .field(index)
        .ok_or_else(|| ParseError::MalformedAddress {
            tag: segment.tag().to_string(),
            index,
        })
}
