//! Consignee summary: party names, addresses and bill-of-lading numbers.
//!
//! Stateless. Every `N1`/`N3`/`N4` line is reported whatever its qualifier,
//! which makes this style useful for feeds that are not 204 tenders.

use tracing::debug;

use crate::edi::segment::Segment;

pub fn summarize_consignee(segments: &[Segment]) -> String {
    let mut output = String::from("\n");

    for segment in segments {
        let line = match segment.tag() {
            "N1" => segment.field(2).map(|name| name.trim().to_string()),
            "N3" => segment.field(1).map(|street| street.trim().to_string()),
            "N4" => match (segment.field(1), segment.field(2), segment.field(3)) {
                (Some(city), Some(state), Some(zip)) => Some(format!(
                    "{}, {} {}",
                    city.trim(),
                    state.trim(),
                    zip.trim()
                )),
                _ => None,
            },
            "N9" if segment.field(1) == Some("BM") => segment
                .field(2)
                .map(|bol| format!("BOL: {}", bol.trim())),
            _ => continue,
        };

        match line {
            Some(line) => {
                output.push('\n');
                output.push_str(&line);
            }
            None => debug!(tag = segment.tag(), fields = segment.len(), "Skipping short segment"),
        }
    }

    output
}
