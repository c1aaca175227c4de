//! Display metadata for rail lines.

use super::LineCode;

/// Colour used for lines without a dedicated entry.
pub const DEFAULT_LINE_COLOUR: &str = "#6366f1";

/// How a line is presented: its name and accent colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineInfo {
    /// Full line name, when known
    pub name: Option<&'static str>,
    /// Short code shown in the legend
    pub short: Option<&'static str>,
    /// CSS colour
    pub colour: &'static str,
}

/// Lines with dedicated styling, in legend order.
const KNOWN_LINES: &[(char, LineInfo)] = &[
    (
        'K',
        LineInfo {
            name: Some("Kelana Jaya Line"),
            short: Some("KJ"),
            colour: "#2563eb",
        },
    ),
    (
        'S',
        LineInfo {
            name: Some("Sri Petaling Line"),
            short: Some("SP"),
            colour: "#16a34a",
        },
    ),
];

impl LineInfo {
    /// Look up the display metadata for a line.
    pub fn for_line(line: LineCode) -> Self {
        KNOWN_LINES
            .iter()
            .find(|(c, _)| *c == line.as_char())
            .map(|(_, info)| *info)
            .unwrap_or(LineInfo {
                name: None,
                short: None,
                colour: DEFAULT_LINE_COLOUR,
            })
    }

    /// All lines with dedicated styling, for the legend.
    pub fn legend() -> impl Iterator<Item = (LineCode, LineInfo)> {
        KNOWN_LINES
            .iter()
            .map(|(c, info)| (LineCode::new(*c), *info))
    }
}
