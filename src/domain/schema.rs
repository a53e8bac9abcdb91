// Canonical tracker schema: columns, status domain, status colors

/// Number of columns in the tracker table (A through L).
pub const COLUMN_COUNT: usize = 12;

/// Zero-based index of the "Application Status" column (column I).
pub const STATUS_COLUMN: u16 = 8;

/// One tracker column: display label plus width hints for each backend.
/// Local workbooks size columns in characters, the remote API in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnSpec {
    pub label: &'static str,
    pub width_chars: f64,
    pub width_px: u32,
}

/// The fixed 12-column layout. Order is significant: it defines the header
/// row and the column indices used by validation and highlight rules.
pub const COLUMNS: [ColumnSpec; COLUMN_COUNT] = [
    ColumnSpec { label: "#", width_chars: 5.0, width_px: 50 },
    ColumnSpec { label: "Company Name", width_chars: 25.0, width_px: 150 },
    ColumnSpec { label: "Job Title", width_chars: 25.0, width_px: 150 },
    ColumnSpec { label: "Job Location", width_chars: 20.0, width_px: 120 },
    ColumnSpec { label: "Date Applied", width_chars: 15.0, width_px: 100 },
    ColumnSpec { label: "Job Posting Link", width_chars: 40.0, width_px: 250 },
    ColumnSpec { label: "Resume Link", width_chars: 40.0, width_px: 250 },
    ColumnSpec { label: "Cover Letter Link", width_chars: 40.0, width_px: 250 },
    ColumnSpec { label: "Application Status", width_chars: 20.0, width_px: 120 },
    ColumnSpec { label: "Follow-Up Date", width_chars: 15.0, width_px: 100 },
    ColumnSpec { label: "Response Received?", width_chars: 20.0, width_px: 150 },
    ColumnSpec { label: "Notes", width_chars: 40.0, width_px: 250 },
];

/// Spreadsheet letter for a zero-based column index (0 = A, 25 = Z, 26 = AA).
pub fn column_letter(col: u16) -> String {
    let mut name = String::new();
    let mut n = col as u32 + 1;
    while n > 0 {
        n -= 1;
        name.insert(0, (b'A' + (n % 26) as u8) as char);
        n /= 26;
    }
    name
}

/// A color as normalized RGB, 0.0 to 1.0 per channel. Backend-independent;
/// each sink quantizes as needed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
}

impl Rgb {
    pub const fn new(red: f64, green: f64, blue: f64) -> Self {
        Self { red, green, blue }
    }

    /// Quantize to a 24-bit 0xRRGGBB value for the workbook backend.
    pub fn to_hex(self) -> u32 {
        let channel = |c: f64| (c * 255.0).round() as u32;
        (channel(self.red) << 16) | (channel(self.green) << 8) | channel(self.blue)
    }
}

/// The 7 permitted values for the "Application Status" column. This set is
/// both the dropdown allow-list and the key set of the color table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Applied,
    InterviewScheduled,
    Offer,
    Rejected,
    FollowedUp,
    NoResponse,
    OnHold,
}

impl Status {
    pub const ALL: [Status; 7] = [
        Status::Applied,
        Status::InterviewScheduled,
        Status::Offer,
        Status::Rejected,
        Status::FollowedUp,
        Status::NoResponse,
        Status::OnHold,
    ];

    /// The verbatim cell value. None of these may contain a comma: the
    /// dropdown list encoding does not support it.
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Applied => "Applied",
            Status::InterviewScheduled => "Interview Scheduled",
            Status::Offer => "Offer",
            Status::Rejected => "Rejected",
            Status::FollowedUp => "Followed Up",
            Status::NoResponse => "No Response",
            Status::OnHold => "On Hold",
        }
    }

    /// Row fill color for this status.
    pub fn color(self) -> Rgb {
        match self {
            Status::Applied => Rgb::new(0.678, 0.847, 0.902), // light blue
            Status::InterviewScheduled => Rgb::new(0.565, 0.933, 0.565), // light green
            Status::Offer => Rgb::new(1.0, 1.0, 0.0),         // gold
            Status::Rejected => Rgb::new(1.0, 0.6, 0.6),      // light red
            Status::FollowedUp => Rgb::new(1.0, 0.647, 0.0),  // orange
            Status::NoResponse => Rgb::new(0.827, 0.827, 0.827), // light gray
            Status::OnHold => Rgb::new(0.902, 0.902, 0.980),  // lavender
        }
    }

    pub fn parse(value: &str) -> Option<Status> {
        Status::ALL.iter().copied().find(|s| s.as_str() == value)
    }
}

/// One job application: 12 cell values in column order. Rows are owned by
/// whoever fills the sheet in; the core only carries optional seed rows.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerRow {
    pub cells: [String; COLUMN_COUNT],
}

impl TrackerRow {
    pub fn new(cells: [&str; COLUMN_COUNT]) -> Self {
        Self {
            cells: cells.map(str::to_string),
        }
    }

    /// Value of the "Application Status" cell.
    pub fn status(&self) -> &str {
        &self.cells[STATUS_COLUMN as usize]
    }
}

/// A few demonstration rows for `--seed-rows`.
pub fn sample_rows() -> Vec<TrackerRow> {
    vec![
        TrackerRow::new([
            "1",
            "Acme Corp",
            "Backend Engineer",
            "Remote",
            "2026-08-03",
            "https://jobs.acme.example/123",
            "https://drive.example/resume-v3",
            "https://drive.example/cover-acme",
            "Applied",
            "2026-08-10",
            "No",
            "Referred by M. Patel",
        ]),
        TrackerRow::new([
            "2",
            "Globex",
            "Platform Engineer",
            "Austin, TX",
            "2026-08-11",
            "https://careers.globex.example/456",
            "https://drive.example/resume-v3",
            "",
            "Interview Scheduled",
            "2026-08-18",
            "Yes",
            "Phone screen on the 20th",
        ]),
        TrackerRow::new([
            "3",
            "Initech",
            "Site Reliability Engineer",
            "Remote",
            "2026-08-14",
            "https://initech.example/jobs/789",
            "https://drive.example/resume-v2",
            "",
            "No Response",
            "2026-08-28",
            "No",
            "",
        ]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_status_domain_has_seven_unique_values() {
        let values: HashSet<&str> = Status::ALL.iter().map(|s| s.as_str()).collect();
        assert_eq!(values.len(), 7);
    }

    #[test]
    fn test_status_values_are_comma_free() {
        for status in Status::ALL {
            assert!(!status.as_str().contains(','), "{:?}", status);
        }
    }

    #[test]
    fn test_every_status_has_exactly_one_color() {
        // Bijective by construction (enum match), but pin the quantized values
        // so neither side of the table drifts.
        let expected = [
            (Status::Applied, 0xADD8E6),
            (Status::InterviewScheduled, 0x90EE90),
            (Status::Offer, 0xFFFF00),
            (Status::Rejected, 0xFF9999),
            (Status::FollowedUp, 0xFFA500),
            (Status::NoResponse, 0xD3D3D3),
            (Status::OnHold, 0xE6E6FA),
        ];
        for (status, hex) in expected {
            assert_eq!(status.color().to_hex(), hex, "{:?}", status);
        }
    }

    #[test]
    fn test_column_layout_is_fixed() {
        assert_eq!(COLUMNS.len(), 12);
        assert_eq!(COLUMNS[STATUS_COLUMN as usize].label, "Application Status");
        assert_eq!(COLUMNS[0].label, "#");
        assert_eq!(COLUMNS[11].label, "Notes");
    }

    #[test]
    fn test_column_letters() {
        assert_eq!(column_letter(0), "A");
        assert_eq!(column_letter(STATUS_COLUMN), "I");
        assert_eq!(column_letter(11), "L");
        assert_eq!(column_letter(25), "Z");
        assert_eq!(column_letter(26), "AA");
    }

    #[test]
    fn test_status_parse_round_trips() {
        for status in Status::ALL {
            assert_eq!(Status::parse(status.as_str()), Some(status));
        }
        assert_eq!(Status::parse("Ghosted"), None);
        assert_eq!(Status::parse(""), None);
    }

    #[test]
    fn test_sample_rows_use_in_domain_statuses() {
        for row in sample_rows() {
            assert!(Status::parse(row.status()).is_some());
        }
    }
}
