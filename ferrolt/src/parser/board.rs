//! `display board` output parsing.
//!
//! ```text
//!   -------------------------------------------------------------------------
//!   SlotID  BoardName  Status          SubType0 SubType1    Online/Offline
//!   -------------------------------------------------------------------------
//!   0       H806GPBD   Normal
//!   1       H802SCUN   Active_normal
//!   2       -
//!   -------------------------------------------------------------------------
//! ```
//!
//! Data rows start with a numeric slot id followed by a board name and a
//! status token. Headers and separators fail the row pattern and are
//! skipped; a `-` board name marks an empty slot.

use std::sync::LazyLock;

use log::{debug, trace};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Frame number used when deriving board ids.
pub const DEFAULT_FRAME: &str = "0";

/// Board name the device prints for an empty slot.
pub const EMPTY_SLOT: &str = "-";

static BOARD_ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([0-9]+)\s+(\S+)\s+(\S+)").expect("board row pattern is valid")
});

static PORT_TABLE_ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([0-9]+/){3}[0-9]+\s+").expect("port table pattern is valid")
});

/// One occupied slot from a board listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardRecord {
    /// Slot identifier, kept as the device printed it.
    pub slot_id: String,

    /// Board type name (e.g. `H806GPBD`).
    pub board_name: String,

    /// Status token (e.g. `Normal`, `Active_normal`).
    pub status: String,

    /// `<frame>/<slot>` path used by registration requests.
    pub board_id: String,
}

impl BoardRecord {
    fn new(slot_id: &str, board_name: &str, status: &str) -> Self {
        Self {
            slot_id: slot_id.to_string(),
            board_name: board_name.to_string(),
            status: status.to_string(),
            board_id: format!("{DEFAULT_FRAME}/{slot_id}"),
        }
    }
}

/// Parse a board listing into slot records, in source order.
///
/// Lines that are not data rows are ignored, as are empty slots. Never
/// fails; input without data rows yields an empty list.
pub fn parse_boards(raw: &str) -> Vec<BoardRecord> {
    let boards: Vec<BoardRecord> = raw
        .lines()
        .filter_map(|line| {
            let caps = BOARD_ROW.captures(line)?;
            let (slot, name, status) = (&caps[1], &caps[2], &caps[3]);
            if name == EMPTY_SLOT {
                trace!("slot {slot} is empty");
                return None;
            }
            Some(BoardRecord::new(slot, name, status))
        })
        .collect();

    debug!("parsed {} board(s)", boards.len());
    boards
}

/// Extract the port table rows from a board detail listing.
///
/// Rows are lines starting with a four-part `a/b/c/d` path. Collection
/// starts at the first such row and stops at the first blank line after
/// it. Rows are returned trimmed.
pub fn port_table_rows(raw: &str) -> Vec<&str> {
    let mut rows = Vec::new();
    let mut in_table = false;

    for line in raw.lines() {
        if PORT_TABLE_ROW.is_match(line) {
            in_table = true;
            rows.push(line.trim());
        } else if in_table && line.trim().is_empty() {
            break;
        }
    }

    rows
}

/// Reduce a board detail listing to its port table.
///
/// Falls back to the raw text when no table row is found.
pub fn format_board_status(raw: &str) -> String {
    let rows = port_table_rows(raw);
    if rows.is_empty() {
        raw.to_string()
    } else {
        rows.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DISPLAY_BOARD: &str = "\
  -------------------------------------------------------------------------
  SlotID  BoardName  Status          SubType0 SubType1    Online/Offline
  -------------------------------------------------------------------------
  0       H806GPBD   Normal
  1       H802SCUN   Active_normal
  2       -
  3       H801GICF   Normal
  -------------------------------------------------------------------------
";

    #[test]
    fn test_scenario_skips_empty_slot() {
        let boards = parse_boards("0    EPON   Normal\n1    -   Normal\n");
        assert_eq!(
            boards,
            vec![BoardRecord {
                slot_id: "0".to_string(),
                board_name: "EPON".to_string(),
                status: "Normal".to_string(),
                board_id: "0/0".to_string(),
            }]
        );
    }

    #[test]
    fn test_display_board_listing() {
        let boards = parse_boards(DISPLAY_BOARD);
        let slots: Vec<_> = boards.iter().map(|b| b.slot_id.as_str()).collect();
        assert_eq!(slots, vec!["0", "1", "3"]);
        assert_eq!(boards[1].board_name, "H802SCUN");
        assert_eq!(boards[1].status, "Active_normal");
        assert_eq!(boards[2].board_id, "0/3");
    }

    #[test]
    fn test_placeholder_row_without_status_is_skipped() {
        // "2       -" has no status token and fails the row pattern outright
        assert!(parse_boards("  2       -\n").is_empty());
        assert!(parse_boards("  2       -    Normal\n").is_empty());
    }

    #[test]
    fn test_empty_and_garbage_input() {
        assert!(parse_boards("").is_empty());
        assert!(parse_boards("\n\n   \n").is_empty());
        assert!(parse_boards("Failure: board does not exist\n").is_empty());
    }

    #[test]
    fn test_tolerates_whitespace_runs_and_crlf() {
        let boards = parse_boards("\t 7 \t  H805GPFD\t\tNormal   extra cols\r\n");
        assert_eq!(boards.len(), 1);
        assert_eq!(boards[0].slot_id, "7");
        assert_eq!(boards[0].board_name, "H805GPFD");
        assert_eq!(boards[0].status, "Normal");
    }

    #[test]
    fn test_slot_id_must_be_ascii_digits() {
        assert!(parse_boards("٣  EPON  Normal\n").is_empty());
        assert!(format_board_status("٠/1/0/0  GPON  Online").starts_with('٠'));
        assert_eq!(parse_boards("12  EPON  Normal")[0].board_id, "0/12");
    }

    #[test]
    fn test_reparse_is_structurally_equal() {
        assert_eq!(parse_boards(DISPLAY_BOARD), parse_boards(DISPLAY_BOARD));
    }

    #[test]
    fn test_board_record_serializes_camel_case() {
        let json = serde_json::to_value(&parse_boards("0 EPON Normal")[0]).unwrap();
        assert_eq!(json["slotId"], "0");
        assert_eq!(json["boardId"], "0/0");
    }

    #[test]
    fn test_format_board_status_extracts_table() {
        let raw = "\
  Board Name        : H806GPBD
  -------------------------------------------------------------
  0/1/0/0   GPON  Online
  0/1/0/1   GPON  Offline

  In port 0/1/0, the total of ONTs are: 2
";
        assert_eq!(
            format_board_status(raw),
            "0/1/0/0   GPON  Online\n0/1/0/1   GPON  Offline"
        );
    }

    #[test]
    fn test_format_board_status_falls_back_to_raw() {
        let raw = "Failure: The board does not exist";
        assert_eq!(format_board_status(raw), raw);
    }
}
