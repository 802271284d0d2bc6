//! Parser for `vm_stat` output.
//!
//! Pure functions over the command's text so they can be tested with string inputs.

use crate::model::VirtualMemoryStat;

/// Error type for parsing failures.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Parse error: {}", self.message)
    }
}

impl std::error::Error for ParseError {}

/// Applies page counts from `vm_stat` output to `vms`, scaled by `page_size`.
///
/// Recognized lines are `Pages free`, `Pages inactive`, `Pages active` and
/// `Pages wired down`; everything else is ignored. A value that fails to parse
/// stores zero and parsing continues. The last such failure is returned once
/// every line has been applied, so `vms` holds partial results even on error.
pub fn parse_vm_stat(
    out: &str,
    page_size: u64,
    vms: &mut VirtualMemoryStat,
) -> Result<(), ParseError> {
    let mut last_err = None;

    for line in out.lines() {
        let mut fields = line.split(':');
        let (Some(key), Some(value)) = (fields.next(), fields.next()) else {
            continue;
        };
        let slot = match key.trim() {
            "Pages free" => &mut vms.free,
            "Pages inactive" => &mut vms.inactive,
            "Pages active" => &mut vms.active,
            "Pages wired down" => &mut vms.wired,
            _ => continue,
        };
        let value = value.trim_matches(|c: char| c.is_whitespace() || c == '.');
        let pages = value.parse::<u64>().unwrap_or_else(|e| {
            last_err = Some(ParseError::new(format!(
                "{}: invalid page count {:?}: {}",
                key.trim(),
                value,
                e
            )));
            0
        });
        *slot = pages.saturating_mul(page_size);
    }

    match last_err {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
