// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Printer-name resolution.
//
// Enumeration mechanisms return descriptors of unknown shape: a bare name
// string, or a keyed record whose naming field depends on which OS/driver
// layer produced it. This module reduces any descriptor to a clean printer
// name, or to nothing.

use serde_json::Value;

/// Recognized naming keys, in priority order. Case-variant duplicates are
/// deliberate: different OS/driver layers capitalize differently, and
/// `DeviceId`/`DeviceID` both occur in the wild.
const NAME_KEYS: &[&str] = &[
    "name",
    "Name",
    "printerName",
    "PrinterName",
    "printer",
    "Printer",
    "deviceName",
    "DeviceName",
    "deviceId",
    "DeviceId",
    "DeviceID",
];

/// Extract a human-readable printer name from a descriptor.
///
/// Strings are trimmed and returned when non-empty. Records are scanned for
/// the recognized keys above; only if none match does the resolver fall back
/// to the first string-valued field in map-iteration order. The explicit key
/// list takes priority because the blind scan risks picking an unrelated
/// string property (a status message, say) on unfamiliar descriptor shapes.
///
/// `serde_json::Map` iterates keys lexicographically, so the last-resort
/// scan is deterministic here even though the producing process made no
/// ordering promise.
pub fn resolve_printer_name(descriptor: &Value) -> Option<String> {
    match descriptor {
        Value::String(s) => non_empty(s),
        Value::Object(map) => {
            for key in NAME_KEYS {
                if let Some(name) = map.get(*key).and_then(Value::as_str).and_then(non_empty) {
                    return Some(name);
                }
            }
            map.values()
                .find_map(|v| v.as_str().and_then(non_empty))
        }
        _ => None,
    }
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plain_string_is_trimmed() {
        assert_eq!(
            resolve_printer_name(&json!("  EPSON TM-T20  ")),
            Some("EPSON TM-T20".into())
        );
    }

    #[test]
    fn blank_string_is_absent() {
        assert_eq!(resolve_printer_name(&json!("   ")), None);
        assert_eq!(resolve_printer_name(&json!("")), None);
    }

    #[test]
    fn non_record_non_string_is_absent() {
        assert_eq!(resolve_printer_name(&json!(42)), None);
        assert_eq!(resolve_printer_name(&json!(true)), None);
        assert_eq!(resolve_printer_name(&json!(["HP"])), None);
        assert_eq!(resolve_printer_name(&Value::Null), None);
    }

    #[test]
    fn recognized_key_beats_unrecognized_string_field() {
        let descriptor = json!({ "note": "B", "Name": "A" });
        assert_eq!(resolve_printer_name(&descriptor), Some("A".into()));
    }

    #[test]
    fn all_case_variants_are_recognized() {
        for key in ["name", "Name", "printerName", "deviceName", "deviceId", "DeviceID", "Printer"] {
            let descriptor = json!({ key: "Front Desk" });
            assert_eq!(
                resolve_printer_name(&descriptor),
                Some("Front Desk".into()),
                "key {key} not recognized"
            );
        }
    }

    #[test]
    fn recognized_key_with_blank_value_falls_through() {
        // An empty `Name` should not shadow a usable variant further down
        // the candidate list.
        let descriptor = json!({ "Name": "  ", "deviceId": "Kitchen" });
        assert_eq!(resolve_printer_name(&descriptor), Some("Kitchen".into()));
    }

    #[test]
    fn unfamiliar_record_falls_back_to_first_string_field() {
        // Map iteration is lexicographic: "label" precedes "status".
        let descriptor = json!({ "status": "ok", "label": "LPT1" });
        assert_eq!(resolve_printer_name(&descriptor), Some("LPT1".into()));
    }

    #[test]
    fn record_without_any_string_field_is_absent() {
        assert_eq!(resolve_printer_name(&json!({ "port": 9100 })), None);
        assert_eq!(resolve_printer_name(&json!({})), None);
    }
}
