//! SGF export.
//!
//! Reference: <https://www.red-bean.com/sgf/>. The header properties are
//! written in a fixed order that downstream tools rely on:
//! `FF GM CA SZ DT AP KM PW PB Z1 Z2 Z3`. `Z1`..`Z3` are private properties
//! carrying the move count, undo count and manual-add count.

use std::fmt::Write;

use chrono::NaiveDate;

use super::game::GameRecord;

/// Render a complete game as SGF.
#[must_use]
pub fn write_game(record: &GameRecord, date: NaiveDate) -> String {
    let mut out = String::with_capacity(128 + record.move_count() * 6);
    write_header(&mut out, record, date);
    for mv in record.moves() {
        out.push_str(&mv.sgf());
    }
    out.push(')');
    out
}

fn write_header(out: &mut String, record: &GameRecord, date: NaiveDate) {
    let application = record.application();

    out.push_str("(;");
    write_property(out, "FF", "4");
    write_property(out, "GM", "1");
    write_property(out, "CA", "UTF-8");
    write_property(out, "SZ", &record.dimension().to_string());
    write_property(out, "DT", &date.format("%Y-%m-%d").to_string());
    write_property(
        out,
        "AP",
        &format!("{} v{}", application.name, application.version),
    );
    write_property(out, "KM", record.komi());
    write_property(out, "PW", record.white_player());
    write_property(out, "PB", record.black_player());
    write_property(out, "Z1", &record.move_count().to_string());
    write_property(out, "Z2", &record.undo_count().to_string());
    write_property(out, "Z3", &record.manual_add_count().to_string());
}

fn write_property(out: &mut String, name: &str, value: &str) {
    // Writing into a String cannot fail
    let _ = write!(out, "{name}[{}]", escape(value));
}

/// Escape `]` and `\` inside a property value.
fn escape(value: &str) -> std::borrow::Cow<'_, str> {
    if value.contains([']', '\\']) {
        let mut escaped = String::with_capacity(value.len() + 2);
        for c in value.chars() {
            if c == ']' || c == '\\' {
                escaped.push('\\');
            }
            escaped.push(c);
        }
        escaped.into()
    } else {
        value.into()
    }
}
