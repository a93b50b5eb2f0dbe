// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

fn set_color(no_color: Option<&str>, color: Option<&str>) {
    match no_color {
        Some(v) => std::env::set_var("NO_COLOR", v),
        None => std::env::remove_var("NO_COLOR"),
    }
    match color {
        Some(v) => std::env::set_var("COLOR", v),
        None => std::env::remove_var("COLOR"),
    }
}

#[test]
#[serial]
fn no_color_wins_over_forced_color() {
    set_color(Some("1"), Some("1"));
    assert!(!should_colorize());
    assert_eq!(Tone::Header.paint("windows-vs2013"), "windows-vs2013");
    assert_eq!(format!("{:?}", styles()), format!("{:?}", Styles::plain()));
    set_color(None, None);
}

#[test]
#[serial]
fn forced_color_paints_with_the_tone_code() {
    set_color(None, Some("1"));
    assert!(should_colorize());
    assert_eq!(Tone::Header.paint("x"), "\x1b[38;5;74mx\x1b[0m");
    assert_eq!(Tone::Placeholder.paint("y"), "\x1b[38;5;245my\x1b[0m");
    assert_ne!(format!("{:?}", styles()), format!("{:?}", Styles::plain()));
    set_color(None, None);
}
