//! Keyboard scan code mapping
//!
//! Maps Linux input event codes (input-event-codes.h) to the characters a
//! US-layout console would print. Unshifted codes only: a security key types
//! its OTP in a single case.

/// Scan code emitted when the key finishes typing the OTP line
pub const KEY_ENTER: u16 = 28;

/// Map a keyboard scan code to its character, or None for codes with no
/// printable mapping (modifiers, function keys, navigation keys).
pub fn scancode_to_char(code: u16) -> Option<char> {
    let ch = match code {
        // Digit row
        2 => '1',
        3 => '2',
        4 => '3',
        5 => '4',
        6 => '5',
        7 => '6',
        8 => '7',
        9 => '8',
        10 => '9',
        11 => '0',
        12 => '-',
        13 => '=',
        // Top letter row
        16 => 'q',
        17 => 'w',
        18 => 'e',
        19 => 'r',
        20 => 't',
        21 => 'y',
        22 => 'u',
        23 => 'i',
        24 => 'o',
        25 => 'p',
        26 => '[',
        27 => ']',
        // Home row
        30 => 'a',
        31 => 's',
        32 => 'd',
        33 => 'f',
        34 => 'g',
        35 => 'h',
        36 => 'j',
        37 => 'k',
        38 => 'l',
        39 => ';',
        40 => '"',
        41 => '`',
        43 => '\\',
        // Bottom row
        44 => 'z',
        45 => 'x',
        46 => 'c',
        47 => 'v',
        48 => 'b',
        49 => 'n',
        50 => 'm',
        51 => ',',
        52 => '.',
        53 => '/',
        _ => return None,
    };
    Some(ch)
}
