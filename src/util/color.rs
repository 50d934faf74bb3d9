// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Color conversion helpers.

/// Convert a hex color number into an `[R, G, B]` byte array.
pub fn hex_to_rgb255(hex: u32) -> [u8; 3] {
    [
        ((hex >> 16) & 0xff) as u8,
        ((hex >> 8) & 0xff) as u8,
        (hex & 0xff) as u8,
    ]
}

/// Convert an `[R, G, B]` array with components in [0, 1] to a hex color
/// number.
pub fn rgb_to_hex(rgb: [f64; 3]) -> u32 {
    (((rgb[0] * 255.0) as u32) << 16) + (((rgb[1] * 255.0) as u32) << 8) + (rgb[2] * 255.0) as u32
}
