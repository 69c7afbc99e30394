// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Nearest CSS color keyword lookup.

use palette::Srgb;
use palette::named;

use crate::types::RgbColor;

/// Returns the CSS color keyword closest to `color`.
///
/// Candidates are the SVG color keywords known to [`palette::named`].
/// Distance is the squared Euclidean distance in RGB space. Ties resolve to
/// the keyword that sorts first alphabetically, so exact synonyms such as
/// `aqua`/`cyan` always yield the first spelling.
///
/// # Examples
///
/// ```
/// use lifx_bridge::convert::nearest_keyword;
/// use lifx_bridge::types::RgbColor;
///
/// assert_eq!(nearest_keyword(RgbColor::new(255, 0, 0)), "red");
/// assert_eq!(nearest_keyword(RgbColor::new(250, 5, 3)), "red");
/// assert_eq!(nearest_keyword(RgbColor::new(0, 255, 255)), "aqua");
/// ```
#[must_use]
pub fn nearest_keyword(color: RgbColor) -> &'static str {
    let mut best = "black";
    let mut best_distance = u32::MAX;

    for (name, keyword) in KEYWORDS
        .iter()
        .filter_map(|&name| named::from_str(name).map(|rgb| (name, rgb)))
    {
        let distance = distance(color, keyword);
        if distance < best_distance {
            best = name;
            best_distance = distance;
            if distance == 0 {
                break;
            }
        }
    }

    best
}

fn distance(color: RgbColor, keyword: Srgb<u8>) -> u32 {
    square_diff(color.red(), keyword.red)
        + square_diff(color.green(), keyword.green)
        + square_diff(color.blue(), keyword.blue)
}

fn square_diff(a: u8, b: u8) -> u32 {
    let d = u32::from(a.abs_diff(b));
    d * d
}

/// Keyword names in alphabetical order.
const KEYWORDS: &[&str] = &[
    "aliceblue", "antiquewhite", "aqua", "aquamarine", "azure", "beige", "bisque", "black",
    "blanchedalmond", "blue", "blueviolet", "brown", "burlywood", "cadetblue", "chartreuse",
    "chocolate", "coral", "cornflowerblue", "cornsilk", "crimson", "cyan", "darkblue", "darkcyan",
    "darkgoldenrod", "darkgray", "darkgreen", "darkgrey", "darkkhaki", "darkmagenta",
    "darkolivegreen", "darkorange", "darkorchid", "darkred", "darksalmon", "darkseagreen",
    "darkslateblue", "darkslategray", "darkslategrey", "darkturquoise", "darkviolet", "deeppink",
    "deepskyblue", "dimgray", "dimgrey", "dodgerblue", "firebrick", "floralwhite", "forestgreen",
    "fuchsia", "gainsboro", "ghostwhite", "gold", "goldenrod", "gray", "green", "greenyellow",
    "grey", "honeydew", "hotpink", "indianred", "indigo", "ivory", "khaki", "lavender",
    "lavenderblush", "lawngreen", "lemonchiffon", "lightblue", "lightcoral", "lightcyan",
    "lightgoldenrodyellow", "lightgray", "lightgreen", "lightgrey", "lightpink", "lightsalmon",
    "lightseagreen", "lightskyblue", "lightslategray", "lightslategrey", "lightsteelblue",
    "lightyellow", "lime", "limegreen", "linen", "magenta", "maroon", "mediumaquamarine",
    "mediumblue", "mediumorchid", "mediumpurple", "mediumseagreen", "mediumslateblue",
    "mediumspringgreen", "mediumturquoise", "mediumvioletred", "midnightblue", "mintcream",
    "mistyrose", "moccasin", "navajowhite", "navy", "oldlace", "olive", "olivedrab", "orange",
    "orangered", "orchid", "palegoldenrod", "palegreen", "paleturquoise", "palevioletred",
    "papayawhip", "peachpuff", "peru", "pink", "plum", "powderblue", "purple", "red", "rosybrown",
    "royalblue", "saddlebrown", "salmon", "sandybrown", "seagreen", "seashell", "sienna", "silver",
    "skyblue", "slateblue", "slategray", "slategrey", "snow", "springgreen", "steelblue", "tan",
    "teal", "thistle", "tomato", "turquoise", "violet", "wheat", "white", "whitesmoke", "yellow",
    "yellowgreen",
];
