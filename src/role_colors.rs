/// An opaque color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const BLACK: Rgb = Rgb(0, 0, 0);
}

// Role, background, text
const ROLE_COLORS: &[(&str, &str, &str)] = &[
    ("Patriarch", "#1a237e", "white"),     // Dark blue
    ("Matriarch", "#c2185b", "white"),     // Dark pink
    ("Son", "#0277bd", "white"),           // Light blue
    ("Daughter", "#e91e63", "white"),      // Pink
    ("Granddaughter", "#ff69b4", "white"), // Light pink
    ("Grandson", "#4db8ff", "white"),      // Lighter blue
];

/// Colors used for any role missing from the table
const WILDCARD_COLORS: (&str, &str) = ("#999999", "white");

/// Parse a named color (`white`, `black`) or a `#rrggbb` hex triple.
///
/// Input colors come from static tables, so a channel that does not parse
/// falls back to 0 instead of failing.
pub fn parse_color(value: &str) -> Rgb {
    match value {
        "white" => Rgb::WHITE,
        "black" => Rgb::BLACK,
        hex => {
            let hex = hex.trim_start_matches('#');
            let channel = |i: usize| {
                hex.get(i..i + 2)
                    .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                    .unwrap_or(0)
            };
            Rgb(channel(0), channel(2), channel(4))
        }
    }
}

/// Look up the (background, text) color names for a role.
fn color_names_for_role(role: &str) -> (&'static str, &'static str) {
    ROLE_COLORS
        .iter()
        .find(|(name, _, _)| *name == role)
        .map(|(_, background, text)| (*background, *text))
        .unwrap_or(WILDCARD_COLORS)
}

/// Resolve a role to its (background, text) colors. Unknown roles get the wildcard pair.
pub fn colors_for_role(role: &str) -> (Rgb, Rgb) {
    let (background, text) = color_names_for_role(role);
    (parse_color(background), parse_color(text))
}
