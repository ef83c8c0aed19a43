//! Density-to-glyph lookup tables.
//!
//! Every table has 15 levels: level 0 is the brightest source region and
//! level 14 the darkest. Glyphs are drawn lit on a dark canvas, so bright
//! regions get the heaviest glyphs and dark regions fade out to spaces.

use std::sync::OnceLock;

use crate::{CharsetMode, DensityLevel, NUM_LEVELS};

/// Script groups that make up the `full` inventory, in palette order
const SCRIPT_GROUPS: [&str; 9] = [
    // ascii
    " ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*()_+-=[]{}|;':\",./<>?`~ ",
    // blocks
    " \u{2591}\u{2592}\u{2593}\u{2588} \u{2584}\u{2580} \u{258C}\u{2590} \u{2591}\u{2592}\u{2593}\u{2588} ",
    // box drawing
    " \u{2550}\u{2551}\u{2563}\u{255E}\u{2569}\u{2566}\u{2560}\u{256C}\u{2554}\u{2557}\u{255A}\u{255D}\u{2568}\u{2565}\u{2552}\u{2555}\u{2558}\u{255B}\u{2514}\u{2524}\u{2518}\u{251C}\u{252C}\u{2524}\u{2502}\u{251C}\u{2514}\u{2518}\u{2510}\u{250C} ",
    // latin accents
    " \u{E4}\u{F6}\u{FC}\u{DF}\u{E7}\u{E9}\u{E8}\u{EA}\u{EB}\u{EF}\u{EE}\u{F1}\u{F3}\u{F2}\u{F4}\u{F5}\u{FA}\u{F9}\u{FB}\u{FF}\u{E5}\u{E6}\u{153}\u{F0} \u{E1}\u{E0}\u{E2}\u{E3}\u{E4}\u{E5}\u{E7}\u{E9}\u{E8}\u{EA}\u{EB}\u{ED}\u{EC}\u{EE}\u{EF}\u{F1}\u{F3}\u{F2}\u{F4}\u{F5}\u{FA}\u{F9}\u{FB}\u{FC}\u{FD}\u{FF} ",
    // cyrillic
    " \u{430}\u{431}\u{432}\u{433}\u{434}\u{435}\u{451}\u{436}\u{437}\u{438}\u{439}\u{43A}\u{43B}\u{43C}\u{43D}\u{43E}\u{43F}\u{440}\u{441}\u{442}\u{443}\u{444}\u{445}\u{446}\u{447}\u{448}\u{449}\u{44A}\u{44B}\u{44C}\u{44D}\u{44E}\u{44F} ",
    // greek
    " \u{3B1}\u{3B2}\u{3B3}\u{3B4}\u{3B5}\u{3B6}\u{3B7}\u{3B8}\u{3B9}\u{3BA}\u{3BB}\u{3BC}\u{3BD}\u{3BE}\u{3BF}\u{3C0}\u{3C1}\u{3C3}\u{3C4}\u{3C5}\u{3C6}\u{3C7}\u{3C8}\u{3C9} ",
    // greek upper
    " \u{391}\u{392}\u{393}\u{394}\u{395}\u{396}\u{397}\u{398}\u{399}\u{39A}\u{39B}\u{39C}\u{39D}\u{39E}\u{39F}\u{3A0}\u{3A1}\u{3A3}\u{3A4}\u{3A5}\u{3A6}\u{3A7}\u{3A8}\u{3A9} ",
    // symbols
    " \u{2190}\u{2191}\u{2192}\u{2193} \u{2196}\u{2197}\u{2198}\u{2199} \u{25C0}\u{25B6}\u{25B2}\u{25BC}\u{25C6}\u{25C7}\u{25CB}\u{25CF}\u{25D0}\u{25D1}\u{25D2}\u{25D3}\u{25D4}\u{25D5} \u{2605}\u{2606}\u{2660}\u{2663}\u{2665}\u{2666} ",
    // central european
    " \u{104}\u{10C}\u{118}\u{11B}\u{141}\u{143}\u{147}\u{D3}\u{158}\u{15A}\u{164}\u{DA}\u{17D}\u{105}\u{10D}\u{107}\u{119}\u{11B}\u{142}\u{144}\u{148}\u{F3}\u{159}\u{15B}\u{165}\u{161}\u{FA}\u{17E} \u{110}\u{111} ",
];

/// Single-width glyphs ordered by visual density, for flat ramp rendering
pub const DENSITY_PALETTE: &str = concat!(
    "\u{2588}\u{2593}\u{2592}\u{2591}\u{2580}\u{2584}\u{258C}\u{2590}\u{25CF}\u{25CB}\u{25C6}\u{25C7}\u{25A0}\u{25A1}\u{25D0}\u{25D1}\u{25D2}\u{25D3}\u{25D4}\u{25D5}",
    "\u{2550}\u{2551}\u{2563}\u{255E}\u{2569}\u{2566}\u{2560}\u{256C}\u{2554}\u{2557}\u{255A}\u{255D}\u{2524}\u{251C}\u{2514}\u{2518}\u{2510}\u{250C}\u{2502}\u{2500}",
    "\u{25B2}\u{25BC}\u{25B6}\u{25C0}\u{25AA}\u{25AB}\u{25E6}\u{2022}\u{B7}\u{2219}",
    "=_-+*#%&@$?!;:,\"'`.",
    "  ",
);

/// Printable ASCII inventory for `english` mode
pub const ENGLISH_CHARS: &str =
    " ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*()_+-=[]{}|;':\",./<>?`~ ";

const FULL_LEVELS: [&str; NUM_LEVELS as usize] = [
    " \u{2588}\u{2593}\u{2588}\u{2593} ",
    "\u{2593}\u{2592}\u{2588}\u{2591}\u{2580}",
    "\u{2592}\u{2591}\u{2584}\u{258C}\u{2590}",
    "\u{2580}\u{2584}\u{258C}\u{2590}\u{25CF}",
    "\u{25CF}\u{25CB}\u{25C6}\u{25C7}\u{25A0}",
    "\u{25CB}\u{25C7}\u{25A0}\u{25A1}\u{25D0}",
    "\u{25D0}\u{25D1}\u{25D2}\u{25D3}\u{25D4}",
    "\u{2550}\u{2551}\u{2524}\u{251C}\u{2502}",
    "\u{25B2}\u{25BC}\u{25B6}\u{25C0}\u{25AA}",
    "\u{25AA}\u{25AB}\u{B7}\u{2219}\u{2022}",
    "=_-+*#%&@",
    "$?!;:,\"'",
    "`.",
    ". '",
    "  ",
];

const ENGLISH_LEVELS: [&str; NUM_LEVELS as usize] = [
    " ",
    " .",
    ".:",
    ".:-",
    ".:-=",
    ".:-=+",
    ".:-=+*",
    ".:-=+*#",
    ".:-=+*#%",
    ".:-=+*#%@",
    "#%@&",
    "%@&?!",
    "@&?!;",
    "?!;,.",
    " ",
];

const PIXELPERFECT_LEVELS: [&str; NUM_LEVELS as usize] = [
    " \u{25E6}\u{B7}\u{2032}",
    "\u{B7}\u{2032}`.",
    "`.,'",
    "\u{25AA}\u{25AB}",
    "\u{25AB}\u{25AC}",
    "\u{25AC}\u{25A1}",
    "\u{25A1}\u{25A0}",
    "\u{258C}\u{2590}",
    "\u{2580}\u{2584}",
    "\u{2591}",
    "\u{2592}",
    "\u{2593}",
    "\u{2588}\u{2593}",
    "\u{2588}\u{2593}\u{2592}",
    "\u{2588} ",
];

/// Glyphs that may render double-width or as tofu, with a plain ASCII stand-in
pub const SAFE_CHAR_MAP: &[(char, char)] = &[
    ('\u{2588}', '#'),
    ('\u{2593}', '%'),
    ('\u{2592}', '+'),
    ('\u{2591}', '*'),
    ('\u{2580}', '^'),
    ('\u{2584}', '_'),
    ('\u{258C}', '|'),
    ('\u{2590}', '|'),
    ('\u{2550}', '='),
    ('\u{2551}', '|'),
    ('\u{2563}', '|'),
    ('\u{255E}', '+'),
    ('\u{2569}', '+'),
    ('\u{2566}', '+'),
    ('\u{2560}', '+'),
    ('\u{256C}', '+'),
    ('\u{2554}', '+'),
    ('\u{2557}', '+'),
    ('\u{255A}', '+'),
    ('\u{255D}', '+'),
    ('\u{2524}', '|'),
    ('\u{251C}', '|'),
    ('\u{2514}', '+'),
    ('\u{2518}', '+'),
    ('\u{2510}', '+'),
    ('\u{250C}', '+'),
    ('\u{2502}', '|'),
    ('\u{2500}', '-'),
    ('\u{25B2}', '^'),
    ('\u{25BC}', 'v'),
    ('\u{25B6}', '>'),
    ('\u{25C0}', '<'),
    ('\u{25C6}', '*'),
    ('\u{25C7}', '+'),
    ('\u{25CB}', 'o'),
    ('\u{25CF}', '*'),
    ('\u{25A0}', '#'),
    ('\u{25A1}', '+'),
    ('\u{25D0}', '('),
    ('\u{25D1}', ')'),
    ('\u{25D2}', '('),
    ('\u{25D3}', ')'),
    ('\u{25D4}', 'o'),
    ('\u{25D5}', 'o'),
    ('\u{25AA}', '#'),
    ('\u{25AB}', '#'),
    ('\u{2605}', '*'),
    ('\u{2606}', '*'),
    ('\u{2660}', 'S'),
    ('\u{2663}', 'C'),
    ('\u{2665}', 'H'),
    ('\u{2666}', 'D'),
];

/// Per-level candidate strings for a mode
pub fn level_table(mode: CharsetMode) -> &'static [&'static str; NUM_LEVELS as usize] {
    match mode {
        CharsetMode::Full | CharsetMode::Density => &FULL_LEVELS,
        CharsetMode::English => &ENGLISH_LEVELS,
        CharsetMode::PixelPerfect => &PIXELPERFECT_LEVELS,
    }
}

/// Candidate glyphs for one (mode, level) pair
pub fn candidates(mode: CharsetMode, level: DensityLevel) -> &'static str {
    level_table(mode)[level.index()]
}

/// Pick the glyph for a density level
///
/// `variety` selects among the level's candidates (index `variety mod len`,
/// always non-negative). Without a variety seed the first candidate wins.
pub fn char_for_level(mode: CharsetMode, level: i64, variety: Option<i64>) -> char {
    pick(candidates(mode, DensityLevel::new(level)), variety)
}

fn pick(candidates: &str, variety: Option<i64>) -> char {
    let len = candidates.chars().count();
    if len == 0 {
        return ' ';
    }
    let index = variety.map_or(0, |v| v.rem_euclid(len as i64) as usize);
    candidates.chars().nth(index).unwrap_or(' ')
}

/// Fallback glyph if `ch` is not guaranteed to render single-width, else `ch`
pub fn safe_char(ch: char) -> char {
    SAFE_CHAR_MAP
        .iter()
        .find(|(glyph, _)| *glyph == ch)
        .map_or(ch, |(_, fallback)| *fallback)
}

/// Full usable character inventory for a mode, as a flat palette
pub fn chars_for_mode(mode: CharsetMode) -> &'static str {
    match mode {
        CharsetMode::English => ENGLISH_CHARS,
        CharsetMode::Density => DENSITY_PALETTE,
        CharsetMode::Full | CharsetMode::PixelPerfect => all_chars(),
    }
}

fn all_chars() -> &'static str {
    static ALL: OnceLock<String> = OnceLock::new();
    ALL.get_or_init(|| SCRIPT_GROUPS.concat())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_level_has_candidates() {
        for mode in CharsetMode::ALL {
            for level in 0..NUM_LEVELS as i64 {
                assert!(
                    !candidates(mode, DensityLevel::new(level)).is_empty(),
                    "{mode} level {level} is empty"
                );
            }
        }
    }

    #[test]
    fn test_level_is_clamped() {
        assert_eq!(
            char_for_level(CharsetMode::English, -5, None),
            char_for_level(CharsetMode::English, 0, None)
        );
        assert_eq!(
            char_for_level(CharsetMode::Full, 400, Some(1)),
            char_for_level(CharsetMode::Full, 14, Some(1))
        );
    }

    #[test]
    fn test_variety_selects_candidates() {
        // english level 9 is ".:-=+*#%@"
        assert_eq!(char_for_level(CharsetMode::English, 9, None), '.');
        assert_eq!(char_for_level(CharsetMode::English, 9, Some(0)), '.');
        assert_eq!(char_for_level(CharsetMode::English, 9, Some(3)), '=');
        assert_eq!(char_for_level(CharsetMode::English, 9, Some(9)), '.');
        assert_eq!(char_for_level(CharsetMode::English, 9, Some(-1)), '@');
    }

    #[test]
    fn test_variety_counts_chars_not_bytes() {
        // pixelperfect level 13 is three multi-byte block glyphs
        assert_eq!(char_for_level(CharsetMode::PixelPerfect, 13, Some(2)), '\u{2592}');
        assert_eq!(char_for_level(CharsetMode::PixelPerfect, 13, Some(3)), '\u{2588}');
    }

    #[test]
    fn test_density_mode_shares_full_levels() {
        for level in 0..NUM_LEVELS as i64 {
            for variety in 0..10 {
                assert_eq!(
                    char_for_level(CharsetMode::Density, level, Some(variety)),
                    char_for_level(CharsetMode::Full, level, Some(variety))
                );
            }
        }
    }

    #[test]
    fn test_empty_candidates_yield_space() {
        assert_eq!(pick("", Some(7)), ' ');
        assert_eq!(pick("", None), ' ');
    }

    #[test]
    fn test_safe_char() {
        assert_eq!(safe_char('\u{2588}'), '#');
        assert_eq!(safe_char('\u{25BC}'), 'v');
        assert_eq!(safe_char('a'), 'a');
        assert_eq!(safe_char('\u{3B1}'), '\u{3B1}');
    }

    #[test]
    fn test_safe_char_map_is_closed() {
        for (_, fallback) in SAFE_CHAR_MAP {
            assert!(fallback.is_ascii());
            assert_eq!(safe_char(*fallback), *fallback);
        }
    }

    #[test]
    fn test_chars_for_mode() {
        assert_eq!(chars_for_mode(CharsetMode::English), ENGLISH_CHARS);
        assert_eq!(chars_for_mode(CharsetMode::Density), DENSITY_PALETTE);

        let full = chars_for_mode(CharsetMode::Full);
        assert!(full.starts_with(" ABC"));
        assert!(full.contains('\u{44F}'));
        assert!(full.contains('\u{3A9}'));
        assert!(full.ends_with("\u{110}\u{111} "));
    }

    #[test]
    fn test_english_tables_are_ascii() {
        assert!(ENGLISH_CHARS.is_ascii());
        assert!(ENGLISH_LEVELS.iter().all(|level| level.is_ascii()));
    }
}
