//! Terminal styling for item cards.
//!
//! Cards use bold headings, dim labels and green or red for signed bonus
//! values. When the terminal cannot render ANSI sequences every style
//! collapses to an empty string.

use std::env;

const RESET: &str = "\x1b[0m";
const BOLD_WHITE: &str = "\x1b[1;97m";
const DIM: &str = "\x1b[90m";
const CYAN: &str = "\x1b[36m";
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";

/// Escape sequences used by the text renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorPalette {
    pub reset: &'static str,
    /// Item names and section titles.
    pub heading: &'static str,
    /// Field labels and group names.
    pub label: &'static str,
    /// Links to other items.
    pub link: &'static str,
    pub positive: &'static str,
    pub negative: &'static str,
    /// Notices such as incomplete manufacturing data.
    pub notice: &'static str,
}

impl ColorPalette {
    #[must_use]
    pub const fn colored() -> Self {
        Self {
            reset: RESET,
            heading: BOLD_WHITE,
            label: DIM,
            link: CYAN,
            positive: GREEN,
            negative: RED,
            notice: YELLOW,
        }
    }

    #[must_use]
    pub const fn plain() -> Self {
        Self {
            reset: "",
            heading: "",
            label: "",
            link: "",
            positive: "",
            negative: "",
            notice: "",
        }
    }

    /// Pick a palette from the process environment.
    #[must_use]
    pub fn detect() -> Self {
        let term = env::var("TERM").ok();
        if colors_allowed(env::var_os("NO_COLOR").is_some(), term.as_deref()) {
            Self::colored()
        } else {
            Self::plain()
        }
    }

    /// Style for a signed display value such as `+5.00%`.
    #[must_use]
    pub fn signed(&self, value: f64) -> &'static str {
        match value.partial_cmp(&0.0) {
            Some(std::cmp::Ordering::Greater) => self.positive,
            Some(std::cmp::Ordering::Less) => self.negative,
            _ => "",
        }
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::detect()
    }
}

/// Whether ANSI styling should be emitted.
///
/// `NO_COLOR` (https://no-color.org/) and `TERM=dumb` both disable it.
#[must_use]
pub fn colors_allowed(no_color: bool, term: Option<&str>) -> bool {
    !no_color && !term.is_some_and(|term| term.eq_ignore_ascii_case("dumb"))
}

/// Group the digits of `n` in threes with commas.
///
/// ```
/// # use encyclopedia_cli::terminal::format_with_separators;
/// assert_eq!(format_with_separators(999), "999");
/// assert_eq!(format_with_separators(256000), "256,000");
/// ```
#[must_use]
pub fn format_with_separators(n: u64) -> String {
    let digits = n.to_string();
    let head = digits.len() % 3;
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.char_indices() {
        if idx > 0 && idx % 3 == head {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
