use std::io::Write;

use crate::config::ParserConfig;
use crate::option::{Kind, OptionSpec, Options};

pub const DEFAULT_LINE_SEPARATOR: &str = "\n";

const DEFAULT_LEFT_PAD: usize = 4;
const COLUMN_GAP: &str = "  ";
const COLUMN_MARKER: &str = "= ";

const TITLE_COLOUR: &str = "\x1b[1m\x1b[38;5;214m";
const TEXT_COLOUR: &str = "\x1b[38;5;152m";
const USAGE_COLOUR: &str = "\x1b[38;5;117m";
const DETAIL_COLOUR: &str = "\x1b[38;5;230m";
const RESET: &str = "\x1b[0m";

/// `HelpFormatter` renders the usage information for the [`Options`].
///
/// The output format is like:
/// ```txt
///
/// <app> <version>
///
/// <description>
///
/// Options:
///     --<name>, -<abbrev> <placeholder>  = <description> (default <value>)
///     [--<name>] <placeholder> ...       = <description> (required)
///
/// [extra]
///
/// ```
pub struct HelpFormatter {
    title: String,
    description: String,
    extra: String,
    left_pad: usize,
    colour: bool,
}

impl HelpFormatter {
    /// Create a `HelpFormatter` for the parser `config`, without colour.
    pub fn new(config: &ParserConfig) -> HelpFormatter {
        HelpFormatter {
            title: config.title(),
            description: config.get_description().to_string(),
            extra: config.get_extra().to_string(),
            left_pad: DEFAULT_LEFT_PAD,
            colour: false,
        }
    }

    /// Set whether ANSI colour sequences are emitted.
    pub fn set_colour(&mut self, colour: bool) {
        self.colour = colour;
    }

    pub fn is_colour(&self) -> bool {
        self.colour
    }

    /// Get number of padding space before each option row.
    pub fn get_left_padding(&self) -> usize {
        self.left_pad
    }

    /// Set number of padding space before each option row.
    pub fn set_left_padding(&mut self, padding: usize) {
        self.left_pad = padding;
    }

    /// Left column of an option row: names, placeholder and repetition marker.
    pub fn usage_column(option: &OptionSpec) -> String {
        let mut buff = String::new();

        if option.is_anonymous() {
            buff.push('[');
        }
        buff.push_str("--");
        buff.push_str(option.get_name());
        if let Some(abbrev) = option.get_abbrev() {
            buff.push_str(", -");
            buff.push(abbrev);
        }
        if option.is_anonymous() {
            buff.push(']');
        }

        if option.get_kind() != Kind::Boolean {
            buff.push(' ');
            buff.push_str(option.get_placeholder());
            if option.get_kind() == Kind::Multiple {
                buff.push_str(" ...");
            }
        }

        buff
    }

    /// Right column of an option row: the description, with `required` or the
    /// default value merged into a trailing parenthetical.
    pub fn description_column(option: &OptionSpec) -> String {
        let mut desc = option.get_description().to_string();

        let note = if option.is_required() {
            "required".to_string()
        } else if let Some(default) = option.get_default() {
            format!("default {}", default)
        } else {
            return desc;
        };

        if desc.ends_with(')') {
            desc.pop();
            desc.push_str("; ");
        } else {
            desc.push_str(" (");
        }
        desc.push_str(&note);
        desc.push(')');
        desc
    }

    /// The two help columns for every option, in registration order.
    pub fn rows(options: &Options) -> Vec<(String, String)> {
        options
            .get_options()
            .iter()
            .map(|o| (Self::usage_column(o), Self::description_column(o)))
            .collect()
    }

    fn paint(&self, buff: &mut String, colour: &str, text: &str) {
        if self.colour {
            buff.push_str(colour);
            buff.push_str(text);
            buff.push_str(RESET);
        } else {
            buff.push_str(text);
        }
    }

    fn render_options(&self, buff: &mut String, options: &Options) {
        let rows = Self::rows(options);
        let max = rows.iter().map(|(left, _)| left.chars().count()).max().unwrap_or(0);
        let left_pad = " ".repeat(self.left_pad);

        // The left column and its gap form one coloured run, the marker and
        // the description another.
        for (left, right) in rows {
            buff.push_str(&left_pad);
            if self.colour {
                buff.push_str(USAGE_COLOUR);
                buff.push_str(&format!("{:<width$}{}", left, COLUMN_GAP, width = max));
                buff.push_str(DETAIL_COLOUR);
                buff.push_str(COLUMN_MARKER);
                buff.push_str(&right);
                buff.push_str(RESET);
            } else {
                buff.push_str(&format!("{:<width$}{}{}{}", left, COLUMN_GAP, COLUMN_MARKER, right, width = max));
            }
            buff.push_str(DEFAULT_LINE_SEPARATOR);
        }
    }

    /// Render the complete help text.
    pub fn render_help(&self, options: &Options) -> String {
        let nl = DEFAULT_LINE_SEPARATOR;
        let mut buff = String::from(nl);

        if self.colour {
            buff.push_str(TITLE_COLOUR);
            buff.push_str(&self.title);
            buff.push_str(RESET);
        } else {
            buff.push_str(&self.title);
        }
        buff.push_str(nl);
        buff.push_str(nl);
        self.paint(&mut buff, TEXT_COLOUR, &self.description);
        buff.push_str(nl);
        buff.push_str(nl);
        self.paint(&mut buff, TEXT_COLOUR, "Options:");
        buff.push_str(nl);

        self.render_options(&mut buff, options);

        if !self.extra.is_empty() {
            buff.push_str(nl);
            self.paint(&mut buff, TEXT_COLOUR, &self.extra);
            buff.push_str(nl);
        }
        buff.push_str(nl);

        buff
    }

    /// Render the version banner, `"{app} {version}"` and a newline.
    pub fn render_version(&self) -> String {
        format!("{}{}", self.title, DEFAULT_LINE_SEPARATOR)
    }

    /// Print the help text of the [`Options`] to the `out` sink.
    pub fn print_help<T: Write>(&self, out: &mut T, options: &Options) -> std::io::Result<()> {
        out.write_all(self.render_help(options).as_bytes())
    }

    /// Print the version banner to the `out` sink.
    pub fn print_version<T: Write>(&self, out: &mut T) -> std::io::Result<()> {
        out.write_all(self.render_version().as_bytes())
    }
}
