use crate::error::ConfigError;

/// Whether help text is rendered with ANSI colour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Colour {
    On,
    Off,
    /// Colour only when writing to a terminal from [`Parser::parse`](crate::Parser::parse);
    /// plain everywhere else.
    #[default]
    Auto,
}

impl Colour {
    /// Resolve the tri-state, given whether the output is a terminal.
    pub fn resolve(self, is_terminal: bool) -> bool {
        match self {
            Colour::On => true,
            Colour::Off => false,
            Colour::Auto => is_terminal,
        }
    }
}

/// Per-parser metadata, shown in the help and version text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParserConfig {
    app: String,
    version: String,
    description: String,
    extra: String,
    auto_help: bool,
    colour: Colour,
}

impl ParserConfig {
    pub(crate) fn new(
        app: &str,
        version: &str,
        description: &str,
        extra: &str,
        auto_help: bool,
        colour: Colour,
    ) -> Result<ParserConfig, ConfigError> {
        let app = app.trim();
        let description = description.trim();
        if app.is_empty() {
            return Err(ConfigError::EmptyAppName);
        }
        if description.is_empty() {
            return Err(ConfigError::EmptyDescription);
        }
        Ok(ParserConfig {
            app: app.to_string(),
            version: version.trim().to_string(),
            description: description.to_string(),
            extra: extra.trim().to_string(),
            auto_help,
            colour,
        })
    }

    pub fn get_app(&self) -> &str {
        &self.app
    }

    pub fn get_version(&self) -> &str {
        &self.version
    }

    pub fn get_description(&self) -> &str {
        &self.description
    }

    pub fn get_extra(&self) -> &str {
        &self.extra
    }

    /// Whether an empty command line shows the help instead of parsing.
    pub fn is_auto_help(&self) -> bool {
        self.auto_help
    }

    pub fn get_colour(&self) -> Colour {
        self.colour
    }

    /// `"{app} {version}"`, or just the app name when there is no version.
    pub fn title(&self) -> String {
        if self.version.is_empty() {
            self.app.clone()
        } else {
            format!("{} {}", self.app, self.version)
        }
    }
}
