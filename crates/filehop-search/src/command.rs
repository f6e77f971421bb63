//! Command shapes for the two search modes.

use strum::Display;

/// What a search matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
pub enum SearchMode {
    /// Match the regex against relative file paths.
    #[default]
    #[strum(serialize = "Names")]
    Names,
    /// Match the regex against file contents, line by line.
    #[strum(serialize = "Contents")]
    Content,
}

impl SearchMode {
    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            Self::Names => Self::Content,
            Self::Content => Self::Names,
        }
    }
}

/// One program invocation, run without a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new(program: &str, args: impl IntoIterator<Item = String>) -> Self {
        Self {
            program: program.to_string(),
            args: args.into_iter().collect(),
        }
    }
}

/// Commands whose stdout feeds the next command's stdin. The last stage's
/// stdout is the search output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    pub stages: Vec<CommandSpec>,
}

impl Pipeline {
    /// Build the pipeline for `mode` with the tokenized query `argv`.
    ///
    /// Name search lists every file and filters the list with `argv`;
    /// content search greps the working directory.
    pub fn for_mode(mode: SearchMode, tool: &str, argv: &[String]) -> Self {
        let stages = match mode {
            SearchMode::Names => vec![
                CommandSpec::new(tool, ["--files".to_string()]),
                CommandSpec::new(
                    tool,
                    ["--color", "never", "--no-line-number"]
                        .into_iter()
                        .map(String::from)
                        .chain(argv.iter().cloned()),
                ),
            ],
            SearchMode::Content => vec![CommandSpec::new(
                tool,
                ["--line-number", "--no-heading", "--color", "never"]
                    .into_iter()
                    .map(String::from)
                    .chain(argv.iter().cloned())
                    .chain(std::iter::once(".".to_string())),
            )],
        };
        Self { stages }
    }
}
