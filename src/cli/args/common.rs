//! Argument types shared by every command

/// How results are printed on stdout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Colored summaries with a spinner on stderr
    #[default]
    Pretty,
    /// One table row per repository, issue or skill
    Table,
    /// `{data, meta}` envelope for scripts
    Json,
}
