// Report format markers (no magic values in the writer)

/// Delimiter on both sides of a section name
pub const SECTION_DELIMITER: &str = "=====";

/// Prefix of the echoed command line
pub const COMMAND_MARKER: &str = "+ ";

/// Prefix of the trailing exit status line
pub const EXIT_CODE_MARKER: &str = "exit_code=";

/// Name of the closing section
pub const DONE_SECTION: &str = "DONE";

/// Prefix of the final line naming the artifact
pub const COMPLETION_MARKER: &str = "report written to ";
