// Report text format
//
//   \n\n===== NAME =====\n
//   \n+ <command>\n<output>[\n]exit_code=<n>\n
//   ...
//   \n\n===== DONE =====\nreport written to <path>\n

use super::constants::*;
use std::io::{self, Write};
use std::path::Path;

pub fn write_section_header<W: Write + ?Sized>(out: &mut W, name: &str) -> io::Result<()> {
    writeln!(out, "\n\n{} {} {}", SECTION_DELIMITER, name, SECTION_DELIMITER)
}

/// Echo the command before it runs, so a hung probe is visible in a partial artifact
pub fn write_probe_start<W: Write + ?Sized>(out: &mut W, command: &str) -> io::Result<()> {
    writeln!(out, "\n{}{}", COMMAND_MARKER, command)
}

pub fn write_probe_end<W: Write + ?Sized>(out: &mut W, output: &[u8], exit_code: i32) -> io::Result<()> {
    out.write_all(output)?;
    if !output.is_empty() && !output.ends_with(b"\n") {
        out.write_all(b"\n")?;
    }
    writeln!(out, "{}{}", EXIT_CODE_MARKER, exit_code)
}

pub fn write_completion<W: Write + ?Sized>(out: &mut W, destination: &Path) -> io::Result<()> {
    write_section_header(out, DONE_SECTION)?;
    writeln!(out, "{}{}", COMPLETION_MARKER, destination.display())
}
