// Line cap for probes that enumerate potentially large output

/// Count lines the way a reader sees them: a trailing partial line counts.
pub fn line_count(output: &[u8]) -> usize {
    let newlines = output.iter().filter(|b| **b == b'\n').count();
    if output.last().is_some_and(|b| *b != b'\n') {
        newlines + 1
    } else {
        newlines
    }
}

/// Keep at most `max_lines` lines; returns the kept prefix and the number of lines dropped
pub fn cap_lines(output: &[u8], max_lines: usize) -> (&[u8], usize) {
    let total = line_count(output);
    if total <= max_lines {
        return (output, 0);
    }

    let cut = output
        .iter()
        .enumerate()
        .filter(|(_, b)| **b == b'\n')
        .nth(max_lines.saturating_sub(1))
        .map(|(idx, _)| idx + 1)
        .unwrap_or(output.len());

    let cut = if max_lines == 0 { 0 } else { cut };
    (&output[..cut], total - max_lines)
}

/// Cap to `max_lines` lines, spending one line on an `[N lines omitted]` marker
/// and, when `keep_last` is set, one on the final line (a runner note).
///
/// The result never exceeds `max_lines` lines. Returns the bytes and the
/// number of output lines left out.
pub fn cap_lines_marked(output: &[u8], max_lines: usize, keep_last: bool) -> (Vec<u8>, usize) {
    let total = line_count(output);
    if total <= max_lines {
        return (output.to_vec(), 0);
    }

    let (body, tail) = if keep_last {
        output.split_at(last_line_start(output))
    } else {
        (output, &output[output.len()..])
    };
    let tail_lines = line_count(tail);

    // Budget for the marker first, then the tail, then body lines
    let marker_lines = usize::from(max_lines > tail_lines);
    let tail_kept = tail_lines.min(max_lines);
    let body_budget = max_lines - marker_lines - tail_kept;

    let (kept, dropped) = cap_lines(body, body_budget);
    let mut capped = kept.to_vec();
    if marker_lines > 0 {
        capped.extend_from_slice(format!("[{} lines omitted]\n", dropped).as_bytes());
    }
    if tail_kept > 0 {
        capped.extend_from_slice(tail);
    }
    (capped, dropped + tail_lines - tail_kept)
}

/// Offset of the last line, ignoring the final newline
pub(super) fn last_line_start(output: &[u8]) -> usize {
    let trimmed = output.strip_suffix(b"\n").unwrap_or(output);
    trimmed
        .iter()
        .rposition(|b| *b == b'\n')
        .map(|idx| idx + 1)
        .unwrap_or(0)
}
