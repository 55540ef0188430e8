//! Terminal-style reassembly of Pack3r output.
//!
//! Pack3r writes progress lines that are rewritten in place with `\r`, and a
//! single logical line can arrive split over several reads. `OutputParser`
//! keeps the line under construction until `\n` is seen, applying carriage
//! returns the way a plain terminal would: the cursor goes back to column 0
//! and following bytes overwrite, without truncating what is already there.

/// Reassembles raw stdout/stderr chunks into completed display lines.
///
/// Lines are only emitted on `\n`. A progress indicator that animates with
/// bare `\r` therefore shows up once, in its final state, when the newline
/// finally arrives (or never, if the stream ends without one).
#[derive(Debug, Default)]
pub struct OutputParser {
    // Bytes rather than chars: a multi-byte UTF-8 sequence split across two
    // reads is rejoined here before it is decoded.
    line: Vec<u8>,
    cursor: usize,
}

impl OutputParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk of process output and collect the lines it completes.
    ///
    /// Any trailing partial line stays buffered for the next call.
    pub fn process_output(&mut self, data: &[u8]) -> Vec<String> {
        let mut lines = Vec::new();

        for &byte in data {
            match byte {
                b'\r' => {
                    self.cursor = 0;
                }
                b'\n' => {
                    lines.push(String::from_utf8_lossy(&self.line).into_owned());
                    self.line.clear();
                    self.cursor = 0;
                }
                _ => {
                    if self.cursor >= self.line.len() {
                        self.line.push(byte);
                    } else {
                        self.line[self.cursor] = byte;
                    }
                    self.cursor += 1;
                }
            }
        }

        lines
    }

    /// Drop the partial line without emitting it.
    pub fn reset(&mut self) {
        self.line.clear();
        self.cursor = 0;
    }

    /// The line currently being assembled.
    pub fn partial_line(&self) -> &[u8] {
        &self.line
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

/// Extract the version from `Pack3r --version` output.
///
/// Pack3r appends the build hash after a `+`, which is stripped. Without a
/// `+` the whole chunk is the version. Returns `None` for an empty chunk:
/// Pack3r sends one after the version string and it must not replace an
/// already parsed version.
pub fn parse_version(data: &[u8]) -> Option<String> {
    if data.is_empty() {
        return None;
    }

    let end = data.iter().position(|&b| b == b'+').unwrap_or(data.len());
    Some(String::from_utf8_lossy(&data[..end]).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_bytes_are_buffered() {
        let mut parser = OutputParser::new();
        let lines = parser.process_output(b"Packing map");

        assert!(lines.is_empty());
        assert_eq!(parser.partial_line(), b"Packing map");
        assert_eq!(parser.cursor(), 11);
    }

    #[test]
    fn test_newline_emits_line() {
        let mut parser = OutputParser::new();
        let lines = parser.process_output(b"abc\n");

        assert_eq!(lines, vec!["abc".to_string()]);
        assert!(parser.partial_line().is_empty());
        assert_eq!(parser.cursor(), 0);
    }

    #[test]
    fn test_carriage_return_overwrites_without_truncating() {
        let mut parser = OutputParser::new();
        let lines = parser.process_output(b"abc\rXY\n");

        assert_eq!(lines, vec!["XYc".to_string()]);
    }

    #[test]
    fn test_line_split_across_chunks() {
        let mut parser = OutputParser::new();

        assert!(parser.process_output(b"partial-").is_empty());
        let lines = parser.process_output(b"line\n");

        assert_eq!(lines, vec!["partial-line".to_string()]);
    }

    #[test]
    fn test_progress_collapses_to_final_state() {
        let mut parser = OutputParser::new();
        let mut lines = Vec::new();

        lines.extend(parser.process_output(b"Packing [   ]  0%"));
        lines.extend(parser.process_output(b"\rPacking [=  ] 33%"));
        lines.extend(parser.process_output(b"\rPacking [== ] 66%\r"));
        lines.extend(parser.process_output(b"Packing [===] 100%\n"));

        assert_eq!(lines, vec!["Packing [===] 100%".to_string()]);
    }

    #[test]
    fn test_bare_carriage_returns_emit_nothing() {
        let mut parser = OutputParser::new();

        assert!(parser.process_output(b"10%\r20%\r30%\r").is_empty());
        assert_eq!(parser.partial_line(), b"30%");
        assert_eq!(parser.cursor(), 0);
    }

    #[test]
    fn test_multiple_lines_in_one_chunk() {
        let mut parser = OutputParser::new();
        let lines = parser.process_output(b"one\ntwo\n\nthree");

        assert_eq!(
            lines,
            vec!["one".to_string(), "two".to_string(), String::new()]
        );
        assert_eq!(parser.partial_line(), b"three");
    }

    #[test]
    fn test_crlf_line_endings() {
        let mut parser = OutputParser::new();
        let lines = parser.process_output(b"first\r\nsecond\r\n");

        assert_eq!(lines, vec!["first".to_string(), "second".to_string()]);
    }

    #[test]
    fn test_empty_chunk_changes_nothing() {
        let mut parser = OutputParser::new();
        parser.process_output(b"abc\rX");

        let lines = parser.process_output(b"");

        assert!(lines.is_empty());
        assert_eq!(parser.partial_line(), b"Xbc");
        assert_eq!(parser.cursor(), 1);
    }

    #[test]
    fn test_cursor_never_exceeds_line_length() {
        let mut parser = OutputParser::new();
        let input: &[u8] = b"abcdef\rxy\r\rz12345678\rq\nrest\r";

        for chunk in input.chunks(3) {
            parser.process_output(chunk);
            assert!(parser.cursor() <= parser.partial_line().len());
        }
    }

    #[test]
    fn test_utf8_split_across_chunks() {
        let mut parser = OutputParser::new();
        let text = "Pakkaus valmis ✓\n".as_bytes();
        let (head, tail) = text.split_at(text.len() - 2);

        assert!(parser.process_output(head).is_empty());
        let lines = parser.process_output(tail);

        assert_eq!(lines, vec!["Pakkaus valmis ✓".to_string()]);
    }

    #[test]
    fn test_reset_discards_partial_line() {
        let mut parser = OutputParser::new();
        parser.process_output(b"left over");
        parser.reset();

        let lines = parser.process_output(b"fresh\n");

        assert_eq!(lines, vec!["fresh".to_string()]);
    }

    #[test]
    fn test_parse_version_strips_build_hash() {
        assert_eq!(parse_version(b"1.2.3+abcdef"), Some("1.2.3".to_string()));
    }

    #[test]
    fn test_parse_version_without_hash() {
        assert_eq!(parse_version(b"1.2.3"), Some("1.2.3".to_string()));
    }

    #[test]
    fn test_parse_version_empty_chunk() {
        assert_eq!(parse_version(b""), None);
    }

    #[test]
    fn test_parse_version_splits_at_first_plus() {
        assert_eq!(parse_version(b"2.0.0+a+b"), Some("2.0.0".to_string()));
        assert_eq!(parse_version(b"+abc"), Some(String::new()));
    }
}
