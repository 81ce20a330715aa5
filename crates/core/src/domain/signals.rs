// Signals-to-record list

use std::io::BufRead;

/// Ordered list of signal names to be recorded
///
/// Entries keep their trailing newline and are stripped only when handed to
/// the tool. A `\r\n` line ending is stored as `\n`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignalList {
    entries: Vec<String>,
}

impl SignalList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append every signal line from `reader`, skipping comments and blank lines
    ///
    /// Returns the number of entries appended.
    pub fn append_from_reader<R: BufRead>(&mut self, mut reader: R) -> std::io::Result<usize> {
        let mut appended = 0;
        let mut line = String::new();

        loop {
            line.clear();
            if reader.read_line(&mut line)? == 0 {
                break;
            }
            if line.starts_with('#') || line.trim().is_empty() {
                continue;
            }
            if line.ends_with("\r\n") {
                line.truncate(line.len() - 2);
                line.push('\n');
            }
            self.entries.push(line.clone());
            appended += 1;
        }

        Ok(appended)
    }

    pub fn push(&mut self, entry: impl Into<String>) {
        self.entries.push(entry.into());
    }

    /// Raw entries, as read
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Signal names with line endings stripped
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .map(|entry| entry.trim_end_matches(['\n', '\r']))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_skips_comments_and_blank_lines() {
        let mut list = SignalList::new();
        let appended = list
            .append_from_reader(Cursor::new("# comment\n\nSignalA\nSignalB\n"))
            .unwrap();

        assert_eq!(appended, 2);
        assert_eq!(list.entries(), ["SignalA\n", "SignalB\n"]);
    }

    #[test]
    fn test_second_read_appends() {
        let mut list = SignalList::new();
        list.append_from_reader(Cursor::new("SignalA\n")).unwrap();
        list.append_from_reader(Cursor::new("SignalB\n")).unwrap();

        assert_eq!(list.entries(), ["SignalA\n", "SignalB\n"]);
    }

    #[test]
    fn test_whitespace_only_line_is_blank() {
        let mut list = SignalList::new();
        list.append_from_reader(Cursor::new("   \n\t\r\nSignalA\r\n"))
            .unwrap();

        assert_eq!(list.len(), 1);
        assert_eq!(list.names().collect::<Vec<_>>(), ["SignalA"]);
    }

    #[test]
    fn test_crlf_line_endings_stored_as_lf() {
        let mut list = SignalList::new();
        list.append_from_reader(Cursor::new("SignalA\r\n# note\r\nSignalB\r\n"))
            .unwrap();

        assert_eq!(list.entries(), ["SignalA\n", "SignalB\n"]);
    }

    #[test]
    fn test_last_line_without_newline() {
        let mut list = SignalList::new();
        list.append_from_reader(Cursor::new("SignalA\nSignalB")).unwrap();

        assert_eq!(list.entries(), ["SignalA\n", "SignalB"]);
        assert_eq!(list.names().collect::<Vec<_>>(), ["SignalA", "SignalB"]);
    }

    #[test]
    fn test_indented_hash_is_not_a_comment() {
        let mut list = SignalList::new();
        list.append_from_reader(Cursor::new(" #Model/Signal\n")).unwrap();

        assert_eq!(list.entries(), [" #Model/Signal\n"]);
    }
}
