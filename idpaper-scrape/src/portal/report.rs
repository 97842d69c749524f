//! Rendering scraped blocks into the report file and onto the console.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

/// Twenty hyphens, closing every record.
pub const RECORD_SEPARATOR: &str = "--------------------";

/// One `div.desc` text block, numbered from 1 in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentBlock {
    pub ordinal: usize,
    pub text: String,
}

impl ContentBlock {
    /// Render the block as a three-part record: header line, raw text,
    /// separator line.
    ///
    /// ```
    /// use idpaper_scrape::ContentBlock;
    ///
    /// let block = ContentBlock { ordinal: 1, text: "Passed".to_string() };
    /// assert_eq!(
    ///     block.render(),
    ///     "--- Block 1 ---\nPassed\n--------------------\n",
    /// );
    /// ```
    pub fn render(&self) -> String {
        format!("--- Block {} ---\n{}\n{}\n", self.ordinal, self.text, RECORD_SEPARATOR)
    }
}

/// Writes each record to the report file and mirrors it to the console.
///
/// Construct with [`ReportWriter::create`] only once there is content to
/// write; creation truncates any previous report at the same path.
pub struct ReportWriter<F: Write, C: Write> {
    file: F,
    console: C,
}

impl ReportWriter<File, io::Stdout> {
    pub fn create(path: &Path) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            file,
            console: io::stdout(),
        })
    }
}

impl<F: Write, C: Write> ReportWriter<F, C> {
    #[cfg(test)]
    fn from_sinks(file: F, console: C) -> Self {
        Self { file, console }
    }

    pub fn write_block(&mut self, block: &ContentBlock) -> io::Result<()> {
        let record = block.render();
        self.console.write_all(record.as_bytes())?;
        self.console.flush()?;
        self.file.write_all(record.as_bytes())?;
        self.file.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn block(ordinal: usize, text: &str) -> ContentBlock {
        ContentBlock {
            ordinal,
            text: text.to_string(),
        }
    }

    #[test]
    fn render_keeps_inner_newlines_untouched() {
        let rendered = block(3, "line one\nline two").render();
        assert_eq!(
            rendered,
            "--- Block 3 ---\nline one\nline two\n--------------------\n",
        );
    }

    #[test]
    fn render_of_an_empty_block_still_has_three_parts() {
        let rendered = block(1, "").render();
        assert_eq!(rendered, "--- Block 1 ---\n\n--------------------\n");
    }

    #[test]
    fn records_reach_both_sinks() {
        let mut writer = ReportWriter::from_sinks(Vec::new(), Vec::new());
        writer.write_block(&block(1, "first")).unwrap();
        writer.write_block(&block(2, "second")).unwrap();

        let expected = "--- Block 1 ---\nfirst\n--------------------\n\
                        --- Block 2 ---\nsecond\n--------------------\n";
        assert_eq!(writer.file, expected.as_bytes());
        assert_eq!(writer.console, expected.as_bytes());
    }

    #[test]
    fn create_truncates_an_earlier_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("result.txt");
        fs::write(&path, "stale content from a previous run").unwrap();

        let mut writer = ReportWriter::create(&path).unwrap();
        writer.write_block(&block(1, "fresh")).unwrap();
        drop(writer);

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "--- Block 1 ---\nfresh\n--------------------\n");
    }

    #[test]
    fn create_fails_when_the_directory_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("result.txt");
        assert!(ReportWriter::create(&path).is_err());
    }
}
