use std::fmt::Display;
use std::io::{self, BufRead, Write};

/// Line-based console over any reader/writer pair.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Write one line.
    ///
    /// # Errors
    ///
    /// Propagates output failures.
    pub fn say(&mut self, line: impl Display) -> io::Result<()> {
        writeln!(self.output, "{line}")
    }

    /// Print `label` without a newline and read one line of input.
    ///
    /// The line terminator is stripped, nothing else. Bytes that are not UTF-8 are replaced
    /// with U+FFFD. `Ok(None)` at end of input.
    ///
    /// # Errors
    ///
    /// Propagates input/output failures.
    pub fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut raw = Vec::new();
        if self.input.read_until(b'\n', &mut raw)? == 0 {
            return Ok(None);
        }
        let mut line = String::from_utf8_lossy(&raw).into_owned();
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Some(line))
    }

    pub fn into_output(self) -> W {
        self.output
    }
}
