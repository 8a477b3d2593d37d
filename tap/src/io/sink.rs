//! Line sink consumed by the writer.

use std::io::{self, Write};

/// Accepts one line of output at a time.
pub trait LineSink {
    /// Write `line` followed by a newline.
    fn write_line(&mut self, line: &str) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()>;
}

impl<W: Write> LineSink for W {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.write_all(line.as_bytes())?;
        self.write_all(b"\n")
    }

    fn flush(&mut self) -> io::Result<()> {
        Write::flush(self)
    }
}
