//! Line source consumed by the reader.

use std::io;

/// Yields one line of input at a time, terminator already stripped.
///
/// `None` signals a clean end of input; `Some(Err(_))` a failure of the
/// underlying medium. The reader never splits or joins lines itself.
pub trait LineSource {
    fn next_line(&mut self) -> Option<io::Result<String>>;
}

/// Any iterator of lines is a source, so `BufRead::lines()` plugs in directly.
impl<I> LineSource for I
where
    I: Iterator<Item = io::Result<String>>,
{
    fn next_line(&mut self) -> Option<io::Result<String>> {
        self.next()
    }
}
