//! Line-oriented operator I/O.

use std::io::{self, BufRead, Write};

use crate::{pagination::Pager, BucketItem, PhotoAppError};

/// Reads operator answers from `input` and writes prompts and results to
/// `output`. End of input reads as an empty answer, and as command 0 at
/// the menu.
pub struct Console<R, W> {
    input: R,
    output: W,
    closed: bool,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            closed: false,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// True once input has reached end of file.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn say(&mut self, line: impl AsRef<str>) -> io::Result<()> {
        writeln!(self.output, "{}", line.as_ref())
    }

    /// Prints `prompt` and returns the next input line without its line
    /// ending, or `None` at end of input.
    pub fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        writeln!(self.output, "{prompt}")?;
        self.output.flush()?;
        self.read_line()
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            self.closed = true;
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_owned()))
    }

    /// Shows the command menu and reads one answer. `Ok(None)` means the
    /// answer was not an integer.
    pub fn read_command(&mut self) -> io::Result<Option<i64>> {
        writeln!(self.output)?;
        writeln!(self.output, ">> Enter a command:")?;
        for line in MENU {
            writeln!(self.output, "{line}")?;
        }
        self.output.flush()?;

        match self.read_line()? {
            None => Ok(Some(0)),
            Some(answer) => Ok(answer.trim().parse::<i64>().ok()),
        }
    }

    /// Renders a failed operation.
    pub fn report(&mut self, err: &PhotoAppError) -> io::Result<()> {
        match err {
            PhotoAppError::Api {
                status,
                url,
                message,
            } => {
                self.say(format!("Failed with status code: {status}"))?;
                self.say(format!("url: {url}"))?;
                self.say(format!("Error message: {message}"))
            }
            PhotoAppError::Exhausted { status, url, .. } => {
                self.say(format!("Failed with status code: {status}"))?;
                self.say(format!("url: {url}"))
            }
            PhotoAppError::Precondition(message) => self.say(message),
            other => self.say(format!("**ERROR: {other}")),
        }
    }
}

const MENU: [&str; 10] = [
    "   0 => end",
    "   1 => stats",
    "   2 => users",
    "   3 => assets",
    "   4 => download",
    "   5 => bucket contents",
    "   6 => upload",
    "   7 => add/update user",
    "   8 => analyze",
    "   9 => search",
];

impl<R: BufRead, W: Write> Pager for Console<R, W> {
    fn show_page(&mut self, items: &[BucketItem]) -> io::Result<()> {
        for item in items {
            self.say(format!("Bucket key: {}", item.key))?;
            self.say(format!(" Last modified: {}", item.last_modified))?;
            self.say(format!(" Size: {}", item.size))?;
        }
        Ok(())
    }

    fn next_page(&mut self) -> io::Result<bool> {
        let answer = self.ask("another page? [y/n]")?;
        Ok(answer.is_some_and(|answer| answer.trim() == "y"))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::Console;
    use crate::{pagination::Pager, PhotoAppError};

    fn console(input: &str) -> Console<Cursor<Vec<u8>>, Vec<u8>> {
        Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn output(console: Console<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(console.into_output()).expect("utf8 output")
    }

    #[test]
    fn reads_commands_and_treats_eof_as_end() {
        let mut console = console("4\nfoo\n");
        assert_eq!(console.read_command().unwrap(), Some(4));
        assert_eq!(console.read_command().unwrap(), None);
        assert_eq!(console.read_command().unwrap(), Some(0));
        assert!(console.is_closed());
        assert!(output(console).contains("   5 => bucket contents"));
    }

    #[test]
    fn only_y_continues_paging() {
        let mut console = console("y\nyes\n\n");
        assert!(console.next_page().unwrap());
        assert!(!console.next_page().unwrap());
        assert!(!console.next_page().unwrap());
        assert!(!console.next_page().unwrap());
    }

    #[test]
    fn api_errors_show_status_url_and_message() {
        let mut console = console("");
        console
            .report(&PhotoAppError::Api {
                status: 400,
                url: "http://svc/image/9".to_owned(),
                message: "No such asset...".to_owned(),
            })
            .unwrap();
        assert_eq!(
            output(console),
            "Failed with status code: 400\nurl: http://svc/image/9\nError message: No such asset...\n"
        );
    }

    #[test]
    fn ask_strips_line_endings() {
        let mut console = console("cat.jpg\r\n");
        assert_eq!(console.ask("Enter local filename>").unwrap().as_deref(), Some("cat.jpg"));
    }
}
