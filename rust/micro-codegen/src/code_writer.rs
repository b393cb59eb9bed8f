//! Indentation-aware text writer for emitting Go source.
//!
//! Output is meant to already look like `gofmt` output: tabs for indentation,
//! one statement per line, braces on the header line.
//!
//! ```
//! use micro_codegen::code_writer::CodeWriter;
//! use micro_codegen::cw_writeln;
//!
//! let mut out = String::new();
//! let mut w = CodeWriter::go(&mut out);
//! w.block("func answer() int", |w| cw_writeln!(w, "return {}", 42))
//!     .unwrap();
//! assert_eq!(out, "func answer() int {\n\treturn 42\n}\n");
//! ```

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Writes lines into `W`, prefixing each with the current indentation.
pub struct CodeWriter<W> {
    writer: W,
    depth: Rc<Cell<usize>>,
    unit: &'static str,
    at_line_start: bool,
}

impl<W: fmt::Write> CodeWriter<W> {
    /// A writer that indents with `unit` per level.
    pub fn new(writer: W, unit: &'static str) -> Self {
        Self {
            writer,
            depth: Rc::new(Cell::new(0)),
            unit,
            at_line_start: true,
        }
    }

    /// A writer that indents with tabs, as `gofmt` does.
    pub fn go(writer: W) -> Self {
        Self::new(writer, "\t")
    }

    /// Write `text` without ending the line.
    pub fn write(&mut self, text: &str) -> fmt::Result {
        if text.is_empty() {
            return Ok(());
        }
        if self.at_line_start {
            for _ in 0..self.depth.get() {
                self.writer.write_str(self.unit)?;
            }
            self.at_line_start = false;
        }
        self.writer.write_str(text)
    }

    /// Write `text` and end the line.
    pub fn writeln(&mut self, text: &str) -> fmt::Result {
        self.write(text)?;
        self.blank_line()
    }

    /// End the current line; on an empty line this writes a blank line
    /// without trailing indentation.
    pub fn blank_line(&mut self) -> fmt::Result {
        self.writer.write_char('\n')?;
        self.at_line_start = true;
        Ok(())
    }

    /// Indent one level until the returned guard is dropped.
    pub fn indent(&mut self) -> IndentGuard {
        self.depth.set(self.depth.get() + 1);
        IndentGuard {
            depth: Rc::clone(&self.depth),
        }
    }

    /// `// text`
    pub fn comment(&mut self, text: &str) -> fmt::Result {
        self.write("// ")?;
        self.writeln(text)
    }

    /// `header {`, the indented body, then `}`.
    pub fn block<F>(&mut self, header: &str, body: F) -> fmt::Result
    where
        F: FnOnce(&mut Self) -> fmt::Result,
    {
        self.write(header)?;
        self.writeln(" {")?;
        {
            let _indent = self.indent();
            body(self)?;
        }
        self.writeln("}")
    }

    /// `header (`, the indented body, then `)`, as used by import groups.
    pub fn paren_block<F>(&mut self, header: &str, body: F) -> fmt::Result
    where
        F: FnOnce(&mut Self) -> fmt::Result,
    {
        self.write(header)?;
        self.writeln(" (")?;
        {
            let _indent = self.indent();
            body(self)?;
        }
        self.writeln(")")
    }

    #[doc(hidden)]
    pub fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> fmt::Result {
        match args.as_str() {
            Some(s) => self.write(s),
            None => self.write(&args.to_string()),
        }
    }

    #[doc(hidden)]
    pub fn writeln_fmt(&mut self, args: fmt::Arguments<'_>) -> fmt::Result {
        self.write_fmt(args)?;
        self.blank_line()
    }
}

/// Restores the previous indentation when dropped.
pub struct IndentGuard {
    depth: Rc<Cell<usize>>,
}

impl Drop for IndentGuard {
    fn drop(&mut self) {
        self.depth.set(self.depth.get().saturating_sub(1));
    }
}

/// `writeln!` for [`CodeWriter`].
#[macro_export]
macro_rules! cw_writeln {
    ($writer:expr, $($arg:tt)*) => {
        $writer.writeln_fmt(format_args!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_blocks_use_tabs() {
        let mut out = String::new();
        let mut w = CodeWriter::go(&mut out);
        w.block("func f()", |w| {
            w.block("if x", |w| w.writeln("return"))?;
            w.writeln("y()")
        })
        .unwrap();
        assert_eq!(out, "func f() {\n\tif x {\n\t\treturn\n\t}\n\ty()\n}\n");
    }

    #[test]
    fn blank_lines_carry_no_indent() {
        let mut out = String::new();
        let mut w = CodeWriter::go(&mut out);
        w.block("type T struct", |w| {
            w.writeln("a int")?;
            w.blank_line()?;
            w.writeln("b int")
        })
        .unwrap();
        assert_eq!(out, "type T struct {\n\ta int\n\n\tb int\n}\n");
    }

    #[test]
    fn paren_block_and_comment() {
        let mut out = String::new();
        let mut w = CodeWriter::go(&mut out);
        w.paren_block("import", |w| {
            w.comment("runtime")?;
            w.writeln("\"context\"")
        })
        .unwrap();
        assert_eq!(out, "import (\n\t// runtime\n\t\"context\"\n)\n");
    }

    #[test]
    fn formatted_lines() {
        let mut out = String::new();
        let mut w = CodeWriter::go(&mut out);
        w.write("f(a, b)").unwrap();
        cw_writeln!(w, " // {}", 2).unwrap();
        assert_eq!(out, "f(a, b) // 2\n");
    }

    #[test]
    fn guard_restores_depth() {
        let mut out = String::new();
        let mut w = CodeWriter::new(&mut out, "  ");
        {
            let _indent = w.indent();
            w.writeln("one").unwrap();
        }
        w.writeln("zero").unwrap();
        assert_eq!(out, "  one\nzero\n");
    }
}
