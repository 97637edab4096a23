use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
    sync::Arc,
};

use crate::{BatchCommand, CommandRegistry, Result};

/// Shape of the generated HTML.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Table of contents followed by one anchored section per command, sorted by name.
    Indexed,
    /// Documentation of every command in registration order.
    Plain,
}

/// Writes the documentation of `registry` to `out`.
pub fn write_documentation(
    registry: &CommandRegistry,
    layout: Layout,
    out: &mut impl Write,
) -> io::Result<()> {
    match layout {
        Layout::Indexed => write_indexed(&registry.sorted(), out),
        Layout::Plain => write_plain(registry.commands(), out),
    }
}

/// Writes the documentation of `registry` to the file at `path`, replacing it.
pub fn generate_documentation(
    registry: &CommandRegistry,
    layout: Layout,
    path: impl AsRef<Path>,
) -> Result<()> {
    let path = path.as_ref();
    let mut out = BufWriter::new(File::create(path)?);
    write_documentation(registry, layout, &mut out)?;
    out.flush()?;

    tracing::info!(
        "Wrote documentation of {} commands to {}",
        registry.len(),
        path.display()
    );
    Ok(())
}

fn write_indexed(commands: &[Arc<BatchCommand>], out: &mut impl Write) -> io::Result<()> {
    write!(out, "<html>\n<article>\n<h1>Table of content</h1>\n<ul>")?;
    for (i, command) in commands.iter().enumerate() {
        writeln!(out, "<li><a href=\"#command{i}\">{}</a>", command.name())?;
    }
    write!(out, "</ul><br><h1>Content</h1>\n<br>")?;

    for (i, command) in commands.iter().enumerate() {
        write!(
            out,
            "<hr>\n<h3 id=\"command{i}\">{}</h3>\n\n{}\n<br>",
            command.name(),
            command.documentation().unwrap_or_default()
        )?;
    }
    write!(out, "</article>\n</html>")
}

fn write_plain(commands: &[Arc<BatchCommand>], out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "<html>")?;
    for command in commands {
        write!(out, "{}", command.documentation().unwrap_or_default())?;
    }
    write!(out, "\n</html>")
}

#[cfg(test)]
mod tests {
    use expect_test::{expect, Expect};

    use super::*;

    fn registry() -> CommandRegistry {
        let mut registry = CommandRegistry::new();
        for command in [
            BatchCommand::with_documentation("VerifyProof", "<p>Verifies proofs.</p>"),
            BatchCommand::new("Clear"),
            BatchCommand::with_documentation("loadFile", "<p>Loads a file.</p>"),
        ] {
            registry.register(command).unwrap();
        }
        registry
    }

    fn check(layout: Layout, expect: Expect) {
        let mut out = Vec::new();
        write_documentation(&registry(), layout, &mut out).unwrap();
        expect.assert_eq(&String::from_utf8(out).unwrap());
    }

    #[test]
    fn indexed_layout() {
        check(
            Layout::Indexed,
            expect![[r##"
                <html>
                <article>
                <h1>Table of content</h1>
                <ul><li><a href="#command0">Clear</a>
                <li><a href="#command1">loadFile</a>
                <li><a href="#command2">VerifyProof</a>
                </ul><br><h1>Content</h1>
                <br><hr>
                <h3 id="command0">Clear</h3>


                <br><hr>
                <h3 id="command1">loadFile</h3>

                <p>Loads a file.</p>
                <br><hr>
                <h3 id="command2">VerifyProof</h3>

                <p>Verifies proofs.</p>
                <br></article>
                </html>"##]],
        );
    }

    #[test]
    fn plain_layout() {
        check(
            Layout::Plain,
            expect![[r#"
                <html>
                <p>Verifies proofs.</p><p>Loads a file.</p>
                </html>"#]],
        );
    }

    #[test]
    fn empty_registry() {
        let mut out = Vec::new();
        write_documentation(&CommandRegistry::new(), Layout::Plain, &mut out).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "<html>\n\n</html>");
    }
}
