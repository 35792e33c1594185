//! Plain-text table of a sheet followed by its dependency links.

use std::fmt;

use super::Sheet;

impl Sheet {
    /// The cell table alone, without the dependency dump.
    pub fn render_table(&self) -> String {
        let mut out = String::new();
        out.push_str("    ID |  Value | Contents\n");
        out.push_str("-------+--------+---------------\n");
        for (id, cell) in self.cells() {
            out.push_str(&format!(
                "{:>6} |{:>7} | '{}'\n",
                id,
                cell.display_text(),
                cell.contents()
            ));
        }
        out
    }
}

impl fmt::Display for Sheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_table())?;
        writeln!(f)?;
        writeln!(f, "Cell Dependencies")?;
        write!(f, "{}", self.graph)
    }
}
