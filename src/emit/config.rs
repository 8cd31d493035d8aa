// src/emit/config.rs
//! Layout of the generated file.
//!
//! Generated code has a single layout, the one `gofmt` produces.

/// Emitter configuration. All values are fixed for the canonical layout.
#[derive(Debug, Clone, Copy)]
pub struct EmitConfig {
    /// Width of one indentation level while rendering, before it becomes a tab
    pub indent_width: u8,
    /// Line width handed to the renderer
    pub max_line_width: u16,
}

impl Default for EmitConfig {
    fn default() -> Self {
        CANONICAL
    }
}

/// The canonical layout
pub const CANONICAL: EmitConfig = EmitConfig {
    indent_width: 4,
    max_line_width: 100,
};

impl EmitConfig {
    /// Replace each leading indentation level of `line` with a tab and drop
    /// trailing whitespace.
    pub fn retab(&self, line: &str) -> String {
        let line = line.trim_end();
        let spaces = line.len() - line.trim_start_matches(' ').len();
        let width = self.indent_width as usize;
        let mut out = "\t".repeat(spaces / width);
        out.push_str(&" ".repeat(spaces % width));
        out.push_str(&line[spaces..]);
        out
    }
}
