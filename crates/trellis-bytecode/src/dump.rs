//! Human-readable state table dump for debugging and tests.

use trellis_core::Colors;

use crate::table::StateTable;

/// Calculate the minimum width needed to display numbers up to `count - 1`.
fn width_for_count(count: usize) -> usize {
    if count <= 1 {
        1
    } else {
        ((count - 1) as f64).log10().floor() as usize + 1
    }
}

/// Render the published roots and every state of the table.
///
/// ```text
/// [roots]
/// R0 = S0
///
/// [states]
/// S0  accept 61-63
/// ```
pub fn dump(table: &StateTable, colors: Colors) -> String {
    let c = &colors;
    let mut out = String::new();
    let sw = width_for_count(table.states().len());
    let rw = width_for_count(table.roots().len());

    out.push_str(&format!("{}[roots]{}\n", c.blue, c.reset));
    for (i, root) in table.roots().iter().enumerate() {
        out.push_str(&format!("R{i:0rw$} = S{:0sw$}\n", root.get()));
    }
    out.push('\n');

    out.push_str(&format!("{}[states]{}\n", c.blue, c.reset));
    for (i, state) in table.states().iter().enumerate() {
        let mut parts = Vec::new();
        if !state.accept.is_empty() {
            parts.push(format!("accept {}{}{}", c.green, state.accept, c.reset));
        }
        for (set, target) in &state.next {
            parts.push(format!("{}{set}{} -> S{target:0sw$}", c.green, c.reset));
        }
        let body = if parts.is_empty() {
            format!("{}(dead){}", c.dim, c.reset)
        } else {
            parts.join("; ")
        };
        out.push_str(&format!("S{i:0sw$}  {body}\n"));
    }

    out
}
