//! Minimal aligned-column rendering for console diagnostics.

/// Renders `rows` under `headers` as space-padded columns with a rule
/// below the header line. Column widths follow the widest cell.
pub fn render(headers: &[&str], rows: &[Vec<String>]) -> String {
  let columns = headers.len();

  let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
  for row in rows {
    for (i, cell) in row.iter().take(columns).enumerate() {
      widths[i] = widths[i].max(cell.chars().count());
    }
  }

  let mut out = String::new();

  push_row(&mut out, headers.iter().copied(), &widths);

  let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
  push_row(&mut out, rule.iter().map(|s| s.as_str()), &widths);

  for row in rows {
    push_row(&mut out, row.iter().map(|s| s.as_str()), &widths);
  }

  out
}

fn push_row<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
  let mut first = true;

  for (cell, width) in cells.zip(widths) {
    if !first {
      out.push_str("  ");
    }
    first = false;

    out.push_str(cell);
    for _ in cell.chars().count()..*width {
      out.push(' ');
    }
  }

  // No trailing padding on the last column.
  while out.ends_with(' ') {
    out.pop();
  }
  out.push('\n');
}
