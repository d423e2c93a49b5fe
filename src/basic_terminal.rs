use super::algorithm::{Alignment, AlignmentStatus, Segment};
use crossterm::style::{style, Color, Stylize};
use std::io;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

fn status_color(status: AlignmentStatus) -> Color {
    match status {
        AlignmentStatus::Matched => Color::Green,
        AlignmentStatus::Split | AlignmentStatus::Merged => Color::Cyan,
        AlignmentStatus::Ambiguous => Color::Yellow,
        AlignmentStatus::Deleted => Color::Red,
        AlignmentStatus::Inserted => Color::Magenta,
    }
}

/// Greedy word wrap to `width` terminal columns. Words wider than a line are
/// broken between characters.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = vec![];
    let mut current_line = String::new();
    let mut current_width = 0;
    for word in text.split_whitespace() {
        let word_width = word.width();
        if current_width > 0 && current_width + 1 + word_width > width {
            lines.push(std::mem::take(&mut current_line));
            current_width = 0;
        }
        if current_width > 0 {
            current_line.push(' ');
            current_width += 1;
        }
        for c in word.chars() {
            let char_width = c.width().unwrap_or(0);
            if current_width + char_width > width && current_width > 0 {
                lines.push(std::mem::take(&mut current_line));
                current_width = 0;
            }
            current_line.push(c);
            current_width += char_width;
        }
    }
    if !current_line.is_empty() {
        lines.push(current_line);
    }
    lines
}

fn pad(line: &str, width: usize) -> String {
    let padding = width.saturating_sub(line.width());
    format!("{line}{}", " ".repeat(padding))
}

fn side_lines(segments: &[Segment], width: usize) -> Vec<String> {
    let mut lines = vec![];
    for segment in segments {
        let label = match segment.id() {
            Some(id) => format!("[{id}] "),
            None => format!("[#{}] ", segment.index()),
        };
        lines.extend(wrap(&format!("{label}{}", segment.text()), width));
    }
    lines
}

pub fn print_side_by_side(
    alignment: &Alignment,
    canonical: &[Segment],
    legacy: &[Segment],
    column_width: usize,
    color: bool,
    output: &mut impl io::Write,
) -> io::Result<()> {
    let width = column_width.max(8);
    let empty = " ".repeat(width);
    for step in alignment.steps() {
        let score = step.score.map(|score| format!(" {score:.3}")).unwrap_or_default();
        let header = format!("---{}{score}---", step.status);
        if color {
            writeln!(output, "{}", style(header).with(status_color(step.status)))?;
        } else {
            writeln!(output, "{header}")?;
        }

        let lines = [
            side_lines(&canonical[step.canonical.clone()], width),
            side_lines(&legacy[step.legacy.clone()], width),
        ];
        for i in 0..std::cmp::max(lines[0].len(), lines[1].len()) {
            let left = lines[0].get(i).map(|line| pad(line, width)).unwrap_or_else(|| empty.clone());
            let right = lines[1].get(i).map(String::as_str).unwrap_or("");
            writeln!(output, "{left} | {right}")?;
        }
    }
    Ok(())
}

pub fn print_summary(alignment: &Alignment, output: &mut impl io::Write) -> io::Result<()> {
    let counts: Vec<String> = alignment
        .counts()
        .filter(|&(_, count)| count > 0)
        .map(|(status, count)| format!("{status}: {count}"))
        .collect();
    writeln!(
        output,
        "{} canonical, {} legacy; {}",
        alignment.canonical_len(),
        alignment.legacy_len(),
        if counts.is_empty() { "nothing to align".to_owned() } else { counts.join(", ") }
    )
}

pub fn print_json(alignment: &Alignment, file_names: &[String; 2], output: &mut impl io::Write) -> io::Result<()> {
    let document = serde_json::json!({
        "canonical": file_names[0],
        "legacy": file_names[1],
        "alignment": alignment,
    });
    serde_json::to_writer_pretty(&mut *output, &document)?;
    writeln!(output)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::algorithm::{canonical_sequence, legacy_sequence, Aligner};

    #[test]
    fn wraps_on_word_boundaries() {
        assert_eq!(wrap("the quick brown fox", 10), vec!["the quick", "brown fox"]);
        assert_eq!(wrap("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert!(wrap("   ", 4).is_empty());
    }

    #[test]
    fn pads_by_display_width() {
        assert_eq!(pad("ab", 4), "ab  ");
        assert_eq!(pad("日本", 6), "日本  ");
    }

    #[test]
    fn side_by_side_plain() {
        let canonical = canonical_sequence([(Some("a:1".to_owned()), "alpha beta")]);
        let legacy = legacy_sequence(["alpha beta"]);
        let alignment = Aligner::default().align(&canonical, &legacy);
        let mut output = vec![];
        print_side_by_side(&alignment, &canonical, &legacy, 20, false, &mut output).unwrap();
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "---MATCHED 1.000---\n[a:1] alpha beta     | [#0] alpha beta\n"
        );
    }

    #[test]
    fn summary_lists_nonzero_counts() {
        let canonical = canonical_sequence([(None, "alpha beta")]);
        let legacy = legacy_sequence(["gamma delta"]);
        let alignment = Aligner::default().align(&canonical, &legacy);
        let mut output = vec![];
        print_summary(&alignment, &mut output).unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "1 canonical, 1 legacy; DELETED: 1, INSERTED: 1\n");
    }

    #[test]
    fn json_uses_status_names() {
        let canonical = canonical_sequence([(None, "alpha beta")]);
        let alignment = Aligner::default().align(&canonical, &[]);
        let mut output = vec![];
        print_json(&alignment, &["c".to_owned(), "l".to_owned()], &mut output).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(value["alignment"]["steps"][0]["status"], "DELETED");
        assert_eq!(value["alignment"]["steps"][0]["score"], serde_json::Value::Null);
        assert_eq!(value["alignment"]["counts"]["DELETED"], 1);
    }
}
