use crate::algorithm::{canonical_sequence, legacy_sequence, Segment};
use anyhow::Context as _;

#[derive(Default, Debug)]
pub struct ProgramInput {
    pub pairs: Vec<(Vec<Segment>, Vec<Segment>)>,
    pub file_names: Vec<[String; 2]>,
}

/// One canonical segment per non-empty line, either `id<TAB>text` or just `text`.
pub fn parse_canonical(content: &str) -> Vec<Segment> {
    canonical_sequence(
        content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| match line.split_once('\t') {
                Some((id, text)) => (Some(id.trim().to_owned()), text.trim()),
                None => (None, line),
            }),
    )
}

/// One legacy paragraph per non-empty line, trimmed.
pub fn parse_legacy(content: &str) -> Vec<Segment> {
    legacy_sequence(content.lines().map(str::trim).filter(|line| !line.is_empty()))
}

fn read_lossy(name: &str) -> anyhow::Result<String> {
    let bytes = std::fs::read(name).with_context(|| format!("reading {name}"))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub fn read_file_list(files: &[String]) -> anyhow::Result<ProgramInput> {
    assert_eq!(files.len() % 2, 0);

    let mut result = ProgramInput::default();

    for chunk in files.chunks_exact(2) {
        let canonical_name = chunk[0].clone();
        let legacy_name = chunk[1].clone();
        let canonical = parse_canonical(&read_lossy(&canonical_name)?);
        let legacy = parse_legacy(&read_lossy(&legacy_name)?);
        log::info!(
            "read {} canonical segments from {canonical_name} and {} legacy paragraphs from {legacy_name}",
            canonical.len(),
            legacy.len()
        );
        result.pairs.push((canonical, legacy));
        result.file_names.push([canonical_name, legacy_name]);
    }

    Ok(result)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn canonical_lines_with_and_without_ids() {
        let segments = parse_canonical("mn8:1.1\tThus have I heard.\n\n  untagged line  \nmn8:1.2\t At one time \n");
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].id(), Some("mn8:1.1"));
        assert_eq!(segments[0].text(), "Thus have I heard.");
        assert_eq!(segments[1].id(), None);
        assert_eq!(segments[1].text(), "untagged line");
        assert_eq!(segments[2].index(), 2);
        assert_eq!(segments[2].text(), "At one time");
    }

    #[test]
    fn legacy_lines_are_trimmed() {
        let segments = parse_legacy("  first paragraph \r\n\r\nsecond\n");
        let texts: Vec<&str> = segments.iter().map(Segment::text).collect();
        assert_eq!(texts, vec!["first paragraph", "second"]);
        assert!(segments.iter().all(|segment| segment.id().is_none()));
    }

    #[test]
    fn reads_pairs_of_files() {
        let dir = tempfile::tempdir().unwrap();
        let canonical = dir.path().join("mn8.canonical");
        let legacy = dir.path().join("mn8.legacy");
        std::fs::write(&canonical, "mn8:1.1\tThus have I heard\n").unwrap();
        std::fs::write(&legacy, "Thus have I heard\n").unwrap();

        let files = [canonical, legacy].map(|path| path.to_string_lossy().into_owned());
        let input = read_file_list(&files).unwrap();
        assert_eq!(input.pairs.len(), 1);
        assert_eq!(input.file_names[0], files);
        assert_eq!(input.pairs[0].0[0].id(), Some("mn8:1.1"));
    }

    #[test]
    fn missing_file_names_the_path() {
        let error = read_file_list(&["/nonexistent/a".to_owned(), "/nonexistent/b".to_owned()]).unwrap_err();
        assert_eq!(error.to_string(), "reading /nonexistent/a");
    }
}
