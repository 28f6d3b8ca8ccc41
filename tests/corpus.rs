use glob::glob;
use pretty_assertions::assert_eq;

use gn_syntax::engine::ast::to_sexp;
use gn_syntax::parse;

struct Case {
    name: String,
    input: String,
    expected: String,
}

fn is_rule(line: &str, ch: char) -> bool {
    line.len() >= 3 && line.chars().all(|c| c == ch)
}

/// Split a corpus file into `=== name ===` / input / `---` / expected tree cases.
fn cases(text: &str) -> Vec<Case> {
    let mut out = Vec::new();
    let mut lines = text.lines().peekable();
    while let Some(line) = lines.next() {
        if !is_rule(line, '=') {
            continue;
        }
        let name = lines.next().unwrap_or_default().trim().to_string();
        lines.next();
        let mut input = Vec::new();
        for line in lines.by_ref() {
            if is_rule(line, '-') {
                break;
            }
            input.push(line);
        }
        let mut expected = Vec::new();
        while let Some(line) = lines.next_if(|l| !is_rule(l, '=')) {
            expected.push(line);
        }
        out.push(Case {
            name,
            input: input.join("\n").trim_matches('\n').to_string(),
            expected: expected.join("\n"),
        });
    }
    out
}

fn normalize(sexp: &str) -> String {
    sexp.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace("( ", "(")
        .replace(" )", ")")
}

#[test]
fn corpus_trees_match() {
    let mut seen = 0;
    for entry in glob("tests/corpus/*.txt").unwrap() {
        let path = entry.unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        for case in cases(&text) {
            let tree = parse(&case.input).unwrap();
            assert_eq!(
                normalize(&to_sexp(tree.root_node(), case.input.as_bytes())),
                normalize(&case.expected),
                "{}: {}",
                path.display(),
                case.name
            );
            seen += 1;
        }
    }
    assert!(seen >= 10, "only {seen} corpus cases found");
}

#[test]
fn corpus_trees_cover_their_input() {
    for entry in glob("tests/corpus/*.txt").unwrap() {
        let text = std::fs::read_to_string(entry.unwrap()).unwrap();
        for case in cases(&text) {
            let tree = parse(&case.input).unwrap();
            let root = tree.root_node();
            assert_eq!(root.end_byte(), case.input.len(), "{}", case.name);
            let errors = case.expected.contains("ERROR") || case.expected.contains("MISSING");
            assert_eq!(root.has_error(), errors, "{}", case.name);
        }
    }
}
