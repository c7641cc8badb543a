use super::*;

/// Records every event as a string
#[derive(Debug, Default)]
struct Recorder {
    events: Vec<String>,
    reject_on: Option<&'static str>,
}

impl ElementHandler for Recorder {
    fn open_element(&mut self, path: &TagPath) -> Result<(), Violation> {
        if self.reject_on == path.last() {
            return Err(Violation::new(format!("Unknown tag in the path {path}")));
        }
        self.events.push(format!("open {path}"));
        Ok(())
    }

    fn close_element(&mut self, path: &TagPath, value: &str) -> Result<(), Violation> {
        self.events.push(format!("close {path} = '{value}'"));
        Ok(())
    }
}

fn run(input: &str) -> Result<Recorder, XmlError> {
    let mut recorder = Recorder::default();
    EventParser::new(input.as_bytes()).parse(&mut recorder)?;
    Ok(recorder)
}

#[test]
fn test_open_close_with_paths() {
    let recorder = run("<a><b>1</b><c>two</c></a>").unwrap();
    assert_eq!(
        recorder.events,
        vec![
            "open <a>",
            "open <a><b>",
            "close <a><b> = '1'",
            "open <a><c>",
            "close <a><c> = 'two'",
            "close <a> = ''",
        ]
    );
}

#[test]
fn test_mixed_content_excludes_children() {
    let xml = "<mean>\n  <i>3</i>\n  -0.125\n</mean>";
    let recorder = run(xml).unwrap();
    assert_eq!(recorder.events[2], "close <mean><i> = '3'");
    assert_eq!(recorder.events[3], "close <mean> = '-0.125'");
}

#[test]
fn test_empty_element_opens_and_closes() {
    let recorder = run("<a><b/></a>").unwrap();
    assert_eq!(recorder.events[1], "open <a><b>");
    assert_eq!(recorder.events[2], "close <a><b> = ''");
}

#[test]
fn test_declaration_and_comments_ignored() {
    let xml = "<?xml version=\"1.0\"?>\n<!-- model -->\n<a>x</a>";
    let recorder = run(xml).unwrap();
    assert_eq!(recorder.events, vec!["open <a>", "close <a> = 'x'"]);
}

#[test]
fn test_escaped_text_is_unescaped() {
    let recorder = run("<id>a&amp;b</id>").unwrap();
    assert_eq!(recorder.events[1], "close <id> = 'a&b'");
}

#[test]
fn test_mismatched_close_tag_reports_line() {
    let err = run("<a>\n<b>\n</c>\n</a>").unwrap_err();
    assert!(matches!(err, XmlError::Malformed { .. }));
    assert_eq!(err.line(), Some(3));
}

#[test]
fn test_unclosed_element_at_eof() {
    let err = run("<a>\n<b>1</b>\n").unwrap_err();
    match err {
        XmlError::UnexpectedEof { open, .. } => assert_eq!(open, "<a>"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_handler_rejection_carries_line() {
    let mut recorder = Recorder {
        reject_on: Some("bogus"),
        ..Default::default()
    };
    let xml = "<a>\n  <b>1</b>\n  <bogus>2</bogus>\n</a>";
    let err = EventParser::new(xml.as_bytes())
        .parse(&mut recorder)
        .unwrap_err();
    match err {
        XmlError::Rejected { line, message } => {
            assert_eq!(line, 3);
            assert!(message.contains("<a><bogus>"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_text_outside_root_is_malformed() {
    let err = run("<a/>trailing").unwrap_err();
    assert!(matches!(err, XmlError::Malformed { .. }));
}

#[test]
fn test_lines_past_large_buffer() {
    let mut xml = String::from("<a>\n");
    for i in 0..20_000 {
        xml.push_str(&format!("<b>{i}</b>\n"));
    }
    xml.push_str("<oops></a>");
    let err = run(&xml).unwrap_err();
    assert_eq!(err.line(), Some(20_002));
}
