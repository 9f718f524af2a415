use anyhow::Context;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const DOCUMENT_PART: &str = "word/document.xml";

/// One line per `w:p` paragraph, in document order.
pub fn read_docx(path: &Path) -> anyhow::Result<String> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut archive = zip::ZipArchive::new(file).context("invalid DOCX container")?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .with_context(|| format!("missing {}", DOCUMENT_PART))?
        .read_to_string(&mut xml)
        .with_context(|| format!("reading {}", DOCUMENT_PART))?;

    paragraphs_from_xml(&xml)
}

/// Text boxes nest whole paragraphs inside a run of the outer one, so open
/// paragraphs are kept on a stack and each is flushed at its own end tag.
/// `mc:Fallback` repeats the preceding `mc:Choice` and is skipped.
fn paragraphs_from_xml(xml: &str) -> anyhow::Result<String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut text = String::new();
    let mut paragraphs: Vec<String> = Vec::new();
    let mut run_depth = 0usize;
    let mut properties_depth = 0usize;
    let mut fallback_depth = 0usize;
    let mut in_text_run = false;

    loop {
        match reader.read_event().context("malformed document.xml")? {
            Event::Start(e) => match e.name().as_ref() {
                b"mc:Fallback" => fallback_depth += 1,
                _ if fallback_depth > 0 => {}
                b"w:p" => paragraphs.push(String::new()),
                b"w:r" => run_depth += 1,
                b"w:pPr" => properties_depth += 1,
                b"w:t" => in_text_run = true,
                _ => {}
            },
            Event::Empty(e) => {
                let in_run = run_depth > 0 && properties_depth == 0;
                match e.name().as_ref() {
                    _ if fallback_depth > 0 => {}
                    // self-closing paragraph is an empty line
                    b"w:p" => text.push('\n'),
                    b"w:tab" if in_run => push_to_current(&mut paragraphs, "\t"),
                    b"w:br" | b"w:cr" if in_run => push_to_current(&mut paragraphs, "\n"),
                    _ => {}
                }
            }
            Event::Text(t) if in_text_run && fallback_depth == 0 => {
                push_to_current(&mut paragraphs, &t.unescape().context("bad text escape")?);
            }
            Event::End(e) => match e.name().as_ref() {
                b"mc:Fallback" => fallback_depth = fallback_depth.saturating_sub(1),
                _ if fallback_depth > 0 => {}
                b"w:t" => in_text_run = false,
                b"w:r" => run_depth = run_depth.saturating_sub(1),
                b"w:pPr" => properties_depth = properties_depth.saturating_sub(1),
                b"w:p" => {
                    if let Some(paragraph) = paragraphs.pop() {
                        text.push_str(&paragraph);
                        text.push('\n');
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(text)
}

fn push_to_current(paragraphs: &mut [String], fragment: &str) {
    if let Some(current) = paragraphs.last_mut() {
        current.push_str(fragment);
    }
}
