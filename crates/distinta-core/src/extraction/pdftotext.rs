use crate::config::schema::LayoutConfig;
use crate::error::BomError;
use crate::extraction::{PageFragments, TextLayerExtractor};
use crate::model::TextFragment;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::Write;
use std::process::Command;

/// PDF text-layer backend using pdftotext (from poppler-utils).
///
/// Runs `pdftotext -bbox-layout` and turns each run of closely spaced words
/// on a line into one [`TextFragment`], with coordinates flipped so that `y`
/// grows upward like PDF user space.
pub struct PdftotextExtractor {
    max_word_gap: f64,
}

impl PdftotextExtractor {
    pub fn new() -> Self {
        Self::with_word_gap(LayoutConfig::default().max_word_gap)
    }

    pub fn with_word_gap(max_word_gap: f64) -> Self {
        PdftotextExtractor { max_word_gap }
    }

    /// Check if pdftotext is available on the system.
    pub fn is_available() -> bool {
        Command::new("pdftotext")
            .arg("-v")
            .output()
            .map(|o| o.status.success() || !o.stderr.is_empty())
            .unwrap_or(false)
    }
}

impl Default for PdftotextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayerExtractor for PdftotextExtractor {
    fn extract_fragments(&self, pdf_bytes: &[u8]) -> Result<Vec<PageFragments>, BomError> {
        let mut tmpfile =
            tempfile::NamedTempFile::new().map_err(|e| BomError::Extraction(e.to_string()))?;
        tmpfile
            .write_all(pdf_bytes)
            .map_err(|e| BomError::Extraction(e.to_string()))?;

        let output = Command::new("pdftotext")
            .arg("-bbox-layout")
            .arg(tmpfile.path())
            .arg("-")
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    BomError::PdftotextNotFound
                } else {
                    BomError::Extraction(format!("pdftotext -bbox-layout failed: {}", e))
                }
            })?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            return Err(BomError::PdftotextFailed { code, stderr });
        }

        let xml = String::from_utf8_lossy(&output.stdout);
        let pages = parse_bbox_layout(&xml, self.max_word_gap)?;
        tracing::debug!(
            backend = self.backend_name(),
            pages = pages.len(),
            fragments = pages.iter().map(|p| p.fragments.len()).sum::<usize>(),
            "decoded PDF text layer"
        );
        Ok(pages)
    }

    fn backend_name(&self) -> &str {
        "pdftotext"
    }
}

#[derive(Debug, Clone)]
struct Word {
    text: String,
    x_min: f64,
    y_max: f64,
    x_max: f64,
}

struct PageState {
    height: f64,
    fragments: Vec<TextFragment>,
}

fn parse_bbox_layout(xml: &str, max_word_gap: f64) -> Result<Vec<PageFragments>, BomError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut pages = Vec::new();
    let mut page: Option<PageState> = None;
    let mut line_words: Vec<Word> = Vec::new();
    let mut current_word: Option<Word> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"page" => {
                    page = Some(PageState {
                        height: attr_f64(&e, b"height").unwrap_or(0.0),
                        fragments: Vec::new(),
                    });
                }
                b"line" => line_words.clear(),
                b"word" => current_word = parse_word_bbox(&e),
                _ => {}
            },
            Ok(Event::Text(t)) => {
                if let Some(word) = current_word.as_mut() {
                    let text = t
                        .unescape()
                        .map_err(|e| BomError::Extraction(format!("bad word text: {e}")))?;
                    word.text.push_str(&text);
                }
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"word" => {
                    if let Some(word) = current_word.take() {
                        if !word.text.trim().is_empty() {
                            line_words.push(word);
                        }
                    }
                }
                b"line" => {
                    if let Some(state) = page.as_mut() {
                        let merged = merge_words(&line_words, state.height, max_word_gap);
                        state.fragments.extend(merged);
                    }
                    line_words.clear();
                }
                b"page" => {
                    if let Some(state) = page.take() {
                        pages.push(PageFragments {
                            page_number: pages.len() + 1,
                            fragments: state.fragments,
                        });
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(BomError::Extraction(format!(
                    "invalid pdftotext output at byte {}: {e}",
                    reader.buffer_position()
                )))
            }
            _ => {}
        }
    }

    Ok(pages)
}

fn parse_word_bbox(tag: &BytesStart<'_>) -> Option<Word> {
    Some(Word {
        text: String::new(),
        x_min: attr_f64(tag, b"xMin")?,
        x_max: attr_f64(tag, b"xMax")?,
        y_max: attr_f64(tag, b"yMax")?,
    })
}

fn attr_f64(tag: &BytesStart<'_>, name: &[u8]) -> Option<f64> {
    tag.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == name)
        .and_then(|a| std::str::from_utf8(&a.value).ok()?.trim().parse().ok())
}

/// Merge consecutive words of one line into text runs.
fn merge_words(words: &[Word], page_height: f64, max_word_gap: f64) -> Vec<TextFragment> {
    let mut fragments = Vec::new();
    let mut current: Option<Word> = None;

    for word in words {
        let joins = current
            .as_ref()
            .is_some_and(|run| word.x_min >= run.x_min && word.x_min - run.x_max <= max_word_gap);
        if joins {
            if let Some(run) = current.as_mut() {
                run.text.push(' ');
                run.text.push_str(&word.text);
                run.x_max = run.x_max.max(word.x_max);
                run.y_max = run.y_max.max(word.y_max);
            }
        } else if let Some(run) = current.replace(word.clone()) {
            fragments.push(to_fragment(run, page_height));
        }
    }

    if let Some(run) = current {
        fragments.push(to_fragment(run, page_height));
    }

    fragments
}

fn to_fragment(run: Word, page_height: f64) -> TextFragment {
    TextFragment {
        text: run.text,
        x: run.x_min,
        y: page_height - run.y_max,
        width: run.x_max - run.x_min,
    }
}
