//! Paginated PDF export of a conversation.

use std::fs;
use std::path::Path;

use printpdf::{BuiltinFont, Color, Line, Mm, PdfDocument, Point, Rgb};
use sanderson_core::model::ChatMessage;
use tracing::info;

use crate::error::ExportError;

pub const TRANSCRIPT_TITLE: &str = "Sanderson AI Learning Chat History";
pub const IMAGE_NOTE: &str = "[User uploaded an image]";
pub const DEFAULT_TRANSCRIPT_FILE: &str = "sanderson-ai-chat.pdf";

// A4 portrait.
const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 10.0;
const LINE_HEIGHT_MM: f32 = 4.5;
const TITLE_PT: f32 = 16.0;
const BODY_PT: f32 = 10.0;

/// Page geometry in characters and lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLayout {
    pub width: usize,
    pub lines_per_page: usize,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            width: 90,
            lines_per_page: 60,
        }
    }
}

/// One line slot on a transcript page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptLine {
    Title(String),
    Text(String),
    Blank,
    /// Separator drawn between messages.
    Rule,
}

impl TranscriptLine {
    fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }
}

struct Pager {
    layout: PageLayout,
    pages: Vec<Vec<TranscriptLine>>,
}

impl Pager {
    fn new(layout: PageLayout) -> Self {
        Self {
            layout,
            pages: vec![Vec::new()],
        }
    }

    fn current(&mut self) -> &mut Vec<TranscriptLine> {
        if self.pages.is_empty() {
            self.pages.push(Vec::new());
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn remaining(&self) -> usize {
        let used = self.pages.last().map_or(0, Vec::len);
        self.layout.lines_per_page.saturating_sub(used)
    }

    fn page_is_empty(&self) -> bool {
        self.pages.last().is_none_or(Vec::is_empty)
    }

    fn new_page(&mut self) {
        self.pages.push(Vec::new());
    }

    /// Place a block, moving it to a fresh page when it does not fit here.
    fn push_block(&mut self, block: Vec<TranscriptLine>) {
        if block.len() > self.remaining() && !self.page_is_empty() {
            self.new_page();
        }
        for line in block {
            if self.remaining() == 0 {
                self.new_page();
            }
            self.current().push(line);
        }
    }

    fn push_separator(&mut self) {
        // Only when another line still fits after it.
        if self.remaining() >= 2 {
            self.current().push(TranscriptLine::Rule);
        }
    }
}

fn message_block(message: &ChatMessage, width: usize) -> Vec<TranscriptLine> {
    let text = format!("{}: {}", message.role.speaker(), message.content.trim());
    let mut lines: Vec<TranscriptLine> = text
        .lines()
        .flat_map(|line| {
            if line.is_empty() {
                vec![TranscriptLine::Blank]
            } else {
                textwrap::wrap(line, width)
                    .into_iter()
                    .map(|part| TranscriptLine::text(part.into_owned()))
                    .collect()
            }
        })
        .collect();
    if message.image.is_some() {
        lines.push(TranscriptLine::text(IMAGE_NOTE));
    }
    lines
}

/// Lay the conversation out into pages of lines.
///
/// # Errors
///
/// Returns `ExportError::Empty` when there are no messages.
pub fn paginate(
    messages: &[ChatMessage],
    layout: PageLayout,
) -> Result<Vec<Vec<TranscriptLine>>, ExportError> {
    if messages.is_empty() {
        return Err(ExportError::Empty);
    }
    let layout = PageLayout {
        width: layout.width.max(1),
        lines_per_page: layout.lines_per_page.max(1),
    };

    let mut pager = Pager::new(layout);
    pager.push_block(vec![
        TranscriptLine::Title(TRANSCRIPT_TITLE.to_string()),
        TranscriptLine::Blank,
    ]);
    for (i, message) in messages.iter().enumerate() {
        pager.push_block(message_block(message, layout.width));
        if i + 1 < messages.len() {
            pager.push_separator();
        }
    }
    Ok(pager.pages)
}

fn draw_pages(pages: &[Vec<TranscriptLine>]) -> Result<Vec<u8>, ExportError> {
    let (doc, first_page, first_layer) = PdfDocument::new(
        TRANSCRIPT_TITLE,
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Transcript",
    );
    let title_font = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
    let body_font = doc.add_builtin_font(BuiltinFont::Helvetica)?;

    for (i, page) in pages.iter().enumerate() {
        let (page_index, layer_index) = if i == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Transcript")
        };
        let layer = doc.get_page(page_index).get_layer(layer_index);

        // PDF y runs up from the bottom edge.
        let mut y = PAGE_HEIGHT_MM - MARGIN_MM - LINE_HEIGHT_MM;
        for line in page {
            match line {
                TranscriptLine::Title(text) => {
                    layer.use_text(text, TITLE_PT, Mm(MARGIN_MM), Mm(y), &title_font);
                }
                TranscriptLine::Text(text) => {
                    layer.use_text(text, BODY_PT, Mm(MARGIN_MM), Mm(y), &body_font);
                }
                TranscriptLine::Blank => {}
                TranscriptLine::Rule => {
                    let rule_y = Mm(y + LINE_HEIGHT_MM / 2.0);
                    layer.set_outline_color(Color::Rgb(Rgb::new(0.78, 0.78, 0.78, None)));
                    layer.set_outline_thickness(0.5);
                    layer.add_line(Line {
                        points: vec![
                            (Point::new(Mm(MARGIN_MM), rule_y), false),
                            (Point::new(Mm(PAGE_WIDTH_MM - MARGIN_MM), rule_y), false),
                        ],
                        is_closed: false,
                    });
                }
            }
            y -= LINE_HEIGHT_MM;
        }
    }

    Ok(doc.save_to_bytes()?)
}

/// Render the transcript as PDF bytes, one PDF page per laid-out page.
///
/// # Errors
///
/// Returns `ExportError::Empty` when there are no messages or `ExportError::Pdf`
/// when the document cannot be produced.
pub fn render_transcript(
    messages: &[ChatMessage],
    layout: PageLayout,
) -> Result<Vec<u8>, ExportError> {
    let pages = paginate(messages, layout)?;
    draw_pages(&pages)
}

/// Write the transcript PDF to `path`.
///
/// # Errors
///
/// Returns `ExportError::Empty` for an empty conversation, `ExportError::Pdf` when
/// rendering fails, or `ExportError::Io` when the file cannot be written.
pub fn export_transcript(
    path: &Path,
    messages: &[ChatMessage],
    layout: PageLayout,
) -> Result<(), ExportError> {
    let bytes = render_transcript(messages, layout)?;
    fs::write(path, bytes)?;
    info!(path = %path.display(), messages = messages.len(), "transcript exported");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sanderson_core::model::{ImageDataUri, UserMessageDraft};
    use sanderson_core::time::fixed_now;

    fn user(text: &str) -> ChatMessage {
        UserMessageDraft {
            text: text.to_string(),
            image: None,
        }
        .validate(fixed_now())
        .unwrap()
    }

    fn text(value: &str) -> TranscriptLine {
        TranscriptLine::text(value)
    }

    #[test]
    fn empty_conversation_is_rejected() {
        assert!(matches!(
            render_transcript(&[], PageLayout::default()),
            Err(ExportError::Empty)
        ));
    }

    #[test]
    fn prefixes_title_and_image_note() {
        let mut with_image = user("");
        with_image.image = Some(ImageDataUri::parse("data:image/png;base64,aGk=").unwrap());
        let messages = vec![
            user("What is a GAN?"),
            ChatMessage::assistant("A generative model.", fixed_now()),
            with_image,
        ];
        let pages = paginate(&messages, PageLayout::default()).unwrap();
        assert_eq!(pages.len(), 1);
        let lines = &pages[0];
        assert_eq!(lines[0], TranscriptLine::Title(TRANSCRIPT_TITLE.into()));
        assert!(lines.contains(&text("You: What is a GAN?")));
        assert!(lines.contains(&text("Christian: A generative model.")));
        assert!(lines.contains(&text(IMAGE_NOTE)));
        assert_eq!(
            lines.iter().filter(|l| **l == TranscriptLine::Rule).count(),
            2
        );
    }

    #[test]
    fn long_messages_wrap_to_width() {
        let layout = PageLayout {
            width: 20,
            lines_per_page: 60,
        };
        let pages = paginate(&[user(&"word ".repeat(30))], layout).unwrap();
        assert!(pages[0].iter().all(|line| match line {
            TranscriptLine::Text(t) => t.chars().count() <= 20,
            _ => true,
        }));
        assert!(pages[0].len() > 3);
    }

    #[test]
    fn message_that_does_not_fit_starts_new_page() {
        let layout = PageLayout {
            width: 10,
            lines_per_page: 6,
        };
        // title + blank + 1 line + separator = 4 lines; next block needs 3.
        let messages = vec![user("hi"), user("aaaa bbbb cccc dddd eeee")];
        let pages = paginate(&messages, layout).unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].last(), Some(&TranscriptLine::Rule));
        assert_eq!(pages[1][0], text("You: aaaa"));
    }

    #[test]
    fn no_separator_when_page_is_full() {
        let layout = PageLayout {
            width: 40,
            lines_per_page: 3,
        };
        let pages = paginate(&[user("one"), user("two")], layout).unwrap();
        assert_eq!(
            pages[0],
            vec![
                TranscriptLine::Title(TRANSCRIPT_TITLE.into()),
                TranscriptLine::Blank,
                text("You: one"),
            ]
        );
        assert_eq!(pages[1], vec![text("You: two")]);
    }

    #[test]
    fn multi_page_transcript_renders_as_pdf() {
        let layout = PageLayout {
            width: 10,
            lines_per_page: 6,
        };
        let messages = vec![user("hi"), user("aaaa bbbb cccc dddd eeee")];
        let bytes = render_transcript(&messages, layout).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn export_writes_pdf_file() {
        let path = std::env::temp_dir().join(format!(
            "sanderson-transcript-{}.pdf",
            std::process::id()
        ));
        export_transcript(&path, &[user("hello")], PageLayout::default()).unwrap();
        let written = fs::read(&path).unwrap();
        assert!(written.starts_with(b"%PDF-"));
        fs::remove_file(path).unwrap();
    }
}
