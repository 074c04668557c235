use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};

const HASHTAG_COLOR: &str = "#3584e4";

#[derive(Debug, Clone, PartialEq)]
pub enum PostBlock {
    Paragraph(Vec<InlineSpan>),
    Heading { level: u8, spans: Vec<InlineSpan> },
    List { ordered: bool, items: Vec<Vec<InlineSpan>> },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InlineSpan {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    pub hashtag: bool,
}

/// Parse generated post text. Single line breaks are kept since posts use
/// them for layout.
pub fn parse_post(input: &str) -> Vec<PostBlock> {
    let mut ctx = ParseContext::default();
    for event in Parser::new_ext(input, Options::ENABLE_STRIKETHROUGH) {
        ctx.handle_event(event);
    }
    ctx.finish()
}

#[derive(Default)]
struct ParseContext {
    blocks: Vec<PostBlock>,
    spans: Vec<InlineSpan>,
    bold: bool,
    italic: bool,
    heading_level: Option<u8>,
    list: Option<(bool, Vec<Vec<InlineSpan>>)>,
}

impl ParseContext {
    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                self.flush();
                self.heading_level = Some(heading_level_to_u8(level));
            }
            Event::Start(Tag::Strong) => self.bold = true,
            Event::Start(Tag::Emphasis) => self.italic = true,
            Event::Start(Tag::List(start)) => {
                self.flush();
                self.list = Some((start.is_some(), Vec::new()));
            }
            Event::End(TagEnd::Strong) => self.bold = false,
            Event::End(TagEnd::Emphasis) => self.italic = false,
            Event::End(TagEnd::Paragraph) => {
                if self.list.is_none() {
                    self.flush();
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                let spans = std::mem::take(&mut self.spans);
                if let Some(level) = self.heading_level.take() {
                    self.blocks.push(PostBlock::Heading { level, spans });
                }
            }
            Event::End(TagEnd::Item) => {
                let spans = std::mem::take(&mut self.spans);
                if let Some((_, items)) = self.list.as_mut() {
                    items.push(spans);
                }
            }
            Event::End(TagEnd::List(_)) => {
                if let Some((ordered, items)) = self.list.take() {
                    self.blocks.push(PostBlock::List { ordered, items });
                }
            }
            Event::Text(text) | Event::Code(text) => self.push_text(&text),
            Event::SoftBreak | Event::HardBreak => self.push_text("\n"),
            _ => {}
        }
    }

    fn push_text(&mut self, text: &str) {
        for (piece, hashtag) in split_hashtags(text) {
            self.spans.push(InlineSpan {
                text: piece.to_string(),
                bold: self.bold,
                italic: self.italic,
                hashtag,
            });
        }
    }

    fn flush(&mut self) {
        if self.spans.is_empty() {
            return;
        }
        let spans = std::mem::take(&mut self.spans);
        self.blocks.push(PostBlock::Paragraph(spans));
    }

    fn finish(mut self) -> Vec<PostBlock> {
        self.flush();
        self.blocks
    }
}

fn heading_level_to_u8(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn is_tag_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Splits text into runs, flagging `#word` runs.
fn split_hashtags(text: &str) -> Vec<(&str, bool)> {
    let mut pieces = Vec::new();
    let mut plain_start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        let starts_word = i == 0 || !text[..i].ends_with(is_tag_char);
        if c != '#' || !starts_word {
            continue;
        }
        let mut end = i + 1;
        while let Some(&(j, next)) = chars.peek() {
            if !is_tag_char(next) {
                break;
            }
            end = j + next.len_utf8();
            chars.next();
        }
        if end == i + 1 {
            continue;
        }
        if plain_start < i {
            pieces.push((&text[plain_start..i], false));
        }
        pieces.push((&text[i..end], true));
        plain_start = end;
    }
    if plain_start < text.len() {
        pieces.push((&text[plain_start..], false));
    }
    pieces
}

/// Every hashtag in the text, in order of appearance.
pub fn extract_hashtags(text: &str) -> Vec<String> {
    split_hashtags(text)
        .into_iter()
        .filter(|(_, hashtag)| *hashtag)
        .map(|(tag, _)| tag.to_string())
        .collect()
}

/// Convert inline spans to Pango markup string
pub fn spans_to_pango_markup(spans: &[InlineSpan]) -> String {
    let mut markup = String::new();
    for span in spans {
        if span.hashtag {
            markup.push_str(&format!("<span foreground=\"{}\">", HASHTAG_COLOR));
        }
        if span.italic {
            markup.push_str("<i>");
        }
        if span.bold {
            markup.push_str("<b>");
        }

        markup.push_str(&glib::markup_escape_text(&span.text));

        if span.bold {
            markup.push_str("</b>");
        }
        if span.italic {
            markup.push_str("</i>");
        }
        if span.hashtag {
            markup.push_str("</span>");
        }
    }
    markup
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraph_text(block: &PostBlock) -> String {
        match block {
            PostBlock::Paragraph(spans) => spans.iter().map(|s| s.text.as_str()).collect(),
            other => panic!("Expected Paragraph, got {:?}", other),
        }
    }

    #[test]
    fn test_line_breaks_survive() {
        let blocks = parse_post("Just listed!\nOpen house Sunday");
        assert_eq!(blocks.len(), 1);
        assert_eq!(paragraph_text(&blocks[0]), "Just listed!\nOpen house Sunday");
    }

    #[test]
    fn test_bold_and_hashtags() {
        let blocks = parse_post("**3 bed** charmer #JustListed #DreamHome");
        let PostBlock::Paragraph(spans) = &blocks[0] else {
            panic!("Expected Paragraph");
        };
        assert!(spans.iter().any(|s| s.bold && s.text == "3 bed"));
        let tags: Vec<&str> = spans
            .iter()
            .filter(|s| s.hashtag)
            .map(|s| s.text.as_str())
            .collect();
        assert_eq!(tags, vec!["#JustListed", "#DreamHome"]);
    }

    #[test]
    fn test_heading_and_list() {
        let blocks = parse_post("# Open House\n\n- Pool\n- Garage\n\nCall today");
        assert_eq!(blocks.len(), 3);
        assert!(matches!(&blocks[0], PostBlock::Heading { level: 1, .. }));
        match &blocks[1] {
            PostBlock::List { ordered, items } => {
                assert!(!ordered);
                assert_eq!(items.len(), 2);
                assert_eq!(items[0][0].text, "Pool");
            }
            other => panic!("Expected List, got {:?}", other),
        }
        assert_eq!(paragraph_text(&blocks[2]), "Call today");
    }

    #[test]
    fn test_extract_hashtags() {
        assert_eq!(
            extract_hashtags("Great yard #HomeSweetHome, room #4 and a # alone, mail@x#y"),
            vec!["#HomeSweetHome", "#4"]
        );
        assert!(extract_hashtags("no tags here").is_empty());
    }

    #[test]
    fn test_pango_markup_escapes_text() {
        let spans = vec![
            InlineSpan {
                text: "Beds & baths <3".to_string(),
                bold: true,
                ..Default::default()
            },
            InlineSpan {
                text: "#Cozy".to_string(),
                hashtag: true,
                ..Default::default()
            },
        ];
        let markup = spans_to_pango_markup(&spans);
        assert!(markup.starts_with("<b>Beds &amp; baths &lt;3</b>"));
        assert!(markup.ends_with(&format!("<span foreground=\"{}\">#Cozy</span>", HASHTAG_COLOR)));
    }
}
