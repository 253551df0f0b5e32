use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str};

use super::EXPIRY_FORMAT;
use crate::core::exporter::Exporter;
use crate::core::models::{code::VotingCode, tally::Tally};
use crate::error::Error;

const PAGE: (f32, f32) = (595.0, 842.0);
const LEFT: f32 = 100.0;
const TOP: f32 = 800.0;
const BOTTOM: f32 = 50.0;
const REGULAR: Name = Name(b"F1");
const BOLD: Name = Name(b"F2");

enum Line {
    Title(String),
    Text { indent: f32, text: String },
    Gap,
}

/// Plain text listing on A4 pages using the built-in Helvetica faces.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExporter;

// The standard Type1 fonts only cover Latin-1 reliably.
fn latin(text: &str) -> Vec<u8> {
    text.chars().map(|c| if c.is_ascii() { c as u8 } else { b'?' }).collect()
}

fn paginate(lines: Vec<Line>) -> Vec<Content> {
    let mut pages = Vec::new();
    let mut content = Content::new();
    let mut y = TOP;
    for line in lines {
        let (font, size, x, text, step) = match line {
            Line::Gap => {
                y -= 10.0;
                continue;
            }
            Line::Title(text) => (BOLD, 16.0, LEFT, text, 30.0),
            Line::Text { indent, text } => (REGULAR, 12.0, LEFT + indent, text, 20.0),
        };
        if y < BOTTOM {
            pages.push(std::mem::replace(&mut content, Content::new()));
            y = TOP;
        }
        content.begin_text();
        content.set_font(font, size);
        content.next_line(x, y);
        content.show(Str(&latin(&text)));
        content.end_text();
        y -= step;
    }
    pages.push(content);
    pages
}

fn render(lines: Vec<Line>) -> Vec<u8> {
    let catalog_id = Ref::new(1);
    let tree_id = Ref::new(2);
    let regular_id = Ref::new(3);
    let bold_id = Ref::new(4);
    let pages = paginate(lines);
    let page_ids: Vec<(Ref, Ref)> = (0..pages.len() as i32).map(|i| (Ref::new(5 + 2 * i), Ref::new(6 + 2 * i))).collect();

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(tree_id);
    pdf.pages(tree_id).kids(page_ids.iter().map(|(page, _)| *page)).count(page_ids.len() as i32);
    pdf.type1_font(regular_id).base_font(Name(b"Helvetica"));
    pdf.type1_font(bold_id).base_font(Name(b"Helvetica-Bold"));
    for (content, (page_id, content_id)) in pages.into_iter().zip(page_ids) {
        let mut page = pdf.page(page_id);
        page.media_box(Rect::new(0.0, 0.0, PAGE.0, PAGE.1));
        page.parent(tree_id);
        page.contents(content_id);
        page.resources().fonts().pair(REGULAR, regular_id).pair(BOLD, bold_id);
        page.finish();
        pdf.stream(content_id, &content.finish());
    }
    pdf.finish()
}

impl Exporter for PdfExporter {
    const CONTENT_TYPE: &'static str = "application/pdf";
    const EXTENSION: &'static str = "pdf";

    fn results(&self, tally: &Tally) -> Result<Vec<u8>, Error> {
        let mut lines = vec![Line::Title("Voting Results".into())];
        for category in &tally.categories {
            lines.push(Line::Text {
                indent: 0.0,
                text: format!("Category: {}", category.name),
            });
            for c in &category.candidates {
                lines.push(Line::Text {
                    indent: 20.0,
                    text: format!("Candidate: {} - Votes: {}", c.name, c.votes),
                });
            }
            lines.push(Line::Gap);
        }
        Ok(render(lines))
    }

    fn codes(&self, codes: &[VotingCode]) -> Result<Vec<u8>, Error> {
        let mut lines = vec![Line::Title("Generated Codes".into())];
        lines.extend(codes.iter().map(|c| Line::Text {
            indent: 0.0,
            text: format!("Code: {} - Expiry Time: {}", c.code, c.expires_at.format(EXPIRY_FORMAT)),
        }));
        Ok(render(lines))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::models::tally::{CandidateTally, CategoryTally};
    use chrono::Utc;

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn test_results_listing() {
        let bytes = PdfExporter.results(&Tally::default()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(contains(&bytes, b"(Voting Results)"));
        assert!(contains(&bytes, b"/Count 1"));
    }

    #[test]
    fn test_results_list_every_candidate() {
        let tally = Tally {
            categories: vec![CategoryTally {
                id: 1,
                name: "A".into(),
                candidates: vec![
                    CandidateTally {
                        id: 1,
                        name: "x".into(),
                        votes: 2,
                    },
                    CandidateTally {
                        id: 2,
                        name: "y".into(),
                        votes: 0,
                    },
                ],
            }],
        };
        let bytes = PdfExporter.results(&tally).unwrap();
        assert!(contains(&bytes, b"(Category: A)"));
        assert!(contains(&bytes, b"(Candidate: x - Votes: 2)"));
        assert!(contains(&bytes, b"(Candidate: y - Votes: 0)"));
    }

    #[test]
    fn test_long_code_listing_spans_pages() {
        let codes: Vec<VotingCode> = (0..100)
            .map(|i| VotingCode {
                id: i,
                code: format!("C{:04}", i),
                used: false,
                expires_at: Utc::now(),
            })
            .collect();
        let bytes = PdfExporter.codes(&codes).unwrap();
        assert!(contains(&bytes, b"(Code: C0099 - Expiry Time: "));
        assert!(contains(&bytes, b"/Count 3"));
    }

    #[test]
    fn test_non_latin_names_do_not_break_rendering() {
        assert_eq!(latin("Zoë"), b"Zo?".to_vec());
    }
}
