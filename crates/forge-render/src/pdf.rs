//! PDF export.
//!
//! The txt rendering laid out on US Letter pages in Helvetica. The writer
//! emits PDF 1.4 with one content stream per page, a cross-reference table
//! and no timestamps, so equal text always yields equal bytes.
//!
//! Page text is WinAnsi encoded; characters outside that set print as `?`.
//! The exact UTF-8 text is attached to the document as `prompt.txt`, so no
//! input character is lost from the file.

use forge_core::{BundleContent, ExportError, ExportFormat, RenderOptions};
use std::fmt::Write as _;
use std::sync::Arc;

use crate::text::TxtRenderer;
use crate::{FormatRenderer, RenderEnv};

const PAGE_WIDTH: u32 = 612;
const PAGE_HEIGHT: u32 = 792;
const MARGIN: u32 = 56;
const FONT_SIZE: u32 = 10;
const LEADING: u32 = 13;
const LINES_PER_PAGE: usize = 52;
const WRAP_COLUMNS: usize = 95;
const ATTACHMENT_NAME: &str = "prompt.txt";

pub struct PdfRenderer {
    text: TxtRenderer,
}

impl PdfRenderer {
    pub fn new(env: Arc<RenderEnv>) -> Self {
        Self {
            text: TxtRenderer::new(env),
        }
    }
}

impl FormatRenderer for PdfRenderer {
    fn format(&self) -> ExportFormat {
        ExportFormat::Pdf
    }

    fn render(&self, content: &BundleContent, options: &RenderOptions) -> Result<Vec<u8>, ExportError> {
        let text = self.text.render_text(content, options)?;
        Ok(encode(&text))
    }
}

/// Lay `text` out as a PDF document
pub fn encode(text: &str) -> Vec<u8> {
    let lines = layout(text);
    let pages: Vec<&[Vec<u8>]> = if lines.is_empty() {
        vec![&lines[..0]]
    } else {
        lines.chunks(LINES_PER_PAGE).collect()
    };

    let page_ids: Vec<usize> = (0..pages.len()).map(|i| 4 + 2 * i).collect();
    let attachment_id = 4 + 2 * pages.len();
    let filespec_id = attachment_id + 1;

    let kids = page_ids
        .iter()
        .map(|id| format!("{} 0 R", id))
        .collect::<Vec<_>>()
        .join(" ");

    let mut doc = PdfWriter::new();

    doc.object(
        1,
        format!(
            "<< /Type /Catalog /Pages 2 0 R /Names << /EmbeddedFiles << /Names [({}) {} 0 R] >> >> >>",
            ATTACHMENT_NAME, filespec_id
        )
        .as_bytes(),
    );
    doc.object(
        2,
        format!("<< /Type /Pages /Kids [{}] /Count {} >>", kids, pages.len()).as_bytes(),
    );
    doc.object(
        3,
        b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>",
    );

    for (page, id) in pages.iter().zip(&page_ids) {
        doc.object(
            *id,
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] \
                 /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
                PAGE_WIDTH,
                PAGE_HEIGHT,
                id + 1
            )
            .as_bytes(),
        );
        doc.object(id + 1, &stream("", content_stream(page).as_bytes()));
    }

    doc.object(
        attachment_id,
        &stream("/Type /EmbeddedFile /Subtype /text#2Fplain", text.as_bytes()),
    );
    doc.object(
        filespec_id,
        format!(
            "<< /Type /Filespec /F ({name}) /UF ({name}) /EF << /F {} 0 R >> >>",
            attachment_id,
            name = ATTACHMENT_NAME
        )
        .as_bytes(),
    );

    doc.finish(1)
}

/// A stream object body with `extra` dictionary entries
fn stream(extra: &str, data: &[u8]) -> Vec<u8> {
    let dict = if extra.is_empty() {
        format!("<< /Length {} >>", data.len())
    } else {
        format!("<< {} /Length {} >>", extra, data.len())
    };
    let mut body = format!("{}\nstream\n", dict).into_bytes();
    body.extend_from_slice(data);
    body.extend_from_slice(b"\nendstream");
    body
}

/// Split into WinAnsi encoded lines no wider than the wrap width
fn layout(text: &str) -> Vec<Vec<u8>> {
    let mut lines = Vec::new();
    for raw in text.lines() {
        let line: Vec<u8> = raw.replace('\t', "    ").chars().map(win_ansi).collect();
        wrap(&line, &mut lines);
    }
    lines
}

/// WinAnsiEncoding code for `c`, `?` when it has none
fn win_ansi(c: char) -> u8 {
    match c {
        ' '..='~' => c as u8,
        '\u{A0}'..='\u{FF}' => c as u32 as u8,
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8A,
        '‹' => 0x8B,
        'Œ' => 0x8C,
        'Ž' => 0x8E,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9A,
        '›' => 0x9B,
        'œ' => 0x9C,
        'ž' => 0x9E,
        'Ÿ' => 0x9F,
        _ => b'?',
    }
}

fn trim_end(line: &[u8]) -> Vec<u8> {
    let len = line.iter().rposition(|b| *b != b' ').map_or(0, |i| i + 1);
    line[..len].to_vec()
}

fn wrap(line: &[u8], out: &mut Vec<Vec<u8>>) {
    if line.len() <= WRAP_COLUMNS {
        out.push(trim_end(line));
        return;
    }

    let mut current: Vec<u8> = Vec::new();
    for word in line.split(|b| *b == b' ') {
        let mut word = word;
        while word.len() > WRAP_COLUMNS {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
            let (head, tail) = word.split_at(WRAP_COLUMNS);
            out.push(head.to_vec());
            word = tail;
        }

        let needed = if current.is_empty() { word.len() } else { current.len() + 1 + word.len() };
        if needed > WRAP_COLUMNS {
            out.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(b' ');
        }
        current.extend_from_slice(word);
    }
    out.push(trim_end(&current));
}

fn content_stream(lines: &[Vec<u8>]) -> String {
    let mut stream = String::new();
    let _ = write!(
        stream,
        "BT\n/F1 {} Tf\n{} TL\n{} {} Td\n",
        FONT_SIZE,
        LEADING,
        MARGIN,
        PAGE_HEIGHT - MARGIN
    );
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            stream.push_str("T*\n");
        }
        let _ = writeln!(stream, "({}) Tj", escape(line));
    }
    stream.push_str("ET");
    stream
}

/// Escape a PDF literal string; bytes above ASCII are written as octal
fn escape(line: &[u8]) -> String {
    let mut out = String::with_capacity(line.len());
    for &b in line {
        match b {
            b'\\' | b'(' | b')' => {
                out.push('\\');
                out.push(b as char);
            }
            0x20..=0x7E => out.push(b as char),
            _ => {
                let _ = write!(out, "\\{:03o}", b);
            }
        }
    }
    out
}

/// Appends numbered objects and records their offsets for the xref table
struct PdfWriter {
    buf: Vec<u8>,
    offsets: Vec<(usize, usize)>,
}

impl PdfWriter {
    fn new() -> Self {
        let mut buf = b"%PDF-1.4\n".to_vec();
        buf.extend_from_slice(b"%\xE2\xE3\xCF\xD3\n");
        Self {
            buf,
            offsets: Vec::new(),
        }
    }

    fn object(&mut self, id: usize, body: &[u8]) {
        self.offsets.push((id, self.buf.len()));
        self.buf.extend_from_slice(format!("{} 0 obj\n", id).as_bytes());
        self.buf.extend_from_slice(body);
        self.buf.extend_from_slice(b"\nendobj\n");
    }

    fn finish(mut self, root: usize) -> Vec<u8> {
        self.offsets.sort_unstable();
        let size = self.offsets.len() + 1;
        let xref_at = self.buf.len();

        let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", size);
        for (_, offset) in &self.offsets {
            let _ = write!(xref, "{:010} 00000 n \n", offset);
        }
        let _ = write!(
            xref,
            "trailer\n<< /Size {} /Root {} 0 R >>\nstartxref\n{}\n%%EOF\n",
            size, root, xref_at
        );

        self.buf.extend_from_slice(xref.as_bytes());
        self.buf
    }
}
