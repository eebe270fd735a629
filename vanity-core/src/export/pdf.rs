//! PDF quote document generator.
//!
//! Lays out a single-column US Letter document: Helvetica text with
//! WinAnsi encoding, hairline rules, and an optional DCT-encoded preview
//! image. Content flows top to bottom and breaks onto a new page when it
//! reaches the footer area. Serialization is left to `lopdf`.

use chrono::{DateTime, Utc};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};

use crate::config::Branding;
use crate::error::{QuoteError, Result};
use crate::model::{CustomerInfo, ImageFormat, Money, PreviewImage, QuoteArtifact};

// Page geometry in points (1/72 inch).
const PAGE_WIDTH: f64 = 612.0;
const PAGE_HEIGHT: f64 = 792.0;
const MARGIN: f64 = 54.0;
const CONTENT_WIDTH: f64 = PAGE_WIDTH - 2.0 * MARGIN;
const FOOTER_HEIGHT: f64 = 40.0;
const ROW_HEIGHT: f64 = 16.0;
const VALUE_COLUMN: f64 = 150.0;
const MAX_IMAGE_HEIGHT: f64 = 252.0;

const IMAGE_RESOURCE: &str = "Im1";

/// Built-in fonts registered on every page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource(&self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }

    fn base_font(&self) -> &'static str {
        match self {
            Font::Regular => "Helvetica",
            Font::Bold => "Helvetica-Bold",
        }
    }
}

/// Page-flowing PDF writer.
pub struct PdfWriter {
    pages: Vec<Vec<Operation>>,
    ops: Vec<Operation>,
    /// Baseline cursor on the current page, measured from the bottom edge.
    y: f64,
}

impl PdfWriter {
    pub fn new() -> Self {
        Self {
            pages: Vec::new(),
            ops: Vec::new(),
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    /// Number of pages written so far, including the current one.
    pub fn page_count(&self) -> usize {
        self.pages.len() + 1
    }

    /// Start a new page and reset the cursor.
    pub fn new_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.ops));
        self.y = PAGE_HEIGHT - MARGIN;
    }

    /// Break the page unless `height` points fit above the footer.
    fn ensure_space(&mut self, height: f64) {
        if self.y - height < MARGIN + FOOTER_HEIGHT {
            self.new_page();
        }
    }

    /// Place text with its baseline at (x, y).
    fn text(&mut self, x: f64, y: f64, font: Font, size: f64, text: &str) {
        if text.is_empty() {
            return;
        }
        self.ops.extend([
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![font.resource().into(), real(size)]),
            Operation::new("Td", vec![real(x), real(y)]),
            Operation::new("Tj", vec![win_ansi_string(text)]),
            Operation::new("ET", vec![]),
        ]);
    }

    /// Place text so that it ends at `right`.
    fn text_right(&mut self, right: f64, y: f64, font: Font, size: f64, text: &str) {
        let x = right - text_width(text, font, size);
        self.text(x, y, font, size, text);
    }

    /// Horizontal hairline across the content width.
    fn rule(&mut self, y: f64) {
        self.ops.extend([
            Operation::new("G", vec![real(0.6)]),
            Operation::new("w", vec![real(0.75)]),
            Operation::new("m", vec![real(MARGIN), real(y)]),
            Operation::new("l", vec![real(PAGE_WIDTH - MARGIN), real(y)]),
            Operation::new("S", vec![]),
            Operation::new("G", vec![real(0.0)]),
        ]);
    }

    /// Draw the shared image XObject scaled into the given box.
    fn image(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ops.extend([
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    real(width),
                    real(0.0),
                    real(0.0),
                    real(height),
                    real(x),
                    real(y),
                ],
            ),
            Operation::new("Do", vec![IMAGE_RESOURCE.into()]),
            Operation::new("Q", vec![]),
        ]);
    }

    /// Write the company block, quote number and date.
    pub fn write_header(&mut self, branding: &Branding, reference: &str, created_at: &DateTime<Utc>) {
        let top = self.y;
        let right = PAGE_WIDTH - MARGIN;

        self.text(MARGIN, top - 20.0, Font::Bold, 20.0, &branding.company_name);
        self.text(MARGIN, top - 36.0, Font::Regular, 10.0, &branding.tagline);

        self.text_right(right, top - 18.0, Font::Bold, 16.0, "QUOTE");
        self.text_right(
            right,
            top - 34.0,
            Font::Regular,
            10.0,
            &format!("Quote #: {}", reference),
        );
        self.text_right(
            right,
            top - 48.0,
            Font::Regular,
            10.0,
            &format!("Date: {}", long_date(created_at)),
        );

        self.y = top - 58.0;
        self.rule(self.y);
        self.y -= 22.0;
    }

    /// Write the "Prepared for" block.
    pub fn write_customer(&mut self, customer: &CustomerInfo) {
        let mut lines = vec![customer.name.clone(), customer.email.clone()];
        if let Some(phone) = &customer.phone {
            lines.push(phone.clone());
        }
        lines.retain(|line| !line.is_empty());
        if lines.is_empty() {
            return;
        }

        self.ensure_space(ROW_HEIGHT * (lines.len() + 1) as f64);
        self.text(MARGIN, self.y, Font::Bold, 10.0, "Prepared for");
        self.y -= ROW_HEIGHT;
        for line in &lines {
            self.text(MARGIN, self.y, Font::Regular, 10.0, line);
            self.y -= 14.0;
        }
        self.y -= 10.0;
    }

    /// Center the preview image under the header.
    pub fn write_preview(&mut self, image: &PreviewImage) {
        let (width, height) = fit_image(image);
        self.ensure_space(height + 12.0);

        let x = MARGIN + (CONTENT_WIDTH - width) / 2.0;
        let y = self.y - height;
        self.image(x, y, width, height);
        self.y = y - 24.0;
    }

    /// Bold section heading with a rule underneath.
    pub fn write_section_title(&mut self, title: &str) {
        // Keep the heading together with at least two rows.
        self.ensure_space(ROW_HEIGHT * 4.0);
        self.text(MARGIN, self.y, Font::Bold, 13.0, title);
        self.y -= 6.0;
        self.rule(self.y);
        self.y -= ROW_HEIGHT;
    }

    /// Label/value row; long values wrap within the value column.
    pub fn write_detail_row(&mut self, label: &str, value: &str) {
        let lines = wrap_text(value, Font::Regular, 10.0, CONTENT_WIDTH - VALUE_COLUMN);
        self.ensure_space(ROW_HEIGHT * lines.len() as f64);

        self.text(MARGIN, self.y, Font::Bold, 10.0, label);
        for line in &lines {
            self.text(MARGIN + VALUE_COLUMN, self.y, Font::Regular, 10.0, line);
            self.y -= ROW_HEIGHT;
        }
    }

    /// Label with a right-aligned amount.
    pub fn write_amount_row(&mut self, label: &str, amount: Money) {
        self.ensure_space(ROW_HEIGHT);
        self.text(MARGIN, self.y, Font::Regular, 10.0, label);
        self.text_right(
            PAGE_WIDTH - MARGIN,
            self.y,
            Font::Regular,
            10.0,
            &amount.display(),
        );
        self.y -= ROW_HEIGHT;
    }

    /// Ruled grand-total line.
    pub fn write_total(&mut self, total: Money) {
        self.ensure_space(ROW_HEIGHT * 2.5);
        self.y += 4.0;
        self.rule(self.y);
        self.y -= 18.0;
        self.text(MARGIN, self.y, Font::Bold, 14.0, "Total");
        self.text_right(
            PAGE_WIDTH - MARGIN,
            self.y,
            Font::Bold,
            14.0,
            &total.display(),
        );
        self.y -= ROW_HEIGHT * 1.5;
    }

    /// Small-print paragraph.
    pub fn write_note(&mut self, note: &str) {
        for line in wrap_text(note, Font::Regular, 8.0, CONTENT_WIDTH) {
            self.ensure_space(12.0);
            self.text(MARGIN, self.y, Font::Regular, 8.0, &line);
            self.y -= 12.0;
        }
    }

    /// Close the last page, stamp footers and serialize the document.
    pub fn finish(
        mut self,
        title: &str,
        footer: &str,
        contact: &str,
        image: Option<&PreviewImage>,
        created_at: &DateTime<Utc>,
    ) -> Result<Vec<u8>> {
        self.pages.push(std::mem::take(&mut self.ops));
        let total = self.pages.len();

        for (index, page) in self.pages.iter_mut().enumerate() {
            let mut stamp = PdfWriter::new();
            stamp.rule(MARGIN + 24.0);
            stamp.text(MARGIN, MARGIN + 10.0, Font::Regular, 8.0, footer);
            stamp.text_right(
                PAGE_WIDTH - MARGIN,
                MARGIN + 10.0,
                Font::Regular,
                8.0,
                &format!("Page {} of {}", index + 1, total),
            );
            stamp.text(MARGIN, MARGIN - 2.0, Font::Regular, 8.0, contact);
            page.append(&mut stamp.ops);
        }

        let mut doc = build_document(self.pages, title, image, created_at)?;
        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).map_err(render_failed)?;
        Ok(bytes)
    }
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a quote as a PDF document.
pub fn render_quote_pdf(artifact: &QuoteArtifact, branding: &Branding) -> Result<Vec<u8>> {
    let mut pdf = PdfWriter::new();
    pdf.write_header(branding, &artifact.reference, &artifact.created_at);

    if let Some(customer) = &artifact.customer {
        pdf.write_customer(customer);
    }

    if let Some(image) = &artifact.preview {
        pdf.write_preview(image);
    }

    pdf.write_section_title("Configuration");
    for (label, value) in artifact.configuration.detail_rows() {
        pdf.write_detail_row(&label, &value);
    }
    pdf.y -= 14.0;

    let pricing = &artifact.pricing;
    pdf.write_section_title("Price Breakdown");
    for (label, amount) in pricing.summary_rows() {
        pdf.write_amount_row(&label, amount);
    }
    pdf.write_total(pricing.total_price);

    if pricing.has_free_shipping() {
        pdf.write_note("This order qualifies for free shipping.");
    }
    pdf.write_note(
        "Prices are estimates based on the configuration shown and are valid for 30 days \
         from the quote date. Final pricing is confirmed after site measurement.",
    );

    let footer = format!("Generated {}", long_date(&artifact.created_at));
    let title = format!("Vanity Quote {}", artifact.reference);
    let bytes = pdf.finish(
        &title,
        &footer,
        &branding.contact_line(),
        artifact.preview.as_ref(),
        &artifact.created_at,
    )?;

    tracing::info!(
        "Rendered quote {} as PDF ({} bytes)",
        artifact.reference,
        bytes.len()
    );
    Ok(bytes)
}

/// Download filename for a quote created at the given instant.
pub fn quote_pdf_filename(created_at: &DateTime<Utc>) -> String {
    format!("vanity-quote-{}.pdf", created_at.format("%Y%m%d-%H%M%S"))
}

fn long_date(at: &DateTime<Utc>) -> String {
    at.format("%B %-d, %Y").to_string()
}

fn real(value: f64) -> Object {
    Object::Real(value as f32)
}

fn render_failed(err: impl std::fmt::Display) -> QuoteError {
    QuoteError::PdfRenderFailed {
        message: err.to_string(),
    }
}

/// Scale the image to the content width, capped in height.
fn fit_image(image: &PreviewImage) -> (f64, f64) {
    let aspect = image.aspect_ratio();
    let mut width = CONTENT_WIDTH.min(image.width as f64);
    let mut height = width * aspect;
    if height > MAX_IMAGE_HEIGHT {
        height = MAX_IMAGE_HEIGHT;
        width = height / aspect;
    }
    (width, height)
}

/// Literal string operand in the fonts' WinAnsi encoding.
fn win_ansi_string(text: &str) -> Object {
    Object::String(encode_win_ansi(text), StringFormat::Literal)
}

/// Encode as WinAnsi bytes. Characters outside the code page become `?`.
fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(win_ansi_byte).collect()
}

fn win_ansi_byte(c: char) -> u8 {
    match c {
        '\n' | '\r' | '\t' => b' ',
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

/// Approximate Helvetica advance width in 1/1000 em.
fn glyph_width(c: char) -> f64 {
    match c {
        ' ' | '.' | ',' | ':' | ';' | '/' | 'f' | 't' | 'I' | '!' => 278.0,
        'i' | 'j' | 'l' | '\'' => 222.0,
        '-' | '(' | ')' | 'r' => 333.0,
        '"' => 355.0,
        'm' | 'M' => 833.0,
        'w' => 722.0,
        'W' => 944.0,
        '%' => 889.0,
        'J' | 'c' | 'k' | 's' | 'v' | 'x' | 'y' | 'z' => 500.0,
        '0'..='9' | '$' | '#' => 556.0,
        c if c.is_uppercase() => 667.0,
        _ => 556.0,
    }
}

fn text_width(text: &str, font: Font, size: f64) -> f64 {
    let units: f64 = text.chars().map(glyph_width).sum();
    let factor = match font {
        Font::Regular => 1.0,
        Font::Bold => 1.06,
    };
    units * factor * size / 1000.0
}

/// Greedy word wrap to `max_width` points. Always yields at least one line.
fn wrap_text(text: &str, font: Font, size: f64, max_width: f64) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };
        if !current.is_empty() && text_width(&candidate, font, size) > max_width {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        } else {
            current = candidate;
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

fn image_stream(image: &PreviewImage) -> Stream {
    let color_space = match image.components {
        1 => "DeviceGray",
        4 => "DeviceCMYK",
        _ => "DeviceRGB",
    };
    let filter = match image.format {
        ImageFormat::Jpeg => "DCTDecode",
    };
    let dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => Object::Integer(image.width as i64),
        "Height" => Object::Integer(image.height as i64),
        "ColorSpace" => color_space,
        "BitsPerComponent" => Object::Integer(8),
        "Filter" => filter,
    };
    // JPEG data is already compressed.
    Stream::new(dict, image.data.clone()).with_compression(false)
}

fn font_dictionary(font: Font) -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => font.base_font(),
        "Encoding" => "WinAnsiEncoding",
    }
}

/// Catalog, page tree, shared resources and one content stream per page.
fn build_document(
    pages: Vec<Vec<Operation>>,
    title: &str,
    image: Option<&PreviewImage>,
    created_at: &DateTime<Utc>,
) -> Result<Document> {
    let mut doc = Document::with_version("1.4");
    let pages_id: ObjectId = doc.new_object_id();

    let mut fonts = Dictionary::new();
    for font in [Font::Regular, Font::Bold] {
        let id = doc.add_object(font_dictionary(font));
        fonts.set(font.resource(), id);
    }
    let mut resources = dictionary! { "Font" => fonts };
    if let Some(image) = image {
        let id = doc.add_object(image_stream(image));
        resources.set("XObject", dictionary! { IMAGE_RESOURCE => id });
    }
    let resources_id = doc.add_object(resources);

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for operations in pages {
        let content = Content { operations }.encode().map_err(render_failed)?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, content));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => Object::Integer(count),
            "MediaBox" => vec![real(0.0), real(0.0), real(PAGE_WIDTH), real(PAGE_HEIGHT)],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => win_ansi_string(title),
        "Producer" => Object::string_literal("vanity-quote"),
        "CreationDate" => Object::string_literal(
            format!("D:{}Z", created_at.format("%Y%m%d%H%M%S"))
        ),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    Ok(doc)
}
