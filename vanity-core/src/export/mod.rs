//! Quote export: PDF documents, share links and e-mail delivery.

mod mail;
mod pdf;
mod preview;
mod share_link;
mod summary;

pub use mail::{send_quote_email, HttpQuoteMailer, PdfAttachment, QuoteEmail, QuoteMailer};
pub use pdf::{quote_pdf_filename, render_quote_pdf, Font, PdfWriter};
pub use preview::{capture_preview, jpeg_preview, FilePreviewCapture, PreviewCapture};
pub use share_link::{
    decode_share_link, encode_share_link, encode_share_param, try_decode_share_link,
    try_decode_share_param, SharedConfiguration,
};
pub use summary::render_quote_summary;
