/// File extensions accepted by `/extract`, with their leading dot
pub const SUPPORTED_FILE_EXTENSIONS: &[&str] = &[
    ".pdf", ".png", ".jpg", ".jpeg", ".docx", ".doc", ".txt", ".pptx", ".ppt", ".xlsx", ".xls", ".csv", ".html",
    ".xml",
];

pub const PDF_MIME: &str = "application/pdf";
pub const IMAGE_MIME: &str = "image/jpeg";
pub const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const DOC_MIME: &str = "application/msword";
pub const TXT_MIME: &str = "text/plain";
pub const PPTX_MIME: &str = "application/vnd.openxmlformats-officedocument.presentationml.presentation";
pub const PPT_MIME: &str = "application/vnd.ms-powerpoint";
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const XLS_MIME: &str = "application/vnd.ms-excel";
pub const CSV_MIME: &str = "text/csv";
pub const HTML_MIME: &str = "text/html";
pub const XML_MIME: &str = "application/xml";

/// Get the MIME type for an uploaded filename
///
/// Matching is a case-sensitive suffix check on the whole filename, so
/// `report.PDF` and `archive.tar.gz` are both unsupported.
///
/// # Returns
/// The MIME type string, or `None` if the extension is not recognized
pub fn get_mime_type(filename: &str) -> Option<&'static str> {
    let (_, extension) = filename.rsplit_once('.')?;

    match extension {
        "pdf" => Some(PDF_MIME),
        // every raster format is forwarded under one image type
        "png" | "jpg" | "jpeg" => Some(IMAGE_MIME),
        "docx" => Some(DOCX_MIME),
        "doc" => Some(DOC_MIME),
        "txt" => Some(TXT_MIME),
        "pptx" => Some(PPTX_MIME),
        "ppt" => Some(PPT_MIME),
        "xlsx" => Some(XLSX_MIME),
        "xls" => Some(XLS_MIME),
        "csv" => Some(CSV_MIME),
        "html" => Some(HTML_MIME),
        "xml" => Some(XML_MIME),
        _ => None,
    }
}
