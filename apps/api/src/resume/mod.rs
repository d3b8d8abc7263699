// Résumé intake: PDF text extraction, section/skill extraction and the
// validator that repairs loosely shaped structured data.

pub mod catalog;
pub mod extractor;
pub mod handlers;
pub mod pdf;
pub mod validation;
