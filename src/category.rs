/// Extension-based file categorization.
///
/// This module maps file extensions to destination categories. Documents get
/// per-format subfolders under `Documents/`, images and videos are grouped
/// under `Media/`, and anything unrecognized falls back to `Other`.
///
/// # Examples
///
/// ```
/// use tidydesk::category::{Category, RuleSet};
///
/// let rules = RuleSet::default();
/// assert_eq!(rules.classify("report.pdf"), Category::Pdf);
/// assert_eq!(rules.classify("photo.JPG"), Category::Images);
/// assert_eq!(rules.classify("mystery.xyz"), Category::Other);
/// ```
use std::collections::HashMap;
use std::path::Path;

/// Represents a destination category for an organized file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Spreadsheets (XLS, XLSX, CSV, etc.)
    Excel,
    /// Word-processor documents (DOC, DOCX, ODT, RTF)
    Word,
    /// PDF documents
    Pdf,
    /// Plain text files
    Text,
    /// Image files (JPG, PNG, GIF, etc.)
    Images,
    /// Video files (MP4, MKV, MOV, etc.)
    Videos,
    /// Unknown or uncategorized files
    Other,
}

impl Category {
    /// Returns the destination directory, relative to the organized folder.
    ///
    /// # Examples
    ///
    /// ```
    /// use tidydesk::category::Category;
    ///
    /// assert_eq!(Category::Pdf.rel_dir(), "Documents/PDF");
    /// assert_eq!(Category::Images.rel_dir(), "Media/Images");
    /// assert_eq!(Category::Other.rel_dir(), "Other");
    /// ```
    pub fn rel_dir(&self) -> &'static str {
        match self {
            Category::Excel => "Documents/Excel",
            Category::Word => "Documents/Word",
            Category::Pdf => "Documents/PDF",
            Category::Text => "Documents/Text",
            Category::Images => "Media/Images",
            Category::Videos => "Media/Videos",
            Category::Other => "Other",
        }
    }

    /// Returns the display label for this category.
    ///
    /// The label and the relative directory are intentionally the same
    /// string; history entries and on-disk layout stay in sync.
    pub fn label(&self) -> &'static str {
        self.rel_dir()
    }

    /// All categories, in the order summaries are displayed.
    pub fn all() -> &'static [Category] {
        &[
            Category::Excel,
            Category::Word,
            Category::Pdf,
            Category::Text,
            Category::Images,
            Category::Videos,
            Category::Other,
        ]
    }
}

/// Maps file extensions to categories.
///
/// Lookups are case-insensitive: extensions are lower-cased once when
/// registered and once when queried, so the lower-cased form is canonical.
/// Registering the same extension twice keeps the last registration.
#[derive(Debug, Clone)]
pub struct RuleSet {
    extension_map: HashMap<String, Category>,
}

impl RuleSet {
    /// Creates a rule set with the standard extension mappings.
    pub fn new() -> Self {
        let mut rules = Self {
            extension_map: HashMap::new(),
        };
        rules.populate_standard_mappings();
        rules
    }

    fn populate_standard_mappings(&mut self) {
        // Spreadsheets
        self.add_extension_mapping("xls", Category::Excel);
        self.add_extension_mapping("xlsx", Category::Excel);
        self.add_extension_mapping("xlsm", Category::Excel);
        self.add_extension_mapping("xlsb", Category::Excel);
        self.add_extension_mapping("xltx", Category::Excel);
        self.add_extension_mapping("csv", Category::Excel);

        // Word-processor documents
        self.add_extension_mapping("doc", Category::Word);
        self.add_extension_mapping("docx", Category::Word);
        self.add_extension_mapping("odt", Category::Word);
        self.add_extension_mapping("rtf", Category::Word);

        self.add_extension_mapping("pdf", Category::Pdf);
        self.add_extension_mapping("txt", Category::Text);

        // Images
        self.add_extension_mapping("jpg", Category::Images);
        self.add_extension_mapping("jpeg", Category::Images);
        self.add_extension_mapping("png", Category::Images);
        self.add_extension_mapping("gif", Category::Images);
        self.add_extension_mapping("bmp", Category::Images);
        self.add_extension_mapping("tiff", Category::Images);
        self.add_extension_mapping("webp", Category::Images);
        self.add_extension_mapping("heic", Category::Images);

        // Videos
        self.add_extension_mapping("mp4", Category::Videos);
        self.add_extension_mapping("mov", Category::Videos);
        self.add_extension_mapping("avi", Category::Videos);
        self.add_extension_mapping("mkv", Category::Videos);
        self.add_extension_mapping("wmv", Category::Videos);
        self.add_extension_mapping("flv", Category::Videos);
        self.add_extension_mapping("webm", Category::Videos);
        self.add_extension_mapping("m4v", Category::Videos);
    }

    /// Adds a file extension to category mapping.
    pub fn add_extension_mapping(&mut self, ext: &str, category: Category) {
        self.extension_map.insert(ext.to_lowercase(), category);
    }

    /// Maps a bare file extension (without the dot) to a category.
    ///
    /// # Examples
    ///
    /// ```
    /// use tidydesk::category::{Category, RuleSet};
    ///
    /// let rules = RuleSet::default();
    /// assert_eq!(rules.extension_to_category("pdf"), Some(Category::Pdf));
    /// assert_eq!(rules.extension_to_category("PNG"), Some(Category::Images));
    /// assert_eq!(rules.extension_to_category("xyz"), None);
    /// ```
    pub fn extension_to_category(&self, ext: &str) -> Option<Category> {
        self.extension_map.get(&ext.to_lowercase()).copied()
    }

    /// Determines the category for a file name.
    ///
    /// The extension is everything after the final `.`; files with no
    /// extension classify as [`Category::Other`].
    pub fn classify(&self, file_name: &str) -> Category {
        Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| self.extension_to_category(ext))
            .unwrap_or(Category::Other)
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_rel_dirs() {
        assert_eq!(Category::Excel.rel_dir(), "Documents/Excel");
        assert_eq!(Category::Word.rel_dir(), "Documents/Word");
        assert_eq!(Category::Pdf.rel_dir(), "Documents/PDF");
        assert_eq!(Category::Text.rel_dir(), "Documents/Text");
        assert_eq!(Category::Images.rel_dir(), "Media/Images");
        assert_eq!(Category::Videos.rel_dir(), "Media/Videos");
        assert_eq!(Category::Other.rel_dir(), "Other");
    }

    #[test]
    fn test_label_matches_rel_dir() {
        for category in Category::all() {
            assert_eq!(category.label(), category.rel_dir());
        }
    }

    #[test]
    fn test_classify_documents() {
        let rules = RuleSet::default();
        assert_eq!(rules.classify("report.pdf"), Category::Pdf);
        assert_eq!(rules.classify("letter.docx"), Category::Word);
        assert_eq!(rules.classify("notes.txt"), Category::Text);
        assert_eq!(rules.classify("budget.xlsx"), Category::Excel);
    }

    #[test]
    fn test_classify_csv_as_excel() {
        let rules = RuleSet::default();
        assert_eq!(rules.classify("export.csv"), Category::Excel);
    }

    #[test]
    fn test_classify_media() {
        let rules = RuleSet::default();
        assert_eq!(rules.classify("photo.jpeg"), Category::Images);
        assert_eq!(rules.classify("clip.mkv"), Category::Videos);
    }

    #[test]
    fn test_classify_case_insensitive() {
        let rules = RuleSet::default();
        assert_eq!(rules.classify("REPORT.PDF"), Category::Pdf);
        assert_eq!(rules.classify("Photo.Jpg"), Category::Images);
    }

    #[test]
    fn test_classify_unknown_extension() {
        let rules = RuleSet::default();
        assert_eq!(rules.classify("archive.zip"), Category::Other);
        assert_eq!(rules.classify("binary.xyz"), Category::Other);
    }

    #[test]
    fn test_classify_no_extension() {
        let rules = RuleSet::default();
        assert_eq!(rules.classify("Makefile"), Category::Other);
        assert_eq!(rules.classify("README"), Category::Other);
    }

    #[test]
    fn test_classify_uses_final_dot() {
        let rules = RuleSet::default();
        assert_eq!(rules.classify("backup.tar.csv"), Category::Excel);
        assert_eq!(rules.classify("report.v2.pdf"), Category::Pdf);
    }

    #[test]
    fn test_classify_is_deterministic() {
        let rules = RuleSet::default();
        let first = rules.classify("report.pdf");
        for _ in 0..10 {
            assert_eq!(rules.classify("report.pdf"), first);
        }
    }

    #[test]
    fn test_last_registration_wins() {
        let mut rules = RuleSet::default();
        rules.add_extension_mapping("csv", Category::Text);
        assert_eq!(rules.classify("export.csv"), Category::Text);
    }
}
