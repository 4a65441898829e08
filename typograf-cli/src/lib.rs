// All core functionality is in typograf-core
// This CLI acts as a thin wrapper around the core library

use std::path::{Path, PathBuf};

// Re-export core types for convenience
pub use typograf_core::*;

/// Default output path: "report.docx" becomes "report_formatted.docx"
/// in the same directory
pub fn derive_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    let extension = input
        .extension()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "docx".to_string());
    input.with_file_name(format!("{stem}_formatted.{extension}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_path_keeps_directory_and_extension() {
        let out = derive_output_path(Path::new("/tmp/docs/report.docx"));
        assert_eq!(out, PathBuf::from("/tmp/docs/report_formatted.docx"));
    }

    #[test]
    fn bare_filename_gets_the_suffix() {
        let out = derive_output_path(Path::new("письмо.docx"));
        assert_eq!(out, PathBuf::from("письмо_formatted.docx"));
    }
}
