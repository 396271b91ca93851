//! The "Add Package" dialog.
//!
//! The dialog collects and checks a draft but has nothing to submit it to:
//! the admin API offers no create endpoint, so confirming uploads nothing.

use anyhow::Result;
use log::debug;
use std::fmt::Write;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

use crate::api::Category;
use crate::format::format_price;
use crate::runtime::Runtime;

pub const DIALOG_TITLE: &str = "Add New Package";
pub const DIALOG_DESCRIPTION: &str = "Upload a new software package to the platform.";
pub const NOT_SUBMITTED: &str =
    "Package submission is not available yet; nothing was uploaded.";

const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "webp"];

/// Raw dialog input, as typed.
#[derive(Debug, Clone, Default)]
pub struct PackageForm {
    pub name: String,
    pub category: String,
    pub price: String,
    pub description: String,
    pub image: Option<PathBuf>,
    pub archive: Option<PathBuf>,
}

/// A package ZIP that opened cleanly.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveSummary {
    pub path: PathBuf,
    pub entries: usize,
    pub bytes: u64,
}

/// A form that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageDraft {
    pub name: String,
    pub category: Category,
    pub price: f64,
    pub description: String,
    pub image: Option<PathBuf>,
    pub archive: Option<ArchiveSummary>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Every problem found in a form.
#[derive(Debug, Clone, PartialEq)]
pub struct FormError {
    pub errors: Vec<FieldError>,
}

impl std::fmt::Display for FormError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invalid package form:")?;
        for error in &self.errors {
            write!(f, "\n  {}: {}", error.field, error.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for FormError {}

impl PackageForm {
    pub fn validate<R: Runtime>(&self, runtime: &R) -> Result<PackageDraft, FormError> {
        let mut errors = Vec::new();
        let mut fail = |field: &'static str, message: String| {
            errors.push(FieldError { field, message });
        };

        let name = self.name.trim().to_string();
        if name.is_empty() {
            fail("name", "is required".to_string());
        }

        let category = match self.category.parse::<Category>() {
            Ok(category) => Some(category),
            Err(_) if self.category.trim().eq_ignore_ascii_case("all") => {
                fail("category", "pick a single category".to_string());
                None
            }
            Err(e) => {
                fail("category", e.to_string());
                None
            }
        };

        let price = match self.price.trim().trim_start_matches('$').parse::<f64>() {
            Ok(price) if price.is_finite() && price >= 0.0 => Some(price),
            Ok(_) => {
                fail("price", "must not be negative".to_string());
                None
            }
            Err(_) => {
                fail("price", format!("'{}' is not a number", self.price));
                None
            }
        };

        if let Some(image) = &self.image {
            if let Err(message) = check_image(runtime, image) {
                fail("image", message);
            }
        }

        let archive = match &self.archive {
            Some(path) => match inspect_archive(runtime, path) {
                Ok(summary) => Some(summary),
                Err(message) => {
                    fail("archive", message);
                    None
                }
            },
            None => None,
        };

        match (category, price) {
            (Some(category), Some(price)) if errors.is_empty() => Ok(PackageDraft {
                name,
                category,
                price,
                description: self.description.trim().to_string(),
                image: self.image.clone(),
                archive,
            }),
            _ => Err(FormError { errors }),
        }
    }
}

fn check_image<R: Runtime>(runtime: &R, path: &Path) -> Result<(), String> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();
    if !IMAGE_EXTENSIONS.contains(&extension.as_str()) {
        return Err(format!(
            "{} is not an image ({})",
            path.display(),
            IMAGE_EXTENSIONS.join(", ")
        ));
    }
    if !runtime.is_file(path) {
        return Err(format!("{} does not exist", path.display()));
    }
    Ok(())
}

fn inspect_archive<R: Runtime>(runtime: &R, path: &Path) -> Result<ArchiveSummary, String> {
    if !runtime.is_file(path) {
        return Err(format!("{} does not exist", path.display()));
    }

    let mut bytes = Vec::new();
    runtime
        .open(path)
        .and_then(|mut reader| Ok(reader.read_to_end(&mut bytes)?))
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;

    let archive = zip::ZipArchive::new(Cursor::new(&bytes))
        .map_err(|e| format!("{} is not a ZIP archive: {}", path.display(), e))?;

    debug!("{} holds {} entries", path.display(), archive.len());

    Ok(ArchiveSummary {
        path: path.to_path_buf(),
        entries: archive.len(),
        bytes: bytes.len() as u64,
    })
}

/// The dialog with the draft filled in.
pub fn render_dialog(draft: &PackageDraft) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", DIALOG_TITLE);
    let _ = writeln!(out, "{}", DIALOG_DESCRIPTION);
    let _ = writeln!(out);
    let _ = writeln!(out, "Package Name   {}", draft.name);
    let _ = writeln!(out, "Category       {}", draft.category.label());
    let _ = writeln!(out, "Price          {}", format_price(draft.price));
    if !draft.description.is_empty() {
        let _ = writeln!(out, "Description    {}", draft.description);
    }
    match &draft.image {
        Some(image) => {
            let _ = writeln!(out, "Preview Image  {}", image.display());
        }
        None => {
            let _ = writeln!(out, "Preview Image  (none)");
        }
    }
    match &draft.archive {
        Some(archive) => {
            let _ = writeln!(
                out,
                "Package Files  {} ({} entries, {} bytes)",
                archive.path.display(),
                archive.entries,
                archive.bytes
            );
        }
        None => {
            let _ = writeln!(out, "Package Files  (none)");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;
    use mockall::predicate::eq;
    use std::io::Write as _;

    fn zip_bytes(files: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in files {
            writer
                .start_file(*name, zip::write::SimpleFileOptions::default())
                .unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    fn valid_form() -> PackageForm {
        PackageForm {
            name: " Advanced Authentication ".into(),
            category: "backend".into(),
            price: "99".into(),
            description: "JWT and sessions".into(),
            image: None,
            archive: None,
        }
    }

    #[test]
    fn test_validate_minimal_form() {
        let runtime = MockRuntime::new();
        let draft = valid_form().validate(&runtime).unwrap();

        assert_eq!(draft.name, "Advanced Authentication");
        assert_eq!(draft.category, Category::Backend);
        assert_eq!(draft.price, 99.0);
        assert_eq!(draft.archive, None);
    }

    #[test]
    fn test_validate_collects_every_error() {
        let runtime = MockRuntime::new();
        let form = PackageForm {
            name: "  ".into(),
            category: "all".into(),
            price: "-1".into(),
            ..Default::default()
        };

        let err = form.validate(&runtime).unwrap_err();
        let fields: Vec<_> = err.errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["name", "category", "price"]);
        assert!(err.to_string().contains("pick a single category"));
    }

    #[test]
    fn test_validate_price_not_a_number() {
        let runtime = MockRuntime::new();
        let form = PackageForm {
            price: "cheap".into(),
            ..valid_form()
        };
        let err = form.validate(&runtime).unwrap_err();
        assert_eq!(err.errors[0].field, "price");
        assert!(err.errors[0].message.contains("'cheap'"));
    }

    #[test]
    fn test_validate_dollar_price() {
        let runtime = MockRuntime::new();
        let form = PackageForm {
            price: "$12.50".into(),
            ..valid_form()
        };
        assert_eq!(form.validate(&runtime).unwrap().price, 12.5);
    }

    #[test]
    fn test_validate_image_extension_and_existence() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_is_file()
            .with(eq(PathBuf::from("/tmp/missing.png")))
            .returning(|_| false);

        let form = PackageForm {
            image: Some(PathBuf::from("/tmp/readme.txt")),
            ..valid_form()
        };
        let err = form.validate(&runtime).unwrap_err();
        assert!(err.errors[0].message.contains("is not an image"));

        let form = PackageForm {
            image: Some(PathBuf::from("/tmp/missing.png")),
            ..valid_form()
        };
        let err = form.validate(&runtime).unwrap_err();
        assert!(err.errors[0].message.contains("does not exist"));
    }

    #[test]
    fn test_validate_archive_zip() {
        let path = PathBuf::from("/uploads/auth.zip");
        let bytes = zip_bytes(&[("src/lib.rs", "pub fn f() {}"), ("README.md", "# auth")]);
        let len = bytes.len() as u64;

        let mut runtime = MockRuntime::new();
        runtime
            .expect_is_file()
            .with(eq(path.clone()))
            .returning(|_| true);
        runtime
            .expect_open()
            .with(eq(path.clone()))
            .returning(move |_| Ok(Box::new(Cursor::new(bytes.clone()))));

        let form = PackageForm {
            archive: Some(path.clone()),
            ..valid_form()
        };
        let draft = form.validate(&runtime).unwrap();

        assert_eq!(
            draft.archive,
            Some(ArchiveSummary {
                path,
                entries: 2,
                bytes: len
            })
        );
    }

    #[test]
    fn test_validate_archive_not_zip() {
        let path = PathBuf::from("/uploads/auth.zip");
        let mut runtime = MockRuntime::new();
        runtime.expect_is_file().returning(|_| true);
        runtime
            .expect_open()
            .returning(|_| Ok(Box::new(Cursor::new(b"plain text".to_vec()))));

        let form = PackageForm {
            archive: Some(path),
            ..valid_form()
        };
        let err = form.validate(&runtime).unwrap_err();
        assert_eq!(err.errors[0].field, "archive");
        assert!(err.errors[0].message.contains("not a ZIP archive"));
    }

    #[test]
    fn test_render_dialog() {
        let runtime = MockRuntime::new();
        let draft = valid_form().validate(&runtime).unwrap();
        let out = render_dialog(&draft);

        assert!(out.starts_with("Add New Package\n"));
        assert!(out.contains("Category       Backend"));
        assert!(out.contains("Price          $99"));
        assert!(out.contains("Package Files  (none)"));
    }
}
