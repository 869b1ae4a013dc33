use std::path::{Path, PathBuf};

use thiserror::Error;

use super::PersonaContext;

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse PDF {}: {source}", .path.display())]
    Pdf {
        path: PathBuf,
        #[source]
        source: lopdf::Error,
    },
}

/// Load the résumé and summary files into a [`PersonaContext`].
///
/// Callers treat any error as fatal at startup.
pub fn load_persona(
    name: impl Into<String>,
    resume_path: impl AsRef<Path>,
    summary_path: impl AsRef<Path>,
) -> Result<PersonaContext, ProfileError> {
    let name = name.into();
    let resume_path = resume_path.as_ref();
    let summary_path = summary_path.as_ref();

    let resume_text = read_resume_text(resume_path)?;
    if resume_text.trim().is_empty() {
        log::warn!("Resume {:?} produced no extractable text", resume_path);
    }

    let summary_text = std::fs::read_to_string(summary_path).map_err(|source| ProfileError::Io {
        path: summary_path.to_path_buf(),
        source,
    })?;

    log::info!(
        "Loaded persona '{}': resume {} chars, summary {} chars",
        name,
        resume_text.len(),
        summary_text.len()
    );

    Ok(PersonaContext {
        name,
        resume_text,
        summary_text,
    })
}

/// Extract résumé text. PDFs are read page by page in page order; `.txt` and
/// `.md` files are taken verbatim.
pub fn read_resume_text(path: &Path) -> Result<String, ProfileError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("txt") | Some("md") => {
            std::fs::read_to_string(path).map_err(|source| ProfileError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
        _ => read_pdf_text(path),
    }
}

fn read_pdf_text(path: &Path) -> Result<String, ProfileError> {
    if !path.exists() {
        return Err(ProfileError::Io {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "file does not exist"),
        });
    }

    let document = lopdf::Document::load(path).map_err(|source| ProfileError::Pdf {
        path: path.to_path_buf(),
        source,
    })?;

    let mut text = String::new();
    // BTreeMap keys are page numbers, so iteration is already in page order.
    for page_number in document.get_pages().keys() {
        match document.extract_text(&[*page_number]) {
            Ok(page_text) if !page_text.trim().is_empty() => text.push_str(&page_text),
            Ok(_) => {}
            Err(error) => {
                log::warn!(
                    "Skipping page {} of {:?}: {}",
                    page_number,
                    path,
                    error
                );
            }
        }
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, contents: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents).unwrap();
        path
    }

    /// Write a PDF with one line of Courier text per page.
    fn write_pdf(dir: &TempDir, name: &str, pages: &[&str]) -> PathBuf {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for text in pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![100.into(), 600.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let path = dir.path().join(name);
        doc.save(&path).unwrap();
        path
    }

    #[test]
    fn loads_text_resume_and_summary() {
        let dir = TempDir::new().unwrap();
        let resume = write_file(&dir, "profile.txt", b"Rust engineer since 2019");
        let summary = write_file(&dir, "summary.txt", "Likes compilers ✨".as_bytes());

        let persona = load_persona("Test Persona", &resume, &summary).unwrap();

        assert_eq!(persona.name, "Test Persona");
        assert_eq!(persona.resume_text, "Rust engineer since 2019");
        assert_eq!(persona.summary_text, "Likes compilers ✨");
    }

    #[test]
    fn missing_summary_is_fatal() {
        let dir = TempDir::new().unwrap();
        let resume = write_file(&dir, "profile.md", b"resume");
        let summary = dir.path().join("missing.txt");

        let error = load_persona("Test Persona", &resume, &summary).unwrap_err();

        match error {
            ProfileError::Io { path, source } => {
                assert_eq!(path, summary);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected Io error, got {other:?}"),
        }
    }

    #[test]
    fn missing_pdf_is_fatal() {
        let dir = TempDir::new().unwrap();
        let summary = write_file(&dir, "summary.txt", b"S");
        let resume = dir.path().join("Profile.pdf");

        let error = load_persona("Test Persona", &resume, &summary).unwrap_err();

        assert!(matches!(error, ProfileError::Io { .. }));
    }

    #[test]
    fn unparseable_pdf_is_fatal() {
        let dir = TempDir::new().unwrap();
        let summary = write_file(&dir, "summary.txt", b"S");
        let resume = write_file(&dir, "Profile.pdf", b"this is not a pdf document");

        let error = load_persona("Test Persona", &resume, &summary).unwrap_err();

        assert!(matches!(error, ProfileError::Pdf { .. }));
        assert!(error.to_string().contains("Profile.pdf"));
    }

    #[test]
    fn pdf_pages_are_read_in_order() {
        let dir = TempDir::new().unwrap();
        let resume = write_pdf(&dir, "Profile.pdf", &["First page", "Second page"]);

        let text = read_resume_text(&resume).unwrap();

        let first = text.find("First page").unwrap();
        let second = text.find("Second page").unwrap();
        assert!(first < second);
    }
}
