// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF assembler — concatenate pages from N loaded PDFs into one output
// document using the `lopdf` crate.

use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use tracing::{debug, info, instrument, warn};

use wandelwerk_core::error::{ConvertError, Result};

/// Single-use builder that concatenates pages from several PDFs.
///
/// Sources are appended in call order and each source keeps its native page
/// order. Page content, embedded resources, and page size are copied as
/// opaque object graphs — nothing is re-rendered. `finish` serialises the
/// accumulated pages exactly once and consumes the builder.
pub struct PdfAssembler {
    document: Document,
    pages_id: ObjectId,
}

impl PdfAssembler {
    /// Start an empty output document with its own catalog and page tree.
    pub fn new() -> Self {
        let mut document = Document::with_version("1.5");
        let pages_id = document.add_object(dictionary! {
            "Type" => "Pages",
            "Kids" => Object::Array(Vec::new()),
            "Count" => 0,
        });
        let catalog_id = document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        document.trailer.set("Root", catalog_id);
        Self { document, pages_id }
    }

    /// Append every page of one source PDF, in its native page order.
    ///
    /// `index` is the position of this source in the caller's input list;
    /// it is carried into the error when the buffer fails to load so the
    /// caller can name the offending upload.
    #[instrument(skip(self, bytes), fields(index, bytes_len = bytes.len()))]
    pub fn append_document(&mut self, index: usize, bytes: &[u8]) -> Result<()> {
        let source = Document::load_mem(bytes).map_err(|err| ConvertError::MalformedInput {
            index,
            detail: err.to_string(),
        })?;

        let pages = source.get_pages();
        let mut page_numbers: Vec<u32> = pages.keys().copied().collect();
        page_numbers.sort_unstable();

        debug!(pages = page_numbers.len(), "source PDF loaded");

        for page_number in page_numbers {
            let page_id = pages[&page_number];
            self.append_page(&source, page_id)?;
        }
        Ok(())
    }

    /// Serialise the accumulated document. Consuming `self` makes the
    /// builder unusable after finalisation.
    pub fn finish(mut self) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        self.document
            .save_to(&mut output)
            .map_err(|err| ConvertError::Pdf(format!("failed to serialise merged PDF: {err}")))?;
        debug!(output_bytes = output.len(), "merge serialised");
        Ok(output)
    }

    /// Clone one page (and everything it references) from `source` into the
    /// output document and hang it off the output page tree.
    fn append_page(&mut self, source: &Document, page_id: ObjectId) -> Result<()> {
        let page_object = source.get_object(page_id).map_err(|err| {
            ConvertError::Pdf(format!("cannot read page object {page_id:?}: {err}"))
        })?;

        let cloned = clone_object(source, &mut self.document, page_object)?;
        let cloned_id = self.document.add_object(cloned);

        if let Ok(Object::Dictionary(pages_dict)) = self.document.get_object_mut(self.pages_id) {
            if let Ok(Object::Array(kids)) = pages_dict.get_mut(b"Kids") {
                kids.push(Object::Reference(cloned_id));
            }
            if let Ok(Object::Integer(count)) = pages_dict.get_mut(b"Count") {
                *count += 1;
            }
        }

        // The clone dropped /Parent; point the page at the output tree.
        if let Ok(Object::Dictionary(page_dict)) = self.document.get_object_mut(cloned_id) {
            page_dict.set("Parent", Object::Reference(self.pages_id));
        }

        Ok(())
    }
}

impl Default for PdfAssembler {
    fn default() -> Self {
        Self::new()
    }
}

/// Concatenate the pages of `inputs` in list order.
///
/// An empty list is `NoInput`; a single input is returned unchanged with no
/// re-encode. Any load failure fails the whole merge — partial merges are
/// never returned.
#[instrument(skip(inputs), fields(count = inputs.len()))]
pub fn merge_pdfs(inputs: &[&[u8]]) -> Result<Vec<u8>> {
    if inputs.is_empty() {
        return Err(ConvertError::NoInput);
    }
    if inputs.len() == 1 {
        debug!("single input — returned without re-encode");
        return Ok(inputs[0].to_vec());
    }

    let mut assembler = PdfAssembler::new();
    for (index, bytes) in inputs.iter().enumerate() {
        assembler.append_document(index, bytes)?;
    }
    info!("merge complete");
    assembler.finish()
}

/// Deep-clone one object graph from `source` into `target`.
///
/// References are resolved in the source and re-created as new objects in
/// the target. `/Parent` entries are dropped — the caller re-points the
/// page at the output page tree, and dropping them also breaks the only
/// cycle in a well-formed page graph. References that cannot be resolved
/// degrade to Null rather than failing the whole merge.
fn clone_object(source: &Document, target: &mut Document, object: &Object) -> Result<Object> {
    match object {
        Object::Dictionary(dict) => Ok(Object::Dictionary(clone_dictionary(
            source, target, dict,
        )?)),
        Object::Array(items) => {
            let mut cloned = Vec::with_capacity(items.len());
            for item in items {
                cloned.push(clone_object(source, target, item)?);
            }
            Ok(Object::Array(cloned))
        }
        Object::Reference(id) => match source.get_object(*id) {
            Ok(referenced) => {
                let cloned = clone_object(source, target, referenced)?;
                Ok(Object::Reference(target.add_object(cloned)))
            }
            Err(err) => {
                warn!(?id, %err, "unresolvable reference replaced with Null");
                Ok(Object::Null)
            }
        },
        Object::Stream(stream) => {
            let dict = clone_dictionary(source, target, &stream.dict)?;
            Ok(Object::Stream(Stream::new(dict, stream.content.clone())))
        }
        // Boolean, Integer, Real, String, Name, Null are plain values.
        other => Ok(other.clone()),
    }
}

fn clone_dictionary(
    source: &Document,
    target: &mut Document,
    dict: &Dictionary,
) -> Result<Dictionary> {
    let mut cloned = Dictionary::new();
    for (key, value) in dict.iter() {
        if key == b"Parent" {
            continue;
        }
        cloned.set(key.clone(), clone_object(source, target, value)?);
    }
    Ok(cloned)
}
