//! Page tree manipulation on lopdf documents.
//!
//! Both merging and extraction flatten the pages they touch directly under
//! the root `Pages` node. Attributes a page used to inherit from an
//! intermediate node are copied onto the page first, so nothing visible
//! changes when that node is dropped.

use lopdf::{Dictionary, Document, Object, ObjectId, dictionary};

use crate::error::{Result, ToolkitError};
use crate::ranges::PageRange;

/// Page attributes that may be inherited from ancestor `Pages` nodes.
const INHERITABLE: [&[u8]; 4] = [b"MediaBox", b"Resources", b"CropBox", b"Rotate"];

/// Upper bound on `Parent` hops, guards against cyclic trees.
const MAX_TREE_DEPTH: usize = 64;

/// Create an empty document with a catalog and a page tree.
pub fn blank_document() -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let catalog_id = doc.new_object_id();

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => Vec::<Object>::new(),
            "Count" => 0,
        }),
    );
    doc.objects.insert(
        catalog_id,
        Object::Dictionary(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        }),
    );
    doc.trailer.set("Root", catalog_id);

    doc
}

/// Append every page of `source` to the end of `target`.
///
/// # Errors
///
/// Returns [`ToolkitError::Library`] if either document lacks a usable page tree.
pub fn append_document(target: &mut Document, mut source: Document) -> Result<()> {
    // Renumber objects to avoid ID conflicts
    source.renumber_objects_with(target.max_id + 1);

    let page_ids: Vec<ObjectId> = source.get_pages().into_values().collect();
    let inherited: Vec<(ObjectId, Vec<(Vec<u8>, Object)>)> = page_ids
        .iter()
        .map(|&id| (id, inherited_attributes(&source, id)))
        .collect();

    target.max_id = target.max_id.max(source.max_id);
    target.objects.extend(source.objects);

    let pages_id = root_pages_id(target)?;
    adopt_pages(target, pages_id, inherited)?;
    add_pages_to_tree(target, pages_id, &page_ids)
}

/// Build a new document holding only the pages of `range`.
///
/// # Errors
///
/// Returns [`ToolkitError::Library`] if the range exceeds the document.
pub fn extract_range(source: &Document, range: PageRange) -> Result<Document> {
    let all_pages = source.get_pages();
    let selected: Vec<ObjectId> = (range.start..=range.end)
        .filter_map(|number| all_pages.get(&number).copied())
        .collect();

    if selected.is_empty() || selected.len() != range.len() as usize {
        return Err(ToolkitError::library(format!(
            "pages {range} are not all present in a document of {} pages",
            all_pages.len()
        )));
    }

    let mut doc = source.clone();
    let inherited: Vec<(ObjectId, Vec<(Vec<u8>, Object)>)> = selected
        .iter()
        .map(|&id| (id, inherited_attributes(&doc, id)))
        .collect();

    let pages_id = root_pages_id(&doc)?;
    adopt_pages(&mut doc, pages_id, inherited)?;
    update_page_tree(&mut doc, pages_id, &selected)?;
    doc.prune_objects();

    Ok(doc)
}

/// Find the root `Pages` node through the catalog.
fn root_pages_id(doc: &Document) -> Result<ObjectId> {
    doc.catalog()
        .and_then(|catalog| catalog.get(b"Pages"))
        .and_then(|pages| pages.as_reference())
        .map_err(|e| ToolkitError::library(format!("failed to get pages reference: {e}")))
}

/// Collect the attributes `page_id` inherits but does not set itself.
fn inherited_attributes(doc: &Document, page_id: ObjectId) -> Vec<(Vec<u8>, Object)> {
    let mut found: Vec<(Vec<u8>, Object)> = Vec::new();
    let Ok(page) = doc.get_dictionary(page_id) else {
        return found;
    };

    let mut parent = parent_of(page);
    let mut depth = 0;
    while let Some(node_id) = parent {
        if depth >= MAX_TREE_DEPTH {
            break;
        }
        let Ok(node) = doc.get_dictionary(node_id) else {
            break;
        };

        for key in INHERITABLE {
            let already = page.has(key) || found.iter().any(|(k, _)| k.as_slice() == key);
            if !already && let Ok(value) = node.get(key) {
                found.push((key.to_vec(), value.clone()));
            }
        }

        parent = parent_of(node);
        depth += 1;
    }

    found
}

fn parent_of(dict: &Dictionary) -> Option<ObjectId> {
    dict.get(b"Parent")
        .and_then(|parent| parent.as_reference())
        .ok()
}

/// Re-parent pages under `pages_id`, materialising inherited attributes.
fn adopt_pages(
    doc: &mut Document,
    pages_id: ObjectId,
    pages: Vec<(ObjectId, Vec<(Vec<u8>, Object)>)>,
) -> Result<()> {
    for (page_id, attributes) in pages {
        let page = doc
            .get_object_mut(page_id)
            .and_then(|object| object.as_dict_mut())
            .map_err(|e| ToolkitError::library(format!("failed to get page: {e}")))?;

        page.set("Parent", Object::Reference(pages_id));
        for (key, value) in attributes {
            page.set(key, value);
        }
    }
    Ok(())
}

/// Push page references onto the `Kids` array of `pages_id`.
fn add_pages_to_tree(doc: &mut Document, pages_id: ObjectId, page_ids: &[ObjectId]) -> Result<()> {
    let dict = pages_dictionary(doc, pages_id)?;

    let kids = dict
        .get_mut(b"Kids")
        .map_err(|_| ToolkitError::library("pages dictionary missing Kids array"))?;
    let Object::Array(kids_array) = kids else {
        return Err(ToolkitError::library("Kids is not an array"));
    };
    kids_array.extend(page_ids.iter().map(|&id| Object::Reference(id)));

    let current_count = dict.get(b"Count").and_then(|c| c.as_i64()).unwrap_or(0);
    dict.set("Count", Object::Integer(current_count + page_ids.len() as i64));

    Ok(())
}

/// Replace the `Kids` array of `pages_id` with exactly `page_ids`.
fn update_page_tree(doc: &mut Document, pages_id: ObjectId, page_ids: &[ObjectId]) -> Result<()> {
    let dict = pages_dictionary(doc, pages_id)?;

    let kids: Vec<Object> = page_ids.iter().map(|&id| Object::Reference(id)).collect();
    dict.set("Kids", Object::Array(kids));
    dict.set("Count", Object::Integer(page_ids.len() as i64));

    Ok(())
}

fn pages_dictionary(doc: &mut Document, pages_id: ObjectId) -> Result<&mut Dictionary> {
    doc.get_object_mut(pages_id)
        .and_then(|object| object.as_dict_mut())
        .map_err(|e| ToolkitError::library(format!("failed to get pages object: {e}")))
}
