//! Parse cache for persisted condition documents
//!
//! Containers reload the same stored condition JSON on every request. Parsed
//! trees are shared by document text; failed parses are never stored.

use crate::error::Result;
use crate::foreign::node::ForeignNode;
use ahash::AHashMap;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::sync::Arc;

/// Documents kept before the cache starts over
const CACHE_CAPACITY: usize = 1024;

static DOCUMENTS: Lazy<RwLock<AHashMap<String, Arc<ForeignNode>>>> =
    Lazy::new(|| RwLock::new(AHashMap::with_capacity(64)));

/// Shared parsed tree for a document
#[inline]
pub fn get_or_parse_shared(json: &str) -> Result<Arc<ForeignNode>> {
    if let Some(node) = DOCUMENTS.read().get(json) {
        return Ok(Arc::clone(node));
    }

    let node = Arc::new(ForeignNode::from_json_str(json)?);

    let mut documents = DOCUMENTS.write();
    if documents.len() >= CACHE_CAPACITY {
        tracing::debug!("Condition document cache full, clearing {} entries", documents.len());
        documents.clear();
    }
    // Another thread may have parsed the same text meanwhile
    let cached = documents
        .entry(json.to_string())
        .or_insert_with(|| Arc::clone(&node));
    Ok(Arc::clone(cached))
}

/// Owned parsed tree for a document
pub fn get_or_parse(json: &str) -> Result<ForeignNode> {
    get_or_parse_shared(json).map(|node| (*node).clone())
}

pub fn clear_cache() {
    DOCUMENTS.write().clear();
}

pub fn cache_size() -> usize {
    DOCUMENTS.read().len()
}
