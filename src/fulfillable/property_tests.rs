//! Property tests for condition trees and their translation
//!
//! Random trees of `post_id` conditions built through the `when` family,
//! checked against a plain boolean model.

use proptest::prelude::*;
use std::sync::Arc;

use crate::condition::{ConditionFactory, RequestContext};
use crate::error::Result;
use crate::foreign::ForeignNode;
use crate::fulfillable::collection::{Fulfillable, FulfillableCollection};
use crate::fulfillable::json::JsonTranslator;
use crate::fulfillable::translator::{ArrayTranslator, Translator};

// ═══════════════════════════════════════════════════════════════════════════
// Tree model
// ═══════════════════════════════════════════════════════════════════════════

/// One child as added by `when` (`or == false`) or `or_when` (`or == true`)
#[derive(Debug, Clone)]
enum Node {
    Leaf { id: i64, or: bool },
    Group { or: bool, children: Vec<Node> },
}

impl Node {
    fn is_or(&self) -> bool {
        match self {
            Node::Leaf { or, .. } | Node::Group { or, .. } => *or,
        }
    }

    fn set_or(&mut self, value: bool) {
        match self {
            Node::Leaf { or, .. } | Node::Group { or, .. } => *or = value,
        }
    }
}

fn build(nodes: &[Node], collection: &mut FulfillableCollection) -> Result<()> {
    for node in nodes {
        match node {
            Node::Leaf { id, or: false } => {
                collection.when("post_id", "=", *id)?;
            }
            Node::Leaf { id, or: true } => {
                collection.or_when("post_id", "=", *id)?;
            }
            Node::Group { or: false, children } => {
                collection.when_group(|group| build(children, group))?;
            }
            Node::Group { or: true, children } => {
                collection.or_when_group(|group| build(children, group))?;
            }
        }
    }
    Ok(())
}

/// A single `or_when` turns the whole node into OR
fn model(nodes: &[Node], post_id: i64) -> bool {
    if nodes.is_empty() {
        return true;
    }
    let mut results = nodes.iter().map(|node| match node {
        Node::Leaf { id, .. } => *id == post_id,
        Node::Group { children, .. } => model(children, post_id),
    });
    if nodes.iter().any(Node::is_or) {
        results.any(|r| r)
    } else {
        results.all(|r| r)
    }
}

/// Give every child of a node the connective of its first child
fn homogenize(nodes: &mut [Node]) {
    let or = nodes.first().is_some_and(Node::is_or);
    for node in nodes.iter_mut() {
        node.set_or(or);
        if let Node::Group { children, .. } = node {
            homogenize(children);
        }
    }
}

fn factory() -> Arc<ConditionFactory> {
    Arc::new(ConditionFactory::with_defaults())
}

fn collection_from(nodes: &[Node]) -> FulfillableCollection {
    let mut collection = FulfillableCollection::new(factory());
    build(nodes, &mut collection).unwrap();
    collection
}

// ═══════════════════════════════════════════════════════════════════════════
// Strategy generators for property tests
// ═══════════════════════════════════════════════════════════════════════════

/// Generate nested children lists
fn tree_strategy() -> impl Strategy<Value = Vec<Node>> {
    let leaf = (0..4i64, any::<bool>()).prop_map(|(id, or)| Node::Leaf { id, or });
    let node = leaf.prop_recursive(4, 32, 4, |inner| {
        (prop::collection::vec(inner, 0..4), any::<bool>())
            .prop_map(|(children, or)| Node::Group { or, children })
    });
    prop::collection::vec(node, 0..5)
}

/// Generate trees where every node uses a single connective
fn homogeneous_tree_strategy() -> impl Strategy<Value = Vec<Node>> {
    tree_strategy().prop_map(|mut nodes| {
        homogenize(&mut nodes);
        nodes
    })
}

// ═══════════════════════════════════════════════════════════════════════════
// Property Tests
// ═══════════════════════════════════════════════════════════════════════════

proptest! {
    /// Evaluation follows the node-level relation model
    #[test]
    fn prop_evaluation_matches_model(nodes in tree_strategy(), post_id in 0..4i64) {
        let collection = collection_from(&nodes);
        let ctx = RequestContext::new().with("post_id", post_id);
        prop_assert_eq!(collection.evaluate(&ctx), model(&nodes, post_id));
    }

    /// Reading back a translated tree keeps its meaning
    #[test]
    fn prop_array_round_trip_is_equivalent(nodes in tree_strategy()) {
        let translator = ArrayTranslator::new(factory());
        let original = collection_from(&nodes);
        let foreign = translator.collection_to_foreign(&original).unwrap();
        let restored = translator.foreign_to_collection(&foreign).unwrap();

        for post_id in 0..4i64 {
            let ctx = RequestContext::new().with("post_id", post_id);
            prop_assert_eq!(restored.evaluate(&ctx), original.evaluate(&ctx));
        }
    }

    /// The foreign form is a fixed point after one round trip
    #[test]
    fn prop_array_translation_is_stable(nodes in tree_strategy()) {
        let translator = ArrayTranslator::new(factory());
        let first = translator.collection_to_foreign(&collection_from(&nodes)).unwrap();
        let restored = translator.foreign_to_collection(&first).unwrap();
        let second = translator.collection_to_foreign(&restored).unwrap();

        prop_assert_eq!(first.to_json_string().unwrap(), second.to_json_string().unwrap());
    }

    /// Trees without mixed connectives survive the round trip unchanged
    #[test]
    fn prop_homogeneous_round_trip_is_exact(nodes in homogeneous_tree_strategy()) {
        let original = Fulfillable::Collection(collection_from(&nodes));

        let array = ArrayTranslator::new(factory());
        let foreign = array.fulfillable_to_foreign(&original).unwrap();
        prop_assert_eq!(&array.foreign_to_fulfillable(&foreign).unwrap(), &original);

        let client = JsonTranslator::new(factory());
        let json = client.fulfillable_to_foreign(&original).unwrap();
        prop_assert_eq!(&client.foreign_to_fulfillable(&json).unwrap(), &original);
    }

    /// Rendered foreign text parses back to the same node
    #[test]
    fn prop_foreign_text_parses_back(nodes in tree_strategy()) {
        let translator = ArrayTranslator::new(factory());
        let foreign = translator.collection_to_foreign(&collection_from(&nodes)).unwrap();
        let text = foreign.to_json_string().unwrap();
        prop_assert_eq!(ForeignNode::from_json_str(&text).unwrap(), foreign);
    }
}
