//! TOC joining
//!
//! Grafts the top-level items of a reference TOC into slots of a top-level
//! TOC. Slots are nodes carrying `children` glob patterns; matching is by
//! item name, first-match-wins in pre-order of the top-level tree.

use globset::Glob;

use crate::toc_model::TocNode;

/// Graft `reference`'s top-level items into glob-matched slots of
/// `top_level`.
///
/// Returns a rebuilt tree; neither input is mutated. Grafted items are
/// traversed like authored ones, so a grafted node carrying its own patterns
/// can receive further grafts.
pub(crate) fn merge(top_level: &TocNode, reference: &TocNode) -> TocNode {
    let mut merged = top_level.clone();
    let mut matched = vec![false; reference.items.len()];
    traverse_and_merge(&mut merged, &reference.items, &mut matched);
    merged
}

fn traverse_and_merge(node: &mut TocNode, candidates: &[TocNode], matched: &mut [bool]) {
    let patterns = node.children.clone();
    for pattern in &patterns {
        let matcher = match Glob::new(pattern) {
            Ok(glob) => glob.compile_matcher(),
            Err(error) => {
                log::warn!("skipping invalid TOC join pattern '{}': {}", pattern, error);
                continue;
            }
        };

        for (index, candidate) in candidates.iter().enumerate() {
            if !matched[index] && !candidate.name.is_empty() && matcher.is_match(&candidate.name)
            {
                matched[index] = true;
                node.items.push(candidate.clone());
            }
        }
    }

    // Recurse after grafting so grafted items are scanned too
    for index in 0..node.items.len() {
        traverse_and_merge(&mut node.items[index], candidates, matched);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(name: &str, patterns: &[&str]) -> TocNode {
        TocNode {
            children: patterns.iter().map(|p| p.to_string()).collect(),
            ..TocNode::new(name)
        }
    }

    fn reference(names: &[&str]) -> TocNode {
        TocNode {
            items: names.iter().map(|n| TocNode::new(*n)).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_merge_grafts_matching_items() {
        let top_level = TocNode {
            items: vec![slot("Guides", &["Guide/*"])],
            ..Default::default()
        };
        let reference = reference(&["Guide/Intro", "Guide/Setup", "Other"]);

        let merged = merge(&top_level, &reference);

        let names: Vec<&str> = merged.items[0]
            .items
            .iter()
            .map(|item| item.name.as_str())
            .collect();
        assert_eq!(names, ["Guide/Intro", "Guide/Setup"]);
    }

    #[test]
    fn test_first_slot_in_preorder_wins() {
        let top_level = TocNode {
            items: vec![slot("First", &["Guide/*"]), slot("Second", &["Guide/*"])],
            ..Default::default()
        };
        let reference = reference(&["Guide/Intro"]);

        let merged = merge(&top_level, &reference);

        assert_eq!(merged.items[0].items.len(), 1);
        assert!(merged.items[1].items.is_empty());
    }

    #[test]
    fn test_grafted_items_are_scanned_for_further_grafts() {
        let top_level = TocNode {
            items: vec![slot("Slot", &["Outer"])],
            ..Default::default()
        };
        // "Outer" itself carries a pattern that matches "Inner"
        let reference = TocNode {
            items: vec![slot("Outer", &["Inner"]), TocNode::new("Inner")],
            ..Default::default()
        };

        let merged = merge(&top_level, &reference);

        let grafted_outer = &merged.items[0].items[0];
        assert_eq!(grafted_outer.name, "Outer");
        assert_eq!(grafted_outer.items.len(), 1);
        assert_eq!(grafted_outer.items[0].name, "Inner");
    }

    #[test]
    fn test_invalid_pattern_is_skipped() {
        let top_level = TocNode {
            items: vec![slot("Slot", &["[", "Guide/*"])],
            ..Default::default()
        };
        let reference = reference(&["Guide/Intro"]);

        let merged = merge(&top_level, &reference);
        assert_eq!(merged.items[0].items.len(), 1);
    }

    #[test]
    fn test_unnamed_items_never_match() {
        let top_level = TocNode {
            items: vec![slot("Slot", &["*"])],
            ..Default::default()
        };
        let reference = TocNode {
            items: vec![TocNode::default(), TocNode::new("Named")],
            ..Default::default()
        };

        let merged = merge(&top_level, &reference);

        assert_eq!(merged.items[0].items.len(), 1);
        assert_eq!(merged.items[0].items[0].name, "Named");
    }

    #[test]
    fn test_inputs_are_not_mutated() {
        let top_level = TocNode {
            items: vec![slot("Slot", &["*"])],
            ..Default::default()
        };
        let reference = reference(&["Item"]);

        let _ = merge(&top_level, &reference);

        assert!(top_level.items[0].items.is_empty());
        assert_eq!(reference.items.len(), 1);
    }
}
