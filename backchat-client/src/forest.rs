use std::collections::{HashMap, HashSet};

use crate::{api::CommentId, Comment};

/// Nests a flat comment list into a forest of reply trees.
///
/// The input is expected in `created_at` ascending order; the builder does no
/// sorting of its own, so roots and every `replies` list come out in input
/// order. A comment whose parent is not in the loaded set (soft-deleted, or
/// excluded by the query) is kept as a root rather than dropped.
pub fn build_forest(flat: Vec<Comment>) -> Vec<Comment> {
    let ids: HashSet<CommentId> = flat.iter().map(|c| c.id).collect();

    let mut children: HashMap<CommentId, Vec<Comment>> = HashMap::new();
    let mut roots = Vec::new();
    for c in flat {
        match c.parent_id {
            Some(p) if p != c.id && ids.contains(&p) => children.entry(p).or_default().push(c),
            _ => roots.push(c),
        }
    }

    // Attach grouped children, walking with an explicit stack: nesting depth
    // is whatever the data contains.
    let mut stack: Vec<&mut Comment> = roots.iter_mut().collect();
    while let Some(node) = stack.pop() {
        if let Some(replies) = children.remove(&node.id) {
            node.replies = replies;
        }
        stack.extend(node.replies.iter_mut());
    }

    if !children.is_empty() {
        // Only reachable through a parent cycle, which the insert-only
        // parent relationship never produces.
        tracing::warn!(
            dropped = children.values().map(Vec::len).sum::<usize>(),
            "comments with unreachable parents"
        );
    }

    roots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{self, SubjectId, UserId, Uuid};
    use chrono::{TimeZone, Utc};

    fn comment(id: u128, parent: Option<u128>, at: i64) -> Comment {
        Comment::from(api::Comment {
            id: CommentId(Uuid::from_u128(id)),
            subject_id: SubjectId::stub(),
            author_id: UserId::stub(),
            parent_id: parent.map(|p| CommentId(Uuid::from_u128(p))),
            content: format!("comment {id}"),
            created_at: Utc.timestamp_opt(at, 0).unwrap(),
            updated_at: Utc.timestamp_opt(at, 0).unwrap(),
            is_edited: false,
            deleted_at: None,
            user_name: Some(String::from("alice")),
            user_avatar: None,
            mentions: vec![],
            reactions: vec![],
        })
    }

    fn ids(comments: &[Comment]) -> Vec<u128> {
        comments.iter().map(|c| c.id.0.as_u128()).collect()
    }

    #[test]
    fn nests_replies_and_keeps_orphans_as_roots() {
        let forest = build_forest(vec![
            comment(1, None, 1),
            comment(2, Some(1), 2),
            comment(3, None, 3),
            comment(4, Some(99), 4),
        ]);
        assert_eq!(ids(&forest), vec![1, 3, 4]);
        assert_eq!(ids(&forest[0].replies), vec![2]);
        assert!(forest[1].replies.is_empty());
        assert!(forest[2].replies.is_empty());
    }

    #[test]
    fn no_comment_is_dropped_or_duplicated() {
        let flat = vec![
            comment(1, None, 1),
            comment(2, Some(1), 2),
            comment(3, Some(2), 3),
            comment(4, Some(3), 4),
            comment(5, Some(42), 5),
            comment(6, None, 6),
        ];
        let n = flat.len();
        let forest = build_forest(flat);
        assert_eq!(Comment::count(&forest), n);
    }

    #[test]
    fn chronological_order_is_preserved_at_every_level() {
        let forest = build_forest(vec![
            comment(1, None, 1),
            comment(2, Some(1), 2),
            comment(3, None, 3),
            comment(4, Some(1), 4),
            comment(5, Some(1), 5),
            comment(6, None, 6),
        ]);
        assert_eq!(ids(&forest), vec![1, 3, 6]);
        assert_eq!(ids(&forest[0].replies), vec![2, 4, 5]);
        for level in [&forest, &forest[0].replies] {
            assert!(level.windows(2).all(|w| w[0].created_at <= w[1].created_at));
        }
    }

    #[test]
    fn deep_nesting_does_not_recurse() {
        // A reply chain far deeper than any call stack would tolerate.
        let mut flat = vec![comment(1, None, 1)];
        for i in 2..50_000u128 {
            flat.push(comment(i, Some(i - 1), i as i64));
        }
        let n = flat.len();
        let forest = build_forest(flat);
        assert_eq!(forest.len(), 1);
        assert_eq!(Comment::count(&forest), n);

        // Tear down iteratively too; the default recursive Drop would
        // overflow on a chain this deep just like a recursive builder.
        let mut worklist = forest;
        while let Some(mut c) = worklist.pop() {
            worklist.append(&mut c.replies);
        }
    }

    #[test]
    fn self_referencing_parent_becomes_a_root() {
        let forest = build_forest(vec![comment(1, Some(1), 1)]);
        assert_eq!(ids(&forest), vec![1]);
    }

    #[test]
    fn find_and_remove_walk_the_whole_forest() {
        let mut forest = build_forest(vec![
            comment(1, None, 1),
            comment(2, Some(1), 2),
            comment(3, Some(2), 3),
        ]);
        let deep = CommentId(Uuid::from_u128(3));
        assert!(Comment::find_in(&mut forest, &deep).is_some());
        assert!(Comment::remove_from(&mut forest, &deep));
        assert!(Comment::find_in(&mut forest, &deep).is_none());
        assert!(!Comment::remove_from(&mut forest, &deep));
        assert_eq!(Comment::count(&forest), 2);
    }
}
