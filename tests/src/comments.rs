use taskdesk_client::{
    api::{Comment, CommentEdit, Error, NewComment},
    CommentTree, Notice,
};

use crate::fixture::{self, comment, task};

fn ids(comments: &[Comment]) -> Vec<u128> {
    comments
        .iter()
        .map(|c| c.id.0.as_u128() - 0x2000)
        .collect()
}

#[tokio::test]
async fn thread_loads_lazily() {
    let client = fixture::client();
    let mut tree = CommentTree::load(&client, task(0)).await.unwrap();
    assert_eq!(ids(tree.roots()), vec![6, 5, 4, 3, 2]);
    assert_eq!(tree.total_elements(), 7);
    assert!(tree.has_more_roots());

    let top = tree.find(&comment(6)).unwrap();
    assert_eq!(ids(&top.child_comments), vec![12, 11]);
    assert_eq!(top.child_count, 3);
    assert!(tree.has_more_replies(&comment(6)));
    assert_eq!(tree.depth(&comment(20)), Some(2));

    tree.load_more_roots(&client).await.unwrap();
    assert_eq!(ids(tree.roots()), vec![6, 5, 4, 3, 2, 1, 0]);
    assert!(!tree.has_more_roots());

    tree.load_more_children(&client, comment(6)).await.unwrap();
    let top = tree.find(&comment(6)).unwrap();
    assert_eq!(ids(&top.child_comments), vec![12, 11, 10]);
    assert_eq!(top.child_count, 3);
    assert!(!tree.has_more_replies(&comment(6)));
    assert_eq!(tree.find(&comment(20)).map(|c| c.content.as_str()), Some("comment 20"));
}

#[tokio::test]
async fn replies_stop_two_levels_down() {
    let client = fixture::client();
    let mut tree = CommentTree::load(&client, task(0)).await.unwrap();
    assert!(tree.can_reply(&comment(6)));
    assert!(tree.can_reply(&comment(11)));
    assert!(!tree.can_reply(&comment(20)));

    let sent = client.transport().requests().len();
    let err = tree
        .reply(&client, comment(20), "too deep", None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::MaxDepthExceeded(_)));
    assert_eq!(client.transport().requests().len(), sent);

    let id = tree
        .reply(&client, comment(11), "deep enough", None)
        .await
        .unwrap();
    let parent = tree.find(&comment(11)).unwrap();
    assert_eq!(parent.child_count, 1);
    assert_eq!(parent.child_comments[0].id, id);
    assert_eq!(parent.child_comments[0].content, "deep enough");
    let stored = client.transport().snapshot();
    assert!(stored
        .comments
        .iter()
        .any(|c| c.id == id && c.parent_id == Some(comment(11))));
}

#[tokio::test]
async fn server_enforces_depth_too() {
    let client = fixture::client();
    let new = NewComment {
        task_id: task(0),
        content: String::from("sneaky"),
        parent_id: Some(comment(20)),
        user_id: None,
    };
    let err = client.create::<Comment>(&new).await.unwrap_err();
    assert!(matches!(err, Error::MaxDepthExceeded(_)), "got {err:?}");
}

#[tokio::test]
async fn posting_and_deleting_keep_counts() {
    let client = fixture::client();
    let mut tree = CommentTree::load(&client, task(0)).await.unwrap();

    let id = tree.post(&client, "fresh", None).await.unwrap();
    assert_eq!(tree.roots()[0].id, id);
    assert_eq!(tree.roots().len(), 6);
    assert_eq!(tree.total_elements(), 8);

    tree.delete(&client, comment(12)).await.unwrap();
    let top = tree.find(&comment(6)).unwrap();
    assert_eq!(ids(&top.child_comments), vec![11]);
    assert_eq!(top.child_count, 2);
    assert!(tree.find(&comment(20)).is_none());
    assert_eq!(tree.total_elements(), 7);
    assert_eq!(ids(&tree.roots()[1..]), vec![6, 5, 4, 3, 2]);

    let stored = client.transport().snapshot();
    assert!(!stored.comments.iter().any(|c| c.id == comment(12) || c.id == comment(20)));

    // The server agrees with what the tree shows
    let reloaded = CommentTree::load(&client, task(0)).await.unwrap();
    assert_eq!(reloaded.roots()[0].id, id);
    assert_eq!(reloaded.find(&comment(6)).unwrap().child_count, 2);
}

#[tokio::test]
async fn edits_keep_position_and_replies() {
    let client = fixture::client();
    let mut tree = CommentTree::load(&client, task(0)).await.unwrap();
    let edit = CommentEdit {
        content: String::from("edited"),
        is_pinned: Some(true),
    };
    tree.edit(&client, comment(4), &edit).await.unwrap();
    assert_eq!(ids(tree.roots()), vec![6, 5, 4, 3, 2]);
    let c = tree.find(&comment(4)).unwrap();
    assert_eq!(c.content, "edited");
    assert!(c.is_pinned);

    tree.edit(&client, comment(12), &edit).await.unwrap();
    let reply = tree.find(&comment(12)).unwrap();
    assert_eq!(reply.content, "edited");
    assert_eq!(ids(&reply.child_comments), vec![20]);
}

#[tokio::test]
async fn failures_leave_the_tree_alone() {
    let client = fixture::client();
    let mut tree = CommentTree::load(&client, task(0)).await.unwrap();
    let before = tree.clone();

    client.transport().set_offline(true);
    let err = tree.post(&client, "lost", None).await.unwrap_err();
    assert!(matches!(err, Error::Network(_)));
    assert_eq!(tree, before);
    assert_eq!(
        Notice::failure("post this comment", &err).text,
        "Failed to post this comment: Cannot connect to server"
    );

    client.transport().set_offline(false);
    client.transport().set_read_only("task-comment");
    let err = tree.delete(&client, comment(6)).await.unwrap_err();
    assert_eq!(err, Error::PermissionDenied);
    assert_eq!(tree, before);
    assert_eq!(
        Notice::failure("delete this comment", &err).text,
        "You don't have permission to delete this comment."
    );
}
