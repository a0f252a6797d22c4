//! Client-side tree of the comments of a task
//!
//! The server hands out comments page by page: top-level comments come with
//! the first page of their replies embedded, and further replies are fetched
//! per comment. `CommentTree` merges those pages and local mutations into one
//! tree. Mutations going through the server only touch the tree once the
//! server accepted them.

use std::collections::HashMap;

use crate::{
    api::{Comment, CommentEdit, CommentId, Error, NewComment, Page, TaskId, UserId},
    Client, Transport,
};

/// Top-level comments fetched per page
pub const ROOT_PAGE_SIZE: usize = 5;

/// Replies fetched per "view more replies" request
pub const CHILDREN_PAGE_SIZE: usize = 2;

/// Deepest level at which replying is offered, top-level comments being at depth 0
pub const MAX_REPLY_DEPTH: usize = 1;

#[derive(Clone, Debug, PartialEq)]
pub struct CommentTree {
    task: TaskId,
    roots: Vec<Comment>,

    /// Number of comments the server reports for the task
    total_elements: usize,

    /// Zero-based index of the last top-level page merged in
    page: usize,
    total_pages: usize,

    /// Next children page to request, per comment
    reply_pages: HashMap<CommentId, usize>,
}

fn find_in<'a>(comments: &'a [Comment], id: &CommentId) -> Option<&'a Comment> {
    for c in comments {
        if c.id == *id {
            return Some(c);
        }
        if let Some(res) = find_in(&c.child_comments, id) {
            return Some(res);
        }
    }
    None
}

fn find_in_mut<'a>(comments: &'a mut [Comment], id: &CommentId) -> Option<&'a mut Comment> {
    for c in comments.iter_mut() {
        if c.id == *id {
            return Some(c);
        }
        if let Some(res) = find_in_mut(&mut c.child_comments, id) {
            return Some(res);
        }
    }
    None
}

fn depth_in(comments: &[Comment], id: &CommentId, depth: usize) -> Option<usize> {
    for c in comments {
        if c.id == *id {
            return Some(depth);
        }
        if let Some(res) = depth_in(&c.child_comments, id, depth + 1) {
            return Some(res);
        }
    }
    None
}

/// Removes `id` from `comments` or their descendants
///
/// The boolean is true when the comment sat directly in `comments`, so that
/// only its direct parent has its `child_count` adjusted.
fn remove_in(comments: &mut Vec<Comment>, id: &CommentId) -> Option<(Comment, bool)> {
    if let Some(pos) = comments.iter().position(|c| c.id == *id) {
        return Some((comments.remove(pos), true));
    }
    for c in comments.iter_mut() {
        if let Some((removed, direct)) = remove_in(&mut c.child_comments, id) {
            if direct {
                c.child_count = c.child_count.saturating_sub(1);
            }
            return Some((removed, false));
        }
    }
    None
}

fn collect_ids(comments: &[Comment], out: &mut Vec<CommentId>) {
    for c in comments {
        out.push(c.id);
        collect_ids(&c.child_comments, out);
    }
}

fn normalize(c: &mut Comment) {
    c.child_count = c.child_count.max(c.child_comments.len());
    for child in c.child_comments.iter_mut() {
        normalize(child);
    }
}

impl CommentTree {
    pub fn new(task: TaskId) -> CommentTree {
        CommentTree {
            task,
            roots: Vec::new(),
            total_elements: 0,
            page: 0,
            total_pages: 0,
            reply_pages: HashMap::new(),
        }
    }

    pub fn from_page(task: TaskId, page: Page<Comment>) -> CommentTree {
        let mut res = CommentTree::new(task);
        res.apply_root_page(page);
        res
    }

    pub fn task(&self) -> TaskId {
        self.task
    }

    pub fn roots(&self) -> &[Comment] {
        &self.roots
    }

    pub fn total_elements(&self) -> usize {
        self.total_elements
    }

    pub fn find(&self, id: &CommentId) -> Option<&Comment> {
        find_in(&self.roots, id)
    }

    /// Depth of `id` in the tree, top-level comments being at depth 0
    pub fn depth(&self, id: &CommentId) -> Option<usize> {
        depth_in(&self.roots, id, 0)
    }

    pub fn can_reply(&self, id: &CommentId) -> bool {
        self.depth(id).map_or(false, |d| d <= MAX_REPLY_DEPTH)
    }

    /// Ids of every loaded comment, parents before their replies
    pub fn ids(&self) -> Vec<CommentId> {
        let mut res = Vec::new();
        collect_ids(&self.roots, &mut res);
        res
    }

    pub fn has_more_roots(&self) -> bool {
        self.page + 1 < self.total_pages
    }

    pub fn next_root_page(&self) -> usize {
        if self.roots.is_empty() {
            0
        } else {
            self.page + 1
        }
    }

    /// Page to request next for the replies of `id`
    ///
    /// Page 0 arrives embedded in the parent, so the first request asks for page 1.
    pub fn next_children_page(&self, id: &CommentId) -> usize {
        self.reply_pages.get(id).copied().unwrap_or(1)
    }

    /// Whether a "view more replies" control makes sense for `id`
    pub fn has_more_replies(&self, id: &CommentId) -> bool {
        self.find(id)
            .map_or(false, |c| c.has_more_children && c.unloaded_children() != 0)
    }

    /// Merges a page of top-level comments, page 0 replacing what was loaded
    pub fn apply_root_page(&mut self, page: Page<Comment>) {
        let Page {
            mut items,
            page,
            total_pages,
            total_elements,
            ..
        } = page;
        items.iter_mut().for_each(normalize);
        if page == 0 {
            self.roots = items;
            self.reply_pages.clear();
        } else {
            self.roots.extend(items);
        }
        self.page = page;
        self.total_pages = total_pages;
        self.total_elements = total_elements;
    }

    /// Merges a page of replies of `parent`, page 0 replacing what was loaded
    ///
    /// Returns false if `parent` is not in the tree.
    pub fn apply_children_page(&mut self, parent: &CommentId, page: Page<Comment>) -> bool {
        let Some(c) = find_in_mut(&mut self.roots, parent) else {
            tracing::warn!(%parent, "got replies of a comment that is not loaded");
            return false;
        };
        let mut items = page.items;
        items.iter_mut().for_each(normalize);
        if page.page == 0 {
            c.child_comments = items;
        } else {
            c.child_comments.extend(items);
        }
        c.child_count = c.child_count.max(c.child_comments.len());
        c.has_more_children = page
            .has_more
            .unwrap_or(c.child_comments.len() < c.child_count);
        self.reply_pages.insert(*parent, page.page + 1);
        true
    }

    /// Puts `comment` at the head of the top-level list
    pub fn insert_top_level(&mut self, mut comment: Comment) {
        normalize(&mut comment);
        self.roots.insert(0, comment);
        self.total_elements += 1;
    }

    /// Puts `comment` at the head of the replies of `parent`
    ///
    /// Returns false if `parent` is not in the tree.
    pub fn insert_reply(&mut self, parent: &CommentId, mut comment: Comment) -> bool {
        let Some(c) = find_in_mut(&mut self.roots, parent) else {
            tracing::warn!(%parent, "replied to a comment that is not loaded");
            return false;
        };
        normalize(&mut comment);
        c.child_comments.insert(0, comment);
        c.child_count += 1;
        true
    }

    /// Swaps in a new version of a comment, keeping its position
    ///
    /// Loaded replies are kept when the new version carries none.
    pub fn replace(&mut self, mut comment: Comment) -> bool {
        let Some(c) = find_in_mut(&mut self.roots, &comment.id) else {
            tracing::warn!(id = %comment.id, "updated a comment that is not loaded");
            return false;
        };
        if comment.child_comments.is_empty() {
            comment.child_comments = std::mem::take(&mut c.child_comments);
            comment.child_count = comment.child_count.max(c.child_count);
            comment.has_more_children = c.has_more_children;
        }
        normalize(&mut comment);
        *c = comment;
        true
    }

    /// Removes a comment and its loaded replies
    pub fn remove(&mut self, id: &CommentId) -> Option<Comment> {
        let (removed, _) = remove_in(&mut self.roots, id)?;
        let mut gone = Vec::new();
        collect_ids(std::slice::from_ref(&removed), &mut gone);
        for g in gone {
            self.reply_pages.remove(&g);
        }
        self.total_elements = self.total_elements.saturating_sub(1);
        Some(removed)
    }

    pub async fn load<T: Transport>(client: &Client<T>, task: TaskId) -> Result<CommentTree, Error> {
        let page = client.comments_by_task(task, 0, ROOT_PAGE_SIZE).await?;
        Ok(CommentTree::from_page(task, page))
    }

    pub async fn load_more_roots<T: Transport>(&mut self, client: &Client<T>) -> Result<(), Error> {
        let page = client
            .comments_by_task(self.task, self.next_root_page(), ROOT_PAGE_SIZE)
            .await?;
        self.apply_root_page(page);
        Ok(())
    }

    pub async fn load_more_children<T: Transport>(
        &mut self,
        client: &Client<T>,
        id: CommentId,
    ) -> Result<(), Error> {
        let page_idx = self.next_children_page(&id);
        let page = client
            .comment_children(id, page_idx, CHILDREN_PAGE_SIZE)
            .await?;
        self.apply_children_page(&id, page);
        Ok(())
    }

    pub async fn post<T: Transport>(
        &mut self,
        client: &Client<T>,
        content: &str,
        author: Option<UserId>,
    ) -> Result<CommentId, Error> {
        let new = NewComment {
            task_id: self.task,
            content: content.to_string(),
            parent_id: None,
            user_id: author,
        };
        let created = client.create::<Comment>(&new).await?;
        let id = created.id;
        self.insert_top_level(created);
        Ok(id)
    }

    pub async fn reply<T: Transport>(
        &mut self,
        client: &Client<T>,
        parent: CommentId,
        content: &str,
        author: Option<UserId>,
    ) -> Result<CommentId, Error> {
        if !self.can_reply(&parent) {
            return Err(Error::MaxDepthExceeded(format!(
                "cannot reply to comment {parent}"
            )));
        }
        let new = NewComment {
            task_id: self.task,
            content: content.to_string(),
            parent_id: Some(parent),
            user_id: author,
        };
        let created = client.create::<Comment>(&new).await?;
        let id = created.id;
        self.insert_reply(&parent, created);
        Ok(id)
    }

    pub async fn edit<T: Transport>(
        &mut self,
        client: &Client<T>,
        id: CommentId,
        edit: &CommentEdit,
    ) -> Result<(), Error> {
        let updated = client.update::<Comment>(id, edit).await?;
        self.replace(updated);
        Ok(())
    }

    pub async fn delete<T: Transport>(&mut self, client: &Client<T>, id: CommentId) -> Result<(), Error> {
        client.delete::<Comment>(id).await?;
        self.remove(&id);
        Ok(())
    }
}
