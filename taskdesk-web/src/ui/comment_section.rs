use taskdesk_client::{
    api::{non_empty, Comment, CommentEdit, CommentId, Error, NewComment, Page, TaskId, UserId},
    comment::{CHILDREN_PAGE_SIZE, ROOT_PAGE_SIZE},
    CommentTree, Notice,
};
use web_sys::HtmlTextAreaElement;
use yew::prelude::*;

use crate::{api::Api, ui};

#[derive(Clone, PartialEq, Properties)]
pub struct CommentSectionProps {
    pub api: Api,
    pub task: TaskId,

    /// Author of new comments, left to the server when unset
    #[prop_or_default]
    pub author: Option<UserId>,
    pub on_notice: Callback<Notice>,
}

pub enum CommentMsg {
    Loaded(Result<CommentTree, Error>),
    MoreRoots,
    RootsPage(Result<Page<Comment>, Error>),
    MoreReplies(CommentId),
    RepliesPage(CommentId, Result<Page<Comment>, Error>),

    SetDraft(String),
    Post,
    Posted(Result<Comment, Error>),

    OpenReply(Option<CommentId>),
    SetReplyDraft(String),
    Reply,
    Replied(CommentId, Result<Comment, Error>),

    StartEdit(Option<CommentId>),
    SetEditDraft(String),
    SaveEdit,
    TogglePin(CommentId),
    Edited(Result<Comment, Error>),

    Delete(CommentId),
    Deleted(CommentId, Result<(), Error>),
}

/// Threaded comments of a task
///
/// Requests run against a snapshot of the ids involved and the answer is merged
/// into the tree, so the tree only ever reflects what the server accepted.
pub struct CommentSection {
    tree: Option<CommentTree>,
    draft: String,
    reply: Option<(CommentId, String)>,
    editing: Option<(CommentId, String)>,
    loading_more: bool,
    posting: bool,
}

fn textarea_value(e: InputEvent) -> String {
    e.target_unchecked_into::<HtmlTextAreaElement>().value()
}

impl CommentSection {
    fn notify(ctx: &Context<Self>, action: &str, err: &Error) {
        ctx.props().on_notice.emit(Notice::failure(action, err));
    }

    fn view_comment(&self, ctx: &Context<Self>, tree: &CommentTree, c: &Comment) -> Html {
        let link = ctx.link();
        let id = c.id;
        let pinned = c.is_pinned;
        let editing = self.editing.as_ref().filter(|(e, _)| *e == id);
        let replying = self.reply.as_ref().filter(|(r, _)| *r == id);
        html! {
            <div key={id.to_string()} class="mb-3">
                <div class="d-flex align-items-baseline gap-2">
                    <strong>{ c.author() }</strong>
                    <span class="text-muted small">{ ui::format_date(&c.created_at) }</span>
                    if pinned {
                        <span class="badge text-bg-warning">{"Pinned"}</span>
                    }
                </div>
                if let Some((_, text)) = editing {
                    <textarea class="form-control form-control-sm my-1" rows="2"
                        value={text.clone()}
                        oninput={link.callback(|e| CommentMsg::SetEditDraft(textarea_value(e)))}>
                    </textarea>
                    <div class="d-flex gap-2">
                        <button type="button" class="btn btn-primary btn-sm"
                            onclick={link.callback(|_| CommentMsg::SaveEdit)}>{"Save"}</button>
                        <button type="button" class="btn btn-link btn-sm"
                            onclick={link.callback(|_| CommentMsg::StartEdit(None))}>{"Cancel"}</button>
                    </div>
                } else {
                    <p class="mb-1" style="white-space: pre-wrap">{ &c.content }</p>
                }
                <div class="d-flex gap-2 small">
                    if tree.can_reply(&id) {
                        <button type="button" class="btn btn-link btn-sm p-0"
                            onclick={link.callback(move |_| CommentMsg::OpenReply(Some(id)))}>{"Reply"}</button>
                    }
                    <button type="button" class="btn btn-link btn-sm p-0"
                        onclick={link.callback(move |_| CommentMsg::StartEdit(Some(id)))}>{"Edit"}</button>
                    <button type="button" class="btn btn-link btn-sm p-0"
                        onclick={link.callback(move |_| CommentMsg::TogglePin(id))}>
                        { if pinned { "Unpin" } else { "Pin" } }
                    </button>
                    <button type="button" class="btn btn-link btn-sm p-0 text-danger"
                        onclick={link.callback(move |_| CommentMsg::Delete(id))}>{"Delete"}</button>
                </div>
                if let Some((_, text)) = replying {
                    <div class="comment-replies mt-2">
                        <textarea class="form-control form-control-sm mb-1" rows="2" placeholder="Write a reply"
                            value={text.clone()}
                            oninput={link.callback(|e| CommentMsg::SetReplyDraft(textarea_value(e)))}>
                        </textarea>
                        <div class="d-flex gap-2">
                            <button type="button" class="btn btn-primary btn-sm" disabled={self.posting}
                                onclick={link.callback(|_| CommentMsg::Reply)}>{"Reply"}</button>
                            <button type="button" class="btn btn-link btn-sm"
                                onclick={link.callback(|_| CommentMsg::OpenReply(None))}>{"Cancel"}</button>
                        </div>
                    </div>
                }
                if !c.child_comments.is_empty() || tree.has_more_replies(&id) {
                    <div class="comment-replies mt-2">
                        { for c.child_comments.iter().map(|r| self.view_comment(ctx, tree, r)) }
                        if tree.has_more_replies(&id) {
                            <button type="button" class="btn btn-link btn-sm p-0"
                                onclick={link.callback(move |_| CommentMsg::MoreReplies(id))}>
                                { format!("View more replies ({})", c.unloaded_children()) }
                            </button>
                        }
                    </div>
                }
            </div>
        }
    }
}

impl Component for CommentSection {
    type Message = CommentMsg;
    type Properties = CommentSectionProps;

    fn create(ctx: &Context<Self>) -> Self {
        let api = ctx.props().api.clone();
        let task = ctx.props().task;
        ctx.link().send_future(async move {
            CommentMsg::Loaded(CommentTree::load(&*api, task).await)
        });
        CommentSection {
            tree: None,
            draft: String::new(),
            reply: None,
            editing: None,
            loading_more: false,
            posting: false,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        let api = ctx.props().api.clone();
        let task = ctx.props().task;
        let author = ctx.props().author;
        match msg {
            CommentMsg::Loaded(Ok(tree)) => self.tree = Some(tree),
            CommentMsg::Loaded(Err(err)) => Self::notify(ctx, "load comments", &err),
            CommentMsg::MoreRoots => {
                let Some(tree) = &self.tree else {
                    return false;
                };
                let page = tree.next_root_page();
                self.loading_more = true;
                ctx.link().send_future(async move {
                    CommentMsg::RootsPage(api.comments_by_task(task, page, ROOT_PAGE_SIZE).await)
                });
            }
            CommentMsg::RootsPage(res) => {
                self.loading_more = false;
                match (res, &mut self.tree) {
                    (Ok(page), Some(tree)) => tree.apply_root_page(page),
                    (Err(err), _) => Self::notify(ctx, "load more comments", &err),
                    (Ok(_), None) => return false,
                }
            }
            CommentMsg::MoreReplies(id) => {
                let Some(tree) = &self.tree else {
                    return false;
                };
                let page = tree.next_children_page(&id);
                ctx.link().send_future(async move {
                    CommentMsg::RepliesPage(id, api.comment_children(id, page, CHILDREN_PAGE_SIZE).await)
                });
                return false;
            }
            CommentMsg::RepliesPage(id, res) => match (res, &mut self.tree) {
                (Ok(page), Some(tree)) => {
                    tree.apply_children_page(&id, page);
                }
                (Err(err), _) => Self::notify(ctx, "load replies", &err),
                (Ok(_), None) => return false,
            },
            CommentMsg::SetDraft(d) => self.draft = d,
            CommentMsg::Post => {
                let Some(content) = non_empty(&self.draft) else {
                    return false;
                };
                self.posting = true;
                let new = NewComment {
                    task_id: task,
                    content,
                    parent_id: None,
                    user_id: author,
                };
                ctx.link().send_future(async move {
                    CommentMsg::Posted(api.create::<Comment>(&new).await)
                });
            }
            CommentMsg::Posted(res) => {
                self.posting = false;
                match (res, &mut self.tree) {
                    (Ok(c), Some(tree)) => {
                        tree.insert_top_level(c);
                        self.draft.clear();
                    }
                    (Err(err), _) => Self::notify(ctx, "post this comment", &err),
                    (Ok(_), None) => return false,
                }
            }
            CommentMsg::OpenReply(target) => {
                self.reply = target.map(|id| (id, String::new()));
            }
            CommentMsg::SetReplyDraft(d) => {
                if let Some((_, text)) = &mut self.reply {
                    *text = d;
                }
            }
            CommentMsg::Reply => {
                let Some((parent, text)) = &self.reply else {
                    return false;
                };
                let parent = *parent;
                let Some(content) = non_empty(text) else {
                    return false;
                };
                if !self.tree.as_ref().map_or(false, |t| t.can_reply(&parent)) {
                    let err = Error::MaxDepthExceeded(format!("cannot reply to comment {parent}"));
                    Self::notify(ctx, "reply", &err);
                    return false;
                }
                self.posting = true;
                let new = NewComment {
                    task_id: task,
                    content,
                    parent_id: Some(parent),
                    user_id: author,
                };
                ctx.link().send_future(async move {
                    CommentMsg::Replied(parent, api.create::<Comment>(&new).await)
                });
            }
            CommentMsg::Replied(parent, res) => {
                self.posting = false;
                match (res, &mut self.tree) {
                    (Ok(c), Some(tree)) => {
                        tree.insert_reply(&parent, c);
                        self.reply = None;
                    }
                    (Err(err), _) => Self::notify(ctx, "reply", &err),
                    (Ok(_), None) => return false,
                }
            }
            CommentMsg::StartEdit(target) => {
                self.editing = target.and_then(|id| {
                    let c = self.tree.as_ref()?.find(&id)?;
                    Some((id, c.content.clone()))
                });
            }
            CommentMsg::SetEditDraft(d) => {
                if let Some((_, text)) = &mut self.editing {
                    *text = d;
                }
            }
            CommentMsg::SaveEdit => {
                let Some((id, text)) = &self.editing else {
                    return false;
                };
                let id = *id;
                let Some(content) = non_empty(text) else {
                    return false;
                };
                let is_pinned = self
                    .tree
                    .as_ref()
                    .and_then(|t| t.find(&id))
                    .map(|c| c.is_pinned);
                let edit = CommentEdit { content, is_pinned };
                ctx.link().send_future(async move {
                    CommentMsg::Edited(api.update::<Comment>(id, &edit).await)
                });
                return false;
            }
            CommentMsg::TogglePin(id) => {
                let Some(c) = self.tree.as_ref().and_then(|t| t.find(&id)) else {
                    return false;
                };
                let edit = CommentEdit {
                    content: c.content.clone(),
                    is_pinned: Some(!c.is_pinned),
                };
                ctx.link().send_future(async move {
                    CommentMsg::Edited(api.update::<Comment>(id, &edit).await)
                });
                return false;
            }
            CommentMsg::Edited(res) => match (res, &mut self.tree) {
                (Ok(c), Some(tree)) => {
                    if self.editing.as_ref().map_or(false, |(e, _)| *e == c.id) {
                        self.editing = None;
                    }
                    tree.replace(c);
                }
                (Err(err), _) => Self::notify(ctx, "edit this comment", &err),
                (Ok(_), None) => return false,
            },
            CommentMsg::Delete(id) => {
                let confirmed = web_sys::window()
                    .and_then(|w| w.confirm_with_message("Delete this comment and its replies?").ok())
                    .unwrap_or(false);
                if !confirmed {
                    return false;
                }
                ctx.link().send_future(async move {
                    CommentMsg::Deleted(id, api.delete::<Comment>(id).await)
                });
                return false;
            }
            CommentMsg::Deleted(id, res) => match (res, &mut self.tree) {
                (Ok(()), Some(tree)) => {
                    tree.remove(&id);
                    if self.reply.as_ref().map_or(false, |(r, _)| tree.find(r).is_none()) {
                        self.reply = None;
                    }
                }
                (Err(err), _) => Self::notify(ctx, "delete this comment", &err),
                (Ok(()), None) => return false,
            },
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let Some(tree) = &self.tree else {
            return html! {
                <div class="text-center p-3">
                    <div class="spinner-border spinner-border-sm" role="status"></div>
                </div>
            };
        };
        let onsubmit = link.callback(|e: SubmitEvent| {
            e.prevent_default();
            CommentMsg::Post
        });
        html! {
            <div>
                <form class="mb-3" {onsubmit}>
                    <textarea class="form-control mb-2" rows="3" placeholder="Write a comment"
                        value={self.draft.clone()}
                        oninput={link.callback(|e| CommentMsg::SetDraft(textarea_value(e)))}>
                    </textarea>
                    <button type="submit" class="btn btn-primary btn-sm" disabled={self.posting}>{"Comment"}</button>
                </form>
                <div class="small text-muted mb-2">{ format!("{} comments", tree.total_elements()) }</div>
                if tree.roots().is_empty() {
                    <p class="text-muted fst-italic">{"No comments yet"}</p>
                }
                { for tree.roots().iter().map(|c| self.view_comment(ctx, tree, c)) }
                if tree.has_more_roots() {
                    <button type="button" class="btn btn-outline-secondary btn-sm" disabled={self.loading_more}
                        onclick={link.callback(|_| CommentMsg::MoreRoots)}>
                        {"Load more comments"}
                    </button>
                }
            </div>
        }
    }
}
