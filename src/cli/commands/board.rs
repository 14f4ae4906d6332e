use clap::Subcommand;
use serde_json::json;

use super::board_view;
use crate::app::App;
use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::models::{Id, PostInput, PostType};
use crate::views::{Listing, Page, PostCard};

#[derive(Subcommand)]
pub enum BoardCommands {
    #[command(about = "List posts on a project board")]
    List {
        #[arg(help = "Project ID")]
        project: Id,
    },

    #[command(about = "Write a post")]
    Post {
        #[arg(help = "Project ID")]
        project: Id,
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        #[arg(long = "type", default_value = "GENERAL", help = "GENERAL, QUESTION or NOTICE")]
        post_type: PostType,
    },

    #[command(about = "Edit one of your posts")]
    Edit {
        #[arg(help = "Project ID")]
        project: Id,
        #[arg(help = "Post ID")]
        post: Id,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
        #[arg(long = "type")]
        post_type: Option<PostType>,
    },

    #[command(about = "Delete one of your posts")]
    Delete {
        #[arg(help = "Project ID")]
        project: Id,
        #[arg(help = "Post ID")]
        post: Id,
    },

    #[command(about = "Comment on a post")]
    Comment {
        #[arg(help = "Project ID")]
        project: Id,
        #[arg(help = "Post ID")]
        post: Id,
        content: String,
    },

    #[command(about = "Edit one of your comments")]
    EditComment {
        #[arg(help = "Project ID")]
        project: Id,
        #[arg(help = "Post ID")]
        post: Id,
        #[arg(help = "Comment ID")]
        comment: Id,
        content: String,
    },

    #[command(about = "Delete one of your comments")]
    Uncomment {
        #[arg(help = "Project ID")]
        project: Id,
        #[arg(help = "Post ID")]
        post: Id,
        #[arg(help = "Comment ID")]
        comment: Id,
    },

    #[command(about = "Answer a question post")]
    Answer {
        #[arg(help = "Project ID")]
        project: Id,
        #[arg(help = "Post ID")]
        post: Id,
        #[arg(help = "Question ID")]
        question: Id,
        content: String,
    },
}

pub async fn handle(cmd: BoardCommands, app: &App, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        BoardCommands::List { project } => {
            let view = board_view(app, project).await?;
            print_board(&output_format, &view.render())
        }
        BoardCommands::Post {
            project,
            title,
            content,
            post_type,
        } => {
            let view = board_view(app, project).await?;
            let post = view
                .create_post(PostInput {
                    title,
                    content,
                    post_type,
                })
                .await?;
            output_success(
                &output_format,
                &format!("Posted '{}' ({})", post.title, post.id),
                Some(json!({ "post": post })),
            )
        }
        BoardCommands::Edit {
            project,
            post,
            title,
            content,
            post_type,
        } => {
            let view = board_view(app, project).await?;
            let Some(current) = view.post(&post) else {
                anyhow::bail!("Post {} not found", post);
            };
            let mut input = PostInput::from_post(&current);
            if let Some(title) = title {
                input.title = title;
            }
            if let Some(content) = content {
                input.content = content;
            }
            if let Some(post_type) = post_type {
                input.post_type = post_type;
            }

            let updated = view.update_post(&post, input).await?;
            output_success(
                &output_format,
                &format!("Post '{}' updated", updated.title),
                Some(json!({ "post": updated })),
            )
        }
        BoardCommands::Delete { project, post } => {
            let view = board_view(app, project).await?;
            view.delete_post(&post).await?;
            output_success(&output_format, &format!("Post {} deleted", post), None)
        }
        BoardCommands::Comment { project, post, content } => {
            let view = board_view(app, project).await?;
            let comment = view.add_comment(&post, &content).await?;
            output_success(
                &output_format,
                &format!("Comment {} added", comment.id),
                Some(json!({ "comment": comment })),
            )
        }
        BoardCommands::EditComment {
            project,
            post,
            comment,
            content,
        } => {
            let view = board_view(app, project).await?;
            let comment = view.update_comment(&post, &comment, &content).await?;
            output_success(
                &output_format,
                &format!("Comment {} updated", comment.id),
                Some(json!({ "comment": comment })),
            )
        }
        BoardCommands::Uncomment { project, post, comment } => {
            let view = board_view(app, project).await?;
            view.delete_comment(&post, &comment).await?;
            output_success(&output_format, &format!("Comment {} deleted", comment), None)
        }
        BoardCommands::Answer {
            project,
            post,
            question,
            content,
        } => {
            let view = board_view(app, project).await?;
            let answer = view.answer_question(&post, &question, &content).await?;
            output_success(
                &output_format,
                &format!("Answer {} posted", answer.id),
                Some(json!({ "answer": answer })),
            )
        }
    }
}

pub fn print_board(output_format: &OutputFormat, page: &Page<Listing<PostCard>>) -> anyhow::Result<()> {
    if page.body.is_empty_placeholder() {
        return output_empty_collection(output_format, "posts", "No posts yet");
    }

    output_page(output_format, page, |body| match body {
        Listing::Loading => println!("Loading..."),
        Listing::Unavailable => println!("Board is unavailable"),
        Listing::Empty => println!("No posts yet"),
        Listing::Items(cards) => {
            for card in cards {
                let post = &card.post;
                let mine = if card.can_edit { " *" } else { "" };
                println!("[{}] {} ({}){}", post.post_type.as_str(), post.title, post.id, mine);
                println!(
                    "    by {}{}",
                    post.author.name,
                    post.created()
                        .map(|at| format!(" at {}", at.format("%Y-%m-%d %H:%M")))
                        .unwrap_or_default()
                );
                for line in post.content.lines() {
                    println!("    {}", line);
                }
                for comment in &card.comments {
                    let mine = if comment.can_edit { " *" } else { "" };
                    println!(
                        "    - {}: {} ({}){}",
                        comment.comment.author.name,
                        cell(&comment.comment.content, 60),
                        comment.comment.id,
                        mine
                    );
                }
                println!();
            }
        }
    })
}
