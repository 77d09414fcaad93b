//! Paragraph-split linear and semi-linear stories.

use crate::{PromptBuilder, TreeAssembler, TwistTreeGenerator};
use futures::future::try_join_all;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::{debug, instrument, warn};
use twister_core::{Message, StoryTree, Twist, TwistId};
use twister_error::{MalformedResponseError, MalformedResponseErrorKind, TwisterResult};
use twister_interface::TwisterDriver;

static PARAGRAPH_BREAK: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\r?\n[ \t]*\r?\n").ok());

const DERIVED_TITLE_WORDS: usize = 8;

/// Split free text on blank lines into trimmed, non-empty paragraphs.
///
/// # Examples
///
/// ```
/// use twister_story::split_paragraphs;
///
/// let text = "The Lamp\nIt flickers.\n\n\n  The Stairs\nShe climbs.  \n \n";
/// assert_eq!(split_paragraphs(text), vec!["The Lamp\nIt flickers.", "The Stairs\nShe climbs."]);
/// ```
pub fn split_paragraphs(text: &str) -> Vec<String> {
    let pieces: Vec<&str> = match PARAGRAPH_BREAK.as_ref() {
        Some(re) => re.split(text).collect(),
        None => text.split("\n\n").collect(),
    };
    pieces
        .into_iter()
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Title made from the opening words of `paragraph`, within the title limit.
///
/// # Examples
///
/// ```
/// use twister_story::derive_title;
///
/// assert_eq!(derive_title("Night falls."), "Night falls.");
/// assert_eq!(
///     derive_title("The keeper climbs the spiral stairs while the storm batters the glass"),
///     "The keeper climbs the spiral stairs while the..."
/// );
/// ```
pub fn derive_title(paragraph: &str) -> String {
    let budget = Twist::TITLE_LIMIT - 3;
    let words = paragraph.split_whitespace().collect::<Vec<_>>();

    let mut title = String::new();
    let mut used = 0;
    for word in words.iter().take(DERIVED_TITLE_WORDS) {
        let extra = word.chars().count() + usize::from(!title.is_empty());
        if title.chars().count() + extra > budget {
            break;
        }
        if !title.is_empty() {
            title.push(' ');
        }
        title.push_str(word);
        used += 1;
    }

    if title.is_empty() {
        title = paragraph.chars().take(budget).collect();
    }
    if used < words.len() {
        title.push_str("...");
    }
    title
}

/// Turn one paragraph into a twist.
///
/// A short first line (at most 80 characters) followed by more text becomes the
/// title; otherwise the title is derived from the opening words and the whole
/// paragraph is the body.
///
/// # Examples
///
/// ```
/// use twister_story::paragraph_twist;
///
/// let twist = paragraph_twist("**The Lamp**\nIt flickers in the dark.");
/// assert_eq!(twist.title, "The Lamp");
/// assert_eq!(twist.body, "It flickers in the dark.");
/// ```
pub fn paragraph_twist(paragraph: &str) -> Twist {
    let paragraph = paragraph.trim();
    if let Some((first, rest)) = paragraph.split_once('\n') {
        let heading = clean_heading(first);
        let rest = rest.trim();
        if !heading.is_empty() && heading.chars().count() <= Twist::TITLE_LIMIT && !rest.is_empty()
        {
            return Twist::new(heading, rest);
        }
    }
    Twist::new(derive_title(paragraph), paragraph)
}

fn clean_heading(line: &str) -> String {
    let line = line.trim().trim_matches(|c: char| c == '#' || c == '*' || c.is_whitespace());
    let line = line.strip_prefix("Title:").unwrap_or(line);
    line.trim().to_string()
}

fn paragraphs_or_err(text: &str) -> Result<Vec<String>, MalformedResponseError> {
    let paragraphs = split_paragraphs(text);
    if paragraphs.is_empty() {
        return Err(MalformedResponseError::new(
            MalformedResponseErrorKind::NoParagraphs,
        ));
    }
    Ok(paragraphs)
}

impl<D: TwisterDriver> TwistTreeGenerator<D> {
    /// One free-text story becomes the chain `"0"`, `"00"`, ...; with a fork, the
    /// story also branches after paragraph `split_at` into `branches - 1`
    /// alternative continuations. Titles of the root and of every fork child are
    /// then back-patched in one JSON call.
    #[instrument(skip(self, prompts, assembler))]
    pub(crate) async fn grow_linear(
        &self,
        prompts: &PromptBuilder,
        assembler: &TreeAssembler,
        fork: Option<(u32, u32)>,
    ) -> TwisterResult<()> {
        self.admit().await;
        let conversation = self
            .adapter
            .opening(false)
            .with(Message::user(prompts.linear_story()));
        let (story, conversation) = self.adapter.complete(conversation, false).await?;
        let paragraphs = paragraphs_or_err(&story)?;

        let spine = assembler.merge_chain(
            TwistId::root(),
            paragraphs.iter().map(|p| paragraph_twist(p)).collect(),
        )?;
        debug!(paragraphs = spine.len(), "Story spine merged");

        let mut retitle = vec![TwistId::root()];

        if let Some((split_at, branches)) = fork {
            let split_index = (split_at as usize).min(spine.len() - 1);
            let fork_id = spine[split_index].clone();
            let remaining = (spine.len() - split_index - 1) as u32;
            if remaining > 0 {
                retitle.push(fork_id.child(0));
            }

            let alternatives = (1..branches).map(|index| {
                let mut conversation = conversation.clone();
                conversation.push(Message::user(prompts.alternative(
                    split_index as u32,
                    index,
                    remaining,
                )));
                async move {
                    self.admit().await;
                    let (text, _) = self.adapter.complete(conversation, false).await?;
                    let paragraphs = paragraphs_or_err(&text)?;
                    TwisterResult::Ok((index, paragraphs))
                }
            });

            for (index, paragraphs) in try_join_all(alternatives).await? {
                let start = fork_id.child(index);
                let chain = assembler.merge_chain(
                    start.clone(),
                    paragraphs.iter().map(|p| paragraph_twist(p)).collect(),
                )?;
                debug!(branch = %start, paragraphs = chain.len(), "Alternative merged");
                retitle.push(start);
            }
        }

        self.back_patch_titles(prompts, assembler.tree(), &retitle).await
    }

    async fn back_patch_titles(
        &self,
        prompts: &PromptBuilder,
        tree: &StoryTree,
        ids: &[TwistId],
    ) -> TwisterResult<()> {
        let entries = ids
            .iter()
            .filter_map(|id| tree.get(id).map(|twist| (id.clone(), twist.body)))
            .collect::<Vec<_>>();

        self.admit().await;
        let conversation = self
            .adapter
            .opening(true)
            .with(Message::user(prompts.titles(&entries)));
        let (object, _) = self.adapter.complete_json(conversation).await?;

        for (id, _) in &entries {
            match object.get(id.as_str()).and_then(Value::as_str).map(str::trim) {
                Some(title) if !title.is_empty() => {
                    tree.patch_title(id, title);
                }
                _ => warn!(id = %id, "No title returned, keeping derived title"),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_first_line_is_not_a_title() {
        let first = "x".repeat(81);
        let paragraph = format!("{}\nmore", first);
        let twist = paragraph_twist(&paragraph);
        assert_eq!(twist.body, paragraph);
        assert!(twist.title.chars().count() <= Twist::TITLE_LIMIT);
    }

    #[test]
    fn test_single_line_paragraph_derives_title() {
        let twist = paragraph_twist("Night falls over the bay.");
        assert_eq!(twist.title, "Night falls over the bay.");
        assert_eq!(twist.body, "Night falls over the bay.");
    }

    #[test]
    fn test_title_prefix_is_stripped() {
        let twist = paragraph_twist("# Title: The Storm\nRain hammers the glass.");
        assert_eq!(twist.title, "The Storm");
    }

    #[test]
    fn test_only_blank_text_has_no_paragraphs() {
        let err = paragraphs_or_err(" \n\n \n").unwrap_err();
        assert_eq!(err.kind(), &MalformedResponseErrorKind::NoParagraphs);
    }
}
