//! Deterministic prompt construction.

use crate::StagePolicy;
use twister_core::{GenerationParameters, NarrativeStage, StageMarkers, StoryInstructions, TwistId};

/// System turn opening every JSON-mode conversation.
pub const JSON_SYSTEM_PROMPT: &str = "You are a helpful assistant designed to output JSON.";

const TWIST_MODEL: &str = "Consider a data model named 'twist' which represents a fraction of a story and only consists of a parameter 'title' of no more than 80 chars and a parameter 'body' of no more than 1200 chars.";

const INTERACTIVE: &str = "I need to create an interactive story where readers will be able to choose how to continue the narrative.";

/// Builds every prompt of one generation request.
///
/// Pure and deterministic: the same parameters and depth always yield a
/// byte-identical prompt.
///
/// # Examples
///
/// ```
/// use twister_core::{GenerationParameters, TwistId};
/// use twister_story::{PromptBuilder, StagePolicy};
///
/// let params = GenerationParameters::builder()
///     .instructions("a haunted lighthouse")
///     .branching_factor(2u32)
///     .max_depth(3u32)
///     .build()
///     .unwrap();
/// let prompts = PromptBuilder::new(&params, StagePolicy::None);
///
/// let (prompt, keys) = prompts.expansion(&TwistId::root(), 2, 1);
/// assert!(prompt.contains("\"00\", \"01\""));
/// assert_eq!(keys.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptBuilder {
    params: GenerationParameters,
    markers: Option<StageMarkers>,
}

impl PromptBuilder {
    /// Prompts for `params`, with stage hints when `stages` asks for them.
    pub fn new(params: &GenerationParameters, stages: StagePolicy) -> Self {
        let markers = match stages {
            StagePolicy::None => None,
            StagePolicy::ClimaxResolution => Some(params.stage_markers()),
        };
        Self {
            params: params.clone(),
            markers,
        }
    }

    /// The parameters these prompts describe.
    pub fn params(&self) -> &GenerationParameters {
        &self.params
    }

    /// Stage attached to twists produced at `depth`.
    ///
    /// Always exposition when stage hints are off.
    pub fn stage_at(&self, depth: u32) -> NarrativeStage {
        self.markers
            .map(|markers| markers.stage_at(depth))
            .unwrap_or(NarrativeStage::Exposition)
    }

    /// Prompt for the root twist, answered as a JSON object with the single key `"0"`.
    pub fn root(&self) -> String {
        let mut prompt = format!(
            "{}\n{} The main objective of each twist is to convince the reader to keep reading.\nPlease generate a twist containing the exposition for a story {}\nI need you to deliver a JSON object with a key '0', which should contain the twist represented by a nested JSON object with the keys 'title' and 'body'.",
            TWIST_MODEL,
            INTERACTIVE,
            subject(self.params.instructions()),
        );
        self.push_extra(&mut prompt);
        prompt
    }

    /// Prompt for the sibling batch of `parent`, whose children sit at `depth`.
    ///
    /// Returns the prompt and the exact keys the response must contain.
    pub fn expansion(&self, parent: &TwistId, child_count: u32, depth: u32) -> (String, Vec<TwistId>) {
        let keys = parent.children(child_count);
        let mut prompt = format!(
            "For twist {parent} please generate {child_count} more twists, each of them will represent a different way to continue twist {parent}. Twist 'title' may suggest an action to be taken."
        );
        if let Some(clause) = stage_clause(self.stage_at(depth)) {
            prompt.push(' ');
            prompt.push_str(clause);
        }
        prompt.push_str(&format!(
            "\nI need you to deliver a JSON object that has the keys {}, each containing a twist",
            quoted_keys(&keys)
        ));
        (prompt, keys)
    }

    /// Prompt asking for the whole tree in one JSON object.
    pub fn single_shot(&self) -> String {
        let mut prompt = format!(
            "Please create an interactive story {}\nWe will have a basic data model named 'twist' which will contain a 'title' of no more than 80 chars and a 'body' of no more than 1200 chars. Each twist contains a fraction of the story and below each twist there can be more twists which represent decisions or paths that the reader can choose.\nEach twist has a name made of the name of its parent twist followed by its own twist number, starting from twist '0' which contains the plot. Below twist '0' we have twists '00', '01', '02' and so on, depending on how many children each twist has. At a third level we have twists '000', '001', '002', and so on.\nPlease deliver a story with {} child twists for each of the twists and a maximum depth of {} levels.\nI need you to deliver a JSON object that has a key for each of the twist names, each containing a nested JSON object with the keys 'title' and 'body'. Twist names must only include numbers.",
            subject(self.params.instructions()),
            self.params.branching_factor(),
            self.params.max_depth(),
        );
        self.push_extra(&mut prompt);
        prompt
    }

    /// Free-text prompt for a story told as a chain of paragraphs.
    pub fn linear_story(&self) -> String {
        let mut prompt = format!(
            "Please write a story {}\nTell it in {} paragraphs separated by blank lines. Start each paragraph with a short title of no more than 80 characters on its own line, and keep each paragraph under 1200 characters. Do not number the paragraphs.",
            subject(self.params.instructions()),
            self.params.max_depth(),
        );
        self.push_extra(&mut prompt);
        prompt
    }

    /// Free-text prompt for alternative continuation `index` after paragraph `split_at`.
    ///
    /// `split_at` is zero-based; `remaining` is how many paragraphs to write.
    pub fn alternative(&self, split_at: u32, index: u32, remaining: u32) -> String {
        format!(
            "Now rewrite the story from paragraph {} onwards, taking a different direction from the one you chose (alternative {}). Keep paragraphs 1 to {} exactly as they are but do not repeat them. Write {} paragraphs separated by blank lines, each starting with a short title on its own line.",
            split_at + 2,
            index,
            split_at + 1,
            remaining.max(1),
        )
    }

    /// JSON prompt asking for a title for each `(id, body)` entry.
    pub fn titles(&self, entries: &[(TwistId, String)]) -> String {
        let keys = entries.iter().map(|(id, _)| id.clone()).collect::<Vec<_>>();
        let mut prompt = format!(
            "Here are some twists of an interactive story. Please write a title of no more than 80 chars for each of them; a title may suggest an action to be taken.\nI need you to deliver a JSON object that has the keys {}, each containing the title as a string.",
            quoted_keys(&keys)
        );
        for (id, body) in entries {
            prompt.push_str(&format!("\n\nTwist {}:\n{}", id, body));
        }
        prompt
    }

    fn push_extra(&self, prompt: &mut String) {
        if let Some(extra) = self.params.extra() {
            prompt.push_str("\nPlease also consider the following:\n");
            prompt.push_str(extra);
        }
    }
}

/// Clause injected into expansion prompts at the climax and resolution depths.
fn stage_clause(stage: NarrativeStage) -> Option<&'static str> {
    match stage {
        NarrativeStage::Exposition => None,
        NarrativeStage::Climax => Some("Please include the climax of the story on these twists."),
        NarrativeStage::Resolution => {
            Some("Please include the resolution of the story on these twists.")
        }
    }
}

fn subject(instructions: &StoryInstructions) -> String {
    match instructions {
        StoryInstructions::Freeform(text) => format!("with the following instructions: {}", text),
        StoryInstructions::GenreTopic { genres, topics } => format!(
            "of the following genres: {}\nAnd the following topics: {}",
            genres, topics
        ),
    }
}

fn quoted_keys(keys: &[TwistId]) -> String {
    keys.iter()
        .map(|key| format!("\"{}\"", key))
        .collect::<Vec<_>>()
        .join(", ")
}
