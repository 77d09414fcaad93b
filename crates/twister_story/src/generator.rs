//! The twist-tree generator.

use crate::extraction::{parse_twist_batch, parse_twists_lenient};
use crate::{
    BranchingPolicy, CompletionAdapter, FailurePolicy, GenerationPolicy, PromptBuilder,
    TreeAssembler, TreeStrategy,
};
use futures::future::{BoxFuture, try_join_all};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{Instrument, debug, debug_span, info, instrument, warn};
use twister_core::{Conversation, GenerationParameters, Message, StoryTree, TwistId};
use twister_error::{
    MalformedResponseError, MalformedResponseErrorKind, PartialTreeError, TwisterResult,
    ValidationError, ValidationErrorKind,
};
use twister_interface::TwisterDriver;
use twister_rate_limit::{CallThrottle, GenerationConfig, MAX_BRANCHING, TwisterConfig};

/// Builds story trees by chaining completion calls.
///
/// One generator can serve many requests; each request gets its own tree and
/// conversations. An attached [`CallThrottle`] is shared by every call the
/// generator makes, across concurrent requests too.
#[derive(Debug)]
pub struct TwistTreeGenerator<D> {
    pub(crate) adapter: CompletionAdapter<D>,
    pub(crate) policy: GenerationPolicy,
    pub(crate) throttle: Option<Arc<CallThrottle>>,
    max_branching: u32,
}

/// Per-request state shared by every branch of the recursion.
struct Expansion {
    prompts: PromptBuilder,
    assembler: TreeAssembler,
    branching_factor: u32,
    max_depth: u32,
}

impl<D: TwisterDriver> TwistTreeGenerator<D> {
    /// Generator driving `driver` under `policy`, without a throttle.
    pub fn new(driver: D, policy: GenerationPolicy) -> Self {
        Self {
            adapter: CompletionAdapter::new(driver),
            policy,
            throttle: None,
            max_branching: GenerationConfig::default().max_branching,
        }
    }

    /// Generator configured from a loaded [`TwisterConfig`].
    ///
    /// Applies the system prompt, the branching ceiling and the decaying widths,
    /// and attaches a throttle when `[throttle]` is enabled.
    pub fn from_config(driver: D, policy: GenerationPolicy, config: &TwisterConfig) -> Self {
        let policy = match policy.branching {
            BranchingPolicy::Decaying { .. } => {
                policy.with_branching(BranchingPolicy::decaying_from_config(&config.generation))
            }
            BranchingPolicy::Constant => policy,
        };

        let generator = Self::new(driver, policy)
            .with_system_prompt(config.completion.system_prompt.clone())
            .with_max_branching(config.generation.max_branching);

        if config.throttle.enabled {
            generator.with_throttle(Arc::new(CallThrottle::from_config(&config.throttle)))
        } else {
            generator
        }
    }

    /// Gate every completion call through `throttle`.
    pub fn with_throttle(mut self, throttle: Arc<CallThrottle>) -> Self {
        self.throttle = Some(throttle);
        self
    }

    /// Replace the system prompt opening JSON-mode conversations.
    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.adapter = self.adapter.with_system_prompt(system_prompt);
        self
    }

    /// Widest branching factor accepted by [`generate`](Self::generate).
    ///
    /// Clamped to [`MAX_BRANCHING`] so child ids stay one digit per level.
    pub fn with_max_branching(mut self, max_branching: u32) -> Self {
        if max_branching > MAX_BRANCHING {
            warn!(
                requested = max_branching,
                max = MAX_BRANCHING,
                "Branching ceiling clamped"
            );
        }
        self.max_branching = max_branching.min(MAX_BRANCHING);
        self
    }

    /// The active policy.
    pub fn policy(&self) -> &GenerationPolicy {
        &self.policy
    }

    /// The completion adapter.
    pub fn adapter(&self) -> &CompletionAdapter<D> {
        &self.adapter
    }

    /// The attached throttle, if any.
    pub fn throttle(&self) -> Option<&CallThrottle> {
        self.throttle.as_deref()
    }

    /// Generate a complete story tree.
    ///
    /// # Errors
    ///
    /// - Validation errors before any remote call
    /// - Transport and malformed-response errors from any call, which abort the
    ///   whole generation; under [`FailurePolicy::ReturnPartial`] they arrive
    ///   wrapped in a `PartialTreeError` once this run has merged the root
    pub async fn generate(&self, params: &GenerationParameters) -> TwisterResult<StoryTree> {
        let tree = StoryTree::new();
        self.generate_into(params, &tree).await?;
        Ok(tree)
    }

    /// Generate into a caller-owned tree.
    ///
    /// Twists become visible in `tree` as soon as their batch is merged, so a
    /// caller holding a clone of the handle can observe progress and keep
    /// whatever was merged if generation fails.
    ///
    /// # Errors
    ///
    /// As [`generate`](Self::generate), plus
    /// [`ValidationErrorKind::TreeNotEmpty`] before any remote call when `tree`
    /// already holds twists.
    #[instrument(
        skip(self, params, tree),
        fields(
            branching = *params.branching_factor(),
            max_depth = *params.max_depth(),
            strategy = ?self.policy.strategy,
        )
    )]
    pub async fn generate_into(
        &self,
        params: &GenerationParameters,
        tree: &StoryTree,
    ) -> TwisterResult<()> {
        params.validate(self.max_branching)?;
        self.policy.validate()?;
        if !tree.is_empty() {
            return Err(ValidationError::new(ValidationErrorKind::TreeNotEmpty(tree.len())).into());
        }

        let assembler = TreeAssembler::new(tree.clone());
        let prompts = PromptBuilder::new(params, self.policy.stages);
        let outcome = match self.policy.strategy {
            TreeStrategy::Recursive => self.grow_recursive(prompts, &assembler).await,
            TreeStrategy::SingleShot => self.grow_single_shot(&prompts, &assembler).await,
            TreeStrategy::Linear => self.grow_linear(&prompts, &assembler, None).await,
            TreeStrategy::SemiLinear { split_at, branches } => {
                self.grow_linear(&prompts, &assembler, Some((split_at, branches)))
                    .await
            }
        };

        match outcome {
            Ok(()) => {
                info!(
                    twists = tree.len(),
                    levels = tree.levels(),
                    "Story tree generated"
                );
                Ok(())
            }
            Err(e)
                if self.policy.failure == FailurePolicy::ReturnPartial
                    && assembler.root_merged() =>
            {
                warn!(merged = tree.len(), error = %e, "Generation failed, returning partial tree");
                Err(PartialTreeError::new(tree.to_json(), e.into_kind()).into())
            }
            Err(e) => Err(e),
        }
    }

    /// Wait for admission when a throttle is attached.
    pub(crate) async fn admit(&self) {
        if let Some(throttle) = &self.throttle {
            throttle.acquire().await;
        }
    }

    async fn grow_recursive(
        &self,
        prompts: PromptBuilder,
        assembler: &TreeAssembler,
    ) -> TwisterResult<()> {
        let branching_factor = *prompts.params().branching_factor();
        let max_depth = *prompts.params().max_depth();
        let root = TwistId::root();

        self.admit().await;
        let conversation = self
            .adapter
            .opening(true)
            .with(Message::user(prompts.root()));
        let (object, conversation) = self.adapter.complete_json(conversation).await?;
        for (_, twist) in parse_twist_batch(&object, std::slice::from_ref(&root))? {
            assembler.merge_root(twist)?;
        }
        debug!("Root twist merged");

        if max_depth > 1 {
            let count = self.policy.branching.children_of(0, branching_factor);
            let expansion = Expansion {
                prompts,
                assembler: assembler.clone(),
                branching_factor,
                max_depth,
            };
            self.expand(&expansion, root, 1, count, conversation).await?;
        }
        Ok(())
    }

    /// Request the sibling batch of `parent` (children at `depth`), merge it,
    /// then expand every child concurrently with its own copy of the conversation.
    ///
    /// The first failing branch fails the join; its siblings are dropped.
    fn expand<'a>(
        &'a self,
        expansion: &'a Expansion,
        parent: TwistId,
        depth: u32,
        count: u32,
        mut conversation: Conversation,
    ) -> BoxFuture<'a, TwisterResult<()>> {
        let span = debug_span!("expand", parent = %parent, depth, children = count);
        Box::pin(
            async move {
                let (prompt, keys) = expansion.prompts.expansion(&parent, count, depth);
                conversation.push(Message::user(prompt));

                self.admit().await;
                debug!("Requesting sibling batch");
                let (object, conversation) = self.adapter.complete_json(conversation).await?;
                let batch = parse_twist_batch(&object, &keys)?;
                expansion.assembler.merge_batch(&parent, batch)?;

                if depth + 1 < expansion.max_depth {
                    let next = self
                        .policy
                        .branching
                        .children_of(depth, expansion.branching_factor);
                    try_join_all(keys.into_iter().map(|child| {
                        self.expand(expansion, child, depth + 1, next, conversation.clone())
                    }))
                    .await?;
                }
                Ok(())
            }
            .instrument(span),
        )
    }

    async fn grow_single_shot(
        &self,
        prompts: &PromptBuilder,
        assembler: &TreeAssembler,
    ) -> TwisterResult<()> {
        self.admit().await;
        let conversation = self
            .adapter
            .opening(true)
            .with(Message::user(prompts.single_shot()));
        let (object, _) = self.adapter.complete_json(conversation).await?;

        let twists = parse_twists_lenient(&object)
            .into_iter()
            .collect::<BTreeMap<_, _>>();
        let root = TwistId::root();
        let Some(root_twist) = twists.get(&root).cloned() else {
            return Err(MalformedResponseError::new(MalformedResponseErrorKind::MissingKey(
                root.to_string(),
            ))
            .into());
        };

        let candidate = StoryTree::from(twists);
        candidate.check_parents()?;
        assembler.merge_root(root_twist)?;
        let merged = assembler.tree().merge(
            candidate
                .upload_order()
                .into_iter()
                .filter(|(id, _)| !id.is_root()),
        );
        debug!(merged, "Single-shot tree merged");
        Ok(())
    }
}
