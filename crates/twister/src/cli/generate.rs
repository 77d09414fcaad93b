//! `twister generate` handler.

use super::{GenerateArgs, write_json};
use tracing::{info, warn};
use twister::{
    FailurePolicy, GenerationPolicy, OpenAIClient, TwistTreeGenerator, TwisterConfig, TwisterError,
    TwisterErrorKind,
};

/// Generate a tree with the OpenAI driver and write its flat JSON mapping.
///
/// With `--partial`, a failure after the root was generated still writes the
/// merged twists before the error is returned.
pub async fn generate_story(
    args: &GenerateArgs,
    config: &TwisterConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let params = args.parameters()?;
    params.validate(config.generation.max_branching)?;

    let mut policy = GenerationPolicy::from(args.variant);
    if args.partial {
        policy = policy.with_failure(FailurePolicy::ReturnPartial);
    }

    let client = OpenAIClient::from_config(&config.completion)?;
    let generator = TwistTreeGenerator::from_config(client, policy, config);

    info!(
        variant = %args.variant,
        branching = args.branching,
        depth = args.depth,
        "Generating story"
    );

    match generator.generate(&params).await {
        Ok(tree) => write_json(&tree, args.output.as_deref()),
        Err(err) => match err.into_kind() {
            TwisterErrorKind::PartialTree(partial) => {
                warn!(merged = partial.merged(), "Generation failed, writing partial tree");
                write_json(partial.partial(), args.output.as_deref())?;
                Err(TwisterError::new(TwisterErrorKind::PartialTree(partial)).into())
            }
            kind => Err(TwisterError::new(kind).into()),
        },
    }
}
