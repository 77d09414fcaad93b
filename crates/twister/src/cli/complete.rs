//! `twister complete` handler.

use twister::{CompletionAdapter, OpenAIClient, TwisterConfig};

/// Send one prompt and print the raw assistant reply.
pub async fn complete_prompt(
    prompt: &str,
    json: bool,
    config: &TwisterConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = OpenAIClient::from_config(&config.completion)?;
    let adapter =
        CompletionAdapter::new(client).with_system_prompt(config.completion.system_prompt.clone());

    let reply = adapter.complete_once(prompt, json).await?;
    println!("{}", reply);
    Ok(())
}
