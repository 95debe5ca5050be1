use anyhow::{Result, bail};

use super::open_stores;
use crate::onboarding::{OnboardingHook, QuickStart};
use crate::output;

/// `sendly onboarding`: run the quick-start flow explicitly.
pub async fn run() -> Result<()> {
    let (config, storage) = open_stores()?;

    let Some(credential) = storage.get()? else {
        bail!("please authenticate first with `sendly login`");
    };
    if credential.is_expired() {
        bail!("session expired; run `sendly login` again");
    }

    let ran = QuickStart::new(config.base_url()?)
        .offer(credential.bearer())
        .await?;

    if ran {
        println!();
        output::info("Onboarding completed! You're ready to start sending SMS messages.");
    } else {
        output::info("Your account is already set up! Use `sendly --help` to see available commands.");
    }
    Ok(())
}
