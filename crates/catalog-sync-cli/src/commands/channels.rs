use anyhow::{Result, bail};
use catalog_sync::Channel;
use catalog_sync_store::CatalogStore;

/// Print every channel with its remote id and activation state.
pub fn list(store: &CatalogStore) -> Result<()> {
    let records = store.channels()?;

    if records.is_empty() {
        println!("No channels configured.");
        return Ok(());
    }

    for record in records {
        let remote = record
            .channel
            .remote_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".into());
        let state = if record.active { "active" } else { "inactive" };
        println!(
            "{:>6}  {:<24}  remote={:<8}  {}",
            record.channel.id, record.channel.name, remote, state
        );
    }

    Ok(())
}

pub fn add(
    store: &CatalogStore,
    id: u64,
    name: &str,
    remote_id: Option<u64>,
    active: bool,
) -> Result<()> {
    store.upsert_channel(&Channel::new(id, name, remote_id), active)?;
    if remote_id.is_none() {
        eprintln!("warning: channel {id} has no remote id and will be skipped by sync");
    }
    println!("Saved channel {id} ({name}).");
    Ok(())
}

pub fn set_active(store: &CatalogStore, id: u64, active: bool) -> Result<()> {
    if !store.set_channel_active(id, active)? {
        bail!("no channel with id {id}");
    }
    let state = if active { "enabled" } else { "disabled" };
    println!("Channel {id} {state}.");
    Ok(())
}
