//! Quickstart - batch token transfer on Nile
//!
//! Covers: address parsing, preflight checks, batch transfer, receipt decoding
//!
//! Run: cargo run --example quickstart
//!
//! Set environment variables:
//!   TRON_PRIVATE_KEY=<64 hex chars>
//!   TRON_BATCH_CONTRACT=<batch transfer contract address>
//!   TRON_TOKEN=<TRC-20 token address>
//!   TRON_RECIPIENT=<recipient address>
//!   TRON_NETWORK=nile            (optional, see TronClient::from_env)

use tron_kit::*;

fn env(name: &str) -> Result<String, Error> {
    std::env::var(name).map_err(|_| Error::Config(format!("{name} is not set")))
}

// ============================================================================
// 1. Preflight (read-only)
// ============================================================================

async fn preflight_example(
    client: &TronClient,
    batch: &[TransferRequest],
    contract: &Address,
    caller: &Address,
) -> bool {
    println!("=== Preflight ===\n");

    let lines = client.preflight(batch, contract, caller).await;
    for line in &lines {
        println!(
            "#{} {} from {} to {}: need {}, balance {}, allowance {} -> {}",
            line.index,
            line.token,
            line.from,
            line.to,
            line.amount_display(),
            line.balance_display().unwrap_or_else(|| "?".into()),
            line.allowance_display().unwrap_or_else(|| "?".into()),
            line.status
        );
    }
    lines.iter().all(|l| l.status.is_ok())
}

// ============================================================================
// 2. Batch transfer
// ============================================================================

async fn transfer_example(
    client: &TronClient,
    batch: &[TransferRequest],
    contract: &Address,
    key: &SecretKey,
) -> Result<(), Error> {
    println!("\n=== Batch Transfer ===\n");

    let outcome = client.batch_transfer_token(contract, batch, key).await?;
    println!("Transaction: {} ({})", outcome.tx_id, outcome.status);

    for transfer in &outcome.transfers {
        println!("  {} -> {}: {}", transfer.from, transfer.to, transfer.value);
    }
    if let Some(reason) = &outcome.revert_reason {
        println!("  reverted: {reason}");
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let client = TronClient::from_env()?;
    println!("Using {} ({})\n", client.network().as_str(), client.node_url());

    let key: SecretKey = env("TRON_PRIVATE_KEY")?.parse()?;
    let contract = client.parse_address(&env("TRON_BATCH_CONTRACT")?)?;
    let token = client.parse_address(&env("TRON_TOKEN")?)?;
    let recipient = client.parse_address(&env("TRON_RECIPIENT")?)?;

    let owner = key.address();
    let batch = [TransferRequest::new(owner, recipient, token, U256::from(1_000u64))];

    if !preflight_example(&client, &batch, &contract, &owner).await {
        println!("\nPreflight found problems; approve the contract or top up first.");
        return Ok(());
    }

    transfer_example(&client, &batch, &contract, &key).await
}
