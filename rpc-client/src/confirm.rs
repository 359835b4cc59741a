use {
    crate::{
        error::ProviderError,
        provider::WalletProvider,
        response::{TransactionReceipt, TxHash},
    },
    log::debug,
    std::time::Duration,
};

/// Polls for the receipt of `hash` until it is mined.
///
/// No deadline is applied. Dropping the future abandons the wait but not the
/// transaction.
pub async fn wait_for_receipt<P: WalletProvider + ?Sized>(
    provider: &P,
    hash: &TxHash,
    poll_interval: Duration,
) -> Result<TransactionReceipt, ProviderError> {
    let mut polls: u64 = 0;
    loop {
        if let Some(receipt) = provider.transaction_receipt(hash).await? {
            debug!(
                "transaction {} mined in block {} after {} polls",
                hash, receipt.block_number, polls
            );
            return Ok(receipt);
        }
        polls = polls.saturating_add(1);
        tokio::time::sleep(poll_interval).await;
    }
}
