//! # Submission Under Nonce Pressure
//!
//! The submitter owns the operator account's nonce. These flows check that
//! it recovers from every nonce conflict a node can report, surfaces
//! reverts without retrying them and never hands one nonce out twice.

#[cfg(test)]
mod tests {
    use crate::fixtures::{asset_term, Harness, Investor, OPERATOR};
    use fp_03_tx_submission::{ContractError, RpcError, SubmitError};
    use shared_types::ExecutionContext;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn nonce_too_high() -> RpcError {
        RpcError::new(-32000, "nonce too high: address 0x0a, tx: 9 state: 3")
    }

    #[tokio::test]
    async fn test_nonce_conflicts_are_retried_with_fresh_nonce() {
        let harness = Harness::new();
        let investor = Investor::random();
        let asset_id = harness.issued(&investor.fin_id, "1").await;

        let sends = harness.ledger.send_count();
        let resets = harness.contract.submitter().nonces().resets();
        harness.ledger.inject_send_error(nonce_too_high());
        harness.ledger.inject_send_error(RpcError::new(-32000, "replacement transaction underpriced"));

        let tx = harness
            .contract
            .issue(&investor.fin_id, &asset_term(&asset_id, "1"), &ExecutionContext::none())
            .await
            .unwrap();
        harness.completed(tx).await;

        assert_eq!(harness.ledger.send_count() - sends, 3);
        assert_eq!(harness.contract.submitter().nonces().resets() - resets, 2);
        assert_eq!(
            harness.contract.get_balance(&asset_id, &investor.fin_id).await.unwrap(),
            "2"
        );
    }

    #[tokio::test]
    async fn test_nonce_used_elsewhere_recovers() {
        let harness = Harness::new();
        let investor = Investor::random();
        let asset_id = harness.issued(&investor.fin_id, "1").await;

        // Another client sends from the operator account.
        let chain_nonce = harness.ledger.nonce_of(OPERATOR);
        harness.ledger.set_nonce(OPERATOR, chain_nonce + 4);

        let tx = harness
            .contract
            .issue(&investor.fin_id, &asset_term(&asset_id, "1"), &ExecutionContext::none())
            .await
            .unwrap();
        harness.completed(tx).await;
        assert_eq!(harness.ledger.nonce_of(OPERATOR), chain_nonce + 5);
        assert_eq!(harness.contract.submitter().nonces().peek(), Some(chain_nonce + 5));
    }

    #[tokio::test]
    async fn test_revert_is_not_retried_and_next_call_recovers() {
        let harness = Harness::new();
        let investor = Investor::random();
        let sends = harness.ledger.send_count();

        let err = harness
            .contract
            .issue(
                &investor.fin_id,
                &asset_term("bank-us:102:unknown", "1"),
                &ExecutionContext::none(),
            )
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ContractError::Submit(SubmitError::Reverted {
                reason: "Asset not found".to_string()
            })
        );
        assert_eq!(harness.ledger.send_count() - sends, 1);
        assert_eq!(harness.contract.submitter().nonces().peek(), None);

        // The unused nonce is fetched again and accepted.
        let asset_id = harness.issued(&investor.fin_id, "4").await;
        assert_eq!(harness.ledger.units_of(&asset_id, &investor.fin_id), 4 * 10u128.pow(18));
    }

    #[tokio::test]
    async fn test_unknown_node_error_fails_fast() {
        let harness = Harness::new();
        let investor = Investor::random();
        let asset_id = harness.issued(&investor.fin_id, "1").await;
        let sends = harness.ledger.send_count();
        let resets = harness.contract.submitter().nonces().resets();

        harness.ledger.inject_send_error(RpcError::new(-32005, "rate limited"));
        let err = harness
            .contract
            .issue(&investor.fin_id, &asset_term(&asset_id, "1"), &ExecutionContext::none())
            .await
            .unwrap_err();
        assert!(matches!(err, ContractError::Submit(SubmitError::Rejected(_))));
        assert_eq!(harness.ledger.send_count() - sends, 1);
        assert_eq!(harness.contract.submitter().nonces().resets(), resets);

        // The skipped nonce leaves a gap; the next call closes it through
        // one nonce-too-high retry.
        let tx = harness
            .contract
            .issue(&investor.fin_id, &asset_term(&asset_id, "1"), &ExecutionContext::none())
            .await
            .unwrap();
        harness.completed(tx).await;
        assert_eq!(harness.contract.submitter().nonces().resets(), resets + 1);
    }

    #[tokio::test]
    async fn test_persistent_conflict_gives_up() {
        let harness = Harness::new();
        let investor = Investor::random();
        let asset_id = harness.issued(&investor.fin_id, "1").await;
        let sends = harness.ledger.send_count();

        for _ in 0..10 {
            harness.ledger.inject_send_error(nonce_too_high());
        }
        let err = harness
            .contract
            .issue(&investor.fin_id, &asset_term(&asset_id, "1"), &ExecutionContext::none())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ContractError::Submit(SubmitError::NonceConflictUnresolved { attempts: 10 })
        );
        assert_eq!(harness.ledger.send_count() - sends, 10);
    }

    #[tokio::test]
    async fn test_concurrent_submissions_use_distinct_nonces() {
        let harness = Arc::new(Harness::new());
        let investor = Investor::random();
        let asset_id = harness.issued(&investor.fin_id, "1").await;
        let start = harness.ledger.nonce_of(OPERATOR);

        let mut handles = Vec::new();
        for _ in 0..8 {
            let harness = Arc::clone(&harness);
            let to = investor.fin_id.clone();
            let term = asset_term(&asset_id, "1");
            handles.push(tokio::spawn(async move {
                harness
                    .contract
                    .issue(&to, &term, &ExecutionContext::none())
                    .await
                    .unwrap()
            }));
        }

        let mut hashes = HashSet::new();
        for handle in handles {
            let tx = handle.await.unwrap();
            harness.completed(tx).await;
            hashes.insert(tx);
        }
        assert_eq!(hashes.len(), 8);
        assert_eq!(harness.ledger.nonce_of(OPERATOR), start + 8);
        assert_eq!(
            harness.contract.get_balance(&asset_id, &investor.fin_id).await.unwrap(),
            "9"
        );
    }
}
