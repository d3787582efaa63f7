//! # Settlement Flows
//!
//! Authorization, resolution, submission and receipt decoding for the
//! operations the adapter performs on behalf of FinP2P.

#[cfg(test)]
mod tests {
    use crate::fixtures::{
        asset_term, message, sign_as, usd, Harness, Investor, CONTRACT, CHAIN_ID,
    };
    use crate::simulator::{BLOCK_TIME, GENESIS_TIMESTAMP};
    use crate::solidity::{investment_hash, InvestmentFields};
    use fp_02_leg_phase::{LegPhaseApi, LegPhaseRequest, PartyRole, ValidationError};
    use shared_types::{
        Asset, AssetType, ExecutionContext, FinId, Leg, LoanTerms, OperationType, Phase,
        PrimaryType, ReleaseType,
    };

    fn request(source: &FinId, destination: Option<&FinId>, quantity: &str) -> LegPhaseRequest {
        LegPhaseRequest {
            source: source.clone(),
            destination: destination.cloned(),
            quantity: quantity.to_string(),
            phase: None,
            operation_id: None,
            release_type: ReleaseType::Release,
        }
    }

    fn usd_asset() -> Asset {
        Asset::new("USD", AssetType::Fiat)
    }

    // =========================================================================
    // ISSUANCE
    // =========================================================================

    #[tokio::test]
    async fn test_primary_sale_issuance() {
        let harness = Harness::new();
        let issuer = Investor::random();
        let investor = Investor::random();
        let asset_id = crate::fixtures::asset_id();

        let tx = harness
            .contract
            .associate_asset(&asset_id, crate::fixtures::TOKEN)
            .await
            .unwrap();
        harness.settle(tx).await;

        // Issuer authorizes the sale; the asset leg is theirs to sign.
        let sale = message(
            PrimaryType::PrimarySale,
            &investor.fin_id,
            &issuer.fin_id,
            asset_term(&asset_id, "1000"),
            usd("10000"),
        );
        let signed = sign_as(&sale, &issuer);
        let leg = harness
            .resolver
            .resolve_leg_phase(
                &Asset::new(asset_id.clone(), AssetType::FinP2P),
                &signed,
                &request(&issuer.fin_id, Some(&investor.fin_id), "1000"),
            )
            .unwrap();
        assert_eq!(leg.leg, Leg::Asset);
        assert_eq!(leg.phase, Phase::Initiate);
        assert_eq!(leg.expected_signer.role, PartyRole::Issuer);

        let ctx = ExecutionContext::new("plan-7f3a", 1);
        let tx = harness
            .contract
            .issue(&investor.fin_id, &asset_term(&asset_id, "1000"), &ctx)
            .await
            .unwrap();
        let receipt = harness.completed(tx).await;

        assert_eq!(receipt.operation_type, OperationType::Issue);
        assert_eq!(receipt.quantity, "1000");
        assert_eq!(receipt.asset.asset_id, asset_id);
        assert_eq!(receipt.source, None);
        assert_eq!(receipt.destination, Some(investor.fin_id.clone()));
        assert_eq!(receipt.trade_details.execution_context, Some(ctx));
        assert_eq!(receipt.transaction_details.operation_id, None);
        assert_eq!(receipt.id, receipt.transaction_details.transaction_id);
        assert_eq!(receipt.timestamp, GENESIS_TIMESTAMP + harness.ledger.height() * BLOCK_TIME);

        let balance = harness
            .contract
            .get_balance(&asset_id, &investor.fin_id)
            .await
            .unwrap();
        assert_eq!(balance, "1000");
        assert_eq!(
            harness.contract.get_asset_address(&asset_id).await.unwrap(),
            crate::fixtures::TOKEN
        );
    }

    // =========================================================================
    // SECONDARY TRADE
    // =========================================================================

    #[tokio::test]
    async fn test_trade_settles_both_legs() {
        let harness = Harness::new();
        let seller = Investor::random();
        let buyer = Investor::random();
        let asset_id = harness.issued(&seller.fin_id, "10").await;
        harness.fund_usd(&buyer.fin_id, "2000").await;

        let trade = message(
            PrimaryType::Selling,
            &buyer.fin_id,
            &seller.fin_id,
            asset_term(&asset_id, "10"),
            usd("1050.25"),
        );
        let ctx = ExecutionContext::new("plan-trade", 2);

        // Asset leg: seller signs, seller -> buyer.
        let by_seller = sign_as(&trade, &seller);
        let leg = harness
            .resolver
            .resolve_leg_phase(
                &Asset::new(asset_id.clone(), AssetType::FinP2P),
                &by_seller,
                &request(&seller.fin_id, Some(&buyer.fin_id), "10"),
            )
            .unwrap();
        let tx = harness.contract.transfer(&by_seller, &leg.params, &ctx).await.unwrap();
        let receipt = harness.completed(tx).await;
        assert_eq!(receipt.operation_type, OperationType::Transfer);
        assert_eq!(receipt.source, Some(seller.fin_id.clone()));
        assert_eq!(receipt.destination, Some(buyer.fin_id.clone()));
        assert_eq!(receipt.quantity, "10");

        // Settlement leg: buyer signs, buyer -> seller.
        let by_buyer = sign_as(&trade, &buyer);
        let leg = harness
            .resolver
            .resolve_leg_phase(
                &usd_asset(),
                &by_buyer,
                &request(&buyer.fin_id, Some(&seller.fin_id), "1050.25"),
            )
            .unwrap();
        assert_eq!(leg.leg, Leg::Settlement);
        let tx = harness.contract.transfer(&by_buyer, &leg.params, &ctx).await.unwrap();
        let receipt = harness.completed(tx).await;
        assert_eq!(receipt.asset, usd_asset());
        assert_eq!(receipt.quantity, "1050.25");

        let balance = |asset: String, owner: FinId| {
            let harness = &harness;
            async move { harness.contract.get_balance(&asset, &owner).await.unwrap() }
        };
        assert_eq!(balance(asset_id.clone(), buyer.fin_id.clone()).await, "10");
        assert_eq!(balance(asset_id.clone(), seller.fin_id.clone()).await, "0");
        assert_eq!(balance("USD".to_string(), seller.fin_id.clone()).await, "1050.25");
        assert_eq!(balance("USD".to_string(), buyer.fin_id.clone()).await, "949.75");
    }

    #[tokio::test]
    async fn test_quantity_mismatch_rejected_before_chain() {
        let harness = Harness::new();
        let seller = Investor::random();
        let buyer = Investor::random();
        let trade = message(
            PrimaryType::Selling,
            &buyer.fin_id,
            &seller.fin_id,
            asset_term("bank-us:102:qty", "10"),
            usd("100"),
        );

        let err = harness
            .resolver
            .resolve_leg_phase(
                &Asset::new("bank-us:102:qty", AssetType::FinP2P),
                &sign_as(&trade, &seller),
                &request(&seller.fin_id, Some(&buyer.fin_id), "11"),
            )
            .unwrap_err();
        assert!(matches!(err, ValidationError::QuantityMismatch { .. }));
        assert_eq!(harness.ledger.send_count(), 0);
    }

    // =========================================================================
    // LOAN
    // =========================================================================

    #[tokio::test]
    async fn test_loan_close_requires_borrower_signature() {
        let harness = Harness::new();
        let lender = Investor::random();
        let borrower = Investor::random();
        let loan = message(
            PrimaryType::Loan,
            &lender.fin_id,
            &borrower.fin_id,
            asset_term("bank-us:102:repo", "50"),
            usd("1000"),
        );
        let close = LegPhaseRequest {
            phase: Some(Phase::Close),
            ..request(&borrower.fin_id, Some(&lender.fin_id), "1015")
        };

        // Lender signature on the close settlement leg: rejected, no chain calls.
        let err = harness
            .resolver
            .resolve_leg_phase(&usd_asset(), &sign_as(&loan, &lender), &close)
            .unwrap_err();
        match err {
            ValidationError::SignerMismatch { role, fin_id, .. } => {
                assert_eq!(role, PartyRole::Borrower);
                assert_eq!(fin_id, borrower.fin_id);
            }
            other => panic!("expected signer mismatch, got {other:?}"),
        }
        assert_eq!(harness.ledger.send_count(), 0);
        assert_eq!(harness.ledger.call_count(), 0);

        // Borrower signature: repays the returned amount to the lender.
        let by_borrower = sign_as(&loan, &borrower);
        let leg = harness
            .resolver
            .resolve_leg_phase(&usd_asset(), &by_borrower, &close)
            .unwrap();
        assert_eq!(leg.params.phase, Phase::Close);

        harness.fund_usd(&borrower.fin_id, "1015").await;
        let tx = harness
            .contract
            .transfer(&by_borrower, &leg.params, &ExecutionContext::none())
            .await
            .unwrap();
        let receipt = harness.completed(tx).await;
        assert_eq!(receipt.source, Some(borrower.fin_id.clone()));
        assert_eq!(receipt.destination, Some(lender.fin_id.clone()));
        assert_eq!(receipt.quantity, "1015");
        assert_eq!(receipt.trade_details.execution_context, None);
    }

    #[tokio::test]
    async fn test_loan_initiate_inferred_from_source() {
        let harness = Harness::new();
        let lender = Investor::random();
        let borrower = Investor::random();
        let loan = message(
            PrimaryType::Loan,
            &lender.fin_id,
            &borrower.fin_id,
            asset_term("bank-us:102:repo", "50"),
            usd("1000"),
        );

        let leg = harness
            .resolver
            .resolve_leg_phase(
                &usd_asset(),
                &sign_as(&loan, &lender),
                &request(&lender.fin_id, Some(&borrower.fin_id), "1000"),
            )
            .unwrap();
        assert_eq!(leg.phase, Phase::Initiate);
        assert_eq!(leg.expected_signer.role, PartyRole::Lender);

        harness.fund_usd(&lender.fin_id, "1000").await;
        let tx = harness
            .contract
            .transfer(&sign_as(&loan, &lender), &leg.params, &ExecutionContext::none())
            .await
            .unwrap();
        assert_eq!(harness.completed(tx).await.quantity, "1000");
        assert_eq!(
            harness.contract.get_balance("USD", &borrower.fin_id).await.unwrap(),
            "1000"
        );
    }

    // =========================================================================
    // HOLD / RELEASE
    // =========================================================================

    async fn hold(
        harness: &Harness,
        owner: &Investor,
        counterparty: &Investor,
        asset_id: &str,
        amount: &str,
        operation_id: &str,
    ) {
        let trade = message(
            PrimaryType::Selling,
            &counterparty.fin_id,
            &owner.fin_id,
            asset_term(asset_id, amount),
            usd("1"),
        );
        let signed = sign_as(&trade, owner);
        let leg = harness
            .resolver
            .resolve_leg_phase(
                &Asset::new(asset_id, AssetType::FinP2P),
                &signed,
                &LegPhaseRequest {
                    operation_id: Some(operation_id.to_string()),
                    ..request(&owner.fin_id, Some(&counterparty.fin_id), amount)
                },
            )
            .unwrap();
        assert_eq!(leg.params.operation_id, operation_id);

        let tx = harness
            .contract
            .hold(&signed, &leg.params, &ExecutionContext::none())
            .await
            .unwrap();
        let receipt = harness.completed(tx).await;
        assert_eq!(receipt.operation_type, OperationType::Hold);
        assert_eq!(receipt.source, Some(owner.fin_id.clone()));
        assert_eq!(
            receipt.transaction_details.operation_id.as_deref(),
            Some(operation_id)
        );
    }

    #[tokio::test]
    async fn test_hold_then_release_to_counterparty() {
        let harness = Harness::new();
        let seller = Investor::random();
        let buyer = Investor::random();
        let asset_id = harness.issued(&seller.fin_id, "10").await;

        hold(&harness, &seller, &buyer, &asset_id, "10", "op-release").await;
        assert_eq!(
            harness.contract.get_balance(&asset_id, &seller.fin_id).await.unwrap(),
            "0"
        );

        let tx = harness
            .contract
            .release_to("op-release", &seller.fin_id, &buyer.fin_id, "10", &ExecutionContext::none())
            .await
            .unwrap();
        let receipt = harness.completed(tx).await;
        assert_eq!(receipt.operation_type, OperationType::Release);
        assert_eq!(receipt.destination, Some(buyer.fin_id.clone()));
        assert_eq!(
            harness.contract.get_balance(&asset_id, &buyer.fin_id).await.unwrap(),
            "10"
        );
    }

    #[tokio::test]
    async fn test_hold_then_release_back() {
        let harness = Harness::new();
        let seller = Investor::random();
        let buyer = Investor::random();
        let asset_id = harness.issued(&seller.fin_id, "7.5").await;

        hold(&harness, &seller, &buyer, &asset_id, "7.5", "op-back").await;
        let tx = harness
            .contract
            .release_back("op-back", &ExecutionContext::none())
            .await
            .unwrap();
        let receipt = harness.completed(tx).await;
        assert_eq!(receipt.operation_type, OperationType::Release);
        assert_eq!(receipt.source, Some(seller.fin_id.clone()));
        assert_eq!(receipt.destination, None);
        assert_eq!(receipt.quantity, "7.5");
        assert_eq!(
            harness.contract.get_balance(&asset_id, &seller.fin_id).await.unwrap(),
            "7.5"
        );
    }

    #[tokio::test]
    async fn test_hold_then_release_and_redeem() {
        let harness = Harness::new();
        let holder = Investor::random();
        let issuer = Investor::random();
        let asset_id = harness.issued(&holder.fin_id, "5").await;

        hold(&harness, &holder, &issuer, &asset_id, "5", "op-redeem").await;
        let tx = harness
            .contract
            .release_and_redeem("op-redeem", &holder.fin_id, "5", &ExecutionContext::none())
            .await
            .unwrap();
        let receipt = harness.completed(tx).await;
        assert_eq!(receipt.operation_type, OperationType::Redeem);
        assert_eq!(receipt.source, Some(holder.fin_id.clone()));
        assert_eq!(
            receipt.transaction_details.operation_id.as_deref(),
            Some("op-redeem")
        );
        assert_eq!(harness.ledger.units_of(&asset_id, &holder.fin_id), 0);
    }

    #[tokio::test]
    async fn test_direct_redeem() {
        let harness = Harness::new();
        let holder = Investor::random();
        let asset_id = harness.issued(&holder.fin_id, "3").await;

        let tx = harness
            .contract
            .redeem(&holder.fin_id, &asset_term(&asset_id, "2"), &ExecutionContext::none())
            .await
            .unwrap();
        let receipt = harness.completed(tx).await;
        assert_eq!(receipt.operation_type, OperationType::Redeem);
        assert_eq!(receipt.transaction_details.operation_id, None);
        assert_eq!(
            harness.contract.get_balance(&asset_id, &holder.fin_id).await.unwrap(),
            "1"
        );
    }

    // =========================================================================
    // CROSS-VALIDATION
    // =========================================================================

    #[tokio::test]
    async fn test_contract_hash_matches_off_chain_hash() {
        let harness = Harness::new();
        let buyer = Investor::random();
        let seller = Investor::random();

        for primary_type in PrimaryType::ALL {
            let msg = message(
                primary_type,
                &buyer.fin_id,
                &seller.fin_id,
                asset_term("bank-us:102:xv", "3"),
                usd("300"),
            );
            let signed = sign_as(&msg, &seller);
            let on_chain = harness.contract.hash_investment(&msg).await.unwrap();
            assert_eq!(on_chain, signed.hash().unwrap(), "{primary_type}");

            assert!(harness
                .contract
                .verify_investment_signature(&signed, &seller.fin_id)
                .await
                .unwrap());
            assert!(!harness
                .contract
                .verify_investment_signature(&signed, &buyer.fin_id)
                .await
                .unwrap());
        }
    }

    #[test]
    fn test_hash_bound_to_deployment() {
        let buyer = Investor::random();
        let seller = Investor::random();
        let msg = message(
            PrimaryType::Buying,
            &buyer.fin_id,
            &seller.fin_id,
            asset_term("bank-us:102:dep", "1"),
            usd("1"),
        );
        let no_loan = LoanTerms::default();
        let investment = InvestmentFields {
            primary_type: PrimaryType::Buying,
            nonce: msg.nonce(),
            buyer: &buyer.fin_id,
            seller: &seller.fin_id,
            asset: msg.asset(),
            settlement: msg.settlement(),
            loan: &no_loan,
        };
        let here = investment_hash(CHAIN_ID, CONTRACT, &investment);
        let elsewhere = investment_hash(CHAIN_ID + 1, CONTRACT, &investment);
        assert_ne!(here, elsewhere);
        assert_eq!(here, sign_as(&msg, &seller).hash().unwrap());
    }
}
